//! Question bank
//!
//! Turns roster entries and player facts into quiz questions. Lookups that
//! fail or come back empty simply mean fewer questions; nothing here returns
//! an error to the caller.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::question::{sample_distractors, TriviaQuestion, CHOICE_COUNT};
use crate::facts::PlayerFacts;
use crate::roster::RosterStore;
use crate::types::{FormerTeam, Honor, PlayerInfo, RosterPlayer, TeamId};

const DISTRACTOR_COUNT: usize = CHOICE_COUNT - 1;

/// Nationalities too common on MLB rosters to make an interesting question
pub const TOO_COMMON_NATIONALITIES: &[&str] = &["China", "United States", "Canada"];

const NATIONALITY_POOL: &[&str] = &["United States", "Canada", "Mexico", "Japan"];

// A real birth date equal to one of these is filtered out of the pool like any
// other correct value, leaving three placeholders.
const BIRTH_DATE_POOL: &[&str] = &["1990-01-01", "1985-05-05", "1992-10-10", "1998-07-07"];

const POSITION_POOL: &[&str] = &["Catcher", "Pitcher", "First Base", "Outfielder", "Shortstop"];

const HONOR_POOL: &[&str] = &[
    "World Series MVP",
    "Cy Young",
    "Rookie of the Year",
    "Rawlings Gold Glove Award",
    "Silver Slugger Award",
];

pub const WHO_IS_THIS: &str = "Who is this player?";

/// Kinds of single-fact questions a player can support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    Nationality,
    BirthDate,
    Position,
    FormerTeam,
    Honor,
}

/// Everything looked up about one player for fact questions
#[derive(Debug, Clone, Default)]
pub struct PlayerDossier {
    pub name: String,
    pub headshot_url: Option<String>,
    pub info: PlayerInfo,
    pub former_teams: Vec<FormerTeam>,
    pub honors: Vec<Honor>,
    /// Names of every team in the league, for former-team decoys
    pub team_names: Vec<String>,
}

/// Gather the facts for `player`. `None` when the facts service has no record.
pub async fn fetch_dossier(
    player: &RosterPlayer,
    facts: &dyn PlayerFacts,
    store: &dyn RosterStore,
) -> Option<PlayerDossier> {
    let info = match facts.player_info(&player.name).await {
        Ok(Some(info)) => info,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Player info lookup failed for {}: {}", player.name, e);
            return None;
        }
    };

    let former_teams = facts.former_teams(&info.id).await.unwrap_or_else(|e| {
        tracing::warn!("Former team lookup failed for {}: {}", player.name, e);
        Vec::new()
    });

    let honors = facts.honors(&info.id).await.unwrap_or_else(|e| {
        tracing::warn!("Honors lookup failed for {}: {}", player.name, e);
        Vec::new()
    });

    let team_names = if former_teams.iter().any(|t| t.former_team.is_some()) {
        match store.all_teams().await {
            Ok(teams) => teams.into_iter().map(|t| t.name).collect(),
            Err(e) => {
                tracing::warn!("Team list unavailable for former-team decoys: {}", e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Some(PlayerDossier {
        name: player.name.clone(),
        headshot_url: player.headshot_url.clone(),
        info,
        former_teams,
        honors,
        team_names,
    })
}

/// Build every fact question the dossier supports, at most one per [`FactKind`]
pub fn basic_questions<R: Rng + ?Sized>(
    dossier: &PlayerDossier,
    rng: &mut R,
) -> Vec<(FactKind, TriviaQuestion)> {
    let name = &dossier.name;
    let mut questions = Vec::new();

    if let Some(nationality) = dossier
        .info
        .nationality
        .as_deref()
        .filter(|n| !TOO_COMMON_NATIONALITIES.contains(n))
    {
        push_pooled(
            &mut questions,
            FactKind::Nationality,
            format!("What is {}'s nationality?", name),
            nationality,
            NATIONALITY_POOL,
            dossier,
            rng,
        );
    }

    if let Some(birth_date) = dossier.info.birth_date.as_deref() {
        push_pooled(
            &mut questions,
            FactKind::BirthDate,
            format!("When was {} born?", name),
            birth_date,
            BIRTH_DATE_POOL,
            dossier,
            rng,
        );
    }

    if let Some(position) = dossier.info.position.as_deref() {
        push_pooled(
            &mut questions,
            FactKind::Position,
            format!("What position does {} play?", name),
            position,
            POSITION_POOL,
            dossier,
            rng,
        );
    }

    if let Some(former) = dossier
        .former_teams
        .iter()
        .find_map(|t| t.former_team.as_deref())
    {
        let pool: Vec<&str> = dossier.team_names.iter().map(String::as_str).collect();
        match sample_distractors(&pool, former, DISTRACTOR_COUNT, rng) {
            Some(decoys) => {
                if let Some(q) = assemble(
                    format!("Which team did {} formerly play for?", name),
                    former,
                    decoys,
                    dossier.headshot_url.clone(),
                    rng,
                ) {
                    questions.push((FactKind::FormerTeam, q));
                }
            }
            None => tracing::debug!("Not enough teams to quiz {} on former teams", name),
        }
    }

    if let Some(honor) = dossier.honors.first().and_then(|h| h.honor.as_deref()) {
        push_pooled(
            &mut questions,
            FactKind::Honor,
            format!("What honor has {} received?", name),
            honor,
            HONOR_POOL,
            dossier,
            rng,
        );
    }

    questions
}

/// Look the player up and build their fact questions
pub async fn basic_questions_for<R: Rng + Send + ?Sized>(
    player: &RosterPlayer,
    facts: &dyn PlayerFacts,
    store: &dyn RosterStore,
    rng: &mut R,
) -> Vec<(FactKind, TriviaQuestion)> {
    match fetch_dossier(player, facts, store).await {
        Some(dossier) => basic_questions(&dossier, rng),
        None => Vec::new(),
    }
}

/// "Who is this player?" from four distinct names on `roster`
///
/// The answer's headshot is the visual aid; the other three names are real
/// teammates. `None` when fewer than four distinct names are available.
pub fn roster_identification<R: Rng + ?Sized>(
    roster: &[RosterPlayer],
    rng: &mut R,
) -> Option<TriviaQuestion> {
    let mut distinct: Vec<&RosterPlayer> = Vec::with_capacity(roster.len());
    for player in roster {
        if !distinct.iter().any(|p| p.name == player.name) {
            distinct.push(player);
        }
    }

    if distinct.len() < CHOICE_COUNT {
        return None;
    }

    let picked: Vec<&RosterPlayer> = distinct
        .choose_multiple(rng, CHOICE_COUNT)
        .copied()
        .collect();
    let answer = picked[0];

    assemble(
        WHO_IS_THIS.to_string(),
        &answer.name,
        picked[1..].iter().map(|p| p.name.clone()).collect(),
        answer.headshot_url.clone(),
        rng,
    )
}

/// Fetch the team roster and build a roster-identification question
pub async fn roster_identification_for<R: Rng + Send + ?Sized>(
    team_id: TeamId,
    store: &dyn RosterStore,
    rng: &mut R,
) -> Option<TriviaQuestion> {
    match store.players_by_team(team_id).await {
        Ok(roster) => roster_identification(&roster, rng),
        Err(e) => {
            tracing::warn!("Roster lookup failed for team {}: {}", team_id, e);
            None
        }
    }
}

fn push_pooled<R: Rng + ?Sized>(
    questions: &mut Vec<(FactKind, TriviaQuestion)>,
    kind: FactKind,
    text: String,
    correct: &str,
    pool: &[&str],
    dossier: &PlayerDossier,
    rng: &mut R,
) {
    let Some(decoys) = sample_distractors(pool, correct, DISTRACTOR_COUNT, rng) else {
        return;
    };

    if let Some(q) = assemble(text, correct, decoys, dossier.headshot_url.clone(), rng) {
        questions.push((kind, q));
    }
}

fn assemble<R: Rng + ?Sized>(
    text: String,
    correct: &str,
    mut choices: Vec<String>,
    image_url: Option<String>,
    rng: &mut R,
) -> Option<TriviaQuestion> {
    choices.push(correct.to_string());

    match TriviaQuestion::new(text, correct, choices, image_url, rng) {
        Ok(q) => Some(q),
        Err(e) => {
            tracing::error!("Discarding malformed trivia question: {}", e);
            debug_assert!(false, "malformed trivia question: {e}");
            None
        }
    }
}
