use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::bank::{basic_questions_for, roster_identification};
use super::question::TriviaQuestion;
use crate::facts::PlayerFacts;
use crate::roster::RosterStore;
use crate::types::TeamId;

/// Ways of producing a question for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    RosterIdentification,
    BasicFact,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::RosterIdentification, Strategy::BasicFact];
}

/// Pick one question for `team_id`.
///
/// A random player is drawn from the roster, then both strategies are tried
/// in random order until one produces a question. `None` only when the
/// roster is empty or every strategy came back empty.
pub async fn select_question<R: Rng + Send + ?Sized>(
    team_id: TeamId,
    store: &dyn RosterStore,
    facts: &dyn PlayerFacts,
    rng: &mut R,
) -> Option<TriviaQuestion> {
    let roster = match store.players_by_team(team_id).await {
        Ok(roster) => roster,
        Err(e) => {
            tracing::warn!("Roster lookup failed for team {}: {}", team_id, e);
            return None;
        }
    };

    let Some(player) = roster.choose(rng).cloned() else {
        tracing::warn!("Team {} has no players to quiz on", team_id);
        return None;
    };

    let mut order = Strategy::ALL;
    order.shuffle(rng);

    for strategy in order {
        let question = match strategy {
            Strategy::RosterIdentification => roster_identification(&roster, rng),
            Strategy::BasicFact => {
                let mut questions = basic_questions_for(&player, facts, store, rng).await;
                if questions.is_empty() {
                    None
                } else {
                    let pick = rng.random_range(0..questions.len());
                    Some(questions.swap_remove(pick).1)
                }
            }
        };

        match question {
            Some(q) => {
                tracing::debug!("Team {}: {:?} produced \"{}\"", team_id, strategy, q.question());
                return Some(q);
            }
            None => tracing::debug!("Team {}: {:?} produced nothing", team_id, strategy),
        }
    }

    None
}
