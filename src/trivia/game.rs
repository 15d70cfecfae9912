//! Game state machine
//!
//! One [`GameSession`] per player session. The session is plain data owned by
//! the caller; [`TriviaGame`] draws questions into it from the roster store
//! and facts service.
//!
//! Phases run `AwaitingQuestion -> InPlay -> Answered -> (InPlay | GameOver)`.
//! The game ends after [`MAX_STRIKES`] wrong answers or [`MAX_PITCHES`] questions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::question::TriviaQuestion;
use super::selector::select_question;
use crate::facts::PlayerFacts;
use crate::roster::{RosterStore, StoreError};
use crate::types::TeamId;

pub const MAX_PITCHES: u32 = 5;
pub const MAX_STRIKES: u32 = 3;

pub const AT_BAT: &str = "At bat...";
pub const STRUCK_OUT: &str = "Three Strikes - You're OUT!";

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Trivia game unable to load; please retry")]
    NoQuestionAvailable,

    #[error("The game is over")]
    GameOver,

    #[error("No question is in play")]
    NoQuestionInPlay,

    #[error("The current question has not been answered yet")]
    NotAnswered,

    #[error("A question is already in play")]
    QuestionInPlay,

    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("Roster store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    AwaitingQuestion,
    InPlay,
    Answered,
    GameOver,
}

/// Result of submitting an answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    /// The question had already been scored; counters were left untouched
    pub already_scored: bool,
    pub game_over: bool,
}

/// Per-session game progress
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    team_id: TeamId,
    pitches: u32,
    strikes: u32,
    bases: u32,
    status: String,
    current_question: Option<TriviaQuestion>,
    answered: bool,
    scored: bool,
    last_correct: bool,
    started_at: String,
}

impl GameSession {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            pitches: 0,
            strikes: 0,
            bases: 0,
            status: AT_BAT.to_string(),
            current_question: None,
            answered: false,
            scored: false,
            last_correct: false,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn pitches(&self) -> u32 {
        self.pitches
    }

    pub fn pitches_remaining(&self) -> u32 {
        MAX_PITCHES.saturating_sub(self.pitches)
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn bases(&self) -> u32 {
        self.bases
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn current_question(&self) -> Option<&TriviaQuestion> {
        self.current_question.as_ref()
    }

    pub fn answered(&self) -> bool {
        self.answered
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    pub fn is_game_over(&self) -> bool {
        self.strikes >= MAX_STRIKES || self.pitches >= MAX_PITCHES
    }

    pub fn phase(&self) -> GamePhase {
        match &self.current_question {
            Some(_) if !self.answered => GamePhase::InPlay,
            _ if self.is_game_over() => GamePhase::GameOver,
            Some(_) => GamePhase::Answered,
            None => GamePhase::AwaitingQuestion,
        }
    }

    /// Put a freshly drawn question in play. Counts as a pitch even when the
    /// draw came back empty.
    fn record_draw(&mut self, question: Option<TriviaQuestion>) {
        self.pitches += 1;
        self.current_question = question;
        self.answered = false;
        self.scored = false;
        self.last_correct = false;
    }

    /// Score `candidate` against the current question.
    ///
    /// Only the first submission per question counts; later ones report the
    /// original outcome with `already_scored` set.
    pub fn submit_answer(&mut self, candidate: &str) -> Result<AnswerOutcome, GameError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or(GameError::NoQuestionInPlay)?;
        let correct_answer = question.correct_answer().to_string();

        if self.scored {
            return Ok(AnswerOutcome {
                correct: self.last_correct,
                correct_answer,
                already_scored: true,
                game_over: self.is_game_over(),
            });
        }

        let correct = question.is_correct(candidate);
        if correct {
            self.bases += 1;
        } else {
            self.strikes += 1;
        }
        self.answered = true;
        self.scored = true;
        self.last_correct = correct;

        tracing::info!(
            "Team {} pitch {}: {} (bases={}, strikes={})",
            self.team_id,
            self.pitches,
            if correct { "hit" } else { "strike" },
            self.bases,
            self.strikes
        );

        let game_over = self.is_game_over();
        if game_over {
            self.finalize_status();
            tracing::info!("Team {} game over: {}", self.team_id, self.status);
        }

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            already_scored: false,
            game_over,
        })
    }

    /// Clear the answered question so the next one can be drawn
    pub fn advance_to_next_question(&mut self) -> Result<(), GameError> {
        match self.phase() {
            GamePhase::GameOver => Err(GameError::GameOver),
            GamePhase::InPlay => Err(GameError::NotAnswered),
            GamePhase::Answered | GamePhase::AwaitingQuestion => {
                self.current_question = None;
                self.answered = false;
                self.scored = false;
                Ok(())
            }
        }
    }

    /// Set the closing status from the final counters
    pub fn finalize_status(&mut self) -> &str {
        self.status = if self.strikes == MAX_STRIKES {
            STRUCK_OUT.to_string()
        } else {
            grade(self.bases).to_string()
        };
        &self.status
    }

    /// Back to the pre-start condition for the same team
    pub fn reset_game(&mut self) {
        tracing::info!("Resetting game for team {}", self.team_id);
        *self = Self::new(self.team_id);
    }
}

fn grade(bases: u32) -> &'static str {
    match bases {
        1 => "Single! You got 1 correct!",
        2 => "Double! You got 2 correct!",
        3 => "Triple! You got 3 correct!",
        4 => "Home Run! You got 4 correct!",
        5 => "Grand Slam! All 5 correct!",
        _ => "Game Over!",
    }
}

/// Draws questions for game sessions
#[derive(Clone)]
pub struct TriviaGame {
    store: Arc<dyn RosterStore>,
    facts: Arc<dyn PlayerFacts>,
}

impl TriviaGame {
    pub fn new(store: Arc<dyn RosterStore>, facts: Arc<dyn PlayerFacts>) -> Self {
        Self { store, facts }
    }

    pub fn store(&self) -> &Arc<dyn RosterStore> {
        &self.store
    }

    pub fn facts(&self) -> &Arc<dyn PlayerFacts> {
        &self.facts
    }

    /// Start a game for `team_id` with its first question already drawn
    pub async fn start_game<R: Rng + Send + ?Sized>(
        &self,
        team_id: TeamId,
        rng: &mut R,
    ) -> Result<GameSession, GameError> {
        if self.store.team_by_id(team_id).await?.is_none() {
            return Err(GameError::UnknownTeam(team_id));
        }

        let mut session = GameSession::new(team_id);
        self.start_new_question(&mut session, rng).await?;

        tracing::info!("Started trivia game for team {}", team_id);
        Ok(session)
    }

    /// Draw the next question into `session`
    pub async fn start_new_question<R: Rng + Send + ?Sized>(
        &self,
        session: &mut GameSession,
        rng: &mut R,
    ) -> Result<(), GameError> {
        match session.phase() {
            GamePhase::GameOver => return Err(GameError::GameOver),
            GamePhase::InPlay | GamePhase::Answered => return Err(GameError::QuestionInPlay),
            GamePhase::AwaitingQuestion => {}
        }

        let question =
            select_question(session.team_id, self.store.as_ref(), self.facts.as_ref(), rng).await;
        let drawn = question.is_some();
        session.record_draw(question);

        if drawn {
            Ok(())
        } else {
            tracing::warn!(
                "No trivia question available for team {} (pitch {})",
                session.team_id,
                session.pitches
            );
            // A failed final draw still uses up the last pitch
            if session.is_game_over() {
                session.finalize_status();
                tracing::info!("Team {} game over: {}", session.team_id, session.status);
            }
            Err(GameError::NoQuestionAvailable)
        }
    }
}
