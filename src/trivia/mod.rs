//! Baseball trivia: question generation and the per-session game

pub mod bank;
pub mod game;
pub mod question;
pub mod selector;

#[cfg(test)]
pub(crate) mod testing;

pub use game::{AnswerOutcome, GameError, GamePhase, GameSession, TriviaGame};
pub use question::{QuestionError, TriviaQuestion, TriviaRecord};
pub use selector::{select_question, Strategy};
