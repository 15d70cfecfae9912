// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod facts;
pub mod llm;
pub mod roster;
pub mod scouting;
pub mod state;
pub mod trivia;
pub mod types;
pub mod umpire;
