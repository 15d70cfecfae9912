mod session;

pub use session::{spawn_session_sweeper, TrackedSession};

use crate::facts::PlayerFacts;
use crate::llm::{LlmConfig, LlmProvider};
use crate::roster::RosterStore;
use crate::trivia::{GameError, TriviaGame};
use crate::types::SessionId;
use crate::umpire::Umpire;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown game session: {0}")]
    NotFound(SessionId),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub game: TriviaGame,
    /// One lock per session so a slow question draw only blocks its own session
    pub sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<TrackedSession>>>>>,
    /// None when no model is configured
    pub umpire: Option<Arc<Umpire>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RosterStore>, facts: Arc<dyn PlayerFacts>) -> Self {
        Self {
            game: TriviaGame::new(store, facts),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            umpire: None,
        }
    }

    /// Create state with the umpire assistant enabled
    pub fn new_with_llm(
        store: Arc<dyn RosterStore>,
        facts: Arc<dyn PlayerFacts>,
        provider: Option<Box<dyn LlmProvider>>,
        llm_config: LlmConfig,
    ) -> Self {
        let mut state = Self::new(store.clone(), facts);
        state.umpire = provider.map(|p| Arc::new(Umpire::new(p, store, llm_config)));
        state
    }

    pub fn store(&self) -> &Arc<dyn RosterStore> {
        self.game.store()
    }

    pub fn facts(&self) -> &Arc<dyn PlayerFacts> {
        self.game.facts()
    }
}
