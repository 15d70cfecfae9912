//! "Ask the umpire" chat assistant
//!
//! Wraps the hosted model with a system prompt listing every team and player
//! on record, so answers about current rosters come from our data.

use chrono::Datelike;
use std::sync::Arc;

use crate::llm::{ChatMessage, ChatRequest, LlmConfig, LlmProvider, LlmResult};
use crate::roster::{RosterStore, StoreResult};

pub const GREETING: &str = "HI! I am a MLB Chat Bot Umpire. Do you have any baseball questions?";

pub struct Umpire {
    provider: Box<dyn LlmProvider>,
    store: Arc<dyn RosterStore>,
    config: LlmConfig,
}

impl Umpire {
    pub fn new(provider: Box<dyn LlmProvider>, store: Arc<dyn RosterStore>, config: LlmConfig) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Reply to the conversation so far. An empty conversation gets the greeting.
    pub async fn reply(&self, history: &[ChatMessage]) -> LlmResult<String> {
        if history.is_empty() {
            return Ok(GREETING.to_string());
        }

        let digest = match roster_digest(self.store.as_ref()).await {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!("Roster unavailable for umpire prompt: {}", e);
                String::new()
            }
        };

        let request = ChatRequest {
            system: system_prompt(chrono::Utc::now().year(), &digest),
            messages: history.to_vec(),
            max_tokens: Some(self.config.default_max_tokens),
            timeout: self.config.default_timeout,
        };

        let response = self.provider.complete(request).await?;
        tracing::info!(
            "Umpire replied via {} ({}) in {}ms, tokens={:?}",
            response.metadata.provider,
            response.metadata.model,
            response.metadata.latency_ms,
            response.metadata.tokens_used
        );

        Ok(response.text)
    }
}

fn system_prompt(year: i32, digest: &str) -> String {
    format!(
        "You are an AI Bot posed as an Umpire to answer a fan's questions on the MLB \
         and sport of baseball. It's {}. Here is the current list of teams and players:\n\
         {}USE THIS DATA",
        year, digest
    )
}

/// One `Team: X, Player: Y` line per player, teams in name order
pub async fn roster_digest(store: &dyn RosterStore) -> StoreResult<String> {
    let mut digest = String::new();

    for team in store.all_teams().await? {
        let mut players = store.players_by_team(team.id).await?;
        if players.is_empty() {
            digest.push_str(&format!("Team: {}, Player: None\n", team.name));
            continue;
        }
        players.sort_by(|a, b| a.name.cmp(&b.name));
        for player in players {
            digest.push_str(&format!("Team: {}, Player: {}\n", team.name, player.name));
        }
    }

    Ok(digest)
}
