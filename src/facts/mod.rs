mod sportsdb;

use async_trait::async_trait;
use std::time::Duration;

use crate::types::{FormerTeam, Honor, PlayerInfo};

pub use sportsdb::SportsDbClient;

/// Result type for player facts lookups
pub type FactsResult<T> = Result<T, FactsError>;

/// Errors that can occur while talking to the facts service
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Facts service returned status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Response parsing failed: {0}")]
    Parse(String),
}

/// Remote, read-only source of extended player facts
#[async_trait]
pub trait PlayerFacts: Send + Sync {
    /// Look a player up by display name. `None` when unknown.
    async fn player_info(&self, name: &str) -> FactsResult<Option<PlayerInfo>>;

    async fn former_teams(&self, player_id: &str) -> FactsResult<Vec<FormerTeam>>;

    async fn honors(&self, player_id: &str) -> FactsResult<Vec<Honor>>;
}

/// Configuration for the sports facts service
#[derive(Debug, Clone)]
pub struct SportsDbConfig {
    /// Base URL including API version and key, without trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SportsDbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.thesportsdb.com/api/v1/json/3".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl SportsDbConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("SPORTSDB_BASE_URL")
            .ok()
            .and_then(|url| {
                let trimmed = url.trim().trim_end_matches('/');
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            timeout: std::env::var("SPORTSDB_TIMEOUT")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
