//! Roster data access
//!
//! Read-only lookups for teams and their players. The service ships with a
//! JSON snapshot backend; anything that can answer these three queries can
//! stand in for it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{RosterPlayer, Team, TeamId};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read roster snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse roster snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Roster store unavailable: {0}")]
    Unavailable(String),
}

/// Read interface over the team/player tables
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// All teams, ordered by name
    async fn all_teams(&self) -> StoreResult<Vec<Team>>;

    async fn team_by_id(&self, id: TeamId) -> StoreResult<Option<Team>>;

    async fn players_by_team(&self, id: TeamId) -> StoreResult<Vec<RosterPlayer>>;
}

/// On-disk layout of a roster snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub players: Vec<RosterPlayer>,
}

/// Roster store serving a snapshot from memory
#[derive(Debug, Clone, Default)]
pub struct JsonRosterStore {
    snapshot: RosterSnapshot,
}

impl JsonRosterStore {
    pub fn new(mut snapshot: RosterSnapshot) -> Self {
        snapshot.teams.sort_by(|a, b| a.name.cmp(&b.name));
        Self { snapshot }
    }

    /// Load a snapshot file written by the roster scraper
    pub async fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let snapshot: RosterSnapshot = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded roster snapshot from {}: {} teams, {} players",
            path.as_ref().display(),
            snapshot.teams.len(),
            snapshot.players.len()
        );

        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl RosterStore for JsonRosterStore {
    async fn all_teams(&self) -> StoreResult<Vec<Team>> {
        Ok(self.snapshot.teams.clone())
    }

    async fn team_by_id(&self, id: TeamId) -> StoreResult<Option<Team>> {
        Ok(self.snapshot.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn players_by_team(&self, id: TeamId) -> StoreResult<Vec<RosterPlayer>> {
        Ok(self
            .snapshot
            .players
            .iter()
            .filter(|p| p.team_id == id)
            .cloned()
            .collect())
    }
}
