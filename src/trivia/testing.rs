//! In-memory stand-ins for the roster store and facts service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::facts::{FactsError, FactsResult, PlayerFacts};
use crate::roster::{StoreError, StoreResult, RosterStore};
use crate::types::{FormerTeam, Honor, PlayerInfo, RosterPlayer, Team, TeamId};

pub fn player(team_id: TeamId, name: &str) -> RosterPlayer {
    RosterPlayer {
        team_id,
        name: name.to_string(),
        jersey_number: None,
        headshot_url: Some(format!("https://img/{}.png", name)),
    }
}

pub fn roster(team_id: TeamId, names: &[&str]) -> Vec<RosterPlayer> {
    names.iter().map(|name| player(team_id, name)).collect()
}

pub struct StaticRoster {
    teams: Vec<Team>,
    players: Vec<RosterPlayer>,
    failing: bool,
    roster_outage_after: Option<usize>,
    roster_calls: AtomicUsize,
}

impl StaticRoster {
    /// One team per distinct `team_id` among `players`, named "Team <id>"
    pub fn new(players: Vec<RosterPlayer>) -> Self {
        let mut teams: Vec<Team> = Vec::new();
        for p in &players {
            if !teams.iter().any(|t| t.id == p.team_id) {
                teams.push(Team {
                    id: p.team_id,
                    name: format!("Team {}", p.team_id),
                    logo_url: None,
                    stadium: None,
                    stadium_addr: None,
                    phone: None,
                    team_ext: None,
                });
            }
        }
        Self {
            teams,
            players,
            failing: false,
            roster_outage_after: None,
            roster_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new(Vec::new())
        }
    }

    /// Roster lookups succeed `calls` times, then fail
    pub fn with_roster_outage_after(mut self, calls: usize) -> Self {
        self.roster_outage_after = Some(calls);
        self
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing {
            Err(StoreError::Unavailable("database is locked".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RosterStore for StaticRoster {
    async fn all_teams(&self) -> StoreResult<Vec<Team>> {
        self.check()?;
        Ok(self.teams.clone())
    }

    async fn team_by_id(&self, id: TeamId) -> StoreResult<Option<Team>> {
        self.check()?;
        Ok(self.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn players_by_team(&self, id: TeamId) -> StoreResult<Vec<RosterPlayer>> {
        self.check()?;
        let call = self.roster_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.roster_outage_after.is_some_and(|limit| call > limit) {
            return Err(StoreError::Unavailable("roster table offline".to_string()));
        }
        Ok(self.players.iter().filter(|p| p.team_id == id).cloned().collect())
    }
}

/// Facts service answering from fixed tables
#[derive(Default)]
pub struct ScriptedFacts {
    info: HashMap<String, PlayerInfo>,
    former_teams: HashMap<String, Vec<FormerTeam>>,
    honors: HashMap<String, Vec<Honor>>,
    failing: bool,
    failing_history: bool,
    info_calls: AtomicUsize,
}

impl ScriptedFacts {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_info(mut self, name: &str, info: PlayerInfo) -> Self {
        self.info.insert(name.to_string(), info);
        self
    }

    pub fn with_former_teams(mut self, player_id: &str, teams: Vec<FormerTeam>) -> Self {
        self.former_teams.insert(player_id.to_string(), teams);
        self
    }

    pub fn with_honors(mut self, player_id: &str, honors: Vec<Honor>) -> Self {
        self.honors.insert(player_id.to_string(), honors);
        self
    }

    /// Former team and honor lookups fail while player info still resolves
    pub fn with_failing_history(mut self) -> Self {
        self.failing_history = true;
        self
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    fn outage() -> FactsError {
        FactsError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[async_trait]
impl PlayerFacts for ScriptedFacts {
    async fn player_info(&self, name: &str) -> FactsResult<Option<PlayerInfo>> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Self::outage());
        }
        Ok(self.info.get(name).cloned())
    }

    async fn former_teams(&self, player_id: &str) -> FactsResult<Vec<FormerTeam>> {
        if self.failing || self.failing_history {
            return Err(Self::outage());
        }
        Ok(self.former_teams.get(player_id).cloned().unwrap_or_default())
    }

    async fn honors(&self, player_id: &str) -> FactsResult<Vec<Honor>> {
        if self.failing || self.failing_history {
            return Err(Self::outage());
        }
        Ok(self.honors.get(player_id).cloned().unwrap_or_default())
    }
}
