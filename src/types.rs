use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type TeamId = i64;
pub type SessionId = String;
pub type SportsDbPlayerId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub stadium: Option<String>,
    #[serde(default)]
    pub stadium_addr: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Path segment of the team page the roster was scraped from
    #[serde(default)]
    pub team_ext: Option<String>,
}

/// A player as listed on a team roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterPlayer {
    pub team_id: TeamId,
    pub name: String,
    #[serde(default)]
    pub jersey_number: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<String>,
}

/// Extended facts about a player from the sports facts service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerInfo {
    pub id: SportsDbPlayerId,
    pub nationality: Option<String>,
    /// As reported upstream, usually `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormerTeam {
    pub former_team: Option<String>,
    pub move_type: Option<String>,
    pub joined: Option<String>,
    pub departed: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Honor {
    pub team: Option<String>,
    pub honor: Option<String>,
    pub year: Option<String>,
}
