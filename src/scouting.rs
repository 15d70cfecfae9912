//! Team and player information pages
//!
//! Read-only views over the roster store and the facts service: team
//! details, a player's profile, and jersey number lookups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::facts::{FactsResult, PlayerFacts};
use crate::roster::{RosterStore, StoreResult};
use crate::types::{FormerTeam, Honor, PlayerInfo, Team};

/// Highest number a jersey lookup accepts
pub const MAX_JERSEY_NUMBER: u32 = 99;

const TEAM_PAGE_BASE: &str = "https://www.mlb.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamInfo {
    #[serde(flatten)]
    pub team: Team,
    pub team_page_url: Option<String>,
}

impl From<Team> for TeamInfo {
    fn from(team: Team) -> Self {
        let team_page_url = team
            .team_ext
            .as_deref()
            .map(|ext| format!("{}/{}", TEAM_PAGE_BASE, ext.trim_start_matches('/')));
        Self {
            team,
            team_page_url,
        }
    }
}

/// Everything the facts service knows about one player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerProfile {
    pub name: String,
    pub info: PlayerInfo,
    pub honors: Vec<Honor>,
    pub former_teams: Vec<FormerTeam>,
}

/// Look up a player's profile. `None` when the facts service has no record.
///
/// Only the player lookup itself is fatal; a failed honors or former team
/// lookup leaves that list empty.
pub async fn player_profile(
    name: &str,
    facts: &dyn PlayerFacts,
) -> FactsResult<Option<PlayerProfile>> {
    let Some(info) = facts.player_info(name).await? else {
        tracing::debug!("No facts on record for {}", name);
        return Ok(None);
    };

    let honors = facts.honors(&info.id).await.unwrap_or_else(|e| {
        tracing::warn!("Honors lookup failed for {}: {}", name, e);
        Vec::new()
    });
    let former_teams = facts.former_teams(&info.id).await.unwrap_or_else(|e| {
        tracing::warn!("Former team lookup failed for {}: {}", name, e);
        Vec::new()
    });

    Ok(Some(PlayerProfile {
        name: name.to_string(),
        info,
        honors,
        former_teams,
    }))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct JerseyCount {
    pub number: u32,
    pub players: usize,
}

/// A player wearing a given number, with their team
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JerseyHolder {
    pub name: String,
    pub jersey_number: String,
    pub headshot_url: Option<String>,
    pub team_name: String,
}

fn jersey_value(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|n| n.trim().parse().ok())
}

/// How many players wear each number, ascending by number.
/// Non-numeric and missing jersey numbers are skipped.
pub async fn jersey_distribution(store: &dyn RosterStore) -> StoreResult<Vec<JerseyCount>> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();

    for team in store.all_teams().await? {
        for player in store.players_by_team(team.id).await? {
            if let Some(number) = jersey_value(player.jersey_number.as_deref()) {
                *counts.entry(number).or_default() += 1;
            }
        }
    }

    Ok(counts
        .into_iter()
        .map(|(number, players)| JerseyCount { number, players })
        .collect())
}

/// Every player wearing `number`, teams in name order
pub async fn players_by_jersey(
    store: &dyn RosterStore,
    number: u32,
) -> StoreResult<Vec<JerseyHolder>> {
    let mut holders = Vec::new();

    for team in store.all_teams().await? {
        for player in store.players_by_team(team.id).await? {
            if jersey_value(player.jersey_number.as_deref()) != Some(number) {
                continue;
            }
            holders.push(JerseyHolder {
                name: player.name,
                jersey_number: player.jersey_number.unwrap_or_default(),
                headshot_url: player.headshot_url,
                team_name: team.name.clone(),
            });
        }
    }

    Ok(holders)
}
