use super::*;
use serde::{de::DeserializeOwned, Deserialize};

/// TheSportsDB client
pub struct SportsDbClient {
    base_url: String,
    client: reqwest::Client,
}

impl SportsDbClient {
    pub fn new(config: &SportsDbConfig) -> FactsResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> FactsResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(FactsError::Status(response.status()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FactsError::Parse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchPlayersResponse {
    #[serde(default)]
    player: Option<Vec<SportsDbPlayer>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SportsDbPlayer {
    id_player: Option<String>,
    str_sport: Option<String>,
    str_nationality: Option<String>,
    date_born: Option<String>,
    str_position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormerTeamsResponse {
    #[serde(default, rename = "formerteams")]
    former_teams: Option<Vec<SportsDbFormerTeam>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SportsDbFormerTeam {
    str_former_team: Option<String>,
    str_move_type: Option<String>,
    str_joined: Option<String>,
    str_departed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HonoursResponse {
    #[serde(default)]
    honours: Option<Vec<SportsDbHonour>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SportsDbHonour {
    str_team: Option<String>,
    str_honour: Option<String>,
    str_season: Option<String>,
}

/// Blank strings upstream mean "not recorded"
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Only the first search hit is considered, and only if it is a baseball player
fn first_baseball_player(response: SearchPlayersResponse) -> Option<PlayerInfo> {
    let player = response.player?.into_iter().next()?;
    if player.str_sport.as_deref() != Some("Baseball") {
        return None;
    }

    Some(PlayerInfo {
        id: non_blank(player.id_player)?,
        nationality: non_blank(player.str_nationality),
        birth_date: non_blank(player.date_born),
        position: non_blank(player.str_position),
    })
}

impl From<SportsDbFormerTeam> for FormerTeam {
    fn from(team: SportsDbFormerTeam) -> Self {
        Self {
            former_team: non_blank(team.str_former_team),
            move_type: team.str_move_type,
            joined: team.str_joined,
            departed: team.str_departed,
        }
    }
}

impl From<SportsDbHonour> for Honor {
    fn from(honour: SportsDbHonour) -> Self {
        Self {
            team: honour.str_team,
            honor: non_blank(honour.str_honour),
            year: honour.str_season,
        }
    }
}

#[async_trait]
impl PlayerFacts for SportsDbClient {
    async fn player_info(&self, name: &str) -> FactsResult<Option<PlayerInfo>> {
        let search_name = name.replace(' ', "_");
        let response: SearchPlayersResponse = self
            .get_json("searchplayers.php", &[("p", search_name.as_str())])
            .await?;

        let info = first_baseball_player(response);
        if info.is_none() {
            tracing::debug!("No baseball player found for {}", name);
        }
        Ok(info)
    }

    async fn former_teams(&self, player_id: &str) -> FactsResult<Vec<FormerTeam>> {
        let response: FormerTeamsResponse = self
            .get_json("lookupformerteams.php", &[("id", player_id)])
            .await?;

        Ok(response
            .former_teams
            .unwrap_or_default()
            .into_iter()
            .map(FormerTeam::from)
            .collect())
    }

    async fn honors(&self, player_id: &str) -> FactsResult<Vec<Honor>> {
        let response: HonoursResponse = self
            .get_json("lookuphonours.php", &[("id", player_id)])
            .await?;

        Ok(response
            .honours
            .unwrap_or_default()
            .into_iter()
            .map(Honor::from)
            .collect())
    }
}
