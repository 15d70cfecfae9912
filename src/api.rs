//! HTTP API endpoints for the trivia game and the umpire assistant.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::facts::FactsError;
use crate::llm::{ChatMessage, ChatRole, LlmError};
use crate::roster::StoreError;
use crate::scouting::{self, JerseyCount, JerseyHolder, PlayerProfile, TeamInfo, MAX_JERSEY_NUMBER};
use crate::state::{AppState, SessionError};
use crate::trivia::{AnswerOutcome, GameError, GamePhase, GameSession};
use crate::types::{RosterPlayer, SessionId, Team, TeamId};

/// Errors returned to HTTP clients as `{code, msg}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown team: {0}")]
    TeamNotFound(TeamId),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("No facts on record for {0}")]
    PlayerNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Player facts unavailable: {0}")]
    Facts(#[from] FactsError),

    #[error("The umpire is not available right now")]
    UmpireUnavailable,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::TeamNotFound(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TEAM"),
            ApiError::Session(SessionError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_SESSION")
            }
            ApiError::Session(SessionError::Game(e)) => match e {
                GameError::UnknownTeam(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TEAM"),
                GameError::NoQuestionAvailable => {
                    (StatusCode::SERVICE_UNAVAILABLE, "NO_QUESTION_AVAILABLE")
                }
                GameError::StoreUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
                }
                GameError::GameOver => (StatusCode::CONFLICT, "GAME_OVER"),
                GameError::NoQuestionInPlay => (StatusCode::CONFLICT, "NO_QUESTION_IN_PLAY"),
                GameError::NotAnswered => (StatusCode::CONFLICT, "NOT_ANSWERED"),
                GameError::QuestionInPlay => (StatusCode::CONFLICT, "QUESTION_IN_PLAY"),
            },
            ApiError::PlayerNotFound(_) => (StatusCode::NOT_FOUND, "UNKNOWN_PLAYER"),
            ApiError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            ApiError::Facts(_) => (StatusCode::SERVICE_UNAVAILABLE, "FACTS_UNAVAILABLE"),
            ApiError::UmpireUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "UMPIRE_UNAVAILABLE"),
            ApiError::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "UMPIRE_FAILED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}: {}", code, self);
        } else {
            tracing::debug!("{}: {}", code, self);
        }

        let body = ErrorBody {
            code: code.to_string(),
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Question as shown to the player. The answer stays hidden until scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionView {
    pub question: String,
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameView {
    pub session_id: SessionId,
    pub team_id: TeamId,
    pub phase: GamePhase,
    pub pitches: u32,
    pub pitches_remaining: u32,
    pub strikes: u32,
    pub bases: u32,
    pub status: String,
    pub question: Option<QuestionView>,
    pub started_at: String,
}

impl GameView {
    pub fn new(session_id: SessionId, session: &GameSession) -> Self {
        let question = session.current_question().map(|q| {
            let record = q.to_record();
            QuestionView {
                question: record.question,
                choices: record.choices,
                image_url: record.image_url,
                correct_answer: session.answered().then_some(record.correct_answer),
            }
        });

        Self {
            session_id,
            team_id: session.team_id(),
            phase: session.phase(),
            pitches: session.pitches(),
            pitches_remaining: session.pitches_remaining(),
            strikes: session.strikes(),
            bases: session.bases(),
            status: session.status().to_string(),
            question,
            started_at: session.started_at().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub team_id: TeamId,
    /// The caller's current session, dropped once the new game starts
    #[serde(default)]
    pub previous_session_id: Option<SessionId>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub outcome: AnswerOutcome,
    pub game: GameView,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// GET /api/teams
pub async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.store().all_teams().await?))
}

/// GET /api/teams/{id}
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<TeamInfo>, ApiError> {
    let team = state
        .store()
        .team_by_id(team_id)
        .await?
        .ok_or(ApiError::TeamNotFound(team_id))?;
    Ok(Json(team.into()))
}

/// GET /api/teams/{id}/players
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Vec<RosterPlayer>>, ApiError> {
    if state.store().team_by_id(team_id).await?.is_none() {
        return Err(ApiError::TeamNotFound(team_id));
    }
    Ok(Json(state.store().players_by_team(team_id).await?))
}

/// POST /api/games
///
/// Starts a game with its first question already drawn.
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let mut rng = StdRng::from_os_rng();
    let (session_id, session) = state
        .create_session(
            request.team_id,
            request.previous_session_id.as_deref(),
            &mut rng,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(GameView::new(session_id, &session))))
}

/// GET /api/games/{session_id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<GameView>, ApiError> {
    let session = state.get_session(&session_id).await?;
    Ok(Json(GameView::new(session_id, &session)))
}

/// POST /api/games/{session_id}/answer
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let (outcome, session) = state.submit_answer(&session_id, &request.answer).await?;
    Ok(Json(AnswerResponse {
        outcome,
        game: GameView::new(session_id, &session),
    }))
}

/// POST /api/games/{session_id}/next
pub async fn next_question(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<GameView>, ApiError> {
    let mut rng = StdRng::from_os_rng();
    let session = state.next_question(&session_id, &mut rng).await?;
    Ok(Json(GameView::new(session_id, &session)))
}

/// POST /api/games/{session_id}/reset
///
/// Starts the same team over with a fresh first question.
pub async fn reset_game(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<GameView>, ApiError> {
    let mut rng = StdRng::from_os_rng();
    let session = state.reset_session(&session_id, &mut rng).await?;
    Ok(Json(GameView::new(session_id, &session)))
}

/// DELETE /api/games/{session_id}
pub async fn end_game(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionError::NotFound(session_id).into())
    }
}

/// GET /api/players/{name}/facts
pub async fn player_facts(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<PlayerProfile>, ApiError> {
    let profile = scouting::player_profile(&name, state.facts().as_ref()).await?;
    profile.map(Json).ok_or(ApiError::PlayerNotFound(name))
}

/// GET /api/jerseys
pub async fn jersey_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JerseyCount>>, ApiError> {
    Ok(Json(
        scouting::jersey_distribution(state.store().as_ref()).await?,
    ))
}

/// GET /api/jerseys/{number}/players
pub async fn players_by_jersey(
    State(state): State<Arc<AppState>>,
    Path(number): Path<u32>,
) -> Result<Json<Vec<JerseyHolder>>, ApiError> {
    if number > MAX_JERSEY_NUMBER {
        return Err(ApiError::BadRequest(format!(
            "Jersey numbers run from 0 to {}",
            MAX_JERSEY_NUMBER
        )));
    }
    Ok(Json(
        scouting::players_by_jersey(state.store().as_ref(), number).await?,
    ))
}

/// POST /api/chat
///
/// An empty conversation gets the umpire's greeting.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, ApiError> {
    let umpire = state.umpire.as_ref().ok_or(ApiError::UmpireUnavailable)?;

    if let Some(last) = body.messages.last() {
        if last.role != ChatRole::User {
            return Err(ApiError::BadRequest(
                "The last message must come from the user".to_string(),
            ));
        }
    }

    let reply = umpire.reply(&body.messages).await?;
    Ok(Json(ChatReply { reply }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/teams", get(list_teams))
        .route("/api/teams/{id}", get(get_team))
        .route("/api/teams/{id}/players", get(list_players))
        .route("/api/players/{name}/facts", get(player_facts))
        .route("/api/jerseys", get(jersey_distribution))
        .route("/api/jerseys/{number}/players", get(players_by_jersey))
        .route("/api/games", post(start_game))
        .route("/api/games/{session_id}", get(get_game).delete(end_game))
        .route("/api/games/{session_id}/answer", post(submit_answer))
        .route("/api/games/{session_id}/next", post(next_question))
        .route("/api/games/{session_id}/reset", post(reset_game))
        .route("/api/chat", post(chat))
        .with_state(state)
}
