use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ballpark::api::{self, AnswerResponse, ChatReply, ErrorBody, GameView};
use ballpark::facts::{FactsResult, PlayerFacts};
use ballpark::llm::{
    ChatRequest, ChatResponse, LlmConfig, LlmProvider, LlmResult, ResponseMetadata,
};
use ballpark::roster::{JsonRosterStore, RosterSnapshot};
use ballpark::scouting::{JerseyCount, JerseyHolder, TeamInfo};
use ballpark::state::AppState;
use ballpark::trivia::GamePhase;
use ballpark::types::{FormerTeam, Honor, PlayerInfo, RosterPlayer, Team};
use ballpark::umpire::GREETING;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

/// Facts service that knows nobody, leaving only roster questions
struct NoFacts;

#[async_trait]
impl PlayerFacts for NoFacts {
    async fn player_info(&self, _name: &str) -> FactsResult<Option<PlayerInfo>> {
        Ok(None)
    }

    async fn former_teams(&self, _player_id: &str) -> FactsResult<Vec<FormerTeam>> {
        Ok(Vec::new())
    }

    async fn honors(&self, _player_id: &str) -> FactsResult<Vec<Honor>> {
        Ok(Vec::new())
    }
}

struct EchoProvider;

#[async_trait]
impl LlmProvider for EchoProvider {
    async fn complete(&self, request: ChatRequest) -> LlmResult<ChatResponse> {
        let last = request.messages.last().map(|m| m.content.clone());
        Ok(ChatResponse {
            text: format!("You asked: {}", last.unwrap_or_default()),
            metadata: ResponseMetadata {
                provider: "echo".to_string(),
                model: "echo".to_string(),
                tokens_used: None,
                latency_ms: 0,
            },
        })
    }

    fn name(&self) -> &str {
        "echo"
    }
}

fn headshot(name: &str) -> String {
    format!("https://img.example/{}.png", name)
}

fn snapshot() -> RosterSnapshot {
    let team = |id, name: &str| Team {
        id,
        name: name.to_string(),
        logo_url: None,
        stadium: None,
        stadium_addr: None,
        phone: None,
        team_ext: None,
    };
    let players = [("A", "7"), ("B", "22"), ("C", "7"), ("D", "99")]
        .iter()
        .map(|(name, number)| RosterPlayer {
            team_id: 10,
            name: name.to_string(),
            jersey_number: Some(number.to_string()),
            headshot_url: Some(headshot(name)),
        })
        .collect();

    let mut mariners = team(10, "Seattle Mariners");
    mariners.stadium = Some("T-Mobile Park".to_string());
    mariners.team_ext = Some("mariners".to_string());

    RosterSnapshot {
        teams: vec![mariners, team(20, "Boston Red Sox")],
        players,
    }
}

fn app(with_umpire: bool) -> Router {
    let store = Arc::new(JsonRosterStore::new(snapshot()));
    let provider: Option<Box<dyn LlmProvider>> = if with_umpire {
        Some(Box::new(EchoProvider))
    } else {
        None
    };
    let state = AppState::new_with_llm(store, Arc::new(NoFacts), provider, LlmConfig::default());
    api::router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

/// The roster question shows the answer's headshot
fn pick(view: &GameView, correct: bool) -> String {
    let question = view.question.as_ref().expect("question in play");
    let image = question.image_url.as_deref().expect("headshot");
    question
        .choices
        .iter()
        .find(|c| (headshot(c) == image) == correct)
        .unwrap()
        .clone()
}

async fn start(app: &Router) -> GameView {
    let (status, body) = send(app, "POST", "/api/games", Some(r#"{"team_id": 10}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

#[tokio::test]
async fn test_teams_and_players() {
    let app = app(false);

    let (status, body) = send(&app, "GET", "/api/teams", None).await;
    assert_eq!(status, StatusCode::OK);
    let teams: Vec<Team> = parse(&body);
    let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Boston Red Sox", "Seattle Mariners"]);

    let (status, body) = send(&app, "GET", "/api/teams/10/players", None).await;
    assert_eq!(status, StatusCode::OK);
    let players: Vec<RosterPlayer> = parse(&body);
    assert_eq!(players.len(), 4);

    let (status, body) = send(&app, "GET", "/api/teams/20/players", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(parse::<Vec<RosterPlayer>>(&body).is_empty());
}

/// End-to-end: five correct answers make a grand slam
#[tokio::test]
async fn test_full_game_grand_slam() {
    let app = app(false);
    let mut view = start(&app).await;
    let id = view.session_id.clone();

    for pitch in 1..=5 {
        assert_eq!(view.pitches, pitch);
        assert_eq!(view.phase, GamePhase::InPlay);

        let answer = pick(&view, true);
        let uri = format!("/api/games/{}/answer", id);
        let (status, body) = send(
            &app,
            "POST",
            &uri,
            Some(&serde_json::json!({ "answer": answer }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let result: AnswerResponse = parse(&body);
        assert!(result.outcome.correct);
        assert_eq!(result.outcome.correct_answer, answer);
        assert_eq!(
            result.game.question.as_ref().unwrap().correct_answer.as_deref(),
            Some(answer.as_str())
        );

        if pitch < 5 {
            assert!(!result.outcome.game_over);
            let (status, body) = send(&app, "POST", &format!("/api/games/{}/next", id), None).await;
            assert_eq!(status, StatusCode::OK);
            view = parse(&body);
        } else {
            assert!(result.outcome.game_over);
            view = result.game;
        }
    }

    assert_eq!(view.bases, 5);
    assert_eq!(view.strikes, 0);
    assert_eq!(view.pitches_remaining, 0);
    assert_eq!(view.phase, GamePhase::GameOver);
    assert_eq!(view.status, "Grand Slam! All 5 correct!");

    let (status, body) = send(&app, "POST", &format!("/api/games/{}/next", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse::<ErrorBody>(&body).code, "GAME_OVER");
}

#[tokio::test]
async fn test_three_strikes() {
    let app = app(false);
    let mut view = start(&app).await;
    let id = view.session_id.clone();
    let answer_uri = format!("/api/games/{}/answer", id);

    for strike in 1..=3 {
        let wrong = pick(&view, false);
        let payload = serde_json::json!({ "answer": wrong }).to_string();
        let (_, body) = send(&app, "POST", &answer_uri, Some(&payload)).await;
        let result: AnswerResponse = parse(&body);
        assert!(!result.outcome.correct);
        assert_eq!(result.game.strikes, strike);

        // Resubmitting does not add another strike
        let (_, body) = send(&app, "POST", &answer_uri, Some(&payload)).await;
        let again: AnswerResponse = parse(&body);
        assert!(again.outcome.already_scored);
        assert_eq!(again.game.strikes, strike);

        if strike < 3 {
            let (_, body) = send(&app, "POST", &format!("/api/games/{}/next", id), None).await;
            view = parse(&body);
        } else {
            assert!(result.outcome.game_over);
            assert_eq!(result.game.status, "Three Strikes - You're OUT!");
        }
    }
}

#[tokio::test]
async fn test_next_before_answer_conflicts() {
    let app = app(false);
    let view = start(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/games/{}/next", view.session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse::<ErrorBody>(&body).code, "NOT_ANSWERED");
}

#[tokio::test]
async fn test_unknown_session_and_team() {
    let app = app(false);

    let (status, body) = send(&app, "GET", "/api/games/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorBody>(&body).code, "UNKNOWN_SESSION");

    let (status, body) = send(&app, "POST", "/api/games", Some(r#"{"team_id": 99}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorBody>(&body).code, "UNKNOWN_TEAM");

    // A team with no players yields no questions
    let (status, body) = send(&app, "POST", "/api/games", Some(r#"{"team_id": 20}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        parse::<ErrorBody>(&body).msg,
        "Trivia game unable to load; please retry"
    );
}

#[tokio::test]
async fn test_delete_session() {
    let app = app(false);
    let view = start(&app).await;
    let uri = format!("/api/games/{}", view.session_id);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<GameView>(&body), view);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_umpire_chat() {
    let app = app(true);

    let (status, body) = send(&app, "POST", "/api/chat", Some(r#"{"messages": []}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<ChatReply>(&body).reply, GREETING);

    let conversation = serde_json::json!({
        "messages": [
            { "role": "assistant", "content": GREETING },
            { "role": "user", "content": "What is a balk?" }
        ]
    });
    let (status, body) = send(&app, "POST", "/api/chat", Some(&conversation.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<ChatReply>(&body).reply, "You asked: What is a balk?");

    let ends_with_assistant = serde_json::json!({
        "messages": [{ "role": "assistant", "content": GREETING }]
    });
    let (status, body) = send(
        &app,
        "POST",
        "/api/chat",
        Some(&ends_with_assistant.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorBody>(&body).code, "BAD_REQUEST");
}

#[tokio::test]
async fn test_team_info_and_jerseys() {
    let app = app(false);

    let (status, body) = send(&app, "GET", "/api/teams/10", None).await;
    assert_eq!(status, StatusCode::OK);
    let info: TeamInfo = parse(&body);
    assert_eq!(info.team.stadium.as_deref(), Some("T-Mobile Park"));
    assert_eq!(info.team_page_url.as_deref(), Some("https://www.mlb.com/mariners"));

    let (status, body) = send(&app, "GET", "/api/jerseys", None).await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<JerseyCount> = parse(&body);
    let counts: Vec<(u32, usize)> = counts.iter().map(|c| (c.number, c.players)).collect();
    assert_eq!(counts, vec![(7, 2), (22, 1), (99, 1)]);

    let (status, body) = send(&app, "GET", "/api/jerseys/7/players", None).await;
    assert_eq!(status, StatusCode::OK);
    let holders: Vec<JerseyHolder> = parse(&body);
    let names: Vec<&str> = holders.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert!(holders.iter().all(|h| h.team_name == "Seattle Mariners"));

    // NoFacts knows nobody
    let (status, body) = send(&app, "GET", "/api/players/A/facts", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorBody>(&body).code, "UNKNOWN_PLAYER");
}

#[tokio::test]
async fn test_reset_route_starts_over() {
    let app = app(false);
    let view = start(&app).await;
    let id = view.session_id.clone();

    let wrong = pick(&view, false);
    let payload = serde_json::json!({ "answer": wrong }).to_string();
    send(&app, "POST", &format!("/api/games/{}/answer", id), Some(&payload)).await;

    let (status, body) = send(&app, "POST", &format!("/api/games/{}/reset", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let reset: GameView = parse(&body);
    assert_eq!(reset.session_id, id);
    assert_eq!(reset.strikes, 0);
    assert_eq!(reset.pitches, 1);
    assert_eq!(reset.status, "At bat...");
    assert_eq!(reset.phase, GamePhase::InPlay);

    let (status, _) = send(&app, "POST", "/api/games/missing/reset", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_game_replaces_previous_session() {
    let app = app(false);
    let first = start(&app).await;

    let payload = serde_json::json!({
        "team_id": 10,
        "previous_session_id": first.session_id,
    })
    .to_string();
    let (status, body) = send(&app, "POST", "/api/games", Some(&payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let second: GameView = parse(&body);
    assert_ne!(second.session_id, first.session_id);

    let (status, _) = send(&app, "GET", &format!("/api/games/{}", first.session_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/api/games/{}", second.session_id), None).await;
    assert_eq!(status, StatusCode::OK);
}
