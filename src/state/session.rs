use super::{AppState, SessionError};
use crate::trivia::{AnswerOutcome, GameSession};
use crate::types::{SessionId, TeamId};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Longest pause between idle-session sweeps
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A game session plus the last time a request touched it
#[derive(Debug)]
pub struct TrackedSession {
    pub game: GameSession,
    pub last_touched: Instant,
}

impl TrackedSession {
    fn new(game: GameSession) -> Self {
        Self {
            game,
            last_touched: Instant::now(),
        }
    }

    fn touch(&mut self) -> &mut GameSession {
        self.last_touched = Instant::now();
        &mut self.game
    }
}

impl AppState {
    async fn session_handle(&self, id: &str) -> Result<Arc<Mutex<TrackedSession>>, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Start a game for `team_id` and register it under a fresh session id.
    ///
    /// `replaces` names the caller's previous session, which is dropped once the
    /// new game is up.
    pub async fn create_session<R: Rng + Send + ?Sized>(
        &self,
        team_id: TeamId,
        replaces: Option<&str>,
        rng: &mut R,
    ) -> Result<(SessionId, GameSession), SessionError> {
        let session = self.game.start_game(team_id, rng).await?;
        let id = ulid::Ulid::new().to_string();

        let mut sessions = self.sessions.write().await;
        if let Some(old) = replaces {
            if sessions.remove(old).is_some() {
                tracing::info!("Session {} replaced by {}", old, id);
            }
        }
        sessions.insert(
            id.clone(),
            Arc::new(Mutex::new(TrackedSession::new(session.clone()))),
        );

        tracing::debug!("Registered session {} for team {}", id, team_id);
        Ok((id, session))
    }

    /// Snapshot of a session
    pub async fn get_session(&self, id: &str) -> Result<GameSession, SessionError> {
        let handle = self.session_handle(id).await?;
        let mut tracked = handle.lock().await;
        Ok(tracked.touch().clone())
    }

    pub async fn submit_answer(
        &self,
        id: &str,
        answer: &str,
    ) -> Result<(AnswerOutcome, GameSession), SessionError> {
        let handle = self.session_handle(id).await?;
        let mut tracked = handle.lock().await;
        let session = tracked.touch();
        let outcome = session.submit_answer(answer)?;
        Ok((outcome, session.clone()))
    }

    /// Advance past the answered question and draw the next one.
    ///
    /// A failed draw still leaves the session advanced, so the caller can retry.
    pub async fn next_question<R: Rng + Send + ?Sized>(
        &self,
        id: &str,
        rng: &mut R,
    ) -> Result<GameSession, SessionError> {
        let handle = self.session_handle(id).await?;
        let mut tracked = handle.lock().await;
        let session = tracked.touch();
        session.advance_to_next_question()?;
        self.game.start_new_question(session, rng).await?;
        Ok(session.clone())
    }

    /// Start the session over for the same team and draw its first question
    pub async fn reset_session<R: Rng + Send + ?Sized>(
        &self,
        id: &str,
        rng: &mut R,
    ) -> Result<GameSession, SessionError> {
        let handle = self.session_handle(id).await?;
        let mut tracked = handle.lock().await;
        let session = tracked.touch();
        session.reset_game();
        self.game.start_new_question(session, rng).await?;
        Ok(session.clone())
    }

    /// Drop a session. Returns false if it did not exist.
    pub async fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!("Removed game session {}", id);
        }
        removed
    }

    /// Drop sessions idle for at least `max_idle` (call periodically).
    ///
    /// Sessions locked by an in-flight request are in use and always kept.
    pub async fn cleanup_idle_sessions(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(tracked) => now.duration_since(tracked.last_touched) < max_idle,
            Err(_) => true,
        });
        before - sessions.len()
    }
}

/// Periodically evict sessions nobody has touched for `ttl`
pub fn spawn_session_sweeper(state: Arc<AppState>, ttl: Duration) {
    let period = ttl.min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;

            let evicted = state.cleanup_idle_sessions(ttl).await;
            if evicted > 0 {
                tracing::info!("Evicted {} idle game sessions", evicted);
            }
        }
    });
}
