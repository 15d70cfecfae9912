use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Roster snapshot served by the JSON store
    pub roster_path: PathBuf,
    /// Idle game sessions are dropped after this long
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            roster_path: PathBuf::from("data/roster.json"),
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = match std::env::var("BALLPARK_PORT") {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!("Invalid BALLPARK_PORT {:?}, using {}", raw, defaults.port);
                    defaults.port
                }
            },
            _ => defaults.port,
        };

        let roster_path = std::env::var("ROSTER_PATH")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.roster_path);

        let session_ttl = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_ttl);

        Self {
            port,
            roster_path,
            session_ttl,
        }
    }
}
