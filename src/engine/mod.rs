//! Match-history aggregation engine.
//!
//! [`StatsService`] drives a [`StatSource`] through the paged fetches each
//! operation needs, normalizes every record once, and hands the typed data to
//! [`crate::calculate`]. Each public operation runs under a deadline; when it
//! expires the in-flight fetch is dropped together with any partial sums and
//! [`StatsError::Cancelled`] is returned.

mod history;
mod window;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use crate::calculate::{project_goal_pace, PaceError};
use crate::config::EngineConfig;
use crate::fetch::{FetchError, StatSource};
use crate::models::{GoalPace, RecordError};

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Malformed match record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("History scan stopped after {pages} pages without reaching the end")]
    ScanLimitExceeded { pages: u32 },

    #[error("Cancelled after {after_secs}s")]
    Cancelled { after_secs: u64 },

    #[error(transparent)]
    Pace(#[from] PaceError),
}

impl From<FetchError> for StatsError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(what) => StatsError::NotFound(what),
            other => StatsError::Upstream(other.to_string()),
        }
    }
}

/// Engine entry point shared by the HTTP handlers and the CLI.
#[derive(Clone)]
pub struct StatsService {
    source: Arc<dyn StatSource>,
    config: EngineConfig,
    game: String,
}

impl StatsService {
    pub fn new(source: Arc<dyn StatSource>, config: EngineConfig, game: impl Into<String>) -> Self {
        Self {
            source,
            config,
            game: game.into(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Run `op` under the configured deadline.
    async fn with_deadline<T, F>(&self, op: F) -> Result<T, StatsError>
    where
        F: Future<Output = Result<T, StatsError>>,
    {
        let secs = self.config.request_timeout_seconds;
        match tokio::time::timeout(Duration::from_secs(secs), op).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Operation cancelled after {}s", secs);
                Err(StatsError::Cancelled { after_secs: secs })
            }
        }
    }

    /// Resolve a nickname to a FACEIT player id.
    pub async fn resolve_player_id(&self, nickname: &str) -> Result<String, StatsError> {
        self.with_deadline(async { Ok(self.source.fetch_player_id(nickname).await?) })
            .await
    }

    /// Current FACEIT elo for the configured game.
    pub async fn player_elo(&self, nickname: &str) -> Result<u32, StatsError> {
        self.with_deadline(async {
            let profile = self.source.fetch_player(nickname).await?;
            profile.elo(&self.game).ok_or_else(|| {
                StatsError::NotFound(format!("{} has no {} elo", nickname, self.game))
            })
        })
        .await
    }

    /// Days-remaining pace toward `goal`, evaluated at `now`.
    pub fn goal_pace(
        &self,
        wins: u32,
        goal: u32,
        now: DateTime<Utc>,
        hour_offset: i64,
    ) -> Result<GoalPace, StatsError> {
        Ok(project_goal_pace(wins, goal, now, hour_offset)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockStatSource;
    use crate::models::{GameProfile, PlayerProfile};

    fn profile(nickname: &str, elo: Option<u32>) -> PlayerProfile {
        PlayerProfile {
            player_id: format!("{}-id", nickname),
            nickname: nickname.to_string(),
            games: [(
                "cs2".to_string(),
                GameProfile {
                    faceit_elo: elo,
                    skill_level: Some(7),
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    fn service(source: MockStatSource) -> StatsService {
        StatsService::new(Arc::new(source), EngineConfig::default(), "cs2")
    }

    #[test]
    fn test_source_name() {
        assert_eq!(service(MockStatSource::new()).source_name(), "mock");
    }

    #[tokio::test]
    async fn test_resolve_player_id() {
        let svc = service(MockStatSource::new().with_player(profile("rui", Some(1500))));

        assert_eq!(svc.resolve_player_id("rui").await.unwrap(), "rui-id");
        let err = svc.resolve_player_id("nobody").await.unwrap_err();
        assert!(matches!(err, StatsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_player_elo() {
        let svc = service(
            MockStatSource::new()
                .with_player(profile("rui", Some(1874)))
                .with_player(profile("fresh", None)),
        );

        assert_eq!(svc.player_elo("rui").await.unwrap(), 1874);
        assert!(matches!(
            svc.player_elo("fresh").await,
            Err(StatsError::NotFound(_))
        ));
    }

    #[test]
    fn test_fetch_error_conversion() {
        let err: StatsError = FetchError::NotFound("x".to_string()).into();
        assert!(matches!(err, StatsError::NotFound(_)));

        let err: StatsError = FetchError::HttpStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
        .into();
        match err {
            StatsError::Upstream(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_goal_pace() {
        use chrono::TimeZone;
        let svc = service(MockStatSource::new());
        let now = Utc.with_ymd_and_hms(2024, 8, 22, 12, 0, 0).unwrap();

        let pace = svc.goal_pace(40, 100, now, 1).unwrap();
        assert_eq!(pace.days_remaining, 10);
    }
}
