//! Remote stat source.
//!
//! The aggregation engine talks to FACEIT only through [`StatSource`], so the
//! HTTP client ([`FaceitClient`]) and the in-memory [`MockStatSource`] used by
//! tests are interchangeable.

mod faceit;
mod mock;

pub use faceit::{FaceitClient, FetcherConfig};
pub use mock::MockStatSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MatchStatRecord, MatchSummary, PlayerProfile};

/// Errors that can occur while talking to the stats platform.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only access to player profiles and match data.
#[async_trait]
pub trait StatSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Look up a player by nickname.
    async fn fetch_player(&self, nickname: &str) -> Result<PlayerProfile, FetchError>;

    /// Resolve a nickname to a player id.
    async fn fetch_player_id(&self, nickname: &str) -> Result<String, FetchError> {
        Ok(self.fetch_player(nickname).await?.player_id)
    }

    /// Per-match stats, most recent first.
    async fn fetch_match_page(
        &self,
        player_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<MatchStatRecord>, FetchError>;

    /// Match history since `from_timestamp`. An empty page means the end.
    async fn fetch_history_page(
        &self,
        player_id: &str,
        from_timestamp: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<MatchSummary>, FetchError>;
}
