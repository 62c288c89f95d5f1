//! FACEIT Data API v4 client.
//!
//! All FACEIT endpoint specifics live here so path or payload changes are
//! easy to fix.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::{FetchError, StatSource};
use crate::config::FaceitConfig;
use crate::models::{MatchStatRecord, MatchSummary, PlayerProfile};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// API root, e.g. `https://open.faceit.com/data/v4`
    pub base_url: String,

    /// Bearer token sent on every request
    pub api_key: String,

    /// Game path segment
    pub game: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://open.faceit.com/data/v4".to_string(),
            api_key: String::new(),
            game: "cs2".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: format!("faceit-stats/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&FaceitConfig> for FetcherConfig {
    fn from(c: &FaceitConfig) -> Self {
        Self {
            base_url: c.base_url.clone(),
            api_key: c.api_key.clone(),
            game: c.game.clone(),
            timeout: Duration::from_secs(c.timeout_seconds),
            ..Default::default()
        }
    }
}

// ── FACEIT response types ───────────────────────────────────────────────────

/// Paginated envelope used by the stats and history endpoints.
#[derive(Debug, Deserialize)]
struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// One entry of `/players/{id}/games/{game}/stats`.
#[derive(Debug, Deserialize)]
struct MatchStatsItem {
    stats: MatchStatRecord,
}

// ── Client ──────────────────────────────────────────────────────────────────

/// HTTP client for the FACEIT Data API.
pub struct FaceitClient {
    client: Client,
    base_url: Url,
    game: String,
}

impl FaceitClient {
    /// Create a client with the bearer token installed as a default header.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("faceit-stats")),
        );

        if config.api_key.is_empty() {
            warn!("FACEIT: no API key configured, requests will be rejected upstream");
        } else {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| FetchError::InvalidUrl("API key is not a valid header".to_string()))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        // Trailing slash so `join` appends rather than replaces the last segment
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| FetchError::InvalidUrl(format!("Bad FACEIT base URL: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            game: config.game,
        })
    }

    /// Build an endpoint URL from path segments and query pairs.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("FACEIT: GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.path().to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StatSource for FaceitClient {
    fn name(&self) -> &'static str {
        "faceit"
    }

    async fn fetch_player(&self, nickname: &str) -> Result<PlayerProfile, FetchError> {
        let url = self.endpoint(&["players"], &[("nickname", nickname.to_string())])?;
        match self.get_json::<PlayerProfile>(url).await {
            Ok(profile) => {
                info!("FACEIT: resolved {} to {}", nickname, profile.player_id);
                Ok(profile)
            }
            Err(FetchError::NotFound(_)) => Err(FetchError::NotFound(format!(
                "no player named {}",
                nickname
            ))),
            Err(e) => Err(e),
        }
    }

    async fn fetch_match_page(
        &self,
        player_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<MatchStatRecord>, FetchError> {
        let url = self.endpoint(
            &["players", player_id, "games", self.game.as_str(), "stats"],
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )?;
        let page: ItemsResponse<MatchStatsItem> = self.get_json(url).await?;
        info!(
            "FACEIT: got {} match stats for {} (offset {}, limit {})",
            page.items.len(),
            player_id,
            offset,
            limit
        );
        Ok(page.items.into_iter().map(|i| i.stats).collect())
    }

    async fn fetch_history_page(
        &self,
        player_id: &str,
        from_timestamp: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<MatchSummary>, FetchError> {
        let url = self.endpoint(
            &["players", player_id, "history"],
            &[
                ("game", self.game.clone()),
                ("from", from_timestamp.to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        let page: ItemsResponse<MatchSummary> = self.get_json(url).await?;
        debug!(
            "FACEIT: history page for {} at offset {} has {} matches",
            player_id,
            offset,
            page.items.len()
        );
        Ok(page.items)
    }
}
