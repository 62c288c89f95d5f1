//! In-memory stat source for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, StatSource};
use crate::models::{MatchStatRecord, MatchSummary, PlayerProfile};

/// Serves canned data. Pages are sliced from the stored vectors with the
/// requested offset/limit, like the real API.
#[derive(Default)]
pub struct MockStatSource {
    players: HashMap<String, PlayerProfile>,
    matches: Vec<MatchStatRecord>,
    history: Vec<MatchSummary>,
    /// Every history request returns this page, regardless of offset
    endless_page: Option<Vec<MatchSummary>>,
    delay: Option<Duration>,
    fail_status: Option<u16>,
    /// History pages served before every later one fails: (pages, status)
    fail_after: Option<(u32, u16)>,
    history_calls: AtomicU32,
}

impl MockStatSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, profile: PlayerProfile) -> Self {
        self.players.insert(profile.nickname.clone(), profile);
        self
    }

    pub fn with_matches(mut self, matches: Vec<MatchStatRecord>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_history(mut self, history: Vec<MatchSummary>) -> Self {
        self.history = history;
        self
    }

    /// Never signal the end of history.
    pub fn with_endless_history(mut self, page: Vec<MatchSummary>) -> Self {
        self.endless_page = Some(page);
        self
    }

    /// Sleep before answering every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every match and history request with this HTTP status.
    pub fn failing_with(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    /// Serve `pages` history pages normally, then fail with `status`.
    pub fn failing_after(mut self, pages: u32, status: u16) -> Self {
        self.fail_after = Some((pages, status));
        self
    }

    /// Number of history pages requested so far.
    pub fn history_calls(&self) -> u32 {
        self.history_calls.load(Ordering::SeqCst)
    }

    async fn before_request(&self) -> Result<(), FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_status {
            Some(status) => Err(FetchError::HttpStatus {
                status,
                message: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn page<T: Clone>(items: &[T], offset: u32, limit: u32) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl StatSource for MockStatSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_player(&self, nickname: &str) -> Result<PlayerProfile, FetchError> {
        self.players
            .get(nickname)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("no player named {}", nickname)))
    }

    async fn fetch_match_page(
        &self,
        _player_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<MatchStatRecord>, FetchError> {
        self.before_request().await?;
        Ok(page(&self.matches, offset, limit))
    }

    async fn fetch_history_page(
        &self,
        _player_id: &str,
        _from_timestamp: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<MatchSummary>, FetchError> {
        let call = self.history_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.before_request().await?;
        if let Some((pages, status)) = self.fail_after {
            if call > pages {
                return Err(FetchError::HttpStatus {
                    status,
                    message: "mock failure".to_string(),
                });
            }
        }
        if let Some(ref endless) = self.endless_page {
            return Ok(endless.clone());
        }
        Ok(page(&self.history, offset, limit))
    }
}
