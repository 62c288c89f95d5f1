use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::engine::StatsService;

#[derive(Clone)]
pub struct AppState {
    pub stats: StatsService,
    pub tracker: Arc<TrackerConfig>,
    pub cors_origin: String,
}
