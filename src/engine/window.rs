//! Bounded-window averages and single-match extraction.

use tracing::{debug, info};

use super::{StatsError, StatsService};
use crate::calculate::WindowSums;
use crate::models::{AggregateStats, MatchStats, SingleMatchStats};

impl StatsService {
    /// Average the `window_size` most recent matches of `player_id`.
    ///
    /// One page is fetched. With the default denominator policy a short page
    /// is still divided by `window_size`.
    pub async fn window_stats(
        &self,
        player_id: &str,
        window_size: u32,
    ) -> Result<AggregateStats, StatsError> {
        if window_size == 0 {
            return Err(StatsError::NoData("window size must be at least 1".to_string()));
        }

        self.with_deadline(async {
            let records = self
                .source
                .fetch_match_page(player_id, 0, window_size)
                .await?;
            debug!(
                "Window for {}: requested {}, got {}",
                player_id,
                window_size,
                records.len()
            );

            let mut sums = WindowSums::default();
            for raw in &records {
                sums.add(&MatchStats::try_from(raw)?);
            }

            let stats = sums
                .finish(window_size, self.config.denominator)
                .ok_or_else(|| {
                    StatsError::NoData(format!("no matches found for {}", player_id))
                })?;
            info!(
                "Window stats for {}: {} matches, avg kills {}",
                player_id, stats.matches_counted, stats.avg_kills
            );
            Ok(stats)
        })
        .await
    }

    /// Stats of the most recent match, unaveraged.
    pub async fn last_match(&self, player_id: &str) -> Result<SingleMatchStats, StatsError> {
        self.with_deadline(async {
            let records = self.source.fetch_match_page(player_id, 0, 1).await?;
            let raw = records
                .first()
                .ok_or_else(|| StatsError::NoData(format!("no matches found for {}", player_id)))?;
            Ok(SingleMatchStats::from(MatchStats::try_from(raw)?))
        })
        .await
    }
}
