//! Full-history win/loss scan.

use tracing::{debug, info, warn};

use super::{StatsError, StatsService};
use crate::models::{Classification, HistoryTally};

impl StatsService {
    /// Walk every match since `since_timestamp` and tally wins and losses.
    ///
    /// Pages are fetched one after another at `offset += history_page_size`
    /// until an empty page comes back. At most `max_pages` requests are made,
    /// and the terminating empty page counts toward that limit: a history of
    /// exactly `max_pages` full pages still aborts with
    /// [`StatsError::ScanLimitExceeded`]. Any error drops the partial tally.
    pub async fn history_tally(
        &self,
        player_id: &str,
        since_timestamp: i64,
    ) -> Result<HistoryTally, StatsError> {
        let page_size = self.config.history_page_size;
        let max_pages = self.config.max_pages;

        self.with_deadline(async {
            let mut tally = HistoryTally::default();
            let mut offset = 0u32;

            for page_number in 0..max_pages {
                let page = self
                    .source
                    .fetch_history_page(player_id, since_timestamp, offset, page_size)
                    .await?;
                if page.is_empty() {
                    info!(
                        "History scan for {} done after {} pages: {}W {}L",
                        player_id, page_number, tally.wins, tally.losses
                    );
                    return Ok(tally);
                }

                for summary in &page {
                    let classification = summary.classify(player_id);
                    if classification == Classification::Unrostered {
                        warn!(
                            "Player {} not on either roster of match {}, counting as a loss",
                            player_id, summary.match_id
                        );
                    }
                    tally.record(classification);
                }
                debug!(
                    "History page {} for {}: {} matches, running {}W {}L",
                    page_number,
                    player_id,
                    page.len(),
                    tally.wins,
                    tally.losses
                );

                offset = offset.saturating_add(page_size);
            }

            warn!(
                "History scan for {} hit the {} page limit",
                player_id, max_pages
            );
            Err(StatsError::ScanLimitExceeded { pages: max_pages })
        })
        .await
    }
}
