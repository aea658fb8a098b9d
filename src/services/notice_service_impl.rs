use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::notice_service::NoticeSource;
use crate::clients::board::BoardClient;
use crate::models::{NoticeQuery, NoticeRecord};

/// [`NoticeSource`] backed by the scraped web board.
pub struct BoardNoticeSource {
    client: Arc<BoardClient>,
    timeout: Duration,
}

impl BoardNoticeSource {
    #[must_use]
    pub const fn new(client: Arc<BoardClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait::async_trait]
impl NoticeSource for BoardNoticeSource {
    async fn fetch_notices(&self, query: &NoticeQuery, limit: usize) -> Vec<NoticeRecord> {
        let fetch = self.client.fetch_query(query, limit);

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(notices)) => {
                debug!(query = %query, count = notices.len(), "Fetched notices");
                notices
            }
            Ok(Err(e)) => {
                warn!(query = %query, "Notice board fetch failed: {}", e);
                metrics::counter!("notice_fetch_failures_total", "reason" => "error").increment(1);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    query = %query,
                    "Notice board did not answer within {:?}",
                    self.timeout
                );
                metrics::counter!("notice_fetch_failures_total", "reason" => "timeout")
                    .increment(1);
                Vec::new()
            }
        }
    }

    fn page_url(&self, query: &NoticeQuery) -> String {
        self.client.page_url(query)
    }
}
