//! Source of raw notices.
//!
//! This module provides the [`NoticeSource`] trait, the seam between the
//! listing pipeline and whatever actually talks to the notice board.

use crate::models::{NoticeQuery, NoticeRecord};

#[async_trait::async_trait]
pub trait NoticeSource: Send + Sync {
    /// Fetches up to `limit` notices matching `query`, newest first.
    ///
    /// Failures are not reported: a network error, a timeout, an empty board
    /// and an unknown category all come back as an empty list.
    async fn fetch_notices(&self, query: &NoticeQuery, limit: usize) -> Vec<NoticeRecord>;

    /// Web page listing every notice matching `query`.
    fn page_url(&self, query: &NoticeQuery) -> String;
}
