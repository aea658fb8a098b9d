use chrono::{FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use super::notice_service::NoticeSource;
use crate::constants::replies::{
    ALL_NOTICES_BUTTON, CATEGORY_PROMPT, LATEST_TITLE, LISTING_TITLE_SUFFIX, NO_MORE_NOTICES_TODAY,
    NO_NOTICES_TODAY, NO_NOTICES_YESTERDAY, NO_SEARCH_RESULTS, REQUEST_ERROR, SEARCH_TITLE_SUFFIX,
    SHARE_BUTTON, SOURCE_UNAVAILABLE, TODAY_MORE_TITLE, TODAY_TITLE, YESTERDAY_TITLE,
};
use crate::domain::{CategoryId, CategoryRegistry};
use crate::domain::category::normalize_label;
use crate::models::{
    Button, ConversationalResponse, ListCard, ListItem, NoticeQuery, NoticeRecord, SimpleText,
};

/// Prompt offering every known category as a quick reply, in registry order.
#[must_use]
pub fn build_category_prompt(registry: &CategoryRegistry) -> ConversationalResponse {
    registry
        .iter()
        .fold(SimpleText::new(CATEGORY_PROMPT), |text, category| {
            text.quick_reply(category.label, category.label)
        })
        .into()
}

/// List card of `notices` with share and web link buttons.
///
/// Items keep upstream order. Records with a malformed date are dropped, and
/// `None` means nothing was left to show.
fn build_notice_card(
    title: String,
    link_label: &str,
    page_url: &str,
    notices: &[NoticeRecord],
) -> Option<ListCard> {
    let items: Vec<ListItem> = notices
        .iter()
        .filter_map(|record| match record.format() {
            Ok(display) => Some(ListItem {
                title: display.title,
                description: display.description,
                image_url: String::new(),
                link: display.link,
            }),
            Err(e) => {
                warn!(link = %record.link, "Skipping notice: {}", e);
                None
            }
        })
        .collect();

    if items.is_empty() {
        return None;
    }

    let mut card = ListCard::new(title);
    card.buttons.push(Button::Share {
        label: SHARE_BUTTON.to_string(),
    });
    card.buttons.push(Button::WebLink {
        label: link_label.to_string(),
        url: page_url.to_string(),
    });
    card.items = items;

    Some(card)
}

/// List card for a category, or the unavailable fallback when nothing usable came back.
#[must_use]
pub fn build_category_listing(
    label: &str,
    category_url: &str,
    notices: &[NoticeRecord],
) -> ConversationalResponse {
    build_notice_card(
        format!("{label} {LISTING_TITLE_SUFFIX}"),
        label,
        category_url,
        notices,
    )
    .map_or_else(source_unavailable, Into::into)
}

#[must_use]
pub fn source_unavailable() -> ConversationalResponse {
    SimpleText::new(SOURCE_UNAVAILABLE).into()
}

#[must_use]
pub fn request_error() -> ConversationalResponse {
    SimpleText::new(REQUEST_ERROR).into()
}

/// Day-scoped listings over the newest board rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayWindow {
    Today,

    /// Today's notices past the first card.
    TodayMore,

    Yesterday,
}

impl DayWindow {
    /// Posting day this window shows, given the board's current date.
    #[must_use]
    pub fn day(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today | Self::TodayMore => today,
            Self::Yesterday => today.pred_opt().unwrap_or(today),
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Today => TODAY_TITLE,
            Self::TodayMore => TODAY_MORE_TITLE,
            Self::Yesterday => YESTERDAY_TITLE,
        }
    }

    const fn empty_message(self) -> &'static str {
        match self {
            Self::Today => NO_NOTICES_TODAY,
            Self::TodayMore => NO_MORE_NOTICES_TODAY,
            Self::Yesterday => NO_NOTICES_YESTERDAY,
        }
    }

    const fn skip(self, per_card: usize) -> usize {
        match self {
            Self::TodayMore => per_card,
            Self::Today | Self::Yesterday => 0,
        }
    }
}

/// Resolves a label or query, fetches its notices and renders the reply.
#[derive(Clone)]
pub struct ListingService {
    registry: Arc<CategoryRegistry>,
    source: Arc<dyn NoticeSource>,
    limit: usize,
    scan_limit: usize,
    utc_offset: FixedOffset,
}

impl ListingService {
    #[must_use]
    pub fn new(
        registry: Arc<CategoryRegistry>,
        source: Arc<dyn NoticeSource>,
        limit: usize,
        scan_limit: usize,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            registry,
            source,
            limit,
            scan_limit,
            utc_offset,
        }
    }

    pub fn prompt(&self) -> ConversationalResponse {
        build_category_prompt(&self.registry)
    }

    /// Unknown labels are sent upstream as the unresolved id and end in the
    /// same fallback as an unreachable board.
    pub async fn listing(&self, raw_label: &str) -> ConversationalResponse {
        let (label, id) = match self.registry.resolve(raw_label) {
            Some(category) => (category.label.to_string(), category.id),
            None => {
                debug!(label = %raw_label, "Unknown category label");
                (normalize_label(raw_label), CategoryId::UNRESOLVED)
            }
        };

        let query = NoticeQuery::Category(id);
        let notices = self.source.fetch_notices(&query, self.limit).await;
        build_category_listing(&label, &self.source.page_url(&query), &notices)
    }

    /// The single newest notice across every category.
    pub async fn latest(&self) -> ConversationalResponse {
        let query = NoticeQuery::Latest;
        let notices = self.source.fetch_notices(&query, 1).await;

        build_notice_card(
            LATEST_TITLE.to_string(),
            ALL_NOTICES_BUTTON,
            &self.source.page_url(&query),
            &notices,
        )
        .map_or_else(source_unavailable, Into::into)
    }

    /// Notices whose title contains `keyword`.
    pub async fn search(&self, keyword: &str) -> ConversationalResponse {
        let query = NoticeQuery::Keyword(keyword.to_string());
        let notices = self.source.fetch_notices(&query, self.limit).await;

        build_notice_card(
            format!("'{keyword}' {SEARCH_TITLE_SUFFIX}"),
            keyword,
            &self.source.page_url(&query),
            &notices,
        )
        .map_or_else(|| SimpleText::new(NO_SEARCH_RESULTS).into(), Into::into)
    }

    /// Current date in the board's time zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    /// Notices posted on the day `window` covers, read from the newest board rows.
    ///
    /// An empty scan means the board failed and yields the fallback; a scan
    /// with no matching rows yields the window's own message.
    pub async fn day_listing(&self, window: DayWindow, today: NaiveDate) -> ConversationalResponse {
        let query = NoticeQuery::Latest;
        let scanned = self.source.fetch_notices(&query, self.scan_limit).await;
        if scanned.is_empty() {
            return source_unavailable();
        }

        let day = window.day(today);
        let matching: Vec<NoticeRecord> = scanned
            .into_iter()
            .filter(|record| record.posted_on() == Some(day))
            .skip(window.skip(self.limit))
            .take(self.limit)
            .collect();

        build_notice_card(
            window.title().to_string(),
            ALL_NOTICES_BUTTON,
            &self.source.page_url(&query),
            &matching,
        )
        .map_or_else(|| SimpleText::new(window.empty_message()).into(), Into::into)
    }

    /// Raw newest notices, at most the scan limit.
    pub async fn recent(&self, count: usize) -> Vec<NoticeRecord> {
        let count = count.min(self.scan_limit);
        if count == 0 {
            return Vec::new();
        }
        self.source.fetch_notices(&NoticeQuery::Latest, count).await
    }
}
