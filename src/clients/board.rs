use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{NoticeQuery, NoticeRecord};

/// Board search field matched against keywords.
const SEARCH_KEY_TITLE: &str = "title";

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid board URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Board responded with status {0}")]
    Status(u16),
}

/// Consolidates regexes for board HTML parsing to avoid per-call overhead.
struct BoardRegex {
    row: Regex,
    title_link: Regex,
    writer: Regex,
    date: Regex,
    tag: Regex,
    space: Regex,
}

impl BoardRegex {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<BoardRegex>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    row: Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").ok()?,
                    title_link: Regex::new(
                        r#"(?s)class="b-title-box"[^>]*>\s*<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#,
                    )
                    .ok()?,
                    writer: Regex::new(r#"(?s)<span class="b-writer"[^>]*>(.*?)</span>"#).ok()?,
                    date: Regex::new(r#"(?s)<span class="b-date"[^>]*>(.*?)</span>"#).ok()?,
                    tag: Regex::new(r"<[^>]+>").ok()?,
                    space: Regex::new(r"\s+").ok()?,
                })
            })
            .as_ref()
    }
}

fn clean_text(raw: &str, re: &BoardRegex) -> String {
    let stripped = re.tag.replace_all(raw, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    re.space.replace_all(decoded.trim(), " ").into_owned()
}

fn extract(row: &str, pattern: &Regex, re: &BoardRegex) -> String {
    pattern
        .captures(row)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str(), re))
        .unwrap_or_default()
}

fn parse_row(row: &str, base: &Url, re: &BoardRegex) -> Option<NoticeRecord> {
    let caps = re.title_link.captures(row)?;
    let href = html_escape::decode_html_entities(caps.get(1)?.as_str().trim()).into_owned();
    let title = clean_text(caps.get(2)?.as_str(), re);
    if title.is_empty() {
        return None;
    }

    let link = base.join(&href).map_or(href, |u| u.to_string());

    Some(NoticeRecord {
        title,
        writer: extract(row, &re.writer, re),
        date: extract(row, &re.date, re),
        link,
    })
}

/// Extracts up to `limit` notices from a board list page, in page order.
///
/// Rows without a title link (table headers, empty-board placeholders) are skipped.
#[must_use]
pub fn parse_board(html: &str, base: &Url, limit: usize) -> Vec<NoticeRecord> {
    let Some(re) = BoardRegex::get() else {
        return Vec::new();
    };

    re.row
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .filter_map(|m| parse_row(m.as_str(), base, re))
        .take(limit)
        .collect()
}

#[derive(Clone)]
pub struct BoardClient {
    client: Client,
    base_url: Url,
}

impl BoardClient {
    /// Creates a new `BoardClient` with its own HTTP client.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, BoardError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Self::with_shared_client(client, base_url)
    }

    /// Creates a new `BoardClient` using a shared HTTP client.
    pub fn with_shared_client(client: Client, base_url: &str) -> Result<Self, BoardError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Board list page for `query`, asking for `limit` rows from the top.
    #[must_use]
    pub fn list_url(&self, query: &NoticeQuery, limit: usize) -> String {
        let (category, search_key, search_val) = filter_params(query);

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("mode", "list")
            .append_pair("srCategoryId", &category)
            .append_pair("srSearchKey", search_key)
            .append_pair("srSearchVal", search_val)
            .append_pair("articleLimit", &limit.to_string())
            .append_pair("article.offset", "0");
        url.to_string()
    }

    /// Human-facing list page for `query`.
    #[must_use]
    pub fn page_url(&self, query: &NoticeQuery) -> String {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear().append_pair("mode", "list");
            match query {
                NoticeQuery::Latest => {}
                NoticeQuery::Category(id) => {
                    pairs.append_pair("srCategoryId", &id.to_string());
                }
                NoticeQuery::Keyword(keyword) => {
                    pairs
                        .append_pair("srSearchKey", SEARCH_KEY_TITLE)
                        .append_pair("srSearchVal", keyword);
                }
            }
        }
        url.to_string()
    }

    pub async fn fetch(&self, url: &str, limit: usize) -> Result<Vec<NoticeRecord>, BoardError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let notices = parse_board(&html, &self.base_url, limit);
        debug!("Parsed {} notices from {}", notices.len(), url);
        Ok(notices)
    }

    pub async fn fetch_query(
        &self,
        query: &NoticeQuery,
        limit: usize,
    ) -> Result<Vec<NoticeRecord>, BoardError> {
        let url = self.list_url(query, limit);
        self.fetch(&url, limit).await
    }
}

/// `srCategoryId`, `srSearchKey` and `srSearchVal` for a list request.
fn filter_params(query: &NoticeQuery) -> (String, &'static str, &str) {
    match query {
        NoticeQuery::Latest => (String::new(), "", ""),
        NoticeQuery::Category(id) => (id.to_string(), "", ""),
        NoticeQuery::Keyword(keyword) => (String::new(), SEARCH_KEY_TITLE, keyword),
    }
}
