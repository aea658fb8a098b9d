use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::display::{
    DATE_FRAGMENT_CHARS, ELLIPSIS, MAX_TITLE_CHARS, TRUNCATED_TITLE_CHARS,
};
use crate::domain::CategoryId;

/// Which slice of the board a listing reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeQuery {
    /// Every category, newest first.
    Latest,

    Category(CategoryId),

    /// Title search across every category.
    Keyword(String),
}

impl fmt::Display for NoticeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Category(id) => write!(f, "category {id}"),
            Self::Keyword(keyword) => write!(f, "keyword '{keyword}'"),
        }
    }
}

/// One row scraped from the notice board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub title: String,

    pub writer: String,

    /// `YYYY-MM-DD` as printed by the board.
    pub date: String,

    pub link: String,
}

/// A notice reduced to what a list card item shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNotice {
    pub title: String,

    /// `"{writer} {MM-DD}"`
    pub description: String,

    pub link: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Date '{0}' is too short to hold MM-DD")]
    MalformedDate(String),
}

/// Shortens `title` to fit the list card.
///
/// Counts characters rather than bytes so Hangul titles are never cut mid-character.
#[must_use]
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let mut short: String = title.chars().take(TRUNCATED_TITLE_CHARS).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        title.to_string()
    }
}

/// Trailing `MM-DD` of a `YYYY-MM-DD` date.
pub fn date_fragment(date: &str) -> Result<&str, FormatError> {
    let count = date.chars().count();
    if count < DATE_FRAGMENT_CHARS {
        return Err(FormatError::MalformedDate(date.to_string()));
    }

    let start = date
        .char_indices()
        .nth(count - DATE_FRAGMENT_CHARS)
        .map_or(0, |(idx, _)| idx);
    Ok(&date[start..])
}

impl NoticeRecord {
    /// Posting day, when the board printed a full `YYYY-MM-DD` or `YYYY.MM.DD` date.
    #[must_use]
    pub fn posted_on(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(date, "%Y.%m.%d"))
            .ok()
    }

    pub fn format(&self) -> Result<DisplayNotice, FormatError> {
        let fragment = date_fragment(&self.date)?;

        Ok(DisplayNotice {
            title: truncate_title(&self.title),
            description: format!("{} {}", self.writer, fragment),
            link: self.link.clone(),
        })
    }
}
