//! Domain types for notice categories.
//!
//! The board addresses categories by an opaque numeric id while users pick
//! them by label. [`CategoryId`] keeps the two from being mixed up.

pub mod category;

pub use category::{Category, CategoryRegistry};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier the notice board expects as `srCategoryId`.
///
/// # Examples
///
/// ```rust
/// use noticebot::domain::CategoryId;
///
/// let id = CategoryId::new(166);
/// assert_eq!(id.value(), 166);
/// assert_eq!(id.to_string(), "166");
/// assert!(CategoryId::UNRESOLVED.is_unresolved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u32);

impl CategoryId {
    /// Sentinel sent upstream for labels the registry does not know.
    /// The board has no category `0`, so the fetch comes back empty.
    pub const UNRESOLVED: Self = Self(0);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        self.0 == Self::UNRESOLVED.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CategoryId> for u32 {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

impl From<u32> for CategoryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
