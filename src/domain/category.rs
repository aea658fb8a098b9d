use super::CategoryId;

/// A board category as presented to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: &'static str,
    pub id: CategoryId,
}

impl Category {
    const fn new(label: &'static str, id: u32) -> Self {
        Self {
            label,
            id: CategoryId::new(id),
        }
    }
}

/// Declaration order is the order quick replies are offered in.
const BUILTIN: [Category; 9] = [
    Category::new("공지사항", 1),
    Category::new("회사공유일정", 2),
    Category::new("주간메뉴표", 3),
    Category::new("건의함", 4),
    Category::new("이달의 우수사원", 5),
    Category::new("업무공유", 6),
    Category::new("경조사 알림", 7),
    Category::new("기타", 8),
    Category::new("행사", 166),
];

/// Static label <-> backend id mapping.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Drops the first space in a label.
///
/// Labels typed into free-text intents tend to pick up a stray space, so both
/// sides of a lookup go through this before the exact comparison.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.replacen(' ', "", 1)
}

impl CategoryRegistry {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN.to_vec(),
        }
    }

    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&Category> {
        let wanted = normalize_label(label);
        self.categories
            .iter()
            .find(|c| normalize_label(c.label) == wanted)
    }

    /// Backend id for `label`, or [`CategoryId::UNRESOLVED`] when unknown.
    #[must_use]
    pub fn backend_id_or_sentinel(&self, label: &str) -> CategoryId {
        self.resolve(label)
            .map_or(CategoryId::UNRESOLVED, |c| c.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.categories.iter().map(|c| c.label).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
