//! Document list ordering.

use crate::pagination::Sort;

/// Column a document list may be ordered by.
///
/// Only the allow-listed names are honoured; everything else orders by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentSortKey {
    #[default]
    Id,
    Date,
    LastName,
    FirstName,
    City,
    Type,
}

impl DocumentSortKey {
    /// Parse a `sortBy` query value, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "lastname" => Some(Self::LastName),
            "firstname" => Some(Self::FirstName),
            "city" => Some(Self::City),
            "type" => Some(Self::Type),
            _ => None,
        }
    }
}

/// Resolved ordering for a document list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentSortBy {
    pub key: DocumentSortKey,
    pub sort: Sort,
}

impl DocumentSortBy {
    /// Build from the raw `sortBy` / `sortDescending` query parameters.
    ///
    /// Unknown or empty keys fall back to ordering by id; the direction flag
    /// applies to the fallback as well.
    pub fn from_query(sort_by: Option<&str>, descending: bool) -> Self {
        let key = sort_by
            .filter(|s| !s.is_empty())
            .and_then(DocumentSortKey::parse)
            .unwrap_or_default();
        Self {
            key,
            sort: Sort::from_descending(descending),
        }
    }
}
