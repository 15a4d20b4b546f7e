//! Identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Composite key of a document line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub document_id: i32,
    pub ordinal: i32,
}

impl ItemKey {
    pub fn new(document_id: i32, ordinal: i32) -> Self {
        Self {
            document_id,
            ordinal,
        }
    }
}

impl From<(i32, i32)> for ItemKey {
    fn from((document_id, ordinal): (i32, i32)) -> Self {
        Self::new(document_id, ordinal)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.document_id, self.ordinal)
    }
}
