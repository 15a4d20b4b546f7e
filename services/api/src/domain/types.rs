use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use docket_domain::document::DocumentSortBy;
use docket_domain::id::ItemKey;
use docket_domain::pagination::PageRequest;

/// Invoice-like document header with its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i32,
    pub kind: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    /// Ordered by ordinal. Empty when items were not requested.
    pub items: Vec<DocumentItem>,
}

/// Writable document columns, used by both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFields {
    pub kind: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

/// Line item of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentItem {
    pub document_id: i32,
    pub ordinal: i32,
    pub product: String,
    pub quantity: i32,
    pub price: Decimal,
    pub tax_rate: i32,
}

impl DocumentItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.document_id, self.ordinal)
    }

    pub fn with_fields(key: ItemKey, fields: ItemFields) -> Self {
        Self {
            document_id: key.document_id,
            ordinal: key.ordinal,
            product: fields.product,
            quantity: fields.quantity,
            price: fields.price,
            tax_rate: fields.tax_rate,
        }
    }
}

/// Writable item columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub product: String,
    pub quantity: i32,
    pub price: Decimal,
    pub tax_rate: i32,
}

/// One row per distinct product name, each attribute the minimum across duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub product: String,
    pub quantity: i32,
    pub price: Decimal,
    pub tax_rate: i32,
}

/// Filter, ordering and page for a document list.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub page: PageRequest,
    /// Case-insensitive substring over first name, last name, type and city.
    pub search: Option<String>,
    pub sort_by: DocumentSortBy,
}

/// Identity account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Per-user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataFields {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}
