//! Wire types, camelCase as the API sends them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: u64,
    pub total_pages: u64,
    pub items: Vec<T>,
}

/// Query for `GET /documents/getDocuments`. Unset fields use the server defaults.
#[derive(Debug, Clone, Default)]
pub struct DocumentListQuery {
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    #[serde(default)]
    pub items: Vec<DocumentItem>,
}

/// Body for adding or updating a document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreated {
    pub message: String,
    pub document_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAllResult {
    pub message: String,
    pub deleted: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
    pub document_id: i32,
    pub ordinal: i32,
    pub product: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub tax_rate: i32,
}

/// Body for adding or updating a line item. The key comes from the route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub product: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub tax_rate: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub tax_rate: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataInput {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}
