use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use docket_auth_types::identity::BearerIdentity;
use docket_domain::id::ItemKey;

use crate::domain::types::{DocumentItem, ItemFields, ProductSummary};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;
use crate::usecase::document_item::{
    AddItemInput, AddItemUseCase, DeleteItemUseCase, ListItemsByDocumentUseCase,
    ListProductsUseCase, UpdateItemInput, UpdateItemUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItemResponse {
    pub document_id: i32,
    pub ordinal: i32,
    pub product: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub tax_rate: i32,
}

impl From<DocumentItem> for DocumentItemResponse {
    fn from(item: DocumentItem) -> Self {
        Self {
            document_id: item.document_id,
            ordinal: item.ordinal,
            product: item.product,
            quantity: item.quantity,
            price: item.price,
            tax_rate: item.tax_rate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub tax_rate: i32,
}

impl From<ProductSummary> for ProductResponse {
    fn from(p: ProductSummary) -> Self {
        Self {
            product: p.product,
            quantity: p.quantity,
            price: p.price,
            tax_rate: p.tax_rate,
        }
    }
}

// ── Request body ─────────────────────────────────────────────────────────────

/// Prices are stored with two decimal places, rounding half to even.
fn to_cents(price: Decimal) -> Decimal {
    price.round_dp(2)
}

/// The stored (rounded) price must be positive.
fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if to_cents(*price) > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("positive"))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItemRequest {
    #[serde(default)]
    pub document_id: Option<i32>,
    #[serde(default)]
    pub ordinal: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub product: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "positive_price"))]
    pub price: Decimal,
    #[validate(range(min = 0, max = 100))]
    pub tax_rate: i32,
}

impl DocumentItemRequest {
    fn fields(&self) -> ItemFields {
        ItemFields {
            product: self.product.clone(),
            quantity: self.quantity,
            price: to_cents(self.price),
            tax_rate: self.tax_rate,
        }
    }
}

// ── GET /documentItems/byDocument/{documentId} ───────────────────────────────

pub async fn get_items_by_document(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
) -> Result<Json<Vec<DocumentItemResponse>>, ApiError> {
    let usecase = ListItemsByDocumentUseCase {
        repo: state.document_item_repo(),
    };
    let items = usecase.execute(document_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

// ── GET /documentItems/allItems ──────────────────────────────────────────────

pub async fn get_all_items(
    _identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let usecase = ListProductsUseCase {
        repo: state.document_item_repo(),
    };
    let products = usecase.execute().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── POST /documentItems/addItemToDocument/{documentId} ───────────────────────

pub async fn add_item_to_document(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<DocumentItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = AddItemUseCase {
        items: state.document_item_repo(),
        documents: state.document_repo(),
    };
    let item = usecase
        .execute(
            document_id,
            AddItemInput {
                body_document_id: body.document_id,
                fields: body.fields(),
            },
        )
        .await?;
    let location = format!("/documentItems/byDocument/{document_id}");
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DocumentItemResponse::from(item)),
    ))
}

// ── PUT /documentItems/update/{documentId}/item/{ordinal} ────────────────────

pub async fn update_item(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(key): Path<(i32, i32)>,
    ValidatedJson(body): ValidatedJson<DocumentItemRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdateItemUseCase {
        repo: state.document_item_repo(),
    };
    usecase
        .execute(
            ItemKey::from(key),
            UpdateItemInput {
                body_document_id: body.document_id,
                body_ordinal: body.ordinal,
                fields: body.fields(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /documentItems/delete/{documentId}/item/{ordinal} ─────────────────

pub async fn delete_item(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(key): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteItemUseCase {
        repo: state.document_item_repo(),
    };
    usecase.execute(ItemKey::from(key)).await?;
    Ok(StatusCode::NO_CONTENT)
}
