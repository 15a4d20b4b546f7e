use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use docket_auth_types::identity::BearerIdentity;
use docket_domain::document::DocumentSortBy;
use docket_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Document, DocumentFields, DocumentQuery};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::handlers::document_item::DocumentItemResponse;
use crate::state::AppState;
use crate::usecase::document::{
    CreateDocumentUseCase, DeleteAllDocumentsUseCase, DeleteDocumentUseCase, GetDocumentUseCase,
    ListDocumentsUseCase, UpdateDocumentInput, UpdateDocumentUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub items: Vec<DocumentItemResponse>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            kind: doc.kind,
            date: doc.date,
            first_name: doc.first_name,
            last_name: doc.last_name,
            city: doc.city,
            items: doc.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreatedResponse {
    pub message: &'static str,
    pub document_id: i32,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub message: &'static str,
    pub deleted: u64,
}

// ── Request body ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Optional on create; on update it must match the route id when present.
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub kind: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 30))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
}

impl From<DocumentRequest> for DocumentFields {
    fn from(req: DocumentRequest) -> Self {
        Self {
            kind: req.kind,
            date: req.date,
            first_name: req.first_name,
            last_name: req.last_name,
            city: req.city,
        }
    }
}

// ── GET /documents/getDocuments ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsParams {
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_descending: bool,
}

impl From<ListDocumentsParams> for DocumentQuery {
    fn from(p: ListDocumentsParams) -> Self {
        let defaults = PageRequest::default();
        Self {
            page: PageRequest {
                page_index: p.page_index.unwrap_or(defaults.page_index),
                page_size: p.page_size.unwrap_or(defaults.page_size),
            },
            sort_by: DocumentSortBy::from_query(p.sort_by.as_deref(), p.sort_descending),
            search: p.search,
        }
    }
}

pub async fn get_documents(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Query(params): Query<ListDocumentsParams>,
) -> Result<Json<Page<DocumentResponse>>, ApiError> {
    let usecase = ListDocumentsUseCase {
        repo: state.document_repo(),
    };
    let page = usecase.execute(params.into()).await?;
    Ok(Json(page.map(Into::into)))
}

// ── GET /documents/getDocument/{id} ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentParams {
    #[serde(default = "default_include_items")]
    pub include_items: bool,
}

fn default_include_items() -> bool {
    true
}

pub async fn get_document(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<GetDocumentParams>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let usecase = GetDocumentUseCase {
        repo: state.document_repo(),
    };
    let doc = usecase.execute(id, params.include_items).await?;
    Ok(Json(doc.into()))
}

// ── POST /documents/addDocument ──────────────────────────────────────────────

pub async fn add_document(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<DocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateDocumentUseCase {
        repo: state.document_repo(),
    };
    let doc = usecase.execute(body.into()).await?;
    let location = format!("/documents/getDocument/{}", doc.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DocumentCreatedResponse {
            message: "Document added successfully",
            document_id: doc.id,
        }),
    ))
}

// ── PUT /documents/updateDocument/{id} ───────────────────────────────────────

pub async fn update_document(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<DocumentRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdateDocumentUseCase {
        repo: state.document_repo(),
    };
    let body_id = body.id;
    usecase
        .execute(
            id,
            UpdateDocumentInput {
                body_id,
                fields: body.into(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /documents/deleteDocument/{id} ────────────────────────────────────

pub async fn delete_document(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteDocumentUseCase {
        repo: state.document_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /documents/deleteAll?confirmation=CONFIRM ─────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteAllParams {
    pub confirmation: Option<String>,
}

pub async fn delete_all_documents(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Query(params): Query<DeleteAllParams>,
) -> Result<Json<DeleteAllResponse>, ApiError> {
    let usecase = DeleteAllDocumentsUseCase {
        repo: state.document_repo(),
    };
    let deleted = usecase.execute(params.confirmation.as_deref()).await?;
    Ok(Json(DeleteAllResponse {
        message: "All documents have been deleted. Identity has been reset",
        deleted,
    }))
}
