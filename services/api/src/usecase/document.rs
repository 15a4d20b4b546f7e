use docket_domain::pagination::Page;

use crate::domain::repository::DocumentRepository;
use crate::domain::types::{Document, DocumentFields, DocumentQuery};
use crate::error::ApiError;

/// Value `deleteAll` must be called with.
pub const DELETE_ALL_CONFIRMATION: &str = "CONFIRM";

// ── ListDocuments ────────────────────────────────────────────────────────────

pub struct ListDocumentsUseCase<R: DocumentRepository> {
    pub repo: R,
}

impl<R: DocumentRepository> ListDocumentsUseCase<R> {
    pub async fn execute(&self, mut query: DocumentQuery) -> Result<Page<Document>, ApiError> {
        query.page = query.page.clamped();
        query.search = query
            .search
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        self.repo.list(&query).await
    }
}

// ── GetDocument ──────────────────────────────────────────────────────────────

pub struct GetDocumentUseCase<R: DocumentRepository> {
    pub repo: R,
}

impl<R: DocumentRepository> GetDocumentUseCase<R> {
    pub async fn execute(&self, id: i32, include_items: bool) -> Result<Document, ApiError> {
        self.repo
            .find_by_id(id, include_items)
            .await?
            .ok_or(ApiError::DocumentNotFound)
    }
}

// ── CreateDocument ───────────────────────────────────────────────────────────

pub struct CreateDocumentUseCase<R: DocumentRepository> {
    pub repo: R,
}

impl<R: DocumentRepository> CreateDocumentUseCase<R> {
    pub async fn execute(&self, fields: DocumentFields) -> Result<Document, ApiError> {
        let document = self.repo.create(&fields).await?;
        tracing::info!(document_id = document.id, "document created");
        Ok(document)
    }
}

// ── UpdateDocument ───────────────────────────────────────────────────────────

pub struct UpdateDocumentInput {
    /// Id carried in the request body, if any. Must match the route id.
    pub body_id: Option<i32>,
    pub fields: DocumentFields,
}

pub struct UpdateDocumentUseCase<R: DocumentRepository> {
    pub repo: R,
}

impl<R: DocumentRepository> UpdateDocumentUseCase<R> {
    pub async fn execute(&self, id: i32, input: UpdateDocumentInput) -> Result<(), ApiError> {
        if input.body_id.is_some_and(|body_id| body_id != id) {
            return Err(ApiError::DocumentIdMismatch);
        }
        if !self.repo.exists(id).await? {
            return Err(ApiError::DocumentNotFound);
        }
        if self.repo.update(id, &input.fields).await? {
            return Ok(());
        }
        // Nothing written although the row was there a moment ago.
        if self.repo.exists(id).await? {
            tracing::warn!(document_id = id, "document update affected no rows");
            Err(ApiError::WriteConflict)
        } else {
            Err(ApiError::DocumentNotFound)
        }
    }
}

// ── DeleteDocument ───────────────────────────────────────────────────────────

pub struct DeleteDocumentUseCase<R: DocumentRepository> {
    pub repo: R,
}

impl<R: DocumentRepository> DeleteDocumentUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::DocumentNotFound);
        }
        tracing::info!(document_id = id, "document deleted");
        Ok(())
    }
}

// ── DeleteAllDocuments ───────────────────────────────────────────────────────

pub struct DeleteAllDocumentsUseCase<R: DocumentRepository> {
    pub repo: R,
}

impl<R: DocumentRepository> DeleteAllDocumentsUseCase<R> {
    /// Remove every document. Returns how many were deleted.
    pub async fn execute(&self, confirmation: Option<&str>) -> Result<u64, ApiError> {
        if confirmation != Some(DELETE_ALL_CONFIRMATION) {
            return Err(ApiError::ConfirmationRequired);
        }
        let deleted = self.repo.delete_all().await?;
        tracing::warn!(deleted, "all documents deleted");
        Ok(deleted)
    }
}
