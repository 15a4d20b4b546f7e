use docket_domain::id::ItemKey;

use crate::domain::repository::{DocumentItemRepository, DocumentRepository};
use crate::domain::types::{DocumentItem, ItemFields, ProductSummary};
use crate::error::ApiError;

// ── ListItemsByDocument ──────────────────────────────────────────────────────

pub struct ListItemsByDocumentUseCase<R: DocumentItemRepository> {
    pub repo: R,
}

impl<R: DocumentItemRepository> ListItemsByDocumentUseCase<R> {
    pub async fn execute(&self, document_id: i32) -> Result<Vec<DocumentItem>, ApiError> {
        let items = self.repo.list_by_document(document_id).await?;
        if items.is_empty() {
            return Err(ApiError::NoDocumentItems);
        }
        Ok(items)
    }
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<R: DocumentItemRepository> {
    pub repo: R,
}

impl<R: DocumentItemRepository> ListProductsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<ProductSummary>, ApiError> {
        let products = self.repo.list_products().await?;
        if products.is_empty() {
            return Err(ApiError::NoProducts);
        }
        Ok(products)
    }
}

// ── AddItem ──────────────────────────────────────────────────────────────────

pub struct AddItemInput {
    /// Document id carried in the request body, if any. Must match the route.
    pub body_document_id: Option<i32>,
    pub fields: ItemFields,
}

pub struct AddItemUseCase<I: DocumentItemRepository, D: DocumentRepository> {
    pub items: I,
    pub documents: D,
}

impl<I: DocumentItemRepository, D: DocumentRepository> AddItemUseCase<I, D> {
    pub async fn execute(
        &self,
        document_id: i32,
        input: AddItemInput,
    ) -> Result<DocumentItem, ApiError> {
        if input
            .body_document_id
            .is_some_and(|body_id| body_id != document_id)
        {
            return Err(ApiError::DocumentIdMismatch);
        }
        if !self.documents.exists(document_id).await? {
            return Err(ApiError::DocumentNotFound);
        }

        // Ordinals count per product name across all documents, not per document.
        let ordinal = self
            .items
            .max_ordinal_for_product(&input.fields.product)
            .await?
            .map_or(1, |max| max + 1);

        let item = DocumentItem::with_fields(ItemKey::new(document_id, ordinal), input.fields);
        self.items.create(&item).await?;
        tracing::info!(document_id, ordinal, "document item created");
        Ok(item)
    }
}

// ── UpdateItem ───────────────────────────────────────────────────────────────

pub struct UpdateItemInput {
    pub body_document_id: Option<i32>,
    pub body_ordinal: Option<i32>,
    pub fields: ItemFields,
}

pub struct UpdateItemUseCase<R: DocumentItemRepository> {
    pub repo: R,
}

impl<R: DocumentItemRepository> UpdateItemUseCase<R> {
    pub async fn execute(&self, key: ItemKey, input: UpdateItemInput) -> Result<(), ApiError> {
        let document_mismatch = input
            .body_document_id
            .is_some_and(|id| id != key.document_id);
        let ordinal_mismatch = input.body_ordinal.is_some_and(|o| o != key.ordinal);
        if document_mismatch || ordinal_mismatch {
            return Err(ApiError::ItemKeyMismatch);
        }
        if self.repo.find(key).await?.is_none() {
            return Err(ApiError::DocumentItemNotFound);
        }
        let item = DocumentItem::with_fields(key, input.fields);
        if !self.repo.update(&item).await? {
            tracing::warn!(item = %key, "document item update affected no rows");
            return Err(ApiError::WriteConflict);
        }
        Ok(())
    }
}

// ── DeleteItem ───────────────────────────────────────────────────────────────

pub struct DeleteItemUseCase<R: DocumentItemRepository> {
    pub repo: R,
}

impl<R: DocumentItemRepository> DeleteItemUseCase<R> {
    pub async fn execute(&self, key: ItemKey) -> Result<(), ApiError> {
        if !self.repo.delete(key).await? {
            return Err(ApiError::DocumentItemNotFound);
        }
        tracing::info!(item = %key, "document item deleted");
        Ok(())
    }
}
