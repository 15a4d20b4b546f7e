#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use docket_domain::id::ItemKey;
use docket_domain::pagination::Page;
use docket_domain::role::Role;

use crate::domain::types::{
    Account, Document, DocumentFields, DocumentItem, DocumentQuery, ProductSummary, UserData,
    UserDataFields,
};
use crate::error::ApiError;

/// Repository for document headers.
pub trait DocumentRepository: Send + Sync {
    async fn list(&self, query: &DocumentQuery) -> Result<Page<Document>, ApiError>;

    /// Find a document, loading its items only when `include_items` is set.
    async fn find_by_id(
        &self,
        id: i32,
        include_items: bool,
    ) -> Result<Option<Document>, ApiError>;

    async fn exists(&self, id: i32) -> Result<bool, ApiError>;

    /// Insert a document. The id is generated by the store.
    async fn create(&self, fields: &DocumentFields) -> Result<Document, ApiError>;

    /// Replace the writable columns. Returns `true` if a row was updated.
    async fn update(&self, id: i32, fields: &DocumentFields) -> Result<bool, ApiError>;

    /// Delete a document and its items. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;

    /// Delete every document and item and restart id generation.
    /// Returns the number of documents removed.
    async fn delete_all(&self) -> Result<u64, ApiError>;
}

/// Repository for document line items.
pub trait DocumentItemRepository: Send + Sync {
    /// Items of one document, ordered by ordinal.
    async fn list_by_document(&self, document_id: i32) -> Result<Vec<DocumentItem>, ApiError>;

    /// Distinct product names with minimum quantity, price and tax rate.
    async fn list_products(&self) -> Result<Vec<ProductSummary>, ApiError>;

    /// Highest ordinal used by any item with this product name, across all documents.
    async fn max_ordinal_for_product(&self, product: &str) -> Result<Option<i32>, ApiError>;

    /// Insert an item. A key collision is a [`ApiError::WriteConflict`].
    async fn create(&self, item: &DocumentItem) -> Result<(), ApiError>;

    async fn find(&self, key: ItemKey) -> Result<Option<DocumentItem>, ApiError>;

    /// Replace product, quantity, price and tax rate. Returns `true` if a row was updated.
    async fn update(&self, item: &DocumentItem) -> Result<bool, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, key: ItemKey) -> Result<bool, ApiError>;
}

/// Repository for per-user profiles.
pub trait UserDataRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserData>, ApiError>;

    /// Insert a profile. A second profile for the same user is [`ApiError::UserDataExists`].
    async fn create(&self, data: &UserData) -> Result<(), ApiError>;

    /// Returns `true` if a row was updated.
    async fn update(&self, user_id: Uuid, fields: &UserDataFields) -> Result<bool, ApiError>;
}

/// Repository for identity accounts and their roles.
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ApiError>;

    /// Insert an account. A taken email is [`ApiError::EmailTaken`].
    async fn create(&self, account: &Account) -> Result<(), ApiError>;

    /// Make sure the role row exists. Returns its id.
    async fn ensure_role(&self, role: Role) -> Result<i32, ApiError>;

    /// Grant a role. Granting an already-held role is a no-op.
    async fn assign_role(&self, user_id: Uuid, role_id: i32) -> Result<(), ApiError>;

    async fn set_last_active(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError>;
}
