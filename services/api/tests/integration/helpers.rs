use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use docket_api::domain::repository::{
    AccountRepository, DocumentItemRepository, DocumentRepository, UserDataRepository,
};
use docket_api::domain::types::{
    Account, Document, DocumentFields, DocumentItem, DocumentQuery, ItemFields, ProductSummary,
    UserData, UserDataFields,
};
use docket_api::error::ApiError;
use docket_domain::document::DocumentSortKey;
use docket_domain::id::ItemKey;
use docket_domain::pagination::{Page, Sort};
use docket_domain::role::Role;

// ── InMemoryStore ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Tables {
    pub next_document_id: i32,
    pub documents: BTreeMap<i32, DocumentFields>,
    pub items: BTreeMap<(i32, i32), DocumentItem>,
    pub user_data: Vec<UserData>,
    pub accounts: Vec<Account>,
    pub roles: Vec<(i32, String)>,
    pub user_roles: Vec<(Uuid, i32)>,
}

/// Shared in-memory tables implementing every repository trait.
///
/// Clones share state, so one store can back several use cases and be
/// inspected afterwards.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(n: usize) -> Self {
        let store = Self::new();
        {
            let mut t = store.tables.lock().unwrap();
            for i in 0..n {
                t.next_document_id += 1;
                let id = t.next_document_id;
                t.documents.insert(id, document_fields(&format!("Last{i:02}")));
            }
        }
        store
    }

    pub fn insert_item(&self, item: DocumentItem) {
        self.tables
            .lock()
            .unwrap()
            .items
            .insert((item.document_id, item.ordinal), item);
    }

    pub fn insert_account(&self, account: Account) {
        self.tables.lock().unwrap().accounts.push(account);
    }

    pub fn item_count(&self) -> usize {
        self.tables.lock().unwrap().items.len()
    }

    pub fn document(&self, id: i32) -> Option<DocumentFields> {
        self.tables.lock().unwrap().documents.get(&id).cloned()
    }

    pub fn roles_of(&self, user_id: Uuid) -> Vec<String> {
        let t = self.tables.lock().unwrap();
        t.user_roles
            .iter()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, role_id)| t.roles.iter().find(|(id, _)| id == role_id))
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub fn account(&self, id: Uuid) -> Option<Account> {
        self.tables
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }
}

fn items_of(t: &Tables, document_id: i32) -> Vec<DocumentItem> {
    t.items
        .values()
        .filter(|i| i.document_id == document_id)
        .cloned()
        .collect()
}

fn to_document(id: i32, fields: &DocumentFields, items: Vec<DocumentItem>) -> Document {
    Document {
        id,
        kind: fields.kind.clone(),
        date: fields.date,
        first_name: fields.first_name.clone(),
        last_name: fields.last_name.clone(),
        city: fields.city.clone(),
        items,
    }
}

fn matches_search(fields: &DocumentFields, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [
        &fields.first_name,
        &fields.last_name,
        &fields.kind,
        &fields.city,
    ]
    .iter()
    .any(|v| v.to_lowercase().contains(&needle))
}

fn compare(key: DocumentSortKey, a: &(i32, DocumentFields), b: &(i32, DocumentFields)) -> Ordering {
    let by_key = match key {
        DocumentSortKey::Id => Ordering::Equal,
        DocumentSortKey::Date => a.1.date.cmp(&b.1.date),
        DocumentSortKey::LastName => a.1.last_name.cmp(&b.1.last_name),
        DocumentSortKey::FirstName => a.1.first_name.cmp(&b.1.first_name),
        DocumentSortKey::City => a.1.city.cmp(&b.1.city),
        DocumentSortKey::Type => a.1.kind.cmp(&b.1.kind),
    };
    by_key.then(a.0.cmp(&b.0))
}

impl DocumentRepository for InMemoryStore {
    async fn list(&self, query: &DocumentQuery) -> Result<Page<Document>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<(i32, DocumentFields)> = t
            .documents
            .iter()
            .filter(|(_, f)| query.search.as_deref().is_none_or(|s| matches_search(f, s)))
            .map(|(id, f)| (*id, f.clone()))
            .collect();
        rows.sort_by(|a, b| compare(query.sort_by.key, a, b));
        if query.sort_by.sort == Sort::Desc {
            rows.reverse();
        }
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.page_size as usize)
            .map(|(id, f)| to_document(id, &f, vec![]))
            .collect();
        Ok(Page::new(items, total, query.page.page_size))
    }

    async fn find_by_id(
        &self,
        id: i32,
        include_items: bool,
    ) -> Result<Option<Document>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.documents.get(&id).map(|f| {
            let items = if include_items {
                items_of(&t, id)
            } else {
                vec![]
            };
            to_document(id, f, items)
        }))
    }

    async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        Ok(self.tables.lock().unwrap().documents.contains_key(&id))
    }

    async fn create(&self, fields: &DocumentFields) -> Result<Document, ApiError> {
        let mut t = self.tables.lock().unwrap();
        t.next_document_id += 1;
        let id = t.next_document_id;
        t.documents.insert(id, fields.clone());
        Ok(to_document(id, fields, vec![]))
    }

    async fn update(&self, id: i32, fields: &DocumentFields) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        Ok(match t.documents.get_mut(&id) {
            Some(row) => {
                *row = fields.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        if t.documents.remove(&id).is_none() {
            return Ok(false);
        }
        t.items.retain(|(document_id, _), _| *document_id != id);
        Ok(true)
    }

    async fn delete_all(&self) -> Result<u64, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let deleted = t.documents.len() as u64;
        t.documents.clear();
        t.items.clear();
        t.next_document_id = 0;
        Ok(deleted)
    }
}

impl DocumentItemRepository for InMemoryStore {
    async fn list_by_document(&self, document_id: i32) -> Result<Vec<DocumentItem>, ApiError> {
        Ok(items_of(&self.tables.lock().unwrap(), document_id))
    }

    async fn list_products(&self) -> Result<Vec<ProductSummary>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut products: BTreeMap<String, ProductSummary> = BTreeMap::new();
        for item in t.items.values() {
            products
                .entry(item.product.clone())
                .and_modify(|p| {
                    p.quantity = p.quantity.min(item.quantity);
                    p.price = p.price.min(item.price);
                    p.tax_rate = p.tax_rate.min(item.tax_rate);
                })
                .or_insert_with(|| ProductSummary {
                    product: item.product.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    tax_rate: item.tax_rate,
                });
        }
        Ok(products.into_values().collect())
    }

    async fn max_ordinal_for_product(&self, product: &str) -> Result<Option<i32>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .items
            .values()
            .filter(|i| i.product == product)
            .map(|i| i.ordinal)
            .max())
    }

    async fn create(&self, item: &DocumentItem) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        let key = (item.document_id, item.ordinal);
        if t.items.contains_key(&key) {
            return Err(ApiError::WriteConflict);
        }
        t.items.insert(key, item.clone());
        Ok(())
    }

    async fn find(&self, key: ItemKey) -> Result<Option<DocumentItem>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .items
            .get(&(key.document_id, key.ordinal))
            .cloned())
    }

    async fn update(&self, item: &DocumentItem) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        Ok(match t.items.get_mut(&(item.document_id, item.ordinal)) {
            Some(row) => {
                *row = item.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .items
            .remove(&(key.document_id, key.ordinal))
            .is_some())
    }
}

impl UserDataRepository for InMemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserData>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .user_data
            .iter()
            .find(|d| d.user_id == Some(user_id))
            .cloned())
    }

    async fn create(&self, data: &UserData) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        if data.user_id.is_some() && t.user_data.iter().any(|d| d.user_id == data.user_id) {
            return Err(ApiError::UserDataExists);
        }
        t.user_data.push(data.clone());
        Ok(())
    }

    async fn update(&self, user_id: Uuid, fields: &UserDataFields) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        Ok(
            match t.user_data.iter_mut().find(|d| d.user_id == Some(user_id)) {
                Some(row) => {
                    row.first_name = fields.first_name.clone();
                    row.last_name = fields.last_name.clone();
                    row.city = fields.city.clone();
                    true
                }
                None => false,
            },
        )
    }
}

impl AccountRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ApiError> {
        Ok(self.account(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ApiError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create(&self, account: &Account) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        if t.accounts.iter().any(|a| a.email == account.email) {
            return Err(ApiError::EmailTaken);
        }
        t.accounts.push(account.clone());
        Ok(())
    }

    async fn ensure_role(&self, role: Role) -> Result<i32, ApiError> {
        let mut t = self.tables.lock().unwrap();
        if let Some((id, _)) = t.roles.iter().find(|(_, name)| name == role.name()) {
            return Ok(*id);
        }
        let id = t.roles.len() as i32 + 1;
        t.roles.push((id, role.name().to_owned()));
        Ok(id)
    }

    async fn assign_role(&self, user_id: Uuid, role_id: i32) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        if !t.user_roles.contains(&(user_id, role_id)) {
            t.user_roles.push((user_id, role_id));
        }
        Ok(())
    }

    async fn set_last_active(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(account) = t.accounts.iter_mut().find(|a| a.id == user_id) {
            account.last_active = Some(at);
        }
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn document_fields(last_name: &str) -> DocumentFields {
    DocumentFields {
        kind: "Invoice".to_owned(),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        first_name: "Jan".to_owned(),
        last_name: last_name.to_owned(),
        city: "Warszawa".to_owned(),
    }
}

pub fn item_fields(product: &str) -> ItemFields {
    ItemFields {
        product: product.to_owned(),
        quantity: 2,
        price: Decimal::new(1999, 2),
        tax_rate: 23,
    }
}

pub fn user_data_fields() -> UserDataFields {
    UserDataFields {
        first_name: "Anna".to_owned(),
        last_name: "Nowak".to_owned(),
        city: "Kraków".to_owned(),
    }
}

pub fn test_account(last_active: Option<DateTime<Utc>>) -> Account {
    Account {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: "user@example.com".to_owned(),
        password_hash: String::new(),
        last_active,
        created_at: Utc::now(),
    }
}

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
