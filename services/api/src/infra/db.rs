use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition,
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use docket_domain::document::DocumentSortKey;
use docket_domain::id::ItemKey;
use docket_domain::pagination::{Page, PageRequest, Sort};
use docket_domain::role::Role;
use docket_schema::{document_items, documents, roles, user_data, user_roles, users};

use crate::domain::repository::{
    AccountRepository, DocumentItemRepository, DocumentRepository, UserDataRepository,
};
use crate::domain::types::{
    Account, Document, DocumentFields, DocumentItem, DocumentQuery, ProductSummary, UserData,
    UserDataFields,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE`.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ── Document repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDocumentRepository {
    pub db: Arc<DatabaseConnection>,
}

impl DocumentRepository for DbDocumentRepository {
    async fn list(&self, query: &DocumentQuery) -> Result<Page<Document>, ApiError> {
        let PageRequest {
            page_index,
            page_size,
        } = query.page.clamped();

        let mut select = documents::Entity::find();
        if let Some(term) = query.search.as_deref() {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let condition = [
                documents::Column::FirstName,
                documents::Column::LastName,
                documents::Column::Kind,
                documents::Column::City,
            ]
            .into_iter()
            .fold(Condition::any(), |cond, col| {
                cond.add(
                    Expr::expr(Func::lower(Expr::col(col)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
            });
            select = select.filter(condition);
        }

        let order = match query.sort_by.sort {
            Sort::Asc => Order::Asc,
            Sort::Desc => Order::Desc,
        };
        let column = match query.sort_by.key {
            DocumentSortKey::Id => documents::Column::Id,
            DocumentSortKey::Date => documents::Column::Date,
            DocumentSortKey::LastName => documents::Column::LastName,
            DocumentSortKey::FirstName => documents::Column::FirstName,
            DocumentSortKey::City => documents::Column::City,
            DocumentSortKey::Type => documents::Column::Kind,
        };
        select = select.order_by(column, order.clone());
        if query.sort_by.key != DocumentSortKey::Id {
            // Stable paging across equal sort values.
            select = select.order_by(documents::Column::Id, order);
        }

        let paginator = select.paginate(self.db.as_ref(), u64::from(page_size));
        let total_items = paginator.num_items().await.context("count documents")?;
        let models = paginator
            .fetch_page(u64::from(page_index))
            .await
            .context("fetch documents page")?;

        let items = models
            .into_iter()
            .map(|m| document_from_model(m, vec![]))
            .collect();
        Ok(Page::new(items, total_items, page_size))
    }

    async fn find_by_id(
        &self,
        id: i32,
        include_items: bool,
    ) -> Result<Option<Document>, ApiError> {
        let Some(model) = documents::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find document by id")?
        else {
            return Ok(None);
        };
        let items = if include_items {
            document_items::Entity::find()
                .filter(document_items::Column::DocumentId.eq(id))
                .order_by_asc(document_items::Column::Ordinal)
                .all(self.db.as_ref())
                .await
                .context("list items for document")?
                .into_iter()
                .map(item_from_model)
                .collect()
        } else {
            vec![]
        };
        Ok(Some(document_from_model(model, items)))
    }

    async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        let model = documents::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("check document exists")?;
        Ok(model.is_some())
    }

    async fn create(&self, fields: &DocumentFields) -> Result<Document, ApiError> {
        let model = documents::ActiveModel {
            id: NotSet,
            kind: Set(fields.kind.clone()),
            date: Set(fields.date),
            first_name: Set(fields.first_name.clone()),
            last_name: Set(fields.last_name.clone()),
            city: Set(fields.city.clone()),
        }
        .insert(self.db.as_ref())
        .await
        .context("create document")?;
        Ok(document_from_model(model, vec![]))
    }

    async fn update(&self, id: i32, fields: &DocumentFields) -> Result<bool, ApiError> {
        let result = documents::Entity::update_many()
            .set(documents::ActiveModel {
                kind: Set(fields.kind.clone()),
                date: Set(fields.date),
                first_name: Set(fields.first_name.clone()),
                last_name: Set(fields.last_name.clone()),
                city: Set(fields.city.clone()),
                ..Default::default()
            })
            .filter(documents::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .context("update document")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        // Items go with the document through ON DELETE CASCADE.
        let result = documents::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .context("delete document")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_all(&self) -> Result<u64, ApiError> {
        let txn = self.db.begin().await.context("begin delete all")?;
        let count = documents::Entity::find()
            .count(&txn)
            .await
            .context("count documents")?;
        txn.execute_unprepared("TRUNCATE TABLE documents RESTART IDENTITY CASCADE")
            .await
            .context("truncate documents")?;
        txn.commit().await.context("commit delete all")?;
        Ok(count)
    }
}

fn document_from_model(model: documents::Model, items: Vec<DocumentItem>) -> Document {
    Document {
        id: model.id,
        kind: model.kind,
        date: model.date,
        first_name: model.first_name,
        last_name: model.last_name,
        city: model.city,
        items,
    }
}

// ── Document item repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDocumentItemRepository {
    pub db: Arc<DatabaseConnection>,
}

#[derive(Debug, FromQueryResult)]
struct ProductRow {
    product: String,
    quantity: i32,
    price: rust_decimal::Decimal,
    tax_rate: i32,
}

impl DocumentItemRepository for DbDocumentItemRepository {
    async fn list_by_document(&self, document_id: i32) -> Result<Vec<DocumentItem>, ApiError> {
        let models = document_items::Entity::find()
            .filter(document_items::Column::DocumentId.eq(document_id))
            .order_by_asc(document_items::Column::Ordinal)
            .all(self.db.as_ref())
            .await
            .context("list items by document")?;
        Ok(models.into_iter().map(item_from_model).collect())
    }

    async fn list_products(&self) -> Result<Vec<ProductSummary>, ApiError> {
        let rows = document_items::Entity::find()
            .select_only()
            .column(document_items::Column::Product)
            .column_as(Expr::col(document_items::Column::Quantity).min(), "quantity")
            .column_as(Expr::col(document_items::Column::Price).min(), "price")
            .column_as(Expr::col(document_items::Column::TaxRate).min(), "tax_rate")
            .group_by(document_items::Column::Product)
            .order_by_asc(document_items::Column::Product)
            .into_model::<ProductRow>()
            .all(self.db.as_ref())
            .await
            .context("list distinct products")?;
        Ok(rows
            .into_iter()
            .map(|r| ProductSummary {
                product: r.product,
                quantity: r.quantity,
                price: r.price,
                tax_rate: r.tax_rate,
            })
            .collect())
    }

    async fn max_ordinal_for_product(&self, product: &str) -> Result<Option<i32>, ApiError> {
        let max = document_items::Entity::find()
            .select_only()
            .column_as(Expr::col(document_items::Column::Ordinal).max(), "max_ordinal")
            .filter(document_items::Column::Product.eq(product))
            .into_tuple::<Option<i32>>()
            .one(self.db.as_ref())
            .await
            .context("max ordinal for product")?;
        Ok(max.flatten())
    }

    async fn create(&self, item: &DocumentItem) -> Result<(), ApiError> {
        let active = document_items::ActiveModel {
            document_id: Set(item.document_id),
            ordinal: Set(item.ordinal),
            product: Set(item.product.clone()),
            quantity: Set(item.quantity),
            price: Set(item.price),
            tax_rate: Set(item.tax_rate),
        };
        match document_items::Entity::insert(active)
            .exec_without_returning(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(item = %item.key(), "document item key already taken");
                Err(ApiError::WriteConflict)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create document item").into()),
        }
    }

    async fn find(&self, key: ItemKey) -> Result<Option<DocumentItem>, ApiError> {
        let model = document_items::Entity::find_by_id((key.document_id, key.ordinal))
            .one(self.db.as_ref())
            .await
            .context("find document item")?;
        Ok(model.map(item_from_model))
    }

    async fn update(&self, item: &DocumentItem) -> Result<bool, ApiError> {
        let result = document_items::Entity::update_many()
            .set(document_items::ActiveModel {
                product: Set(item.product.clone()),
                quantity: Set(item.quantity),
                price: Set(item.price),
                tax_rate: Set(item.tax_rate),
                ..Default::default()
            })
            .filter(document_items::Column::DocumentId.eq(item.document_id))
            .filter(document_items::Column::Ordinal.eq(item.ordinal))
            .exec(self.db.as_ref())
            .await
            .context("update document item")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, ApiError> {
        let result = document_items::Entity::delete_by_id((key.document_id, key.ordinal))
            .exec(self.db.as_ref())
            .await
            .context("delete document item")?;
        Ok(result.rows_affected > 0)
    }
}

fn item_from_model(model: document_items::Model) -> DocumentItem {
    DocumentItem {
        document_id: model.document_id,
        ordinal: model.ordinal,
        product: model.product,
        quantity: model.quantity,
        price: model.price,
        tax_rate: model.tax_rate,
    }
}

// ── User data repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserDataRepository {
    pub db: Arc<DatabaseConnection>,
}

impl UserDataRepository for DbUserDataRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserData>, ApiError> {
        let model = user_data::Entity::find()
            .filter(user_data::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .context("find user data by user")?;
        Ok(model.map(|m| UserData {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            city: m.city,
            user_id: m.user_id,
        }))
    }

    async fn create(&self, data: &UserData) -> Result<(), ApiError> {
        let active = user_data::ActiveModel {
            id: Set(data.id),
            first_name: Set(data.first_name.clone()),
            last_name: Set(data.last_name.clone()),
            city: Set(data.city.clone()),
            user_id: Set(data.user_id),
        };
        match user_data::Entity::insert(active)
            .exec_without_returning(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::UserDataExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user data").into()),
        }
    }

    async fn update(&self, user_id: Uuid, fields: &UserDataFields) -> Result<bool, ApiError> {
        let result = user_data::Entity::update_many()
            .set(user_data::ActiveModel {
                first_name: Set(fields.first_name.clone()),
                last_name: Set(fields.last_name.clone()),
                city: Set(fields.city.clone()),
                ..Default::default()
            })
            .filter(user_data::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .context("update user data")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: Arc<DatabaseConnection>,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .context("find account by email")?;
        Ok(model.map(account_from_model))
    }

    async fn create(&self, account: &Account) -> Result<(), ApiError> {
        let active = users::ActiveModel {
            id: Set(account.id),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            last_active: Set(account.last_active),
            created_at: Set(account.created_at),
        };
        match users::Entity::insert(active)
            .exec_without_returning(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailTaken),
            Err(e) => Err(anyhow::Error::new(e).context("create account").into()),
        }
    }

    async fn ensure_role(&self, role: Role) -> Result<i32, ApiError> {
        roles::Entity::insert(roles::ActiveModel {
            id: NotSet,
            name: Set(role.name().to_owned()),
        })
        .on_conflict(
            OnConflict::column(roles::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db.as_ref())
        .await
        .context("insert role")?;

        let model = roles::Entity::find()
            .filter(roles::Column::Name.eq(role.name()))
            .one(self.db.as_ref())
            .await
            .context("find role by name")?
            .ok_or_else(|| anyhow::anyhow!("role {role} missing after insert"))?;
        Ok(model.id)
    }

    async fn assign_role(&self, user_id: Uuid, role_id: i32) -> Result<(), ApiError> {
        user_roles::Entity::insert(user_roles::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .on_conflict(
            OnConflict::columns([user_roles::Column::UserId, user_roles::Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db.as_ref())
        .await
        .context("assign role")?;
        Ok(())
    }

    async fn set_last_active(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        users::Entity::update_many()
            .set(users::ActiveModel {
                last_active: Set(Some(at)),
                ..Default::default()
            })
            .filter(users::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .context("set last active")?;
        Ok(())
    }
}

fn account_from_model(model: users::Model) -> Account {
    Account {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        last_active: model.last_active,
        created_at: model.created_at,
    }
}
