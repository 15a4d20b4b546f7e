//! Development seeding from `;`-delimited CSV files.
//!
//! Runs only when both the documents and items tables are empty. Item rows
//! reference documents by their 1-based row number in the documents file.

use std::io;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, DatabaseConnection, EntityTrait,
    PaginatorTrait, TransactionTrait,
};
use serde::Deserialize;

use docket_schema::{document_items, documents};

use crate::domain::types::{DocumentFields, DocumentItem};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: invalid price {value:?}")]
    Price { row: usize, value: String },
    #[error("row {row}: document {document} is not in the documents file")]
    UnknownDocument { row: usize, document: i32 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentRecord {
    #[serde(rename = "Type")]
    kind: String,
    date: NaiveDate,
    first_name: String,
    last_name: String,
    city: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemRecord {
    document_id: i32,
    ordinal: i32,
    product: String,
    quantity: i32,
    price: String,
    tax_rate: i32,
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parse a price written with either a decimal point or a decimal comma.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(&normalized).ok()
}

/// Read document rows. Row numbers in errors count data rows from 1.
pub fn read_documents<R: io::Read>(reader: R) -> Result<Vec<DocumentFields>, SeedError> {
    csv_reader(reader)
        .deserialize::<DocumentRecord>()
        .enumerate()
        .map(|(i, record)| {
            let r = record.map_err(|source| SeedError::Csv { row: i + 1, source })?;
            Ok(DocumentFields {
                kind: r.kind,
                date: r.date,
                first_name: r.first_name,
                last_name: r.last_name,
                city: r.city,
            })
        })
        .collect()
}

/// Read item rows. `document_id` is still the documents-file row number.
pub fn read_items<R: io::Read>(reader: R) -> Result<Vec<DocumentItem>, SeedError> {
    csv_reader(reader)
        .deserialize::<ItemRecord>()
        .enumerate()
        .map(|(i, record)| {
            let row = i + 1;
            let r = record.map_err(|source| SeedError::Csv { row, source })?;
            let price = parse_price(&r.price).ok_or_else(|| SeedError::Price {
                row,
                value: r.price.clone(),
            })?;
            Ok(DocumentItem {
                document_id: r.document_id,
                ordinal: r.ordinal,
                product: r.product,
                quantity: r.quantity,
                price: price.round_dp(2),
                tax_rate: r.tax_rate,
            })
        })
        .collect()
}

/// Load both files into an empty database. Does nothing if either table has rows.
pub async fn seed_if_empty(
    db: &DatabaseConnection,
    documents_path: &Path,
    items_path: &Path,
) -> anyhow::Result<()> {
    let existing_documents = documents::Entity::find()
        .count(db)
        .await
        .context("count documents")?;
    let existing_items = document_items::Entity::find()
        .count(db)
        .await
        .context("count document items")?;
    if existing_documents > 0 || existing_items > 0 {
        tracing::info!(
            existing_documents,
            existing_items,
            "database not empty, skipping seed"
        );
        return Ok(());
    }

    let docs_file = std::fs::File::open(documents_path)
        .with_context(|| format!("open {}", documents_path.display()))?;
    let docs = read_documents(docs_file)
        .with_context(|| format!("parse {}", documents_path.display()))?;
    let items_file = std::fs::File::open(items_path)
        .with_context(|| format!("open {}", items_path.display()))?;
    let items =
        read_items(items_file).with_context(|| format!("parse {}", items_path.display()))?;

    let txn = db.begin().await.context("begin seed")?;
    let mut ids = Vec::with_capacity(docs.len());
    for doc in &docs {
        let model = documents::ActiveModel {
            id: NotSet,
            kind: Set(doc.kind.clone()),
            date: Set(doc.date),
            first_name: Set(doc.first_name.clone()),
            last_name: Set(doc.last_name.clone()),
            city: Set(doc.city.clone()),
        }
        .insert(&txn)
        .await
        .context("insert seed document")?;
        ids.push(model.id);
    }
    for (i, item) in items.iter().enumerate() {
        let document_id = usize::try_from(item.document_id)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| ids.get(idx).copied())
            .ok_or(SeedError::UnknownDocument {
                row: i + 1,
                document: item.document_id,
            })?;
        document_items::ActiveModel {
            document_id: Set(document_id),
            ordinal: Set(item.ordinal),
            product: Set(item.product.clone()),
            quantity: Set(item.quantity),
            price: Set(item.price),
            tax_rate: Set(item.tax_rate),
        }
        .insert(&txn)
        .await
        .with_context(|| format!("insert seed item row {}", i + 1))?;
    }
    txn.commit().await.context("commit seed")?;

    tracing::info!(
        documents = docs.len(),
        items = items.len(),
        "seeded database"
    );
    Ok(())
}
