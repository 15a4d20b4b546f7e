use docket_api::domain::types::DocumentItem;
use docket_api::error::ApiError;
use docket_api::usecase::document_item::{
    AddItemInput, AddItemUseCase, DeleteItemUseCase, ListItemsByDocumentUseCase,
    ListProductsUseCase, UpdateItemInput, UpdateItemUseCase,
};
use docket_domain::id::ItemKey;
use rust_decimal::Decimal;

use crate::helpers::{InMemoryStore, item_fields};

fn add_usecase(store: &InMemoryStore) -> AddItemUseCase<InMemoryStore, InMemoryStore> {
    AddItemUseCase {
        items: store.clone(),
        documents: store.clone(),
    }
}

// ── AddItemUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_start_ordinal_at_one_for_new_product() {
    let store = InMemoryStore::with_documents(1);

    let item = add_usecase(&store)
        .execute(
            1,
            AddItemInput {
                body_document_id: None,
                fields: item_fields("Laptop"),
            },
        )
        .await
        .unwrap();

    assert_eq!(item.key(), ItemKey::new(1, 1));
}

#[tokio::test]
async fn should_number_ordinals_per_product_across_documents() {
    let store = InMemoryStore::with_documents(2);
    let usecase = add_usecase(&store);

    let add = |document_id: i32, product: &'static str| {
        let usecase = &usecase;
        async move {
            usecase
                .execute(
                    document_id,
                    AddItemInput {
                        body_document_id: Some(document_id),
                        fields: item_fields(product),
                    },
                )
                .await
                .unwrap()
        }
    };

    assert_eq!(add(1, "Pen").await.ordinal, 1);
    assert_eq!(add(2, "Ink").await.ordinal, 1);
    assert_eq!(add(2, "Pen").await.ordinal, 2);
    assert_eq!(add(1, "Pen").await.ordinal, 3);
    assert_eq!(store.item_count(), 4);
}

#[tokio::test]
async fn should_reject_item_for_mismatched_document() {
    let store = InMemoryStore::with_documents(2);

    let result = add_usecase(&store)
        .execute(
            1,
            AddItemInput {
                body_document_id: Some(2),
                fields: item_fields("Pen"),
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::DocumentIdMismatch)),
        "expected DocumentIdMismatch, got {result:?}"
    );
    assert_eq!(store.item_count(), 0);
}

#[tokio::test]
async fn should_reject_item_for_missing_document() {
    let store = InMemoryStore::new();

    let result = add_usecase(&store)
        .execute(
            9,
            AddItemInput {
                body_document_id: None,
                fields: item_fields("Pen"),
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::DocumentNotFound)));
}

#[tokio::test]
async fn should_report_key_collision_as_conflict() {
    let store = InMemoryStore::with_documents(1);
    // Ordinal 1 of document 1 is taken by a different product.
    store.insert_item(DocumentItem::with_fields(ItemKey::new(1, 1), item_fields("Ink")));

    let result = add_usecase(&store)
        .execute(
            1,
            AddItemInput {
                body_document_id: None,
                fields: item_fields("Pen"),
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::WriteConflict)),
        "expected WriteConflict, got {result:?}"
    );
}

// ── List use cases ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_fail_listing_document_without_items() {
    let usecase = ListItemsByDocumentUseCase {
        repo: InMemoryStore::with_documents(1),
    };

    let result = usecase.execute(1).await;
    assert!(matches!(result, Err(ApiError::NoDocumentItems)));
}

#[tokio::test]
async fn should_summarize_products_with_minimums() {
    let store = InMemoryStore::with_documents(2);
    let mut cheap = item_fields("Pen");
    cheap.price = Decimal::new(150, 2);
    cheap.quantity = 10;
    let mut low_tax = item_fields("Pen");
    low_tax.tax_rate = 8;
    store.insert_item(DocumentItem::with_fields(ItemKey::new(1, 1), cheap));
    store.insert_item(DocumentItem::with_fields(ItemKey::new(2, 2), low_tax));
    store.insert_item(DocumentItem::with_fields(ItemKey::new(2, 1), item_fields("Ink")));

    let products = ListProductsUseCase { repo: store }.execute().await.unwrap();

    assert_eq!(products.len(), 2);
    let pen = products.iter().find(|p| p.product == "Pen").unwrap();
    assert_eq!(pen.price, Decimal::new(150, 2));
    assert_eq!(pen.quantity, 2);
    assert_eq!(pen.tax_rate, 8);
}

#[tokio::test]
async fn should_fail_product_listing_when_empty() {
    let result = ListProductsUseCase {
        repo: InMemoryStore::new(),
    }
    .execute()
    .await;
    assert!(matches!(result, Err(ApiError::NoProducts)));
}

// ── UpdateItemUseCase / DeleteItemUseCase ────────────────────────────────────

#[tokio::test]
async fn should_update_item_in_place() {
    let store = InMemoryStore::with_documents(1);
    store.insert_item(DocumentItem::with_fields(ItemKey::new(1, 1), item_fields("Pen")));
    let usecase = UpdateItemUseCase {
        repo: store.clone(),
    };

    let mut fields = item_fields("Fountain pen");
    fields.quantity = 5;
    usecase
        .execute(
            ItemKey::new(1, 1),
            UpdateItemInput {
                body_document_id: Some(1),
                body_ordinal: Some(1),
                fields,
            },
        )
        .await
        .unwrap();

    let items = ListItemsByDocumentUseCase { repo: store }
        .execute(1)
        .await
        .unwrap();
    assert_eq!(items[0].product, "Fountain pen");
    assert_eq!(items[0].quantity, 5);
}

#[tokio::test]
async fn should_reject_update_with_mismatched_ordinal() {
    let store = InMemoryStore::with_documents(1);
    store.insert_item(DocumentItem::with_fields(ItemKey::new(1, 1), item_fields("Pen")));

    let result = UpdateItemUseCase { repo: store }
        .execute(
            ItemKey::new(1, 1),
            UpdateItemInput {
                body_document_id: Some(1),
                body_ordinal: Some(2),
                fields: item_fields("Pen"),
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::ItemKeyMismatch)));
}

#[tokio::test]
async fn should_fail_update_and_delete_for_missing_item() {
    let store = InMemoryStore::with_documents(1);

    let update = UpdateItemUseCase {
        repo: store.clone(),
    }
    .execute(
        ItemKey::new(1, 3),
        UpdateItemInput {
            body_document_id: None,
            body_ordinal: None,
            fields: item_fields("Pen"),
        },
    )
    .await;
    assert!(matches!(update, Err(ApiError::DocumentItemNotFound)));

    let delete = DeleteItemUseCase { repo: store }
        .execute(ItemKey::new(1, 3))
        .await;
    assert!(matches!(delete, Err(ApiError::DocumentItemNotFound)));
}
