use docket_api::domain::types::DocumentQuery;
use docket_api::error::ApiError;
use docket_api::usecase::document::{
    CreateDocumentUseCase, DeleteAllDocumentsUseCase, DeleteDocumentUseCase, GetDocumentUseCase,
    ListDocumentsUseCase, UpdateDocumentInput, UpdateDocumentUseCase,
};
use docket_domain::document::{DocumentSortBy, DocumentSortKey};
use docket_domain::pagination::{PageRequest, Sort};

use crate::helpers::{InMemoryStore, document_fields, item_fields};
use docket_api::domain::types::DocumentItem;
use docket_domain::id::ItemKey;

// ── ListDocumentsUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_page_through_documents() {
    let usecase = ListDocumentsUseCase {
        repo: InMemoryStore::with_documents(25),
    };

    let page = usecase
        .execute(DocumentQuery {
            page: PageRequest {
                page_index: 2,
                page_size: 10,
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_items, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].id, 21);
}

#[tokio::test]
async fn should_return_empty_page_past_the_end() {
    let usecase = ListDocumentsUseCase {
        repo: InMemoryStore::with_documents(3),
    };

    let page = usecase
        .execute(DocumentQuery {
            page: PageRequest {
                page_index: 5,
                page_size: 10,
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn should_clamp_oversized_page() {
    let usecase = ListDocumentsUseCase {
        repo: InMemoryStore::with_documents(150),
    };

    let page = usecase
        .execute(DocumentQuery {
            page: PageRequest {
                page_index: 0,
                page_size: 1000,
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.items.len(), 100);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn should_search_case_insensitively_and_sort_descending() {
    let usecase = ListDocumentsUseCase {
        repo: InMemoryStore::with_documents(12),
    };

    let page = usecase
        .execute(DocumentQuery {
            search: Some("  last1 ".to_owned()),
            sort_by: DocumentSortBy {
                key: DocumentSortKey::LastName,
                sort: Sort::Desc,
            },
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<_> = page.items.iter().map(|d| d.last_name.as_str()).collect();
    assert_eq!(names, ["Last11", "Last10"]);
    assert_eq!(page.total_items, 2);
}

// ── GetDocumentUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_include_items_only_when_requested() {
    let store = InMemoryStore::with_documents(1);
    store.insert_item(DocumentItem::with_fields(
        ItemKey::new(1, 1),
        item_fields("Laptop"),
    ));
    let usecase = GetDocumentUseCase { repo: store };

    let with_items = usecase.execute(1, true).await.unwrap();
    assert_eq!(with_items.items.len(), 1);

    let without_items = usecase.execute(1, false).await.unwrap();
    assert!(without_items.items.is_empty());
}

#[tokio::test]
async fn should_fail_get_for_unknown_document() {
    let usecase = GetDocumentUseCase {
        repo: InMemoryStore::new(),
    };

    let result = usecase.execute(42, true).await;
    assert!(
        matches!(result, Err(ApiError::DocumentNotFound)),
        "expected DocumentNotFound, got {result:?}"
    );
}

// ── CreateDocumentUseCase / UpdateDocumentUseCase ────────────────────────────

#[tokio::test]
async fn should_assign_increasing_ids() {
    let usecase = CreateDocumentUseCase {
        repo: InMemoryStore::new(),
    };

    let first = usecase.execute(document_fields("Kowalski")).await.unwrap();
    let second = usecase.execute(document_fields("Nowak")).await.unwrap();

    assert!(second.id > first.id);
    assert!(first.items.is_empty());
}

#[tokio::test]
async fn should_update_all_writable_columns() {
    let store = InMemoryStore::with_documents(1);
    let usecase = UpdateDocumentUseCase {
        repo: store.clone(),
    };

    let mut fields = document_fields("Wiśniewski");
    fields.city = "Łódź".to_owned();
    usecase
        .execute(
            1,
            UpdateDocumentInput {
                body_id: Some(1),
                fields: fields.clone(),
            },
        )
        .await
        .unwrap();

    assert_eq!(store.document(1), Some(fields));
}

#[tokio::test]
async fn should_not_mutate_on_id_mismatch() {
    let store = InMemoryStore::with_documents(2);
    let before = store.document(1);
    let usecase = UpdateDocumentUseCase {
        repo: store.clone(),
    };

    let result = usecase
        .execute(
            1,
            UpdateDocumentInput {
                body_id: Some(2),
                fields: document_fields("Changed"),
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::DocumentIdMismatch)),
        "expected DocumentIdMismatch, got {result:?}"
    );
    assert_eq!(store.document(1), before);
}

#[tokio::test]
async fn should_fail_update_for_unknown_document() {
    let usecase = UpdateDocumentUseCase {
        repo: InMemoryStore::new(),
    };

    let result = usecase
        .execute(
            7,
            UpdateDocumentInput {
                body_id: None,
                fields: document_fields("Ghost"),
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::DocumentNotFound)));
}

// ── DeleteDocumentUseCase / DeleteAllDocumentsUseCase ────────────────────────

#[tokio::test]
async fn should_cascade_delete_to_items() {
    let store = InMemoryStore::with_documents(2);
    store.insert_item(DocumentItem::with_fields(ItemKey::new(1, 1), item_fields("Pen")));
    store.insert_item(DocumentItem::with_fields(ItemKey::new(1, 2), item_fields("Ink")));
    store.insert_item(DocumentItem::with_fields(ItemKey::new(2, 1), item_fields("Paper")));
    let usecase = DeleteDocumentUseCase {
        repo: store.clone(),
    };

    usecase.execute(1).await.unwrap();

    assert!(store.document(1).is_none());
    assert_eq!(store.item_count(), 1);

    let again = usecase.execute(1).await;
    assert!(matches!(again, Err(ApiError::DocumentNotFound)));
}

#[tokio::test]
async fn should_require_confirmation_for_delete_all() {
    let store = InMemoryStore::with_documents(4);
    let usecase = DeleteAllDocumentsUseCase {
        repo: store.clone(),
    };

    for confirmation in [None, Some("confirm"), Some("yes")] {
        let result = usecase.execute(confirmation).await;
        assert!(
            matches!(result, Err(ApiError::ConfirmationRequired)),
            "expected ConfirmationRequired for {confirmation:?}, got {result:?}"
        );
    }
    assert!(store.document(1).is_some());
}

#[tokio::test]
async fn should_restart_ids_after_delete_all() {
    let store = InMemoryStore::with_documents(4);
    let delete_all = DeleteAllDocumentsUseCase {
        repo: store.clone(),
    };
    assert_eq!(delete_all.execute(Some("CONFIRM")).await.unwrap(), 4);

    let create = CreateDocumentUseCase { repo: store };
    let doc = create.execute(document_fields("Fresh")).await.unwrap();
    assert_eq!(doc.id, 1);
}
