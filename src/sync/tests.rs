use chrono::NaiveDate;

use super::fake::FakeStore;
use super::*;
use crate::models::{Client, Product, ProductDraft, Record, User};
use crate::store::{RecordStore, StoreError};
use crate::table::{Alert, RowState, Table};

fn caneta_form() -> ProductForm {
    ProductForm {
        name: "Caneta".into(),
        quantity: Some(5),
        price: Some(2.0),
        discount: Some(0.0),
    }
}

fn products(store: &FakeStore) -> SyncController<&FakeStore, Product> {
    SyncController::new(store, Table::new())
}

fn assert_derived_consistent(controller: &SyncController<&FakeStore, Product>) {
    for row in controller.table().rows() {
        assert_eq!(row.derived(), &row.record().pricing());
    }
}

#[tokio::test]
async fn test_load_replaces_rows() {
    let store = FakeStore::new();
    store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));
    store.seed::<Product>(ProductDraft::new("Lápis", 50, 1.0));

    let mut controller = products(&store);
    let count = controller.load().await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(controller.table().len(), 2);
    assert_eq!(controller.table().alert(), Some(Alert::LowStock));
    assert_derived_consistent(&controller);
}

#[tokio::test]
async fn test_load_failure_keeps_table() {
    let store = FakeStore::new();
    store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));

    let mut controller = products(&store);
    controller.load().await.unwrap();

    store.fail_next(StoreError::Network("connection refused".into()));
    let err = controller.load().await.unwrap_err();

    assert!(matches!(err, SyncError::Store { action: "load", .. }));
    assert_eq!(controller.table().len(), 1);
}

#[tokio::test]
async fn test_create_adds_row_with_store_id() {
    let store = FakeStore::new();
    let mut controller = products(&store);

    let row = controller.create(caneta_form()).await.unwrap();
    assert_eq!(row.id(), "id-1");
    assert_eq!(row.derived().total_display(), "10.00");
    assert!(row.derived().low_stock);

    assert_eq!(store.calls(), vec!["POST produtos"]);
    assert!(store.get::<Product>("id-1").is_some());
}

#[tokio::test]
async fn test_create_with_empty_field_makes_no_call() {
    let store = FakeStore::new();
    let mut controller = products(&store);

    let form = ProductForm {
        name: String::new(),
        ..caneta_form()
    };
    let err = controller.create(form).await.unwrap_err();

    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::MissingFields(_))
    ));
    assert!(store.calls().is_empty());
    assert!(controller.table().is_empty());
}

#[tokio::test]
async fn test_create_with_negative_value_makes_no_call() {
    let store = FakeStore::new();
    let mut controller = products(&store);

    let form = ProductForm {
        price: Some(-2.0),
        ..caneta_form()
    };
    let err = controller.create(form).await.unwrap_err();

    assert_eq!(
        err,
        SyncError::Validation(ValidationError::Negative(vec!["price"]))
    );
    assert!(store.calls().is_empty());
    assert!(controller.table().is_empty());
}

#[tokio::test]
async fn test_create_failure_adds_no_row() {
    let store = FakeStore::new();
    let mut controller = products(&store);

    store.fail_next(StoreError::Server {
        status: 500,
        message: "database is locked".into(),
    });
    let err = controller.create(caneta_form()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to create product: Server returned status 500: database is locked"
    );
    assert!(controller.table().is_empty());
}

#[tokio::test]
async fn test_update_recomputes_and_persists_full_record() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    let settled = controller
        .update(&id, &ProductEdit::default().quantity(20))
        .await
        .unwrap();

    assert_eq!(settled, Settled::Applied);
    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.derived().total_display(), "40.00");
    assert!(!row.derived().low_stock);
    assert_eq!(row.state(), &RowState::Clean);
    assert_eq!(row.confirmed().quantity, 20);
    assert_eq!(controller.table().alert(), None);

    let stored = store.get::<Product>(&id).unwrap();
    assert_eq!(stored.name, "Caneta");
    assert_eq!(stored.quantity, 20);
    assert_eq!(stored.price, 2.0);
    assert_derived_consistent(&controller);
}

#[tokio::test]
async fn test_each_edit_issues_its_own_call() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    controller
        .update(&id, &ProductEdit::default().quantity(6))
        .await
        .unwrap();
    controller
        .update(&id, &ProductEdit::default().quantity(7))
        .await
        .unwrap();

    let puts = store
        .calls()
        .iter()
        .filter(|c| c.starts_with("PUT"))
        .count();
    assert_eq!(puts, 2);
    assert_eq!(controller.table().get(&id).unwrap().latest_seq(), 2);
}

#[tokio::test]
async fn test_negative_edit_is_clamped_and_reported() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    controller
        .update(&id, &ProductEdit::default().quantity(-5))
        .await
        .unwrap();

    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.record().quantity, 0);
    assert_eq!(row.derived().total_display(), "0.00");
    assert_eq!(store.get::<Product>(&id).unwrap().quantity, 0);

    let notices = controller.take_notices();
    assert_eq!(
        notices,
        vec![Notice::Clamped {
            id: id.clone(),
            fields: vec![Field::Quantity],
        }]
    );
    assert!(notices[0].to_string().contains("quantity"));
    assert!(controller.take_notices().is_empty());
}

#[tokio::test]
async fn test_update_failure_keeps_optimistic_values() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    store.fail_next(StoreError::Network("connection reset".into()));
    let err = controller
        .update(&id, &ProductEdit::default().price(3.0))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Store { action: "update", .. }));
    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.record().price, 3.0);
    assert_eq!(row.derived().total_display(), "15.00");
    assert_eq!(row.confirmed().price, 2.0);
    assert!(matches!(row.state(), RowState::Error(_)));

    // retrying succeeds and cleans the row
    controller.push_update(&id).await.unwrap();
    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.state(), &RowState::Clean);
    assert_eq!(store.get::<Product>(&id).unwrap().price, 3.0);
}

#[tokio::test]
async fn test_clamp_notice_survives_failed_update() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    store.fail_next(StoreError::Network("connection reset".into()));
    controller
        .update(&id, &ProductEdit::default().quantity(-5))
        .await
        .unwrap_err();

    assert_eq!(
        controller.take_notices(),
        vec![Notice::Clamped {
            id: id.clone(),
            fields: vec![Field::Quantity],
        }]
    );
    assert_eq!(controller.table().get(&id).unwrap().record().quantity, 0);
}

#[tokio::test]
async fn test_oversized_quantity_edit_leaves_row_untouched() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();
    let calls_before = store.calls().len();

    let err = controller
        .update(&id, &ProductEdit::default().quantity(5_000_000_000))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SyncError::Validation(ValidationError::OutOfRange(vec!["quantity"]))
    );
    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.record().quantity, 5);
    assert_eq!(row.derived().total_display(), "10.00");
    assert_eq!(row.state(), &RowState::Clean);
    assert_eq!(store.calls().len(), calls_before);
    assert!(controller.take_notices().is_empty());
}

#[tokio::test]
async fn test_update_not_found_is_distinct() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    // removed behind the controller's back
    store.delete::<Product>(&id).await.unwrap();

    let err = controller
        .update(&id, &ProductEdit::default().quantity(1))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), format!("product not found: {}", id));
}

#[tokio::test]
async fn test_update_unknown_row() {
    let store = FakeStore::new();
    let mut controller = products(&store);

    let err = controller
        .update("ghost", &ProductEdit::default().quantity(1))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::UnknownRow { .. }));
    assert!(store.calls().is_empty());
}

#[test]
fn test_row_state_transitions() {
    let store = FakeStore::new();
    let record = store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));
    let mut table = Table::new();
    table.add_row(record.clone());
    let mut controller = SyncController::new(&store, table);
    let id = record.id.clone();

    assert_eq!(controller.table().get(&id).unwrap().state(), &RowState::Clean);

    controller
        .edit_row(&id, &ProductEdit::default().quantity(12))
        .unwrap();
    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.state(), &RowState::Editing);
    // derived values follow the edit before any confirmation
    assert_eq!(row.derived().total_display(), "24.00");

    let pending = controller.issue_update(&id).unwrap();
    assert_eq!(
        controller.table().get(&id).unwrap().state(),
        &RowState::Pending
    );
    assert_eq!(pending.draft.quantity, 12);

    let confirmed = Product::from_draft(id.clone(), pending.draft.clone());
    let settled = controller.settle_update(&pending, Ok(confirmed)).unwrap();
    assert_eq!(settled, Settled::Applied);
    assert_eq!(controller.table().get(&id).unwrap().state(), &RowState::Clean);
}

#[test]
fn test_stale_response_is_discarded() {
    let store = FakeStore::new();
    let record = store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));
    let mut table = Table::new();
    table.add_row(record.clone());
    let mut controller = SyncController::new(&store, table);
    let id = record.id.clone();

    controller
        .edit_row(&id, &ProductEdit::default().quantity(15))
        .unwrap();
    let first = controller.issue_update(&id).unwrap();

    controller
        .edit_row(&id, &ProductEdit::default().quantity(30))
        .unwrap();
    let second = controller.issue_update(&id).unwrap();

    // responses arrive out of order
    let newer = Product::from_draft(id.clone(), second.draft.clone());
    assert_eq!(
        controller.settle_update(&second, Ok(newer)).unwrap(),
        Settled::Applied
    );

    let older = Product::from_draft(id.clone(), first.draft.clone());
    assert_eq!(
        controller.settle_update(&first, Ok(older)).unwrap(),
        Settled::Stale
    );

    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.record().quantity, 30);
    assert_eq!(row.derived().total_display(), "60.00");
    assert_eq!(row.state(), &RowState::Clean);
}

#[tokio::test]
async fn test_reload_does_not_reset_update_sequence() {
    let store = FakeStore::new();
    let record = store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));
    let mut controller = products(&store);
    controller.load().await.unwrap();
    let id = record.id.clone();

    controller
        .edit_row(&id, &ProductEdit::default().quantity(15))
        .unwrap();
    let first = controller.issue_update(&id).unwrap();

    controller.load().await.unwrap();

    controller
        .edit_row(&id, &ProductEdit::default().quantity(30))
        .unwrap();
    let second = controller.issue_update(&id).unwrap();
    assert!(second.seq > first.seq);

    // the response to the update issued before the reload lands first
    let older = Product::from_draft(id.clone(), first.draft.clone());
    assert_eq!(
        controller.settle_update(&first, Ok(older)).unwrap(),
        Settled::Stale
    );
    assert_eq!(controller.table().get(&id).unwrap().record().quantity, 30);

    let newer = Product::from_draft(id.clone(), second.draft.clone());
    assert_eq!(
        controller.settle_update(&second, Ok(newer)).unwrap(),
        Settled::Applied
    );

    let row = controller.table().get(&id).unwrap();
    assert_eq!(row.record().quantity, 30);
    assert_eq!(row.derived().total_display(), "60.00");
    assert_eq!(row.state(), &RowState::Clean);
}

#[test]
fn test_stale_failure_is_reported_but_leaves_row() {
    let store = FakeStore::new();
    let record = store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));
    let mut table = Table::new();
    table.add_row(record.clone());
    let mut controller = SyncController::new(&store, table);
    let id = record.id.clone();

    controller
        .edit_row(&id, &ProductEdit::default().quantity(15))
        .unwrap();
    let first = controller.issue_update(&id).unwrap();
    controller
        .edit_row(&id, &ProductEdit::default().quantity(30))
        .unwrap();
    let second = controller.issue_update(&id).unwrap();

    let newer = Product::from_draft(id.clone(), second.draft.clone());
    controller.settle_update(&second, Ok(newer)).unwrap();

    let err = controller
        .settle_update(&first, Err(StoreError::Network("timeout".into())))
        .unwrap_err();
    assert!(matches!(err, SyncError::Store { .. }));
    assert_eq!(controller.table().get(&id).unwrap().state(), &RowState::Clean);
}

#[test]
fn test_response_keeps_row_identifier() {
    let store = FakeStore::new();
    let record = store.seed::<Product>(ProductDraft::new("Caneta", 5, 2.0));
    let mut table = Table::new();
    table.add_row(record.clone());
    let mut controller = SyncController::new(&store, table);

    let pending = controller.issue_update(&record.id).unwrap();
    let odd = Product::from_draft("other".into(), pending.draft.clone());
    controller.settle_update(&pending, Ok(odd)).unwrap();

    assert!(controller.table().contains(&record.id));
    assert!(!controller.table().contains("other"));
}

#[tokio::test]
async fn test_delete_removes_row_after_ack() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    let deleted = controller.delete(&id).await.unwrap();

    assert_eq!(deleted, Deleted::Removed);
    assert!(controller.table().is_empty());
    assert!(store.get::<Product>(&id).is_none());
}

#[tokio::test]
async fn test_delete_already_gone_is_success() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();
    store.delete::<Product>(&id).await.unwrap();

    let deleted = controller.delete(&id).await.unwrap();

    assert_eq!(deleted, Deleted::AlreadyGone);
    assert!(controller.table().is_empty());
    assert_eq!(
        controller.take_notices(),
        vec![Notice::AlreadyDeleted {
            kind: "product",
            id: id.clone(),
        }]
    );

    // and again, with no row at all
    assert_eq!(controller.delete(&id).await.unwrap(), Deleted::AlreadyGone);
}

#[tokio::test]
async fn test_delete_failure_keeps_row() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    store.fail_next(StoreError::Server {
        status: 500,
        message: "disk full".into(),
    });
    let err = controller.delete(&id).await.unwrap_err();

    assert!(matches!(err, SyncError::Store { action: "delete", .. }));
    let row = controller.table().get(&id).unwrap();
    assert!(matches!(row.state(), RowState::Error(_)));
    assert!(store.get::<Product>(&id).is_some());
}

#[tokio::test]
async fn test_update_after_delete_in_flight_is_orphaned() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    let id = controller.create(caneta_form()).await.unwrap().id().to_string();

    let pending = controller.issue_update(&id).unwrap();
    controller.delete(&id).await.unwrap();

    let late = Product::from_draft(id.clone(), pending.draft.clone());
    assert_eq!(
        controller.settle_update(&pending, Ok(late)).unwrap(),
        Settled::Orphaned
    );
    assert!(controller.table().is_empty());
}

#[tokio::test]
async fn test_filter_keeps_derived_values() {
    let store = FakeStore::new();
    let mut controller = products(&store);
    controller.create(caneta_form()).await.unwrap();
    controller
        .create(ProductForm {
            name: "Caderno".into(),
            quantity: Some(40),
            price: Some(12.5),
            discount: Some(10.0),
        })
        .await
        .unwrap();

    controller.filter("cad");
    assert_eq!(controller.table().visible_rows().count(), 1);
    assert_eq!(controller.table().alert(), None);
    assert_derived_consistent(&controller);
}

#[tokio::test]
async fn test_client_and_user_tables() {
    let store = FakeStore::new();

    let mut clients: SyncController<&FakeStore, Client> = SyncController::new(&store, Table::new());
    assert_eq!(clients.table().alert(), Some(Alert::NoClients));

    let row = clients
        .create(ClientForm {
            name: "Ana".into(),
            cpf: "123.456.789-00".into(),
            email: "ana@example.com".into(),
            registered_on: NaiveDate::from_ymd_opt(2024, 2, 29),
        })
        .await
        .unwrap();
    let client_id = row.id().to_string();
    assert_eq!(clients.table().alert(), None);

    let mut users: SyncController<&FakeStore, User> = SyncController::new(&store, Table::new());
    users
        .create(UserForm {
            name: "Bruno".into(),
            cpf: "987".into(),
            email: "bruno@example.com".into(),
            phone: "11 99999-0000".into(),
            role: "Estoquista".into(),
        })
        .await
        .unwrap();

    // collections are independent
    assert_eq!(users.load().await.unwrap(), 1);
    assert_eq!(clients.load().await.unwrap(), 1);

    assert_eq!(clients.delete(&client_id).await.unwrap(), Deleted::Removed);
    assert_eq!(clients.table().alert(), Some(Alert::NoClients));
}
