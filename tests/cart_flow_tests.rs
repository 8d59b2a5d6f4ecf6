mod common;

use common::*;
use food_cart::app::ports::{KeyValueStorePort, NoticeKind};
use food_cart::app::{AddToCartOutcome, AddToCartParams, RejectReason};
use food_cart::config::StorageBackend;
use food_cart::infra::build_cart_provider;
use food_cart::infra::kv_memory_adapter::InMemoryKeyValueStore;
use food_cart::{ActionOutcome, CartProvider, LoadStatus};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn add_merge_reject_then_replace_restaurant() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let use_cases = use_cases_over(store);

    // A: first add binds R1
    let cart = use_cases
        .add_to_cart(&AddToCartParams::new(&som_tam(), &baan_thai()))
        .await
        .unwrap()
        .into_cart();
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.subtotal(), 45.0);
    assert_eq!(cart.total(), 60.0);

    // B: same menu item merges into the existing line
    let cart = use_cases
        .add_to_cart(&AddToCartParams::new(&som_tam(), &baan_thai()))
        .await
        .unwrap()
        .into_cart();
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(cart.subtotal(), 90.0);
    assert_eq!(cart.total(), 105.0);

    // C: another restaurant is rejected and nothing changes
    let outcome = use_cases
        .add_to_cart(&AddToCartParams::new(&salmon_roll(), &sushi_ya()))
        .await
        .unwrap();
    assert_eq!(outcome.reason(), Some(RejectReason::DifferentRestaurant));
    assert_eq!(outcome.cart(), &cart);
    assert_eq!(use_cases.get_cart().await.unwrap(), cart);

    // D: clear and retry
    use_cases.clear_cart().await.unwrap();
    let outcome = use_cases
        .add_to_cart(&AddToCartParams::new(&salmon_roll(), &sushi_ya()))
        .await
        .unwrap();
    assert!(matches!(outcome, AddToCartOutcome::Added(_)));
    let cart = outcome.into_cart();
    assert_eq!(cart.restaurant_id(), Some("R2"));
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.items()[0].quantity, 1);

    // E: quantity to zero removes the only line and unbinds
    let line_id = cart.items()[0].id.clone();
    let cart = use_cases.update_quantity(&line_id, 0).await.unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.restaurant_id(), None);
    assert_eq!(cart.delivery_fee(), 0.0);
}

#[tokio::test]
async fn provider_runs_the_replace_restaurant_flow() {
    let dir = TempDir::new().unwrap();
    let confirmation = ScriptedConfirmation::answering(&[true]);
    let notices = Arc::new(RecordingNotices::default());
    let provider = build_cart_provider(
        &storage_config(StorageBackend::File, dir.path()),
        confirmation.clone(),
        notices.clone(),
    )
    .unwrap();
    provider.activate().await;

    provider.add_to_cart(&som_tam(), &baan_thai(), 2).await;
    let outcome = provider.add_to_cart(&salmon_roll(), &sushi_ya(), 1).await;

    assert_eq!(outcome, ActionOutcome::Applied);
    assert_eq!(provider.restaurant_info(), Some(sushi_ya()));
    assert_eq!(provider.item_count(), 1);
    assert_eq!(provider.total(), 145.0);
    assert_eq!(confirmation.asked.lock().unwrap().len(), 1);
    assert!(notices.shown.lock().unwrap().is_empty());
}

async fn round_trip_through_fresh_provider(backend: StorageBackend) {
    let dir = TempDir::new().unwrap();
    let config = storage_config(backend, dir.path());

    let first = build_cart_provider(
        &config,
        ScriptedConfirmation::answering(&[]),
        Arc::new(RecordingNotices::default()),
    )
    .unwrap();
    first.activate().await;
    first.add_to_cart(&som_tam(), &baan_thai(), 3).await;
    first.add_to_cart(&pad_thai(), &baan_thai(), 1).await;
    let saved = first.cart();
    assert_eq!(saved.line_count(), 2);
    drop(first);

    let second = build_cart_provider(
        &config,
        ScriptedConfirmation::answering(&[]),
        Arc::new(RecordingNotices::default()),
    )
    .unwrap();
    assert!(second.is_loading());
    second.activate().await;
    assert_eq!(second.status(), LoadStatus::Ready);
    assert_eq!(second.cart(), saved);
    assert_eq!(second.get_item_quantity("m1"), 3);
    assert_eq!(second.get_item_quantity("m3"), 1);
    assert_eq!(second.item_count(), 4);
    assert_eq!(second.subtotal(), 3.0 * 45.0 + 60.0);
    assert_eq!(second.total(), 3.0 * 45.0 + 60.0 + 15.0);
    let menu_ids: Vec<String> = second.cart_items().into_iter().map(|i| i.menu_id).collect();
    assert_eq!(menu_ids, vec!["m1", "m3"]);
    assert_eq!(second.restaurant_info(), Some(baan_thai()));
}

#[tokio::test]
async fn file_backend_persists_across_providers() {
    round_trip_through_fresh_provider(StorageBackend::File).await;
}

#[tokio::test]
async fn sqlite_backend_persists_across_providers() {
    round_trip_through_fresh_provider(StorageBackend::Sqlite).await;
}

#[tokio::test]
async fn corrupted_storage_starts_empty() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store.set(KEY, "definitely not json").await.unwrap();
    let use_cases = use_cases_over(store.clone());

    let cart = use_cases.get_cart().await.unwrap();
    assert!(cart.is_empty());

    // The next mutation overwrites the corrupt snapshot
    use_cases
        .add_to_cart(&AddToCartParams::new(&som_tam(), &baan_thai()))
        .await
        .unwrap();
    let raw = store.get(KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"menuId\":\"m1\""));
}

#[tokio::test]
async fn clearing_twice_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let provider = build_cart_provider(
        &storage_config(StorageBackend::Sqlite, dir.path()),
        ScriptedConfirmation::answering(&[true, true]),
        Arc::new(RecordingNotices::default()),
    )
    .unwrap();
    provider.activate().await;
    provider.add_to_cart(&som_tam(), &baan_thai(), 1).await;

    assert_eq!(provider.clear_cart().await, ActionOutcome::Applied);
    assert_eq!(provider.clear_cart().await, ActionOutcome::Applied);
    assert!(provider.cart().is_empty());
    assert_eq!(provider.restaurant_info(), None);
}

#[tokio::test]
async fn write_failure_surfaces_notice_and_keeps_state() {
    let store = Arc::new(FlakyStore::default());
    let notices = Arc::new(RecordingNotices::default());
    let provider = CartProvider::new(
        Arc::new(use_cases_over(store.clone())),
        ScriptedConfirmation::answering(&[]),
        notices.clone(),
    );
    provider.activate().await;
    provider.add_to_cart(&som_tam(), &baan_thai(), 1).await;
    let line_id = provider.cart_items()[0].id.clone();

    store.break_writes();
    assert_eq!(provider.update_quantity(&line_id, 5).await, ActionOutcome::Failed);
    assert_eq!(provider.remove_from_cart(&line_id).await, ActionOutcome::Failed);

    assert_eq!(provider.get_item_quantity("m1"), 1);
    let shown = notices.shown.lock().unwrap();
    assert_eq!(shown.len(), 2);
    assert!(shown.iter().all(|n| n.kind == NoticeKind::Error));
}

#[tokio::test]
async fn concurrent_adds_are_all_kept() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let provider = Arc::new(CartProvider::new(
        Arc::new(use_cases_over(store)),
        ScriptedConfirmation::answering(&[]),
        Arc::new(RecordingNotices::default()),
    ));
    provider.activate().await;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.add_to_cart(&som_tam(), &baan_thai(), 1).await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), ActionOutcome::Applied);
    }

    assert_eq!(provider.get_item_quantity("m1"), 20);
    assert_eq!(provider.cart().line_count(), 1);
}
