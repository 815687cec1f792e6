//! Cache-aside integration tests against the in-process store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use farmlink_backend::cache::{get_with_cache, CacheStore, MemoryCacheStore};
use farmlink_backend::error::{AppError, AppResult};

const TTL: Duration = Duration::from_secs(60);

async fn cached_count(store: &MemoryCacheStore, calls: &AtomicUsize) -> AppResult<u32> {
    get_with_cache(store, "answer", TTL, || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(42u32)
    })
    .await
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let store = MemoryCacheStore::new();
    let calls = AtomicUsize::new(0);

    assert_eq!(cached_count(&store, &calls).await.unwrap(), 42);
    assert_eq!(cached_count(&store, &calls).await.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_entry_is_recomputed_after_ttl() {
    let store = MemoryCacheStore::new();
    let calls = AtomicUsize::new(0);

    cached_count(&store, &calls).await.unwrap();
    tokio::time::advance(TTL + Duration::from_secs(1)).await;
    cached_count(&store, &calls).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_producer_error_is_not_cached() {
    let store = MemoryCacheStore::new();

    let result: AppResult<String> = get_with_cache(&store, "flaky", TTL, || async {
        Err(AppError::upstream("weather data", "connection reset"))
    })
    .await;
    assert!(matches!(result, Err(AppError::Upstream { .. })));
    assert!(store.get("flaky").await.unwrap().is_none());

    let value = get_with_cache(&store, "flaky", TTL, || async { Ok("sunny".to_string()) })
        .await
        .unwrap();
    assert_eq!(value, "sunny");
}

#[tokio::test]
async fn test_unreadable_entry_is_treated_as_miss() {
    let store = MemoryCacheStore::new();
    store.set("broken", b"not json".to_vec(), TTL).await.unwrap();

    let value: u32 = get_with_cache(&store, "broken", TTL, || async { Ok(7u32) })
        .await
        .unwrap();
    assert_eq!(value, 7);
    assert_eq!(store.get("broken").await.unwrap(), Some(b"7".to_vec()));
}

#[tokio::test]
async fn test_counter_increments_from_missing() {
    let store = MemoryCacheStore::new();

    assert_eq!(store.increment("count", TTL).await.unwrap(), 1);
    assert_eq!(store.increment("count", TTL).await.unwrap(), 2);

    store.delete("count").await.unwrap();
    assert_eq!(store.increment("count", TTL).await.unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_counter_never_outlives_its_ttl() {
    let store = MemoryCacheStore::new();

    for _ in 0..5 {
        store.increment("count", TTL).await.unwrap();
    }

    tokio::time::advance(TTL).await;
    assert!(store.get("count").await.unwrap().is_none());
}
