//! Reactive binding driven by a real Fetcher.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use nixdb_client::binding::{FetchOutcome, ReactiveBinding};
use nixdb_client::config::StalePolicy;
use nixdb_client::fetch::{FetchError, Fetcher};

mod common;

/// Backend where `/slow` answers after 300ms and everything else at once.
async fn start_slow_fast_backend() -> std::net::SocketAddr {
    common::start_programmable_backend(|path| async move {
        if path == "/slow" {
            tokio::time::sleep(Duration::from_millis(300)).await;
            (200, r#"{"doc":"slow"}"#.into())
        } else {
            (200, r#"{"doc":"fast"}"#.into())
        }
    }).await
}

#[tokio::test]
async fn test_default_then_fetched_document() {
    let addr = common::start_programmable_backend(|_| async { (200, r#"{"a":1}"#.into()) }).await;
    let fetcher = Fetcher::new(&common::config_for(addr)).unwrap();

    let loading = json!({"loading": true});
    let (binding, handle) =
        ReactiveBinding::start(fetcher, "/x", loading.clone(), StalePolicy::DropStale);
    assert_eq!(binding.get(), loading);

    assert_eq!(handle.settled().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(binding.get(), json!({"a": 1}));
}

#[tokio::test]
async fn test_resolution_order_race_shows_older_document() {
    let addr = start_slow_fast_backend().await;
    let fetcher = Fetcher::new(&common::config_for(addr)).unwrap();
    let mut binding = ReactiveBinding::new(fetcher, Value::Null, StalePolicy::ResolutionOrder);

    let slow = binding.bind("/slow").unwrap();
    let fast = binding.bind("/fast").unwrap();

    fast.settled().await.unwrap();
    assert_eq!(binding.get(), json!({"doc": "fast"}));

    slow.settled().await.unwrap();
    assert_eq!(binding.get(), json!({"doc": "slow"}));
}

#[tokio::test]
async fn test_drop_stale_race_keeps_newest_document() {
    let addr = start_slow_fast_backend().await;
    let fetcher = Fetcher::new(&common::config_for(addr)).unwrap();
    let mut binding = ReactiveBinding::new(fetcher, Value::Null, StalePolicy::DropStale);

    let slow = binding.bind("/slow").unwrap();
    let fast = binding.bind("/fast").unwrap();

    assert_eq!(fast.settled().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(slow.settled().await.unwrap(), FetchOutcome::Stale);
    assert_eq!(binding.get(), json!({"doc": "fast"}));
}

#[tokio::test]
async fn test_bindings_share_one_fetcher() {
    let addr = common::start_programmable_backend(|path| async move {
        (200, format!(r#"{{"path":"{}"}}"#, path))
    }).await;
    let fetcher = Arc::new(Fetcher::new(&common::config_for(addr)).unwrap());

    let policy = StalePolicy::DropStale;
    let mut a = ReactiveBinding::with_shared_source(Arc::clone(&fetcher), Value::Null, policy);
    let mut b = ReactiveBinding::with_shared_source(Arc::clone(&fetcher), Value::Null, policy);

    let ha = a.bind("/a.json").unwrap();
    let hb = b.bind("/b.json").unwrap();
    ha.settled().await.unwrap();
    hb.settled().await.unwrap();

    assert_eq!(a.get(), json!({"path": "/a.json"}));
    assert_eq!(b.get(), json!({"path": "/b.json"}));
}

#[tokio::test]
async fn test_transport_error_keeps_state_and_does_not_retry() {
    let dead_hits = Arc::new(AtomicU32::new(0));
    let counter = dead_hits.clone();
    let addr = common::start_backend(move |path| {
        let reply = if path == "/dead.json" {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        } else {
            Some((200, r#"{"v":1}"#.to_string()))
        };
        async move { reply }
    }).await;

    let fetcher = Fetcher::new(&common::config_for(addr)).unwrap();
    let mut binding = ReactiveBinding::new(fetcher, json!("default"), StalePolicy::ResolutionOrder);

    let ok = binding.bind("/doc.json").unwrap();
    ok.settled().await.unwrap();
    assert_eq!(binding.get(), json!({"v": 1}));

    let failing = binding.bind("/dead.json").unwrap();
    assert_eq!(binding.get(), json!("default"));

    let err = failing.settled().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }), "got {err}");
    assert_eq!(binding.get(), json!("default"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(dead_hits.load(Ordering::SeqCst), 1);
}
