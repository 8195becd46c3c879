//! Where a binding gets its documents from.

use std::future::Future;

use serde_json::Value;

use crate::fetch::{FetchResult, Fetcher};

/// Resolves a path suffix to a JSON document.
///
/// `Fetcher` is the production implementation; tests substitute sources
/// whose completion order they control.
pub trait DocumentSource: Send + Sync + 'static {
    fn fetch_document(&self, suffix: &str) -> impl Future<Output = FetchResult<Value>> + Send;
}

impl DocumentSource for Fetcher {
    fn fetch_document(&self, suffix: &str) -> impl Future<Output = FetchResult<Value>> + Send {
        self.fetch_path(suffix)
    }
}
