//! Reactive document binding.
//!
//! # Data Flow
//! ```text
//! bind(suffix)
//!     → state.rs (reset to the default, notify subscribers)
//!     → spawned task: source.rs → Fetcher::fetch_path
//!     → reactive.rs (stale check) → state.rs (store document, notify)
//! ```
//!
//! # Design Decisions
//! - State is a `tokio::sync::watch` cell: readers pull with `get`, or
//!   await changes on a receiver
//! - In-flight fetches are never cancelled; superseded results are either
//!   dropped or applied depending on `StalePolicy`
//! - Failures never reach the state; they come back through `FetchHandle`

pub mod reactive;
pub mod source;
pub mod state;

pub use reactive::{FetchHandle, FetchOutcome, ReactiveBinding};
pub use source::DocumentSource;
pub use state::ObservableState;
