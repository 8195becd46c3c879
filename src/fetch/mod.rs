//! Document fetching.
//!
//! # Data Flow
//! ```text
//! suffix
//!     → target.rs (join with the configured base URL)
//!     → client.rs (GET until a 200 arrives or the retry policy gives up)
//!     → serde_json::Value
//! ```
//!
//! # Design Decisions
//! - Only a status of exactly 200 ends the loop; other 2xx codes are retried
//! - Transport failures are returned on the first occurrence, never retried
//! - A 200 with a malformed body is a decode error, also not retried

pub mod client;
pub mod error;
pub mod target;

pub use client::Fetcher;
pub use error::{FetchError, FetchResult};
pub use target::target_url;
