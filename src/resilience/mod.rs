//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch attempt returns a non-200 status:
//!     → retries.rs (is the attempt budget spent?)
//!     → backoff.rs (how long to wait before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Only status failures are retried; transport errors end the fetch
//! - `RetryPolicy::unbounded()` keeps the retry-forever, zero-delay loop
//!   available for callers that rely on it

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
