//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Fetcher and binding produce:
//!     → logging.rs (structured tracing events, one span per fetch)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout/stderr through tracing-subscriber
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Library code only emits; the binary owns subscriber setup
//! - Each fetch carries a UUID so interleaved retries can be told apart

pub mod logging;
pub mod metrics;
