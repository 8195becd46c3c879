//! Client for JSON documents published on the nixdb data branch.
//!
//! A [`Fetcher`] retrieves a document, retrying while the server answers
//! with anything but 200. A [`ReactiveBinding`] exposes the document as
//! observable state keyed by a path suffix.

pub mod binding;
pub mod config;
pub mod fetch;
pub mod observability;
pub mod resilience;

pub use binding::{FetchOutcome, ReactiveBinding};
pub use config::ClientConfig;
pub use fetch::{FetchError, Fetcher};
