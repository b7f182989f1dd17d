//! The link service: creating, resolving, counting and editing short links.
//!
//! [`LinkService`] is the concrete implementation of the [`Shortener`]
//! trait. It validates input, draws ids from a [`snip_generator::Generator`]
//! and persists records through a [`snip_storage::LinkStore`].

pub mod error;
pub mod fetch;
pub mod service;
pub mod shortener;

pub use error::{IdConflict, LinkError, Result};
pub use fetch::{FetchError, FetchedContent, Fetcher, HttpFetcher};
pub use service::{LinkService, MAX_CAS_ATTEMPTS, MAX_GENERATE_ATTEMPTS};
pub use shortener::Shortener;
