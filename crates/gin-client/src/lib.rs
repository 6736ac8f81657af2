//! gin-client: HTTP client for an OpenGIN graph store.
//!
//! Writes go to the ingestion API (create with `POST`, link with `PUT`),
//! reads go to the separate read API. Every write is classified into a
//! [`WriteOutcome`] so callers can keep going after a single entity fails.

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{ClientConfig, ClientError, GinClient};
pub use mutations::WriteOutcome;
pub use queries::{EntityHit, SearchQuery};
