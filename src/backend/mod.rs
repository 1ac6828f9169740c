//! Backend communication: HTTP client, retry policy and wire types

pub mod api;
pub mod error;
pub mod retry;
pub mod types;

pub use api::BackendClient;
pub use types::{SearchRequest, SearchResponse, Source};
