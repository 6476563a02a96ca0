//! Upstream graph access: queries, normalization, and client-side filtering.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::{GraphClient, GraphHttpResponse, GraphTransport};
pub use types::{Branch, Country, GraphError, RankedBranch};
