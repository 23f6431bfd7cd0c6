//! Content data layer
//!
//! - `query`: query builder and wire encoding
//! - `source`: the transport seam and its HTTP implementation
//! - `client`: typed fetches with fallback and explicit connectivity
//! - `fallback`: fixed substitute content

pub mod client;
pub mod fallback;
pub mod query;
pub mod source;

#[cfg(test)]
pub mod testing;

pub use client::{
    ContentClient, Connectivity, ConnectivityCell, FallbackReason, Fetched, LookupError, Origin,
    PaginationMeta,
};
pub use fallback::FallbackProvider;
pub use query::{ContentQuery, FilterOperator, FilterPredicate, Pagination, PublicationState, SortKey};
pub use source::{ContentSource, FetchError, StrapiSource};
