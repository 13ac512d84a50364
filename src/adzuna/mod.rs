//! Job search: upstream client, filters, cache keys and the search session.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod filters;
pub mod session;
pub mod types;
