//! Short-term housing near a location: geocode the text, then search around it.

pub mod api_types;
pub mod client;
pub mod types;

pub use client::PlacesClient;
pub use types::{HousingResults, Place};
