// Geocoding domain - turns free-text organization locations into coordinates
//
// Responsibilities:
// - Querying the external provider (Nominatim) best-effort
// - Deciding when an organization needs geocoding and persisting the result
// - Rate-limited batch runs over every organization missing coordinates

pub mod batch;
pub mod client;
pub mod resolver;

pub use batch::*;
pub use client::*;
pub use resolver::*;
