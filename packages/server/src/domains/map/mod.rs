// Map domain - filtering, clustering and pin layout for the organization map
//
// Everything here is pure: organizations in, pins out. No I/O.

pub mod cluster;
pub mod filter;
pub mod view;

pub use cluster::*;
pub use filter::*;
pub use view::*;
