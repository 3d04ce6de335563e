// CrediMap - API Core
//
// Backend for the CrediMap organization directory: organization submission,
// geocoding of free-text locations, map clustering, accounts and reviews.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
