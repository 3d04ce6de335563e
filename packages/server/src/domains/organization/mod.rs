// Organization domain - the directory of organizations students can find
//
// Responsibilities:
// - Submission with duplicate-name protection and immediate geocoding
// - Directory listing, detail pages with reviews, map data
// - Single-record and batch geocoding entry points

pub mod actions;
pub mod models;

pub use models::*;
