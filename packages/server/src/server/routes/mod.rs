// HTTP routes
pub mod auth;
pub mod health;
pub mod orgs;
pub mod reviews;

pub use health::*;
