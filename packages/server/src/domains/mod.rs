// Business domains
pub mod auth;
pub mod geocoding;
pub mod map;
pub mod organization;
pub mod reviews;
