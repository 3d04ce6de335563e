//! Auth domain - accounts, passwords and bearer tokens
//!
//! Responsibilities:
//! - Registration of students and organization accounts
//! - Email + password login (argon2 hashes)
//! - JWT issue and verification

pub mod actions;
pub mod jwt;
pub mod models;
pub mod password;

pub use jwt::{Claims, JwtService};
