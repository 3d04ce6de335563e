//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.

mod login;
mod register;

pub use login::{login, LoginInput, LoginResult};
pub use register::{register, RegisterInput, RegisterResult};
