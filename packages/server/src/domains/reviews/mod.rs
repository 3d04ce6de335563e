// Reviews domain - student ratings of organizations

pub mod actions;
pub mod models;

pub use models::*;
