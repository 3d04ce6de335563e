pub mod organization;
pub mod taxonomy;

pub use organization::*;
pub use taxonomy::*;
