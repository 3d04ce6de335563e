// Kernel - infrastructure traits and the dependency container

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::*;
pub use traits::*;
