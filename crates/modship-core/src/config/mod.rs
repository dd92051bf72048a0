//! Configuration system for modship

mod credentials;
pub mod defaults;
mod loader;
mod types;
pub mod validation;

pub use credentials::*;
pub use defaults::*;
pub use loader::*;
pub use types::*;
pub use validation::*;
