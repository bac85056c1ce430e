//! console-core: shared infrastructure for the LinkConsole frontend.
pub mod error;
pub mod middleware;
pub mod observability;

pub use error::AppError;
