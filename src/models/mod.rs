// Core models
pub mod bracket;
pub mod user;

// Re-export commonly used types
pub use bracket::*;
pub use user::*;
