pub mod models;
pub mod navigation;

// Re-export commonly used types
pub use models::*;
pub use navigation::{DeclarationReader, TypeVariableResolver};
