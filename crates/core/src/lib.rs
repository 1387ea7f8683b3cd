pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod scope;
pub mod signature;

pub use config::ScopeConfig;
pub use error::{GenscopeError, Result, SignatureError};
pub use model::{ClassSite, DeclarationTable, ModelFile};
pub use repository::GenericRepository;
pub use scope::{DeclarationScope, Scope, ScopeFactory};
