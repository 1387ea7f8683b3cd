pub mod decl;
pub mod signature;
pub mod type_ref;

pub use decl::*;
pub use signature::*;
pub use type_ref::*;
