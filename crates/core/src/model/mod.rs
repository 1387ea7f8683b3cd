pub mod file;
pub mod table;

pub use file::{ClassModel, ConstructorModel, MethodModel, ModelFile, model_schema};
pub use table::{ClassSite, DeclarationTable};
