//! JSON model files describing declarations and their lexical nesting.

use super::table::{ClassSite, DeclarationTable};
use crate::config::ScopeConfig;
use crate::error::{GenscopeError, Result};
use genscope_api::GenericDecl;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ModelFile {
    #[serde(default)]
    pub config: ScopeConfig,
    #[serde(default)]
    pub classes: Vec<ClassModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClassModel {
    pub name: String,
    #[serde(default)]
    pub interface: bool,
    /// Generic class signature, e.g. `<T:Ljava/lang/Object;>Ljava/lang/Object;`
    #[serde(default)]
    pub signature: Option<String>,
    /// Shorthand for unbounded type parameters when no signature is given.
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodModel>,
    #[serde(default)]
    pub constructors: Vec<ConstructorModel>,
    /// Member classes.
    #[serde(default)]
    pub classes: Vec<ClassModel>,
    /// Anonymous or local classes in field and instance initializers.
    #[serde(default)]
    pub initializer_classes: Vec<ClassModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MethodModel {
    pub name: String,
    /// Generic method signature, e.g. `<T:Ljava/lang/Object;>(TT;)V`
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Local and anonymous classes declared in the body.
    #[serde(default)]
    pub classes: Vec<ClassModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConstructorModel {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassModel>,
}

impl ModelFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model = Self::from_json(&content)?;
        info!(
            "Loaded model {} ({} top-level classes)",
            path.display(),
            model.classes.len()
        );
        Ok(model)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn build_table(&self) -> Result<DeclarationTable> {
        let mut table = DeclarationTable::new();
        for class in &self.classes {
            add_class(&mut table, class, ClassSite::TopLevel)?;
        }
        Ok(table)
    }
}

fn add_class(table: &mut DeclarationTable, class: &ClassModel, site: ClassSite) -> Result<()> {
    let id = table.add_class(&class.name, site)?;
    let decl = GenericDecl::Class(id);
    declare(
        table,
        decl,
        class.signature.as_deref(),
        &class.type_parameters,
    )?;
    if class.interface {
        table.mark_interface(id)?;
    }

    for member in &class.classes {
        add_class(table, member, ClassSite::Member(id))?;
    }
    for local in &class.initializer_classes {
        add_class(table, local, ClassSite::Initializer(id))?;
    }
    for method in &class.methods {
        let mid = table.add_method(id, &method.name)?;
        declare(
            table,
            GenericDecl::Method(mid),
            method.signature.as_deref(),
            &method.type_parameters,
        )?;
        for local in &method.classes {
            add_class(table, local, ClassSite::Method(mid))?;
        }
    }
    for constructor in &class.constructors {
        let cid = table.add_constructor(id)?;
        declare(
            table,
            GenericDecl::Constructor(cid),
            constructor.signature.as_deref(),
            &constructor.type_parameters,
        )?;
        for local in &constructor.classes {
            add_class(table, local, ClassSite::Constructor(cid))?;
        }
    }
    Ok(())
}

fn declare(
    table: &mut DeclarationTable,
    decl: GenericDecl,
    signature: Option<&str>,
    names: &[String],
) -> Result<()> {
    match signature {
        Some(_) if !names.is_empty() => Err(GenscopeError::Model(format!(
            "{} declares both a signature and type_parameters",
            table.path_of(decl).unwrap_or("<unknown>")
        ))),
        Some(signature) => table.set_signature(decl, signature),
        None => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            table.declare_type_parameter_names(decl, &names)
        }
    }
}

/// JSON schema of the model file format.
pub fn model_schema() -> schemars::Schema {
    schemars::schema_for!(ModelFile)
}
