use genscope_api::GenericDecl;
use genscope_core::{DeclarationTable, ModelFile, Result, ScopeFactory};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A model file loaded into a declaration table, with a scope factory over it.
pub struct LoadedModel {
    pub table: Arc<DeclarationTable>,
    pub factory: ScopeFactory,
}

impl LoadedModel {
    /// `share` is ANDed with the model's own config, so `--no-share` always wins.
    pub fn load(path: &Path, share: bool) -> Result<Self> {
        let model = ModelFile::load(path)?;
        let table = Arc::new(model.build_table()?);

        let mut config = model.config.clone();
        config.share_scopes &= share;
        info!(
            "Model has {} declarations, scope sharing {}",
            table.len(),
            if config.share_scopes { "on" } else { "off" }
        );

        let factory = ScopeFactory::with_config(table.clone(), &config);
        Ok(Self { table, factory })
    }

    pub fn resolve(&self, path: &str) -> Result<GenericDecl> {
        self.table.resolve_path(path)
    }

    pub fn describe(&self, decl: GenericDecl) -> String {
        self.table
            .path_of(decl)
            .map(str::to_string)
            .unwrap_or_else(|| decl.to_string())
    }
}
