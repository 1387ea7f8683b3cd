use super::{DeclarationScope, Scope};
use crate::config::ScopeConfig;
use dashmap::DashMap;
use genscope_api::{ClassId, ConstructorId, DeclarationReader, GenericDecl, MethodId};
use std::sync::{Arc, Weak};
use tracing::trace;

type SharedScopes = DashMap<GenericDecl, Weak<DeclarationScope>>;

/// Builds scopes for declarations read from one [`DeclarationReader`].
///
/// With sharing enabled the factory hands out one scope object per live
/// declaration. Entries are weak, so a scope is dropped as soon as no chain or
/// caller holds it.
#[derive(Clone)]
pub struct ScopeFactory {
    reader: Arc<dyn DeclarationReader>,
    shared: Option<Arc<SharedScopes>>,
}

impl ScopeFactory {
    pub fn new(reader: Arc<dyn DeclarationReader>) -> Self {
        Self::with_config(reader, &ScopeConfig::default())
    }

    pub fn with_config(reader: Arc<dyn DeclarationReader>, config: &ScopeConfig) -> Self {
        Self {
            reader,
            shared: config.share_scopes.then(|| Arc::new(DashMap::new())),
        }
    }

    pub fn reader(&self) -> &dyn DeclarationReader {
        self.reader.as_ref()
    }

    pub fn is_shared(&self) -> bool {
        self.shared.is_some()
    }

    pub fn class_scope(&self, class: ClassId) -> Scope {
        self.scope_for(GenericDecl::Class(class))
    }

    pub fn method_scope(&self, method: MethodId) -> Scope {
        self.scope_for(GenericDecl::Method(method))
    }

    pub fn constructor_scope(&self, constructor: ConstructorId) -> Scope {
        self.scope_for(GenericDecl::Constructor(constructor))
    }

    pub fn scope_for(&self, decl: GenericDecl) -> Scope {
        let Some(shared) = &self.shared else {
            return Scope::Declaration(Arc::new(DeclarationScope::new(decl, self.clone())));
        };

        let mut slot = shared.entry(decl).or_default();
        if let Some(existing) = slot.upgrade() {
            trace!("Reusing scope of {}", decl);
            return Scope::Declaration(existing);
        }

        let scope = Arc::new(DeclarationScope::new(decl, self.clone()));
        *slot = Arc::downgrade(&scope);
        Scope::Declaration(scope)
    }

    /// Number of shared scopes that are still alive.
    pub fn live_scopes(&self) -> usize {
        self.shared.as_ref().map_or(0, |shared| {
            shared
                .iter()
                .filter(|entry| entry.value().strong_count() > 0)
                .count()
        })
    }

    /// Drops cache entries whose scope has been released. Returns how many
    /// entries were removed.
    pub fn purge(&self) -> usize {
        let Some(shared) = &self.shared else {
            return 0;
        };
        let before = shared.len();
        shared.retain(|_, scope| scope.strong_count() > 0);
        before.saturating_sub(shared.len())
    }
}
