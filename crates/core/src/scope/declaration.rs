use super::{Scope, ScopeFactory};
use genscope_api::{GenericDecl, TypeVariable};
use once_cell::race::OnceBox;
use std::fmt;
use tracing::{debug, trace, warn};

/// Scope of a single class, method or constructor.
///
/// The enclosing scope is derived from the declaration's navigation facts the
/// first time it is needed and then kept. The slot is a racy set-once cell:
/// threads that race on first access may each compute an enclosing scope, but
/// only one is stored and every caller observes that one.
pub struct DeclarationScope {
    decl: GenericDecl,
    factory: ScopeFactory,
    enclosing: OnceBox<Scope>,
}

impl DeclarationScope {
    pub(crate) fn new(decl: GenericDecl, factory: ScopeFactory) -> Self {
        Self {
            decl,
            factory,
            enclosing: OnceBox::new(),
        }
    }

    pub fn declaration(&self) -> GenericDecl {
        self.decl
    }

    /// Type parameters declared directly on the wrapped declaration.
    pub fn type_parameters(&self) -> &[TypeVariable] {
        self.factory.reader().type_parameters(self.decl)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeVariable> {
        // First match in declaration order wins.
        if let Some(own) = self.type_parameters().iter().find(|tv| tv.name.as_str() == name) {
            return Some(own.clone());
        }

        let enclosing = self.enclosing_scope();
        if enclosing.is_terminal() {
            debug!("Type variable '{}' not found, chain ended at {}", name, self.decl);
            return None;
        }
        enclosing.lookup(name)
    }

    pub fn enclosing_scope(&self) -> &Scope {
        self.enclosing
            .get_or_init(|| Box::new(self.compute_enclosing_scope()))
    }

    pub fn is_enclosing_computed(&self) -> bool {
        self.enclosing.get().is_some()
    }

    /// Derives the enclosing scope from navigation facts without touching the
    /// memoized slot.
    ///
    /// For classes the enclosing method is consulted before the enclosing
    /// constructor, and both before the enclosing class: a local class also
    /// reports the class around its method, and must bind through the method.
    pub fn compute_enclosing_scope(&self) -> Scope {
        let reader = self.factory.reader();
        let scope = match self.decl {
            GenericDecl::Class(class) => {
                if let Some(method) = reader.enclosing_method(class) {
                    self.factory.method_scope(method)
                } else if let Some(constructor) = reader.enclosing_constructor(class) {
                    self.factory.constructor_scope(constructor)
                } else if let Some(outer) = reader.enclosing_class(class) {
                    self.factory.class_scope(outer)
                } else {
                    Scope::TERMINAL
                }
            }
            GenericDecl::Method(method) => match reader.method_declaring_class(method) {
                Some(class) => self.factory.class_scope(class),
                None => {
                    warn!("{} has no declaring class, treating it as top level", self.decl);
                    Scope::TERMINAL
                }
            },
            GenericDecl::Constructor(constructor) => {
                match reader.constructor_declaring_class(constructor) {
                    Some(class) => self.factory.class_scope(class),
                    None => {
                        warn!("{} has no declaring class, treating it as top level", self.decl);
                        Scope::TERMINAL
                    }
                }
            }
        };
        trace!(
            "Computed enclosing scope of {}: {:?}",
            self.decl,
            scope.declaration()
        );
        scope
    }
}

impl fmt::Debug for DeclarationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclarationScope")
            .field("decl", &self.decl)
            .field("name", &self.factory.reader().display_name(self.decl))
            .field("enclosing_computed", &self.is_enclosing_computed())
            .finish()
    }
}
