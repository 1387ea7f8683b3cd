//! Lexical scopes for binding type-variable names to their declarations.
//!
//! A scope wraps one generic declaration (class, method or constructor) and
//! answers lookups from that declaration's own type parameters first, then
//! from its lexically enclosing declarations. Chains always end in
//! [`Scope::TERMINAL`].

mod declaration;
mod factory;

pub use declaration::DeclarationScope;
pub use factory::ScopeFactory;

use genscope_api::{GenericDecl, TypeVariable, TypeVariableResolver};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
pub enum Scope {
    /// No further enclosing declaration. Every lookup misses.
    #[default]
    Terminal,
    Declaration(Arc<DeclarationScope>),
}

impl Scope {
    pub const TERMINAL: Scope = Scope::Terminal;

    pub fn lookup(&self, name: &str) -> Option<TypeVariable> {
        match self {
            Scope::Terminal => None,
            Scope::Declaration(scope) => scope.lookup(name),
        }
    }

    /// The wrapped declaration, `None` for the terminal scope.
    pub fn declaration(&self) -> Option<GenericDecl> {
        match self {
            Scope::Terminal => None,
            Scope::Declaration(scope) => Some(scope.declaration()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Scope::Terminal)
    }

    /// The memoized enclosing scope, `None` for the terminal scope.
    pub fn enclosing(&self) -> Option<&Scope> {
        match self {
            Scope::Terminal => None,
            Scope::Declaration(scope) => Some(scope.enclosing_scope()),
        }
    }

    /// Walks from this scope outwards, terminal scope included.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// True when both handles point at the same scope object.
    pub fn same_instance(&self, other: &Scope) -> bool {
        match (self, other) {
            (Scope::Terminal, Scope::Terminal) => true,
            (Scope::Declaration(a), Scope::Declaration(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Scopes are equal when they wrap the same declaration.
impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.declaration() == other.declaration()
    }
}

impl Eq for Scope {}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Terminal => f.write_str("Terminal"),
            Scope::Declaration(scope) => f.debug_tuple("Declaration").field(scope).finish(),
        }
    }
}

impl TypeVariableResolver for Scope {
    fn resolve(&self, name: &str) -> Option<TypeVariable> {
        self.lookup(name)
    }
}

pub struct Chain<'a> {
    next: Option<&'a Scope>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.enclosing();
        Some(current)
    }
}
