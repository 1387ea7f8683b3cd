//! Generic type information per declaration, parsed lazily from the
//! declaration's signature and bound in the declaration's own scope.

use crate::error::SignatureError;
use crate::scope::{Scope, ScopeFactory};
use crate::signature::{
    BoundClassSignature, BoundMethodSignature, SignatureBinder, parse_class_signature,
    parse_method_signature,
};
use dashmap::DashMap;
use genscope_api::{
    ClassId, ClassSignature, GenericDecl, MethodId, MethodSignature, TypeRef, TypeVariable,
};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
enum ParsedSignature {
    Class(ClassSignature),
    Method(MethodSignature),
}

/// Scopes used for binding are kept for the repository's lifetime, so their
/// memoized chains are built once per declaration and the factory's shared
/// cache holds no dead entries for them.
pub struct GenericRepository {
    factory: ScopeFactory,
    parsed: DashMap<GenericDecl, Arc<ParsedSignature>>,
    scopes: DashMap<GenericDecl, Scope>,
}

impl GenericRepository {
    pub fn new(factory: ScopeFactory) -> Self {
        Self {
            factory,
            parsed: DashMap::new(),
            scopes: DashMap::new(),
        }
    }

    pub fn factory(&self) -> &ScopeFactory {
        &self.factory
    }

    pub fn type_parameters(&self, decl: GenericDecl) -> &[TypeVariable] {
        self.factory.reader().type_parameters(decl)
    }

    /// Bounds of `variable`, bound in the scope of its owner, so a bound may
    /// mention the variable itself (`T extends Comparable<T>`).
    pub fn bounds(&self, variable: &TypeVariable) -> Result<Vec<TypeRef>, SignatureError> {
        self.binder(variable.owner).bind_all(&variable.bounds)
    }

    /// `None` for interfaces and for classes without a generic signature.
    pub fn generic_superclass(&self, class: ClassId) -> Result<Option<TypeRef>, SignatureError> {
        if self.factory.reader().is_interface(class) {
            return Ok(None);
        }
        Ok(self.bound_class(class)?.map(|bound| bound.superclass))
    }

    pub fn generic_interfaces(&self, class: ClassId) -> Result<Vec<TypeRef>, SignatureError> {
        Ok(self
            .bound_class(class)?
            .map(|bound| bound.interfaces)
            .unwrap_or_default())
    }

    pub fn generic_parameter_types(&self, decl: GenericDecl) -> Result<Vec<TypeRef>, SignatureError> {
        Ok(self
            .bound_method(decl)?
            .map(|bound| bound.parameters)
            .unwrap_or_default())
    }

    /// `None` when the method carries no generic signature.
    pub fn generic_return_type(&self, method: MethodId) -> Result<Option<TypeRef>, SignatureError> {
        Ok(self
            .bound_method(GenericDecl::Method(method))?
            .map(|bound| bound.return_type))
    }

    pub fn generic_exception_types(&self, decl: GenericDecl) -> Result<Vec<TypeRef>, SignatureError> {
        Ok(self
            .bound_method(decl)?
            .map(|bound| bound.exceptions)
            .unwrap_or_default())
    }

    pub fn bound_class(&self, class: ClassId) -> Result<Option<BoundClassSignature>, SignatureError> {
        let decl = GenericDecl::Class(class);
        match self.parsed(decl)?.as_deref() {
            Some(ParsedSignature::Class(sig)) => self.binder(decl).bind_class(sig).map(Some),
            _ => Ok(None),
        }
    }

    pub fn bound_method(
        &self,
        decl: GenericDecl,
    ) -> Result<Option<BoundMethodSignature>, SignatureError> {
        if let GenericDecl::Class(_) = decl {
            return Err(SignatureError::WrongDeclarationKind {
                decl,
                expected: "method or constructor",
                actual: decl.kind_name(),
            });
        }
        match self.parsed(decl)?.as_deref() {
            Some(ParsedSignature::Method(sig)) => self.binder(decl).bind_method(sig).map(Some),
            _ => Ok(None),
        }
    }

    /// Binds every signature and bound of `decls`, collecting failures.
    pub fn verify(
        &self,
        decls: impl IntoIterator<Item = GenericDecl>,
    ) -> Vec<(GenericDecl, SignatureError)> {
        let mut failures = Vec::new();
        for decl in decls {
            for variable in self.type_parameters(decl) {
                if let Err(e) = self.bounds(variable) {
                    failures.push((decl, e));
                }
            }
            let bound = match decl {
                GenericDecl::Class(class) => self.bound_class(class).map(|_| ()),
                _ => self.bound_method(decl).map(|_| ()),
            };
            if let Err(e) = bound {
                failures.push((decl, e));
            }
        }
        failures
    }

    /// The scope signatures of `decl` are bound in.
    pub fn scope(&self, decl: GenericDecl) -> Scope {
        if let Some(hit) = self.scopes.get(&decl) {
            return hit.clone();
        }
        self.scopes
            .entry(decl)
            .or_insert_with(|| self.factory.scope_for(decl))
            .clone()
    }

    fn binder(&self, decl: GenericDecl) -> SignatureBinder<Scope> {
        SignatureBinder::new(self.scope(decl))
    }

    /// Parses the declaration's signature at most once per successful parse.
    /// Concurrent first requests may both parse; the first insert is kept.
    fn parsed(&self, decl: GenericDecl) -> Result<Option<Arc<ParsedSignature>>, SignatureError> {
        if let Some(hit) = self.parsed.get(&decl) {
            return Ok(Some(hit.clone()));
        }
        let Some(signature) = self.factory.reader().generic_signature(decl) else {
            return Ok(None);
        };

        trace!("Parsing generic signature of {}: {}", decl, signature);
        let parsed = match decl {
            GenericDecl::Class(_) => ParsedSignature::Class(parse_class_signature(signature)?),
            GenericDecl::Method(_) | GenericDecl::Constructor(_) => {
                ParsedSignature::Method(parse_method_signature(signature)?)
            }
        };
        let entry = self.parsed.entry(decl).or_insert_with(|| Arc::new(parsed));
        Ok(Some(entry.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassSite, DeclarationTable};

    fn repository(table: DeclarationTable) -> GenericRepository {
        GenericRepository::new(ScopeFactory::new(Arc::new(table)))
    }

    #[test]
    fn test_interface_has_no_generic_superclass() {
        let mut table = DeclarationTable::new();
        let i = table.add_class("Source", ClassSite::TopLevel).unwrap();
        table
            .set_signature(
                GenericDecl::Class(i),
                "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/function/Supplier<TT;>;",
            )
            .unwrap();
        table.mark_interface(i).unwrap();

        let repo = repository(table);
        assert_eq!(repo.generic_superclass(i).unwrap(), None);
        let interfaces = repo.generic_interfaces(i).unwrap();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].to_string(), "java.util.function.Supplier<T>");
    }

    #[test]
    fn test_self_referential_bound_resolves() {
        let mut table = DeclarationTable::new();
        let c = table.add_class("Sorted", ClassSite::TopLevel).unwrap();
        table
            .set_signature(
                GenericDecl::Class(c),
                "<T::Ljava/lang/Comparable<-TT;>;>Ljava/lang/Object;",
            )
            .unwrap();

        let repo = repository(table);
        let t = repo.type_parameters(GenericDecl::Class(c))[0].clone();
        let bounds = repo.bounds(&t).unwrap();
        assert_eq!(bounds.len(), 1);
        let TypeRef::Generic { args, .. } = &bounds[0] else {
            panic!("expected generic bound");
        };
        let TypeRef::Wildcard {
            bound: Some(inner),
            is_upper_bound: false,
        } = &args[0]
        else {
            panic!("expected lower-bounded wildcard");
        };
        assert_eq!(inner.as_variable(), Some(&t));
    }

    #[test]
    fn test_method_types_bind_through_class() {
        let mut table = DeclarationTable::new();
        let c = table.add_class("Box", ClassSite::TopLevel).unwrap();
        table
            .declare_type_parameter_names(GenericDecl::Class(c), &["E"])
            .unwrap();
        let m = table.add_method(c, "map").unwrap();
        table
            .set_signature(
                GenericDecl::Method(m),
                "<R:Ljava/lang/Object;>(Ljava/util/function/Function<-TE;+TR;>;)LBox<TR;>;",
            )
            .unwrap();

        let repo = repository(table);
        let params = repo.generic_parameter_types(GenericDecl::Method(m)).unwrap();
        assert_eq!(
            params[0].to_string(),
            "java.util.function.Function<? super E, ? extends R>"
        );
        let ret = repo.generic_return_type(m).unwrap().unwrap();
        assert_eq!(ret.to_string(), "Box<R>");
    }

    #[test]
    fn test_unresolved_variable_surfaces_as_error() {
        let mut table = DeclarationTable::new();
        let c = table.add_class("Broken", ClassSite::TopLevel).unwrap();
        let m = table.add_method(c, "get").unwrap();
        table
            .set_signature(GenericDecl::Method(m), "()TQ;")
            .unwrap();

        let repo = repository(table);
        assert_eq!(
            repo.generic_return_type(m),
            Err(SignatureError::UnresolvedTypeVariable("Q".to_string()))
        );
        let failures = repo.verify([GenericDecl::Class(c), GenericDecl::Method(m)]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, GenericDecl::Method(m));
    }

    #[test]
    fn test_class_is_not_a_method() {
        let mut table = DeclarationTable::new();
        let c = table.add_class("C", ClassSite::TopLevel).unwrap();
        let repo = repository(table);
        assert!(matches!(
            repo.generic_parameter_types(GenericDecl::Class(c)),
            Err(SignatureError::WrongDeclarationKind { .. })
        ));
    }

    #[test]
    fn test_binding_scopes_are_kept_between_queries() {
        let mut table = DeclarationTable::new();
        let c = table.add_class("Box", ClassSite::TopLevel).unwrap();
        table
            .declare_type_parameter_names(GenericDecl::Class(c), &["E"])
            .unwrap();
        let m = table.add_method(c, "get").unwrap();
        table.set_signature(GenericDecl::Method(m), "()TE;").unwrap();
        let decls: Vec<_> = table.declarations().collect();

        let shared = repository(table);
        for _ in 0..3 {
            assert!(shared.verify(decls.iter().copied()).is_empty());
        }
        assert_eq!(shared.factory().live_scopes(), 2);
        assert_eq!(shared.factory().purge(), 0);

        let mut table = DeclarationTable::new();
        let c = table.add_class("Box", ClassSite::TopLevel).unwrap();
        let unshared = GenericRepository::new(ScopeFactory::with_config(
            Arc::new(table),
            &crate::config::ScopeConfig {
                share_scopes: false,
            },
        ));
        let decl = GenericDecl::Class(c);
        assert!(unshared.scope(decl).same_instance(&unshared.scope(decl)));
    }

    #[test]
    fn test_missing_signature_yields_nothing() {
        let mut table = DeclarationTable::new();
        let c = table.add_class("Plain", ClassSite::TopLevel).unwrap();
        let m = table.add_method(c, "run").unwrap();
        let repo = repository(table);
        assert_eq!(repo.generic_superclass(c).unwrap(), None);
        assert!(repo.generic_interfaces(c).unwrap().is_empty());
        assert_eq!(repo.generic_return_type(m).unwrap(), None);
    }
}
