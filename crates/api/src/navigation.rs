use crate::models::{ClassId, ConstructorId, GenericDecl, MethodId, TypeVariable};

/// Static facts about declarations, supplied by whatever holds the metadata
/// (a declaration table, a class-file reader, ...).
///
/// Every navigation method answers `None` for an unknown handle.
pub trait DeclarationReader: Send + Sync {
    /// Type parameters declared directly on `decl`, in declaration order.
    fn type_parameters(&self, decl: GenericDecl) -> &[TypeVariable];

    /// The method whose body lexically contains `class` (local and anonymous classes).
    fn enclosing_method(&self, class: ClassId) -> Option<MethodId>;

    /// The constructor whose body lexically contains `class`.
    fn enclosing_constructor(&self, class: ClassId) -> Option<ConstructorId>;

    /// The immediately enclosing class. For a local class this is the class
    /// declaring the surrounding method or constructor.
    fn enclosing_class(&self, class: ClassId) -> Option<ClassId>;

    fn method_declaring_class(&self, method: MethodId) -> Option<ClassId>;

    fn constructor_declaring_class(&self, constructor: ConstructorId) -> Option<ClassId>;

    /// Human readable name for diagnostics.
    fn display_name(&self, decl: GenericDecl) -> Option<&str>;

    /// Raw generic signature attribute, if the declaration carries one.
    fn generic_signature(&self, _decl: GenericDecl) -> Option<&str> {
        None
    }

    fn is_interface(&self, _class: ClassId) -> bool {
        false
    }
}

/// Binds a bare type-variable name to its declaration.
///
/// `None` means the name is not declared anywhere visible; it is an ordinary
/// answer, not a failure.
pub trait TypeVariableResolver {
    fn resolve(&self, name: &str) -> Option<TypeVariable>;
}

impl<T: TypeVariableResolver + ?Sized> TypeVariableResolver for &T {
    fn resolve(&self, name: &str) -> Option<TypeVariable> {
        (**self).resolve(name)
    }
}
