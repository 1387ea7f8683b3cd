use super::signature::TypeSignature;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructorId(pub u32);

/// A declaration that can own generic type parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum GenericDecl {
    Class(ClassId),
    Method(MethodId),
    Constructor(ConstructorId),
}

impl GenericDecl {
    pub fn kind_name(&self) -> &'static str {
        match self {
            GenericDecl::Class(_) => "class",
            GenericDecl::Method(_) => "method",
            GenericDecl::Constructor(_) => "constructor",
        }
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            GenericDecl::Class(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<ClassId> for GenericDecl {
    fn from(id: ClassId) -> Self {
        GenericDecl::Class(id)
    }
}

impl From<MethodId> for GenericDecl {
    fn from(id: MethodId) -> Self {
        GenericDecl::Method(id)
    }
}

impl From<ConstructorId> for GenericDecl {
    fn from(id: ConstructorId) -> Self {
        GenericDecl::Constructor(id)
    }
}

impl fmt::Display for GenericDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericDecl::Class(id) => write!(f, "class#{}", id.0),
            GenericDecl::Method(id) => write!(f, "method#{}", id.0),
            GenericDecl::Constructor(id) => write!(f, "constructor#{}", id.0),
        }
    }
}

/// A type parameter declared directly on a [`GenericDecl`].
///
/// Identity is the owning declaration plus the position in its parameter list,
/// so two parameters that share a name but belong to different declarations
/// never compare equal.
#[derive(Serialize, Debug, Clone)]
pub struct TypeVariable {
    pub name: SmolStr,
    pub owner: GenericDecl,
    pub index: usize,
    /// Bounds as written in the owner's signature, not yet bound to a scope.
    /// Always non-empty; an unbounded parameter carries `java.lang.Object`.
    pub bounds: Vec<TypeSignature>,
}

impl TypeVariable {
    pub fn new(
        name: impl Into<SmolStr>,
        owner: GenericDecl,
        index: usize,
        bounds: Vec<TypeSignature>,
    ) -> Self {
        let bounds = if bounds.is_empty() {
            vec![TypeSignature::object()]
        } else {
            bounds
        };
        Self {
            name: name.into(),
            owner,
            index,
            bounds,
        }
    }
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.index == other.index && self.name == other.name
    }
}

impl Eq for TypeVariable {}

impl Hash for TypeVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.index.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_different_owner_not_equal() {
        let a = TypeVariable::new("X", GenericDecl::Class(ClassId(0)), 0, vec![]);
        let b = TypeVariable::new("X", GenericDecl::Class(ClassId(1)), 0, vec![]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_unbounded_parameter_defaults_to_object() {
        let t = TypeVariable::new("T", GenericDecl::Method(MethodId(3)), 0, vec![]);
        assert_eq!(t.bounds, vec![TypeSignature::object()]);
    }

    #[test]
    fn test_generic_decl_serializes_tagged() {
        let json = serde_json::to_string(&GenericDecl::Constructor(ConstructorId(7))).unwrap();
        assert_eq!(json, r#"{"kind":"constructor","id":7}"#);
    }
}
