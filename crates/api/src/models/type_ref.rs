use super::decl::TypeVariable;
use serde::Serialize;
use std::fmt;

/// A generic type after every type-variable reference has been bound.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Primitive or `void`
    Raw(String),

    /// Class by binary name, e.g. `java.util.Map$Entry`
    Id(String),

    /// Generic instantiation (e.g., List<String>)
    Generic {
        base: Box<TypeRef>,
        args: Vec<TypeRef>,
    },

    /// Inner class of a parameterized owner, e.g. `Outer<T>.Inner<U>`
    Nested {
        owner: Box<TypeRef>,
        name: String,
        args: Vec<TypeRef>,
    },

    Array {
        element: Box<TypeRef>,
        dimensions: usize,
    },

    /// Wildcard type (e.g., ? extends Number)
    Wildcard {
        bound: Option<Box<TypeRef>>,
        is_upper_bound: bool, // true: extends, false: super
    },

    Variable(TypeVariable),
}

impl TypeRef {
    pub fn raw(s: impl Into<String>) -> Self {
        TypeRef::Raw(s.into())
    }

    pub fn id(s: impl Into<String>) -> Self {
        TypeRef::Id(s.into())
    }

    pub fn void() -> Self {
        TypeRef::Raw("void".to_string())
    }

    pub fn as_variable(&self) -> Option<&TypeVariable> {
        match self {
            TypeRef::Variable(v) => Some(v),
            _ => None,
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[TypeRef]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(">")
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Raw(s) | TypeRef::Id(s) => f.write_str(s),
            TypeRef::Generic { base, args } => {
                write!(f, "{}", base)?;
                write_args(f, args)
            }
            TypeRef::Nested { owner, name, args } => {
                write!(f, "{}.{}", owner, name)?;
                write_args(f, args)
            }
            TypeRef::Array {
                element,
                dimensions,
            } => {
                write!(f, "{}", element)?;
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            TypeRef::Wildcard {
                bound: None,
                ..
            } => f.write_str("?"),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => {
                let keyword = if *is_upper_bound { "extends" } else { "super" };
                write!(f, "? {} {}", keyword, bound)
            }
            TypeRef::Variable(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decl::{ClassId, GenericDecl};

    #[test]
    fn test_display_nested_generic() {
        let k = TypeVariable::new("K", GenericDecl::Class(ClassId(0)), 0, vec![]);
        let entry = TypeRef::Nested {
            owner: Box::new(TypeRef::Generic {
                base: Box::new(TypeRef::id("java.util.Map")),
                args: vec![TypeRef::Variable(k), TypeRef::id("java.lang.String")],
            }),
            name: "Entry".to_string(),
            args: vec![],
        };
        assert_eq!(entry.to_string(), "java.util.Map<K, java.lang.String>.Entry");
    }

    #[test]
    fn test_display_wildcards_and_arrays() {
        let list = TypeRef::Generic {
            base: Box::new(TypeRef::id("java.util.List")),
            args: vec![TypeRef::Wildcard {
                bound: Some(Box::new(TypeRef::id("java.lang.Number"))),
                is_upper_bound: true,
            }],
        };
        let array = TypeRef::Array {
            element: Box::new(list),
            dimensions: 2,
        };
        assert_eq!(
            array.to_string(),
            "java.util.List<? extends java.lang.Number>[][]"
        );
    }
}
