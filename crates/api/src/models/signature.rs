//! Parsed generic signatures (JVMS 4.7.9.1), before any type variable is bound.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor(c: char) -> Option<Self> {
        match c {
            'B' => Some(BaseType::Byte),
            'C' => Some(BaseType::Char),
            'D' => Some(BaseType::Double),
            'F' => Some(BaseType::Float),
            'I' => Some(BaseType::Int),
            'J' => Some(BaseType::Long),
            'S' => Some(BaseType::Short),
            'Z' => Some(BaseType::Boolean),
            _ => None,
        }
    }

    pub fn java_name(&self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    Base(BaseType),
    Class(ClassTypeSignature),
    /// Reference to a type variable by name, e.g. `TT;`.
    TypeVariable(SmolStr),
    Array(Box<TypeSignature>),
}

impl TypeSignature {
    pub fn object() -> Self {
        TypeSignature::Class(ClassTypeSignature::simple("java.lang.Object"))
    }
}

/// A class type, possibly with inner-class suffixes: `Ljava/util/Map<TK;TV;>.Entry;`
/// is two segments, `java.util.Map` and `Entry`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTypeSignature {
    pub path: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    pub fn simple(name: impl Into<SmolStr>) -> Self {
        Self {
            path: vec![SimpleClassTypeSignature {
                name: name.into(),
                arguments: Vec::new(),
            }],
        }
    }

    /// Binary name with `$` between nested segments, e.g. `java.util.Map$Entry`.
    pub fn binary_name(&self) -> String {
        self.path
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("$")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleClassTypeSignature {
    /// Dotted name for the first segment, simple name for inner segments.
    pub name: SmolStr,
    pub arguments: Vec<TypeArgument>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(TypeSignature),
    /// `+`
    Extends(TypeSignature),
    /// `-`
    Super(TypeSignature),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FormalTypeParameter {
    pub name: SmolStr,
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

impl FormalTypeParameter {
    pub fn unbounded(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            class_bound: None,
            interface_bounds: Vec::new(),
        }
    }

    /// Class bound first, then interface bounds, in declaration order.
    pub fn bounds(&self) -> Vec<TypeSignature> {
        self.class_bound
            .iter()
            .chain(self.interface_bounds.iter())
            .cloned()
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<FormalTypeParameter>,
    pub superclass: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<FormalTypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` is `void`.
    pub return_type: Option<TypeSignature>,
    pub exceptions: Vec<TypeSignature>,
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Base(b) => f.write_str(b.java_name()),
            TypeSignature::Class(c) => write!(f, "{}", c),
            TypeSignature::TypeVariable(name) => f.write_str(name),
            TypeSignature::Array(element) => write!(f, "{}[]", element),
        }
    }
}

impl fmt::Display for ClassTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            if !segment.arguments.is_empty() {
                f.write_str("<")?;
                for (j, arg) in segment.arguments.iter().enumerate() {
                    if j > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Any => f.write_str("?"),
            TypeArgument::Exact(t) => write!(f, "{}", t),
            TypeArgument::Extends(t) => write!(f, "? extends {}", t),
            TypeArgument::Super(t) => write!(f, "? super {}", t),
        }
    }
}
