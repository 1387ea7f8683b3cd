//! Binds parsed signatures against a [`TypeVariableResolver`].

use crate::error::SignatureError;
use genscope_api::{
    ClassSignature, ClassTypeSignature, MethodSignature, TypeArgument, TypeRef, TypeSignature,
    TypeVariableResolver,
};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoundClassSignature {
    pub superclass: TypeRef,
    pub interfaces: Vec<TypeRef>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoundMethodSignature {
    pub parameters: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub exceptions: Vec<TypeRef>,
}

pub struct SignatureBinder<R> {
    resolver: R,
}

impl<R: TypeVariableResolver> SignatureBinder<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn bind_type(&self, sig: &TypeSignature) -> Result<TypeRef, SignatureError> {
        match sig {
            TypeSignature::Base(base) => Ok(TypeRef::raw(base.java_name())),
            TypeSignature::Class(class) => self.bind_class_type(class),
            TypeSignature::TypeVariable(name) => self
                .resolver
                .resolve(name)
                .map(TypeRef::Variable)
                .ok_or_else(|| SignatureError::UnresolvedTypeVariable(name.to_string())),
            TypeSignature::Array(_) => {
                let mut dimensions = 0usize;
                let mut current = sig;
                while let TypeSignature::Array(inner) = current {
                    dimensions += 1;
                    current = inner.as_ref();
                }
                Ok(TypeRef::Array {
                    element: Box::new(self.bind_type(current)?),
                    dimensions,
                })
            }
        }
    }

    pub fn bind_class_type(&self, sig: &ClassTypeSignature) -> Result<TypeRef, SignatureError> {
        let mut current: Option<TypeRef> = None;
        let mut binary_name = String::new();

        for segment in &sig.path {
            let args = segment
                .arguments
                .iter()
                .map(|arg| self.bind_argument(arg))
                .collect::<Result<Vec<_>, _>>()?;

            current = Some(match current {
                // Raw owners fold into the binary name: Map$Entry
                None | Some(TypeRef::Id(_)) => {
                    if binary_name.is_empty() {
                        binary_name = segment.name.to_string();
                    } else {
                        binary_name = format!("{}${}", binary_name, segment.name);
                    }
                    with_args(TypeRef::Id(binary_name.clone()), args)
                }
                Some(owner) => TypeRef::Nested {
                    owner: Box::new(owner),
                    name: segment.name.to_string(),
                    args,
                },
            });
        }

        current.ok_or_else(|| SignatureError::Malformed {
            signature: sig.to_string(),
            position: 0,
            reason: "empty class type".to_string(),
        })
    }

    pub fn bind_argument(&self, arg: &TypeArgument) -> Result<TypeRef, SignatureError> {
        Ok(match arg {
            TypeArgument::Any => TypeRef::Wildcard {
                bound: None,
                is_upper_bound: true,
            },
            TypeArgument::Exact(t) => self.bind_type(t)?,
            TypeArgument::Extends(t) => TypeRef::Wildcard {
                bound: Some(Box::new(self.bind_type(t)?)),
                is_upper_bound: true,
            },
            TypeArgument::Super(t) => TypeRef::Wildcard {
                bound: Some(Box::new(self.bind_type(t)?)),
                is_upper_bound: false,
            },
        })
    }

    pub fn bind_class(&self, sig: &ClassSignature) -> Result<BoundClassSignature, SignatureError> {
        Ok(BoundClassSignature {
            superclass: self.bind_class_type(&sig.superclass)?,
            interfaces: sig
                .interfaces
                .iter()
                .map(|i| self.bind_class_type(i))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn bind_method(&self, sig: &MethodSignature) -> Result<BoundMethodSignature, SignatureError> {
        Ok(BoundMethodSignature {
            parameters: self.bind_all(&sig.parameters)?,
            return_type: match &sig.return_type {
                Some(t) => self.bind_type(t)?,
                None => TypeRef::void(),
            },
            exceptions: self.bind_all(&sig.exceptions)?,
        })
    }

    pub fn bind_all(&self, sigs: &[TypeSignature]) -> Result<Vec<TypeRef>, SignatureError> {
        sigs.iter().map(|s| self.bind_type(s)).collect()
    }
}

fn with_args(base: TypeRef, args: Vec<TypeRef>) -> TypeRef {
    if args.is_empty() {
        base
    } else {
        TypeRef::Generic {
            base: Box::new(base),
            args,
        }
    }
}
