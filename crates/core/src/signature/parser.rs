//! Recursive-descent parser for generic signatures (JVMS 4.7.9.1).

use crate::error::SignatureError;
use genscope_api::{
    BaseType, ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodSignature,
    SimpleClassTypeSignature, TypeArgument, TypeSignature,
};
use smol_str::SmolStr;

/// JVMS 4.3.2: an array type may have at most 255 dimensions.
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Deepest accepted nesting of type argument lists, e.g. `List<List<...>>`.
pub const MAX_TYPE_ARGUMENT_DEPTH: usize = 128;

pub fn parse_class_signature(signature: &str) -> Result<ClassSignature, SignatureError> {
    let mut parser = SignatureParser::new(signature);
    let type_parameters = parser.formal_type_parameters()?;
    let superclass = parser.class_type()?;
    let mut interfaces = Vec::new();
    while !parser.at_end() {
        interfaces.push(parser.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        superclass,
        interfaces,
    })
}

pub fn parse_method_signature(signature: &str) -> Result<MethodSignature, SignatureError> {
    let mut parser = SignatureParser::new(signature);
    let type_parameters = parser.formal_type_parameters()?;

    parser.expect('(')?;
    let mut parameters = Vec::new();
    while parser.peek() != Some(')') {
        parameters.push(parser.java_type()?);
    }
    parser.expect(')')?;

    let return_type = if parser.peek() == Some('V') {
        parser.bump();
        None
    } else {
        Some(parser.java_type()?)
    };

    let mut exceptions = Vec::new();
    while parser.peek() == Some('^') {
        parser.bump();
        match parser.peek() {
            Some('L') => exceptions.push(TypeSignature::Class(parser.class_type()?)),
            Some('T') => exceptions.push(parser.type_variable()?),
            _ => return Err(parser.error("expected class type or type variable after '^'")),
        }
    }
    parser.finish()?;

    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        exceptions,
    })
}

/// Field signatures are a single reference type.
pub fn parse_field_signature(signature: &str) -> Result<TypeSignature, SignatureError> {
    let mut parser = SignatureParser::new(signature);
    let ty = parser.reference_type()?;
    parser.finish()?;
    Ok(ty)
}

/// Only the formal type parameters of a class or method signature.
pub fn parse_formal_type_parameters(
    signature: &str,
) -> Result<Vec<FormalTypeParameter>, SignatureError> {
    SignatureParser::new(signature).formal_type_parameters()
}

struct SignatureParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> SignatureError {
        SignatureError::Malformed {
            signature: self.input.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), SignatureError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn finish(&self) -> Result<(), SignatureError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    /// Identifier up to one of the reserved characters `. ; [ / < > :`.
    fn identifier(&mut self) -> Result<SmolStr, SignatureError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '.' | ';' | '[' | '/' | '<' | '>' | ':') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(SmolStr::new(&self.input[start..self.pos]))
    }

    fn formal_type_parameters(&mut self) -> Result<Vec<FormalTypeParameter>, SignatureError> {
        let mut params = Vec::new();
        if self.peek() != Some('<') {
            return Ok(params);
        }
        self.bump();
        while self.peek() != Some('>') {
            params.push(self.formal_type_parameter()?);
        }
        self.bump();
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    fn formal_type_parameter(&mut self) -> Result<FormalTypeParameter, SignatureError> {
        let name = self.identifier()?;

        self.expect(':')?;
        let class_bound = match self.peek() {
            Some('L' | 'T' | '[') => Some(self.reference_type()?),
            _ => None,
        };

        let mut interface_bounds = Vec::new();
        while self.peek() == Some(':') {
            self.bump();
            interface_bounds.push(self.reference_type()?);
        }

        Ok(FormalTypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
    }

    fn java_type(&mut self) -> Result<TypeSignature, SignatureError> {
        match self.peek().and_then(BaseType::from_descriptor) {
            Some(base) => {
                self.bump();
                Ok(TypeSignature::Base(base))
            }
            None => self.reference_type(),
        }
    }

    fn reference_type(&mut self) -> Result<TypeSignature, SignatureError> {
        match self.peek() {
            Some('L') => Ok(TypeSignature::Class(self.class_type()?)),
            Some('T') => self.type_variable(),
            Some('[') => {
                let mut dimensions = 0;
                while self.peek() == Some('[') {
                    if dimensions == MAX_ARRAY_DIMENSIONS {
                        return Err(self.error("too many array dimensions"));
                    }
                    self.bump();
                    dimensions += 1;
                }
                let mut ty = self.java_type()?;
                for _ in 0..dimensions {
                    ty = TypeSignature::Array(Box::new(ty));
                }
                Ok(ty)
            }
            Some(c) => Err(self.error(format!("unexpected '{}' in reference type", c))),
            None => Err(self.error("unexpected end of input in reference type")),
        }
    }

    fn type_variable(&mut self) -> Result<TypeSignature, SignatureError> {
        self.expect('T')?;
        let name = self.identifier()?;
        self.expect(';')?;
        Ok(TypeSignature::TypeVariable(name))
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature, SignatureError> {
        self.expect('L')?;

        // Package segments are separated by '/', rendered dotted.
        let mut name = self.identifier()?.to_string();
        while self.peek() == Some('/') {
            self.bump();
            name.push('.');
            name.push_str(&self.identifier()?);
        }

        let mut path = vec![SimpleClassTypeSignature {
            name: SmolStr::new(name),
            arguments: self.type_arguments()?,
        }];
        while self.peek() == Some('.') {
            self.bump();
            let name = self.identifier()?;
            path.push(SimpleClassTypeSignature {
                name,
                arguments: self.type_arguments()?,
            });
        }

        self.expect(';')?;
        Ok(ClassTypeSignature { path })
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>, SignatureError> {
        let mut args = Vec::new();
        if self.peek() != Some('<') {
            return Ok(args);
        }
        if self.depth == MAX_TYPE_ARGUMENT_DEPTH {
            return Err(self.error("type arguments nested too deeply"));
        }
        self.bump();
        self.depth += 1;
        while self.peek() != Some('>') {
            let arg = match self.peek() {
                Some('*') => {
                    self.bump();
                    TypeArgument::Any
                }
                Some('+') => {
                    self.bump();
                    TypeArgument::Extends(self.reference_type()?)
                }
                Some('-') => {
                    self.bump();
                    TypeArgument::Super(self.reference_type()?)
                }
                Some(_) => TypeArgument::Exact(self.reference_type()?),
                None => return Err(self.error("unterminated type argument list")),
            };
            args.push(arg);
        }
        self.bump();
        self.depth -= 1;
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        Ok(args)
    }
}
