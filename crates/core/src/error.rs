use genscope_api::GenericDecl;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed signature {signature:?} at offset {position}: {reason}")]
    Malformed {
        signature: String,
        position: usize,
        reason: String,
    },
    #[error("Type variable '{0}' is not declared in any enclosing scope")]
    UnresolvedTypeVariable(String),
    #[error("{decl} is a {actual}, expected a {expected}")]
    WrongDeclarationKind {
        decl: GenericDecl,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum GenscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),
    #[error("Model error: {0}")]
    Model(String),
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),
    #[error("Unknown declaration: {0}")]
    UnknownDeclaration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GenscopeError>;
