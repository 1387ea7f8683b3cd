pub mod bind;
pub mod parser;

pub use bind::{BoundClassSignature, BoundMethodSignature, SignatureBinder};
pub use parser::{
    parse_class_signature, parse_field_signature, parse_formal_type_parameters,
    parse_method_signature,
};
