//! Runtime value kinds and the advisory type names used for overload matching

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::Payload;

/// Type name carried by boolean results
pub const TYPE_BOOLEAN: &str = "BOOLEAN";
/// Type name carried by arithmetic results
pub const TYPE_NUMBER: &str = "NUMBER";
/// Type name carried by string results
pub const TYPE_STRING: &str = "STRING";
/// Type name carried by sequence results
pub const TYPE_LIST: &str = "LIST";
/// Type name a function value must carry to be accepted as a function argument
pub const TYPE_FUNCTION: &str = "FUNCTION";
/// Type name of a string regular expression (payload is the pattern text)
pub const TYPE_REGEX: &str = "REGEX";
/// Type name of a compiled token-sequence pattern
pub const TYPE_TOKEN_REGEX: &str = "TOKEN_REGEX";
/// Type name of a sequence of token records
pub const TYPE_TOKENS: &str = "TOKENS";
/// Type name of a composite value
pub const TYPE_COMPOSITE: &str = "COMPOSITE";
/// Type name of a tags container
pub const TYPE_TAGS: &str = "TAGS";

/// Closed vocabulary of payload shapes.
///
/// Used by parameter descriptors to express the expected runtime class of an
/// argument, and by diagnostics to name what was actually supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Any payload
    Any,
    /// Boolean
    Bool,
    /// Whole number
    Integer,
    /// Double-precision number
    Float,
    /// Either numeric kind
    Number,
    /// Text
    Text,
    /// Ordered sequence of values
    Sequence,
    /// Key to value mapping
    Mapping,
    /// Annotated record (token, span, ...)
    Record,
    /// Named-attribute composite value
    Composite,
    /// Tags container
    Tags,
    /// Registered value function
    Function,
    /// Plain unary transform over values
    Transform,
    /// Annotation key identifier
    Key,
    /// Object exposing named fields
    Object,
    /// Compiled token-sequence pattern
    TokenPattern,
}

impl ValueKind {
    /// Kind of the given payload
    pub fn of(payload: &Payload) -> Self {
        match payload {
            Payload::Bool(_) => Self::Bool,
            Payload::Integer(_) => Self::Integer,
            Payload::Float(_) => Self::Float,
            Payload::Text(_) => Self::Text,
            Payload::Sequence(_) => Self::Sequence,
            Payload::Mapping(_) => Self::Mapping,
            Payload::Record(_) => Self::Record,
            Payload::Composite(_) => Self::Composite,
            Payload::Tags(_) => Self::Tags,
            Payload::Function(_) => Self::Function,
            Payload::Transform(_) => Self::Transform,
            Payload::Key(_) => Self::Key,
            Payload::Object(_) => Self::Object,
            Payload::TokenPattern(_) => Self::TokenPattern,
        }
    }

    /// Whether a payload of this shape satisfies the kind
    pub fn accepts(&self, payload: &Payload) -> bool {
        match self {
            Self::Any => true,
            Self::Number => matches!(payload, Payload::Integer(_) | Payload::Float(_)),
            kind => *kind == Self::of(payload),
        }
    }

    /// Check if this kind is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Number)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "Any",
            Self::Bool => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Number => "Number",
            Self::Text => "String",
            Self::Sequence => "List",
            Self::Mapping => "Map",
            Self::Record => "Record",
            Self::Composite => "Composite",
            Self::Tags => "Tags",
            Self::Function => "ValueFunction",
            Self::Transform => "Function",
            Self::Key => "AnnotationKey",
            Self::Object => "Object",
            Self::TokenPattern => "TokenSequencePattern",
        };
        f.write_str(name)
    }
}
