//! Core value types for rule evaluation

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::collections::{CompositeValue, Mapping, Sequence};
use super::object::ObjectRef;
use super::record::{AnnotationKey, RecordRef};
use super::tags::Tags;
use super::types::{
    TYPE_BOOLEAN, TYPE_COMPOSITE, TYPE_FUNCTION, TYPE_LIST, TYPE_NUMBER, TYPE_REGEX, TYPE_STRING,
    TYPE_TAGS, TYPE_TOKEN_REGEX, TYPE_TOKENS, ValueKind,
};
use crate::pattern::TokenPatternRef;
use crate::registry::function::FunctionRef;

/// An argument slot: `None` when no value was supplied at all.
///
/// `Some(value)` whose payload is `None` is an explicit null, which several
/// function families treat differently from an absent argument.
pub type Arg = Option<Value>;

/// Runtime payload carried by a [`Value`].
///
/// Scalars are held by value; structured payloads are shared handles that
/// setter-style functions mutate in place.
#[derive(Clone)]
pub enum Payload {
    /// Boolean value
    Bool(bool),
    /// Whole number (64-bit signed)
    Integer(i64),
    /// Non-integral number (double precision)
    Float(f64),
    /// Text value
    Text(String),
    /// Ordered sequence of values
    Sequence(Sequence),
    /// Key to value mapping
    Mapping(Mapping),
    /// Annotated record
    Record(RecordRef),
    /// Named-attribute composite value
    Composite(CompositeValue),
    /// Tags container
    Tags(Tags),
    /// Registered value function
    Function(FunctionRef),
    /// Plain unary transform
    Transform(Transform),
    /// Annotation key identifier
    Key(AnnotationKey),
    /// Object exposing named fields
    Object(ObjectRef),
    /// Compiled token-sequence pattern
    TokenPattern(TokenPatternRef),
}

/// A number extracted from a payload, keeping track of the compute path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// Whole number
    Integer(i64),
    /// Double-precision number
    Float(f64),
}

impl Numeric {
    /// Widen to double precision
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Narrow to a whole number, truncating a fractional part
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Integer(i) => i,
            Self::Float(f) => f as i64,
        }
    }

    /// Whether this number takes the integer compute path
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer(_))
    }
}

impl From<Numeric> for Payload {
    fn from(n: Numeric) -> Self {
        match n {
            Numeric::Integer(i) => Payload::Integer(i),
            Numeric::Float(f) => Payload::Float(f),
        }
    }
}

/// Plain unary function over values, the non-registry counterpart of a value function
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl Transform {
    /// Wrap a closure
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// Apply the transform
    pub fn call(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform")
    }
}

impl Payload {
    /// Kind of this payload
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(self)
    }

    /// Numeric view, if this is a number
    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Self::Integer(i) => Some(Numeric::Integer(*i)),
            Self::Float(f) => Some(Numeric::Float(*f)),
            _ => None,
        }
    }

    /// Boolean view
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text view
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Sequence view
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Mapping view
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Record view
    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Composite view
    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match self {
            Self::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Tags view
    pub fn as_tags(&self) -> Option<&Tags> {
        match self {
            Self::Tags(t) => Some(t),
            _ => None,
        }
    }

    /// Function view
    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Natural text representation, used when a function stringifies its inputs
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Composite(a), Self::Composite(b)) => a == b,
            (Self::Tags(a), Self::Tags(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            (Self::Transform(a), Self::Transform(b)) => Arc::ptr_eq(&a.0, &b.0),
            (Self::Key(a), Self::Key(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::TokenPattern(a), Self::TokenPattern(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Sequence(s) => f.debug_tuple("Sequence").field(s).finish(),
            Self::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
            Self::Record(r) => f.debug_tuple("Record").field(r).finish(),
            Self::Composite(c) => f.debug_tuple("Composite").field(c).finish(),
            Self::Tags(t) => f.debug_tuple("Tags").field(t).finish(),
            Self::Function(func) => f
                .debug_tuple("Function")
                .field(&func.signature().to_string())
                .finish(),
            Self::Transform(t) => fmt::Debug::fmt(t, f),
            Self::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
            Self::TokenPattern(p) => f.debug_tuple("TokenPattern").field(p).finish(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            // Debug keeps the fractional marker, so 5.0 renders as "5.0"
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => f.write_str(s),
            Self::Sequence(s) => write!(f, "{s}"),
            Self::Mapping(m) => write!(f, "{m}"),
            Self::Record(r) => write!(f, "{r}"),
            Self::Composite(c) => write!(f, "{c}"),
            Self::Tags(t) => write!(f, "{t}"),
            Self::Function(func) => write!(f, "{}", func.signature()),
            Self::Transform(_) => f.write_str("<transform>"),
            Self::Key(k) => write!(f, "{k}"),
            Self::Object(o) => write!(f, "{o}"),
            Self::TokenPattern(p) => write!(f, "{p:?}"),
        }
    }
}

/// A typed, optionally tagged wrapper around a runtime payload.
///
/// The type name is advisory and only consulted by overload matching. Cloning
/// a value is cheap and the clone shares both the payload handle and the
/// value-level tags slot with its source.
#[derive(Clone, Default)]
pub struct Value {
    type_name: Option<String>,
    payload: Option<Payload>,
    tags: Arc<OnceLock<Tags>>,
}

impl Value {
    /// Create a value from an optional type name and optional payload
    pub fn new(type_name: Option<String>, payload: Option<Payload>) -> Self {
        Self {
            type_name,
            payload,
            tags: Arc::default(),
        }
    }

    /// Untyped explicit null
    pub fn null() -> Self {
        Self::new(None, None)
    }

    /// Untyped value around a payload
    pub fn from_payload(payload: Payload) -> Self {
        Self::new(None, Some(payload))
    }

    /// Typed value around a payload
    pub fn typed(type_name: impl Into<String>, payload: Payload) -> Self {
        Self::new(Some(type_name.into()), Some(payload))
    }

    /// Boolean value
    pub fn bool(b: bool) -> Self {
        Self::typed(TYPE_BOOLEAN, Payload::Bool(b))
    }

    /// Whole-number value
    pub fn integer(i: i64) -> Self {
        Self::typed(TYPE_NUMBER, Payload::Integer(i))
    }

    /// Double-precision value
    pub fn float(x: f64) -> Self {
        Self::typed(TYPE_NUMBER, Payload::Float(x))
    }

    /// Text value
    pub fn text(s: impl Into<String>) -> Self {
        Self::typed(TYPE_STRING, Payload::Text(s.into()))
    }

    /// Sequence value built from the given elements
    pub fn list(values: Vec<Value>) -> Self {
        Self::typed(TYPE_LIST, Payload::Sequence(Sequence::from_vec(values)))
    }

    /// Sequence of token records
    pub fn tokens(values: Vec<Value>) -> Self {
        Self::typed(TYPE_TOKENS, Payload::Sequence(Sequence::from_vec(values)))
    }

    /// Mapping value
    pub fn mapping(mapping: Mapping) -> Self {
        Self::from_payload(Payload::Mapping(mapping))
    }

    /// Record value
    pub fn record(record: RecordRef) -> Self {
        Self::from_payload(Payload::Record(record))
    }

    /// Composite value
    pub fn composite(composite: CompositeValue) -> Self {
        Self::typed(TYPE_COMPOSITE, Payload::Composite(composite))
    }

    /// Tags container value
    pub fn tags_container(tags: Tags) -> Self {
        Self::typed(TYPE_TAGS, Payload::Tags(tags))
    }

    /// Registered function as a value
    pub fn function(function: FunctionRef) -> Self {
        Self::typed(TYPE_FUNCTION, Payload::Function(function))
    }

    /// Plain transform as a value
    pub fn transform(transform: Transform) -> Self {
        Self::typed(TYPE_FUNCTION, Payload::Transform(transform))
    }

    /// Annotation key as a value
    pub fn key(key: AnnotationKey) -> Self {
        Self::from_payload(Payload::Key(key))
    }

    /// Object as a value
    pub fn object(object: ObjectRef) -> Self {
        Self::from_payload(Payload::Object(object))
    }

    /// String regular expression (pattern text, compiled by the environment)
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::typed(TYPE_REGEX, Payload::Text(pattern.into()))
    }

    /// Compiled token-sequence pattern
    pub fn token_pattern(pattern: TokenPatternRef) -> Self {
        Self::typed(TYPE_TOKEN_REGEX, Payload::TokenPattern(pattern))
    }

    /// Declared type name
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Payload, `None` for an explicit null
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Take the payload out of the value
    pub fn into_payload(self) -> Option<Payload> {
        self.payload
    }

    /// Check if the payload is null
    pub fn is_null(&self) -> bool {
        self.payload.is_none()
    }

    /// Same payload without a type name and with a fresh tags slot
    pub fn untyped(&self) -> Self {
        Self::new(None, self.payload.clone())
    }

    /// Same payload under a different type name, with a fresh tags slot
    pub fn retyped(&self, type_name: impl Into<String>) -> Self {
        Self::new(Some(type_name.into()), self.payload.clone())
    }

    /// Value-level tags, if any were ever written
    pub fn tags(&self) -> Option<&Tags> {
        self.tags.get()
    }

    /// Value-level tags, creating the container on first use
    pub fn tags_or_init(&self) -> &Tags {
        self.tags.get_or_init(Tags::new)
    }

    /// Boolean view of the payload
    pub fn as_bool(&self) -> Option<bool> {
        self.payload.as_ref().and_then(Payload::as_bool)
    }

    /// Integer view of the payload
    pub fn as_integer(&self) -> Option<i64> {
        self.payload.as_ref().and_then(Payload::as_integer)
    }

    /// Text view of the payload
    pub fn as_text(&self) -> Option<&str> {
        self.payload.as_ref().and_then(Payload::as_text)
    }

    /// Sequence view of the payload
    pub fn as_sequence(&self) -> Option<&Sequence> {
        self.payload.as_ref().and_then(Payload::as_sequence)
    }
}

/// Values compare by payload; type names and tags are not part of equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Value");
        s.field("type", &self.type_name).field("payload", &self.payload);
        if let Some(tags) = self.tags() {
            s.field("tags", tags);
        }
        s.finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(p) => write!(f, "{p}"),
            None => f.write_str("null"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Self::from_payload(payload)
    }
}
