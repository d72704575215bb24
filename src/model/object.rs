//! Opt-in named-field access for arbitrary structured objects
//!
//! Types that want to be reachable through `Get`/`Set`/`Select` by field name
//! implement [`FieldAccess`]. Each field declares a [`FieldShape`], which
//! drives how a written value is coerced before it is stored.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::value::{Payload, Value};

/// Element type of a list-shaped field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListElement {
    /// Elements are stored as full values (type name and tags kept)
    Value,
    /// Elements are stored as bare payloads
    Raw,
}

/// Storage shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Holds a bare payload
    Scalar,
    /// Holds a complete value
    Value,
    /// Holds a list
    List(ListElement),
}

/// Field contents exchanged with a [`FieldAccess`] implementor
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The field is unset
    Null,
    /// Bare payload
    Scalar(Payload),
    /// Complete value
    Value(Value),
    /// List of complete values
    List(Vec<Value>),
    /// List of bare payloads
    RawList(Vec<Payload>),
}

impl FieldValue {
    /// Convert field contents into a value
    pub fn into_value(self) -> Value {
        match self {
            Self::Null => Value::null(),
            Self::Scalar(p) => Value::from_payload(p),
            Self::Value(v) => v,
            Self::List(values) => Value::list(values),
            Self::RawList(payloads) => {
                Value::list(payloads.into_iter().map(Value::from_payload).collect())
            }
        }
    }
}

/// Field access failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No field with this name exists
    #[error("no such field")]
    NoSuchField,

    /// Field exists but cannot be accessed in the requested way
    #[error("field is not accessible: {0}")]
    Inaccessible(String),

    /// Written contents do not fit the field
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// What the field stores
        expected: String,
        /// What was supplied
        actual: String,
    },
}

/// Named-field capability
pub trait FieldAccess: Send + Sync + fmt::Debug {
    /// Name of the implementing type, for diagnostics
    fn type_name(&self) -> &str;

    /// Shape of the named field, `None` if there is no such field
    fn field_shape(&self, field: &str) -> Option<FieldShape>;

    /// Read a field
    fn read_field(&self, field: &str) -> Result<FieldValue, FieldError>;

    /// Write a field with contents already coerced to its shape
    fn write_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError>;
}

/// Coerce a value to be written into a field of the given shape.
///
/// Absent and null values clear the field. Scalar fields receive the bare
/// payload. List fields receive the elements either as values or as bare
/// payloads; a non-list payload becomes a single-element list.
pub fn coerce_for_field(shape: FieldShape, value: Option<&Value>) -> FieldValue {
    let Some(value) = value else {
        return FieldValue::Null;
    };
    if shape == FieldShape::Value {
        return FieldValue::Value(value.clone());
    }
    let Some(payload) = value.payload() else {
        return FieldValue::Null;
    };
    match shape {
        FieldShape::List(element) => {
            let elements = match payload {
                Payload::Sequence(seq) => seq.to_vec(),
                other => vec![Value::from_payload(other.clone())],
            };
            match element {
                ListElement::Value => FieldValue::List(elements),
                ListElement::Raw => FieldValue::RawList(
                    elements
                        .into_iter()
                        .filter_map(Value::into_payload)
                        .collect(),
                ),
            }
        }
        _ => FieldValue::Scalar(payload.clone()),
    }
}

/// Shared handle to an object with named fields
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<dyn FieldAccess>>);

impl ObjectRef {
    /// Wrap an object
    pub fn new<T: FieldAccess + 'static>(object: T) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Read a field
    pub fn read_field(&self, field: &str) -> Result<FieldValue, FieldError> {
        self.0.read().read_field(field)
    }

    /// Coerce `value` to the field's shape and write it
    pub fn write_field(&self, field: &str, value: Option<&Value>) -> Result<(), FieldError> {
        let mut object = self.0.write();
        let shape = object.field_shape(field).ok_or(FieldError::NoSuchField)?;
        object.write_field(field, coerce_for_field(shape, value))
    }

    /// Name of the wrapped type
    pub fn type_name(&self) -> String {
        self.0.read().type_name().to_string()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0.read(), f)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0.read().type_name())
    }
}
