//! Accessor functions: read and write elements of composites, mappings,
//! sequences, records and objects
//!
//! Each accessor takes an operand, a selector and an optional value. With the
//! value present the selected slot is written in place before it is read back.

mod annotation;
mod composite;
mod list;
mod mapping;
mod object_field;

pub use annotation::AnnotationFunction;
pub use composite::{CompositeKeysFunction, CompositeValueFunction};
pub use list::ListValueFunction;
pub use mapping::{MapKeysFunction, MapValueFunction};
pub use object_field::ObjectFieldFunction;

use log::warn;

use crate::evaluator::Env;
use crate::model::{AnnotationKey, Arg, Payload, RecordRef};
use crate::registry::function::{FunctionError, FunctionResult};

/// Records addressed by a record-valued operand
#[derive(Debug, Clone)]
pub(crate) enum RecordTarget {
    /// A single record
    Single(RecordRef),
    /// Every record of a sequence, broadcast element-wise
    Many(Vec<RecordRef>),
}

impl RecordTarget {
    /// Target for a payload; a sequence qualifies only if every element is a record
    pub(crate) fn of(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Record(record) => Some(Self::Single(record.clone())),
            Payload::Sequence(seq) => seq
                .to_vec()
                .iter()
                .map(|v| v.payload().and_then(Payload::as_record).cloned())
                .collect::<Option<Vec<_>>>()
                .map(Self::Many),
            _ => None,
        }
    }

    /// Whether the argument holds a record or a sequence of records
    pub(crate) fn accepts(arg: &Arg) -> bool {
        super::payload_of(arg).and_then(Self::of).is_some()
    }

    /// Records in target order
    pub(crate) fn records(&self) -> &[RecordRef] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Many(records) => records,
        }
    }
}

/// Whether the argument can select an annotation slot
pub(crate) fn is_annotation_key(arg: &Arg) -> bool {
    matches!(super::payload_of(arg), Some(Payload::Key(_) | Payload::Text(_)))
}

/// Resolve a key-valued or symbolic annotation selector
pub(crate) fn resolve_annotation_key(
    name: &str,
    env: &dyn Env,
    arg: &Arg,
) -> FunctionResult<AnnotationKey> {
    match super::payload_of(arg) {
        Some(Payload::Key(key)) => Ok(key.clone()),
        Some(Payload::Text(text)) => env.resolve_annotation_key(text).ok_or_else(|| {
            warn!("{name}: unknown annotation key '{text}'");
            FunctionError::UnknownAnnotationKey {
                name: name.to_string(),
                key: text.clone(),
            }
        }),
        _ => Err(FunctionError::argument_type(name, 1, "AnnotationKey or String", arg)),
    }
}
