//! Value model: typed values, tags, composites, records and objects

pub mod collections;
mod json;
pub mod object;
pub mod record;
pub mod tags;
pub mod types;
pub mod value;

pub use collections::{CompositeValue, MapKey, Mapping, Sequence};
pub use object::{FieldAccess, FieldError, FieldShape, FieldValue, ListElement, ObjectRef};
pub use record::{Annotated, AnnotationKey, AnnotationMap, RecordRef, keys};
pub use tags::Tags;
pub use types::ValueKind;
pub use value::{Arg, Numeric, Payload, Transform, Value};
