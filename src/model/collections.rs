//! Shared, in-place mutable collection payloads
//!
//! Each collection is a cheap handle over an `Arc<RwLock<..>>`. Cloning the
//! handle aliases the same storage, so a setter applied through one `Value`
//! is observed through every other `Value` holding the same payload.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::record::AnnotationKey;
use super::value::{Payload, Value};

/// Ordered sequence of values
#[derive(Clone, Default)]
pub struct Sequence(Arc<RwLock<Vec<Value>>>);

impl Sequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence that owns the given elements
    pub fn from_vec(values: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(values)))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Replace the element at `index`, returning the previous one.
    ///
    /// Returns `None` and leaves the sequence untouched if the index is out
    /// of bounds.
    pub fn set(&self, index: usize, value: Value) -> Option<Value> {
        let mut guard = self.0.write();
        let slot = guard.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Resolve a possibly negative index against the current length.
    ///
    /// `-1` addresses the last element. Returns `None` when the resolved
    /// position falls outside the sequence.
    pub fn resolve_index(&self, index: i64) -> Option<usize> {
        let len = self.len() as i64;
        let resolved = if index < 0 { len + index } else { index };
        (0..len).contains(&resolved).then_some(resolved as usize)
    }

    /// Copy of the current elements (cheap handle clones)
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Whether both handles address the same storage
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(values: Vec<Value>) -> Self {
        Self::from_vec(values)
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.read().iter()).finish()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.read().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// Hashable key of a [`Mapping`].
///
/// Only scalar payloads and annotation keys can address a mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    /// Text key
    Text(String),
    /// Integer key
    Integer(i64),
    /// Boolean key
    Bool(bool),
    /// Annotation key identifier
    Key(AnnotationKey),
}

impl MapKey {
    /// Key for the given payload, if the payload is hashable
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Text(s) => Some(Self::Text(s.clone())),
            Payload::Integer(i) => Some(Self::Integer(*i)),
            Payload::Bool(b) => Some(Self::Bool(*b)),
            Payload::Key(k) => Some(Self::Key(k.clone())),
            _ => None,
        }
    }

    /// Key as a value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::text(s.clone()),
            Self::Integer(i) => Value::integer(*i),
            Self::Bool(b) => Value::bool(*b),
            Self::Key(k) => Value::key(k.clone()),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<AnnotationKey> for MapKey {
    fn from(key: AnnotationKey) -> Self {
        Self::Key(key)
    }
}

/// Insertion-ordered key to value mapping
#[derive(Clone, Default)]
pub struct Mapping(Arc<RwLock<IndexMap<MapKey, Value>>>);

impl Mapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &MapKey) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous entry
    pub fn insert(&self, key: MapKey, value: Value) -> Option<Value> {
        self.0.write().insert(key, value)
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&self, key: &MapKey) -> Option<Value> {
        self.0.write().shift_remove(key)
    }

    /// Check if `key` is present
    pub fn contains_key(&self, key: &MapKey) -> bool {
        self.0.read().contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<MapKey> {
        self.0.read().keys().cloned().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Copy of the current entries
    pub fn entries(&self) -> Vec<(MapKey, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl FromIterator<(MapKey, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (MapKey, Value)>>(iter: I) -> Self {
        Self(Arc::new(RwLock::new(iter.into_iter().collect())))
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.read().iter()).finish()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.read().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

/// Named-attribute value for structured domain objects.
///
/// Unlike a [`Mapping`], attributes are always addressed by name and an
/// attribute can exist while holding no value.
#[derive(Clone, Default)]
pub struct CompositeValue(Arc<RwLock<IndexMap<String, Option<Value>>>>);

impl CompositeValue {
    /// Create a composite with no attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute assignment
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    /// Attribute value; `None` for unknown attributes and for attributes set to nothing
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.read().get(name).cloned().flatten()
    }

    /// Set an attribute, creating it if needed
    pub fn set(&self, name: impl Into<String>, value: Option<Value>) {
        self.0.write().insert(name.into(), value);
    }

    /// Attribute names in definition order
    pub fn attribute_names(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }

    /// Check if the attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.read().contains_key(name)
    }
}

impl PartialEq for CompositeValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for CompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.read().iter()).finish()
    }
}

impl fmt::Display for CompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.0.read().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{name}: {v}")?,
                None => write!(f, "{name}: null")?,
            }
        }
        f.write_str("}")
    }
}
