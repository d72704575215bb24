//! Annotated records (tokens, spans) and their key identifiers

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::tags::Tags;
use super::value::{Payload, Value};

/// Identifier of an annotation slot on a record.
///
/// Keys compare by name, so two independently created keys with the same name
/// address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationKey(Arc<str>);

impl AnnotationKey {
    /// Create a key
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Key name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-known annotation keys
pub mod keys {
    use std::sync::LazyLock;

    use super::AnnotationKey;

    /// Surface text of a token
    pub static TEXT: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("text"));
    /// Lemma
    pub static LEMMA: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("lemma"));
    /// Part-of-speech tag
    pub static POS: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("pos"));
    /// Named-entity label
    pub static NER: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("ner"));
    /// Begin character offset
    pub static BEGIN: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("begin"));
    /// End character offset
    pub static END: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("end"));
    /// Record-level tags container
    pub static TAGS: LazyLock<AnnotationKey> = LazyLock::new(|| AnnotationKey::new("tags"));

    /// Standard names and the keys they resolve to, aliases included
    pub fn standard() -> Vec<(&'static str, AnnotationKey)> {
        vec![
            ("text", TEXT.clone()),
            ("word", TEXT.clone()),
            ("lemma", LEMMA.clone()),
            ("pos", POS.clone()),
            ("tag", POS.clone()),
            ("ner", NER.clone()),
            ("begin", BEGIN.clone()),
            ("end", END.clone()),
            ("tags", TAGS.clone()),
        ]
    }
}

/// An annotated record: a bag of key-addressed annotation values.
///
/// Implementors only provide slot access. Record-level [`Tags`] live in the
/// [`keys::TAGS`] slot and are managed by the provided methods.
pub trait Annotated: Send + Sync + fmt::Debug {
    /// Read the annotation stored under `key`
    fn get(&self, key: &AnnotationKey) -> Option<Value>;

    /// Write an annotation; `None` clears the slot
    fn set(&mut self, key: AnnotationKey, value: Option<Value>);

    /// Keys that currently hold a value
    fn keys(&self) -> Vec<AnnotationKey>;

    /// Record-level tags, if any were attached
    fn tags(&self) -> Option<Tags> {
        self.get(&keys::TAGS)
            .and_then(|v| v.payload().and_then(Payload::as_tags).cloned())
    }

    /// Record-level tags, attaching an empty container on first use
    fn tags_or_init(&mut self) -> Tags {
        if let Some(tags) = self.tags() {
            return tags;
        }
        let tags = Tags::new();
        self.set(keys::TAGS.clone(), Some(Value::tags_container(tags.clone())));
        tags
    }
}

/// Insertion-ordered record implementation backed by a map
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    values: IndexMap<AnnotationKey, Value>,
}

impl AnnotationMap {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record holding only the given surface text
    pub fn token(text: impl Into<String>) -> Self {
        Self::new().with(keys::TEXT.clone(), Value::text(text))
    }

    /// Builder-style annotation
    pub fn with(mut self, key: AnnotationKey, value: impl Into<Value>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Wrap into a shareable record handle
    pub fn into_ref(self) -> RecordRef {
        RecordRef::new(self)
    }
}

impl Annotated for AnnotationMap {
    fn get(&self, key: &AnnotationKey) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: AnnotationKey, value: Option<Value>) {
        match value {
            Some(v) => {
                self.values.insert(key, v);
            }
            None => {
                self.values.shift_remove(&key);
            }
        }
    }

    fn keys(&self) -> Vec<AnnotationKey> {
        self.values.keys().cloned().collect()
    }
}

/// Shared handle to a record
#[derive(Clone)]
pub struct RecordRef(Arc<RwLock<dyn Annotated>>);

impl RecordRef {
    /// Wrap a record
    pub fn new<A: Annotated + 'static>(record: A) -> Self {
        Self(Arc::new(RwLock::new(record)))
    }

    /// Read an annotation
    pub fn get(&self, key: &AnnotationKey) -> Option<Value> {
        self.0.read().get(key)
    }

    /// Write an annotation
    pub fn set(&self, key: AnnotationKey, value: Option<Value>) {
        self.0.write().set(key, value);
    }

    /// Record-level tags, if attached
    pub fn tags(&self) -> Option<Tags> {
        self.0.read().tags()
    }

    /// Record-level tags, attaching a container on first use
    pub fn tags_or_init(&self) -> Tags {
        self.0.write().tags_or_init()
    }

    /// Shared access to the underlying record
    pub fn read(&self) -> RwLockReadGuard<'_, dyn Annotated> {
        self.0.read()
    }

    /// Exclusive access to the underlying record
    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Annotated> {
        self.0.write()
    }

    /// Whether both handles address the same record
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Records are equal only when they are the same record.
impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0.read(), f)
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0.read();
        match record.get(&keys::TEXT) {
            Some(text) => write!(f, "{text}"),
            None => f.write_str("<record>"),
        }
    }
}
