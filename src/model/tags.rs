//! Side table of named metadata attachable to records and values

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::value::Value;

/// Mutable tag-name to value table.
///
/// A tag may be present without a value. Removing the last tag leaves an
/// empty container in place rather than detaching it.
#[derive(Clone, Default)]
pub struct Tags(Arc<RwLock<FxHashMap<String, Option<Value>>>>);

impl Tags {
    /// Create an empty tags container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a tag
    pub fn add_tag(&self, tag: impl Into<String>, value: Option<Value>) {
        self.0.write().insert(tag.into(), value);
    }

    /// Value of a tag; `None` when the tag is missing or carries no value
    pub fn get_tag(&self, tag: &str) -> Option<Value> {
        self.0.read().get(tag).cloned().flatten()
    }

    /// Check if the tag is present
    pub fn has_tag(&self, tag: &str) -> bool {
        self.0.read().contains_key(tag)
    }

    /// Remove a tag, returning whether it was present
    pub fn remove_tag(&self, tag: &str) -> bool {
        self.0.write().remove(tag).is_some()
    }

    /// Tag names, sorted
    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if no tag is set
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

impl PartialEq for Tags {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.0.read();
        let mut entries: Vec<_> = guard.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        f.debug_map().entries(entries).finish()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, name) in self.tag_names().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.get_tag(name) {
                Some(v) => write!(f, "{name}={v}")?,
                None => f.write_str(name)?,
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_without_value() {
        let tags = Tags::new();
        tags.add_tag("NP", None);
        assert!(tags.has_tag("NP"));
        assert_eq!(tags.get_tag("NP"), None);
    }

    #[test]
    fn test_remove_leaves_empty_container() {
        let tags = Tags::new();
        tags.add_tag("x", Some(Value::integer(1)));
        assert!(tags.remove_tag("x"));
        assert!(!tags.remove_tag("x"));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_display_is_sorted() {
        let tags = Tags::new();
        tags.add_tag("b", Some(Value::integer(2)));
        tags.add_tag("a", None);
        assert_eq!(tags.to_string(), "{a, b=2}");
    }
}
