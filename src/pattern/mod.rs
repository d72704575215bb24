//! Pattern-matcher boundary
//!
//! The `Match`, `Replace` and `Split` functions never match anything
//! themselves. String patterns are compiled by the environment into
//! [`StringPattern`]; token-sequence patterns arrive pre-compiled as a
//! [`TokenSequencePattern`] trait object.

pub mod cache;
pub mod token;

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::model::Value;

pub use cache::{CacheStats, PatternCache};
pub use token::TokenTextPattern;

/// Compiled string regular expression.
///
/// Keeps an anchored twin of the expression so whole-input matching does not
/// depend on how the source pattern was written.
#[derive(Debug, Clone)]
pub struct StringPattern {
    source: String,
    regex: Regex,
    anchored: Regex,
}

impl StringPattern {
    /// Compile a pattern
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&source)?;
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source,
            regex,
            anchored,
        })
    }

    /// Pattern text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole input matches
    pub fn is_full_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }

    /// Replace every non-overlapping match; `$1`/`${name}` refer to groups
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        self.regex.replace_all(text, replacement).into_owned()
    }

    /// Byte ranges of every non-overlapping match
    pub fn find_ranges(&self, text: &str) -> Vec<std::ops::Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }
}

impl fmt::Display for StringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compiled matcher over token sequences
pub trait TokenSequencePattern: Send + Sync + fmt::Debug {
    /// Source text of the pattern
    fn pattern(&self) -> &str;

    /// Whether the whole token sequence matches
    fn matches(&self, tokens: &[Value]) -> bool;

    /// Replace every non-overlapping match with `replacement`
    fn replace_all(&self, tokens: &[Value], replacement: &[Value]) -> Vec<Value>;
}

/// Shared handle to a token-sequence pattern
pub type TokenPatternRef = Arc<dyn TokenSequencePattern>;

/// Build a regex matching any of `phrases` exactly, with flexible whitespace
/// between words.
///
/// Longer phrases come first so the alternation prefers the longest match.
pub fn phrase_alternation<S: AsRef<str>>(phrases: &[S]) -> String {
    let mut phrases: Vec<&str> = phrases
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));
    phrases.dedup();
    phrases
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}
