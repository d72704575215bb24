//! Minimal token-sequence pattern over token texts

use super::{StringPattern, TokenSequencePattern};
use crate::model::{Payload, Value, keys};

/// Fixed-length token pattern: one string pattern per token, each matched
/// against the whole token text.
///
/// Written as space-separated regexes, e.g. `"[Nn]ew York|LA"` is two token
/// slots. Tokens are records carrying [`keys::TEXT`] or plain text values.
#[derive(Debug, Clone)]
pub struct TokenTextPattern {
    source: String,
    slots: Vec<StringPattern>,
}

impl TokenTextPattern {
    /// Compile a pattern; every whitespace-separated part is one token slot
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let slots = source
            .split_whitespace()
            .map(StringPattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { source, slots })
    }

    fn token_text(token: &Value) -> Option<String> {
        match token.payload()? {
            Payload::Text(s) => Some(s.clone()),
            Payload::Record(record) => record.get(&keys::TEXT).and_then(|v| v.as_text().map(String::from)),
            _ => None,
        }
    }

    fn matches_at(&self, tokens: &[Value], start: usize) -> bool {
        if self.slots.is_empty() || start + self.slots.len() > tokens.len() {
            return false;
        }
        self.slots
            .iter()
            .zip(&tokens[start..])
            .all(|(slot, token)| Self::token_text(token).is_some_and(|t| slot.is_full_match(&t)))
    }
}

impl TokenSequencePattern for TokenTextPattern {
    fn pattern(&self) -> &str {
        &self.source
    }

    fn matches(&self, tokens: &[Value]) -> bool {
        tokens.len() == self.slots.len() && self.matches_at(tokens, 0)
    }

    fn replace_all(&self, tokens: &[Value], replacement: &[Value]) -> Vec<Value> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            if self.matches_at(tokens, i) {
                out.extend_from_slice(replacement);
                i += self.slots.len();
            } else {
                out.push(tokens[i].clone());
                i += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnnotationMap;

    fn words(text: &str) -> Vec<Value> {
        text.split_whitespace()
            .map(|w| Value::record(AnnotationMap::token(w).into_ref()))
            .collect()
    }

    #[test]
    fn test_whole_sequence_match() {
        let p = TokenTextPattern::new("[Nn]ew York").unwrap();
        assert!(p.matches(&words("new York")));
        assert!(!p.matches(&words("new York City")));
    }

    #[test]
    fn test_replace_all_non_overlapping() {
        let p = TokenTextPattern::new("a a").unwrap();
        let out = p.replace_all(&words("a a a b"), &[Value::text("X")]);
        let texts: Vec<_> = out.iter().map(|v| v.to_string()).collect();
        assert_eq!(texts, vec!["X", "a", "b"]);
    }

    #[test]
    fn test_plain_text_tokens() {
        let p = TokenTextPattern::new(r"\d+").unwrap();
        assert!(p.matches(&[Value::text("42")]));
    }
}
