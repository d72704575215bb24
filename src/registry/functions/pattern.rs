//! Pattern functions: Match, Replace and Split
//!
//! Token-sequence forms take a compiled pattern value; string forms take a
//! `REGEX`-typed pattern text that the environment compiles (and caches).

use std::ops::Range;

use super::{arg_at, payload_of, text_of};
use crate::evaluator::Env;
use crate::model::types::{TYPE_BOOLEAN, TYPE_REGEX, TYPE_TOKEN_REGEX, TYPE_TOKENS};
use crate::model::{AnnotationMap, Arg, Payload, Value, ValueKind, keys};
use crate::pattern::TokenPatternRef;
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::signature::{FunctionSignature, ParamInfo};

fn token_pattern<'a>(name: &str, args: &'a [Arg]) -> FunctionResult<&'a TokenPatternRef> {
    match payload_of(arg_at(args, 1)) {
        Some(Payload::TokenPattern(p)) => Ok(p),
        _ => Err(FunctionError::argument_type(name, 1, "TokenSequencePattern", arg_at(args, 1))),
    }
}

fn regex_text<'a>(name: &str, args: &'a [Arg]) -> FunctionResult<&'a str> {
    text_of(arg_at(args, 1)).ok_or_else(|| FunctionError::argument_type(name, 1, "REGEX", arg_at(args, 1)))
}

/// Match(tokens, pattern) - whole-sequence token pattern match
pub struct TokensMatchFunction {
    signature: FunctionSignature,
}

impl Default for TokensMatchFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl TokensMatchFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "TOKENS_MATCH",
                vec![
                    ParamInfo::nullable("TOKENS", ValueKind::Sequence),
                    ParamInfo::typed("TOKEN_REGEX", TYPE_TOKEN_REGEX, Some(ValueKind::TokenPattern)),
                ],
            )
            .returns(TYPE_BOOLEAN),
        }
    }
}

impl ValueFunction for TokensMatchFunction {
    fn name(&self) -> &str {
        "TOKENS_MATCH"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(tokens) = payload_of(arg_at(args, 0)).and_then(Payload::as_sequence) else {
            return Ok(Some(Value::bool(false)));
        };
        let pattern = token_pattern(self.name(), args)?;
        Ok(Some(Value::bool(pattern.matches(&tokens.to_vec()))))
    }

    fn documentation(&self) -> &str {
        "True if the token pattern matches the whole token list. A null list never matches."
    }
}

/// Replace(tokens, pattern, replacement) - replace every token pattern match
pub struct TokensReplaceFunction {
    signature: FunctionSignature,
}

impl Default for TokensReplaceFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl TokensReplaceFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "TOKENS_REPLACE",
                vec![
                    ParamInfo::nullable("TOKENS", ValueKind::Sequence),
                    ParamInfo::typed("TOKEN_REGEX", TYPE_TOKEN_REGEX, Some(ValueKind::TokenPattern)),
                    ParamInfo::nullable("REPLACEMENT", ValueKind::Sequence),
                ],
            )
            .returns(TYPE_TOKENS),
        }
    }
}

impl ValueFunction for TokensReplaceFunction {
    fn name(&self) -> &str {
        "TOKENS_REPLACE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(tokens) = payload_of(arg_at(args, 0)).and_then(Payload::as_sequence) else {
            return Ok(Some(Value::bool(false)));
        };
        let pattern = token_pattern(self.name(), args)?;
        let replacement = payload_of(arg_at(args, 2))
            .and_then(Payload::as_sequence)
            .map(|s| s.to_vec())
            .unwrap_or_default();
        Ok(Some(Value::tokens(pattern.replace_all(&tokens.to_vec(), &replacement))))
    }

    fn documentation(&self) -> &str {
        "Replaces every match of the token pattern with the replacement tokens."
    }
}

/// Match(string, regex) - whole-string regular expression match
pub struct StringMatchFunction {
    signature: FunctionSignature,
}

impl Default for StringMatchFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl StringMatchFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "STRING_MATCH",
                vec![
                    ParamInfo::nullable("STRING", ValueKind::Text),
                    ParamInfo::typed("REGEX", TYPE_REGEX, Some(ValueKind::Text)),
                ],
            )
            .returns(TYPE_BOOLEAN),
        }
    }
}

impl ValueFunction for StringMatchFunction {
    fn name(&self) -> &str {
        "STRING_MATCH"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(text) = text_of(arg_at(args, 0)) else {
            return Ok(Some(Value::bool(false)));
        };
        let pattern = env.resolve_string_pattern(regex_text(self.name(), args)?)?;
        Ok(Some(Value::bool(pattern.is_full_match(text))))
    }

    fn documentation(&self) -> &str {
        "True if the regular expression matches the whole string. A null string never matches."
    }
}

/// Replace(string, regex, replacement) - replace every regular expression match
pub struct StringReplaceFunction {
    signature: FunctionSignature,
}

impl Default for StringReplaceFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl StringReplaceFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "STRING_REPLACE",
                vec![
                    ParamInfo::nullable("STRING", ValueKind::Text),
                    ParamInfo::typed("REGEX", TYPE_REGEX, Some(ValueKind::Text)),
                    ParamInfo::nullable("REPLACEMENT", ValueKind::Text),
                ],
            ),
        }
    }
}

impl ValueFunction for StringReplaceFunction {
    fn name(&self) -> &str {
        "STRING_REPLACE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(text) = text_of(arg_at(args, 0)) else {
            return Ok(Some(Value::bool(false)));
        };
        let pattern = env.resolve_string_pattern(regex_text(self.name(), args)?)?;
        let replacement = text_of(arg_at(args, 2)).unwrap_or_default();
        Ok(Some(Value::text(pattern.replace_all(text, replacement))))
    }

    fn documentation(&self) -> &str {
        "Replaces every match of the regular expression; $1 and ${name} refer to capture groups."
    }
}

/// Split(token, regex, include_matched) - split a token's text into new tokens
pub struct TokenStringSplitFunction {
    signature: FunctionSignature,
}

impl Default for TokenStringSplitFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStringSplitFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "TOKEN_STRING_SPLIT",
                vec![
                    ParamInfo::required("TOKEN", ValueKind::Record),
                    ParamInfo::typed("REGEX", TYPE_REGEX, Some(ValueKind::Text)),
                    ParamInfo::required("INCLUDE_MATCHED", ValueKind::Bool),
                ],
            )
            .returns(TYPE_TOKENS),
        }
    }
}

/// Byte ranges of the pieces: the gaps between matches and, optionally, the matches
fn split_ranges(len: usize, matches: &[Range<usize>], include_matched: bool) -> Vec<Range<usize>> {
    let mut pieces = Vec::with_capacity(matches.len() * 2 + 1);
    let mut start = 0;
    for m in matches {
        if m.start > start {
            pieces.push(start..m.start);
        }
        if include_matched && !m.is_empty() {
            pieces.push(m.clone());
        }
        start = m.end;
    }
    if start < len {
        pieces.push(start..len);
    }
    pieces
}

impl ValueFunction for TokenStringSplitFunction {
    fn name(&self) -> &str {
        "TOKEN_STRING_SPLIT"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(Payload::Record(token)) = payload_of(arg_at(args, 0)) else {
            return Err(FunctionError::argument_type(self.name(), 0, "Record", arg_at(args, 0)));
        };
        let include_matched = payload_of(arg_at(args, 2))
            .and_then(Payload::as_bool)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 2, "Boolean", arg_at(args, 2)))?;
        let pattern = env.resolve_string_pattern(regex_text(self.name(), args)?)?;

        let text = token
            .get(&keys::TEXT)
            .and_then(|v| v.as_text().map(String::from))
            .unwrap_or_default();
        let base = token
            .get(&keys::BEGIN)
            .and_then(|v| v.as_integer())
            .unwrap_or(0);

        let pieces = split_ranges(text.len(), &pattern.find_ranges(&text), include_matched);
        let tokens = pieces
            .into_iter()
            .map(|range| {
                let begin = base + text[..range.start].chars().count() as i64;
                let piece = &text[range];
                let end = begin + piece.chars().count() as i64;
                Value::record(
                    AnnotationMap::token(piece)
                        .with(keys::BEGIN.clone(), begin)
                        .with(keys::END.clone(), end)
                        .into_ref(),
                )
            })
            .collect();
        Ok(Some(Value::tokens(tokens)))
    }

    fn documentation(&self) -> &str {
        "Splits a token's text on a regular expression into new tokens with character offsets, optionally keeping the delimiters."
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::evaluator::RuleEnv;
    use crate::pattern::TokenTextPattern;

    fn tokens(words: &[&str]) -> Value {
        Value::tokens(words.iter().map(|w| Value::record(AnnotationMap::token(*w).into_ref())).collect())
    }

    fn texts(value: &Value) -> Vec<String> {
        value
            .as_sequence()
            .map(|s| s.to_vec())
            .unwrap_or_default()
            .iter()
            .filter_map(|t| match t.payload() {
                Some(Payload::Record(r)) => r.get(&keys::TEXT).map(|v| v.to_string()),
                _ => None,
            })
            .collect()
    }

    fn compiled(source: &str) -> Value {
        Value::token_pattern(Arc::new(TokenTextPattern::new(source).unwrap()))
    }

    #[test]
    fn test_tokens_match() {
        let f = TokensMatchFunction::new();
        let env = RuleEnv::new();
        let args = [Some(tokens(&["New", "York"])), Some(compiled("[Nn]ew York|LA"))];
        assert!(f.check_args(&args));
        assert_eq!(f.apply(&env, &args).unwrap(), Some(Value::bool(true)));

        let args = [None, Some(compiled("x"))];
        assert!(f.check_args(&args));
        assert_eq!(f.apply(&env, &args).unwrap(), Some(Value::bool(false)));
    }

    #[test]
    fn test_tokens_replace() {
        let f = TokensReplaceFunction::new();
        let args = [
            Some(tokens(&["in", "New", "York", "today"])),
            Some(compiled("New York")),
            Some(tokens(&["NYC"])),
        ];
        assert!(f.check_args(&args));
        let out = f.apply(&RuleEnv::new(), &args).unwrap().unwrap();
        assert_eq!(out.type_name(), Some("TOKENS"));
        assert_eq!(texts(&out), vec!["in", "NYC", "today"]);
    }

    #[test]
    fn test_string_match_requires_regex_type() {
        let f = StringMatchFunction::new();
        let env = RuleEnv::new();
        let args = [Some(Value::text("abc")), Some(Value::regex("a.c"))];
        assert!(f.check_args(&args));
        assert_eq!(f.apply(&env, &args).unwrap(), Some(Value::bool(true)));
        assert!(!f.check_args(&[Some(Value::text("abc")), Some(Value::text("a.c"))]));

        let partial = [Some(Value::text("abcd")), Some(Value::regex("a.c"))];
        assert_eq!(f.apply(&env, &partial).unwrap(), Some(Value::bool(false)));
    }

    #[test]
    fn test_string_replace() {
        let f = StringReplaceFunction::new();
        let env = RuleEnv::new();
        let args = [
            Some(Value::text("3-4")),
            Some(Value::regex(r"(\d)-(\d)")),
            Some(Value::text("$2..$1")),
        ];
        assert_eq!(f.apply(&env, &args).unwrap(), Some(Value::text("4..3")));

        let null = [Some(Value::null()), Some(Value::regex("x")), Some(Value::text("y"))];
        assert!(f.check_args(&null));
        assert_eq!(f.apply(&env, &null).unwrap(), Some(Value::bool(false)));
    }

    #[test]
    fn test_invalid_regex_is_function_error() {
        let f = StringMatchFunction::new();
        let err = f
            .apply(&RuleEnv::new(), &[Some(Value::text("a")), Some(Value::regex("("))])
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidPattern { .. }));
    }

    #[test]
    fn test_split_keeps_offsets() {
        let f = TokenStringSplitFunction::new();
        let token = AnnotationMap::token("über-cool")
            .with(keys::BEGIN.clone(), 10i64)
            .into_ref();
        let args = [Some(Value::record(token)), Some(Value::regex("-")), Some(Value::bool(true))];
        assert!(f.check_args(&args));
        let out = f.apply(&RuleEnv::new(), &args).unwrap().unwrap();
        assert_eq!(texts(&out), vec!["über", "-", "cool"]);

        let pieces = out.as_sequence().unwrap().to_vec();
        let Some(Payload::Record(last)) = pieces[2].payload() else {
            panic!("expected a record");
        };
        assert_eq!(last.get(&keys::BEGIN), Some(Value::integer(15)));
        assert_eq!(last.get(&keys::END), Some(Value::integer(19)));
    }

    #[test]
    fn test_split_without_delimiters() {
        let pieces = split_ranges(5, &[1..2, 2..3], false);
        assert_eq!(pieces, vec![0..1, 3..5]);
        let pieces = split_ranges(3, &[0..3], true);
        assert_eq!(pieces, vec![0..3]);
    }

    #[test]
    fn test_split_rejects_null_token() {
        let f = TokenStringSplitFunction::new();
        let args = [Some(Value::null()), Some(Value::regex("-")), Some(Value::bool(false))];
        let err = f.apply(&RuleEnv::new(), &args).unwrap_err();
        assert!(matches!(err, FunctionError::InvalidArgumentType { index: 0, .. }));
    }
}
