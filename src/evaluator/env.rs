//! Evaluation environment: variables, pattern compilation and key lookup

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::EngineConfig;
use crate::model::{AnnotationKey, Value, keys};
use crate::pattern::{CacheStats, PatternCache, StringPattern};
use crate::registry::function::{FunctionError, FunctionRef, FunctionResult};

/// Resolution context handed to every function call
pub trait Env: Send + Sync {
    /// Variable or locally bound function
    fn lookup(&self, name: &str) -> Option<Value>;

    /// Compile a string regular expression
    fn resolve_string_pattern(&self, regex: &str) -> FunctionResult<Arc<StringPattern>>;

    /// Key identifier for a symbolic annotation-key name
    fn resolve_annotation_key(&self, name: &str) -> Option<AnnotationKey>;

    /// Convert a stored element into the value handed back to rules
    fn as_value(&self, value: Option<Value>) -> Option<Value> {
        value
    }
}

/// Stock environment with variable bindings, a key table and a pattern cache
#[derive(Debug)]
pub struct RuleEnv {
    variables: FxHashMap<String, Value>,
    annotation_keys: FxHashMap<String, AnnotationKey>,
    patterns: PatternCache,
}

impl Default for RuleEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEnv {
    /// Environment with the default configuration
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Environment configured by `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut env = Self {
            variables: FxHashMap::default(),
            annotation_keys: FxHashMap::default(),
            patterns: PatternCache::new(config.pattern_cache_size),
        };
        if config.register_default_keys {
            for (name, key) in keys::standard() {
                env.register_annotation_key(name, key);
            }
        }
        env
    }

    /// Bind a variable, shadowing any previous binding
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Bind a function locally; it shadows a built-in of the same name
    pub fn bind_function(&mut self, name: impl Into<String>, function: FunctionRef) -> &mut Self {
        self.bind(name, Value::function(function))
    }

    /// Remove a binding
    pub fn unbind(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    /// Map a symbolic name to an annotation key
    pub fn register_annotation_key(&mut self, name: impl Into<String>, key: AnnotationKey) -> &mut Self {
        self.annotation_keys.insert(name.into(), key);
        self
    }

    /// Compiled-pattern cache statistics
    pub fn pattern_cache_stats(&self) -> CacheStats {
        self.patterns.stats()
    }
}

impl Env for RuleEnv {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    fn resolve_string_pattern(&self, regex: &str) -> FunctionResult<Arc<StringPattern>> {
        self.patterns
            .get_or_compile(regex)
            .map_err(|e| FunctionError::InvalidPattern {
                pattern: regex.to_string(),
                message: e.to_string(),
            })
    }

    fn resolve_annotation_key(&self, name: &str) -> Option<AnnotationKey> {
        self.annotation_keys.get(name).cloned()
    }
}
