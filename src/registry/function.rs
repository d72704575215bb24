//! Value functions and the overload registry

use std::fmt;
use std::sync::Arc;

use log::trace;
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

use crate::evaluator::Env;
use crate::evaluator::error::{EvaluationError, EvaluationResult, describe_args};
use crate::model::object::FieldError;
use crate::model::{Arg, Value};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Function evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// Invalid number of arguments
    #[error("Function '{name}' expects {min}-{} arguments, got {actual}", max.map_or("∞".to_string(), |n| n.to_string()))]
    InvalidArity {
        /// Function name
        name: String,
        /// Minimum arguments
        min: usize,
        /// Maximum arguments (None for unlimited)
        max: Option<usize>,
        /// Actual arguments provided
        actual: usize,
    },

    /// Invalid argument type
    #[error("Function '{name}' argument {index} expects {expected}, got {actual}")]
    InvalidArgumentType {
        /// Function name
        name: String,
        /// Argument index
        index: usize,
        /// Expected type
        expected: String,
        /// Actual type
        actual: String,
    },

    /// A string annotation key did not resolve to a key identifier
    #[error("Function '{name}' cannot resolve annotation key '{key}'")]
    UnknownAnnotationKey {
        /// Function name
        name: String,
        /// Unresolved key name
        key: String,
    },

    /// Named-field access on an object failed
    #[error("Cannot access field '{field}' of {operand}: {source}")]
    FieldAccess {
        /// Field name
        field: String,
        /// Rendered operand
        operand: String,
        /// Underlying failure
        source: FieldError,
    },

    /// Sequence index outside the sequence
    #[error("Function '{name}' index {index} out of bounds for sequence of size {size}")]
    IndexOutOfBounds {
        /// Function name
        name: String,
        /// Requested index
        index: i64,
        /// Sequence size
        size: usize,
    },

    /// A string pattern failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern text
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// A format template could not be applied
    #[error("Function '{name}' format error: {message}")]
    Format {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },

    /// Runtime evaluation error
    #[error("Function '{name}' evaluation error: {message}")]
    EvaluationError {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },
}

impl FunctionError {
    /// Shorthand for a runtime evaluation error
    pub fn evaluation(name: &str, message: impl Into<String>) -> Self {
        Self::EvaluationError {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for an argument type error
    pub fn argument_type(name: &str, index: usize, expected: impl Into<String>, arg: &Arg) -> Self {
        let actual = match arg {
            None => "absent".to_string(),
            Some(v) => v
                .payload()
                .map_or_else(|| "null".to_string(), |p| p.kind().to_string()),
        };
        Self::InvalidArgumentType {
            name: name.to_string(),
            index,
            expected: expected.into(),
            actual,
        }
    }
}

/// A named, argument-checked operation from values to a value.
///
/// `check_args` must be cheap and side-effect free: the resolver calls it on
/// every candidate in registration order and applies the first that accepts.
/// `apply` may assume its own `check_args` accepted the arguments. A `None`
/// result is an absent value.
pub trait ValueFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Get the function signature
    fn signature(&self) -> &FunctionSignature;

    /// Whether this function accepts the arguments
    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature().check_args(args)
    }

    /// Apply the function
    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>>;

    /// Get function documentation
    fn documentation(&self) -> &str {
        ""
    }
}

/// Shared handle to a value function
pub type FunctionRef = Arc<dyn ValueFunction>;

/// Apply `function` after confirming it accepts the arguments.
///
/// Used wherever a function value is invoked from inside another function,
/// so a rejected call surfaces as an error instead of an unchecked apply.
pub fn call_checked(
    function: &dyn ValueFunction,
    env: &dyn Env,
    args: &[Arg],
) -> FunctionResult<Option<Value>> {
    if !function.check_args(args) {
        return Err(FunctionError::evaluation(
            function.name(),
            format!("arguments rejected: {}", describe_args(args)),
        ));
    }
    trace!("applying {}", function.name());
    function.apply(env, args)
}

/// Every overload registered under one name, usable as a single function value.
///
/// Dispatches to the first candidate that accepts the arguments.
pub struct OverloadSet {
    name: String,
    candidates: Vec<FunctionRef>,
    signature: FunctionSignature,
}

impl OverloadSet {
    /// Create an overload set
    pub fn new(name: impl Into<String>, candidates: Vec<FunctionRef>) -> Self {
        let name = name.into();
        let signature = FunctionSignature::variadic(name.clone(), vec![], ParamInfo::any("ARG"));
        Self {
            name,
            candidates,
            signature,
        }
    }

    /// Candidates in registration order
    pub fn candidates(&self) -> &[FunctionRef] {
        &self.candidates
    }

    /// First candidate accepting the arguments
    pub fn select(&self, args: &[Arg]) -> Option<&FunctionRef> {
        self.candidates.iter().find(|f| f.check_args(args))
    }
}

impl ValueFunction for OverloadSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.select(args).is_some()
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        match self.select(args) {
            Some(function) => function.apply(env, args),
            None => Err(FunctionError::evaluation(
                &self.name,
                format!("no overload accepts {}", describe_args(args)),
            )),
        }
    }

    fn documentation(&self) -> &str {
        "Dispatches to the first registered overload accepting the arguments."
    }
}

/// Documentation entry for one registered overload
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDoc {
    /// Registration name
    pub name: String,
    /// Position among the overloads of this name
    pub overload: usize,
    /// Rendered signature
    pub signature: String,
    /// Parameter descriptors
    pub parameters: Vec<ParamInfo>,
    /// Documentation text
    pub documentation: String,
}

/// Registry of value functions: name to an ordered list of overloads.
///
/// Registering under an existing name appends a new overload; it never
/// replaces one. The registry is meant to be filled once and then shared
/// read-only.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Vec<FunctionRef>>,
    order: Vec<String>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in function
    pub fn standard() -> Self {
        let mut registry = Self::new();
        super::register_standard_functions(&mut registry);
        registry
    }

    /// Append an overload under `name`
    pub fn register<F: ValueFunction + 'static>(&mut self, name: impl Into<String>, function: F) {
        self.register_ref(name, Arc::new(function));
    }

    /// Append an already shared overload under `name`
    pub fn register_ref(&mut self, name: impl Into<String>, function: FunctionRef) {
        let name = name.into();
        match self.functions.get_mut(&name) {
            Some(overloads) => overloads.push(function),
            None => {
                self.order.push(name.clone());
                self.functions.insert(name, vec![function]);
            }
        }
    }

    /// Overloads registered under `name`, in registration order
    pub fn candidates(&self, name: &str) -> Option<&[FunctionRef]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// Check if any overload is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// First overload under `name` accepting the arguments
    pub fn resolve(&self, name: &str, args: &[Arg]) -> EvaluationResult<FunctionRef> {
        let candidates = self
            .candidates(name)
            .ok_or_else(|| EvaluationError::UnknownFunction {
                name: name.to_string(),
            })?;
        candidates
            .iter()
            .find(|f| f.check_args(args))
            .cloned()
            .ok_or_else(|| EvaluationError::no_matching_overload(name, args))
    }

    /// All overloads under `name` as one function value
    pub fn function_value(&self, name: &str) -> Option<Value> {
        let candidates = self.candidates(name)?.to_vec();
        let set: FunctionRef = Arc::new(OverloadSet::new(name, candidates));
        Some(Value::function(set))
    }

    /// Registered names, in order of first registration
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of overloads across all names
    pub fn overload_count(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    /// Documentation for every overload, grouped by name in registration order
    pub fn documentation(&self) -> Vec<FunctionDoc> {
        let mut docs = Vec::with_capacity(self.overload_count());
        for name in &self.order {
            let Some(overloads) = self.functions.get(name) else {
                continue;
            };
            for (i, function) in overloads.iter().enumerate() {
                let signature = function.signature();
                docs.push(FunctionDoc {
                    name: name.clone(),
                    overload: i,
                    signature: signature.to_string(),
                    parameters: signature.parameters.clone(),
                    documentation: function.documentation().to_string(),
                });
            }
        }
        docs
    }

    /// Documentation for every overload as pretty-printed JSON
    pub fn generate_docs_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.documentation())
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("names", &self.order)
            .field("overloads", &self.overload_count())
            .finish()
    }
}
