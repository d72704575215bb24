//! Typed values and overloaded value functions for annotation rewrite rules
//!
//! Rules compute with [`Value`]s: a payload plus an advisory type name and
//! optional tags. Function names resolve first against the rule environment
//! ([`Env`]) and then against a registry of built-in overloads; the first
//! overload whose argument check accepts is applied.
//!
//! ```
//! use annotrule::{RuleEnv, Value, evaluate};
//!
//! let env = RuleEnv::new();
//! let sum = evaluate("Add", &env, &[Some(Value::integer(2)), Some(Value::integer(3))]).unwrap();
//! assert_eq!(sum, Some(Value::integer(5)));
//! ```

pub mod config;
pub mod evaluator;
pub mod model;
pub mod pattern;
pub mod registry;

pub use config::{ConfigError, EngineConfig};
pub use evaluator::{Env, EvaluationError, EvaluationResult, FunctionEngine, RuleEnv};
pub use model::{
    Annotated, AnnotationKey, AnnotationMap, Arg, CompositeValue, MapKey, Mapping, Payload,
    RecordRef, Sequence, Tags, Value, ValueKind,
};
pub use registry::{
    FunctionError, FunctionRef, FunctionRegistry, FunctionSignature, ParamInfo, RegistryBuilder,
    ValueFunction, standard_registry,
};

/// Evaluate `name` with the built-in functions and the bindings of `env`
pub fn evaluate(name: &str, env: &dyn Env, args: &[Arg]) -> EvaluationResult<Option<Value>> {
    FunctionEngine::new().evaluate(name, env, args)
}
