//! Call-site evaluation: name lookup, overload resolution and application

use std::borrow::Cow;
use std::sync::Arc;

use log::{debug, trace};

use super::env::{Env, RuleEnv};
use super::error::{EvaluationError, EvaluationResult};
use crate::config::EngineConfig;
use crate::model::{Arg, Payload, Value};
use crate::registry::function::{FunctionRef, FunctionRegistry};
use crate::registry::standard_registry;

/// Entry point used by rule evaluation to call named functions
#[derive(Debug, Clone)]
pub struct FunctionEngine {
    registry: Arc<FunctionRegistry>,
    config: EngineConfig,
}

impl Default for FunctionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionEngine {
    /// Engine over the shared standard registry
    pub fn new() -> Self {
        Self::with_registry(standard_registry())
    }

    /// Engine over a custom registry
    pub fn with_registry(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the registry
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fresh environment configured like this engine
    pub fn create_env(&self) -> RuleEnv {
        RuleEnv::with_config(&self.config)
    }

    /// Candidate functions for `name`.
    ///
    /// A binding in `env` shadows the registry entirely: if it holds a
    /// function that function is the only candidate, otherwise the name is
    /// not callable.
    pub fn lookup_function_object(
        &self,
        env: &dyn Env,
        name: &str,
    ) -> EvaluationResult<Cow<'_, [FunctionRef]>> {
        if let Some(local) = env.lookup(name) {
            return match local.into_payload() {
                Some(Payload::Function(function)) => Ok(Cow::Owned(vec![function])),
                _ => Err(EvaluationError::NotCallable {
                    name: name.to_string(),
                }),
            };
        }
        self.registry
            .candidates(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| EvaluationError::UnknownFunction {
                name: name.to_string(),
            })
    }

    /// First candidate for `name` accepting the arguments
    pub fn resolve(&self, env: &dyn Env, name: &str, args: &[Arg]) -> EvaluationResult<FunctionRef> {
        let candidates = self.lookup_function_object(env, name)?;
        let Some((index, function)) = candidates
            .iter()
            .enumerate()
            .find(|(_, f)| f.check_args(args))
        else {
            return Err(EvaluationError::no_matching_overload(name, args));
        };
        if self.config.log_resolution {
            debug!(
                "resolved {name} to {} (overload {} of {})",
                function.signature(),
                index + 1,
                candidates.len()
            );
        }
        Ok(Arc::clone(function))
    }

    /// Resolve `name` against the arguments and apply the selected function
    pub fn evaluate(&self, name: &str, env: &dyn Env, args: &[Arg]) -> EvaluationResult<Option<Value>> {
        let function = self.resolve(env, name, args)?;
        trace!("applying {}", function.name());
        Ok(function.apply(env, args)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::function::{FunctionResult, ValueFunction};
    use crate::registry::signature::FunctionSignature;

    struct Seven(FunctionSignature);

    impl ValueFunction for Seven {
        fn name(&self) -> &str {
            "SEVEN"
        }
        fn signature(&self) -> &FunctionSignature {
            &self.0
        }
        fn apply(&self, _env: &dyn Env, _args: &[Arg]) -> FunctionResult<Option<Value>> {
            Ok(Some(Value::integer(7)))
        }
    }

    #[test]
    fn test_local_binding_shadows_registry() {
        let engine = FunctionEngine::new();
        let mut env = engine.create_env();
        env.bind_function("Add", Arc::new(Seven(FunctionSignature::new("SEVEN", vec![]))));
        assert_eq!(engine.evaluate("Add", &env, &[]).unwrap(), Some(Value::integer(7)));
        // the built-in overloads are no longer candidates
        let args = [Some(Value::integer(1)), Some(Value::integer(2))];
        assert!(matches!(
            engine.evaluate("Add", &env, &args),
            Err(EvaluationError::NoMatchingOverload { .. })
        ));
    }

    #[test]
    fn test_non_function_binding_is_not_callable() {
        let engine = FunctionEngine::new();
        let mut env = engine.create_env();
        env.bind("Add", Value::integer(1));
        assert!(matches!(
            engine.evaluate("Add", &env, &[]),
            Err(EvaluationError::NotCallable { .. })
        ));
    }

    #[test]
    fn test_registry_candidates_are_borrowed() {
        let engine = FunctionEngine::new().with_config(EngineConfig::testing());
        let env = engine.create_env();
        let candidates = engine.lookup_function_object(&env, "Get").unwrap();
        assert!(matches!(candidates, Cow::Borrowed(_)));
        assert_eq!(candidates.len(), 6);
    }
}
