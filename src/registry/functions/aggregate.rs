//! Higher-order functions: Aggregate, Map and MapValues

use super::{arg_at, payload_of};
use crate::evaluator::Env;
use crate::model::types::{TYPE_FUNCTION, TYPE_LIST};
use crate::model::{Arg, Payload, Sequence, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction, call_checked};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Aggregate(f, init, x1, ..., xn) - left fold of a function value
pub struct AggregateFunction {
    signature: FunctionSignature,
}

impl Default for AggregateFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::variadic(
                "AGGREGATE",
                vec![
                    ParamInfo::required("FUNCTION", ValueKind::Function),
                    ParamInfo::required("INIT", ValueKind::Any),
                ],
                ParamInfo::any("VALUE"),
            ),
        }
    }
}

impl ValueFunction for AggregateFunction {
    fn name(&self) -> &str {
        "AGGREGATE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.len() >= 2
            && payload_of(&args[0]).is_some_and(|p| p.as_function().is_some())
            && args[1].is_some()
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let function = payload_of(arg_at(args, 0))
            .and_then(Payload::as_function)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "ValueFunction", arg_at(args, 0)))?;
        let mut acc = arg_at(args, 1).clone();
        for x in args.iter().skip(2) {
            acc = call_checked(function.as_ref(), env, &[acc, x.clone()])?;
        }
        Ok(acc)
    }

    fn documentation(&self) -> &str {
        "Folds the remaining arguments into the initial value with a two-argument function, left to right."
    }
}

/// MapValues(list, f) - apply a function value to every element of a list
pub struct MapValuesFunction {
    signature: FunctionSignature,
}

impl Default for MapValuesFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl MapValuesFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "MAP_VALUES",
                vec![
                    ParamInfo::nullable("LIST", ValueKind::Sequence),
                    ParamInfo::typed("FUNCTION", TYPE_FUNCTION, Some(ValueKind::Function)),
                ],
            )
            .returns(TYPE_LIST),
        }
    }
}

impl ValueFunction for MapValuesFunction {
    fn name(&self) -> &str {
        "MAP_VALUES"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(list) = payload_of(arg_at(args, 0)).and_then(Payload::as_sequence) else {
            return Ok(None);
        };
        let function = payload_of(arg_at(args, 1))
            .and_then(Payload::as_function)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 1, "ValueFunction", arg_at(args, 1)))?;
        let mut results = Vec::with_capacity(list.len());
        for element in list.to_vec() {
            let mapped = call_checked(function.as_ref(), env, &[Some(element)])?;
            results.push(mapped.unwrap_or_else(Value::null));
        }
        Ok(Some(Value::list(results)))
    }

    fn documentation(&self) -> &str {
        "Applies a one-argument function value to every list element."
    }
}

/// Map(list, transform) - apply a plain transform to every element of a list
pub struct MapFunction {
    signature: FunctionSignature,
}

impl Default for MapFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl MapFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "MAP",
                vec![
                    ParamInfo::nullable("LIST", ValueKind::Sequence),
                    ParamInfo::typed("FUNCTION", TYPE_FUNCTION, Some(ValueKind::Transform)),
                ],
            ),
        }
    }
}

impl ValueFunction for MapFunction {
    fn name(&self) -> &str {
        "MAP"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(list) = payload_of(arg_at(args, 0)).and_then(Payload::as_sequence) else {
            return Ok(None);
        };
        let Some(Payload::Transform(transform)) = payload_of(arg_at(args, 1)) else {
            return Err(FunctionError::argument_type(self.name(), 1, "Function", arg_at(args, 1)));
        };
        let mapped: Sequence = list.to_vec().iter().map(|v| transform.call(v)).collect();
        Ok(Some(Value::from_payload(Payload::Sequence(mapped))))
    }

    fn documentation(&self) -> &str {
        "Applies a plain transform to every list element."
    }
}
