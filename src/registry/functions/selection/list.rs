//! Sequence element access by position

use crate::evaluator::Env;
use crate::model::{Arg, Payload, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::functions::{arg_at, is_null, payload_of};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Get or set a sequence element. Negative indices count from the end.
pub struct ListValueFunction {
    signature: FunctionSignature,
}

impl Default for ListValueFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl ListValueFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::with_arity(
                "LIST_VALUE",
                vec![
                    ParamInfo::nullable("LIST", ValueKind::Sequence),
                    ParamInfo::required("INDEX", ValueKind::Integer),
                    ParamInfo::any("VALUE"),
                ],
                2,
            ),
        }
    }
}

impl ValueFunction for ListValueFunction {
    fn name(&self) -> &str {
        "LIST_VALUE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && (is_null(&args[0]) || payload_of(&args[0]).is_some_and(|p| p.as_sequence().is_some()))
            && payload_of(&args[1]).and_then(Payload::as_integer).is_some()
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let operand = arg_at(args, 0);
        if is_null(operand) {
            return Ok(None);
        }
        let seq = payload_of(operand)
            .and_then(Payload::as_sequence)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "List", operand))?;
        let index = payload_of(arg_at(args, 1))
            .and_then(Payload::as_integer)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 1, "Integer", arg_at(args, 1)))?;
        let position = seq.resolve_index(index).ok_or_else(|| FunctionError::IndexOutOfBounds {
            name: self.name().to_string(),
            index,
            size: seq.len(),
        })?;

        if args.len() > 2 {
            seq.set(position, args[2].clone().unwrap_or_else(Value::null));
        }
        Ok(env.as_value(seq.get(position)))
    }

    fn documentation(&self) -> &str {
        "Reads a list element, first replacing it when a third argument is given. Negative indices count from the end."
    }
}
