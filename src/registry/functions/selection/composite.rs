//! Composite attribute access and attribute listing

use crate::evaluator::Env;
use crate::model::types::TYPE_LIST;
use crate::model::{Arg, Payload, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::functions::{arg_at, is_null, is_text, payload_of, text_of};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Get or set a named attribute of a composite value
pub struct CompositeValueFunction {
    signature: FunctionSignature,
}

impl Default for CompositeValueFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeValueFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::with_arity(
                "COMPOSITE_VALUE",
                vec![
                    ParamInfo::nullable("COMPOSITE", ValueKind::Composite),
                    ParamInfo::required("ATTRIBUTE", ValueKind::Text),
                    ParamInfo::any("VALUE"),
                ],
                2,
            ),
        }
    }
}

impl ValueFunction for CompositeValueFunction {
    fn name(&self) -> &str {
        "COMPOSITE_VALUE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && (is_null(&args[0]) || payload_of(&args[0]).is_some_and(|p| p.as_composite().is_some()))
            && is_text(&args[1])
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let operand = arg_at(args, 0);
        if is_null(operand) {
            return Ok(None);
        }
        let composite = payload_of(operand)
            .and_then(Payload::as_composite)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "Composite", operand))?;
        let attribute = text_of(arg_at(args, 1))
            .ok_or_else(|| FunctionError::argument_type(self.name(), 1, "String", arg_at(args, 1)))?;
        if args.len() > 2 {
            composite.set(attribute, args[2].clone());
        }
        Ok(composite.get(attribute))
    }

    fn documentation(&self) -> &str {
        "Reads a composite attribute, first assigning it when a third argument is given."
    }
}

/// List the attribute names of a composite value
pub struct CompositeKeysFunction {
    signature: FunctionSignature,
}

impl Default for CompositeKeysFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeKeysFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new(
                "COMPOSITE_KEYS",
                vec![ParamInfo::nullable("COMPOSITE", ValueKind::Composite)],
            )
            .returns(TYPE_LIST),
        }
    }
}

impl ValueFunction for CompositeKeysFunction {
    fn name(&self) -> &str {
        "COMPOSITE_KEYS"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(composite) = payload_of(arg_at(args, 0)).and_then(Payload::as_composite) else {
            return Ok(None);
        };
        let names = composite.attribute_names().into_iter().map(Value::text).collect();
        Ok(Some(Value::list(names)))
    }

    fn documentation(&self) -> &str {
        "Attribute names of a composite value, in definition order."
    }
}
