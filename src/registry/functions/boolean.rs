//! Boolean functions: And, Or (variadic) and Not

use crate::evaluator::Env;
use crate::model::types::TYPE_BOOLEAN;
use crate::model::{Arg, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Boolean operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// True iff no argument is false
    And,
    /// True iff some argument is true
    Or,
    /// Negation of a single argument
    Not,
}

impl BooleanOp {
    /// Name the operation is registered under
    pub fn registered_name(self) -> &'static str {
        match self {
            Self::And => "And",
            Self::Or => "Or",
            Self::Not => "Not",
        }
    }

    fn function_name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

/// Boolean function over boolean arguments
pub struct BooleanFunction {
    op: BooleanOp,
    signature: FunctionSignature,
}

impl BooleanFunction {
    /// Create the function for `op`
    pub fn new(op: BooleanOp) -> Self {
        let param = ParamInfo::required("B", ValueKind::Bool);
        let signature = match op {
            BooleanOp::Not => FunctionSignature::new(op.function_name(), vec![param]),
            _ => FunctionSignature::variadic(op.function_name(), vec![], param),
        };
        Self {
            op,
            signature: signature.returns(TYPE_BOOLEAN),
        }
    }
}

impl ValueFunction for BooleanFunction {
    fn name(&self) -> &str {
        self.op.function_name()
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && args
                .iter()
                .all(|arg| arg.as_ref().and_then(Value::as_bool).is_some())
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let mut bools = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let b = arg
                .as_ref()
                .and_then(Value::as_bool)
                .ok_or_else(|| FunctionError::argument_type(self.name(), i, "Boolean", arg))?;
            bools.push(b);
        }
        let result = match self.op {
            BooleanOp::And => bools.iter().all(|b| *b),
            BooleanOp::Or => bools.iter().any(|b| *b),
            BooleanOp::Not => match bools.as_slice() {
                [b] => !b,
                _ => {
                    return Err(FunctionError::InvalidArity {
                        name: self.name().to_string(),
                        min: 1,
                        max: Some(1),
                        actual: bools.len(),
                    });
                }
            },
        };
        Ok(Some(Value::bool(result)))
    }

    fn documentation(&self) -> &str {
        match self.op {
            BooleanOp::And => "True unless some argument is false; true for no arguments.",
            BooleanOp::Or => "True if some argument is true; false for no arguments.",
            BooleanOp::Not => "Negates a boolean.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RuleEnv;

    fn apply(op: BooleanOp, bools: &[bool]) -> Option<bool> {
        let args: Vec<Arg> = bools.iter().map(|b| Some(Value::bool(*b))).collect();
        let f = BooleanFunction::new(op);
        assert!(f.check_args(&args));
        f.apply(&RuleEnv::new(), &args).unwrap().and_then(|v| v.as_bool())
    }

    #[test]
    fn test_vacuous_cases() {
        assert_eq!(apply(BooleanOp::And, &[]), Some(true));
        assert_eq!(apply(BooleanOp::Or, &[]), Some(false));
    }

    #[test]
    fn test_and_or_not() {
        assert_eq!(apply(BooleanOp::And, &[true, false]), Some(false));
        assert_eq!(apply(BooleanOp::And, &[true, true, true]), Some(true));
        assert_eq!(apply(BooleanOp::Or, &[false, true]), Some(true));
        assert_eq!(apply(BooleanOp::Not, &[true]), Some(false));
    }

    #[test]
    fn test_not_is_unary() {
        let f = BooleanFunction::new(BooleanOp::Not);
        assert!(!f.check_args(&[]));
        assert!(!f.check_args(&[Some(Value::bool(true)), Some(Value::bool(true))]));
    }

    #[test]
    fn test_rejects_non_boolean() {
        let f = BooleanFunction::new(BooleanOp::And);
        assert!(!f.check_args(&[Some(Value::integer(1))]));
        assert!(!f.check_args(&[None]));
    }
}
