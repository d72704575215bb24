//! Arithmetic functions: Add, Subtract, Multiply, Divide, Mod, Negate
//!
//! Two whole-number operands compute in 64-bit integer arithmetic (wrapping
//! on overflow); any non-integral operand switches to double precision.

use crate::evaluator::Env;
use crate::model::types::TYPE_NUMBER;
use crate::model::{Arg, Numeric, Payload, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Arithmetic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// Sum of two numbers
    Add,
    /// Difference of two numbers
    Subtract,
    /// Product of two numbers
    Multiply,
    /// Quotient; integer division truncates toward zero
    Divide,
    /// Remainder, with the sign of the dividend
    Mod,
    /// Unary negation
    Negate,
}

impl ArithmeticOp {
    /// Name the operation is registered under
    pub fn registered_name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Mod => "Mod",
            Self::Negate => "Negate",
        }
    }

    fn function_name(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::Mod => "MOD",
            Self::Negate => "NEGATE",
        }
    }

    fn arity(self) -> usize {
        if self == Self::Negate { 1 } else { 2 }
    }

    fn integer(self, name: &str, a: i64, b: i64) -> FunctionResult<i64> {
        Ok(match self {
            Self::Add => a.wrapping_add(b),
            Self::Subtract => a.wrapping_sub(b),
            Self::Multiply => a.wrapping_mul(b),
            Self::Divide | Self::Mod if b == 0 => {
                return Err(FunctionError::evaluation(name, "integer division by zero"));
            }
            Self::Divide => a.wrapping_div(b),
            Self::Mod => a.wrapping_rem(b),
            Self::Negate => a.wrapping_neg(),
        })
    }

    fn float(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::Mod => a % b,
            Self::Negate => -a,
        }
    }
}

/// Fixed-arity numeric function
pub struct ArithmeticFunction {
    op: ArithmeticOp,
    signature: FunctionSignature,
}

impl ArithmeticFunction {
    /// Create the function for `op`
    pub fn new(op: ArithmeticOp) -> Self {
        let parameters = ["X", "Y"][..op.arity()]
            .iter()
            .map(|name| ParamInfo::required(*name, ValueKind::Number))
            .collect();
        Self {
            op,
            signature: FunctionSignature::new(op.function_name(), parameters).returns(TYPE_NUMBER),
        }
    }

    fn compute(&self, operands: &[Numeric]) -> FunctionResult<Numeric> {
        let name = self.name();
        match operands {
            [a] if a.is_integer() => Ok(Numeric::Integer(self.op.integer(name, a.as_i64(), 0)?)),
            [a] => Ok(Numeric::Float(self.op.float(a.as_f64(), 0.0))),
            [a, b] if a.is_integer() && b.is_integer() => Ok(Numeric::Integer(
                self.op.integer(name, a.as_i64(), b.as_i64())?,
            )),
            [a, b] => Ok(Numeric::Float(self.op.float(a.as_f64(), b.as_f64()))),
            _ => Err(FunctionError::InvalidArity {
                name: name.to_string(),
                min: self.op.arity(),
                max: Some(self.op.arity()),
                actual: operands.len(),
            }),
        }
    }
}

impl ValueFunction for ArithmeticFunction {
    fn name(&self) -> &str {
        self.op.function_name()
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.len() == self.op.arity()
            && args
                .iter()
                .all(|arg| super::payload_of(arg).and_then(Payload::as_numeric).is_some())
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let mut operands = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let n = super::payload_of(arg)
                .and_then(Payload::as_numeric)
                .ok_or_else(|| FunctionError::argument_type(self.name(), i, "Number", arg))?;
            operands.push(n);
        }
        let result = self.compute(&operands)?;
        Ok(Some(Value::typed(TYPE_NUMBER, result.into())))
    }

    fn documentation(&self) -> &str {
        match self.op {
            ArithmeticOp::Add => "Adds two numbers.",
            ArithmeticOp::Subtract => "Subtracts the second number from the first.",
            ArithmeticOp::Multiply => "Multiplies two numbers.",
            ArithmeticOp::Divide => {
                "Divides the first number by the second. Two whole numbers divide with truncation."
            }
            ArithmeticOp::Mod => "Remainder of dividing the first number by the second.",
            ArithmeticOp::Negate => "Negates a number.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RuleEnv;

    fn apply(op: ArithmeticOp, args: Vec<Value>) -> FunctionResult<Option<Value>> {
        let args: Vec<Arg> = args.into_iter().map(Some).collect();
        let f = ArithmeticFunction::new(op);
        assert!(f.check_args(&args));
        f.apply(&RuleEnv::new(), &args)
    }

    #[test]
    fn test_integer_and_float_paths() {
        let sum = apply(ArithmeticOp::Add, vec![Value::integer(2), Value::integer(3)]).unwrap();
        assert_eq!(sum.unwrap().payload(), Some(&Payload::Integer(5)));
        let sum = apply(ArithmeticOp::Add, vec![Value::integer(2), Value::float(3.0)]).unwrap();
        assert_eq!(sum.unwrap().payload(), Some(&Payload::Float(5.0)));
    }

    #[test]
    fn test_division_truncates() {
        let q = apply(ArithmeticOp::Divide, vec![Value::integer(-7), Value::integer(2)]).unwrap();
        assert_eq!(q.unwrap().payload(), Some(&Payload::Integer(-3)));
        let r = apply(ArithmeticOp::Mod, vec![Value::integer(-7), Value::integer(2)]).unwrap();
        assert_eq!(r.unwrap().payload(), Some(&Payload::Integer(-1)));
    }

    #[test]
    fn test_integer_division_by_zero_is_error() {
        let err = apply(ArithmeticOp::Divide, vec![Value::integer(1), Value::integer(0)]).unwrap_err();
        assert!(matches!(err, FunctionError::EvaluationError { .. }));
        let inf = apply(ArithmeticOp::Divide, vec![Value::float(1.0), Value::integer(0)]).unwrap();
        assert_eq!(inf.unwrap().payload(), Some(&Payload::Float(f64::INFINITY)));
    }

    #[test]
    fn test_negate() {
        let n = apply(ArithmeticOp::Negate, vec![Value::float(1.5)]).unwrap();
        assert_eq!(n.unwrap().payload(), Some(&Payload::Float(-1.5)));
    }

    #[test]
    fn test_rejects_non_numeric_and_wrong_arity() {
        let f = ArithmeticFunction::new(ArithmeticOp::Add);
        assert!(!f.check_args(&[Some(Value::integer(1)), Some(Value::text("2"))]));
        assert!(!f.check_args(&[Some(Value::integer(1)), Some(Value::null())]));
        assert!(!f.check_args(&[Some(Value::integer(1))]));
        assert!(!f.check_args(&[Some(Value::integer(1)), None]));
    }
}
