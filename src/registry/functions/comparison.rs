//! Comparison functions: ordered comparators and structural equality

use std::cmp::Ordering;

use super::payload_of;
use crate::evaluator::Env;
use crate::model::types::TYPE_BOOLEAN;
use crate::model::{Arg, Numeric, Payload, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Comparison outcome tested by a comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareType {
    /// Greater than or equal
    Ge,
    /// Greater than
    Gt,
    /// Less than or equal
    Le,
    /// Less than
    Lt,
    /// Equal
    Eq,
    /// Not equal
    Ne,
}

impl CompareType {
    /// Name the comparator is registered under
    pub fn registered_name(self) -> &'static str {
        match self {
            Self::Ge => "GE",
            Self::Gt => "GT",
            Self::Le => "LE",
            Self::Lt => "LT",
            Self::Eq => "EQ",
            Self::Ne => "NE",
        }
    }

    /// Whether `ordering` satisfies the comparison
    pub fn test(self, ordering: Ordering) -> bool {
        match self {
            Self::Ge => ordering.is_ge(),
            Self::Gt => ordering.is_gt(),
            Self::Le => ordering.is_le(),
            Self::Lt => ordering.is_lt(),
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
        }
    }
}

/// Numbers compare as integers when both are whole, otherwise as doubles
fn compare_numeric(a: Numeric, b: Numeric) -> Ordering {
    match (a, b) {
        (Numeric::Integer(x), Numeric::Integer(y)) => x.cmp(&y),
        _ => a.as_f64().total_cmp(&b.as_f64()),
    }
}

#[derive(Debug, Clone, Copy)]
enum Operands {
    Numeric,
    Text,
}

impl Operands {
    fn kind(self) -> ValueKind {
        match self {
            Self::Numeric => ValueKind::Number,
            Self::Text => ValueKind::Text,
        }
    }

    fn compare(self, a: &Payload, b: &Payload) -> Option<Ordering> {
        match self {
            Self::Numeric => Some(compare_numeric(a.as_numeric()?, b.as_numeric()?)),
            Self::Text => Some(a.as_text()?.cmp(b.as_text()?)),
        }
    }
}

/// Two-operand comparator producing a boolean
pub struct CompareFunction {
    compare_type: CompareType,
    operands: Operands,
    signature: FunctionSignature,
}

impl CompareFunction {
    /// Comparator over two numbers
    pub fn numeric(compare_type: CompareType) -> Self {
        Self::new(compare_type, Operands::Numeric, compare_type.registered_name().to_string())
    }

    /// Lexicographic comparator over two strings
    pub fn text(compare_type: CompareType) -> Self {
        Self::new(
            compare_type,
            Operands::Text,
            format!("STRING_{}", compare_type.registered_name()),
        )
    }

    fn new(compare_type: CompareType, operands: Operands, name: String) -> Self {
        let parameters = vec![
            ParamInfo::required("X", operands.kind()),
            ParamInfo::required("Y", operands.kind()),
        ];
        Self {
            compare_type,
            operands,
            signature: FunctionSignature::new(name, parameters).returns(TYPE_BOOLEAN),
        }
    }
}

impl ValueFunction for CompareFunction {
    fn name(&self) -> &str {
        &self.signature.name
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        match args {
            [a, b] => match (payload_of(a), payload_of(b)) {
                (Some(a), Some(b)) => self.operands.compare(a, b).is_some(),
                _ => false,
            },
            _ => false,
        }
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let (a, b) = match args {
            [a, b] => (a, b),
            _ => {
                return Err(FunctionError::InvalidArity {
                    name: self.name().to_string(),
                    min: 2,
                    max: Some(2),
                    actual: args.len(),
                });
            }
        };
        let ordering = match (payload_of(a), payload_of(b)) {
            (Some(x), Some(y)) => self.operands.compare(x, y),
            _ => None,
        }
        .ok_or_else(|| {
            FunctionError::argument_type(self.name(), 0, self.operands.kind().to_string(), a)
        })?;
        Ok(Some(Value::bool(self.compare_type.test(ordering))))
    }

    fn documentation(&self) -> &str {
        match self.operands {
            Operands::Numeric => {
                "Compares two numbers, as integers when both are whole and as doubles otherwise."
            }
            Operands::Text => "Compares two strings lexicographically.",
        }
    }
}

/// Structural equality over any two arguments, never rejecting
pub struct EqualsFunction {
    negate: bool,
    signature: FunctionSignature,
}

impl EqualsFunction {
    /// Equals() function
    pub fn equals() -> Self {
        Self::new("EQUALS", false)
    }

    /// NotEquals() function
    pub fn not_equals() -> Self {
        Self::new("NOT_EQUALS", true)
    }

    fn new(name: &str, negate: bool) -> Self {
        Self {
            negate,
            signature: FunctionSignature::new(name, vec![ParamInfo::any("X"), ParamInfo::any("Y")])
                .returns(TYPE_BOOLEAN),
        }
    }
}

/// Presence equality for absent arguments and null payloads, payload equality otherwise
pub fn values_equal(a: &Arg, b: &Arg) -> bool {
    match (a, b) {
        (None, None) => true,
        (None, _) | (_, None) => false,
        (Some(x), Some(y)) => match (x.payload(), y.payload()) {
            (Some(p), Some(q)) => p == q,
            (p, q) => p.is_none() && q.is_none(),
        },
    }
}

impl ValueFunction for EqualsFunction {
    fn name(&self) -> &str {
        &self.signature.name
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let [a, b] = args else {
            return Err(FunctionError::InvalidArity {
                name: self.name().to_string(),
                min: 2,
                max: Some(2),
                actual: args.len(),
            });
        };
        Ok(Some(Value::bool(values_equal(a, b) != self.negate)))
    }

    fn documentation(&self) -> &str {
        if self.negate {
            "True unless both arguments are equal. Absent and null operands compare by presence."
        } else {
            "True if both arguments are equal. Absent and null operands compare by presence."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RuleEnv;
    use crate::model::Sequence;

    fn apply(f: &dyn ValueFunction, a: Arg, b: Arg) -> Option<bool> {
        let args = [a, b];
        assert!(f.check_args(&args));
        f.apply(&RuleEnv::new(), &args).unwrap().and_then(|v| v.as_bool())
    }

    #[test]
    fn test_numeric_comparison_mixes_integer_and_float() {
        let gt = CompareFunction::numeric(CompareType::Gt);
        assert_eq!(apply(&gt, Some(Value::integer(3)), Some(Value::float(2.5))), Some(true));
        let eq = CompareFunction::numeric(CompareType::Eq);
        assert_eq!(apply(&eq, Some(Value::integer(2)), Some(Value::float(2.0))), Some(true));
        let le = CompareFunction::numeric(CompareType::Le);
        assert_eq!(apply(&le, Some(Value::integer(i64::MAX)), Some(Value::integer(i64::MAX - 1))), Some(false));
    }

    #[test]
    fn test_numeric_comparison_rejects_null_and_text() {
        let gt = CompareFunction::numeric(CompareType::Gt);
        assert!(!gt.check_args(&[Some(Value::null()), Some(Value::integer(1))]));
        assert!(!gt.check_args(&[Some(Value::text("a")), Some(Value::integer(1))]));
        assert!(!gt.check_args(&[Some(Value::integer(1))]));
    }

    #[test]
    fn test_text_comparison() {
        let lt = CompareFunction::text(CompareType::Lt);
        assert_eq!(lt.name(), "STRING_LT");
        assert_eq!(apply(&lt, Some(Value::text("apple")), Some(Value::text("banana"))), Some(true));
        assert!(!lt.check_args(&[Some(Value::integer(1)), Some(Value::integer(2))]));
    }

    #[test]
    fn test_equals_presence_rules() {
        let eq = EqualsFunction::equals();
        assert_eq!(apply(&eq, None, None), Some(true));
        assert_eq!(apply(&eq, None, Some(Value::null())), Some(false));
        assert_eq!(apply(&eq, Some(Value::null()), Some(Value::null())), Some(true));
        assert_eq!(apply(&eq, Some(Value::null()), Some(Value::integer(1))), Some(false));
        assert_eq!(apply(&eq, Some(Value::text("a")), Some(Value::text("a"))), Some(true));
        assert_eq!(apply(&eq, Some(Value::integer(1)), Some(Value::float(1.0))), Some(false));
    }

    #[test]
    fn test_equals_ignores_type_names() {
        let eq = EqualsFunction::equals();
        let typed = Value::typed("NUMBER", Payload::Integer(4));
        assert_eq!(apply(&eq, Some(typed), Some(Value::integer(4))), Some(true));
    }

    #[test]
    fn test_sequences_compare_structurally() {
        let eq = EqualsFunction::equals();
        let a = Value::from_payload(Payload::Sequence(Sequence::from_vec(vec![Value::integer(1)])));
        let b = Value::from_payload(Payload::Sequence(Sequence::from_vec(vec![Value::integer(1)])));
        assert_eq!(apply(&eq, Some(a), Some(b)), Some(true));
    }

    #[test]
    fn test_not_equals_negates() {
        let ne = EqualsFunction::not_equals();
        assert_eq!(apply(&ne, None, None), Some(false));
        assert_eq!(apply(&ne, Some(Value::integer(1)), Some(Value::integer(2))), Some(true));
    }
}
