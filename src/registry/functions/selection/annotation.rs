//! Annotation access on records and on sequences of records

use super::{RecordTarget, is_annotation_key, resolve_annotation_key};
use crate::evaluator::Env;
use crate::model::{AnnotationKey, Arg, RecordRef, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::functions::{arg_at, payload_of};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Get or set an annotation by key.
///
/// A sequence of records is handled element-wise and yields a list with one
/// entry per record (null where the record lacks the annotation).
pub struct AnnotationFunction {
    signature: FunctionSignature,
}

impl Default for AnnotationFunction {
    fn default() -> Self {
        Self::new()
    }
}

fn read(record: &RecordRef, key: &AnnotationKey) -> Option<Value> {
    record
        .get(key)
        .map(|v| Value::new(Some(key.name().to_string()), v.into_payload()))
}

impl AnnotationFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::with_arity(
                "ANNOTATION_VALUE",
                vec![
                    ParamInfo::required("RECORD", ValueKind::Any),
                    ParamInfo::required("KEY", ValueKind::Any),
                    ParamInfo::any("VALUE"),
                ],
                2,
            ),
        }
    }
}

impl ValueFunction for AnnotationFunction {
    fn name(&self) -> &str {
        "ANNOTATION_VALUE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && RecordTarget::accepts(&args[0])
            && is_annotation_key(&args[1])
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let operand = arg_at(args, 0);
        let target = payload_of(operand)
            .and_then(RecordTarget::of)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "Record or List of Records", operand))?;
        let key = resolve_annotation_key(self.name(), env, arg_at(args, 1))?;

        if args.len() > 2 {
            let value = args[2].clone().filter(|v| !v.is_null());
            for record in target.records() {
                record.set(key.clone(), value.clone());
            }
        }

        Ok(match &target {
            RecordTarget::Single(record) => read(record, &key),
            RecordTarget::Many(records) => Some(Value::list(
                records
                    .iter()
                    .map(|r| read(r, &key).unwrap_or_else(Value::null))
                    .collect(),
            )),
        })
    }

    fn documentation(&self) -> &str {
        "Reads the annotation stored under a key, first writing it when a third argument is given. Applies element-wise to lists of records."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RuleEnv;
    use crate::model::{AnnotationMap, keys};

    fn token(text: &str, pos: &str) -> RecordRef {
        AnnotationMap::token(text)
            .with(keys::POS.clone(), Value::text(pos))
            .into_ref()
    }

    #[test]
    fn test_read_with_symbolic_key() {
        let f = AnnotationFunction::new();
        let record = token("dogs", "NNS");
        let out = f
            .apply(&RuleEnv::new(), &[Some(Value::record(record)), Some(Value::text("tag"))])
            .unwrap()
            .unwrap();
        assert_eq!(out.as_text(), Some("NNS"));
        assert_eq!(out.type_name(), Some("pos"));
    }

    #[test]
    fn test_write_and_clear() {
        let f = AnnotationFunction::new();
        let env = RuleEnv::new();
        let record = token("dogs", "NNS");
        let operand = Some(Value::record(record.clone()));
        let key = Some(Value::key(keys::LEMMA.clone()));

        let out = f
            .apply(&env, &[operand.clone(), key.clone(), Some(Value::text("dog"))])
            .unwrap();
        assert_eq!(out, Some(Value::text("dog")));
        assert_eq!(record.get(&keys::LEMMA), Some(Value::text("dog")));

        let out = f.apply(&env, &[operand, key, Some(Value::null())]).unwrap();
        assert_eq!(out, None);
        assert_eq!(record.get(&keys::LEMMA), None);
    }

    #[test]
    fn test_broadcast_over_records() {
        let f = AnnotationFunction::new();
        let a = token("a", "DT");
        let b = AnnotationMap::token("b").into_ref();
        let list = Value::list(vec![Value::record(a), Value::record(b)]);
        let out = f
            .apply(&RuleEnv::new(), &[Some(list), Some(Value::text("pos"))])
            .unwrap();
        assert_eq!(out, Some(Value::list(vec![Value::text("DT"), Value::null()])));
    }

    #[test]
    fn test_unknown_key_is_error() {
        let f = AnnotationFunction::new();
        let args = [Some(Value::record(token("a", "DT"))), Some(Value::text("shoe_size"))];
        assert!(f.check_args(&args));
        let err = f.apply(&RuleEnv::new(), &args).unwrap_err();
        assert!(matches!(err, FunctionError::UnknownAnnotationKey { .. }));
    }

    #[test]
    fn test_rejects_null_operand() {
        let f = AnnotationFunction::new();
        assert!(!f.check_args(&[Some(Value::null()), Some(Value::text("pos"))]));
        assert!(!f.check_args(&[Some(Value::list(vec![Value::integer(1)])), Some(Value::text("pos"))]));
    }
}
