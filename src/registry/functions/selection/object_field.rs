//! Named-field access on objects implementing [`FieldAccess`](crate::model::FieldAccess)

use crate::evaluator::Env;
use crate::model::{Arg, FieldError, Payload, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::functions::{arg_at, is_null, is_text, payload_of, text_of};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Get or set a named field of an object
pub struct ObjectFieldFunction {
    signature: FunctionSignature,
}

impl Default for ObjectFieldFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectFieldFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::with_arity(
                "OBJECT_FIELD",
                vec![
                    ParamInfo::nullable("OBJECT", ValueKind::Object),
                    ParamInfo::required("FIELD", ValueKind::Text),
                    ParamInfo::any("VALUE"),
                ],
                2,
            ),
        }
    }
}

impl ValueFunction for ObjectFieldFunction {
    fn name(&self) -> &str {
        "OBJECT_FIELD"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && (is_null(&args[0]) || matches!(payload_of(&args[0]), Some(Payload::Object(_))))
            && is_text(&args[1])
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let operand = arg_at(args, 0);
        if is_null(operand) {
            return Ok(None);
        }
        let Some(Payload::Object(object)) = payload_of(operand) else {
            return Err(FunctionError::argument_type(self.name(), 0, "Object", operand));
        };
        let field = text_of(arg_at(args, 1))
            .ok_or_else(|| FunctionError::argument_type(self.name(), 1, "String", arg_at(args, 1)))?;
        let wrap = |source: FieldError| FunctionError::FieldAccess {
            field: field.to_string(),
            operand: object.to_string(),
            source,
        };

        if args.len() > 2 {
            object
                .write_field(field, args[2].as_ref())
                .map_err(wrap)?;
        }
        let value = object.read_field(field).map_err(wrap)?;
        Ok(Some(value.into_value()))
    }

    fn documentation(&self) -> &str {
        "Reads a named object field, first writing it when a third argument is given."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RuleEnv;
    use crate::model::{FieldAccess, FieldShape, FieldValue, ListElement, ObjectRef};

    #[derive(Debug, Default)]
    struct Entity {
        label: Option<Payload>,
        mentions: Vec<Value>,
    }

    impl FieldAccess for Entity {
        fn type_name(&self) -> &str {
            "Entity"
        }

        fn field_shape(&self, field: &str) -> Option<FieldShape> {
            match field {
                "label" => Some(FieldShape::Scalar),
                "mentions" => Some(FieldShape::List(ListElement::Value)),
                "id" => Some(FieldShape::Scalar),
                _ => None,
            }
        }

        fn read_field(&self, field: &str) -> Result<FieldValue, FieldError> {
            match field {
                "label" => Ok(self.label.clone().map_or(FieldValue::Null, FieldValue::Scalar)),
                "mentions" => Ok(FieldValue::List(self.mentions.clone())),
                "id" => Err(FieldError::Inaccessible("private".to_string())),
                _ => Err(FieldError::NoSuchField),
            }
        }

        fn write_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
            match (field, value) {
                ("label", FieldValue::Scalar(p)) => self.label = Some(p),
                ("label", FieldValue::Null) => self.label = None,
                ("mentions", FieldValue::List(values)) => self.mentions = values,
                ("mentions", FieldValue::Null) => self.mentions.clear(),
                (_, other) => {
                    return Err(FieldError::TypeMismatch {
                        expected: "writable field".to_string(),
                        actual: format!("{other:?}"),
                    });
                }
            }
            Ok(())
        }
    }

    fn entity() -> Value {
        Value::object(ObjectRef::new(Entity::default()))
    }

    #[test]
    fn test_write_then_read_scalar() {
        let f = ObjectFieldFunction::new();
        let env = RuleEnv::new();
        let e = entity();
        let out = f
            .apply(&env, &[Some(e.clone()), Some(Value::text("label")), Some(Value::text("PERSON"))])
            .unwrap();
        assert_eq!(out, Some(Value::text("PERSON")));
        let read = f.apply(&env, &[Some(e), Some(Value::text("label"))]).unwrap();
        assert_eq!(read, Some(Value::text("PERSON")));
    }

    #[test]
    fn test_scalar_written_into_list_field() {
        let f = ObjectFieldFunction::new();
        let out = f
            .apply(
                &RuleEnv::new(),
                &[Some(entity()), Some(Value::text("mentions")), Some(Value::text("Obama"))],
            )
            .unwrap();
        assert_eq!(out, Some(Value::list(vec![Value::text("Obama")])));
    }

    #[test]
    fn test_field_errors_are_wrapped() {
        let f = ObjectFieldFunction::new();
        let err = f
            .apply(&RuleEnv::new(), &[Some(entity()), Some(Value::text("age"))])
            .unwrap_err();
        assert!(matches!(
            err,
            FunctionError::FieldAccess { source: FieldError::NoSuchField, .. }
        ));
        let err = f
            .apply(&RuleEnv::new(), &[Some(entity()), Some(Value::text("id"))])
            .unwrap_err();
        assert!(matches!(
            err,
            FunctionError::FieldAccess { source: FieldError::Inaccessible(_), .. }
        ));
    }

    #[test]
    fn test_null_operand() {
        let f = ObjectFieldFunction::new();
        assert!(f.check_args(&[None, Some(Value::text("label"))]));
        assert_eq!(f.apply(&RuleEnv::new(), &[None, Some(Value::text("label"))]).unwrap(), None);
    }
}
