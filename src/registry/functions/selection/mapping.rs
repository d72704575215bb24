//! Mapping entry access and key listing

use crate::evaluator::Env;
use crate::model::types::TYPE_LIST;
use crate::model::{Arg, MapKey, Payload, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::functions::{arg_at, is_null, payload_of};
use crate::registry::signature::{FunctionSignature, ParamInfo};

fn map_key(arg: &Arg) -> Option<MapKey> {
    payload_of(arg).and_then(MapKey::from_payload)
}

/// Get, set or remove a mapping entry.
///
/// A read that misses on a text key retries with the annotation key the
/// environment resolves that text to, so maps keyed by annotation keys can
/// be addressed symbolically.
pub struct MapValueFunction {
    signature: FunctionSignature,
}

impl Default for MapValueFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl MapValueFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::with_arity(
                "MAP_VALUE",
                vec![
                    ParamInfo::nullable("MAP", ValueKind::Mapping),
                    ParamInfo::required("KEY", ValueKind::Any),
                    ParamInfo::any("VALUE"),
                ],
                2,
            ),
        }
    }
}

impl ValueFunction for MapValueFunction {
    fn name(&self) -> &str {
        "MAP_VALUE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && (is_null(&args[0]) || payload_of(&args[0]).is_some_and(|p| p.as_mapping().is_some()))
            && map_key(&args[1]).is_some()
    }

    fn apply(&self, env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let operand = arg_at(args, 0);
        if is_null(operand) {
            return Ok(None);
        }
        let mapping = payload_of(operand)
            .and_then(Payload::as_mapping)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "Map", operand))?;
        let key = map_key(arg_at(args, 1))
            .ok_or_else(|| FunctionError::argument_type(self.name(), 1, "map key", arg_at(args, 1)))?;

        if args.len() > 2 {
            match &args[2] {
                Some(value) if !value.is_null() => {
                    mapping.insert(key.clone(), value.clone());
                }
                _ => {
                    mapping.remove(&key);
                }
            }
        }

        // Only a plain read retries a text key as an annotation key
        let found = match (mapping.get(&key), &key) {
            (None, MapKey::Text(name)) if args.len() == 2 => env
                .resolve_annotation_key(name)
                .and_then(|k| mapping.get(&MapKey::Key(k))),
            (found, _) => found,
        };
        Ok(env.as_value(found))
    }

    fn documentation(&self) -> &str {
        "Reads a map entry. With a third argument the entry is first written, or removed when the value is null."
    }
}

/// List the keys of a mapping
pub struct MapKeysFunction {
    signature: FunctionSignature,
}

impl Default for MapKeysFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl MapKeysFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::new("MAP_KEYS", vec![ParamInfo::nullable("MAP", ValueKind::Mapping)])
                .returns(TYPE_LIST),
        }
    }
}

impl ValueFunction for MapKeysFunction {
    fn name(&self) -> &str {
        "MAP_KEYS"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(mapping) = payload_of(arg_at(args, 0)).and_then(Payload::as_mapping) else {
            return Ok(None);
        };
        let keys = mapping.keys().iter().map(MapKey::to_value).collect();
        Ok(Some(Value::list(keys)))
    }

    fn documentation(&self) -> &str {
        "Keys of a map, in insertion order."
    }
}
