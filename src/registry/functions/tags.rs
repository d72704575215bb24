//! Tag functions
//!
//! Value tags live on a `Value` and are shared by every clone of it. Record
//! tags live in the record's tags slot and apply element-wise to sequences of
//! records. A tags container can also be addressed directly.

use super::selection::RecordTarget;
use super::{arg_at, is_null, is_text, payload_of, text_of};
use crate::evaluator::Env;
use crate::model::{Arg, Payload, RecordRef, Value, ValueKind};
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::signature::{FunctionSignature, ParamInfo};

fn tag_name<'a>(name: &str, args: &'a [Arg]) -> FunctionResult<&'a str> {
    text_of(arg_at(args, 1)).ok_or_else(|| FunctionError::argument_type(name, 1, "String", arg_at(args, 1)))
}

fn present<'a>(name: &str, args: &'a [Arg]) -> FunctionResult<&'a Value> {
    arg_at(args, 0)
        .as_ref()
        .ok_or_else(|| FunctionError::argument_type(name, 0, "Value", &None))
}

fn records(name: &str, args: &[Arg]) -> FunctionResult<RecordTarget> {
    let operand = arg_at(args, 0);
    payload_of(operand)
        .and_then(RecordTarget::of)
        .ok_or_else(|| FunctionError::argument_type(name, 0, "Record or List of Records", operand))
}

fn value_tag_signature(name: &str, with_value: bool) -> FunctionSignature {
    let mut parameters = vec![
        ParamInfo::required("VALUE", ValueKind::Any),
        ParamInfo::required("TAG", ValueKind::Text),
    ];
    if with_value {
        parameters.push(ParamInfo::any("TAG_VALUE"));
        FunctionSignature::with_arity(name, parameters, 2)
    } else {
        FunctionSignature::new(name, parameters)
    }
}

/// VTag() - attach a tag to a value, returning the value
pub struct SetValueTagFunction {
    signature: FunctionSignature,
}

impl Default for SetValueTagFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl SetValueTagFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: value_tag_signature("VALUE_TAG", true),
        }
    }
}

impl ValueFunction for SetValueTagFunction {
    fn name(&self) -> &str {
        "VALUE_TAG"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let value = present(self.name(), args)?;
        let tag = tag_name(self.name(), args)?;
        value.tags_or_init().add_tag(tag, args.get(2).cloned().flatten());
        Ok(Some(value.clone()))
    }

    fn documentation(&self) -> &str {
        "Attaches a tag (with an optional tag value) to a value and returns the value."
    }
}

/// GetVTag() - read a value tag
pub struct GetValueTagFunction {
    signature: FunctionSignature,
}

impl Default for GetValueTagFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl GetValueTagFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: value_tag_signature("GET_VALUE_TAG", false),
        }
    }
}

impl ValueFunction for GetValueTagFunction {
    fn name(&self) -> &str {
        "GET_VALUE_TAG"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let value = present(self.name(), args)?;
        let tag = tag_name(self.name(), args)?;
        Ok(value.tags().and_then(|tags| tags.get_tag(tag)))
    }

    fn documentation(&self) -> &str {
        "Value of a tag attached to a value; null if the tag is missing."
    }
}

/// RemoveVTag() - remove a value tag, returning the value
pub struct RemoveValueTagFunction {
    signature: FunctionSignature,
}

impl Default for RemoveValueTagFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoveValueTagFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: value_tag_signature("REMOVE_VALUE_TAG", false),
        }
    }
}

impl ValueFunction for RemoveValueTagFunction {
    fn name(&self) -> &str {
        "REMOVE_VALUE_TAG"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let value = present(self.name(), args)?;
        let tag = tag_name(self.name(), args)?;
        value.tags_or_init().remove_tag(tag);
        Ok(Some(value.clone()))
    }

    fn documentation(&self) -> &str {
        "Removes a tag from a value and returns the value."
    }
}

fn record_tag_signature(name: &str, with_value: bool) -> FunctionSignature {
    let mut parameters = vec![
        ParamInfo::required("RECORD", ValueKind::Any),
        ParamInfo::required("TAG", ValueKind::Text),
    ];
    if with_value {
        parameters.push(ParamInfo::any("TAG_VALUE"));
        FunctionSignature::with_arity(name, parameters, 2)
    } else {
        FunctionSignature::new(name, parameters)
    }
}

/// Tag() - attach a tag to a record or to every record of a list
pub struct SetAnnotationTagFunction {
    signature: FunctionSignature,
}

impl Default for SetAnnotationTagFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl SetAnnotationTagFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: record_tag_signature("ANNOTATION_TAG", true),
        }
    }
}

impl ValueFunction for SetAnnotationTagFunction {
    fn name(&self) -> &str {
        "ANNOTATION_TAG"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len()) && RecordTarget::accepts(&args[0]) && is_text(&args[1])
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let target = records(self.name(), args)?;
        let tag = tag_name(self.name(), args)?;
        let tag_value = args.get(2).cloned().flatten();
        for record in target.records() {
            record.tags_or_init().add_tag(tag, tag_value.clone());
        }
        Ok(args[0].clone())
    }

    fn documentation(&self) -> &str {
        "Attaches a tag to a record, or to every record of a list, and returns the operand."
    }
}

/// GetTag() - read a record tag
pub struct GetAnnotationTagFunction {
    signature: FunctionSignature,
}

impl Default for GetAnnotationTagFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl GetAnnotationTagFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: record_tag_signature("GET_ANNOTATION_TAG", false),
        }
    }
}

impl ValueFunction for GetAnnotationTagFunction {
    fn name(&self) -> &str {
        "GET_ANNOTATION_TAG"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.len() == 2 && (is_null(&args[0]) || RecordTarget::accepts(&args[0])) && is_text(&args[1])
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        if is_null(arg_at(args, 0)) {
            return Ok(None);
        }
        let target = records(self.name(), args)?;
        let tag = tag_name(self.name(), args)?;
        let lookup = |record: &RecordRef| record.tags().and_then(|tags| tags.get_tag(tag));
        Ok(match &target {
            RecordTarget::Single(record) => lookup(record),
            RecordTarget::Many(records) => Some(Value::list(
                records
                    .iter()
                    .map(|r| lookup(r).unwrap_or_else(Value::null))
                    .collect(),
            )),
        })
    }

    fn documentation(&self) -> &str {
        "Value of a record tag; element-wise for lists of records."
    }
}

/// RemoveTag() - remove a record tag, returning the operand
pub struct RemoveAnnotationTagFunction {
    signature: FunctionSignature,
}

impl Default for RemoveAnnotationTagFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoveAnnotationTagFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: record_tag_signature("REMOVE_ANNOTATION_TAG", false),
        }
    }
}

impl ValueFunction for RemoveAnnotationTagFunction {
    fn name(&self) -> &str {
        "REMOVE_ANNOTATION_TAG"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.len() == 2 && RecordTarget::accepts(&args[0]) && is_text(&args[1])
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let target = records(self.name(), args)?;
        let tag = tag_name(self.name(), args)?;
        for record in target.records() {
            if let Some(tags) = record.tags() {
                tags.remove_tag(tag);
            }
        }
        Ok(args[0].clone())
    }

    fn documentation(&self) -> &str {
        "Removes a tag from a record, or from every record of a list, and returns the operand."
    }
}

/// Get or set an entry of a tags container
pub struct TagsValueFunction {
    signature: FunctionSignature,
}

impl Default for TagsValueFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl TagsValueFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::with_arity(
                "TAGS_VALUE",
                vec![
                    ParamInfo::required("TAGS", ValueKind::Tags),
                    ParamInfo::required("TAG", ValueKind::Text),
                    ParamInfo::any("TAG_VALUE"),
                ],
                2,
            ),
        }
    }
}

impl ValueFunction for TagsValueFunction {
    fn name(&self) -> &str {
        "TAGS_VALUE"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        self.signature.accepts_arity(args.len())
            && payload_of(&args[0]).is_some_and(|p| p.as_tags().is_some())
            && is_text(&args[1])
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let operand = arg_at(args, 0);
        let tags = payload_of(operand)
            .and_then(Payload::as_tags)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "Tags", operand))?;
        let tag = tag_name(self.name(), args)?;
        if args.len() > 2 {
            tags.add_tag(tag, args[2].clone());
        }
        Ok(tags.get_tag(tag))
    }

    fn documentation(&self) -> &str {
        "Reads an entry of a tags container, first setting it when a third argument is given."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RuleEnv;
    use crate::model::{AnnotationMap, Tags};

    fn call(f: &dyn ValueFunction, args: &[Arg]) -> Option<Value> {
        assert!(f.check_args(args), "{} rejected {args:?}", f.name());
        f.apply(&RuleEnv::new(), args).unwrap()
    }

    #[test]
    fn test_value_tag_round_trip() {
        let v = Value::text("dog");
        let tag = Some(Value::text("animal"));
        let out = call(&SetValueTagFunction::new(), &[Some(v.clone()), tag.clone(), Some(Value::integer(3))]);
        assert_eq!(out, Some(v.clone()));

        let read = call(&GetValueTagFunction::new(), &[Some(v.clone()), tag.clone()]);
        assert_eq!(read, Some(Value::integer(3)));

        call(&RemoveValueTagFunction::new(), &[Some(v.clone()), tag.clone()]);
        assert_eq!(call(&GetValueTagFunction::new(), &[Some(v), tag]), None);
    }

    #[test]
    fn test_value_tag_on_null_payload() {
        let v = Value::null();
        call(&SetValueTagFunction::new(), &[Some(v.clone()), Some(Value::text("seen"))]);
        assert!(v.tags().is_some_and(|t| t.has_tag("seen")));
        assert!(!SetValueTagFunction::new().check_args(&[None, Some(Value::text("seen"))]));
    }

    #[test]
    fn test_record_tags_broadcast() {
        let a = AnnotationMap::token("a").into_ref();
        let b = AnnotationMap::token("b").into_ref();
        let list = Value::list(vec![Value::record(a.clone()), Value::record(b.clone())]);
        let tag = Some(Value::text("NP"));

        call(&SetAnnotationTagFunction::new(), &[Some(list.clone()), tag.clone(), Some(Value::bool(true))]);
        assert_eq!(a.tags().and_then(|t| t.get_tag("NP")), Some(Value::bool(true)));

        b.tags_or_init().remove_tag("NP");
        let read = call(&GetAnnotationTagFunction::new(), &[Some(list.clone()), tag.clone()]);
        assert_eq!(read, Some(Value::list(vec![Value::bool(true), Value::null()])));

        call(&RemoveAnnotationTagFunction::new(), &[Some(list), tag]);
        assert!(!a.tags().is_some_and(|t| t.has_tag("NP")));
    }

    #[test]
    fn test_record_tag_null_handling() {
        let tag = Some(Value::text("NP"));
        assert!(!SetAnnotationTagFunction::new().check_args(&[Some(Value::null()), tag.clone()]));
        assert_eq!(call(&GetAnnotationTagFunction::new(), &[Some(Value::null()), tag.clone()]), None);
        let untagged: RecordRef = AnnotationMap::token("x").into_ref();
        assert_eq!(call(&GetAnnotationTagFunction::new(), &[Some(Value::record(untagged)), tag]), None);
    }

    #[test]
    fn test_tags_container() {
        let tags = Tags::new();
        let v = Value::tags_container(tags.clone());
        let out = call(&TagsValueFunction::new(), &[Some(v.clone()), Some(Value::text("k")), Some(Value::integer(1))]);
        assert_eq!(out, Some(Value::integer(1)));
        assert!(tags.has_tag("k"));
        assert!(!TagsValueFunction::new().check_args(&[Some(Value::null()), Some(Value::text("k"))]));
    }
}
