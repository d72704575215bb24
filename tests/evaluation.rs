//! End-to-end evaluation of the built-in functions through the engine

use annotrule::model::types::{TYPE_NUMBER, TYPE_STRING};
use annotrule::{Arg, EvaluationError, FunctionEngine, FunctionError, Payload, RuleEnv, Value, evaluate};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn args(values: Vec<Value>) -> Vec<Arg> {
    values.into_iter().map(Some).collect()
}

fn eval(name: &str, values: Vec<Value>) -> Option<Value> {
    evaluate(name, &RuleEnv::new(), &args(values)).unwrap()
}

#[rstest]
#[case("Add", Value::integer(2), Value::integer(3), Payload::Integer(5))]
#[case("Add", Value::integer(2), Value::float(3.0), Payload::Float(5.0))]
#[case("Subtract", Value::integer(2), Value::integer(5), Payload::Integer(-3))]
#[case("Multiply", Value::float(1.5), Value::integer(4), Payload::Float(6.0))]
#[case("Divide", Value::integer(7), Value::integer(2), Payload::Integer(3))]
#[case("Divide", Value::float(7.0), Value::integer(2), Payload::Float(3.5))]
#[case("Mod", Value::integer(7), Value::integer(3), Payload::Integer(1))]
fn arithmetic(#[case] name: &str, #[case] x: Value, #[case] y: Value, #[case] expected: Payload) {
    let result = eval(name, vec![x, y]).unwrap();
    assert_eq!(result.payload(), Some(&expected));
    assert_eq!(result.type_name(), Some(TYPE_NUMBER));
}

#[test]
fn float_results_keep_fractional_marker() {
    let result = eval("Add", vec![Value::integer(2), Value::float(3.0)]).unwrap();
    assert_eq!(result.to_string(), "5.0");
}

#[test]
fn integer_division_by_zero_is_call_scoped() {
    let err = evaluate("Divide", &RuleEnv::new(), &args(vec![Value::integer(1), Value::integer(0)])).unwrap_err();
    assert!(matches!(err, EvaluationError::Function(FunctionError::EvaluationError { .. })));
    assert!(!err.is_resolution_error());
}

#[rstest]
#[case("And", vec![], true)]
#[case("Or", vec![], false)]
#[case("And", vec![true, true], true)]
#[case("And", vec![true, false, true], false)]
#[case("Or", vec![false, false, true], true)]
#[case("Not", vec![false], true)]
fn boolean(#[case] name: &str, #[case] inputs: Vec<bool>, #[case] expected: bool) {
    let values = inputs.into_iter().map(Value::bool).collect();
    assert_eq!(eval(name, values), Some(Value::bool(expected)));
}

#[rstest]
#[case("GT", Value::integer(3), Value::float(2.5), true)]
#[case("GE", Value::integer(2), Value::integer(2), true)]
#[case("LT", Value::text("abc"), Value::text("abd"), true)]
#[case("EQ", Value::integer(2), Value::float(2.0), true)]
#[case("EQ", Value::text("a"), Value::text("a"), true)]
#[case("NE", Value::text("a"), Value::text("b"), true)]
#[case("Equals", Value::null(), Value::null(), true)]
#[case("NotEquals", Value::null(), Value::integer(1), true)]
fn comparison(#[case] name: &str, #[case] x: Value, #[case] y: Value, #[case] expected: bool) {
    assert_eq!(eval(name, vec![x, y]), Some(Value::bool(expected)));
}

#[test]
fn equals_compares_absent_by_presence() {
    let env = RuleEnv::new();
    assert_eq!(evaluate("Equals", &env, &[None, None]).unwrap(), Some(Value::bool(true)));
    assert_eq!(
        evaluate("Equals", &env, &[None, Some(Value::null())]).unwrap(),
        Some(Value::bool(false))
    );
    assert_eq!(
        evaluate("NotEquals", &env, &[Some(Value::integer(1)), None]).unwrap(),
        Some(Value::bool(true))
    );
}

#[rstest]
#[case(None, None, true)]
#[case(None, Some(Value::null()), false)]
#[case(Some(Value::null()), Some(Value::null()), true)]
#[case(Some(Value::null()), Some(Value::integer(5)), false)]
#[case(Some(Value::integer(5)), Some(Value::integer(5)), true)]
#[case(Some(Value::integer(1)), Some(Value::float(1.0)), false)]
#[case(Some(Value::text("dog")), Some(Value::text("dog")), true)]
#[case(Some(Value::text("dog")), Some(Value::text("cat")), false)]
#[case(
    Some(Value::list(vec![Value::integer(1), Value::text("a")])),
    Some(Value::list(vec![Value::integer(1), Value::text("a")])),
    true
)]
#[case(Some(Value::list(vec![Value::integer(1)])), Some(Value::list(vec![])), false)]
fn not_equals_negates_equals(#[case] x: Arg, #[case] y: Arg, #[case] expected: bool) {
    let env = RuleEnv::new();
    let pair = [x, y];
    let eq = evaluate("Equals", &env, &pair).unwrap().and_then(|v| v.as_bool());
    let ne = evaluate("NotEquals", &env, &pair).unwrap().and_then(|v| v.as_bool());
    assert_eq!(eq, Some(expected));
    assert_eq!(ne, Some(!expected));
}

#[test]
fn format_with_oversized_width_is_call_scoped() {
    for template in ["%99999999999999999999d", "%4000000000s"] {
        let err = evaluate("Format", &RuleEnv::new(), &args(vec![Value::text(template), Value::integer(1)]))
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Function(FunctionError::Format { .. })));
    }
}

#[test]
fn ordered_comparison_rejects_null() {
    let err = evaluate("GT", &RuleEnv::new(), &args(vec![Value::null(), Value::integer(1)])).unwrap_err();
    assert!(matches!(err, EvaluationError::NoMatchingOverload { .. }));
}

#[test]
fn string_functions() {
    assert_eq!(
        eval("Concat", vec![Value::text("n="), Value::integer(4)]),
        Some(Value::text("n=4"))
    );
    assert_eq!(eval("Uppercase", vec![Value::text("ok")]), Some(Value::text("OK")));
    assert_eq!(
        eval("Join", vec![Value::text(", "), Value::text("a"), Value::text("b")]),
        Some(Value::text("a, b"))
    );
    assert_eq!(
        eval("Format", vec![Value::text("%s has %d legs"), Value::text("dog"), Value::integer(4)]),
        Some(Value::text("dog has 4 legs"))
    );
    let lower_null = eval("Lowercase", vec![Value::null()]).unwrap();
    assert!(lower_null.is_null());
    assert_eq!(lower_null.type_name(), Some(TYPE_STRING));
}

#[test]
fn aggregate_folds_with_registered_function() {
    let engine = FunctionEngine::new();
    let add = engine.registry().function_value("Add").unwrap();
    let env = RuleEnv::new();

    let mut folded = vec![Some(add.clone()), Some(Value::integer(0))];
    folded.extend((1..=3).map(|i| Some(Value::integer(i))));
    assert_eq!(engine.evaluate("Aggregate", &env, &folded).unwrap(), Some(Value::integer(6)));

    let init_only = [Some(add), Some(Value::integer(10))];
    assert_eq!(engine.evaluate("Aggregate", &env, &init_only).unwrap(), Some(Value::integer(10)));
}

#[test]
fn map_applies_function_value() {
    let engine = FunctionEngine::new();
    let negate = engine.registry().function_value("Negate").unwrap();
    let list = Value::list(vec![Value::integer(1), Value::float(2.5)]);
    let result = engine
        .evaluate("Map", &RuleEnv::new(), &[Some(list), Some(negate)])
        .unwrap()
        .unwrap();
    assert_eq!(result, Value::list(vec![Value::integer(-1), Value::float(-2.5)]));
}

#[test]
fn string_match_and_replace() {
    let env = RuleEnv::new();
    let matched = evaluate("Match", &env, &args(vec![Value::text("2024"), Value::regex(r"\d+")])).unwrap();
    assert_eq!(matched, Some(Value::bool(true)));

    let replaced = evaluate(
        "Replace",
        &env,
        &args(vec![Value::text("a  b"), Value::regex(r"\s+"), Value::text(" ")]),
    )
    .unwrap();
    assert_eq!(replaced, Some(Value::text("a b")));
    assert_eq!(env.pattern_cache_stats().misses, 2);
}

#[test]
fn create_regex_feeds_match() {
    let env = RuleEnv::new();
    let phrases = Value::list(vec![Value::text("New York"), Value::text("New York City")]);
    let regex = evaluate("CreateRegex", &env, &[Some(phrases)]).unwrap().unwrap();
    let matched = evaluate("Match", &env, &[Some(Value::text("New  York City")), Some(regex)]).unwrap();
    assert_eq!(matched, Some(Value::bool(true)));
}

#[test]
fn value_tags_round_trip() {
    let env = RuleEnv::new();
    let value = Value::text("dog");
    evaluate("VTag", &env, &args(vec![value.clone(), Value::text("animal"), Value::integer(1)])).unwrap();
    let tag = evaluate("GetVTag", &env, &args(vec![value.clone(), Value::text("animal")])).unwrap();
    assert_eq!(tag, Some(Value::integer(1)));

    evaluate("RemoveVTag", &env, &args(vec![value.clone(), Value::text("animal")])).unwrap();
    let tag = evaluate("GetVTag", &env, &args(vec![value, Value::text("animal")])).unwrap();
    assert_eq!(tag, None);
}
