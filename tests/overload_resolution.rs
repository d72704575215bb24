//! First-match overload resolution, shadowing and registry extension

use std::sync::Arc;

use annotrule::registry::functions::string::ConcatFunction;
use annotrule::registry::{FunctionResult, OverloadSet};
use annotrule::{
    Arg, EngineConfig, Env, EvaluationError, FunctionEngine, FunctionSignature, ParamInfo,
    RegistryBuilder, RuleEnv, Value, ValueFunction, ValueKind, evaluate, standard_registry,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Accepts any single text argument and reports its own label
struct Labelled {
    label: &'static str,
    signature: FunctionSignature,
}

impl Labelled {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            signature: FunctionSignature::new(label, vec![ParamInfo::required("S", ValueKind::Text)]),
        }
    }
}

impl ValueFunction for Labelled {
    fn name(&self) -> &str {
        self.label
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, _args: &[Arg]) -> FunctionResult<Option<Value>> {
        Ok(Some(Value::text(self.label)))
    }
}

#[test]
fn earlier_registration_wins() {
    let engine = FunctionEngine::with_registry(
        RegistryBuilder::new()
            .register("Pick", Labelled::new("FIRST"))
            .register("Pick", Labelled::new("SECOND"))
            .build(),
    );
    let env = engine.create_env();
    for _ in 0..3 {
        let out = engine.evaluate("Pick", &env, &[Some(Value::text("x"))]).unwrap();
        assert_eq!(out, Some(Value::text("FIRST")));
    }
}

#[test]
fn appended_overload_only_sees_leftovers() {
    let registry = RegistryBuilder::with_standard_functions()
        .register("Uppercase", Labelled::new("CUSTOM_UPPER"))
        .build();
    let engine = FunctionEngine::with_registry(registry);
    let out = engine
        .evaluate("Uppercase", &RuleEnv::new(), &[Some(Value::text("a"))])
        .unwrap();
    assert_eq!(out, Some(Value::text("A")));
}

#[rstest]
#[case("EQ", &["EQ", "EQUALS"])]
#[case("GT", &["GT", "STRING_GT"])]
#[case("Match", &["TOKENS_MATCH", "STRING_MATCH"])]
#[case("Map", &["MAP_VALUES", "MAP"])]
#[case("Keys", &["MAP_KEYS", "COMPOSITE_KEYS"])]
#[case(
    "Select",
    &["COMPOSITE_VALUE", "MAP_VALUE", "TAGS_VALUE", "ANNOTATION_VALUE", "OBJECT_FIELD", "LIST_VALUE"]
)]
fn registration_order(#[case] name: &str, #[case] expected: &[&str]) {
    let registry = standard_registry();
    let names: Vec<&str> = registry
        .candidates(name)
        .unwrap()
        .iter()
        .map(|f| f.name())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn shared_overloads_are_the_same_instance() {
    let registry = standard_registry();
    let eq = registry.candidates("EQ").unwrap();
    let equals = registry.candidates("Equals").unwrap();
    assert!(Arc::ptr_eq(&eq[1], &equals[0]));
    let map = registry.candidates("Map").unwrap();
    let map_values = registry.candidates("MapValues").unwrap();
    assert!(Arc::ptr_eq(&map[0], &map_values[0]));
}

#[test]
fn unknown_function() {
    let err = evaluate("Frobnicate", &RuleEnv::new(), &[]).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::UnknownFunction {
            name: "Frobnicate".to_string()
        }
    );
    assert!(err.is_resolution_error());
}

#[test]
fn no_matching_overload_describes_arguments() {
    let args = [Some(Value::text("a")), None];
    let err = evaluate("Add", &RuleEnv::new(), &args).unwrap_err();
    assert_eq!(
        err.to_string(),
        "No overload of 'Add' accepts arguments (STRING:String, absent)"
    );
}

#[test]
fn local_function_shadows_builtin() {
    let mut env = RuleEnv::new();
    env.bind_function("Concat", Arc::new(Labelled::new("LOCAL")));
    let out = evaluate("Concat", &env, &[Some(Value::text("x"))]).unwrap();
    assert_eq!(out, Some(Value::text("LOCAL")));

    env.unbind("Concat");
    let out = evaluate("Concat", &env, &[Some(Value::text("x"))]).unwrap();
    assert_eq!(out, Some(Value::text("x")));
}

#[test]
fn local_value_is_not_callable() {
    let mut env = RuleEnv::new();
    env.bind("Join", Value::text("not a function"));
    let err = evaluate("Join", &env, &[Some(Value::text(","))]).unwrap_err();
    assert!(matches!(err, EvaluationError::NotCallable { .. }));
}

#[test]
fn overload_set_dispatches_like_the_registry() {
    let set = OverloadSet::new(
        "Both",
        vec![Arc::new(Labelled::new("TEXT_ONLY")), Arc::new(ConcatFunction::new())],
    );
    let env = RuleEnv::new();
    assert_eq!(set.apply(&env, &[Some(Value::text("a"))]).unwrap(), Some(Value::text("TEXT_ONLY")));
    assert_eq!(set.apply(&env, &[Some(Value::integer(1))]).unwrap(), Some(Value::text("1")));
    assert!(!set.check_args(&[None]));
}

#[test]
fn configured_engine_without_standard_keys() {
    let config = EngineConfig {
        register_default_keys: false,
        ..EngineConfig::testing()
    };
    let engine = FunctionEngine::new().with_config(config);
    let env = engine.create_env();
    assert_eq!(env.resolve_annotation_key("word"), None);
}

#[test]
fn documentation_lists_every_overload() {
    let registry = standard_registry();
    let docs = registry.documentation();
    assert_eq!(docs.len(), registry.overload_count());
    let json = registry.generate_docs_json().unwrap();
    assert!(json.contains("\"ANNOTATION_VALUE(Any, Any, [Any])\""));
}
