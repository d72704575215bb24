//! Function registry for annotation rules
//!
//! Provides the trait-based value-function registry, the built-in function
//! families and the order in which they are registered. Registration order
//! is significant: resolution takes the first overload that accepts.

#![warn(missing_docs)]

pub mod function;
pub mod functions;
pub mod signature;

use std::sync::{Arc, LazyLock};

pub use function::{
    FunctionDoc, FunctionError, FunctionRef, FunctionRegistry, FunctionResult, OverloadSet,
    ValueFunction, call_checked,
};
pub use signature::{FunctionSignature, ParamInfo};

use functions::aggregate::{AggregateFunction, MapFunction, MapValuesFunction};
use functions::arithmetic::{ArithmeticFunction, ArithmeticOp};
use functions::boolean::{BooleanFunction, BooleanOp};
use functions::comparison::{CompareFunction, CompareType, EqualsFunction};
use functions::pattern::{
    StringMatchFunction, StringReplaceFunction, TokenStringSplitFunction, TokensMatchFunction,
    TokensReplaceFunction,
};
use functions::selection::{
    AnnotationFunction, CompositeKeysFunction, CompositeValueFunction, ListValueFunction,
    MapKeysFunction, MapValueFunction, ObjectFieldFunction,
};
use functions::string::{
    CaseFunction, ConcatFunction, CreateRegexFunction, FormatFunction, JoinFunction,
};
use functions::tags::{
    GetAnnotationTagFunction, GetValueTagFunction, RemoveAnnotationTagFunction,
    RemoveValueTagFunction, SetAnnotationTagFunction, SetValueTagFunction, TagsValueFunction,
};

static STANDARD_REGISTRY: LazyLock<Arc<FunctionRegistry>> =
    LazyLock::new(|| Arc::new(FunctionRegistry::standard()));

/// The process-wide standard registry, built on first use and read-only afterwards
pub fn standard_registry() -> Arc<FunctionRegistry> {
    Arc::clone(&STANDARD_REGISTRY)
}

/// Builder for registries that extend or replace the built-ins
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: FunctionRegistry,
}

impl RegistryBuilder {
    /// Start from an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the built-in functions
    pub fn with_standard_functions() -> Self {
        Self {
            registry: FunctionRegistry::standard(),
        }
    }

    /// Append an overload
    pub fn register<F: ValueFunction + 'static>(mut self, name: &str, function: F) -> Self {
        self.registry.register(name, function);
        self
    }

    /// Append an already shared overload
    pub fn register_ref(mut self, name: &str, function: FunctionRef) -> Self {
        self.registry.register_ref(name, function);
        self
    }

    /// Finish into a shareable registry
    pub fn build(self) -> Arc<FunctionRegistry> {
        Arc::new(self.registry)
    }
}

/// Register every built-in function, in resolution order
pub fn register_standard_functions(registry: &mut FunctionRegistry) {
    for op in [
        ArithmeticOp::Add,
        ArithmeticOp::Subtract,
        ArithmeticOp::Multiply,
        ArithmeticOp::Divide,
        ArithmeticOp::Mod,
        ArithmeticOp::Negate,
    ] {
        registry.register(op.registered_name(), ArithmeticFunction::new(op));
    }

    for op in [BooleanOp::And, BooleanOp::Or, BooleanOp::Not] {
        registry.register(op.registered_name(), BooleanFunction::new(op));
    }

    registry.register("Format", FormatFunction::new());
    registry.register("Concat", ConcatFunction::new());
    registry.register("Join", JoinFunction::new());
    registry.register("Lowercase", CaseFunction::lowercase());
    registry.register("Uppercase", CaseFunction::uppercase());

    let map_values: FunctionRef = Arc::new(MapValuesFunction::new());
    registry.register_ref("Map", Arc::clone(&map_values));
    registry.register("Map", MapFunction::new());
    registry.register_ref("MapValues", map_values);

    registry.register("Match", TokensMatchFunction::new());
    registry.register("Match", StringMatchFunction::new());
    registry.register("Replace", TokensReplaceFunction::new());
    registry.register("Replace", StringReplaceFunction::new());

    let compare_types = [
        CompareType::Ge,
        CompareType::Gt,
        CompareType::Le,
        CompareType::Lt,
        CompareType::Eq,
        CompareType::Ne,
    ];
    for compare_type in compare_types {
        registry.register(compare_type.registered_name(), CompareFunction::numeric(compare_type));
    }
    let equals: FunctionRef = Arc::new(EqualsFunction::equals());
    let not_equals: FunctionRef = Arc::new(EqualsFunction::not_equals());
    registry.register_ref("EQ", Arc::clone(&equals));
    registry.register_ref("NE", Arc::clone(&not_equals));
    registry.register_ref("Equals", equals);
    registry.register_ref("NotEquals", not_equals);
    for compare_type in [CompareType::Ge, CompareType::Gt, CompareType::Le, CompareType::Lt] {
        registry.register(compare_type.registered_name(), CompareFunction::text(compare_type));
    }

    registry.register("VTag", SetValueTagFunction::new());
    registry.register("GetVTag", GetValueTagFunction::new());
    registry.register("RemoveVTag", RemoveValueTagFunction::new());

    registry.register("Tag", SetAnnotationTagFunction::new());
    registry.register("GetTag", GetAnnotationTagFunction::new());
    registry.register("RemoveTag", RemoveAnnotationTagFunction::new());

    let annotation: FunctionRef = Arc::new(AnnotationFunction::new());
    registry.register("Split", TokenStringSplitFunction::new());
    registry.register_ref("Annotate", Arc::clone(&annotation));
    registry.register("Aggregate", AggregateFunction::new());
    registry.register("CreateRegex", CreateRegexFunction::new());

    let composite_value: FunctionRef = Arc::new(CompositeValueFunction::new());
    let map_value: FunctionRef = Arc::new(MapValueFunction::new());
    let tags_value: FunctionRef = Arc::new(TagsValueFunction::new());
    let object_field: FunctionRef = Arc::new(ObjectFieldFunction::new());
    let list_value: FunctionRef = Arc::new(ListValueFunction::new());

    for function in [&composite_value, &map_value, &tags_value, &annotation, &object_field, &list_value] {
        registry.register_ref("Select", Arc::clone(function));
    }
    registry.register_ref("ListSelect", Arc::clone(&list_value));

    registry.register("Keys", MapKeysFunction::new());
    registry.register("Keys", CompositeKeysFunction::new());

    for name in ["Set", "Get"] {
        for function in [&tags_value, &composite_value, &map_value, &annotation, &object_field, &list_value] {
            registry.register_ref(name, Arc::clone(function));
        }
    }
}
