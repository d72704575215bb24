//! Function signatures and declarative argument checks

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Arg, ValueKind};

/// Function signature used for argument checking and documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Function name
    pub name: String,
    /// Positional parameter descriptors
    pub parameters: Vec<ParamInfo>,
    /// Descriptor applied to every argument past the positional ones
    pub rest: Option<ParamInfo>,
    /// Declared result type name, if fixed
    pub return_type: Option<String>,
    /// Minimum number of arguments
    pub min_arity: usize,
    /// Maximum number of arguments (None for variadic)
    pub max_arity: Option<usize>,
}

/// Parameter descriptor.
///
/// An absent argument is accepted only when the parameter is `nullable`. A
/// present argument must carry `type_name` when one is given, and its payload
/// (unless null) must be of `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    /// Parameter name
    pub name: String,
    /// Required declared type name
    pub type_name: Option<String>,
    /// Required payload kind
    pub kind: Option<ValueKind>,
    /// Whether the argument may be absent
    pub nullable: bool,
}

impl ParamInfo {
    /// Create a parameter descriptor
    pub fn new(
        name: impl Into<String>,
        type_name: Option<&str>,
        kind: Option<ValueKind>,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(String::from),
            kind,
            nullable,
        }
    }

    /// Parameter that must be present, with the given payload kind
    pub fn required(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, None, Some(kind), false)
    }

    /// Parameter that may be absent, with the given payload kind when present
    pub fn nullable(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, None, Some(kind), true)
    }

    /// Parameter that must be present and carry the given type name
    pub fn typed(name: impl Into<String>, type_name: &str, kind: Option<ValueKind>) -> Self {
        Self::new(name, Some(type_name), kind, false)
    }

    /// Parameter accepting anything, including absence
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, None, None, true)
    }

    /// Check a single argument against this descriptor
    pub fn accepts(&self, arg: &Arg) -> bool {
        let Some(value) = arg else {
            return self.nullable;
        };
        if let Some(expected) = &self.type_name {
            if value.type_name() != Some(expected.as_str()) {
                return false;
            }
        }
        match (self.kind, value.payload()) {
            (Some(kind), Some(payload)) => kind.accepts(payload),
            _ => true,
        }
    }
}

impl fmt::Display for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.type_name, self.kind) {
            (Some(t), _) => f.write_str(t),
            (None, Some(kind)) => write!(f, "{kind}"),
            (None, None) => f.write_str("Any"),
        }
    }
}

impl FunctionSignature {
    /// Fixed-arity signature: exactly one argument per parameter
    pub fn new(name: impl Into<String>, parameters: Vec<ParamInfo>) -> Self {
        let arity = parameters.len();
        Self {
            name: name.into(),
            parameters,
            rest: None,
            return_type: None,
            min_arity: arity,
            max_arity: Some(arity),
        }
    }

    /// Signature whose trailing parameters may be omitted
    pub fn with_arity(
        name: impl Into<String>,
        parameters: Vec<ParamInfo>,
        min_arity: usize,
    ) -> Self {
        let max = parameters.len();
        Self {
            min_arity: min_arity.min(max),
            ..Self::new(name, parameters)
        }
    }

    /// Variadic signature: the positional parameters followed by any number of `rest`
    pub fn variadic(name: impl Into<String>, parameters: Vec<ParamInfo>, rest: ParamInfo) -> Self {
        Self {
            rest: Some(rest),
            max_arity: None,
            ..Self::new(name, parameters)
        }
    }

    /// Set the declared result type
    pub fn returns(mut self, type_name: &str) -> Self {
        self.return_type = Some(type_name.to_string());
        self
    }

    /// Check if `count` arguments satisfy the arity range
    pub fn accepts_arity(&self, count: usize) -> bool {
        count >= self.min_arity && self.max_arity.is_none_or(|max| count <= max)
    }

    /// Check arity and every argument against its descriptor
    pub fn check_args(&self, args: &[Arg]) -> bool {
        if !self.accepts_arity(args.len()) {
            return false;
        }
        args.iter().enumerate().all(|(i, arg)| {
            match self.parameters.get(i).or(self.rest.as_ref()) {
                Some(param) => param.accepts(arg),
                None => false,
            }
        })
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if i >= self.min_arity {
                write!(f, "[{param}]")?;
            } else {
                write!(f, "{param}")?;
            }
        }
        if let Some(rest) = &self.rest {
            if !self.parameters.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "{rest}...")?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_nullable_param_accepts_absent_only_when_flagged() {
        let nullable = ParamInfo::nullable("LIST", ValueKind::Sequence);
        let required = ParamInfo::required("TOKEN", ValueKind::Record);
        assert!(nullable.accepts(&None));
        assert!(!required.accepts(&None));
        // explicit null skips the kind check
        assert!(required.accepts(&Some(Value::null())));
    }

    #[test]
    fn test_type_name_must_match() {
        let p = ParamInfo::typed("REGEX", "REGEX", Some(ValueKind::Text));
        assert!(p.accepts(&Some(Value::regex("a+"))));
        assert!(!p.accepts(&Some(Value::text("a+"))));
    }

    #[test]
    fn test_exact_arity() {
        let sig = FunctionSignature::new(
            "STRING_MATCH",
            vec![
                ParamInfo::nullable("STRING", ValueKind::Text),
                ParamInfo::typed("REGEX", "REGEX", Some(ValueKind::Text)),
            ],
        );
        assert!(sig.check_args(&[Some(Value::text("a")), Some(Value::regex("a"))]));
        assert!(!sig.check_args(&[Some(Value::text("a"))]));
        assert_eq!(sig.to_string(), "STRING_MATCH(String, REGEX)");
    }

    #[test]
    fn test_variadic_rest() {
        let sig = FunctionSignature::variadic("AND", vec![], ParamInfo::required("B", ValueKind::Bool))
            .returns("BOOLEAN");
        assert!(sig.check_args(&[]));
        assert!(sig.check_args(&[Some(Value::bool(true)), Some(Value::bool(false))]));
        assert!(!sig.check_args(&[Some(Value::bool(true)), Some(Value::integer(1))]));
        assert_eq!(sig.to_string(), "AND(Boolean...) -> BOOLEAN");
    }

    #[test]
    fn test_optional_trailing_parameter() {
        let sig = FunctionSignature::with_arity(
            "TAGS_VALUE",
            vec![
                ParamInfo::required("TAGS", ValueKind::Tags),
                ParamInfo::required("TAG", ValueKind::Text),
                ParamInfo::any("VALUE"),
            ],
            2,
        );
        assert!(sig.accepts_arity(2));
        assert!(sig.accepts_arity(3));
        assert!(!sig.accepts_arity(4));
        assert_eq!(sig.to_string(), "TAGS_VALUE(Tags, String, [Any])");
    }
}
