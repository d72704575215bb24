// Error types for call-site evaluation

use thiserror::Error;

use crate::model::Arg;
use crate::registry::function::FunctionError;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while resolving and applying a named function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// No function is registered or bound under this name
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// Functions exist under this name but none accepts the arguments
    #[error("No overload of '{name}' accepts arguments {arguments}")]
    NoMatchingOverload {
        /// Function name
        name: String,
        /// Rendered argument shapes
        arguments: String,
    },

    /// A local binding shadows the name but does not hold a function
    #[error("'{name}' is bound to a value that is not a function")]
    NotCallable {
        /// Binding name
        name: String,
    },

    /// Function evaluation error
    #[error("Function error: {0}")]
    Function(#[from] FunctionError),
}

impl EvaluationError {
    /// Build a `NoMatchingOverload` error describing the rejected arguments
    pub fn no_matching_overload(name: impl Into<String>, args: &[Arg]) -> Self {
        Self::NoMatchingOverload {
            name: name.into(),
            arguments: describe_args(args),
        }
    }

    /// Check if this error comes from resolution rather than from a function body
    pub fn is_resolution_error(&self) -> bool {
        !matches!(self, Self::Function(_))
    }
}

/// Render argument shapes as `(Integer, absent, null, STRING:String)`
pub fn describe_args(args: &[Arg]) -> String {
    let parts: Vec<String> = args
        .iter()
        .map(|arg| match arg {
            None => "absent".to_string(),
            Some(v) => {
                let kind = v
                    .payload()
                    .map_or_else(|| "null".to_string(), |p| p.kind().to_string());
                match v.type_name() {
                    Some(t) => format!("{t}:{kind}"),
                    None => kind,
                }
            }
        })
        .collect();
    format!("({})", parts.join(", "))
}
