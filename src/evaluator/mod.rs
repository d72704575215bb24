//! Function evaluation at the call site
//!
//! Looks a name up in the environment, falls back to the function registry,
//! picks the first overload whose argument check accepts, and applies it.

mod engine;
mod env;
pub mod error;

pub use engine::FunctionEngine;
pub use env::{Env, RuleEnv};
pub use error::{EvaluationError, EvaluationResult};
