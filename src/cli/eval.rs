//! Evaluate an expression against a JSON context

use super::CliError;
use crate::{Evaluator, Scope, Value};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The expression to evaluate
    pub expr: String,
    /// JSON object whose fields the expression's identifiers resolve to
    pub context: Option<String>,
}

/// Evaluate an expression and return the result as JSON. Without a
/// context every identifier resolves to null.
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let scope = match &options.context {
        Some(json_str) => {
            let root: serde_json::Value = serde_json::from_str(json_str)?;
            Scope::from_value(Value::from(root))
        }
        None => Scope::new(),
    };

    let evaluator = Evaluator::new(scope);
    let result = evaluator.eval_str(&options.expr)?;
    Ok(serde_json::Value::from(result))
}
