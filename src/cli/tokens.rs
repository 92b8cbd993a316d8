//! Print the token stream of an expression

use serde_json::json;

use super::CliError;
use crate::tokenize;

/// Options for the tokens command
#[derive(Debug, Clone, Default)]
pub struct TokensOptions {
    /// The expression to tokenize
    pub expr: String,
}

/// Tokenize an expression into a JSON array with one `{value, arity}`
/// entry per token, in evaluation order.
pub fn execute_tokens(options: &TokensOptions) -> Result<serde_json::Value, CliError> {
    let tokens = tokenize(&options.expr)?;
    let entries = tokens
        .iter()
        .map(|t| json!({ "value": t.value(), "arity": t.arity() }))
        .collect();
    Ok(serde_json::Value::Array(entries))
}
