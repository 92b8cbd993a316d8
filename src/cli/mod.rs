//! CLI support for cassia
//!
//! Provides programmatic access to the CLI commands for embedding in
//! other tools.

mod eval;
mod tokens;

pub use eval::{execute_eval, EvalOptions};
pub use tokens::{execute_tokens, TokensOptions};

use std::io;

use crate::error::{ExprError, TokenizeError};
use crate::evaluator::EvalError;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Tokenizer or evaluator error
    Expr(ExprError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Expr(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Expr(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<ExprError> for CliError {
    fn from(e: ExprError) -> Self {
        CliError::Expr(e)
    }
}

impl From<TokenizeError> for CliError {
    fn from(e: TokenizeError) -> Self {
        CliError::Expr(ExprError::Tokenize(e))
    }
}

impl From<EvalError> for CliError {
    fn from(e: EvalError) -> Self {
        CliError::Expr(ExprError::Eval(e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
