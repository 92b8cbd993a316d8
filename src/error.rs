use std::fmt;

use crate::evaluator::EvalError;

/// The failure classes a scan can report. Every scan error is fatal: no
/// partial token stream is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbalanced or crossed `(` `)` / `[` `]`
    BracketMismatch,
    /// A character or symbol that is invalid where it appears
    UnexpectedToken,
    /// Unbalanced `?` / `:`
    MalformedTernary,
    /// Unbalanced `{` `}`
    MalformedObjectLiteral,
}

impl ErrorKind {
    fn label(&self) -> &'static str {
        match self {
            ErrorKind::BracketMismatch => "Bracket mismatch",
            ErrorKind::UnexpectedToken => "Unexpected token",
            ErrorKind::MalformedTernary => "Malformed ternary",
            ErrorKind::MalformedObjectLiteral => "Malformed object literal",
        }
    }
}

/// A fatal scan error, raised at the exact point of violation.
///
/// Expressions arrive from templates scattered across a document, so the
/// rendered message always embeds the full expression; the failure stays
/// traceable without surrounding context.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizeError {
    pub kind: ErrorKind,
    pub message: String,
    pub input: String,
}

impl TokenizeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, input: impl Into<String>) -> Self {
        TokenizeError {
            kind,
            message: message.into(),
            input: input.into(),
        }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} in expression `{}`",
            self.kind.label(),
            self.message,
            self.input
        )
    }
}

impl std::error::Error for TokenizeError {}

/// Errors from the combined tokenize-and-replay entry points.
#[derive(Debug)]
pub enum ExprError {
    /// The expression failed to tokenize
    Tokenize(TokenizeError),
    /// The token stream failed to evaluate
    Eval(EvalError),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Tokenize(e) => write!(f, "{}", e),
            ExprError::Eval(e) => write!(f, "Evaluation error: {}", e),
        }
    }
}

impl std::error::Error for ExprError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExprError::Tokenize(e) => Some(e),
            ExprError::Eval(e) => Some(e),
        }
    }
}

impl From<TokenizeError> for ExprError {
    fn from(e: TokenizeError) -> Self {
        ExprError::Tokenize(e)
    }
}

impl From<EvalError> for ExprError {
    fn from(e: EvalError) -> Self {
        ExprError::Eval(e)
    }
}
