pub mod classify;
pub mod error;
pub mod evaluator;
pub mod operator;
pub mod token;
pub mod tokenizer;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{ErrorKind, ExprError, TokenizeError};
pub use evaluator::{EvalError, Evaluator, NativeFn, Scope};
pub use operator::{Assoc, Op};
pub use token::{Keyword, Token};
pub use tokenizer::tokenize;
pub use value::Value;
