//! Runtime interpreter error implementation

use priamos_tokens::TokenError;

use std::io;
use thiserror::Error;

/// Runtime failure raised at the point of detection, carrying the stable
/// message identifier the REPL reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BasicError {
    /// The token stream is not a well-formed statement or expression.
    #[error("syntax error")]
    SyntaxError,
    /// The token stream is structurally broken (truncated payload, bad
    /// length class).
    #[error("interpret error")]
    InterpretError,
    /// An operation was applied across incompatible value types.
    #[error("type mismatch")]
    TypeMismatch,
    /// Integer or real division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// An array was subscripted before `DIM` declared it.
    #[error("array not dimensioned")]
    ArrayNotDimensioned,
    /// A function reference names no declared function.
    #[error("function not declared")]
    FunctionNotDeclared,
    /// A function keyword is in the token table but has no runtime binding.
    #[error("function keyword not implemented")]
    FunctionKeywordNotImplemented,
    /// A subscript list has fewer entries than the array has dimensions.
    #[error("too few dimensions")]
    TooFewDimensions,
    /// A subscript list has more entries than the array has dimensions.
    #[error("too many dimensions")]
    TooManyDimensions,
    /// A subscript is negative or otherwise unusable as an index.
    #[error("bad subscript")]
    BadSubscript,
    /// A subscript is outside the named dimension (0-based).
    #[error("index #{0} out of range")]
    IndexOutOfRange(usize),
    /// A `DIM` dimension is zero.
    #[error("dimension #{0} is zero")]
    ZeroDimension(usize),
    /// A `DIM` dimension overflows the cell addressing range.
    #[error("dimension #{0} too large")]
    DimensionTooLarge(usize),
    /// Arrays of arrays or of functions cannot be created.
    #[error("array type impossible")]
    ArrayTypeImpossible,
    /// An allocation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// An array grew past the maximum cell count.
    #[error("array too large")]
    ArrayTooLarge,
    /// An assignment's lvalue and rvalue lists have different lengths.
    #[error("pairing mismatch")]
    PairingMismatch,
    /// The statement or operator is recognized but has no handler.
    #[error("not implemented")]
    NotImplemented,
}

/// Top-level interpreter error variants, as reported at the REPL seam.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// The line could not be tokenized.
    #[error("{0}")]
    Token(#[from] TokenError),
    /// Evaluation or dispatch failed; in-flight expression values have been
    /// released.
    #[error("{0}")]
    Runtime(#[from] BasicError),
    /// The output sink failed.
    #[error("unrecoverable error: {0}")]
    Io(#[from] io::Error),
}

impl InterpreterError {
    /// The runtime error that caused this failure, if applicable.
    pub const fn runtime(&self) -> Option<&BasicError> {
        match self {
            Self::Runtime(e) => Some(e),
            _ => None,
        }
    }

    /// The tokenizer error that caused this failure, if applicable.
    pub const fn token(&self) -> Option<&TokenError> {
        match self {
            Self::Token(e) => Some(e),
            _ => None,
        }
    }
}
