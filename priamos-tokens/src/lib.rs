#![warn(missing_docs)]
//! Token-space primitives of the PriamosBASIC interpreter.
//!
//! Everything two peers must agree on byte-for-byte lives here: the token
//! code constants, the NUMLIT payload layout, the static keyword table and
//! the tokenizer error code space. Runtime state (registries, buffers,
//! stores) lives in the interpreter crate.

mod keyword;
mod numlit;
mod token;
mod token_error;

#[cfg(test)]
mod encoding_tests;

pub use keyword::{keyword_text, KeywordDef, KEYWORDS};
pub use numlit::{numlit_type_byte, split_numlit_type_byte, NumBase, NumWidth};
pub use token::*;
pub use token_error::TokenError;
