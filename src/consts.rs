//! Interpreter parameters

/// Initial capacity of the program store's byte buffer.
pub const PROGRAM_BUFFER_SIZE: usize = 16384;

/// Initial capacity of the line-info record vector.
pub const LINE_INFO_CAPACITY: usize = 1024;

/// Initial capacity of a tokenizer output buffer.
pub const TOKEN_BUFFER_SIZE: usize = 256;

/// Initial capacity of a detokenizer output buffer.
pub const DETOK_BUFFER_SIZE: usize = 1024;

/// Maximum line number a `LINENO` token can carry (24-bit unsigned).
pub const MAX_LINE_NUMBER: u32 = 0xFF_FFFF;

/// Maximum payload length of a length-prefixed token (one length byte).
pub const MAX_TEXT_LEN: usize = 255;

/// Maximum digit count accepted in a single numeric literal.
pub const MAX_NUM_DIGITS: usize = 255;

/// Maximum evaluator nesting depth, counting user function calls and
/// parenthesized subexpressions.
pub const MAX_EVAL_DEPTH: usize = 64;
