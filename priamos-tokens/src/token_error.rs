use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[repr(u16)]
#[non_exhaustive]
/// Tokenizer failure codes.
///
/// Errors are encoded in the `0xFFxx` token code space so they survive the
/// byte-oriented tokenizer interface without allocation. Any token in that
/// range is a fatal input error for the evaluator.
pub enum TokenError {
    /// The input could not be tokenized.
    SyntaxError = 0xFFFF,
    /// The construct is recognized but not implemented.
    Unimplemented = 0xFFFE,
    /// A string literal is missing its closing quote.
    StringNotTerminated = 0xFFFD,
    /// A string literal exceeds the length-prefixed payload limit.
    StringTooLong = 0xFFFC,
    /// A numeric literal has more digits than the converter accepts.
    NumberTooLong = 0xFFFB,
    /// A numeric literal is malformed or does not fit its storage type.
    BadNumber = 0xFFFA,
    /// The token output buffer could not be grown.
    OutOfMemory = 0xFFF9,
}

impl TokenError {
    /// The token code this error is encoded as.
    pub const fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::SyntaxError => "syntax error",
            Self::Unimplemented => "unimplemented",
            Self::StringNotTerminated => "string not terminated",
            Self::StringTooLong => "string too long",
            Self::NumberTooLong => "number too long",
            Self::BadNumber => "number bad",
            Self::OutOfMemory => "memory error",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for TokenError {}

impl From<u16> for TokenError {
    /// Converts a `0xFFxx` token code into a `TokenError`. Codes without a
    /// dedicated meaning collapse to `SyntaxError`.
    fn from(code: u16) -> Self {
        match code {
            0xFFFE => Self::Unimplemented,
            0xFFFD => Self::StringNotTerminated,
            0xFFFC => Self::StringTooLong,
            0xFFFB => Self::NumberTooLong,
            0xFFFA => Self::BadNumber,
            0xFFF9 => Self::OutOfMemory,
            _ => Self::SyntaxError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn token_error_code_round_trip() {
        for err in TokenError::iter() {
            assert_eq!(err, TokenError::from(err.code()));
            assert!(err.code() >= 0xFF00);
        }
    }

    #[test]
    fn unknown_codes_collapse_to_syntax_error() {
        assert_eq!(TokenError::from(0xFF00), TokenError::SyntaxError);
        assert_eq!(TokenError::from(0xFFF8), TokenError::SyntaxError);
    }
}
