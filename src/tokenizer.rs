//! Character stream → binary token stream.
//!
//! The tokenizer has two layers. [`Tokenizer::next_token`] is a streaming
//! scanner returning one token code at a time with payloads exposed through
//! side buffers; the string→number coercions use it directly.
//! [`Tokenizer::tokenize`] drives the scanner over a whole line and writes
//! the self-delimiting byte encoding, promoting an eligible first token to
//! `LINENO`.

use crate::buffer::ByteBuffer;
use crate::consts::{MAX_LINE_NUMBER, MAX_NUM_DIGITS, MAX_TEXT_LEN, TOKEN_BUFFER_SIZE};
use crate::keywords::Keywords;
use priamos_tokens::*;

/// Numeric side channel of the scanner, valid after a `T_NUMLIT` result.
#[derive(Debug, Clone, Copy)]
pub struct NumState {
    /// Whether the literal is an integer (no fraction, no exponent).
    pub is_int: bool,
    /// Integer value; valid when `is_int`.
    pub ival: i64,
    /// Real value; valid when `!is_int`.
    pub rval: f64,
    /// Source base.
    pub base: NumBase,
    /// Whether a `.` was present.
    pub has_fraction: bool,
    /// Whether an exponent was present.
    pub has_exponent: bool,
}

impl Default for NumState {
    fn default() -> Self {
        Self {
            is_int: true,
            ival: 0,
            rval: 0.0,
            base: NumBase::Dec,
            has_fraction: false,
            has_exponent: false,
        }
    }
}

/// Tokenizer over a single source line.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    src: &'a [u8],
    pos: usize,
    ident: Vec<u8>,
    strlit: Vec<u8>,
    num: NumState,
    /// Whether the next `%` introduces a binary literal rather than noise:
    /// true wherever the grammar expects a value.
    value_ctx: bool,
    /// Whether the cursor is at a statement start (labels bind here).
    stmt_start: bool,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `src`, one line of source bytes.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            ident: Vec::new(),
            strlit: Vec::new(),
            num: NumState::default(),
            value_ctx: true,
            stmt_start: true,
        }
    }

    /// Identifier bytes of the last `T_IDENT` (or matched keyword text).
    pub fn ident(&self) -> &[u8] {
        &self.ident
    }

    /// String bytes of the last `T_STRLIT` or comment payload of `T_REM`.
    pub fn strlit(&self) -> &[u8] {
        &self.strlit
    }

    /// Numeric state of the last `T_NUMLIT`.
    pub fn num(&self) -> &NumState {
        &self.num
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Scan one token. Error conditions return codes in the `0xFFxx` space.
    pub fn next_token(&mut self) -> u16 {
        self.skip_whitespace();
        let Some(b) = self.peek() else {
            return self.context(T_EOL);
        };

        let tok = match b {
            b'A'..=b'Z' | b'a'..=b'z' => self.read_ident(),
            b'0'..=b'9' | b'.' => self.read_num(NumBase::Dec),
            b'$' => self.read_prefixed_num(NumBase::Hex),
            b'@' => self.read_prefixed_num(NumBase::Oct),
            b'%' if self.value_ctx => self.read_prefixed_num(NumBase::Bin),
            b'"' => self.read_strlit(),
            b'\'' => {
                self.pos += 1;
                self.read_comment()
            }
            b'*' => self.read_two(b'*', OP_POW, T_TIMES),
            b'+' => self.read_two(b'+', OP_INC, T_PLUS),
            b'-' => self.read_two(b'-', OP_DEC, T_MINUS),
            b'<' => {
                self.pos += 1;
                match self.peek() {
                    Some(b'=') => {
                        self.pos += 1;
                        OP_LE
                    }
                    Some(b'>') => {
                        self.pos += 1;
                        OP_NE
                    }
                    Some(b'<') => {
                        self.pos += 1;
                        OP_SHL
                    }
                    _ => T_LT,
                }
            }
            b'>' => {
                self.pos += 1;
                match self.peek() {
                    Some(b'=') => {
                        self.pos += 1;
                        OP_GE
                    }
                    Some(b'>') => {
                        self.pos += 1;
                        OP_SHR
                    }
                    _ => T_GT,
                }
            }
            b'^' => {
                self.pos += 1;
                OP_POW
            }
            b'!' | b'(' | b')' | b',' | b'/' | b':' | b';' | b'=' | b'?' | b'[' | b']'
            | b'{' | b'|' | b'}' => {
                self.pos += 1;
                b as u16
            }
            _ => TokenError::SyntaxError.code(),
        };
        self.context(tok)
    }

    /// Record the scanning context the token leaves behind.
    fn context(&mut self, tok: u16) -> u16 {
        self.stmt_start = matches!(tok, T_COLON | T_LABEL | T_EOL);
        self.value_ctx = match tok {
            T_IDENT => self.ident.last() == Some(&b'('),
            t if is_function_keyword(t) => self.ident.last() == Some(&b'('),
            T_NUMLIT | T_STRLIT | T_RPAREN | T_RBRACK | T_RBRACE => false,
            _ => true,
        };
        tok
    }

    fn read_two(&mut self, second: u8, double: u16, single: u16) -> u16 {
        self.pos += 1;
        if self.peek() == Some(second) {
            self.pos += 1;
            double
        } else {
            single
        }
    }

    fn read_ident(&mut self) -> u16 {
        self.ident.clear();
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() {
                self.ident.push(b.to_ascii_uppercase());
                self.pos += 1;
            } else {
                break;
            }
        }
        if matches!(self.peek(), Some(b'$' | b'%')) {
            let sigil = self.bump().expect("peeked");
            self.ident.push(sigil);
        }
        let plain = !matches!(self.ident.last(), Some(b'$' | b'%'));
        if self.peek() == Some(b'(') {
            self.pos += 1;
            self.ident.push(b'(');
        }
        if self.ident.len() > MAX_TEXT_LEN {
            return TokenError::SyntaxError.code();
        }
        if let Some(code) = Keywords::get().lookup_by_name(&self.ident) {
            if code == T_REM {
                return self.read_comment();
            }
            return code;
        }
        // an unreserved bare name directly followed by ':' labels the statement
        if self.stmt_start && plain && self.ident.last() != Some(&b'(') && self.peek() == Some(b':')
        {
            self.pos += 1;
            return T_LABEL;
        }
        T_IDENT
    }

    fn read_strlit(&mut self) -> u16 {
        self.strlit.clear();
        self.pos += 1; // opening quote
        loop {
            match self.bump() {
                None => return TokenError::StringNotTerminated.code(),
                Some(b'"') => break,
                Some(b) => self.strlit.push(b),
            }
        }
        if self.strlit.len() > MAX_TEXT_LEN {
            return TokenError::StringTooLong.code();
        }
        T_STRLIT
    }

    fn read_comment(&mut self) -> u16 {
        self.strlit.clear();
        if self.peek() == Some(b' ') {
            self.pos += 1;
        }
        while let Some(b) = self.bump() {
            self.strlit.push(b);
        }
        if self.strlit.len() > MAX_TEXT_LEN {
            return TokenError::StringTooLong.code();
        }
        T_REM
    }

    fn read_prefixed_num(&mut self, base: NumBase) -> u16 {
        if !is_digit(self.src.get(self.pos + 1).copied(), base) {
            return TokenError::SyntaxError.code();
        }
        self.pos += 1; // prefix
        self.read_num(base)
    }

    fn read_num(&mut self, base: NumBase) -> u16 {
        let radix = base.radix();
        let mut mantissa: u128 = 0;
        let mut digits = 0usize;
        let mut frac_digits = 0i64;
        let mut has_fraction = false;
        let mut has_exponent = false;
        let mut exponent: i64 = 0;
        let mut exp_negative = false;

        while is_digit(self.peek(), base) {
            let d = digit_value(self.bump().expect("peeked")) as u128;
            mantissa = match mantissa.checked_mul(radix as u128).and_then(|m| m.checked_add(d)) {
                Some(m) => m,
                None => return TokenError::NumberTooLong.code(),
            };
            digits += 1;
        }
        if self.peek() == Some(b'.') {
            has_fraction = true;
            self.pos += 1;
            while is_digit(self.peek(), base) {
                let d = digit_value(self.bump().expect("peeked")) as u128;
                mantissa = match mantissa.checked_mul(radix as u128).and_then(|m| m.checked_add(d))
                {
                    Some(m) => m,
                    None => return TokenError::NumberTooLong.code(),
                };
                digits += 1;
                frac_digits += 1;
            }
        }
        if digits == 0 {
            return TokenError::BadNumber.code();
        }
        if digits > MAX_NUM_DIGITS {
            return TokenError::NumberTooLong.code();
        }

        let exp_letter = if radix <= 10 { b'E' } else { b'P' };
        if self
            .peek()
            .is_some_and(|b| b.to_ascii_uppercase() == exp_letter)
        {
            has_exponent = true;
            self.pos += 1;
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                }
                Some(b'-') => {
                    exp_negative = true;
                    self.pos += 1;
                }
                _ => {}
            }
            let mut exp_digits = 0usize;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                let d = (self.bump().expect("peeked") - b'0') as i64;
                exponent = (exponent * 10 + d).min(100_000);
                exp_digits += 1;
            }
            if exp_digits == 0 {
                return TokenError::BadNumber.code();
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        self.num = NumState {
            is_int: !has_fraction && !has_exponent,
            ival: 0,
            rval: 0.0,
            base,
            has_fraction,
            has_exponent,
        };

        if self.num.is_int {
            if mantissa > i64::MAX as u128 {
                return TokenError::BadNumber.code();
            }
            self.num.ival = mantissa as i64;
        } else if base == NumBase::Dec {
            // standard decimal-to-binary conversion on the recomposed text
            let mut text = mantissa.to_string();
            if frac_digits > 0 {
                let point = text.len() as i64 - frac_digits;
                if point <= 0 {
                    text = format!("0.{}{}", "0".repeat(-point as usize), text);
                } else {
                    text.insert(point as usize, '.');
                }
            }
            if has_exponent {
                text = format!("{text}e{exponent}");
            }
            match text.parse::<f64>() {
                Ok(v) => self.num.rval = v,
                Err(_) => return TokenError::BadNumber.code(),
            }
        } else {
            // power-of-two base: the exponent counts digits, each worth
            // base.bits_per_digit() bits; the fraction rescales the same way
            let bits = base.bits_per_digit() as i64;
            let shift = bits
                .saturating_mul(exponent - frac_digits)
                .clamp(i32::MIN as i64, i32::MAX as i64) as i32;
            self.num.rval = mantissa as f64 * 2f64.powi(shift);
        }
        T_NUMLIT
    }

    /// Tokenize the whole line into its byte encoding, terminated by `EOL`.
    pub fn tokenize(mut self) -> Result<ByteBuffer, TokenError> {
        let mut out = ByteBuffer::with_capacity(TOKEN_BUFFER_SIZE);
        let mut first = true;
        loop {
            let tok = self.next_token();
            if is_error_token(tok) {
                return Err(TokenError::from(tok));
            }
            self.emit(&mut out, tok, first)?;
            if tok == T_EOL {
                return Ok(out);
            }
            first = false;
        }
    }

    fn emit(&mut self, out: &mut ByteBuffer, tok: u16, first: bool) -> Result<(), TokenError> {
        let oom = |_| TokenError::OutOfMemory;
        match tok {
            T_IDENT => {
                out.write_byte(T_IDENT as u8).map_err(oom)?;
                out.write_byte(self.ident.len() as u8).map_err(oom)?;
                out.write_block(&self.ident).map_err(oom)?;
            }
            T_STRLIT | T_REM => {
                out.write_byte(tok as u8).map_err(oom)?;
                out.write_byte(self.strlit.len() as u8).map_err(oom)?;
                out.write_block(&self.strlit).map_err(oom)?;
            }
            T_LABEL => {
                out.write_byte(T_LABEL as u8).map_err(oom)?;
                out.write_byte(self.ident.len() as u8).map_err(oom)?;
                out.write_block(&self.ident).map_err(oom)?;
            }
            T_NUMLIT => {
                let n = self.num;
                let promote = first
                    && n.is_int
                    && n.base == NumBase::Dec
                    && !n.has_fraction
                    && !n.has_exponent
                    && (0..=MAX_LINE_NUMBER as i64).contains(&n.ival);
                if promote {
                    out.write_byte(T_LINENO as u8).map_err(oom)?;
                    out.write_u24(n.ival as u32).map_err(oom)?;
                    // the line number opens a fresh statement
                    self.stmt_start = true;
                    self.value_ctx = true;
                } else {
                    self.emit_number(out)?;
                }
            }
            tok if tok > 0x00FF => {
                out.write_u16(tok).map_err(oom)?;
            }
            tok => {
                out.write_byte(tok as u8).map_err(oom)?;
            }
        }
        Ok(())
    }

    fn emit_number(&self, out: &mut ByteBuffer) -> Result<(), TokenError> {
        let oom = |_| TokenError::OutOfMemory;
        let n = &self.num;
        if n.is_int {
            let width = NumWidth::narrowest_int(n.ival);
            if n.base == NumBase::Dec && width == NumWidth::I8 {
                out.write_byte(T_SBI as u8).map_err(oom)?;
                out.write_byte(n.ival as i8 as u8).map_err(oom)?;
                return Ok(());
            }
            out.write_byte(T_NUMLIT as u8).map_err(oom)?;
            out.write_byte(numlit_type_byte(n.base, width)).map_err(oom)?;
            let be = n.ival.to_be_bytes();
            out.write_block(&be[8 - width.payload_len()..]).map_err(oom)?;
        } else {
            out.write_byte(T_NUMLIT as u8).map_err(oom)?;
            if f32_eligible(n.rval) {
                out.write_byte(numlit_type_byte(n.base, NumWidth::F32))
                    .map_err(oom)?;
                out.write_f32(n.rval as f32).map_err(oom)?;
            } else {
                out.write_byte(numlit_type_byte(n.base, NumWidth::F64))
                    .map_err(oom)?;
                out.write_f64(n.rval).map_err(oom)?;
            }
        }
        Ok(())
    }
}

fn is_digit(byte: Option<u8>, base: NumBase) -> bool {
    let Some(b) = byte else { return false };
    match base {
        NumBase::Bin => matches!(b, b'0' | b'1'),
        NumBase::Oct => matches!(b, b'0'..=b'7'),
        NumBase::Dec => b.is_ascii_digit(),
        NumBase::Hex => b.is_ascii_hexdigit(),
    }
}

fn digit_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Whether `value` can be stored as an f32 payload: ±0, subnormal, ±∞, NaN,
/// or a finite number whose unbiased exponent fits `-126..=127` with the low
/// 29 mantissa bits clear.
fn f32_eligible(value: f64) -> bool {
    if value == 0.0 || !value.is_finite() || value.is_subnormal() {
        return true;
    }
    let bits = value.to_bits();
    let exp = ((bits >> 52) & 0x7FF) as i32 - 1023;
    (-126..=127).contains(&exp) && bits & 0x1FFF_FFFF == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(src: &[u8]) -> (u16, NumState) {
        let mut t = Tokenizer::new(src);
        let tok = t.next_token();
        (tok, t.num)
    }

    #[test]
    fn bases_and_values() {
        let (tok, n) = scan_one(b"$FF");
        assert_eq!(tok, T_NUMLIT);
        assert!(n.is_int);
        assert_eq!(n.ival, 255);
        assert_eq!(n.base, NumBase::Hex);

        let (tok, n) = scan_one(b"%101");
        assert_eq!(tok, T_NUMLIT);
        assert_eq!(n.ival, 5);
        assert_eq!(n.base, NumBase::Bin);

        let (tok, n) = scan_one(b"@17");
        assert_eq!(tok, T_NUMLIT);
        assert_eq!(n.ival, 15);
        assert_eq!(n.base, NumBase::Oct);

        let (tok, n) = scan_one(b"1.5E2");
        assert_eq!(tok, T_NUMLIT);
        assert!(!n.is_int);
        assert_eq!(n.rval, 150.0);
    }

    #[test]
    fn nondecimal_fractions_scale_by_bits() {
        let (tok, n) = scan_one(b"$1.8");
        assert_eq!(tok, T_NUMLIT);
        assert_eq!(n.rval, 1.5);

        let (tok, n) = scan_one(b"%1.1");
        assert_eq!(tok, T_NUMLIT);
        assert_eq!(n.rval, 1.5);

        // exponent counts digits, each worth bits_per_digit bits
        let (tok, n) = scan_one(b"$1P2");
        assert_eq!(tok, T_NUMLIT);
        assert_eq!(n.rval, 256.0);

        let (tok, n) = scan_one(b"@4P-1");
        assert_eq!(tok, T_NUMLIT);
        assert_eq!(n.rval, 0.5);
    }

    #[test]
    fn exponent_without_digits_is_bad_number() {
        assert_eq!(scan_one(b"1E").0, TokenError::BadNumber.code());
        assert_eq!(scan_one(b"1E+").0, TokenError::BadNumber.code());
        assert_eq!(scan_one(b"$1P-").0, TokenError::BadNumber.code());
        assert_eq!(scan_one(b".").0, TokenError::BadNumber.code());
    }

    #[test]
    fn integer_overflow_is_bad_number() {
        assert_eq!(
            scan_one(b"9223372036854775807").1.ival,
            i64::MAX
        );
        assert_eq!(scan_one(b"9223372036854775808").0, TokenError::BadNumber.code());
        assert_eq!(
            scan_one(b"$FFFFFFFFFFFFFFFF").0,
            TokenError::BadNumber.code()
        );
    }

    #[test]
    fn idents_fold_case_and_bind_sigils() {
        let mut t = Tokenizer::new(b"foo9$ bar% baz(");
        assert_eq!(t.next_token(), T_IDENT);
        assert_eq!(t.ident(), b"FOO9$");
        assert_eq!(t.next_token(), T_IDENT);
        assert_eq!(t.ident(), b"BAR%");
        assert_eq!(t.next_token(), T_IDENT);
        assert_eq!(t.ident(), b"BAZ(");
        assert_eq!(t.next_token(), T_EOL);
    }

    #[test]
    fn keywords_resolve_through_the_registry() {
        let mut t = Tokenizer::new(b"list Str$(2)");
        assert_eq!(t.next_token(), KW_LIST);
        assert_eq!(t.next_token(), FN_STR_S);
        assert_eq!(t.next_token(), T_NUMLIT);
        assert_eq!(t.next_token(), T_RPAREN);
        assert_eq!(t.next_token(), T_EOL);
    }

    #[test]
    fn operators_single_and_double() {
        let mut t = Tokenizer::new(b"<= >= <> << >> ** ^ ++ -- < > + - * / = ; , : ?");
        let expected = [
            OP_LE, OP_GE, OP_NE, OP_SHL, OP_SHR, OP_POW, OP_POW, OP_INC, OP_DEC, T_LT, T_GT,
            T_PLUS, T_MINUS, T_TIMES, T_DIV, T_EQ, T_SEMIC, T_COMMA, T_COLON, T_PRINT,
        ];
        for want in expected {
            assert_eq!(t.next_token(), want);
        }
        assert_eq!(t.next_token(), T_EOL);
    }

    #[test]
    fn percent_is_binary_only_in_value_context() {
        // after '=', a value is expected
        let mut t = Tokenizer::new(b"x = %11");
        assert_eq!(t.next_token(), T_IDENT);
        assert_eq!(t.next_token(), T_EQ);
        assert_eq!(t.next_token(), T_NUMLIT);
        assert_eq!(t.num().ival, 3);

        // after an identifier, '%' cannot start a literal
        let mut t = Tokenizer::new(b"x %11");
        assert_eq!(t.next_token(), T_IDENT);
        assert_eq!(t.next_token(), TokenError::SyntaxError.code());
    }

    #[test]
    fn string_literals_and_termination() {
        let mut t = Tokenizer::new(b"\"hi there\"");
        assert_eq!(t.next_token(), T_STRLIT);
        assert_eq!(t.strlit(), b"hi there");

        let mut t = Tokenizer::new(b"\"oops");
        assert_eq!(t.next_token(), TokenError::StringNotTerminated.code());
    }

    #[test]
    fn comments_capture_the_line_tail() {
        let mut t = Tokenizer::new(b"rem hello ' world");
        assert_eq!(t.next_token(), T_REM);
        assert_eq!(t.strlit(), b"hello ' world");

        let mut t = Tokenizer::new(b"' tail");
        assert_eq!(t.next_token(), T_REM);
        assert_eq!(t.strlit(), b"tail");
    }

    #[test]
    fn labels_bind_at_statement_start() {
        let mut t = Tokenizer::new(b"loop: again");
        assert_eq!(t.next_token(), T_LABEL);
        assert_eq!(t.ident(), b"LOOP");
        assert_eq!(t.next_token(), KW_AGAIN);
    }

    #[test]
    fn first_token_promotes_to_lineno() {
        let buf = Tokenizer::new(b"10 END").tokenize().unwrap();
        assert_eq!(buf.as_slice()[0], T_LINENO as u8);
        assert_eq!(&buf.as_slice()[1..4], &[0, 0, 10]);

        // 0x1000000 exceeds 24 bits and stays a numeric literal
        let buf = Tokenizer::new(b"16777216").tokenize().unwrap();
        assert_eq!(buf.as_slice()[0], T_NUMLIT as u8);

        // reals are never promoted
        let buf = Tokenizer::new(b"1.5").tokenize().unwrap();
        assert_eq!(buf.as_slice()[0], T_NUMLIT as u8);

        // only the first token is considered
        let buf = Tokenizer::new(b"END 10").tokenize().unwrap();
        assert_eq!(buf.as_slice()[2], T_SBI as u8);
    }

    #[test]
    fn sbi_is_decimal_only_and_byte_ranged() {
        let buf = Tokenizer::new(b"? 127").tokenize().unwrap();
        assert_eq!(buf.as_slice()[1], T_SBI as u8);
        let buf = Tokenizer::new(b"? 128").tokenize().unwrap();
        assert_eq!(buf.as_slice()[1], T_NUMLIT as u8);
        // a hex literal of i8 width still uses the NUMLIT envelope
        let buf = Tokenizer::new(b"? $7F").tokenize().unwrap();
        assert_eq!(buf.as_slice()[1], T_NUMLIT as u8);
        assert_eq!(buf.as_slice()[2], numlit_type_byte(NumBase::Hex, NumWidth::I8));
    }

    #[test]
    fn f32_eligibility_rule() {
        assert!(f32_eligible(0.0));
        assert!(f32_eligible(-0.0));
        assert!(f32_eligible(f64::INFINITY));
        assert!(f32_eligible(f64::NAN));
        assert!(f32_eligible(150.0));
        assert!(f32_eligible(1.5));
        // 0.1 has a full-width mantissa
        assert!(!f32_eligible(0.1));
        // exponent out of f32 range
        assert!(!f32_eligible(1e300));
    }

    #[test]
    fn real_width_selection_follows_eligibility() {
        let buf = Tokenizer::new(b"? 1.5E2").tokenize().unwrap();
        assert_eq!(buf.as_slice()[2], numlit_type_byte(NumBase::Dec, NumWidth::F32));

        let buf = Tokenizer::new(b"? 0.1").tokenize().unwrap();
        assert_eq!(buf.as_slice()[2], numlit_type_byte(NumBase::Dec, NumWidth::F64));
    }
}
