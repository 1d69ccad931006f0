use priamos_basic::prelude::*;
use priamos_tokens::{numlit_type_byte, T_EOL, T_LINENO, T_NUMLIT, T_SBI};
use quickcheck_macros::quickcheck;
use rstest::rstest;

fn tokenize(src: &str) -> Vec<u8> {
    Tokenizer::new(src.as_bytes())
        .tokenize()
        .expect("input tokenizes")
        .as_slice()
        .to_vec()
}

/// Scanner over the first token after a `?` guard that suppresses LINENO
/// promotion.
fn scan_literal(literal: &str) -> Vec<u8> {
    tokenize(&format!("? {literal}"))[1..].to_vec()
}

#[quickcheck]
fn integer_literals_round_trip_across_bases(v: i64) -> bool {
    let v = v.checked_abs().unwrap_or(i64::MAX);
    for literal in [
        format!("{v}"),
        format!("${v:X}"),
        format!("@{v:o}"),
        format!("%{v:b}"),
    ] {
        let bytes = scan_literal(&literal);
        let scan = TokenScanner::new(&bytes);
        if !scan.is_int() || scan.get_int() != Some(v) {
            return false;
        }
        if scan.get_number() != Some(v as f64) {
            return false;
        }
    }
    true
}

#[quickcheck]
fn skip_token_advances_by_the_encoded_length(values: Vec<i32>) -> bool {
    let line = values
        .iter()
        .map(|v| v.unsigned_abs().to_string())
        .collect::<Vec<_>>()
        .join(" + ");
    let bytes = tokenize(&format!("? {line}"));
    let mut scan = TokenScanner::new(&bytes);
    let mut advanced = 0usize;
    while scan.tok_type() != T_EOL {
        let before = scan.get_pos();
        if !scan.skip_token() {
            return false;
        }
        advanced += scan.get_pos() - before;
    }
    // everything but the terminating EOL byte is covered by token spans
    advanced == bytes.len() - 1
}

#[quickcheck]
fn detokenized_integers_retokenize_to_the_same_value(v: i64) -> bool {
    let v = v.checked_abs().unwrap_or(i64::MAX);
    let bytes = scan_literal(&format!("${v:X}"));
    let text = Detokenizer::new(&bytes).detokenize().expect("detokenizes");
    let text = String::from_utf8(text).expect("ascii");
    // textually lossy in base, numerically exact
    let again = scan_literal(&text);
    TokenScanner::new(&again).get_int() == Some(v)
}

#[quickcheck]
fn sbi_iff_decimal_in_byte_range(v: i16) -> bool {
    let v = v.unsigned_abs().min(32767) as i64;
    let bytes = scan_literal(&v.to_string());
    let is_sbi = bytes[0] == T_SBI as u8;
    is_sbi == (v <= 127)
}

#[test]
fn hex_literals_never_use_sbi() {
    let bytes = scan_literal("$05");
    assert_eq!(bytes[0], T_NUMLIT as u8);
    assert_eq!(bytes[1], numlit_type_byte(NumBase::Hex, NumWidth::I8));
    assert_eq!(bytes[2], 5);
}

#[rstest]
#[case("127", NumWidth::I8)]
#[case("128", NumWidth::I16)]
#[case("32767", NumWidth::I16)]
#[case("32768", NumWidth::I32)]
#[case("2147483647", NumWidth::I32)]
#[case("2147483648", NumWidth::I64)]
fn narrowest_integer_width_is_chosen(#[case] literal: &str, #[case] width: NumWidth) {
    // SBI shortcut only applies below 128, so 127 needs a non-decimal base
    let bytes = scan_literal(&format!("${:X}", literal.parse::<i64>().unwrap()));
    assert_eq!(bytes[0], T_NUMLIT as u8);
    assert_eq!(bytes[1], numlit_type_byte(NumBase::Hex, width));
}

#[test]
fn lineno_promotion_caps_at_24_bits() {
    let bytes = tokenize("16777215 END");
    assert_eq!(bytes[0], T_LINENO as u8);
    assert_eq!(&bytes[1..4], &[0xFF, 0xFF, 0xFF]);

    let bytes = tokenize("16777216 END");
    assert_eq!(bytes[0], T_NUMLIT as u8);
}

#[test]
fn exactly_representable_reals_select_f32() {
    // 150.0: exponent in range, low 29 mantissa bits clear
    let bytes = scan_literal("1.5E2");
    assert_eq!(bytes[1], numlit_type_byte(NumBase::Dec, NumWidth::F32));
    let scan = TokenScanner::new(&bytes);
    assert_eq!(scan.get_number(), Some(150.0));
    assert!(!scan.is_int());
}

#[quickcheck]
fn small_dyadic_reals_select_f32_exactly(m: i16, shift: u8) -> bool {
    let shift = (shift % 24) as i32;
    let v = (m as f64).abs() / f64::powi(2.0, shift);
    let text = format!("{v}");
    if !text.contains(['.', 'e']) {
        return true; // integral rendering tokenizes as an integer
    }
    let bytes = scan_literal(&text);
    bytes[1] == numlit_type_byte(NumBase::Dec, NumWidth::F32)
        && TokenScanner::new(&bytes).get_number() == Some(v)
}

#[test]
fn wide_mantissa_reals_select_f64() {
    let v = (1u64 << 40) as f64 + 1.0;
    let bytes = scan_literal(&format!("{v}"));
    assert_eq!(bytes[1], numlit_type_byte(NumBase::Dec, NumWidth::F64));
    assert_eq!(TokenScanner::new(&bytes).get_number(), Some(v));

    let bytes = scan_literal("0.1");
    assert_eq!(bytes[1], numlit_type_byte(NumBase::Dec, NumWidth::F64));
    assert_eq!(TokenScanner::new(&bytes).get_number(), Some(0.1));
}

#[rstest]
#[case("1E")]
#[case("1E+")]
#[case("$1P-")]
fn exponents_without_digits_are_bad_numbers(#[case] literal: &str) {
    let result = Tokenizer::new(format!("? {literal}").as_bytes()).tokenize();
    assert_eq!(result.unwrap_err(), TokenError::BadNumber);
}

#[test]
fn binary_literals_use_p_exponents_only() {
    // E is not a binary exponent letter, so %1E1 is a literal then an ident
    let bytes = tokenize("? %1E1");
    assert_eq!(bytes[1], T_NUMLIT as u8);
    assert_eq!(bytes[2], numlit_type_byte(NumBase::Bin, NumWidth::I8));
    assert_eq!(bytes[3], 1);
    assert_eq!(bytes[4], priamos_tokens::T_IDENT as u8);
}

#[test]
fn error_codes_survive_the_u16_interface() {
    assert_eq!(
        Tokenizer::new(b"\"open").tokenize().unwrap_err(),
        TokenError::StringNotTerminated
    );
    assert_eq!(
        Tokenizer::new(b"~").tokenize().unwrap_err(),
        TokenError::SyntaxError
    );
    assert_eq!(
        Tokenizer::new(b"9223372036854775808").tokenize().unwrap_err(),
        TokenError::BadNumber
    );
}
