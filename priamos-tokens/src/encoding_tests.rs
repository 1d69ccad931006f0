use crate::*;
use rstest::rstest;
use std::collections::{HashMap, HashSet};
use strum::IntoEnumIterator;

#[test]
fn keyword_table_has_no_duplicate_texts_or_codes() {
    let mut texts = HashSet::new();
    let mut codes = HashSet::new();
    for def in KEYWORDS {
        assert!(texts.insert(def.text), "duplicate text {:?}", def.text);
        assert!(codes.insert(def.code), "duplicate code {:#06x}", def.code);
    }
}

#[test]
fn keyword_codes_stay_inside_their_families() {
    for def in KEYWORDS {
        if def.code < 0x0100 {
            // word forms of single-byte codes
            assert!(matches!(def.code, T_PRINT | T_REM), "{:?}", def.text);
        } else {
            assert!(
                KeywordFamily::of(def.code).is_some(),
                "{:?} has no family",
                def.text
            );
        }
    }
}

#[test]
fn reserved_slots_are_not_assigned() {
    let codes: HashMap<u16, &str> = KEYWORDS.iter().map(|k| (k.code, k.text)).collect();
    for reserved in [0x0325, 0x032D, 0x0342, 0x0F0A, 0x0F0F] {
        assert!(!codes.contains_key(&reserved), "{reserved:#06x} is reserved");
    }
}

#[test]
fn function_keywords_are_classified_by_high_byte() {
    assert!(is_function_keyword(FN_ASC));
    assert!(is_function_keyword(FN_CELLS));
    assert!(!is_function_keyword(KW_LIST));
    assert!(!is_function_keyword(OP_AND));
    assert!(!is_function_keyword(T_IDENT));
}

#[test]
fn two_byte_leads_cover_exactly_the_keyword_and_error_banks() {
    for family in KeywordFamily::iter() {
        assert!(is_two_byte_lead(family as u8));
    }
    assert!(is_two_byte_lead(0xFF));
    for lead in [0x00, 0x05, 0x07, 0x08, 0x09, 0x0C, 0x11, 0x2B, 0x3F, 0x7D] {
        assert!(!is_two_byte_lead(lead), "{lead:#04x}");
    }
}

#[rstest]
#[case(NumBase::Bin, NumWidth::I8, 0x20)]
#[case(NumBase::Dec, NumWidth::I16, 0x41)]
#[case(NumBase::Hex, NumWidth::I32, 0x82)]
#[case(NumBase::Oct, NumWidth::I64, 0xF3)]
#[case(NumBase::Dec, NumWidth::F32, 0x4E)]
#[case(NumBase::Dec, NumWidth::F64, 0x4F)]
fn numlit_type_byte_round_trip(
    #[case] base: NumBase,
    #[case] width: NumWidth,
    #[case] expected: u8,
) {
    let byte = numlit_type_byte(base, width);
    assert_eq!(byte, expected);
    assert_eq!(split_numlit_type_byte(byte), Some((base, width)));
}

#[test]
fn numlit_type_byte_rejects_invalid_nibbles() {
    assert_eq!(split_numlit_type_byte(0x10), None); // bad base nibble
    assert_eq!(split_numlit_type_byte(0x44), None); // bad width nibble
}

#[rstest]
#[case(0, NumWidth::I8)]
#[case(127, NumWidth::I8)]
#[case(-128, NumWidth::I8)]
#[case(128, NumWidth::I16)]
#[case(-129, NumWidth::I16)]
#[case(32767, NumWidth::I16)]
#[case(32768, NumWidth::I32)]
#[case(i32::MAX as i64, NumWidth::I32)]
#[case(i32::MAX as i64 + 1, NumWidth::I64)]
#[case(i64::MIN, NumWidth::I64)]
fn narrowest_int_width(#[case] value: i64, #[case] expected: NumWidth) {
    assert_eq!(NumWidth::narrowest_int(value), expected);
}

#[test]
fn payload_lengths_match_widths() {
    let expected = [
        (NumWidth::I8, 1),
        (NumWidth::I16, 2),
        (NumWidth::I32, 4),
        (NumWidth::I64, 8),
        (NumWidth::F32, 4),
        (NumWidth::F64, 8),
    ];
    for (width, len) in expected {
        assert_eq!(width.payload_len(), len);
    }
}
