//! Polymorphic value model: scalars, arrays and functions.
//!
//! Values form a tagged sum with cross-type reads and writes; the coercion
//! rules are part of the language contract (string comparisons yield BASIC
//! truth values, string→number conversion goes through the tokenizer).

use crate::error::BasicError;
use crate::tokenizer::Tokenizer;
use crate::util::format_real;
use priamos_tokens::{T_MINUS, T_NUMLIT, T_PLUS};

use std::borrow::Cow;

mod alu;
mod array;
mod func;

pub use alu::{demote, promote_hard, promote_soft};
pub use array::{ArrayKind, ArrayVal};
pub use func::{BuiltinHandler, FuncArg, FuncKind, FuncVal, Handler};

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Signed 64-bit integer.
    Int,
    /// IEEE-754 binary64.
    Real,
    /// Byte string.
    Str,
    /// Static, dynamic or associative array.
    Array,
    /// Built-in or user-defined function.
    Func,
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE-754 binary64.
    Real(f64),
    /// Owned byte string.
    Str(Vec<u8>),
    /// Array value.
    Array(ArrayVal),
    /// Function value.
    Func(FuncVal),
}

impl Value {
    /// The value's type tag.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Real(_) => ValueType::Real,
            Self::Str(_) => ValueType::Str,
            Self::Array(_) => ValueType::Array,
            Self::Func(_) => ValueType::Func,
        }
    }

    /// Empty value of a scalar type: 0, 0.0 or `""`. Arrays and functions
    /// have their own constructors and are rejected here.
    pub fn default_of(vt: ValueType) -> Result<Self, BasicError> {
        match vt {
            ValueType::Int => Ok(Self::Int(0)),
            ValueType::Real => Ok(Self::Real(0.0)),
            ValueType::Str => Ok(Self::Str(Vec::new())),
            ValueType::Array | ValueType::Func => Err(BasicError::ArrayTypeImpossible),
        }
    }

    /// The value read as an integer, truncating toward zero.
    pub fn get_int(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            Self::Real(v) => v.trunc() as i64,
            Self::Str(bytes) => {
                let (is_int, ival, rval) = parse_number(bytes);
                if is_int {
                    ival
                } else {
                    rval.trunc() as i64
                }
            }
            _ => 0,
        }
    }

    /// The value read as a real.
    pub fn get_real(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Real(v) => *v,
            Self::Str(bytes) => {
                let (is_int, ival, rval) = parse_number(bytes);
                if is_int {
                    ival as f64
                } else {
                    rval
                }
            }
            _ => 0.0,
        }
    }

    /// The value read as text. Strings lend their bytes, numbers allocate
    /// their formatted rendering.
    pub fn get_str(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Int(v) => Cow::Owned(v.to_string().into_bytes()),
            Self::Real(v) => Cow::Owned(format_real(*v).into_bytes()),
            Self::Str(bytes) => Cow::Borrowed(bytes),
            _ => Cow::Borrowed(&[]),
        }
    }

    /// Store an integer, coercing per the value's type. Arrays and
    /// functions ignore scalar writes.
    pub fn set_int(&mut self, value: i64) {
        match self {
            Self::Int(v) => *v = value,
            Self::Real(v) => *v = value as f64,
            Self::Str(bytes) => *bytes = value.to_string().into_bytes(),
            _ => {}
        }
    }

    /// Store a real, coercing per the value's type.
    pub fn set_real(&mut self, value: f64) {
        match self {
            Self::Int(v) => *v = value.trunc() as i64,
            Self::Real(v) => *v = value,
            Self::Str(bytes) => *bytes = format_real(value).into_bytes(),
            _ => {}
        }
    }

    /// Store text, coercing per the value's type. Numeric targets parse the
    /// text the way the tokenizer would.
    pub fn set_str(&mut self, bytes: Cow<'_, [u8]>) {
        match self {
            Self::Int(v) => {
                let (is_int, ival, rval) = parse_number(&bytes);
                *v = if is_int { ival } else { rval.trunc() as i64 };
            }
            Self::Real(v) => {
                let (is_int, ival, rval) = parse_number(&bytes);
                *v = if is_int { ival as f64 } else { rval };
            }
            Self::Str(text) => *text = bytes.into_owned(),
            _ => {}
        }
    }

    /// Assign across base types: string ← string only, int/real ← int/real.
    /// Everything else is a type mismatch.
    pub fn assign_base_type(&mut self, src: &Value) -> Result<(), BasicError> {
        match (self.value_type(), src.value_type()) {
            (ValueType::Str, ValueType::Str) => {
                self.set_str(src.get_str());
                Ok(())
            }
            (ValueType::Int, ValueType::Int | ValueType::Real) => {
                self.set_int(src.get_int());
                Ok(())
            }
            (ValueType::Real, ValueType::Int | ValueType::Real) => {
                self.set_real(src.get_real());
                Ok(())
            }
            _ => Err(BasicError::TypeMismatch),
        }
    }
}

/// Parse leading numeric text the way the original string→number coercion
/// does: optional sign, then a numeric literal; anything else reads as zero.
fn parse_number(bytes: &[u8]) -> (bool, i64, f64) {
    let mut t = Tokenizer::new(bytes);
    let mut tok = t.next_token();
    let mut negative = false;
    if tok == T_MINUS {
        negative = true;
        tok = t.next_token();
    } else if tok == T_PLUS {
        tok = t.next_token();
    }
    if tok != T_NUMLIT {
        return (true, 0, 0.0);
    }
    let num = t.num();
    if num.is_int {
        let v = if negative {
            num.ival.wrapping_neg()
        } else {
            num.ival
        };
        (true, v, 0.0)
    } else {
        let v = if negative { -num.rval } else { num.rval };
        (false, 0, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_matrix() {
        assert_eq!(Value::Int(42).get_real(), 42.0);
        assert_eq!(Value::Int(42).get_str().as_ref(), b"42");
        assert_eq!(Value::Real(-2.75).get_int(), -2);
        assert_eq!(Value::Real(1.5).get_str().as_ref(), b"1.5");
        assert_eq!(Value::Str(b"123".to_vec()).get_int(), 123);
        assert_eq!(Value::Str(b"-47".to_vec()).get_int(), -47);
        assert_eq!(Value::Str(b"+1.5".to_vec()).get_real(), 1.5);
        assert_eq!(Value::Str(b"$FF".to_vec()).get_int(), 255);
        assert_eq!(Value::Str(b"junk".to_vec()).get_int(), 0);
        assert_eq!(Value::Str(b"".to_vec()).get_real(), 0.0);
    }

    #[test]
    fn set_str_parses_numbers() {
        let mut v = Value::Int(0);
        v.set_str(Cow::Borrowed(b"99"));
        assert_eq!(v.get_int(), 99);
        v.set_str(Cow::Borrowed(b"2.9"));
        assert_eq!(v.get_int(), 2);

        let mut v = Value::Real(0.0);
        v.set_str(Cow::Borrowed(b"-1.25"));
        assert_eq!(v.get_real(), -1.25);
    }

    #[test]
    fn assign_base_type_rules() {
        let mut s = Value::Str(Vec::new());
        s.assign_base_type(&Value::Str(b"abc".to_vec())).unwrap();
        assert_eq!(s.get_str().as_ref(), b"abc");
        assert_eq!(
            s.assign_base_type(&Value::Int(1)),
            Err(BasicError::TypeMismatch)
        );

        let mut i = Value::Int(0);
        i.assign_base_type(&Value::Real(7.9)).unwrap();
        assert_eq!(i.get_int(), 7);
        assert_eq!(
            i.assign_base_type(&Value::Str(b"1".to_vec())),
            Err(BasicError::TypeMismatch)
        );

        let mut r = Value::Real(0.0);
        r.assign_base_type(&Value::Int(3)).unwrap();
        assert_eq!(r.get_real(), 3.0);
    }

    #[test]
    fn default_of_rejects_composite_types() {
        assert!(Value::default_of(ValueType::Int).is_ok());
        assert!(Value::default_of(ValueType::Array).is_err());
        assert!(Value::default_of(ValueType::Func).is_err());
    }
}
