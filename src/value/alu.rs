//! Typed ALU over [`Value`]s.
//!
//! Operators mutate the left operand in place; the right operand is read
//! through the cross-type getters, so an `Int × Int` op sees its argument as
//! an integer regardless of how it is stored. Comparisons produce the BASIC
//! truth values −1 and 0.

use super::Value;
use crate::error::BasicError;
use priamos_tokens::*;

impl Value {
    /// Unary operation in place. Unknown operators leave the value alone.
    pub fn alu_unary(&mut self, op: u16) {
        match self {
            Self::Int(v) => match op {
                T_MINUS => *v = v.wrapping_neg(),
                OP_NOT => *v = !*v,
                _ => {}
            },
            Self::Real(v) => {
                if op == T_MINUS {
                    *v = -*v;
                }
            }
            _ => {}
        }
    }

    /// Binary operation in place, `self = self op rhs`.
    pub fn alu_binary(&mut self, op: u16, rhs: &Value) -> Result<(), BasicError> {
        match self {
            Self::Int(_) => self.int_binary(op, rhs),
            Self::Real(_) => self.real_binary(op, rhs),
            Self::Str(_) => self.str_binary(op, rhs),
            _ => Ok(()),
        }
    }

    fn int_binary(&mut self, op: u16, rhs: &Value) -> Result<(), BasicError> {
        let Self::Int(value) = self else {
            return Ok(());
        };
        let value2 = rhs.get_int();
        match op {
            T_TIMES => *value = value.wrapping_mul(value2),
            T_DIV => {
                if value2 == 0 {
                    return Err(BasicError::DivisionByZero);
                }
                *value = value.wrapping_div(value2);
            }
            T_PLUS => *value = value.wrapping_add(value2),
            T_MINUS => *value = value.wrapping_sub(value2),
            OP_SHL => {
                *value = match u32::try_from(value2) {
                    Ok(n) if n < 64 => *value << n,
                    _ => 0,
                }
            }
            OP_SHR => {
                // arithmetic shift; oversized counts keep the sign
                *value = match u32::try_from(value2) {
                    Ok(n) if n < 64 => *value >> n,
                    _ => *value >> 63,
                }
            }
            T_EQ => *value = truth(*value == value2),
            OP_NE => *value = truth(*value != value2),
            T_LT => *value = truth(*value < value2),
            T_GT => *value = truth(*value > value2),
            OP_LE => *value = truth(*value <= value2),
            OP_GE => *value = truth(*value >= value2),
            OP_AND => *value &= value2,
            OP_NAND => *value = !(*value & value2),
            OP_OR => *value |= value2,
            OP_NOR => *value = !(*value | value2),
            OP_XOR => *value ^= value2,
            OP_XNOR => *value = !(*value ^ value2),
            _ => {}
        }
        Ok(())
    }

    fn real_binary(&mut self, op: u16, rhs: &Value) -> Result<(), BasicError> {
        let Self::Real(value) = self else {
            return Ok(());
        };
        let value2 = rhs.get_real();
        match op {
            T_TIMES => *value *= value2,
            T_DIV => {
                if value2 == 0.0 {
                    return Err(BasicError::DivisionByZero);
                }
                *value /= value2;
            }
            OP_POW => *value = value.powf(value2),
            T_PLUS => *value += value2,
            T_MINUS => *value -= value2,
            T_EQ => *value = truth(*value == value2) as f64,
            OP_NE => *value = truth(*value != value2) as f64,
            T_LT => *value = truth(*value < value2) as f64,
            T_GT => *value = truth(*value > value2) as f64,
            OP_LE => *value = truth(*value <= value2) as f64,
            OP_GE => *value = truth(*value >= value2) as f64,
            _ => {}
        }
        Ok(())
    }

    fn str_binary(&mut self, op: u16, rhs: &Value) -> Result<(), BasicError> {
        let Self::Str(text) = self else {
            return Ok(());
        };
        let text2 = rhs.get_str();
        if op == T_PLUS {
            text.extend_from_slice(&text2);
            return Ok(());
        }
        if !matches!(op, T_EQ | OP_NE | T_LT | T_GT | OP_LE | OP_GE) {
            return Ok(());
        }
        // byte-wise compare; a shared prefix ranks the shorter string first
        let ordering = text.as_slice().cmp(text2.as_ref());
        let result = match op {
            T_EQ => ordering.is_eq(),
            OP_NE => ordering.is_ne(),
            T_LT => ordering.is_lt(),
            T_GT => ordering.is_gt(),
            OP_LE => ordering.is_le(),
            OP_GE => ordering.is_ge(),
            _ => unreachable!(),
        };
        // comparisons convert the receiver to an integer truth value
        *self = Value::Int(truth(result));
        Ok(())
    }
}

const fn truth(b: bool) -> i64 {
    if b {
        -1
    } else {
        0
    }
}

/// Soft promotion: for mixed Int/Real operands, upgrade the Int side.
pub fn promote_soft(lhs: &mut Value, rhs: &mut Value) {
    match (&*lhs, &*rhs) {
        (Value::Int(v), Value::Real(_)) => {
            let v = *v;
            *lhs = Value::Real(v as f64);
        }
        (Value::Real(_), Value::Int(v)) => {
            let v = *v;
            *rhs = Value::Real(v as f64);
        }
        _ => {}
    }
}

/// Hard promotion (for `**`): upgrade both numeric operands to Real.
pub fn promote_hard(lhs: &mut Value, rhs: &mut Value) {
    for v in [lhs, rhs] {
        if let Value::Int(i) = *v {
            *v = Value::Real(i as f64);
        }
    }
}

/// Demotion for bitwise and shift operators: truncate Reals to Ints.
pub fn demote(lhs: &mut Value, rhs: &mut Value) {
    for v in [lhs, rhs] {
        if let Value::Real(r) = *v {
            *v = Value::Int(r.trunc() as i64);
        }
    }
}
