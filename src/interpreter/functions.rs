//! Built-in function declarations and handlers.
//!
//! Built-ins live in the variable store under their keyword text, so the
//! evaluator resolves them exactly like user functions. Handlers receive the
//! detached argument values and append their results.

use crate::error::BasicError;
use crate::util::monotonic_time;
use crate::value::{BuiltinHandler, FuncArg, FuncKind, FuncVal, Handler, Value};
use crate::variables::Variables;
use priamos_tokens::*;

use std::cell::Cell;

struct FnDecl {
    code: u16,
    n_formal: u8,
    n_opt: u8,
    handler: BuiltinHandler,
}

const fn decl(code: u16, n_formal: u8, n_opt: u8, handler: BuiltinHandler) -> FnDecl {
    FnDecl {
        code,
        n_formal,
        n_opt,
        handler,
    }
}

const BUILTINS: &[FnDecl] = &[
    decl(FN_ASC, 1, 0, fn_asc),
    decl(FN_VAL, 1, 0, fn_val),
    decl(FN_STR_S, 1, 0, fn_str),
    decl(FN_LEFT_S, 2, 0, fn_left),
    decl(FN_RIGHT_S, 2, 0, fn_right),
    decl(FN_MID_S, 3, 1, fn_mid),
    decl(FN_BIN_S, 1, 0, fn_bin),
    decl(FN_OCT_S, 1, 0, fn_oct),
    decl(FN_DEC_S, 1, 0, fn_dec),
    decl(FN_HEX_S, 1, 0, fn_hex),
    decl(FN_SIN, 1, 0, fn_sin),
    decl(FN_COS, 1, 0, fn_cos),
    decl(FN_TAN, 1, 0, fn_tan),
    decl(FN_COT, 1, 0, fn_cot),
    decl(FN_ATN, 1, 0, fn_atn),
    decl(FN_LN, 1, 0, fn_ln),
    decl(FN_LOG, 1, 0, fn_log),
    decl(FN_LOG2, 1, 0, fn_log2),
    decl(FN_RND, 1, 0, fn_rnd),
    decl(FN_TRUE, 0, 0, fn_true),
    decl(FN_FALSE, 0, 0, fn_false),
    decl(FN_NIL, 0, 0, fn_nil),
    decl(FN_TI, 0, 0, fn_ti),
    decl(FN_TI_S, 0, 0, fn_ti_str),
];

/// Register every built-in as a `SystemBuiltin` function variable.
pub(super) fn declare_builtins(vars: &mut Variables) {
    for decl in BUILTINS {
        let name = keyword_text(decl.code).expect("every built-in is in the keyword table");
        let func = FuncVal::new(
            FuncKind::SystemBuiltin,
            decl.n_formal,
            decl.n_opt,
            1,
            false,
            Handler::Builtin(decl.handler),
        );
        vars.add(name.as_bytes(), Value::Func(func));
    }
}

fn fn_asc(arg: &mut FuncArg) -> Result<(), BasicError> {
    let b = arg.arg(0)?.get_str().first().copied().unwrap_or(0);
    arg.results.push(Value::Int(b as i64));
    Ok(())
}

fn fn_val(arg: &mut FuncArg) -> Result<(), BasicError> {
    let v = arg.arg(0)?.get_real();
    arg.results.push(Value::Real(v));
    Ok(())
}

fn fn_str(arg: &mut FuncArg) -> Result<(), BasicError> {
    let text = arg.arg(0)?.get_str().into_owned();
    arg.results.push(Value::Str(text));
    Ok(())
}

fn count_arg(arg: &FuncArg, index: usize) -> Result<usize, BasicError> {
    usize::try_from(arg.arg(index)?.get_int()).map_err(|_| BasicError::BadSubscript)
}

fn fn_left(arg: &mut FuncArg) -> Result<(), BasicError> {
    let n = count_arg(arg, 1)?;
    let text = arg.arg(0)?.get_str();
    let take = n.min(text.len());
    let out = text[..take].to_vec();
    arg.results.push(Value::Str(out));
    Ok(())
}

fn fn_right(arg: &mut FuncArg) -> Result<(), BasicError> {
    let n = count_arg(arg, 1)?;
    let text = arg.arg(0)?.get_str();
    let take = n.min(text.len());
    let out = text[text.len() - take..].to_vec();
    arg.results.push(Value::Str(out));
    Ok(())
}

fn fn_mid(arg: &mut FuncArg) -> Result<(), BasicError> {
    let pos = arg.arg(1)?.get_int();
    if pos < 1 {
        return Err(BasicError::BadSubscript);
    }
    let start = (pos - 1) as usize;
    let limit = match arg.args.get(2) {
        Some(n) => usize::try_from(n.get_int()).map_err(|_| BasicError::BadSubscript)?,
        None => usize::MAX,
    };
    let text = arg.arg(0)?.get_str();
    let out = if start >= text.len() {
        Vec::new()
    } else {
        let end = start.saturating_add(limit).min(text.len());
        text[start..end].to_vec()
    };
    arg.results.push(Value::Str(out));
    Ok(())
}

fn fn_bin(arg: &mut FuncArg) -> Result<(), BasicError> {
    let v = arg.arg(0)?.get_int();
    arg.results.push(Value::Str(format!("{v:b}").into_bytes()));
    Ok(())
}

fn fn_oct(arg: &mut FuncArg) -> Result<(), BasicError> {
    let v = arg.arg(0)?.get_int();
    arg.results.push(Value::Str(format!("{v:o}").into_bytes()));
    Ok(())
}

fn fn_dec(arg: &mut FuncArg) -> Result<(), BasicError> {
    let v = arg.arg(0)?.get_int();
    arg.results.push(Value::Str(v.to_string().into_bytes()));
    Ok(())
}

fn fn_hex(arg: &mut FuncArg) -> Result<(), BasicError> {
    let v = arg.arg(0)?.get_int();
    arg.results.push(Value::Str(format!("{v:X}").into_bytes()));
    Ok(())
}

macro_rules! real_fn {
    ($name:ident, $map:expr) => {
        fn $name(arg: &mut FuncArg) -> Result<(), BasicError> {
            let v = arg.arg(0)?.get_real();
            #[allow(clippy::redundant_closure_call)]
            arg.results.push(Value::Real(($map)(v)));
            Ok(())
        }
    };
}

real_fn!(fn_sin, f64::sin);
real_fn!(fn_cos, f64::cos);
real_fn!(fn_tan, f64::tan);
real_fn!(fn_cot, |v: f64| 1.0 / v.tan());
real_fn!(fn_atn, f64::atan);
real_fn!(fn_ln, f64::ln);
real_fn!(fn_log, f64::log10);
real_fn!(fn_log2, f64::log2);

thread_local! {
    static RND_STATE: Cell<u64> = const { Cell::new(0x9E37_79B9_7F4A_7C15) };
}

/// `RND(x)`: a real in `[0, 1)`. A negative argument reseeds the generator
/// from the argument's bit pattern.
fn fn_rnd(arg: &mut FuncArg) -> Result<(), BasicError> {
    let x = arg.arg(0)?.get_real();
    let v = RND_STATE.with(|state| {
        if x < 0.0 {
            state.set(x.to_bits() | 1);
        }
        // xorshift64*
        let mut s = state.get();
        s ^= s >> 12;
        s ^= s << 25;
        s ^= s >> 27;
        state.set(s);
        (s.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 11) as f64 / (1u64 << 53) as f64
    });
    arg.results.push(Value::Real(v));
    Ok(())
}

fn fn_true(arg: &mut FuncArg) -> Result<(), BasicError> {
    arg.results.push(Value::Int(-1));
    Ok(())
}

fn fn_false(arg: &mut FuncArg) -> Result<(), BasicError> {
    arg.results.push(Value::Int(0));
    Ok(())
}

fn fn_nil(arg: &mut FuncArg) -> Result<(), BasicError> {
    arg.results.push(Value::Str(Vec::new()));
    Ok(())
}

fn fn_ti(arg: &mut FuncArg) -> Result<(), BasicError> {
    arg.results.push(Value::Real(monotonic_time()));
    Ok(())
}

fn fn_ti_str(arg: &mut FuncArg) -> Result<(), BasicError> {
    let total = monotonic_time() as u64;
    let (h, m, s) = (total / 3600 % 24, total / 60 % 60, total % 60);
    arg.results
        .push(Value::Str(format!("{h:02}:{m:02}:{s:02}").into_bytes()));
    Ok(())
}
