//! Recursive-descent expression evaluator.
//!
//! Walks the token stream directly, one precedence level per function.
//! Operators mutate the left slot in place and consume the right one;
//! constants produce owned slots, variable reads produce borrowed copies.
//! Mixed Int/Real operands are promoted (softly, or hard for `**`) and
//! bitwise/shift operators demote Reals first.

use super::Interpreter;
use crate::consts::MAX_EVAL_DEPTH;
use crate::error::BasicError;
use crate::keywords::Keywords;
use crate::scanner::TokenScanner;
use crate::value::{demote, promote_hard, promote_soft};
use crate::value::{FuncArg, FuncVal, Handler, Value, ValueType};
use priamos_tokens::*;

use std::io::Write;

/// One element of an evaluation result list.
#[derive(Debug)]
pub(crate) struct ExprSlot {
    /// The value itself.
    pub value: Value,
    /// Whether the slot owns a computed temporary (`true`) or carries a copy
    /// borrowed from the variable store (`false`).
    pub owned: bool,
}

impl ExprSlot {
    pub(crate) fn owned(value: Value) -> Self {
        Self { value, owned: true }
    }

    pub(crate) fn borrowed(value: Value) -> Self {
        Self {
            value,
            owned: false,
        }
    }
}

bitflags::bitflags! {
    /// Identifier classification inferred from trailing sigils or from the
    /// declared value.
    pub(crate) struct IdentFlags: u8 {
        /// `$`: string-typed.
        const STR = 0b0001;
        /// `%`: integer-typed.
        const INT = 0b0010;
        /// `(`: array reference.
        const ARRAY = 0b0100;
        /// `(`: function reference.
        const FUNC = 0b1000;
    }
}

/// Sigil facts of a tokenized identifier.
pub(crate) fn ident_flags(name: &[u8]) -> IdentFlags {
    let mut flags = IdentFlags::empty();
    let mut end = name.len();
    if end > 0 && name[end - 1] == b'(' {
        flags |= IdentFlags::ARRAY | IdentFlags::FUNC;
        end -= 1;
    }
    if end > 0 && name[end - 1] == b'$' {
        flags |= IdentFlags::STR;
    } else if end > 0 && name[end - 1] == b'%' {
        flags |= IdentFlags::INT;
    }
    flags
}

/// The scalar type an undeclared identifier auto-declares with.
pub(crate) fn auto_declare_type(flags: IdentFlags) -> ValueType {
    if flags.contains(IdentFlags::STR) {
        ValueType::Str
    } else if flags.contains(IdentFlags::INT) {
        ValueType::Int
    } else {
        ValueType::Real
    }
}

impl<W: Write> Interpreter<W> {
    fn enter_depth(&mut self) -> Result<(), BasicError> {
        if self.depth >= MAX_EVAL_DEPTH {
            return Err(BasicError::OutOfMemory);
        }
        self.depth += 1;
        Ok(())
    }

    /// `expr { ',' expr }`
    pub(crate) fn eval_expr_list(
        &mut self,
        scan: &mut TokenScanner<'_>,
    ) -> Result<Vec<ExprSlot>, BasicError> {
        let mut slots = vec![self.eval_expr(scan)?];
        while scan.tok_type() == T_COMMA {
            scan.skip_token();
            slots.push(self.eval_expr(scan)?);
        }
        Ok(slots)
    }

    /// Evaluate one expression.
    pub(crate) fn eval_expr(
        &mut self,
        scan: &mut TokenScanner<'_>,
    ) -> Result<ExprSlot, BasicError> {
        self.eval_or(scan)
    }

    fn eval_or(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_and(scan)?;
        loop {
            let op = scan.tok_type();
            if !matches!(op, OP_OR | OP_XOR | OP_NOR | OP_XNOR) {
                return Ok(lhs);
            }
            scan.skip_token();
            let mut rhs = self.eval_and(scan)?;
            demote(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
    }

    fn eval_and(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_base(scan)?;
        loop {
            let op = scan.tok_type();
            if !matches!(op, OP_AND | OP_NAND) {
                return Ok(lhs);
            }
            scan.skip_token();
            let mut rhs = self.eval_base(scan)?;
            demote(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
    }

    /// `base-expr := num-expr | str-expr`, chosen by lookahead.
    fn eval_base(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        if self.starts_string_expr(scan) {
            self.eval_str_cmp(scan)
        } else {
            self.eval_num_cmp(scan)
        }
    }

    /// Whether the upcoming operand is string-typed.
    fn starts_string_expr(&self, scan: &TokenScanner<'_>) -> bool {
        let mut look = *scan;
        if look.tok_type() == MD_FN {
            look.skip_token();
        }
        match look.tok_type() {
            T_STRLIT => true,
            T_IDENT => look
                .get_text()
                .is_some_and(|name| ident_flags(name).contains(IdentFlags::STR)),
            tok if is_function_keyword(tok) => Keywords::get()
                .lookup_by_code(tok)
                .is_some_and(|text| ident_flags(text.as_bytes()).contains(IdentFlags::STR)),
            _ => false,
        }
    }

    fn eval_num_cmp(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_shift(scan)?;
        let op = scan.tok_type();
        if matches!(op, T_EQ | OP_NE | T_LT | T_GT | OP_LE | OP_GE) {
            scan.skip_token();
            let mut rhs = self.eval_shift(scan)?;
            promote_soft(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
        Ok(lhs)
    }

    fn eval_shift(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_add(scan)?;
        let op = scan.tok_type();
        if matches!(op, OP_SHL | OP_SHR) {
            scan.skip_token();
            let mut rhs = self.eval_add(scan)?;
            demote(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
        Ok(lhs)
    }

    fn eval_add(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_pow(scan)?;
        loop {
            let op = scan.tok_type();
            if !matches!(op, T_PLUS | T_MINUS) {
                return Ok(lhs);
            }
            scan.skip_token();
            let mut rhs = self.eval_pow(scan)?;
            promote_soft(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
    }

    fn eval_pow(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_mult(scan)?;
        loop {
            if scan.tok_type() != OP_POW {
                return Ok(lhs);
            }
            scan.skip_token();
            let mut rhs = self.eval_mult(scan)?;
            promote_hard(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(OP_POW, &rhs.value)?;
            lhs.owned = true;
        }
    }

    fn eval_mult(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_not(scan)?;
        loop {
            let op = scan.tok_type();
            if !matches!(op, T_TIMES | T_DIV) {
                return Ok(lhs);
            }
            scan.skip_token();
            let mut rhs = self.eval_not(scan)?;
            promote_soft(&mut lhs.value, &mut rhs.value);
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
    }

    fn eval_not(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        if scan.tok_type() == OP_NOT {
            scan.skip_token();
            let mut slot = self.eval_signed(scan)?;
            // NOT complements an integer; demote a Real operand first
            if let Value::Real(v) = slot.value {
                slot.value = Value::Int(v.trunc() as i64);
            }
            slot.value.alu_unary(OP_NOT);
            slot.owned = true;
            return Ok(slot);
        }
        self.eval_signed(scan)
    }

    fn eval_signed(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let negative = match scan.tok_type() {
            T_MINUS => {
                scan.skip_token();
                true
            }
            T_PLUS => {
                scan.skip_token();
                false
            }
            _ => false,
        };
        let mut slot = self.eval_num_base(scan)?;
        if negative {
            slot.value.alu_unary(T_MINUS);
            slot.owned = true;
        }
        Ok(slot)
    }

    fn eval_num_base(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        match scan.tok_type() {
            T_NUMLIT | T_SBI => {
                let slot = if scan.is_int() {
                    ExprSlot::owned(Value::Int(
                        scan.get_int().ok_or(BasicError::InterpretError)?,
                    ))
                } else {
                    ExprSlot::owned(Value::Real(
                        scan.get_number().ok_or(BasicError::InterpretError)?,
                    ))
                };
                scan.skip_token();
                Ok(slot)
            }
            T_LPAREN => {
                scan.skip_token();
                self.enter_depth()?;
                let result = self.eval_expr(scan);
                self.depth -= 1;
                let slot = result?;
                if scan.tok_type() != T_RPAREN {
                    return Err(BasicError::SyntaxError);
                }
                scan.skip_token();
                Ok(slot)
            }
            T_STRLIT => Err(BasicError::TypeMismatch),
            T_IDENT | MD_FN => self.eval_ident(scan, false),
            tok if is_function_keyword(tok) => self.eval_ident(scan, false),
            _ => Err(BasicError::SyntaxError),
        }
    }

    fn eval_str_cmp(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_concat(scan)?;
        let op = scan.tok_type();
        if matches!(op, T_EQ | OP_NE | T_LT | T_GT | OP_LE | OP_GE) {
            scan.skip_token();
            let rhs = self.eval_concat(scan)?;
            lhs.value.alu_binary(op, &rhs.value)?;
            lhs.owned = true;
        }
        Ok(lhs)
    }

    fn eval_concat(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        let mut lhs = self.eval_str_base(scan)?;
        loop {
            if scan.tok_type() != T_PLUS {
                return Ok(lhs);
            }
            scan.skip_token();
            let rhs = self.eval_str_base(scan)?;
            lhs.value.alu_binary(T_PLUS, &rhs.value)?;
            lhs.owned = true;
        }
    }

    fn eval_str_base(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        match scan.tok_type() {
            T_STRLIT => {
                let text = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
                scan.skip_token();
                Ok(ExprSlot::owned(Value::Str(text)))
            }
            T_IDENT | MD_FN => self.eval_ident(scan, true),
            tok if is_function_keyword(tok) => self.eval_ident(scan, true),
            T_NUMLIT | T_SBI => Err(BasicError::TypeMismatch),
            _ => Err(BasicError::SyntaxError),
        }
    }

    /// `[FN] identifier [ args ]`: scalar read, array subscript or function
    /// call, with auto-declaration of unseen scalars.
    fn eval_ident(
        &mut self,
        scan: &mut TokenScanner<'_>,
        want_str: bool,
    ) -> Result<ExprSlot, BasicError> {
        let mut forced_fn = false;
        if scan.tok_type() == MD_FN {
            scan.skip_token();
            forced_fn = true;
        }

        let tok = scan.tok_type();
        let slot = if is_function_keyword(tok) {
            if tok == FN_CELLS {
                self.eval_cells(scan)?
            } else {
                let name = Keywords::get()
                    .lookup_by_code(tok)
                    .ok_or(BasicError::InterpretError)?;
                scan.skip_token();
                let func = match self.vars.find(name.as_bytes()) {
                    Some(Value::Func(f)) => f.clone(),
                    Some(_) => return Err(BasicError::TypeMismatch),
                    None => return Err(BasicError::FunctionKeywordNotImplemented),
                };
                let has_args = name.ends_with('(');
                self.call_function(scan, func, has_args)?
            }
        } else if tok == T_IDENT {
            let name = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
            scan.skip_token();
            let flags = ident_flags(&name);
            if flags.contains(IdentFlags::ARRAY) {
                match self.vars.find(&name) {
                    Some(Value::Func(f)) => {
                        let func = f.clone();
                        self.call_function(scan, func, true)?
                    }
                    Some(Value::Array(_)) if forced_fn => {
                        return Err(BasicError::FunctionNotDeclared)
                    }
                    Some(Value::Array(_)) => {
                        let args = self.eval_args(scan)?;
                        let values: Vec<Value> = args.into_iter().map(|s| s.value).collect();
                        let Some(Value::Array(array)) = self.vars.find_mut(&name) else {
                            return Err(BasicError::InterpretError);
                        };
                        ExprSlot::borrowed(array.subscript(&values)?.clone())
                    }
                    Some(_) => return Err(BasicError::TypeMismatch),
                    None if forced_fn => return Err(BasicError::FunctionNotDeclared),
                    None => return Err(BasicError::ArrayNotDimensioned),
                }
            } else if forced_fn {
                return Err(BasicError::FunctionNotDeclared);
            } else {
                match self.vars.find(&name) {
                    Some(value @ (Value::Int(_) | Value::Real(_) | Value::Str(_))) => {
                        ExprSlot::borrowed(value.clone())
                    }
                    Some(_) => return Err(BasicError::TypeMismatch),
                    None => {
                        let value = Value::default_of(auto_declare_type(flags))?;
                        self.vars.add(&name, value.clone());
                        ExprSlot::borrowed(value)
                    }
                }
            }
        } else {
            return Err(BasicError::SyntaxError);
        };

        let is_str = matches!(slot.value, Value::Str(_));
        if is_str != want_str {
            return Err(BasicError::TypeMismatch);
        }
        Ok(slot)
    }

    /// `expr-list ')'` after an identifier that consumed its own `(`.
    pub(crate) fn eval_args(
        &mut self,
        scan: &mut TokenScanner<'_>,
    ) -> Result<Vec<ExprSlot>, BasicError> {
        let args = self.eval_expr_list(scan)?;
        if scan.tok_type() != T_RPAREN {
            return Err(BasicError::SyntaxError);
        }
        scan.skip_token();
        Ok(args)
    }

    /// `CELLS( array-name )`: the live cell count of an array. A special
    /// form: its argument is an array reference, not a value.
    fn eval_cells(&mut self, scan: &mut TokenScanner<'_>) -> Result<ExprSlot, BasicError> {
        scan.skip_token(); // CELLS(
        if scan.tok_type() != T_IDENT {
            return Err(BasicError::SyntaxError);
        }
        let mut name = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
        scan.skip_token();
        // arrays are stored under their `(` sigil; accept the bare name too
        if !ident_flags(&name).contains(IdentFlags::ARRAY) {
            name.push(b'(');
        }
        if scan.tok_type() != T_RPAREN {
            return Err(BasicError::SyntaxError);
        }
        scan.skip_token();
        match self.vars.find(&name) {
            Some(Value::Array(array)) => Ok(ExprSlot::owned(Value::Int(array.filled() as i64))),
            Some(_) => Err(BasicError::TypeMismatch),
            None => Err(BasicError::ArrayNotDimensioned),
        }
    }

    /// Marshal arguments, invoke a function and collect its result.
    fn call_function(
        &mut self,
        scan: &mut TokenScanner<'_>,
        func: FuncVal,
        has_args: bool,
    ) -> Result<ExprSlot, BasicError> {
        self.enter_depth()?;
        let result = self.call_function_inner(scan, &func, has_args);
        self.depth -= 1;
        result
    }

    fn call_function_inner(
        &mut self,
        scan: &mut TokenScanner<'_>,
        func: &FuncVal,
        has_args: bool,
    ) -> Result<ExprSlot, BasicError> {
        let slots = if has_args {
            self.eval_args(scan)?
        } else {
            Vec::new()
        };
        func.check_arity(slots.len())?;

        if let Handler::DefFn { params, body } = &func.handler {
            // bind parameters over any shadowed variables, evaluate the
            // stored body, then restore the previous bindings
            let mut saved: Vec<(Vec<u8>, Option<Value>)> = Vec::new();
            for (param, slot) in params.iter().zip(slots) {
                saved.push((param.clone(), self.vars.take(param)));
                self.vars.add(param, slot.value);
            }
            let mut body_scan = TokenScanner::new(body);
            let result = self.eval_expr(&mut body_scan);
            for (param, old) in saved {
                self.vars.remove(&param);
                if let Some(value) = old {
                    self.vars.add(&param, value);
                }
            }
            return Ok(ExprSlot::owned(result?.value));
        }

        // detach the inputs into the argument object, call, and take the
        // result back
        let mut arg = FuncArg::default();
        for slot in slots {
            arg.args.push(slot.value);
        }
        func.call(&mut arg)?;
        let value = arg.results.pop().ok_or(BasicError::InterpretError)?;
        Ok(ExprSlot::owned(value))
    }
}
