//! Statement handlers bound in the command dispatch table.

use super::expr::{auto_declare_type, ident_flags, IdentFlags};
use super::{functions, Interpreter};
use crate::detokenizer::Detokenizer;
use crate::error::{BasicError, InterpreterError};
use crate::scanner::TokenScanner;
use crate::value::{ArrayKind, ArrayVal, FuncKind, FuncVal, Handler, Value};
use itertools::Itertools;
use priamos_tokens::*;

use std::io::Write;
use std::rc::Rc;
use tracing::debug;

/// A resolved assignment target.
#[derive(Debug)]
enum Place {
    /// Scalar variable, auto-declared on first assignment.
    Scalar(Vec<u8>),
    /// Array cell; subscript arguments are evaluated at parse time.
    Cell { name: Vec<u8>, args: Vec<Value> },
    /// String-slice target (`LEFT$(`/`RIGHT$(`/`MID$(` lvalue forms).
    Slice {
        name: Vec<u8>,
        op: u16,
        args: Vec<Value>,
    },
}

impl<W: Write> Interpreter<W> {
    pub(super) fn cmd_nop(&mut self, _scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        Ok(())
    }

    pub(super) fn cmd_end(&mut self, _scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        self.halted = true;
        Ok(())
    }

    /// `LET`. The keyword is optional sugar; the dispatcher funnels
    /// identifier-led statements here directly.
    pub(super) fn cmd_let(&mut self, scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        self.cmd_assign(scan)
    }

    /// `lvalue-list '=' expr-list`
    pub(super) fn cmd_assign(
        &mut self,
        scan: &mut TokenScanner<'_>,
    ) -> Result<(), InterpreterError> {
        let mut places = vec![self.parse_lvalue(scan)?];
        while scan.tok_type() == T_COMMA {
            scan.skip_token();
            places.push(self.parse_lvalue(scan)?);
        }
        if scan.tok_type() != T_EQ {
            return Err(BasicError::SyntaxError.into());
        }
        scan.skip_token();

        let slots = self.eval_expr_list(scan)?;
        if slots.len() != places.len() {
            return Err(BasicError::PairingMismatch.into());
        }
        for (place, slot) in places.into_iter().zip(slots) {
            self.assign_place(place, slot.value)?;
        }
        Ok(())
    }

    fn parse_lvalue(&mut self, scan: &mut TokenScanner<'_>) -> Result<Place, BasicError> {
        let tok = scan.tok_type();
        if matches!(tok, FN_LEFT_S | FN_RIGHT_S | FN_MID_S) {
            scan.skip_token();
            if scan.tok_type() != T_IDENT {
                return Err(BasicError::SyntaxError);
            }
            let name = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
            scan.skip_token();
            if scan.tok_type() != T_COMMA {
                return Err(BasicError::SyntaxError);
            }
            scan.skip_token();
            let args = self
                .eval_args(scan)?
                .into_iter()
                .map(|slot| slot.value)
                .collect();
            return Ok(Place::Slice { name, op: tok, args });
        }
        if is_function_keyword(tok) {
            // only the string-slicing built-ins may be assigned to
            return Err(BasicError::TypeMismatch);
        }
        if tok != T_IDENT {
            return Err(BasicError::SyntaxError);
        }
        let name = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
        scan.skip_token();
        if ident_flags(&name).contains(IdentFlags::ARRAY) {
            let args = self
                .eval_args(scan)?
                .into_iter()
                .map(|slot| slot.value)
                .collect();
            Ok(Place::Cell { name, args })
        } else {
            Ok(Place::Scalar(name))
        }
    }

    fn assign_place(&mut self, place: Place, value: Value) -> Result<(), BasicError> {
        match place {
            Place::Scalar(name) => match self.vars.find_mut(&name) {
                Some(target @ (Value::Int(_) | Value::Real(_) | Value::Str(_))) => {
                    target.assign_base_type(&value)
                }
                Some(_) => Err(BasicError::TypeMismatch),
                None => {
                    // auto-declare; nothing is stored if the types clash
                    let mut target = Value::default_of(auto_declare_type(ident_flags(&name)))?;
                    target.assign_base_type(&value)?;
                    self.vars.add(&name, target);
                    Ok(())
                }
            },
            Place::Cell { name, args } => match self.vars.find_mut(&name) {
                Some(Value::Array(array)) => array.subscript(&args)?.assign_base_type(&value),
                Some(_) => Err(BasicError::TypeMismatch),
                None => Err(BasicError::ArrayNotDimensioned),
            },
            Place::Slice { name, op, args } => self.assign_slice(&name, op, &args, &value),
        }
    }

    /// Splice `value` into a string variable without changing its length.
    fn assign_slice(
        &mut self,
        name: &[u8],
        op: u16,
        args: &[Value],
        value: &Value,
    ) -> Result<(), BasicError> {
        let Value::Str(_) = value else {
            return Err(BasicError::TypeMismatch);
        };
        let src = value.get_str().into_owned();
        let Some(Value::Str(target)) = self.vars.find_mut(name) else {
            return Err(BasicError::TypeMismatch);
        };
        let len = target.len();
        match op {
            FN_LEFT_S => {
                let n = usize::try_from(args[0].get_int()).map_err(|_| BasicError::BadSubscript)?;
                let count = n.min(len).min(src.len());
                target[..count].copy_from_slice(&src[..count]);
            }
            FN_RIGHT_S => {
                let n = usize::try_from(args[0].get_int()).map_err(|_| BasicError::BadSubscript)?;
                let count = n.min(len).min(src.len());
                target[len - count..].copy_from_slice(&src[..count]);
            }
            FN_MID_S => {
                let pos = args[0].get_int();
                if pos < 1 {
                    return Err(BasicError::BadSubscript);
                }
                let start = (pos - 1) as usize;
                if start >= len {
                    return Ok(());
                }
                let limit = match args.get(1) {
                    Some(n) => {
                        usize::try_from(n.get_int()).map_err(|_| BasicError::BadSubscript)?
                    }
                    None => src.len(),
                };
                let count = limit.min(src.len()).min(len - start);
                target[start..start + count].copy_from_slice(&src[..count]);
            }
            _ => return Err(BasicError::InterpretError),
        }
        Ok(())
    }

    /// `PRINT` / `?`. `;` juxtaposes, `,` tabs, a trailing separator
    /// suppresses the newline.
    pub(super) fn cmd_print(
        &mut self,
        scan: &mut TokenScanner<'_>,
    ) -> Result<(), InterpreterError> {
        let mut newline = true;
        loop {
            let tok = scan.tok_type();
            if tok == T_EOL || tok == T_COLON {
                break;
            }
            let slot = self.eval_expr(scan)?;
            let text = slot.value.get_str().into_owned();
            self.out.write_all(&text)?;
            newline = true;
            match scan.tok_type() {
                T_SEMIC => {
                    scan.skip_token();
                    newline = false;
                }
                T_COMMA => {
                    scan.skip_token();
                    self.out.write_all(b"\t")?;
                    newline = false;
                }
                _ => {}
            }
        }
        if newline {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// A line number argument: an explicit `LINENO` token or an integer
    /// literal in line-number range.
    fn get_line_no(scan: &mut TokenScanner<'_>) -> Option<u32> {
        if let Some(line_no) = scan.get_line_no() {
            scan.skip_token();
            return Some(line_no);
        }
        if scan.is_int() {
            let v = scan.get_int()?;
            if (0..=crate::consts::MAX_LINE_NUMBER as i64).contains(&v) {
                scan.skip_token();
                return Some(v as u32);
            }
        }
        None
    }

    /// `[start][-[end]]`, defaulting omissions to the full range.
    fn line_no_range(scan: &mut TokenScanner<'_>) -> (Option<u32>, u32, u32) {
        let first = Self::get_line_no(scan);
        let mut start = first.unwrap_or(0);
        let mut end = u32::MAX;
        if scan.tok_type() == T_MINUS {
            scan.skip_token();
            if let Some(line_no) = Self::get_line_no(scan) {
                end = line_no;
            }
            if first.is_none() {
                start = 0;
            }
        } else if let Some(line_no) = first {
            end = line_no;
        }
        (first, start, end)
    }

    /// `LIST [start[-end]]`
    pub(super) fn cmd_list(&mut self, scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        let (_, start, end) = Self::line_no_range(scan);
        let records = (0..self.program.line_count())
            .filter_map(|i| self.program.line_at(i).copied())
            .filter(|rec| (start..=end).contains(&rec.line_no))
            .collect_vec();
        for rec in records {
            let text = Detokenizer::new(self.program.line_bytes(&rec)).detokenize()?;
            self.out.write_all(&text)?;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// `DIM [DYNAMIC] name(d1,…)` or `DIM name{capacity}` for associative
    /// arrays; several declarations may follow, comma-separated.
    pub(super) fn cmd_dim(&mut self, scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        loop {
            let dynamic = scan.tok_type() == MD_DYNAMIC;
            if dynamic {
                scan.skip_token();
            }
            if scan.tok_type() != T_IDENT {
                return Err(BasicError::SyntaxError.into());
            }
            let mut name = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
            scan.skip_token();

            let (kind, dims) = if ident_flags(&name).contains(IdentFlags::ARRAY) {
                let kind = if dynamic {
                    ArrayKind::Dynamic
                } else {
                    ArrayKind::Static
                };
                let dims = self
                    .eval_args(scan)?
                    .into_iter()
                    .map(|slot| dim_size(&slot.value))
                    .collect::<Result<Vec<_>, _>>()?;
                (kind, dims)
            } else if scan.tok_type() == T_LBRACE {
                scan.skip_token();
                let capacity = dim_size(&self.eval_expr(scan)?.value)?;
                if scan.tok_type() != T_RBRACE {
                    return Err(BasicError::SyntaxError.into());
                }
                scan.skip_token();
                // subscript references carry the `(` sigil; store under it
                name.push(b'(');
                (ArrayKind::Assoc, vec![capacity])
            } else {
                return Err(BasicError::SyntaxError.into());
            };

            let elem = auto_declare_type(ident_flags(&name));
            let array = ArrayVal::new(elem, kind, &dims)?;
            debug!(
                name = %String::from_utf8_lossy(&name),
                ?kind,
                dims = %dims.iter().join("x"),
                "array dimensioned"
            );
            self.vars.remove(&name);
            self.vars.add(&name, Value::Array(array));

            if scan.tok_type() != T_COMMA {
                return Ok(());
            }
            scan.skip_token();
        }
    }

    /// `DEF FN name(params) = expr`
    pub(super) fn cmd_def(&mut self, scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        if scan.tok_type() != MD_FN {
            return Err(BasicError::SyntaxError.into());
        }
        scan.skip_token();
        if scan.tok_type() != T_IDENT {
            return Err(BasicError::SyntaxError.into());
        }
        let name = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
        if !ident_flags(&name).contains(IdentFlags::FUNC) {
            return Err(BasicError::SyntaxError.into());
        }
        scan.skip_token();

        let mut params: Vec<Vec<u8>> = Vec::new();
        if scan.tok_type() == T_RPAREN {
            scan.skip_token();
        } else {
            loop {
                if scan.tok_type() != T_IDENT {
                    return Err(BasicError::SyntaxError.into());
                }
                let param = scan.get_text().ok_or(BasicError::InterpretError)?.to_vec();
                if ident_flags(&param).contains(IdentFlags::ARRAY) {
                    return Err(BasicError::SyntaxError.into());
                }
                params.push(param);
                scan.skip_token();
                match scan.tok_type() {
                    T_COMMA => {
                        scan.skip_token();
                    }
                    T_RPAREN => {
                        scan.skip_token();
                        break;
                    }
                    _ => return Err(BasicError::SyntaxError.into()),
                }
            }
        }
        if scan.tok_type() != T_EQ {
            return Err(BasicError::SyntaxError.into());
        }
        scan.skip_token();

        // the body is the tokenized remainder of the line
        let body = scan.rest().to_vec();
        while scan.tok_type() != T_EOL {
            if !scan.skip_token() {
                return Err(BasicError::InterpretError.into());
            }
        }

        let n_formal = params.len() as u8;
        let func = FuncVal::new(
            FuncKind::BasicDefFn,
            n_formal,
            0,
            1,
            false,
            Handler::DefFn {
                params: Rc::from(params),
                body: Rc::from(body),
            },
        );
        self.vars.remove(&name);
        self.vars.add(&name, Value::Func(func));
        Ok(())
    }

    /// `NEW`: drop the program and all variables.
    pub(super) fn cmd_new(&mut self, _scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        self.program.clear();
        self.vars.clear();
        functions::declare_builtins(&mut self.vars);
        Ok(())
    }

    /// `CLR`: drop user variables, keep the program.
    pub(super) fn cmd_clr(&mut self, _scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        self.vars.clear();
        functions::declare_builtins(&mut self.vars);
        Ok(())
    }

    /// `RUN`: interpret every stored line in line-number order.
    pub(super) fn cmd_run(&mut self, _scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        let lines = (0..self.program.line_count())
            .filter_map(|i| self.program.line_at(i).copied())
            .map(|rec| self.program.line_bytes(&rec).to_vec())
            .collect_vec();
        for bytes in lines {
            if self.halted {
                break;
            }
            let mut scan = TokenScanner::new(&bytes);
            self.interpret(&mut scan)?;
        }
        Ok(())
    }

    /// `DELETE start[-end]`: remove stored lines in a range.
    pub(super) fn cmd_delete(
        &mut self,
        scan: &mut TokenScanner<'_>,
    ) -> Result<(), InterpreterError> {
        let had_minus = scan.tok_type() == T_MINUS;
        let (first, start, end) = Self::line_no_range(scan);
        if first.is_none() && !had_minus {
            return Err(BasicError::SyntaxError.into());
        }
        let removed = self.program.delete_range(start, end);
        debug!(start, end, removed, "lines deleted");
        Ok(())
    }
}

fn dim_size(value: &Value) -> Result<usize, BasicError> {
    usize::try_from(value.get_int()).map_err(|_| BasicError::BadSubscript)
}
