//! [`Interpreter`] implementation
//!
//! One interpreter instance owns a program store, a variable store and a
//! command dispatch table. It is generic over its output sink: `LIST`,
//! `PRINT` and friends write to `W`, so tests drive it against a byte
//! vector and the REPL against stdout.

use crate::error::{BasicError, InterpreterError};
use crate::hash::HashTable;
use crate::program::Program;
use crate::scanner::TokenScanner;
use crate::tokenizer::Tokenizer;
use crate::variables::Variables;
use priamos_tokens::*;

use std::io::{self, Write};
use tracing::trace;

mod commands;
mod expr;
mod functions;

/// A statement handler bound in the command dispatch table.
pub type CmdHandler<W> =
    fn(&mut Interpreter<W>, &mut TokenScanner<'_>) -> Result<(), InterpreterError>;

/// BASIC interpreter.
///
/// The single entry point is [`Interpreter::interpret_line`]: numbered lines
/// go to the program store, everything else executes immediately.
#[derive(Debug)]
pub struct Interpreter<W> {
    program: Program,
    vars: Variables,
    commands: HashTable<CmdHandler<W>>,
    out: W,
    /// Evaluator nesting depth, bounding parentheses and user-function
    /// recursion.
    depth: usize,
    /// Set by `END`; stops the current line (and a running program).
    halted: bool,
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::with_output(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    /// Interpreter writing its output to `out`.
    pub fn with_output(out: W) -> Self {
        let mut interp = Self {
            program: Program::new(),
            vars: Variables::new(),
            commands: HashTable::new(),
            out,
            depth: 0,
            halted: false,
        };
        interp.declare();
        interp
    }

    /// Register the command table and the built-in function variables.
    fn declare(&mut self) {
        let table: &[(u16, CmdHandler<W>)] = &[
            (KW_NOP, Self::cmd_nop),
            (KW_END, Self::cmd_end),
            (KW_LET, Self::cmd_let),
            (T_PRINT, Self::cmd_print),
            (KW_LIST, Self::cmd_list),
            (KW_DIM, Self::cmd_dim),
            (KW_DEF, Self::cmd_def),
            (KW_NEW, Self::cmd_new),
            (KW_CLR, Self::cmd_clr),
            (KW_RUN, Self::cmd_run),
            (KW_DELETE, Self::cmd_delete),
        ];
        for (tok, handler) in table {
            self.commands.insert(&tok.to_be_bytes(), *handler);
        }
        functions::declare_builtins(&mut self.vars);
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// The output sink, mutably.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// The program store.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The variable store.
    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    /// Interpret one line of source text.
    ///
    /// The line is tokenized; a leading line number stores (or deletes) a
    /// program line, anything else executes in direct mode.
    pub fn interpret_line(&mut self, line: &[u8]) -> Result<(), InterpreterError> {
        let tokens = Tokenizer::new(line).tokenize()?;
        let bytes = tokens.as_slice();
        self.depth = 0;
        self.halted = false;

        let scan = TokenScanner::new(bytes);
        if scan.tok_type() == T_LINENO {
            self.program.enter_line(bytes)?;
            return Ok(());
        }
        let mut scan = scan;
        self.interpret(&mut scan)
    }

    /// Execute a tokenized line in direct mode.
    pub fn interpret(&mut self, scan: &mut TokenScanner<'_>) -> Result<(), InterpreterError> {
        loop {
            if self.halted {
                break;
            }
            let tok = scan.tok_type();
            if tok == T_EOL {
                break;
            }
            if matches!(tok, T_LINENO | T_LABEL | T_COLON | T_REM) {
                if !scan.skip_token() {
                    return Err(BasicError::InterpretError.into());
                }
                continue;
            }
            if is_error_token(tok) {
                return Err(BasicError::InterpretError.into());
            }
            // identifier-led statements are assignments
            if tok == T_IDENT || tok == MD_FN || is_function_keyword(tok) {
                self.cmd_assign(scan)?;
                continue;
            }
            let Some(&handler) = self.commands.find(&tok.to_be_bytes()) else {
                return Err(BasicError::NotImplemented.into());
            };
            trace!(tok, "dispatch");
            if !scan.skip_token() {
                return Err(BasicError::InterpretError.into());
            }
            handler(self, scan)?;
        }
        Ok(())
    }
}

impl<W> AsRef<W> for Interpreter<W> {
    fn as_ref(&self) -> &W {
        &self.out
    }
}

impl<W> AsMut<W> for Interpreter<W> {
    fn as_mut(&mut self) -> &mut W {
        &mut self.out
    }
}
