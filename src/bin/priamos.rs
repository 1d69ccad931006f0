//! Line-oriented REPL host for the interpreter.

use priamos_basic::prelude::*;

use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let mut interp = Interpreter::default();

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        match interp.interpret_line(trimmed.as_bytes()) {
            Ok(()) => {}
            Err(InterpreterError::Io(err)) => return Err(err),
            Err(err) => println!("? {err}"),
        }
    }
}
