//! Function values: arity descriptors plus a callable handler.

use super::Value;
use crate::error::BasicError;

use std::rc::Rc;

/// Where a function's behavior comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    /// Built into the interpreter.
    SystemBuiltin,
    /// Native code registered by a host.
    NativeUser,
    /// `DEF FN` single-expression function.
    BasicDefFn,
    /// `FUNC` block function.
    BasicFunc,
    /// `SUB` procedure.
    BasicSub,
}

/// Handler signature for built-in functions: inputs arrive in the argument
/// object, results are appended to its result list.
pub type BuiltinHandler = fn(&mut FuncArg) -> Result<(), BasicError>;

/// The callable part of a function value.
#[derive(Debug, Clone)]
pub enum Handler {
    /// A native handler.
    Builtin(BuiltinHandler),
    /// A stored `DEF FN` body; the evaluator binds parameters and evaluates
    /// the expression itself.
    DefFn {
        /// Formal parameter names, sigils included.
        params: Rc<[Vec<u8>]>,
        /// Tokenized body expression, EOL-terminated.
        body: Rc<[u8]>,
    },
    /// Does nothing; the default-constructed function.
    Nop,
}

/// Argument object passed through a function call: detached input values and
/// the collected results.
#[derive(Debug, Default)]
pub struct FuncArg {
    /// Input values, in argument order.
    pub args: Vec<Value>,
    /// Result values, in result order.
    pub results: Vec<Value>,
}

impl FuncArg {
    /// Argument at `index`, or the type-mismatch error the handlers report
    /// for a missing one.
    pub fn arg(&self, index: usize) -> Result<&Value, BasicError> {
        self.args.get(index).ok_or(BasicError::TypeMismatch)
    }
}

/// A function value.
#[derive(Debug, Clone)]
pub struct FuncVal {
    /// Function kind.
    pub kind: FuncKind,
    /// Number of formal arguments.
    pub n_formal: u8,
    /// Number of trailing optional arguments.
    pub n_opt: u8,
    /// Number of results.
    pub n_res: u8,
    /// Whether extra arguments are accepted.
    pub varargs: bool,
    /// The callable handler.
    pub handler: Handler,
}

impl FuncVal {
    /// A function value with the given descriptor.
    pub fn new(
        kind: FuncKind,
        n_formal: u8,
        n_opt: u8,
        n_res: u8,
        varargs: bool,
        handler: Handler,
    ) -> Self {
        Self {
            kind,
            n_formal,
            n_opt,
            n_res,
            varargs,
            handler,
        }
    }

    /// The default-constructed function: no arguments, no results, no-op.
    pub fn nop() -> Self {
        Self::new(FuncKind::SystemBuiltin, 0, 0, 0, false, Handler::Nop)
    }

    /// Check an actual argument count against the descriptor.
    pub fn check_arity(&self, n_args: usize) -> Result<(), BasicError> {
        let min = self.n_formal.saturating_sub(self.n_opt) as usize;
        if n_args < min {
            return Err(BasicError::TooFewDimensions);
        }
        if !self.varargs && n_args > self.n_formal as usize {
            return Err(BasicError::TooManyDimensions);
        }
        Ok(())
    }

    /// Invoke the handler. `DEF FN` bodies are evaluated by the expression
    /// evaluator, not here.
    pub fn call(&self, arg: &mut FuncArg) -> Result<(), BasicError> {
        match &self.handler {
            Handler::Builtin(f) => f(arg),
            Handler::Nop => Ok(()),
            Handler::DefFn { .. } => Err(BasicError::InterpretError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(arg: &mut FuncArg) -> Result<(), BasicError> {
        let v = arg.arg(0)?.get_int();
        arg.results.push(Value::Int(v * 2));
        Ok(())
    }

    #[test]
    fn builtin_call_collects_results() {
        let f = FuncVal::new(
            FuncKind::SystemBuiltin,
            1,
            0,
            1,
            false,
            Handler::Builtin(double),
        );
        let mut arg = FuncArg::default();
        arg.args.push(Value::Int(21));
        f.call(&mut arg).unwrap();
        assert_eq!(arg.results.len(), 1);
        assert_eq!(arg.results[0].get_int(), 42);
    }

    #[test]
    fn arity_checks() {
        let f = FuncVal::new(FuncKind::SystemBuiltin, 2, 1, 1, false, Handler::Nop);
        assert_eq!(f.check_arity(0).unwrap_err(), BasicError::TooFewDimensions);
        f.check_arity(1).unwrap();
        f.check_arity(2).unwrap();
        assert_eq!(f.check_arity(3).unwrap_err(), BasicError::TooManyDimensions);

        let v = FuncVal::new(FuncKind::SystemBuiltin, 1, 0, 1, true, Handler::Nop);
        v.check_arity(5).unwrap();
    }

    #[test]
    fn nop_function_does_nothing() {
        let f = FuncVal::nop();
        let mut arg = FuncArg::default();
        f.call(&mut arg).unwrap();
        assert!(arg.results.is_empty());
    }
}
