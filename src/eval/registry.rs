use super::{builtins, Value};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// How many arguments a [Function] accepts. Calls always carry at least one argument.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, argc: usize) -> bool {
        match self {
            Self::Exact(n) => argc == n,
            Self::Variadic => argc >= 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(1) => f.write_str("exactly 1 argument"),
            Self::Exact(n) => write!(f, "exactly {} arguments", n),
            Self::Variadic => f.write_str("at least 1 argument"),
        }
    }
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

pub struct Function {
    arity: Arity,
    call: Box<NativeFn>,
}

impl Function {
    pub fn unary(f: impl Fn(Value) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            arity: Arity::Exact(1),
            call: Box::new(move |args: &[Value]| match args {
                [x] => f(*x),
                _ => Err(Error::argument_count("<unary>", Arity::Exact(1), args.len())),
            }),
        }
    }

    pub fn binary(f: impl Fn(Value, Value) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            arity: Arity::Exact(2),
            call: Box::new(move |args: &[Value]| match args {
                [x, y] => f(*x, *y),
                _ => Err(Error::argument_count("<binary>", Arity::Exact(2), args.len())),
            }),
        }
    }

    pub fn variadic(f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            arity: Arity::Variadic,
            call: Box::new(f),
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.call)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Constants and functions visible to expressions.
///
/// Built once and then shared read-only, typically behind an `Arc`. Constant names are
/// matched case-insensitively; function names are matched exactly.
#[derive(Debug)]
pub struct Registry {
    constants: HashMap<String, Value>,
    functions: HashMap<String, Function>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            constants: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn with_constant(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.constants.insert(name.to_ascii_uppercase(), value.into());
        self
    }

    pub fn with_function(mut self, name: &str, function: Function) -> Self {
        self.functions.insert(name.to_string(), function);
        self
    }

    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::empty()
            .with_constant("E", std::f64::consts::E)
            .with_constant("PI", std::f64::consts::PI)
            .with_function("sin", Function::unary(builtins::sin))
            .with_function("cos", Function::unary(builtins::cos))
            .with_function("tan", Function::unary(builtins::tan))
            .with_function("exp", Function::unary(builtins::exp))
            .with_function("hypot", Function::binary(builtins::hypot))
            .with_function("abs", Function::unary(builtins::abs))
            .with_function("trunc", Function::unary(builtins::trunc))
            .with_function("round", Function::unary(builtins::round))
            .with_function("sgn", Function::unary(builtins::sgn))
            .with_function("multiply", Function::binary(builtins::multiply))
            .with_function("sum", Function::variadic(builtins::sum))
            .with_function("all", Function::variadic(builtins::all))
            .with_function("any", Function::variadic(builtins::any))
    }
}
