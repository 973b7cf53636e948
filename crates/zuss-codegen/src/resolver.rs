//! Host-supplied variables and functions.
//!
//! A [`Resolver`] is consulted only after the sheet's own scopes come up
//! empty. Host functions have a fixed arity; calls with fewer arguments are
//! padded with `None`.

use std::collections::HashMap;
use std::fmt;

use zuss_ast::Value;

use crate::{Result, TranslateError};

/// Error raised by a host function.
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// A callable provided by the host.
pub trait HostFunction {
    fn name(&self) -> &str;

    /// Number of parameters. Shorter argument lists are padded to this length.
    fn arity(&self) -> usize;

    fn call(&self, args: &[Option<Value>]) -> std::result::Result<Option<Value>, HostError>;
}

/// Fallback provider for names the sheet does not define.
pub trait Resolver {
    fn variable(&self, name: &str) -> Option<Value>;

    fn function(&self, name: &str) -> Option<&dyn HostFunction>;
}

type NativeFn =
    dyn Fn(&[Option<Value>]) -> std::result::Result<Option<Value>, HostError> + Send + Sync;

/// A [`HostFunction`] backed by a closure.
pub struct NativeFunction {
    name: String,
    arity: usize,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Option<Value>]) -> std::result::Result<Option<Value>, HostError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Box::new(func),
        }
    }
}

impl HostFunction for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, args: &[Option<Value>]) -> std::result::Result<Option<Value>, HostError> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A map-backed resolver, optionally chained to a fallback.
#[derive(Default)]
pub struct MapResolver {
    variables: HashMap<String, Value>,
    functions: HashMap<String, NativeFunction>,
    fallback: Option<Box<dyn Resolver + Send + Sync>>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.define_variable(name, value);
        self
    }

    pub fn with_function(mut self, func: NativeFunction) -> Self {
        self.define_function(func);
        self
    }

    /// Consult `fallback` for names missing here.
    pub fn with_fallback(mut self, fallback: impl Resolver + Send + Sync + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn define_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn define_function(&mut self, func: NativeFunction) {
        self.functions.insert(func.name.clone(), func);
    }
}

impl Resolver for MapResolver {
    fn variable(&self, name: &str) -> Option<Value> {
        self.variables
            .get(name)
            .cloned()
            .or_else(|| self.fallback.as_ref()?.variable(name))
    }

    fn function(&self, name: &str) -> Option<&dyn HostFunction> {
        match self.functions.get(name) {
            Some(func) => Some(func as &dyn HostFunction),
            None => self.fallback.as_ref()?.function(name),
        }
    }
}

/// Invoke a host function on behalf of a call at `line`.
pub(crate) fn call_host(
    func: &dyn HostFunction,
    mut args: Vec<Option<Value>>,
    line: usize,
) -> Result<Option<Value>> {
    if args.len() < func.arity() {
        args.resize(func.arity(), None);
    }
    tracing::trace!(function = func.name(), line, "invoking host function");
    func.call(&args).map_err(|source| TranslateError::Invocation {
        function: func.name().to_string(),
        line,
        source,
    })
}
