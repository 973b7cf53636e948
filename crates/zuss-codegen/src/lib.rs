//! ZUSS Code Generator
//!
//! Walks a parsed ZUSS [`Sheet`] once and streams plain CSS. Variables and
//! functions are bound as they are met, nested rules are flattened into
//! top-level blocks, and names the sheet does not define are handed to a
//! host [`Resolver`].
//!
//! ```text
//! Sheet AST → Translator::translate() → CSS text on an io::Write
//! ```
//!
//! # Example
//!
//! ```
//! use zuss_ast::{Declaration, Node, Rule, Sheet, Value, ValueNode};
//!
//! let sheet = Sheet::new(vec![Node::Rule(Rule::new(
//!     vec!["p".into()],
//!     vec![Node::Declaration(Declaration::new(
//!         "margin",
//!         vec![ValueNode::constant(Value::dimension(0.0, "px"), 2)],
//!         2,
//!     ))],
//!     1,
//! ))]);
//! let css = zuss_codegen::translate_to_string(&sheet, None).unwrap();
//! assert_eq!(css, "p{\n\tmargin: 0px;\n}\n");
//! ```

pub mod builtins;
pub mod emitter;
pub mod eval;
pub mod ops;
pub mod resolver;
pub mod scope;
pub mod selector;

use std::io::Write;

use zuss_ast::{Node, Operator, Rule, Sheet};

use crate::emitter::{RuleBlock, StyleEmitter};
use crate::scope::{ScopeChain, ScopeId};

pub use resolver::{HostError, HostFunction, MapResolver, NativeFunction, Resolver};

/// Translation error. Every variant aborts the translation.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("line {line}: unexpected {kind}")]
    UnknownNode { kind: &'static str, line: usize },

    #[error("line {line}: not enough arguments: {available} available, {required} required")]
    ArgumentCount {
        available: usize,
        required: usize,
        line: usize,
    },

    #[error("line {line}: function not found: {name}")]
    FunctionNotFound { name: String, line: usize },

    #[error("line {line}: unable to invoke {function}: {source}")]
    Invocation {
        function: String,
        line: usize,
        #[source]
        source: HostError,
    },

    #[error("line {line}: invalid operands for `{op}`")]
    InvalidOperands { op: Operator, line: usize },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranslateError>;

/// Translates one sheet into CSS written to `W`.
///
/// `translate` consumes the translator, so each instance runs once. The
/// sink is flushed and dropped however the walk ends.
pub struct Translator<'a, W: Write> {
    sheet: &'a Sheet,
    scopes: ScopeChain<'a>,
    emitter: StyleEmitter<W>,
}

impl<'a, W: Write> Translator<'a, W> {
    pub fn new(sheet: &'a Sheet, out: W, resolver: Option<&'a dyn Resolver>) -> Self {
        Self {
            sheet,
            scopes: ScopeChain::new(resolver),
            emitter: StyleEmitter::new(out),
        }
    }

    /// Generate the CSS.
    pub fn translate(mut self) -> Result<()> {
        tracing::debug!(nodes = self.sheet.children.len(), "translating sheet");

        match self.out_sheet() {
            Ok(()) => {
                let blocks = self.emitter.blocks_written();
                self.emitter.finish()?;
                tracing::debug!(blocks, "translation complete");
                Ok(())
            }
            Err(err) => {
                if let Err(close) = self.emitter.finish() {
                    tracing::warn!(error = %close, "failed to flush output after error");
                }
                Err(err)
            }
        }
    }

    fn out_sheet(&mut self) -> Result<()> {
        let sheet = self.sheet;
        let root = self.scopes.root();
        for node in &sheet.children {
            match node {
                Node::Rule(rule) => {
                    let scope = self.scopes.enter(root);
                    self.out_rule(scope, None, rule)?;
                    self.scopes.leave(scope);
                }
                other => self.out_other(root, other)?,
            }
        }
        Ok(())
    }

    /// Emit `rule` and its nested rules. `outer` holds the enclosing rule's
    /// flattened selectors.
    fn out_rule(
        &mut self,
        scope: ScopeId,
        outer: Option<&[String]>,
        rule: &'a Rule,
    ) -> Result<()> {
        let selectors = selector::flatten(&rule.selectors, outer);
        tracing::trace!(line = rule.line, selectors = ?selectors, "entering rule");

        let mut block = RuleBlock::new(selector::join(&selectors));
        for node in &rule.children {
            match node {
                Node::Rule(nested) => {
                    self.emitter.close(&mut block)?;
                    let child = self.scopes.enter(scope);
                    self.out_rule(child, Some(selectors.as_slice()), nested)?;
                    self.scopes.leave(child);
                }
                Node::Declaration(decl) => {
                    // evaluate everything first so a failure leaves no partial line
                    let mut values = Vec::with_capacity(decl.values.len());
                    for value in &decl.values {
                        let value = eval::evaluate_value(&mut self.scopes, scope, value)?;
                        values.extend(value);
                    }
                    self.emitter
                        .declaration(&mut block, &decl.property, &values)?;
                }
                other => self.out_other(scope, other)?,
            }
        }
        self.emitter.close(&mut block)
    }

    /// Bind a variable or function definition into `scope`.
    fn out_other(&mut self, scope: ScopeId, node: &'a Node) -> Result<()> {
        match node {
            Node::Variable(var) => {
                // evaluated once, where it is defined
                let value = eval::evaluate(&mut self.scopes, scope, &var.value)?;
                self.scopes.put_variable(scope, &var.name, value);
                Ok(())
            }
            Node::Function(fun) => {
                self.scopes.put_function(scope, fun);
                Ok(())
            }
            Node::Rule(_) | Node::Declaration(_) => Err(TranslateError::UnknownNode {
                kind: node.kind_name(),
                line: node.line(),
            }),
        }
    }
}

/// Translate `sheet` into a `String`.
pub fn translate_to_string(sheet: &Sheet, resolver: Option<&dyn Resolver>) -> Result<String> {
    let mut out = Vec::new();
    Translator::new(sheet, &mut out, resolver).translate()?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
