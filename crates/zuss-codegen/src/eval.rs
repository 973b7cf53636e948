//! Postfix expression evaluator.
//!
//! Each call to [`evaluate`] owns its own value stack. Operators and calls
//! pop their operands from the top, oldest operand first.

use zuss_ast::{Expression, FunctionDef, Value, ValueNode};

use crate::ops;
use crate::resolver::call_host;
use crate::scope::{LocalFrame, ScopeChain, ScopeId};
use crate::{Result, TranslateError};

/// Run `expr` in `scope`. Returns the bottom of the stack, or `None` if the
/// program left nothing behind. Extra values above it are dropped.
pub fn evaluate<'a>(
    chain: &mut ScopeChain<'a>,
    scope: ScopeId,
    expr: &'a Expression,
) -> Result<Option<Value>> {
    let mut stack: Vec<Option<Value>> = Vec::with_capacity(expr.nodes.len());

    for node in &expr.nodes {
        let value = match node {
            ValueNode::Operator { op, line } => {
                let args = take_args(&mut stack, op.arity(), *line)?;
                ops::apply(*op, args, *line)?
            }
            ValueNode::Call { name, argc, line } => {
                let args = take_args(&mut stack, *argc, *line)?;
                invoke(chain, scope, name, args, *line)?
            }
            other => evaluate_value(chain, scope, other)?,
        };
        stack.push(value);
    }

    Ok(stack.into_iter().next().flatten())
}

/// Evaluate a single standalone value: a constant, a variable reference or
/// a nested expression. Bare operators and calls have no operands here.
pub fn evaluate_value<'a>(
    chain: &mut ScopeChain<'a>,
    scope: ScopeId,
    node: &'a ValueNode,
) -> Result<Option<Value>> {
    match node {
        ValueNode::Constant { value, .. } => Ok(Some(value.clone())),
        ValueNode::Variable { name, .. } => Ok(chain.get_variable(scope, name)),
        ValueNode::Expression(expr) => evaluate(chain, scope, expr),
        ValueNode::Operator { .. } | ValueNode::Call { .. } => Err(TranslateError::UnknownNode {
            kind: node.kind_name(),
            line: node.line(),
        }),
    }
}

/// Call `name` from `scope`.
///
/// Sheet functions win over host functions. The body runs in `scope` itself,
/// not in the scope that holds the definition.
pub fn invoke<'a>(
    chain: &mut ScopeChain<'a>,
    scope: ScopeId,
    name: &str,
    args: Vec<Option<Value>>,
    line: usize,
) -> Result<Option<Value>> {
    if let Some(def) = chain.find_function(scope, name) {
        tracing::trace!(function = name, line, "invoking sheet function");
        return call_function(chain, scope, def, args);
    }

    if let Some(func) = chain.resolver().and_then(|resolver| resolver.function(name)) {
        return call_host(func, args, line);
    }

    Err(TranslateError::FunctionNotFound {
        name: name.to_string(),
        line,
    })
}

fn call_function<'a>(
    chain: &mut ScopeChain<'a>,
    scope: ScopeId,
    def: &'a FunctionDef,
    args: Vec<Option<Value>>,
) -> Result<Option<Value>> {
    let mut supplied = args.into_iter();
    let mut frame = LocalFrame::with_capacity(def.args.len());
    for arg in &def.args {
        let value = match supplied.next() {
            Some(value) => value,
            None => match &arg.default {
                Some(default) => evaluate(chain, scope, default)?,
                None => None,
            },
        };
        frame.insert(arg.name.clone(), value);
    }

    chain.push_locals(scope, frame);
    let result = evaluate(chain, scope, &def.body);
    chain.pop_locals(scope);
    result
}

/// Pop the top `argc` values, keeping push order.
fn take_args(
    stack: &mut Vec<Option<Value>>,
    argc: usize,
    line: usize,
) -> Result<Vec<Option<Value>>> {
    if stack.len() < argc {
        return Err(TranslateError::ArgumentCount {
            available: stack.len(),
            required: argc,
            line,
        });
    }
    Ok(stack.split_off(stack.len() - argc))
}
