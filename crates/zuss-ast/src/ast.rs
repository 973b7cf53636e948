//! Abstract Syntax Tree for ZUSS.
//!
//! Contains the sheet-level nodes (rules, declarations, definitions) and the
//! value-level nodes that make up a postfix expression program.

use serde::{Deserialize, Serialize};

use crate::value::Value;

// ---------------------------------------------------------------------------
// Sheet-level AST
// ---------------------------------------------------------------------------

/// The root of a parsed style sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub children: Vec<Node>,
}

impl Sheet {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }
}

/// A node that may appear in a sheet or inside a rule body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A selector list with a nested body.
    Rule(Rule),

    /// A `property: values;` line. Only valid inside a rule.
    Declaration(Declaration),

    /// `@name: expr;`
    Variable(VariableDef),

    /// `@name(args): expr;`
    Function(FunctionDef),
}

impl Node {
    /// Source line of the node.
    pub fn line(&self) -> usize {
        match self {
            Node::Rule(rule) => rule.line,
            Node::Declaration(decl) => decl.line,
            Node::Variable(var) => var.line,
            Node::Function(fun) => fun.line,
        }
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Rule(_) => "rule",
            Node::Declaration(_) => "declaration",
            Node::Variable(_) => "variable definition",
            Node::Function(_) => "function definition",
        }
    }
}

/// A rule block: `.a, .b { ... }`.
///
/// Selectors are kept raw. A selector starting with `&` refers to the
/// enclosing rule's selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub children: Vec<Node>,
    pub line: usize,
}

impl Rule {
    pub fn new(selectors: Vec<String>, children: Vec<Node>, line: usize) -> Self {
        Self {
            selectors,
            children,
            line,
        }
    }
}

/// A style declaration. Each entry of `values` is evaluated on its own and
/// the results are written space-separated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub values: Vec<ValueNode>,
    pub line: usize,
}

impl Declaration {
    pub fn new(property: impl Into<String>, values: Vec<ValueNode>, line: usize) -> Self {
        Self {
            property: property.into(),
            values,
            line,
        }
    }
}

/// A variable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub value: Expression,
    pub line: usize,
}

impl VariableDef {
    pub fn new(name: impl Into<String>, value: Expression, line: usize) -> Self {
        Self {
            name: name.into(),
            value,
            line,
        }
    }
}

/// A function (mixin) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub args: Vec<ArgumentDef>,
    pub body: Expression,
    pub line: usize,
}

impl FunctionDef {
    pub fn new(
        name: impl Into<String>,
        args: Vec<ArgumentDef>,
        body: Expression,
        line: usize,
    ) -> Self {
        Self {
            name: name.into(),
            args,
            body,
            line,
        }
    }
}

/// A declared function parameter with an optional default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Expression>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Expression) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

// ---------------------------------------------------------------------------
// Value-level AST
// ---------------------------------------------------------------------------

/// A postfix program. Nodes run left to right against a value stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub nodes: Vec<ValueNode>,
    pub line: usize,
}

impl Expression {
    pub fn new(nodes: Vec<ValueNode>, line: usize) -> Self {
        Self { nodes, line }
    }
}

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueNode {
    /// Push a literal.
    Constant { value: Value, line: usize },

    /// Push the value bound to `name`.
    Variable { name: String, line: usize },

    /// Pop `op.arity()` values, push the result.
    Operator { op: Operator, line: usize },

    /// Pop `argc` values, invoke `name`, push the result.
    Call {
        name: String,
        argc: usize,
        line: usize,
    },

    /// A nested program evaluated on its own stack.
    Expression(Expression),
}

impl ValueNode {
    pub fn constant(value: Value, line: usize) -> Self {
        ValueNode::Constant { value, line }
    }

    pub fn variable(name: impl Into<String>, line: usize) -> Self {
        ValueNode::Variable {
            name: name.into(),
            line,
        }
    }

    pub fn operator(op: Operator, line: usize) -> Self {
        ValueNode::Operator { op, line }
    }

    pub fn call(name: impl Into<String>, argc: usize, line: usize) -> Self {
        ValueNode::Call {
            name: name.into(),
            argc,
            line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ValueNode::Constant { line, .. }
            | ValueNode::Variable { line, .. }
            | ValueNode::Operator { line, .. }
            | ValueNode::Call { line, .. } => *line,
            ValueNode::Expression(expr) => expr.line,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueNode::Constant { .. } => "constant",
            ValueNode::Variable { .. } => "variable reference",
            ValueNode::Operator { .. } => "operator",
            ValueNode::Call { .. } => "function call",
            ValueNode::Expression(_) => "expression",
        }
    }
}

/// Built-in operators with fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Neg,
    Not,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl Operator {
    /// Number of operands popped from the stack.
    pub fn arity(self) -> usize {
        match self {
            Operator::Neg | Operator::Not => 1,
            _ => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Neg => "-",
            Operator::Not => "!",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Concat => "~",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
