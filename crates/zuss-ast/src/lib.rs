//! ZUSS syntax tree
//!
//! The tree a ZUSS parser hands to the code generator: a [`Sheet`] of
//! rules and definitions, where every value position holds a postfix
//! [`Expression`]. The generator only reads these nodes.
//!
//! All types are serde-serializable so hosts can exchange trees as JSON.
//!
//! # Example
//!
//! ```
//! use zuss_ast::{Declaration, Node, Rule, Sheet, Value, ValueNode};
//!
//! let sheet = Sheet::new(vec![Node::Rule(Rule::new(
//!     vec![".btn".into()],
//!     vec![Node::Declaration(Declaration::new(
//!         "color",
//!         vec![ValueNode::constant(Value::ident("red"), 2)],
//!         2,
//!     ))],
//!     1,
//! ))]);
//! assert_eq!(sheet.children.len(), 1);
//! ```

pub mod ast;
pub mod value;

pub use ast::{
    ArgumentDef, Declaration, Expression, FunctionDef, Node, Operator, Rule, Sheet, ValueNode,
    VariableDef,
};
pub use value::{Color, Value};
