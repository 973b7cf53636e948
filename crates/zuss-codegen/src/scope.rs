//! Variable and function bindings for nested rule blocks.
//!
//! Scopes live in an arena indexed by [`ScopeId`]. The walk is depth-first,
//! so scopes are entered and left in stack order: leaving a scope drops it
//! and everything created after it.
//!
//! Assignment finds an existing binding anywhere up the chain before it
//! declares a new one locally. Function bodies run in the scope that made
//! the call, so free variables resolve at the call site.

use std::collections::HashMap;

use zuss_ast::{FunctionDef, Value};

use crate::resolver::Resolver;

/// Index of a scope in a [`ScopeChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// Argument bindings of one active function call.
pub type LocalFrame = HashMap<String, Option<Value>>;

struct Scope<'a> {
    parent: Option<ScopeId>,
    /// `None` values are bound-but-empty, distinct from unbound.
    variables: HashMap<String, Option<Value>>,
    functions: HashMap<String, &'a FunctionDef>,
    locals: Vec<LocalFrame>,
}

impl<'a> Scope<'a> {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            variables: HashMap::new(),
            functions: HashMap::new(),
            locals: Vec::new(),
        }
    }
}

/// The arena of live scopes for one translation.
pub struct ScopeChain<'a> {
    scopes: Vec<Scope<'a>>,
    resolver: Option<&'a dyn Resolver>,
}

impl<'a> ScopeChain<'a> {
    /// Create a chain holding only the root scope.
    pub fn new(resolver: Option<&'a dyn Resolver>) -> Self {
        Self {
            scopes: vec![Scope::new(None)],
            resolver,
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn resolver(&self) -> Option<&'a dyn Resolver> {
        self.resolver
    }

    /// Number of live scopes, root included.
    #[cfg(test)]
    fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Open a child scope of `parent`.
    pub fn enter(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(parent)));
        id
    }

    /// Discard `scope` and every scope opened after it.
    pub fn leave(&mut self, scope: ScopeId) {
        debug_assert!(scope.0 > 0, "the root scope is never left");
        debug_assert!(scope.0 < self.scopes.len(), "scope already left");
        self.scopes.truncate(scope.0);
    }

    /// Walk from `scope` to the root.
    fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = &Scope<'a>> + '_ {
        let mut next = Some(scope);
        std::iter::from_fn(move || {
            let current = &self.scopes[next?.0];
            next = current.parent;
            Some(current)
        })
    }

    fn ancestor_ids(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |id| self.scopes[id.0].parent)
    }

    /// Bind `name`, overwriting the nearest existing binding if there is one.
    pub fn put_variable(&mut self, scope: ScopeId, name: &str, value: Option<Value>) {
        let owner = self
            .ancestor_ids(scope)
            .find(|id| self.scopes[id.0].variables.contains_key(name))
            .unwrap_or(scope);
        self.scopes[owner.0].variables.insert(name.to_string(), value);
    }

    /// Bind a function, overwriting the nearest existing definition of that name.
    pub fn put_function(&mut self, scope: ScopeId, def: &'a FunctionDef) {
        let owner = self
            .ancestor_ids(scope)
            .find(|id| self.scopes[id.0].functions.contains_key(&def.name))
            .unwrap_or(scope);
        self.scopes[owner.0].functions.insert(def.name.clone(), def);
    }

    /// Look `name` up from `scope` outward, then ask the resolver.
    ///
    /// At each level only the innermost active call's arguments are visible,
    /// so a suspended outer call cannot leak its arguments into a nested one.
    pub fn get_variable(&self, scope: ScopeId, name: &str) -> Option<Value> {
        for level in self.ancestors(scope) {
            if let Some(value) = level.locals.last().and_then(|frame| frame.get(name)) {
                return value.clone();
            }
            if let Some(value) = level.variables.get(name) {
                return value.clone();
            }
        }
        self.resolver.and_then(|resolver| resolver.variable(name))
    }

    /// Find the nearest function definition named `name`.
    pub fn find_function(&self, scope: ScopeId, name: &str) -> Option<&'a FunctionDef> {
        self.ancestors(scope)
            .find_map(|level| level.functions.get(name).copied())
    }

    pub fn push_locals(&mut self, scope: ScopeId, frame: LocalFrame) {
        self.scopes[scope.0].locals.push(frame);
    }

    pub fn pop_locals(&mut self, scope: ScopeId) {
        self.scopes[scope.0].locals.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MapResolver;
    use pretty_assertions::assert_eq;
    use zuss_ast::Expression;

    fn px(n: f64) -> Option<Value> {
        Some(Value::dimension(n, "px"))
    }

    #[test]
    fn test_put_then_get_in_same_scope() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        chain.put_variable(root, "w", px(10.0));
        assert_eq!(chain.get_variable(root, "w"), px(10.0));
    }

    #[test]
    fn test_child_sees_parent_binding() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        chain.put_variable(root, "w", px(10.0));
        let child = chain.enter(root);
        assert_eq!(chain.get_variable(child, "w"), px(10.0));
    }

    #[test]
    fn test_put_overwrites_ancestor_binding() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        chain.put_variable(root, "w", px(10.0));

        let first = chain.enter(root);
        chain.put_variable(first, "w", px(20.0));
        chain.leave(first);

        let sibling = chain.enter(root);
        assert_eq!(chain.get_variable(sibling, "w"), px(20.0));
        assert_eq!(chain.get_variable(root, "w"), px(20.0));
    }

    #[test]
    fn test_new_binding_is_local_to_child() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        let child = chain.enter(root);
        chain.put_variable(child, "h", px(5.0));
        assert_eq!(chain.get_variable(child, "h"), px(5.0));
        chain.leave(child);
        assert_eq!(chain.get_variable(root, "h"), None);
    }

    #[test]
    fn test_only_topmost_local_frame_is_visible() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        chain.push_locals(root, LocalFrame::from([("a".to_string(), px(1.0))]));
        assert_eq!(chain.get_variable(root, "a"), px(1.0));

        chain.push_locals(root, LocalFrame::from([("b".to_string(), px(2.0))]));
        assert_eq!(chain.get_variable(root, "a"), None);
        assert_eq!(chain.get_variable(root, "b"), px(2.0));

        chain.pop_locals(root);
        assert_eq!(chain.get_variable(root, "a"), px(1.0));
    }

    #[test]
    fn test_local_bound_to_none_stops_search() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        chain.put_variable(root, "a", px(1.0));
        chain.push_locals(root, LocalFrame::from([("a".to_string(), None)]));
        assert_eq!(chain.get_variable(root, "a"), None);
    }

    #[test]
    fn test_variable_bound_to_none_shadows_resolver() {
        let resolver = MapResolver::new().with_variable("a", Value::ident("host"));
        let mut chain = ScopeChain::new(Some(&resolver));
        let root = chain.root();
        assert_eq!(chain.get_variable(root, "a"), Some(Value::ident("host")));
        chain.put_variable(root, "a", None);
        assert_eq!(chain.get_variable(root, "a"), None);
    }

    #[test]
    fn test_put_function_overwrites_ancestor_definition() {
        let first = FunctionDef::new("f", Vec::new(), Expression::new(Vec::new(), 1), 1);
        let second = FunctionDef::new("f", Vec::new(), Expression::new(Vec::new(), 2), 2);

        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        chain.put_function(root, &first);
        let child = chain.enter(root);
        chain.put_function(child, &second);
        chain.leave(child);

        assert_eq!(chain.find_function(root, "f").map(|f| f.line), Some(2));
    }

    #[test]
    fn test_leave_drops_later_scopes() {
        let mut chain = ScopeChain::new(None);
        let root = chain.root();
        let child = chain.enter(root);
        let _grandchild = chain.enter(child);
        assert_eq!(chain.depth(), 3);
        chain.leave(child);
        assert_eq!(chain.depth(), 1);
    }
}
