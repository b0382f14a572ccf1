use crate::chain::Chain;
use crate::route::{Binding, Route};
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// One level of the routing tree: literal children keyed by exact
/// segment, at most one variable child, and the routes registered at
/// this depth keyed by method.
#[derive(Default)]
pub(crate) struct Node {
    literal: HashMap<String, Node>,
    variable: Option<Box<Node>>,
    methods: HashMap<Method, Arc<Route>>,
}

impl Node {
    /// Inserts a route at the node addressed by `segments`, collecting
    /// `:variable` names on the way down. Registering over an existing
    /// method at the same position replaces the old route.
    pub(crate) fn register(
        &mut self,
        method: Method,
        pattern: &str,
        segments: &[String],
        mut param_names: Vec<String>,
        steps: Chain,
    ) {
        match segments.split_first() {
            None => {
                let route = Route::new(
                    method.clone(),
                    pattern.to_owned(),
                    param_names,
                    steps.into_shared(),
                );
                self.methods.insert(method, Arc::new(route));
            }
            Some((segment, rest)) => {
                if let Some(name) = segment.strip_prefix(':') {
                    param_names.push(name.to_owned());
                    self.variable
                        .get_or_insert_with(Box::default)
                        .register(method, pattern, rest, param_names, steps);
                } else {
                    self.literal
                        .entry(segment.clone())
                        .or_default()
                        .register(method, pattern, rest, param_names, steps);
                }
            }
        }
    }

    /// Walks the tree for `segments`. A literal child wins over the
    /// variable child at every level, and a failed literal descent is
    /// final: the variable branch is never retried.
    pub(crate) fn find(
        &self,
        method: &Method,
        segments: &[&str],
        mut values: Vec<String>,
    ) -> Option<Binding> {
        match segments.split_first() {
            None => self
                .methods
                .get(method)
                .map(|route| Binding::new(Arc::clone(route), values)),
            Some((segment, rest)) => {
                if let Some(child) = self.literal.get(*segment) {
                    child.find(method, rest, values)
                } else if let Some(child) = &self.variable {
                    values.push((*segment).to_owned());
                    child.find(method, rest, values)
                } else {
                    None
                }
            }
        }
    }
}
