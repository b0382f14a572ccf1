use crate::chain::Next;
use crate::context::Context;
use crate::step::{Step, StepError};
use http::Method;
use std::sync::Arc;

/// An immutable route template: one registered method + path pattern
/// and its middleware chain.
///
/// Created once per registration and never mutated afterwards. The step
/// sequence is a shared slice; every match of this route executes over
/// the same steps with its own private cursor.
pub struct Route {
    method: Method,
    pattern: String,
    param_names: Vec<String>,
    steps: Arc<[Arc<dyn Step>]>,
}

impl Route {
    pub(crate) fn new(
        method: Method,
        pattern: String,
        param_names: Vec<String>,
        steps: Arc<[Arc<dyn Step>]>,
    ) -> Self {
        Self {
            method,
            pattern,
            param_names,
            steps,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern string exactly as passed to registration.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Variable names in declaration order, root to leaf.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }
}

/// A matched route plus the values captured for one request.
///
/// Single-use: [`Binding::execute`] consumes it. The underlying route
/// stays shared and untouched.
pub struct Binding {
    route: Arc<Route>,
    values: Vec<String>,
}

impl Binding {
    pub(crate) fn new(route: Arc<Route>, values: Vec<String>) -> Self {
        Self { route, values }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Captured values, in the order their segments were consumed.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Binds captured values to their declared names in `ctx.params`
    /// (a name repeated within one pattern keeps its last value), then
    /// drives the chain to completion, short-circuit, or error.
    pub async fn execute(self, ctx: &mut Context) -> Result<(), StepError> {
        let Binding { route, values } = self;

        for (name, value) in route.param_names().iter().zip(values) {
            ctx.params.insert(name.clone(), value);
        }

        Next::new(route.steps()).run(ctx).await
    }
}
