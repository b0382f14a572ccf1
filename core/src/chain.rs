use crate::context::Context;
use crate::step::{Step, StepError};
use std::sync::Arc;
use tracing::Instrument;

/// An ordered, flattened sequence of steps.
///
/// Chains compose with [`Chain::then`]; appending another chain splices
/// its steps in place, so arbitrarily nested groups flatten into one
/// sequence that preserves registration order.
#[derive(Clone, Default)]
pub struct Chain {
    steps: Vec<Arc<dyn Step>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step, a chain, or a vector of either.
    pub fn then(mut self, steps: impl IntoChain) -> Self {
        steps.collect_into(&mut self);
        self
    }

    pub fn push(&mut self, step: Arc<dyn Step>) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn into_shared(self) -> Arc<[Arc<dyn Step>]> {
        self.steps.into()
    }
}

/// Anything route registration accepts as its middleware argument.
///
/// Implemented for single steps, prebuilt [`Chain`]s, shared steps, and
/// vectors of either; nested sequences flatten depth-first.
pub trait IntoChain {
    fn collect_into(self, chain: &mut Chain);

    fn into_chain(self) -> Chain
    where
        Self: Sized,
    {
        let mut chain = Chain::new();
        self.collect_into(&mut chain);
        chain
    }
}

impl<S: Step + 'static> IntoChain for S {
    fn collect_into(self, chain: &mut Chain) {
        chain.push(Arc::new(self));
    }
}

impl IntoChain for Chain {
    fn collect_into(self, chain: &mut Chain) {
        chain.steps.extend(self.steps);
    }
}

impl IntoChain for Arc<dyn Step> {
    fn collect_into(self, chain: &mut Chain) {
        chain.push(self);
    }
}

impl IntoChain for Vec<Chain> {
    fn collect_into(self, chain: &mut Chain) {
        for inner in self {
            inner.collect_into(chain);
        }
    }
}

impl IntoChain for Vec<Arc<dyn Step>> {
    fn collect_into(self, chain: &mut Chain) {
        chain.steps.extend(self);
    }
}

/// Continuation handed to each step: the not-yet-run tail of its chain.
///
/// The cursor is this value itself: a slice over the shared step
/// sequence, owned by a single invocation. Concurrent executions of
/// the same route each hold their own `Next`; the route's stored
/// sequence is never mutated.
pub struct Next<'a> {
    steps: &'a [Arc<dyn Step>],
}

impl<'a> Next<'a> {
    pub fn new(steps: &'a [Arc<dyn Step>]) -> Self {
        Next { steps }
    }

    /// Invokes the next step, handing it the rest of the chain.
    /// Does nothing once the chain is exhausted.
    pub async fn run(self, ctx: &mut Context) -> Result<(), StepError> {
        match self.steps.split_first() {
            Some((step, rest)) => {
                let span = tracing::debug_span!("step", step = step.label());
                step.call(ctx, Next { steps: rest }).instrument(span).await
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::Request;

    struct Mark(&'static str);

    #[async_trait]
    impl Step for Mark {
        async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
            ctx.get_mut::<Vec<&'static str>>().expect("trace log").push(self.0);
            next.run(ctx).await
        }
    }

    /// Records itself, then drops the continuation.
    struct Halt(&'static str);

    #[async_trait]
    impl Step for Halt {
        async fn call(&self, ctx: &mut Context, _next: Next<'_>) -> Result<(), StepError> {
            ctx.get_mut::<Vec<&'static str>>().expect("trace log").push(self.0);
            Ok(())
        }
    }

    struct Fail;

    #[async_trait]
    impl Step for Fail {
        async fn call(&self, _ctx: &mut Context, _next: Next<'_>) -> Result<(), StepError> {
            Err("step failed".into())
        }
    }

    fn ctx() -> Context {
        let mut ctx =
            Context::new(Request::builder().uri("/").body(Bytes::new()).expect("request"));
        ctx.insert(Vec::<&'static str>::new());
        ctx
    }

    fn trace(ctx: &Context) -> &[&'static str] {
        ctx.get::<Vec<&'static str>>().expect("trace log")
    }

    async fn run(chain: &Chain, ctx: &mut Context) -> Result<(), StepError> {
        Next::new(chain.steps()).run(ctx).await
    }

    #[tokio::test]
    async fn test_nested_chains_flatten_in_order() {
        let group = Chain::new().then(Mark("b")).then(Mark("c"));
        let chain = Chain::new().then(Mark("a")).then(group).then(Mark("d"));
        assert_eq!(chain.len(), 4);

        let mut ctx = ctx();
        run(&chain, &mut ctx).await.unwrap();
        assert_eq!(trace(&ctx), ["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_vec_of_chains_flattens_depth_first() {
        let chain = Chain::new().then(vec![
            Chain::new().then(Mark("a")),
            Chain::new().then(Mark("b")).then(Mark("c")),
        ]);

        let mut ctx = ctx();
        run(&chain, &mut ctx).await.unwrap();
        assert_eq!(trace(&ctx), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_uncalled_continuation_halts_chain() {
        let chain = Chain::new().then(Mark("s1")).then(Halt("s2")).then(Mark("s3"));

        let mut ctx = ctx();
        run(&chain, &mut ctx).await.unwrap();
        assert_eq!(trace(&ctx), ["s1", "s2"]);
    }

    #[tokio::test]
    async fn test_step_error_surfaces_uncaught() {
        let chain = Chain::new().then(Mark("before")).then(Fail).then(Mark("after"));

        let mut ctx = ctx();
        let err = run(&chain, &mut ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "step failed");
        // No rollback of what already ran, no continuation past the error.
        assert_eq!(trace(&ctx), ["before"]);
    }

    #[tokio::test]
    async fn test_empty_chain_is_a_no_op() {
        let mut ctx = ctx();
        run(&Chain::new(), &mut ctx).await.unwrap();
        assert!(trace(&ctx).is_empty());
    }
}
