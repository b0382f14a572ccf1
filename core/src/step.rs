use crate::chain::Next;
use crate::context::Context;
use async_trait::async_trait;

pub type StepError = Box<dyn std::error::Error + Send + Sync>;

/// One unit of work in a middleware chain.
///
/// A step is invoked with the per-request [`Context`] and the [`Next`]
/// continuation for the rest of its chain. The chain advances only if
/// the step calls `next.run(ctx)`; returning `Ok(())` without doing so
/// ends the chain at this step. An `Err` propagates straight out of the
/// execution; the executor performs no catching or rollback.
#[async_trait]
pub trait Step: Send + Sync {
    /// Label used for the per-step tracing span.
    fn label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError>;
}
