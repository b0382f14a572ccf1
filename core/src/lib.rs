//! # Dendrite Core
//!
//! Protocol-agnostic routing engine: a prefix tree over path segments
//! plus cooperative middleware chains.
//!
//! A [`Router`] is built once, during startup, from path patterns like
//! `/users/:id/posts`. At request time [`Router::route`] walks the tree
//! and returns a [`Binding`]: the matched route plus the values
//! captured by `:variable` segments, executed exactly once against a
//! per-request [`Context`].
//!
//! ## Matching rules
//!
//! - A literal segment always beats a variable segment at the same
//!   depth. This tie-break is fixed; it cannot be configured.
//! - The walk never backtracks. Once a literal child consumes a
//!   segment, a mismatch deeper in that subtree fails the whole lookup
//!   even if a variable sibling could have matched. Lookup stays
//!   deterministic and linear in the number of segments; route sets
//!   must be designed with this constraint in mind.
//! - Re-registering a method+path replaces the previous route silently.
//!
//! ## Chains
//!
//! Each route carries an ordered sequence of [`Step`]s. A step receives
//! the request [`Context`] and a [`Next`] continuation; the chain only
//! advances when the step calls `next.run(ctx)`. Returning without
//! calling it ends the chain; that is the short-circuit mechanism.
//! Errors are not caught by the executor; they surface to whoever
//! invoked [`Binding::execute`].

pub mod chain;
pub mod context;
pub mod path;
pub mod route;
pub mod router;
pub mod step;

mod trie;

pub use chain::{Chain, IntoChain, Next};
pub use context::{Context, QueryValue};
pub use path::split_path;
pub use route::{Binding, Route};
pub use router::Router;
pub use step::{Step, StepError};
