//! # Dendrite HTTP
//!
//! Hyper 1.0 native ingress for the Dendrite router (no tower).
//!
//! [`Ingress`] wires a finished [`Router`](dendrite_core::Router) to an
//! accept loop: per request it collects the body, parses the query
//! string into the request [`Context`](dendrite_core::Context), looks
//! up the route, and drives the matched chain. `None` from the router
//! is handled here: optional fallback chain, else the context's
//! default not-found response.
//!
//! [`Ingress::into_service`] is the escape hatch: the same dispatch as
//! a plain hyper `Service`, for embedding into an existing server.

pub mod ingress;
pub mod response;

pub use ingress::{Ingress, IngressError, IngressService};
pub use response::{finish, html, json, not_found, text};
