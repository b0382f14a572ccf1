//! Accept loop and per-request dispatch.
//!
//! The ingress is a wiring layer, not a framework. It owns exactly the
//! transport concerns the router core does not: reading the body,
//! parsing the query string, and turning the finished [`Context`] into
//! a response.

use bytes::Bytes;
use dendrite_core::{Chain, Context, IntoChain, Next, QueryValue, Router};
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::response;

/// Errors raised while standing the ingress up.
#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP ingress builder.
///
/// # Example
///
/// ```rust,ignore
/// Ingress::new(router)
///     .bind("0.0.0.0:3000")
///     .fallback(NotFoundPage)
///     .run()
///     .await?;
/// ```
pub struct Ingress {
    /// Bind address (e.g., "127.0.0.1:3000")
    addr: Option<String>,
    router: Router,
    /// Chain run over the context when no route matches.
    fallback: Option<Chain>,
    /// Chains run once over the context, keyed by dispatch status.
    hooks: HashMap<StatusCode, Chain>,
}

impl Ingress {
    pub fn new(router: Router) -> Self {
        Self {
            addr: None,
            router,
            fallback: None,
            hooks: HashMap::new(),
        }
    }

    /// Set the bind address for the server.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.addr = Some(addr.into());
        self
    }

    /// Set a fallback chain for unmatched requests. The context enters
    /// it still carrying its default 404.
    pub fn fallback(mut self, steps: impl IntoChain) -> Self {
        self.fallback = Some(steps.into_chain());
        self
    }

    /// Register a chain that decorates any dispatch whose outcome has
    /// `status`, before the response is written. A hook runs once; it
    /// does not re-fire for the status it writes itself.
    pub fn on_status(mut self, status: StatusCode, steps: impl IntoChain) -> Self {
        self.hooks.insert(status, steps.into_chain());
        self
    }

    /// Convert to a plain hyper `Service` for embedding the dispatch
    /// into an existing server.
    pub fn into_service(self) -> IngressService {
        IngressService {
            inner: Arc::new(Shared {
                router: self.router,
                fallback: self.fallback,
                hooks: self.hooks,
            }),
        }
    }

    /// Run the HTTP server: one task per connection, HTTP/1.
    pub async fn run(self) -> Result<(), IngressError> {
        let addr: SocketAddr = self.addr.as_deref().unwrap_or("127.0.0.1:3000").parse()?;
        let service = self.into_service();

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("dendrite ingress listening on http://{addr}");

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let service = service.clone();

            tokio::task::spawn(async move {
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!("error serving connection: {err:?}");
                }
            });
        }
    }
}

/// The dispatch behind [`Ingress`], usable as a hyper `Service`.
#[derive(Clone)]
pub struct IngressService {
    inner: Arc<Shared>,
}

struct Shared {
    router: Router,
    fallback: Option<Chain>,
    hooks: HashMap<StatusCode, Chain>,
}

impl Service<Request<Incoming>> for IngressService {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { Ok(inner.dispatch(req).await) })
    }
}

impl Shared {
    async fn dispatch<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: http_body::Body,
        B::Error: std::fmt::Debug,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "request",
            http.method = %method,
            http.path = %path,
            http.request_id = %request_id,
        );

        async move {
            let (parts, body) = req.into_parts();
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(err) => {
                    tracing::warn!("failed to read request body: {err:?}");
                    return response::plain(StatusCode::BAD_REQUEST);
                }
            };

            let query = parse_query(parts.uri.query());
            let mut ctx = Context::new(Request::from_parts(parts, bytes));
            ctx.query = query;

            match self.router.route(&method, &path) {
                Some(binding) => {
                    if let Err(err) = binding.execute(&mut ctx).await {
                        tracing::error!("step failed: {err}");
                        return response::plain(StatusCode::INTERNAL_SERVER_ERROR);
                    }
                }
                None => {
                    // The context enters the fallback still a 404.
                    if let Some(fallback) = &self.fallback {
                        if let Err(err) = Next::new(fallback.steps()).run(&mut ctx).await {
                            tracing::error!("fallback step failed: {err}");
                            return response::plain(StatusCode::INTERNAL_SERVER_ERROR);
                        }
                    }
                }
            }

            if let Some(hook) = self.hooks.get(&ctx.status) {
                if let Err(err) = Next::new(hook.steps()).run(&mut ctx).await {
                    tracing::error!("status hook failed: {err}");
                    return response::plain(StatusCode::INTERNAL_SERVER_ERROR);
                }
            }

            response::finish(ctx)
        }
        .instrument(span)
        .await
    }
}

/// Parses a query string into value-or-list entries; a repeated key
/// collects its values in query order. An undecodable query string
/// contributes nothing.
pub fn parse_query(raw: Option<&str>) -> HashMap<String, QueryValue> {
    let Some(raw) = raw else {
        return HashMap::new();
    };
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();

    let mut query = HashMap::new();
    for (key, value) in pairs {
        match query.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(QueryValue::One(value));
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                let prev = std::mem::replace(existing, QueryValue::One(String::new()));
                *existing = match prev {
                    QueryValue::One(first) => QueryValue::Many(vec![first, value]),
                    QueryValue::Many(mut all) => {
                        all.push(value);
                        QueryValue::Many(all)
                    }
                };
            }
        }
    }
    query
}
