//! Response assembly: context claim helpers for steps, and conversion
//! of a finished [`Context`] into an `http` response.

use bytes::Bytes;
use dendrite_core::{Context, StepError};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Claim the request with a text/plain body.
pub fn text(ctx: &mut Context, body: impl Into<Bytes>) {
    ctx.ok(body).content_type("text/plain; charset=utf-8");
}

/// Claim the request with a text/html body.
pub fn html(ctx: &mut Context, body: impl Into<Bytes>) {
    ctx.ok(body).content_type("text/html; charset=utf-8");
}

/// Claim the request with a serialized JSON body.
pub fn json<T: Serialize>(ctx: &mut Context, value: &T) -> Result<(), StepError> {
    let body = serde_json::to_vec(value)?;
    ctx.ok(body).content_type("application/json");
    Ok(())
}

/// Create a 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    plain(StatusCode::NOT_FOUND)
}

/// A bare response for `status`, its canonical reason as the body.
pub(crate) fn plain(status: StatusCode) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(
        status.canonical_reason().unwrap_or_default(),
    )));
    *res.status_mut() = status;
    res
}

/// Converts the accumulated context state into a response. A missing
/// body falls back to the status's canonical reason phrase.
pub fn finish(mut ctx: Context) -> Response<Full<Bytes>> {
    let body = ctx
        .body
        .take()
        .unwrap_or_else(|| Bytes::from(ctx.status.canonical_reason().unwrap_or_default()));

    let mut res = Response::new(Full::new(body));
    *res.status_mut() = ctx.status;
    *res.headers_mut() = std::mem::take(&mut ctx.headers);
    res
}
