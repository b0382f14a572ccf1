//! dendrite-demo
//!
//! A Dendrite application with minimal setup: a scoped JSON API behind
//! a token guard, a health route, and a custom not-found page.

use anyhow::Result;
use async_trait::async_trait;
use dendrite_core::{Chain, Context, Next, Router, Step, StepError};
use dendrite_http::{response, Ingress};
use http::header::AUTHORIZATION;
use http::StatusCode;
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut router = Router::new();
    router.get("/health", Health);

    let guarded = Chain::new().then(RequestLog).then(RequireToken);
    router.scope("/api", |api| {
        api.get("/users", guarded.clone().then(ListUsers));
        api.get("/users/:id", guarded.clone().then(ShowUser));
    });

    Ingress::new(router)
        .bind("0.0.0.0:3000")
        .on_status(StatusCode::NOT_FOUND, NotFoundPage)
        .run()
        .await?;

    Ok(())
}

// ============================================================
// Steps
// ============================================================

#[derive(Serialize)]
struct User {
    id: u64,
    name: &'static str,
}

const USERS: [User; 2] = [
    User {
        id: 1,
        name: "ada",
    },
    User {
        id: 2,
        name: "grace",
    },
];

struct RequestLog;

#[async_trait]
impl Step for RequestLog {
    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
        tracing::info!(
            method = %ctx.req.method(),
            path = %ctx.req.uri().path(),
            "handling request"
        );
        next.run(ctx).await
    }
}

/// Rejects requests without credentials by never calling the
/// continuation for them.
struct RequireToken;

#[async_trait]
impl Step for RequireToken {
    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
        if ctx.req.headers().get(AUTHORIZATION).is_none() {
            ctx.status = StatusCode::UNAUTHORIZED;
            ctx.body = Some("missing credentials".into());
            return Ok(());
        }
        next.run(ctx).await
    }
}

struct Health;

#[async_trait]
impl Step for Health {
    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
        response::text(ctx, "ok");
        next.run(ctx).await
    }
}

struct ListUsers;

#[async_trait]
impl Step for ListUsers {
    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
        response::json(ctx, &USERS)?;
        next.run(ctx).await
    }
}

struct ShowUser;

#[async_trait]
impl Step for ShowUser {
    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
        let id: u64 = match ctx.param("id").unwrap_or_default().parse() {
            Ok(id) => id,
            Err(_) => {
                ctx.status = StatusCode::BAD_REQUEST;
                ctx.body = Some("invalid user id".into());
                return Ok(());
            }
        };

        match USERS.iter().find(|user| user.id == id) {
            Some(user) => response::json(ctx, user)?,
            None => {
                ctx.not_found().body = Some("no such user".into());
            }
        }
        next.run(ctx).await
    }
}

struct NotFoundPage;

#[async_trait]
impl Step for NotFoundPage {
    async fn call(&self, ctx: &mut Context, next: Next<'_>) -> Result<(), StepError> {
        let body = "<html><body><h1>404</h1><p>nothing routed here</p></body></html>";
        ctx.body = Some(body.into());
        ctx.content_type("text/html; charset=utf-8");
        next.run(ctx).await
    }
}
