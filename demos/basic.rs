//! Minimal khan example: a versioned API group with auth and tracing
//! middleware, plus a health check outside the group.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/healthz
//!   curl -i http://localhost:3000/api/v1/users                       → 401
//!   curl -i -H 'authorization: Bearer x' http://localhost:3000/api/v1/users
//!   curl -i -X PUT http://localhost:3000/api/v1/users                → 405
//!   curl -i http://localhost:3000/api/v1/users/                      → 404 (no trailing-slash folding)

use http::StatusCode;
use khan::middleware::{self, Next};
use khan::{Request, Response, Router, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), khan::Error> {
    let app = Router::new();
    app.get("/healthz", healthz)?;

    // Chain order: `require_auth` is appended after `trace`, so it is the
    // outer layer and rejects before anything is traced.
    let api = app.group("/api", vec![middleware::trace()])?;
    let v1 = api.group("v1", vec![middleware::from_fn(require_auth)])?;

    v1.get("/users", list_users)?;
    v1.post("/users", create_user)?;
    v1.delete("/users", delete_users)?
        .layer(middleware::from_fn(admin_only));

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

async fn require_auth(req: Request, next: Next) -> Response {
    if req.header("authorization").is_none() {
        return Response::status(StatusCode::UNAUTHORIZED);
    }
    next.run(req).await
}

async fn admin_only(req: Request, next: Next) -> Response {
    if req.header("x-role") != Some("admin") {
        return Response::status(StatusCode::FORBIDDEN);
    }
    next.run(req).await
}

async fn healthz(_req: Request) -> &'static str {
    "ok"
}

async fn list_users(_req: Request) -> Response {
    Response::json(r#"[{"id":"1","name":"alice"}]"#)
}

// req.body() is &[u8]; parse it with whatever you like. khan does not touch the bytes.
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/api/v1/users/2")
        .json(r#"{"id":"2","name":"new_user"}"#)
}

async fn delete_users(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
