//! # khan
//!
//! An exact-match HTTP request dispatcher. A request's path and method pick
//! one registered handler, wrapped in whatever middleware was stacked
//! around it. That is the whole job.
//!
//! ## The contract
//!
//! - **Exact paths.** Patterns are canonicalized once, at registration
//!   (`"users/"` → `/users`). Requests are matched byte for byte. No path
//!   parameters, no wildcards, no regexes, no priorities.
//! - **One route per (pattern, method).** Registering a pair twice is an
//!   [`Error`], returned to the caller. Startup code is expected to treat it
//!   as fatal.
//! - **Groups share a prefix and a middleware chain.** Nested groups extend
//!   both; routes copy them at creation time.
//! - **Middleware order is explicit.** The last middleware in a chain is
//!   the outermost one. See [`middleware`] for the exact rules.
//! - **Misses are responses, not errors.** An unknown path gets the
//!   not-found handler (404); a known path with the wrong method gets the
//!   method-not-allowed handler (405). Both are replaceable.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use khan::{Request, Response, Router, Server, middleware};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), khan::Error> {
//!     let app = Router::new();
//!     app.get("/healthz", healthz)?;
//!
//!     let api = app.group("/api", vec![middleware::trace()])?;
//!     api.get("/users", list_users)?;
//!     api.post("/users", create_user)?;
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! async fn healthz(_req: Request) -> &'static str { "ok" }
//!
//! async fn list_users(_req: Request) -> Response {
//!     Response::json(r#"[{"id":1}]"#)
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(http::StatusCode::BAD_REQUEST);
//!     }
//!     Response::builder()
//!         .status(http::StatusCode::CREATED)
//!         .header("location", "/api/users/2")
//!         .json(r#"{"id":2}"#)
//! }
//! ```

mod error;
mod group;
mod handler;
mod method;
mod pattern;
mod request;
mod response;
mod route;
mod router;
mod server;
mod table;

pub mod middleware;

pub use error::{Error, Result};
pub use group::{Group, Scope};
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
pub use method::Method;
pub use middleware::{BoxedMiddleware, Chain, Middleware};
pub use pattern::{Pattern, normalize};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use route::Route;
pub use router::Router;
pub use server::Server;
pub use table::{Lookup, RouteTable};
