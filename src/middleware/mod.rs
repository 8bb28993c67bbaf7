//! Middleware layer.
//!
//! A middleware turns one handler into another. It is the place for
//! cross-cutting concerns: tracing, authentication, request-id injection.
//!
//! # Ordering
//!
//! A chain is an ordered list, and the **last** entry is the **outermost**
//! wrapper. Given a chain `[m1, m2]`:
//!
//! ```text
//! request → m2 → m1 → handler
//! ```
//!
//! So middleware appended later runs earlier. For groups the parent's chain
//! comes first, which puts parent middleware *inside* child middleware:
//!
//! ```text
//! group("/api", [auth]).group("/v1", [log]).get("/x", h)
//!   request → log → auth → h
//! ```
//!
//! Write middleware with [`from_fn`], or implement [`Middleware`] on a type.

mod trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use trace::trace;

/// A handler-to-handler transformation.
pub trait Middleware: Send + Sync + 'static {
    /// Returns a handler that runs this middleware around `next`.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// A shareable middleware, as stored in chains.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered middleware chain. Last element is outermost.
pub type Chain = Vec<BoxedMiddleware>;

/// Wraps `original` in every middleware of `chain`, first element innermost.
pub fn compose(original: &BoxedHandler, chain: &[BoxedMiddleware]) -> BoxedHandler {
    chain.iter().fold(Arc::clone(original), |inner, m| m.wrap(inner))
}

/// The rest of the chain, handed to a [`from_fn`] middleware.
pub struct Next(BoxedHandler);

impl Next {
    /// Runs everything inside this middleware and returns its response.
    pub async fn run(self, req: Request) -> Response {
        self.0.call(req).await
    }
}

/// Builds a middleware from an async function.
///
/// ```rust
/// use khan::middleware::{self, Next};
/// use khan::{Request, Response};
/// use http::StatusCode;
///
/// let require_token = middleware::from_fn(|req: Request, next: Next| async move {
///     if req.header("authorization").is_none() {
///         return Response::status(StatusCode::UNAUTHORIZED);
///     }
///     next.run(req).await
/// });
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> BoxedMiddleware
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    Arc::new(FromFn(Arc::new(f)))
}

struct FromFn<F>(Arc<F>);

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(FromFnHandler { f: Arc::clone(&self.0), next })
    }
}

struct FromFnHandler<F> {
    f: Arc<F>,
    next: BoxedHandler,
}

impl<F, Fut, R> ErasedHandler for FromFnHandler<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.f)(req, Next(Arc::clone(&self.next)));
        Box::pin(async move { fut.await.into_response() })
    }
}
