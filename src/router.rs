//! Exact-match request router.
//!
//! One map lookup for the path, one for the method. No trees, no
//! parameters, no priorities: a request either names a registered pattern
//! byte for byte or it does not.
//!
//! Request paths are **not** normalized at dispatch time. `/test` is
//! registered from `"test/"`, but a request for `/test/` is a different key
//! and gets the not-found fallback.

use std::sync::Arc;

use http::StatusCode;
use tracing::trace;

use crate::error::Result;
use crate::group::Group;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::BoxedMiddleware;
use crate::request::Request;
use crate::response::Response;
use crate::route::Route;
use crate::table::{Lookup, RouteTable};

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods take `&self` and return the new [`Route`], so
/// middleware can be attached to it afterwards.
///
/// ```rust
/// use khan::{Request, Response, Router};
/// use http::StatusCode;
///
/// # async fn list_users(_: Request) -> &'static str { "" }
/// # async fn create_user(_: Request) -> StatusCode { StatusCode::CREATED }
/// let router = Router::new()
///     .not_found(|_req: Request| async { Response::builder().status(StatusCode::NOT_FOUND).text("nothing here") });
/// router.get("/users", list_users)?;
/// router.post("/users", create_user)?;
/// # Ok::<(), khan::Error>(())
/// ```
#[derive(Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    not_found: BoxedHandler,
    method_not_allowed: BoxedHandler,
}

impl Router {
    /// A router with its own empty table and the default fallbacks.
    pub fn new() -> Self {
        Self::with_table(Arc::new(RouteTable::new()))
    }

    /// A router dispatching over an existing table.
    pub fn with_table(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            not_found: default_not_found.into_boxed_handler(),
            method_not_allowed: default_method_not_allowed.into_boxed_handler(),
        }
    }

    pub fn table(&self) -> &Arc<RouteTable> { &self.table }

    /// Replaces the handler used when no route has the request path.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = handler.into_boxed_handler();
        self
    }

    /// Replaces the handler used when the path exists but not for the
    /// request method.
    pub fn method_not_allowed(mut self, handler: impl Handler) -> Self {
        self.method_not_allowed = handler.into_boxed_handler();
        self
    }

    /// A top-level [`Group`] registering into this router's table.
    pub fn group(
        &self,
        prefix: &str,
        chain: impl IntoIterator<Item = BoxedMiddleware>,
    ) -> Result<Group> {
        Group::new(Arc::clone(&self.table), prefix, chain)
    }

    /// Registers `handler` for `method` at `pattern`, with no middleware.
    pub fn route(&self, method: Method, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.table.add(None, method, pattern, handler.into_boxed_handler())
    }

    pub fn get(&self, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post(&self, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.route(Method::Post, pattern, handler)
    }

    pub fn put(&self, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.route(Method::Put, pattern, handler)
    }

    pub fn delete(&self, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.route(Method::Delete, pattern, handler)
    }

    pub fn options(&self, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.route(Method::Options, pattern, handler)
    }

    /// The handler that will serve `req`: the matching route's current
    /// wrapped handler, or one of the two fallbacks.
    pub fn handler_for(&self, req: &Request) -> BoxedHandler {
        match self.table.lookup(req.path(), req.method()) {
            Lookup::Found(route) => route.handler(),
            Lookup::NotFound => {
                trace!(method = req.method(), path = req.path(), "no route for path");
                Arc::clone(&self.not_found)
            }
            Lookup::MethodNotAllowed => {
                trace!(method = req.method(), path = req.path(), "method not registered for path");
                Arc::clone(&self.method_not_allowed)
            }
        }
    }

    /// Routes `req` and runs the chosen handler.
    pub async fn dispatch(&self, req: Request) -> Response {
        let handler = self.handler_for(&req);
        handler.call(req).await
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("table", &self.table).finish_non_exhaustive()
    }
}

async fn default_not_found(_req: Request) -> Response {
    Response::builder().status(StatusCode::NOT_FOUND).text("404 page not found")
}

async fn default_method_not_allowed(_req: Request) -> Response {
    Response::builder().status(StatusCode::METHOD_NOT_ALLOWED).text("405 method not allowed")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn hello(_req: Request) -> &'static str { "hello" }

    #[tokio::test]
    async fn default_fallbacks() {
        let router = Router::new();
        router.get("/hello", hello).unwrap();

        let res = router.dispatch(Request::new("GET", "/missing")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

        let res = router.dispatch(Request::new("POST", "/hello")).await;
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.body(), b"405 method not allowed");

        let res = router.dispatch(Request::new("GET", "/hello")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"hello");
    }

    #[tokio::test]
    async fn custom_fallbacks() {
        let router = Router::new()
            .not_found(|_req: Request| async { StatusCode::IM_A_TEAPOT })
            .method_not_allowed(|_req: Request| async { "nope" });
        router.put("/thing", hello).unwrap();

        assert_eq!(
            router.dispatch(Request::new("GET", "/other")).await.status_code(),
            StatusCode::IM_A_TEAPOT
        );
        assert_eq!(router.dispatch(Request::new("GET", "/thing")).await.body(), b"nope");
    }

    #[test]
    fn routers_sharing_a_table_see_each_other() {
        let a = Router::new();
        let b = Router::with_table(Arc::clone(a.table()));
        a.get("/x", hello).unwrap();
        assert!(b.get("/x", hello).is_err());
        assert_eq!(b.table().len(), 1);
    }
}
