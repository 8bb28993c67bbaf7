//! A single registered endpoint.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::group::Scope;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Chain, compose};
use crate::pattern::Pattern;

/// A registered (pattern, method) endpoint.
///
/// Returned by every registration call so more middleware can be attached
/// afterwards:
///
/// ```rust
/// # use khan::{Request, Router, middleware};
/// # async fn list_users(_: Request) -> &'static str { "" }
/// let router = Router::new();
/// router.get("/users", list_users)?.layer(middleware::trace());
/// # Ok::<(), khan::Error>(())
/// ```
///
/// The unwrapped handler is kept for the route's whole life. Appending
/// middleware recomposes the full chain around it and publishes the result
/// as one new handler, so a concurrent dispatch sees either the old stack or
/// the new one, never a half-built mix.
pub struct Route {
    pattern: Pattern,
    method: Method,
    original: BoxedHandler,
    group: Option<Arc<Scope>>,
    chain: Mutex<Chain>,
    handler: RwLock<BoxedHandler>,
}

impl Route {
    pub(crate) fn new(
        pattern: Pattern,
        method: Method,
        original: BoxedHandler,
        group: Option<Arc<Scope>>,
        chain: Chain,
    ) -> Self {
        let handler = compose(&original, &chain);
        Self {
            pattern,
            method,
            original,
            group,
            chain: Mutex::new(chain),
            handler: RwLock::new(handler),
        }
    }

    pub fn pattern(&self) -> &Pattern { &self.pattern }
    pub fn method(&self) -> Method { self.method }

    /// The group this route was registered through, `None` for routes
    /// registered on the router directly.
    pub fn group(&self) -> Option<&Scope> {
        self.group.as_deref()
    }

    /// Number of middleware currently wrapped around the handler, inherited
    /// ones included.
    pub fn middleware_len(&self) -> usize {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The handler dispatch will call: the original wrapped in the current chain.
    pub fn handler(&self) -> BoxedHandler {
        let handler = self.handler.read().unwrap_or_else(PoisonError::into_inner);
        BoxedHandler::clone(&handler)
    }

    /// Appends `chain` and rebuilds the handler.
    ///
    /// Each appended middleware wraps everything registered before it, so it
    /// runs *earlier* on the way in.
    pub fn append_middleware(&self, chain: impl IntoIterator<Item = BoxedMiddleware>) -> &Self {
        // Held across the publish so concurrent appends publish in chain order.
        let mut current = self.chain.lock().unwrap_or_else(PoisonError::into_inner);
        current.extend(chain);
        let rebuilt = compose(&self.original, &current);
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = rebuilt;
        self
    }

    /// Appends a single middleware. See [`append_middleware`](Self::append_middleware).
    pub fn layer(&self, middleware: BoxedMiddleware) -> &Self {
        self.append_middleware([middleware])
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("method", &self.method)
            .field("group", &self.group.as_ref().map(|g| g.prefix()))
            .field("middleware", &self.middleware_len())
            .finish()
    }
}
