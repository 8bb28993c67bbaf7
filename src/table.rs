//! The route table: pattern → method → route.
//!
//! One instance per router, shared by the router and every group created
//! from it. Exact string match only: a `HashMap` lookup per level, no trees,
//! no parameters.
//!
//! Writes take the single write lock for the whole check-and-insert, so two
//! threads racing to register the same pair cannot both succeed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{Error, Result};
use crate::group::Scope;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::middleware::Chain;
use crate::pattern::Pattern;
use crate::route::Route;

/// Outcome of [`RouteTable::lookup`].
#[derive(Debug)]
pub enum Lookup {
    Found(Arc<Route>),
    /// No route under this path at all.
    NotFound,
    /// The path exists, but not for this method.
    MethodNotAllowed,
}

/// Registered routes, keyed by canonical pattern and then method.
#[derive(Default)]
pub struct RouteTable {
    routes: RwLock<HashMap<String, HashMap<Method, Arc<Route>>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `route` under its own (pattern, method).
    ///
    /// Fails with [`Error::DuplicateRoute`] if the pair is taken; the
    /// existing entry is left untouched.
    pub(crate) fn register(&self, route: Route) -> Result<Arc<Route>> {
        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        let by_method = routes.entry(route.pattern().as_str().to_owned()).or_default();
        if by_method.contains_key(&route.method()) {
            return Err(Error::DuplicateRoute {
                method: route.method(),
                pattern: route.pattern().as_str().to_owned(),
            });
        }

        let route = Arc::new(route);
        by_method.insert(route.method(), Arc::clone(&route));
        debug!(
            method = %route.method(),
            pattern = %route.pattern(),
            middleware = route.middleware_len(),
            "route registered"
        );
        Ok(route)
    }

    /// Shared registration path for routers and groups.
    ///
    /// `raw` is normalized and appended to the scope's prefix; the scope's
    /// chain is composed around `handler`.
    pub(crate) fn add(
        &self,
        scope: Option<&Arc<Scope>>,
        method: Method,
        raw: &str,
        handler: BoxedHandler,
    ) -> Result<Arc<Route>> {
        let own = Pattern::parse(raw)?;
        let (pattern, chain) = match scope {
            Some(scope) => (scope.prefix().join(&own), scope.chain().to_vec()),
            None => (own, Chain::new()),
        };
        let route = Route::new(pattern.or_root(), method, handler, scope.cloned(), chain);
        self.register(route)
    }

    /// Finds the route for a request path and raw method string.
    ///
    /// `path` is compared as-is; it is not normalized. A method string
    /// outside the routable set counts as "method not allowed" when the path
    /// exists.
    pub fn lookup(&self, path: &str, method: &str) -> Lookup {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let Some(by_method) = routes.get(path) else {
            return Lookup::NotFound;
        };
        method
            .parse::<Method>()
            .ok()
            .and_then(|m| by_method.get(&m))
            .map_or(Lookup::MethodNotAllowed, |route| Lookup::Found(Arc::clone(route)))
    }

    /// The route registered for exactly this canonical pattern and method.
    pub fn get(&self, pattern: &str, method: Method) -> Option<Arc<Route>> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.get(pattern)?.get(&method).cloned()
    }

    /// Methods registered under `path`, sorted. Empty if the path is unknown.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let mut methods: Vec<Method> = routes
            .get(path)
            .map(|by_method| by_method.keys().copied().collect())
            .unwrap_or_default();
        methods.sort_unstable();
        methods
    }

    /// Snapshot of every route, sorted by pattern then method.
    pub fn routes(&self) -> Vec<Arc<Route>> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Arc<Route>> = routes.values().flat_map(|m| m.values().cloned()).collect();
        all.sort_by(|a, b| (a.pattern(), a.method()).cmp(&(b.pattern(), b.method())));
        all
    }

    /// Number of registered (pattern, method) pairs.
    pub fn len(&self) -> usize {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable").field("routes", &self.len()).finish()
    }
}
