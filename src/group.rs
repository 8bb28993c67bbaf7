//! Route groups: a shared path prefix plus a shared middleware chain.
//!
//! A group stores no children. Creating a subgroup or a route copies the
//! group's resolved prefix and chain and extends them; the result is an
//! independent value.
//!
//! ```rust
//! use khan::{Chain, Request, Router, middleware};
//!
//! # async fn list(_: Request) -> &'static str { "" }
//! let router = Router::new();
//! let api = router.group("/api", vec![middleware::trace()])?;
//! let v1 = api.group("v1/", Chain::new())?;
//! let route = v1.get("/users", list)?;
//! assert_eq!(route.pattern().as_str(), "/api/v1/users");
//! # Ok::<(), khan::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Chain};
use crate::pattern::Pattern;
use crate::route::Route;
use crate::table::RouteTable;

/// The resolved prefix and chain of a group, ancestors included.
///
/// Routes keep a reference to the scope they were created in.
pub struct Scope {
    prefix: Pattern,
    chain: Chain,
}

impl Scope {
    /// Full prefix, ancestor prefixes first. Empty for a group created with
    /// an empty prefix.
    pub fn prefix(&self) -> &Pattern { &self.prefix }

    /// Inherited middleware, parent entries first (innermost).
    pub fn chain(&self) -> &[BoxedMiddleware] { &self.chain }

    pub fn middleware_len(&self) -> usize { self.chain.len() }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("prefix", &self.prefix)
            .field("middleware", &self.chain.len())
            .finish()
    }
}

/// A factory for routes and subgroups sharing a prefix and middleware.
///
/// Cheap to clone: it is two `Arc`s.
#[derive(Clone, Debug)]
pub struct Group {
    table: Arc<RouteTable>,
    scope: Arc<Scope>,
}

impl Group {
    /// A top-level group registering into `table`.
    ///
    /// Usually reached through [`Router::group`](crate::Router::group).
    pub fn new(
        table: Arc<RouteTable>,
        prefix: &str,
        chain: impl IntoIterator<Item = BoxedMiddleware>,
    ) -> Result<Self> {
        let scope = Scope { prefix: Pattern::parse(prefix)?, chain: chain.into_iter().collect() };
        Ok(Self { table, scope: Arc::new(scope) })
    }

    /// A nested group.
    ///
    /// Its prefix is this group's prefix followed by `prefix`. Its chain is
    /// this group's chain followed by `chain`, so the parent's middleware
    /// ends up *inside* the child's: on the way in, the child's run first.
    pub fn group(
        &self,
        prefix: &str,
        chain: impl IntoIterator<Item = BoxedMiddleware>,
    ) -> Result<Group> {
        let own = Pattern::parse(prefix)?;
        let mut inherited = self.scope.chain.clone();
        inherited.extend(chain);
        let scope = Scope { prefix: self.scope.prefix.join(&own), chain: inherited };
        Ok(Group { table: Arc::clone(&self.table), scope: Arc::new(scope) })
    }

    pub fn scope(&self) -> &Scope { &self.scope }
    pub fn prefix(&self) -> &Pattern { &self.scope.prefix }

    /// Registers `handler` for `method` at this group's prefix + `pattern`,
    /// wrapped in the group's chain.
    pub fn route(&self, method: Method, pattern: &str, handler: impl Handler) -> Result<Arc<Route>> {
        self.table.add(Some(&self.scope), method, pattern, handler.into_boxed_handler())
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::middleware::{Next, from_fn};
    use crate::request::Request;

    fn noop() -> BoxedMiddleware {
        from_fn(|req: Request, next: Next| next.run(req))
    }

    async fn ok(_req: Request) -> &'static str { "ok" }

    #[test]
    fn nested_prefixes_concatenate() {
        let table = Arc::new(RouteTable::new());
        let a = Group::new(Arc::clone(&table), "/a", Chain::new()).unwrap();
        let b = a.group("b/", Chain::new()).unwrap();
        assert_eq!(b.prefix().as_str(), "/a/b");

        let route = b.get("/c", ok).unwrap();
        assert_eq!(route.pattern().as_str(), "/a/b/c");
        assert_eq!(route.group().unwrap().prefix().as_str(), "/a/b");
        assert!(table.get("/a/b/c", Method::Get).is_some());
    }

    #[test]
    fn chains_accumulate_parent_first() {
        let table = Arc::new(RouteTable::new());
        let parent = Group::new(table, "", vec![noop()]).unwrap();
        let child = parent.group("/x", vec![noop(), noop()]).unwrap();

        assert_eq!(parent.scope().middleware_len(), 1);
        assert_eq!(child.scope().middleware_len(), 3);
        assert!(Arc::ptr_eq(&parent.scope().chain()[0], &child.scope().chain()[0]));
        assert_eq!(child.post("/y", ok).unwrap().middleware_len(), 3);
    }

    #[test]
    fn group_root_route_takes_the_prefix() {
        let table = Arc::new(RouteTable::new());
        let api = Group::new(Arc::clone(&table), "/api", Chain::new()).unwrap();
        assert_eq!(api.get("/", ok).unwrap().pattern().as_str(), "/api");

        let root = Group::new(table, "", Chain::new()).unwrap();
        assert_eq!(root.get("", ok).unwrap().pattern().as_str(), "/");
    }

    #[test]
    fn sibling_groups_collide_in_the_shared_table() {
        let table = Arc::new(RouteTable::new());
        let one = Group::new(Arc::clone(&table), "/v1", Chain::new()).unwrap();
        let two = Group::new(table, "v1", Chain::new()).unwrap();
        one.delete("/x", ok).unwrap();
        assert!(matches!(two.delete("x", ok), Err(Error::DuplicateRoute { .. })));
        two.options("x", ok).unwrap();
        two.put("x", ok).unwrap();
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        let table = Arc::new(RouteTable::new());
        assert!(matches!(
            Group::new(Arc::clone(&table), "/a b", Chain::new()),
            Err(Error::InvalidPattern(_))
        ));
        let ok_group = Group::new(table, "/a", Chain::new()).unwrap();
        assert!(ok_group.group("c d", Chain::new()).is_err());
    }
}
