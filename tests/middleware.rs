use std::sync::{Arc, Mutex};

use http::StatusCode;
use khan::middleware::{self, Next};
use khan::{BoxedMiddleware, Chain, Request, Response, Router};

type Log = Arc<Mutex<Vec<&'static str>>>;

fn tag(log: &Log, name: &'static str) -> BoxedMiddleware {
    let log = Arc::clone(log);
    middleware::from_fn(move |req: Request, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(name);
            next.run(req).await
        }
    })
}

fn recording_handler(log: &Log) -> impl khan::Handler + use<> {
    let log = Arc::clone(log);
    move |_req: Request| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push("handler");
            "ok"
        }
    }
}

fn take(log: &Log) -> Vec<&'static str> {
    std::mem::take(&mut *log.lock().unwrap())
}

#[tokio::test]
async fn later_route_middleware_runs_first() {
    let log = Log::default();
    let router = Router::new();
    let route = router.get("/r", recording_handler(&log)).unwrap();
    route.layer(tag(&log, "m1"));
    route.layer(tag(&log, "m2"));

    router.dispatch(Request::new("GET", "/r")).await;
    assert_eq!(take(&log), ["m2", "m1", "handler"]);
}

#[tokio::test]
async fn child_group_middleware_runs_before_parent() {
    let log = Log::default();
    let router = Router::new();
    let parent = router.group("/p", vec![tag(&log, "parent")]).unwrap();
    let child = parent.group("/c", vec![tag(&log, "child-1"), tag(&log, "child-2")]).unwrap();
    child.get("/r", recording_handler(&log)).unwrap();

    router.dispatch(Request::new("GET", "/p/c/r")).await;
    assert_eq!(take(&log), ["child-2", "child-1", "parent", "handler"]);
}

#[tokio::test]
async fn route_middleware_wraps_inherited_group_chain() {
    let log = Log::default();
    let router = Router::new();
    let group = router.group("/g", vec![tag(&log, "group")]).unwrap();
    let route = group.post("/r", recording_handler(&log)).unwrap();
    route.append_middleware([tag(&log, "route-a"), tag(&log, "route-b")]);

    assert_eq!(route.middleware_len(), 3);
    router.dispatch(Request::new("POST", "/g/r")).await;
    assert_eq!(take(&log), ["route-b", "route-a", "group", "handler"]);
}

#[tokio::test]
async fn group_middleware_does_not_leak_to_siblings_or_router_routes() {
    let log = Log::default();
    let router = Router::new();
    let guarded = router.group("/guarded", vec![tag(&log, "guard")]).unwrap();
    let open = router.group("/open", Chain::new()).unwrap();
    guarded.get("/r", recording_handler(&log)).unwrap();
    open.get("/r", recording_handler(&log)).unwrap();
    router.get("/r", recording_handler(&log)).unwrap();

    router.dispatch(Request::new("GET", "/open/r")).await;
    assert_eq!(take(&log), ["handler"]);
    router.dispatch(Request::new("GET", "/r")).await;
    assert_eq!(take(&log), ["handler"]);
    router.dispatch(Request::new("GET", "/guarded/r")).await;
    assert_eq!(take(&log), ["guard", "handler"]);
}

#[tokio::test]
async fn subgroups_copy_rather_than_share_the_parent_chain() {
    let log = Log::default();
    let router = Router::new();
    let parent = router.group("/p", vec![tag(&log, "parent")]).unwrap();
    let _one = parent.group("/one", vec![tag(&log, "one")]).unwrap();
    let two = parent.group("/two", vec![tag(&log, "two")]).unwrap();
    two.get("/r", recording_handler(&log)).unwrap();
    parent.get("/r", recording_handler(&log)).unwrap();

    router.dispatch(Request::new("GET", "/p/two/r")).await;
    assert_eq!(take(&log), ["two", "parent", "handler"]);
    router.dispatch(Request::new("GET", "/p/r")).await;
    assert_eq!(take(&log), ["parent", "handler"]);
}

#[tokio::test]
async fn fallbacks_bypass_route_middleware() {
    let log = Log::default();
    let router = Router::new();
    let group = router.group("/g", vec![tag(&log, "group")]).unwrap();
    group.get("/r", recording_handler(&log)).unwrap();

    let res = router.dispatch(Request::new("DELETE", "/g/r")).await;
    assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(take(&log).is_empty());
}

#[tokio::test]
async fn middleware_sees_request_and_response() {
    let stamp = middleware::from_fn(|mut req: Request, next: Next| async move {
        req.set_header("x-user", "alice");
        next.run(req).await.with_header("x-served-by", "khan")
    });
    let router = Router::new();
    router
        .get("/whoami", |req: Request| async move {
            Response::text(req.header("x-user").unwrap_or("anonymous").to_owned())
        })
        .unwrap()
        .layer(stamp);

    let res = router.dispatch(Request::new("GET", "/whoami")).await;
    assert_eq!(res.body(), b"alice");
    assert_eq!(res.header("x-served-by"), Some("khan"));
}

#[tokio::test]
async fn trace_middleware_passes_the_response_through() {
    let router = Router::new();
    router
        .get("/t", |_req: Request| async { StatusCode::ACCEPTED })
        .unwrap()
        .layer(middleware::trace());

    let res = router.dispatch(Request::new("GET", "/t")).await;
    assert_eq!(res.status_code(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn parent_group_middleware_misses_a_child_short_circuit() {
    let log = Log::default();
    let router = Router::new();
    let api = router.group("/api", vec![tag(&log, "api")]).unwrap();
    let deny = middleware::from_fn(|_req: Request, _next: Next| async { StatusCode::UNAUTHORIZED });
    let v1 = api.group("/v1", vec![deny]).unwrap();
    let route = v1.get("/x", recording_handler(&log)).unwrap();

    let res = router.dispatch(Request::new("GET", "/api/v1/x")).await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert!(take(&log).is_empty());

    // A route layer sits outside every group chain and sees the rejection.
    let seen = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&seen);
    route.layer(middleware::from_fn(move |req: Request, next: Next| {
        let slot = Arc::clone(&slot);
        async move {
            let res = next.run(req).await;
            *slot.lock().unwrap() = Some(res.status_code());
            res
        }
    }));
    route.layer(middleware::trace());

    let res = router.dispatch(Request::new("GET", "/api/v1/x")).await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(*seen.lock().unwrap(), Some(StatusCode::UNAUTHORIZED));
    assert!(take(&log).is_empty());
}
