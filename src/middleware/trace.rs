use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::{BoxedMiddleware, Next, from_fn};
use crate::request::Request;

/// Per-request span with method and path, closed by one event carrying the
/// response status and latency.
///
/// Only layers *inside* it are timed, and a layer outside it that answers on
/// its own is never seen. To cover everything, make it the last entry of the
/// innermost chain, or attach it to the route with
/// [`Route::layer`](crate::Route::layer). A parent group's chain sits inside
/// every child group's chain, so `trace()` on the outermost group runs last
/// on the way in, not first.
pub fn trace() -> BoxedMiddleware {
    from_fn(|req: Request, next: Next| {
        let span = info_span!("request", method = %req.method(), path = %req.path());
        async move {
            let started = Instant::now();
            let res = next.run(req).await;
            info!(
                status = res.status_code().as_u16(),
                latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
                "request completed"
            );
            res
        }
        .instrument(span)
    })
}
