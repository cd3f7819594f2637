use crate::metrics;
use crate::twoface::{json_error_handler, Cause, Describe, ExternalError, Fallible};
use actix_web::{web, HttpRequest, HttpResponse};
use anyhow::anyhow;
use std::future::Future;
use std::time::Instant;

pub mod posts;

/// Everything a handler needs, shared between actix workers.
#[derive(Clone)]
pub struct State<DS> {
    pub ds: DS,
}

/// JSON extraction settings for every endpoint: a body size cap, and twoface errors on failure.
pub fn json_config(max_body_size: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_body_size)
        .error_handler(json_error_handler)
}

/// Fallback for any route the blog doesn't serve.
pub async fn not_found(req: HttpRequest) -> Fallible<HttpResponse> {
    Err(
        anyhow!("no route for {} {}", req.method(), req.path()).describe(ExternalError {
            cause: Cause::NotFound,
            text: "Route does not exist",
        }),
    )
}

/// Execute the closure, then log its operational metrics, e.g. time taken, whether it returned Ok/Err, etc.
async fn observe<F, Fut, R>(name: &'static str, f: F) -> Fallible<R>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Fallible<R>>,
{
    let start = Instant::now();
    let return_val = f().await;
    let duration = start.elapsed();
    metrics::HANDLER_SECS
        .with_label_values(&[name])
        .observe(duration.as_secs_f64());
    metrics::RESPONSES
        .with_label_values(&[name, variant_name(&return_val)])
        .inc();
    return_val
}

fn variant_name<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "err"
    }
}
