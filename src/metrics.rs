lazy_static! {

    pub static ref HANDLER_SECS: prometheus::HistogramVec = register_histogram_vec!(
        "cryptoblog_handler_secs",
        "Seconds taken for each response, partitioned by endpoint name",
        &["endpoint_name"],
        vec![0.001, 0.01, 0.1, 1.0, 4.0] // Prometheus buckets
    )
    .expect("couldn't make HANDLER_SECS");

    pub static ref RESPONSES: prometheus::IntCounterVec = register_int_counter_vec!(
        "cryptoblog_responses",
        "How many responses of Ok/Err per endpoint",
        &["endpoint_name", "result"]
    )
    .expect("couldn't make RESPONSES");

    pub static ref HTTP_RESPONSES: prometheus::IntCounterVec = register_int_counter_vec!(
        "cryptoblog_http_responses",
        "Count of each HTTP status code served by the blog API",
        &["status"]
    )
    .expect("couldn't make HTTP_RESPONSES");
}

pub mod endpoint {
    use actix_web::{http, HttpResponse};
    use prometheus::Encoder;

    pub async fn gather() -> HttpResponse {
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = vec![];
        let metric_families = prometheus::gather();
        match encoder.encode(&metric_families, &mut buffer) {
            Ok(()) => HttpResponse::build(http::StatusCode::OK)
                .content_type(encoder.format_type())
                .body(buffer),
            Err(e) => {
                let message = format!("{:?}", e);
                HttpResponse::build(http::StatusCode::INTERNAL_SERVER_ERROR).body(message)
            }
        }
    }
}
