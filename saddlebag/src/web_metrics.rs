use std::future::ready;
use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const REQUEST_DURATION: &str = "saddlebag_http_requests_duration_seconds";
const SEARCH_DURATION: &str = "saddlebag_search_duration_seconds";

pub(crate) async fn track_metrics(req: Request, next: Next) -> impl IntoResponse {
    let start = Instant::now();
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        "unmatched".to_owned()
    };
    let method = req.method().clone();
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("path", path),
        ("status", status),
    ];

    metrics::counter!("saddlebag_http_requests_total", &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION, &labels).record(latency);

    response
}

fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    const EXPONENTIAL_SECONDS: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];
    // backend searches can run up to the client timeout
    const SEARCH_SECONDS: &[f64] = &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            EXPONENTIAL_SECONDS,
        )?
        .set_buckets_for_metric(Matcher::Full(SEARCH_DURATION.to_string()), SEARCH_SECONDS)?
        .install_recorder()
}

fn metrics_app() -> Result<Router, BuildError> {
    let recorder_handle = setup_metrics_recorder()?;
    Ok(Router::new().route("/metrics", get(move || ready(recorder_handle.render()))))
}

/// Serves `/metrics` on its own port, away from the public site
pub(crate) async fn start_metrics_server(port: u16) -> anyhow::Result<()> {
    let app = metrics_app()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::debug!("metrics listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
