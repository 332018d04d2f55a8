//! The monitoring endpoint served when profiling is enabled: liveness,
//! readiness and a Prometheus metrics snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use warp::Filter;

/// Spawns the monitoring server on `addr`.
pub async fn spawn_server(
    addr: impl Into<std::net::SocketAddr> + 'static,
    readiness: Arc<AtomicBool>,
    prometheus_handle: Arc<PrometheusHandle>,
) -> tokio::task::JoinHandle<()> {
    let server = warp::serve(routes(readiness, prometheus_handle)).bind(addr);
    tokio::spawn(server)
}

fn routes(
    readiness: Arc<AtomicBool>,
    prometheus_handle: Arc<PrometheusHandle>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // `/health` is unconditional liveness; `/ready` flips once startup
    // completed.
    let health = warp::get().and(warp::path!("health")).map(warp::reply);

    let ready = warp::get().and(warp::path!("ready")).map(move || {
        match readiness.load(Ordering::Relaxed) {
            true => warp::http::StatusCode::OK,
            false => warp::http::StatusCode::SERVICE_UNAVAILABLE,
        }
    });

    let metrics = warp::get()
        .and(warp::path!("metrics"))
        .map(move || prometheus_handle.render());

    health.or(ready).or(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    lazy_static::lazy_static! {
        static ref PROMETHEUS_HANDLE: Arc<PrometheusHandle> =
            Arc::new(PrometheusBuilder::new().install_recorder().unwrap());
    }

    #[tokio::test]
    async fn health() {
        let readiness = Arc::new(AtomicBool::new(false));
        let filter = routes(readiness, PROMETHEUS_HANDLE.clone());
        let response = warp::test::request().path("/health").reply(&filter).await;
        assert_eq!(response.status(), warp::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_follows_the_flag() {
        let readiness = Arc::new(AtomicBool::new(false));
        let filter = routes(readiness.clone(), PROMETHEUS_HANDLE.clone());

        let response = warp::test::request().path("/ready").reply(&filter).await;
        assert_eq!(
            response.status(),
            warp::http::StatusCode::SERVICE_UNAVAILABLE
        );

        readiness.store(true, Ordering::Relaxed);
        let response = warp::test::request().path("/ready").reply(&filter).await;
        assert_eq!(response.status(), warp::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_snapshot() {
        let counter = metrics::register_counter!("kestrel_test_counter");
        counter.increment(3);

        let readiness = Arc::new(AtomicBool::new(false));
        let filter = routes(readiness, PROMETHEUS_HANDLE.clone());
        let response = warp::test::request().path("/metrics").reply(&filter).await;

        assert_eq!(response.status(), warp::http::StatusCode::OK);
        let body = String::from_utf8_lossy(response.body());
        assert!(body.contains("kestrel_test_counter 3"));
    }
}
