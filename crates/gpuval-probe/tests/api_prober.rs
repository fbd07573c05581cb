//! `ApiProber` against a local `tiny_http` server.

use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use gpuval_probe::{ApiProber, MONITORED_ENDPOINTS};
use pretty_assertions::assert_eq;

/// Serve `requests` requests, answering 500 for `/gpu/allocations` and 200
/// for everything else. Requested paths are sent back over the channel.
fn spawn_monitor(requests: usize) -> (String, mpsc::Receiver<String>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for request in server.incoming_requests().take(requests) {
            let path = request.url().to_string();
            let status = if path.ends_with("/gpu/allocations") { 500 } else { 200 };
            let _ = tx.send(path);
            let _ = request.respond(tiny_http::Response::from_string("{}").with_status_code(status));
        }
    });
    (format!("http://127.0.0.1:{port}/k8s-monitor/api/v1/"), rx)
}

fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn probes_every_endpoint_in_order() {
    let (base_url, paths) = spawn_monitor(MONITORED_ENDPOINTS.len());
    let prober = ApiProber::new(&base_url, Duration::from_secs(5)).unwrap();

    let results = prober.probe_all().await;

    let summary: Vec<_> = results
        .iter()
        .map(|r| (r.endpoint.as_str(), r.reachable, r.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("/gpu/overview", true, Some(200)),
            ("/gpu/devices", true, Some(200)),
            ("/gpu/metrics/usage-statistics", true, Some(200)),
            ("/gpu/allocations", false, Some(500)),
            ("/gpu/mig/available", true, Some(200)),
            ("/gpu/cost/analysis", true, Some(200)),
        ]
    );
    assert!(results.iter().all(|r| r.error.is_none()));

    let requested: Vec<_> = paths.try_iter().collect();
    assert_eq!(requested[0], "/k8s-monitor/api/v1/gpu/overview");
    assert_eq!(requested.len(), MONITORED_ENDPOINTS.len());
}

#[tokio::test]
async fn connection_refused_is_recorded_not_raised() {
    let base_url = format!("http://127.0.0.1:{}/api", unused_port());
    let prober = ApiProber::new(&base_url, Duration::from_secs(2)).unwrap();

    let result = prober.check_endpoint("/gpu/devices").await;

    assert_eq!(result.endpoint, "/gpu/devices");
    assert!(!result.reachable);
    assert_eq!(result.status, None);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            thread::sleep(Duration::from_secs(2));
            let _ = request.respond(tiny_http::Response::from_string("late"));
        }
    });
    let prober =
        ApiProber::new(&format!("http://127.0.0.1:{port}"), Duration::from_millis(200)).unwrap();

    let result = prober.check_endpoint("/gpu/overview").await;

    assert!(!result.reachable);
    assert!(result.error.is_some());
}
