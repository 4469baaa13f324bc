mod common;

use axum::routing::get;
use axum::{Json, Router};
use common::{cell, full_grid, ScriptedTransport};
use neurostream_core::config::AppConfig;
use neurostream_data::{BrainStatus, CellCoordinate, ConnectionStatus};
use neurostream_lib::App;
use std::time::{Duration, Instant};

fn app_with(config: AppConfig, probe: bool) -> (App<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::default();
    let client = probe.then(|| {
        reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("build client")
    });
    let app = App::with_transport(config, "test-pet", transport.clone(), client);
    (app, transport)
}

#[tokio::test]
async fn test_start_opens_stream_endpoint() {
    let mut config = AppConfig::default();
    config.stream.api_base_url = "http://brain.local/api/".to_string();
    let (mut app, transport) = app_with(config, false);

    app.start().await.expect("start");
    assert_eq!(
        transport.endpoints(),
        vec!["http://brain.local/api/pets/test-pet/brain/stream".to_string()]
    );
}

#[test]
fn test_tick_builds_pool_after_snapshot() {
    let (mut app, transport) = app_with(AppConfig::default(), false);
    app.session.open("http://brain.local/stream").expect("open");
    let start = Instant::now();

    transport.open();
    transport.message(&[cell(0, 0, 0.5)]);
    assert!(!app.tick(start));
    assert!(!app.renderer.is_established());

    transport.message(&full_grid(12, 10, 0.2));
    assert!(app.tick(start + Duration::from_millis(100)));
    assert_eq!(app.renderer.instances().len(), 120);
    assert_eq!(app.last_stats.visible, 120);
    assert_eq!(app.metrics.visible_instances(), 120);
    assert_eq!(app.metrics.counter("grid_established"), 1);

    transport.message(&[cell(3, 4, 0.9).with_firing(true)]);
    assert!(app.tick(start + Duration::from_millis(200)));
    let instance = app
        .renderer
        .instance_at(CellCoordinate::new(3, 4))
        .expect("slot");
    assert_eq!(instance.height, 2.0);
    assert_eq!(app.last_stats.firing, 1);
    assert_eq!(app.metrics.firing_instances(), 1);
}

#[test]
fn test_stray_coordinate_in_snapshot_does_not_size_pool() {
    let (mut app, transport) = app_with(AppConfig::default(), false);
    app.session.open("http://brain.local/stream").expect("open");
    let start = Instant::now();

    let mut snapshot = full_grid(10, 10, 0.2);
    snapshot.push(cell(u32::MAX - 1, u32::MAX - 1, 0.2));
    transport.open();
    transport.message(&snapshot);
    app.tick(start);

    assert_eq!(app.session.grid(), None);
    assert!(!app.renderer.is_established());
    assert_eq!(app.status().status, ConnectionStatus::Connected);

    transport.message(&full_grid(8, 8, 0.2));
    assert!(app.tick(start + Duration::from_millis(100)));
    assert_eq!(app.renderer.instances().len(), 64);
}

#[tokio::test]
async fn test_unavailable_brain_ends_session_without_streaming() {
    let router = Router::new().route(
        "/api/pets/:pet_id/brain/status",
        get(|| async {
            Json(BrainStatus {
                pet_id: "test-pet".to_string(),
                available: false,
                message: "Pet has passed away".to_string(),
                stage: None,
                evolution_path: None,
            })
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    let mut config = AppConfig::default();
    config.stream.api_base_url = format!("http://{addr}/api");
    let (mut app, transport) = app_with(config, true);

    app.start().await.expect("start");
    assert_eq!(transport.connect_count(), 0);
    let status = app.status();
    assert_eq!(status.status, ConnectionStatus::Error);
    assert_eq!(status.error_message.as_deref(), Some("Pet has passed away"));
}

#[tokio::test]
async fn test_unreachable_probe_still_opens_stream() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut config = AppConfig::default();
    config.stream.api_base_url = format!("http://{addr}/api");
    let (mut app, transport) = app_with(config, true);

    app.start().await.expect("start");
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(app.status().status, ConnectionStatus::Connecting);
}

#[test]
fn test_quit_requests_shutdown() {
    let (mut app, _transport) = app_with(AppConfig::default(), false);
    app.quit();
    assert!(!app.running);
    assert!(app.shutdown.is_shutdown_requested());
}
