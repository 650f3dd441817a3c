//! # Observability Tests Module
//!
//! Installs the Prometheus recorder once for this test binary and checks
//! that conversions and requests show up on `/metrics`.

mod test_helpers;

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use image_to_word::batch::process_batch;
use image_to_word::config::AppConfig;
use image_to_word::image_loader::UploadedImage;
use image_to_word::observability;
use image_to_word::ocr::OcrConfig;
use image_to_word::server::{create_router, AppState};
use metrics_exporter_prometheus::PrometheusHandle;
use test_helpers::{png_bytes, text_like_image, ScriptedRecognizer};
use tower::ServiceExt;

fn metrics_handle() -> PrometheusHandle {
    // A process can only hold one global recorder
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| observability::init_metrics().expect("recorder installs once"))
        .clone()
}

#[test]
fn test_batch_metrics_are_recorded() {
    let handle = metrics_handle();

    let engine = ScriptedRecognizer::texts(&["some text", "\x0c"]);
    let uploads = vec![
        UploadedImage::new("a.png", png_bytes(&text_like_image(40, 40))),
        UploadedImage::new("b.png", png_bytes(&text_like_image(40, 40))),
        UploadedImage::new("c.png", b"garbage".to_vec()),
    ];
    process_batch(uploads, &engine, &OcrConfig::default()).unwrap();
    process_batch(Vec::new(), &engine, &OcrConfig::default()).unwrap();

    let rendered = handle.render();
    assert!(rendered.contains(r#"images_processed_total{outcome="text"}"#));
    assert!(rendered.contains(r#"images_processed_total{outcome="no_text"}"#));
    assert!(rendered.contains(r#"images_processed_total{outcome="failed"}"#));
    assert!(rendered.contains(r#"batches_total{state="completed"}"#));
    assert!(rendered.contains(r#"batches_total{state="idle"}"#));
    assert!(rendered.contains("document_size_bytes"));
    assert!(rendered.contains("preprocess_duration_seconds"));
}

#[tokio::test]
async fn test_metrics_endpoint_serves_prometheus_text() {
    let handle = metrics_handle();
    observability::record_batch("idle");

    let state = AppState::new(
        &AppConfig::default(),
        Arc::new(ScriptedRecognizer::texts(&[])),
        Some(handle),
    );
    let response = create_router(state)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("batches_total"));
}

#[test]
fn test_spans_and_recorders_are_safe_to_call() {
    let _handle = metrics_handle();

    let span = observability::ocr_span("recognize");
    let _enter = span.enter();
    observability::record_ocr_metrics(false, std::time::Duration::from_millis(3));
    observability::record_image_outcome("failed");
    observability::record_document_size(0);
}
