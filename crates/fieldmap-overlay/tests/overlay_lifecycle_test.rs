//! Overlay lifecycle against an in-memory surface and scripted raster sources

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fieldmap_core::config::OverlaySettings;
use fieldmap_core::error::Result;
use fieldmap_core::models::{Boundary, FieldRecord};
use fieldmap_core::ports::{MapSurface, SourceSpec};
use fieldmap_overlay::{
    Completion, InMemoryMapSurface, OverlayHandle, OverlayOrchestrator, OverlayState,
};
use fieldmap_raster::{RasterClipper, RasterSource};
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::sync::Notify;

const PROVIDER: &str = "http://provider.test";

fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(32, 32, Rgba([20, 150, 80, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn field(id: &str, lng: f64) -> FieldRecord {
    let boundary = Boundary::from_lng_lat(&[
        [lng, -15.0],
        [lng + 0.01, -15.0],
        [lng + 0.01, -14.99],
        [lng, -14.99],
    ])
    .unwrap();
    FieldRecord::new(id, Some(boundary)).with_ndvi(0.55)
}

/// Holds fetches for URLs containing `gated` until released
struct GatedSource {
    gated: &'static str,
    started: Arc<Notify>,
    release: Arc<Notify>,
    png: Vec<u8>,
}

#[async_trait]
impl RasterSource for GatedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.contains(self.gated) {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(self.png.clone())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Never answers
struct SilentSource;

#[async_trait]
impl RasterSource for SilentSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "silent"
    }
}

fn settings(timeout_ms: u64) -> OverlaySettings {
    OverlaySettings {
        raster_base_url: Some(PROVIDER.to_string()),
        fetch_timeout: Duration::from_millis(timeout_ms),
        render_size: 32,
        ..Default::default()
    }
}

fn handle<S: RasterSource>(source: S, timeout_ms: u64) -> OverlayHandle<InMemoryMapSurface, S> {
    let orchestrator = OverlayOrchestrator::new(InMemoryMapSurface::new(), settings(timeout_ms));
    OverlayHandle::new(orchestrator, RasterClipper::new(source))
}

#[tokio::test]
async fn test_late_result_does_not_overwrite_newer_selection() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let source = GatedSource {
        gated: "/fields/a/",
        started: Arc::clone(&started),
        release: Arc::clone(&release),
        png: png(),
    };
    let overlay = handle(source, 5_000);

    let first = overlay.clone();
    let pending_a = tokio::spawn(async move { first.show_field(&field("a", -47.0)).await });
    started.notified().await;

    let b = overlay.show_field(&field("b", -46.5)).await.unwrap();
    assert_eq!(b, Completion::Loaded);

    release.notify_one();
    let a = pending_a.await.unwrap().unwrap();
    assert_eq!(a, Completion::Stale);

    let (ids, a_sources) = overlay
        .with_surface(|surface| {
            let ids: Vec<String> = surface.layer_ids().iter().map(|s| s.to_string()).collect();
            (ids, surface.has_source("field-a-fill-src") || surface.has_source("field-a-outline-src"))
        })
        .await;
    assert_eq!(ids, vec!["field-b-fill", "field-b-outline"]);
    assert!(!a_sources);
    assert!(matches!(overlay.state().await, OverlayState::Loaded { .. }));
}

#[tokio::test]
async fn test_timeout_falls_back_to_gradient() {
    let overlay = handle(SilentSource, 50);

    let completion = overlay.show_field(&field("slow", -47.0)).await.unwrap();
    match completion {
        Completion::Fallback { reason } => assert!(reason.contains("50 ms"), "{}", reason),
        other => panic!("expected fallback, got {:?}", other),
    }

    let fill_is_data_url = overlay
        .with_surface(|surface| match surface.source("field-slow-fill-src") {
            Some(SourceSpec::Image { url, .. }) => url.starts_with("data:image/png;base64,"),
            _ => false,
        })
        .await;
    assert!(fill_is_data_url);
    assert!(overlay.with_surface(|s| s.has_layer("field-slow-outline")).await);
}

#[tokio::test]
async fn test_fill_and_fallback_share_placement() {
    let loaded = handle(
        GatedSource {
            gated: "never",
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            png: png(),
        },
        1_000,
    );
    let fallback = handle(SilentSource, 20);
    let record = field("f", -47.0);

    assert_eq!(loaded.show_field(&record).await.unwrap(), Completion::Loaded);
    assert!(matches!(fallback.show_field(&record).await.unwrap(), Completion::Fallback { .. }));

    let corners = |surface: &InMemoryMapSurface| match surface.source("field-f-fill-src") {
        Some(SourceSpec::Image { coordinates, .. }) => Some(*coordinates),
        _ => None,
    };
    let a = loaded.with_surface(corners).await;
    let b = fallback.with_surface(corners).await;
    assert!(a.is_some());
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_field_without_boundary_is_cleared() {
    let overlay = handle(SilentSource, 20);
    overlay.show_field(&field("a", -47.0)).await.unwrap();

    let completion = overlay.show_field(&FieldRecord::new("empty", None)).await.unwrap();
    assert_eq!(completion, Completion::Cleared);
    assert!(overlay.with_surface(|s| s.layers().is_empty()).await);
    assert_eq!(overlay.state().await, OverlayState::Idle);
}
