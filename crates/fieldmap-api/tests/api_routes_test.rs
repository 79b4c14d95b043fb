//! Router-level tests driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fieldmap_api::{create_router, AppState};
use fieldmap_core::config::OverlaySettings;
use fieldmap_core::models::Boundary;
use fieldmap_raster::{GradientGenerator, MemoryRasterSource};
use serde_json::{json, Value};
use tower::ServiceExt;

const PROVIDER: &str = "https://tiles.test";

fn ring() -> Value {
    json!([[-47.0, -15.0], [-46.99, -15.0], [-46.99, -14.99], [-47.0, -14.99]])
}

fn settings(provider: Option<&str>) -> OverlaySettings {
    OverlaySettings {
        raster_base_url: provider.map(str::to_string),
        render_size: 32,
        ..Default::default()
    }
}

fn app_with(settings: OverlaySettings, source: MemoryRasterSource) -> Router {
    create_router(Arc::new(AppState::new(settings, Arc::new(source))))
}

fn app() -> Router {
    app_with(settings(None), MemoryRasterSource::new())
}

/// Any decodable PNG will do as provider imagery
fn provider_png() -> Vec<u8> {
    let boundary = Boundary::from_lng_lat(&[[-47.0, -15.0], [-46.99, -15.0], [-47.0, -14.99]]).unwrap();
    GradientGenerator::new(24)
        .gradient_for(0.9, &boundary, &boundary.bounding_box())
        .to_png()
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "fieldmap-api");
}

#[tokio::test]
async fn test_import_returns_envelope() {
    let feature = json!({
        "type": "Feature",
        "properties": { "COD_IMOVEL": "GO-5208707-XYZ", "NUM_AREA": "45,5" },
        "geometry": { "type": "Polygon", "coordinates": [[
            [-49.30, -16.70], [-49.29, -16.70], [-49.29, -16.69], [-49.30, -16.69], [-49.30, -16.70]
        ]] }
    });
    let (status, body) = send(app(), post_json("/api/v1/boundaries/import", &feature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["codImovel"], "GO-5208707-XYZ");
    assert_eq!(body["data"]["areaTotal"], 45.5);
    assert_eq!(body["boundaries"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_import_rejection_is_structured() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/boundaries/import")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_area_accepts_object_vertices() {
    let coordinates = json!([
        {"lat": -15.0, "lng": -47.0},
        {"lat": -15.0, "lng": -46.99},
        {"lat": -14.99, "lng": -46.99},
        {"lat": -14.99, "lng": -47.0}
    ]);
    let (status, body) = send(
        app(),
        post_json("/api/v1/boundaries/area", &json!({ "coordinates": coordinates, "geodesic": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, pairs) =
        send(app(), post_json("/api/v1/boundaries/area", &json!({ "coordinates": ring() }))).await;
    assert_eq!(body["areaHectares"], pairs["areaHectares"]);
    assert!(body["geodesicHectares"].is_number());
    assert!(pairs.get("geodesicHectares").is_none());
}

#[tokio::test]
async fn test_area_rejects_degenerate_ring() {
    let coordinates = json!([[-47.0, -15.0], [-46.99, -15.0]]);
    let (status, body) =
        send(app(), post_json("/api/v1/boundaries/area", &json!({ "coordinates": coordinates }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid boundary");
}

#[tokio::test]
async fn test_ndvi_endpoints() {
    let (status, legend) = send(app(), get("/api/v1/ndvi/legend")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(legend.as_array().unwrap().len(), 5);

    let (status, sample) = send(app(), get("/api/v1/ndvi/color?value=0.9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sample["colorClass"], "excellent");
    assert_eq!(sample["color"], "#1a9850");

    let (status, _) = send(app(), get("/api/v1/ndvi/color")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlay_with_provider_imagery() {
    let url = format!("{}/fields/f1/ndvi.png?palette=ndvi", PROVIDER);
    let source = MemoryRasterSource::new().with_image(url, provider_png());
    let app = app_with(settings(Some(PROVIDER)), source);

    let (status, body) =
        send(app, post_json("/api/v1/fields/f1/overlay", &json!({ "boundary": ring() }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completion"]["status"], "loaded");
    assert_eq!(body["state"]["state"], "loaded");

    let layers: Vec<&str> =
        body["layers"].as_array().unwrap().iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(layers, vec!["field-f1-fill", "field-f1-outline"]);

    let fill = &body["sources"]["field-f1-fill-src"];
    assert_eq!(fill["type"], "image");
    assert!(fill["url"].as_str().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(fill["coordinates"][0], json!([-47.0, -14.99]));
    assert_eq!(body["sources"]["field-f1-outline-src"]["type"], "geojson");
}

#[tokio::test]
async fn test_overlay_falls_back_without_imagery() {
    let app = app_with(settings(Some(PROVIDER)), MemoryRasterSource::new());
    let body = json!({ "boundary": ring(), "currentNdviValue": 0.3 });

    let (status, body) = send(app, post_json("/api/v1/fields/f2/overlay", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completion"]["status"], "fallback");
    assert_eq!(body["layers"].as_array().unwrap().len(), 2);
    assert_eq!(body["fitBounds"]["maxLat"], -14.99);
}

#[tokio::test]
async fn test_overlay_without_boundary_is_cleared() {
    let (status, body) = send(app(), post_json("/api/v1/fields/f3/overlay", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completion"]["status"], "cleared");
    assert_eq!(body["state"]["state"], "idle");
    assert!(body["layers"].as_array().unwrap().is_empty());
}
