use std::fs::{self, File};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use http_body_util::BodyExt;
use reel_axum::ReelApp;
use reel_stream::{
    ByteRange, ContentStreamAdapter, LocalStore, ObjectMetadata, StreamConfig, StreamError,
    StreamResult, StreamedContent, StreamingAdapter,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BASE: &str = "/api/v1/videos";
const EARTH_SIZE: u64 = 873682;
const PARK_SIZE: u64 = 21657943;

struct Fixture {
    _dir: TempDir,
    app: ReelApp,
}

fn fixture() -> Fixture {
    fixture_at(BASE)
}

fn fixture_at(base_path: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("earth-spinning.mp4"),
        (0..EARTH_SIZE).map(|i| (i % 251) as u8).collect::<Vec<u8>>(),
    )
    .unwrap();
    File::create(dir.path().join("park.mp4"))
        .unwrap()
        .set_len(PARK_SIZE)
        .unwrap();

    let adapter = StreamingAdapter::new(LocalStore::new(dir.path()), StreamConfig::default());
    Fixture {
        app: ReelApp::new(Arc::new(adapter), base_path),
        _dir: dir,
    }
}

/// Every call fails in the backing store
struct Unavailable;

fn unavailable() -> StreamError {
    StreamError::backend(std::io::Error::other("bucket unreachable: secret-host:9000"))
}

#[async_trait::async_trait]
impl ContentStreamAdapter for Unavailable {
    async fn load_content(&self, _key: &str, _range: Option<ByteRange>) -> StreamResult<StreamedContent> {
        Err(unavailable())
    }

    async fn content_metadata(&self, _key: &str) -> StreamResult<ObjectMetadata> {
        Err(unavailable())
    }

    async fn list_all_content_metadata(&self) -> StreamResult<Vec<ObjectMetadata>> {
        Err(unavailable())
    }
}

async fn get(app: &ReelApp, uri: &str, range: Option<&str>) -> axum::response::Response {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(range) = range {
        req = req.header("range", range);
    }
    app.router
        .clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn header<'a>(res: &'a axum::response::Response, name: &str) -> &'a str {
    res.headers().get(name).unwrap().to_str().unwrap()
}

async fn body_bytes(res: axum::response::Response) -> Vec<u8> {
    res.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn json_body(res: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(res).await).unwrap()
}

#[tokio::test]
async fn lists_every_video() {
    let fx = fixture();
    let res = get(&fx.app, BASE, None).await;

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    let listing = body.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0]["key"], "earth-spinning.mp4");
    assert_eq!(listing[0]["contentType"], "video/mp4");
    assert_eq!(listing[0]["fileSize"], EARTH_SIZE);
}

#[tokio::test]
async fn small_video_without_range_is_served_whole() {
    let fx = fixture();
    let res = get(&fx.app, &format!("{BASE}/earth-spinning.mp4"), None).await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(header(&res, "content-type"), "video/mp4");
    assert_eq!(header(&res, "accept-ranges"), "bytes");
    assert_eq!(header(&res, "content-length"), "873682");
    assert_eq!(header(&res, "content-range"), "bytes 0-873681/873682");
    assert_eq!(body_bytes(res).await.len() as u64, EARTH_SIZE);
}

#[tokio::test]
async fn explicit_range_is_partial_content() {
    let fx = fixture();
    let res = get(
        &fx.app,
        &format!("{BASE}/earth-spinning.mp4"),
        Some("bytes=0-436841"),
    )
    .await;

    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(header(&res, "content-length"), "436842");
    assert_eq!(header(&res, "content-range"), "bytes 0-436841/873682");
    assert_eq!(body_bytes(res).await.len(), 436842);
}

#[tokio::test]
async fn malformed_range_is_treated_as_absent() {
    let fx = fixture();
    let res = get(
        &fx.app,
        &format!("{BASE}/earth-spinning.mp4"),
        Some("bytessomething"),
    )
    .await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(header(&res, "content-range"), "bytes 0-873681/873682");
}

#[tokio::test]
async fn large_video_is_served_one_chunk_at_a_time() {
    let fx = fixture();
    let res = get(&fx.app, &format!("{BASE}/park.mp4"), None).await;

    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(header(&res, "content-length"), "1048576");
    assert_eq!(header(&res, "content-range"), "bytes 0-1048575/21657943");
    assert_eq!(body_bytes(res).await.len(), 1048576);

    let res = get(&fx.app, &format!("{BASE}/park.mp4"), Some("bytes=21000000-")).await;
    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(header(&res, "content-range"), "bytes 21000000-21657942/21657943");
    assert_eq!(body_bytes(res).await.len(), 657943);
}

#[tokio::test]
async fn metadata_and_size_routes() {
    let fx = fixture();

    let res = get(&fx.app, &format!("{BASE}/earth-spinning.mp4/size"), None).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(body_bytes(res).await, b"873682");

    let res = get(&fx.app, &format!("{BASE}/park.mp4/metadata"), None).await;
    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body["key"], "park.mp4");
    assert_eq!(body["contentType"], "video/mp4");
    assert_eq!(body["fileSize"], PARK_SIZE);
}

#[tokio::test]
async fn missing_video_is_not_found_on_every_route() {
    let fx = fixture();

    for uri in [
        format!("{BASE}/missing-video.mp4"),
        format!("{BASE}/missing-video.mp4/metadata"),
        format!("{BASE}/missing-video.mp4/size"),
    ] {
        let res = get(&fx.app, &uri, None).await;
        assert_eq!(res.status().as_u16(), 404, "{uri}");
        let body = json_body(res).await;
        assert_eq!(body["name"], "NotFound");
        assert_eq!(body["code"], 404);
        assert_eq!(body["className"], "not-found");
    }
}

#[tokio::test]
async fn start_past_end_is_range_not_satisfiable() {
    let fx = fixture();
    let res = get(
        &fx.app,
        &format!("{BASE}/earth-spinning.mp4"),
        Some("bytes=873682-"),
    )
    .await;

    assert_eq!(res.status().as_u16(), 416);
    assert_eq!(header(&res, "content-range"), "bytes */873682");
    let body = json_body(res).await;
    assert_eq!(body["name"], "RangeNotSatisfiable");
    assert_eq!(body["code"], 416);
}

#[tokio::test]
async fn backend_failures_are_general_errors_without_details() {
    let app = ReelApp::new(Arc::new(Unavailable), "/");

    for uri in ["/", "/clip.mp4", "/clip.mp4/metadata", "/clip.mp4/size"] {
        let res = get(&app, uri, None).await;
        assert_eq!(res.status().as_u16(), 500, "{uri}");
        let body = json_body(res).await;
        assert_eq!(body["name"], "GeneralError");
        assert_eq!(body["className"], "general-error");
        assert!(!body["message"].as_str().unwrap().contains("secret-host"));
    }
}

#[tokio::test]
async fn request_id_is_generated_or_preserved() {
    let fx = fixture();
    let res = get(&fx.app, &format!("{BASE}/earth-spinning.mp4/size"), None).await;
    assert!(res.headers().get("x-request-id").is_some());

    let provided = HeaderValue::from_static("req-test-123");
    let res = fx
        .app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("{BASE}/earth-spinning.mp4/size"))
                .header("x-request-id", provided.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}

#[tokio::test]
async fn routes_are_only_served_under_the_base_path() {
    let fx = fixture();
    let res = get(&fx.app, "/earth-spinning.mp4", None).await;
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn base_path_without_leading_slash_is_mounted() {
    let fx = fixture_at("videos/");

    let res = get(&fx.app, "/videos/earth-spinning.mp4/size", None).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(body_bytes(res).await, b"873682");

    let res = get(&fx.app, "/videos", None).await;
    assert_eq!(res.status().as_u16(), 200);
}
