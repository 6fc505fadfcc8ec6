use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use reel_stream::{ContentResponse, ObjectMetadata};

use crate::{params::range_from_headers, ReelAxumError, ReelState};

/// Routes for one content collection, mountable under any prefix:
///
/// - `GET /` - metadata of every object
/// - `GET /{key}` - one chunk of the object, honoring `Range`
/// - `GET /{key}/metadata` - metadata of one object
/// - `GET /{key}/size` - size of one object in bytes
pub fn content_router(state: ReelState) -> Router<()> {
    Router::new()
        .route("/", routing::get(list_metadata))
        .route("/{key}", routing::get(content))
        .route("/{key}/metadata", routing::get(metadata))
        .route("/{key}/size", routing::get(size))
        .with_state(state)
}

async fn list_metadata(
    State(state): State<ReelState>,
) -> Result<Json<Vec<ObjectMetadata>>, ReelAxumError> {
    let listing = state.adapter.list_all_content_metadata().await?;
    Ok(Json(listing))
}

async fn content(
    State(state): State<ReelState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ReelAxumError> {
    let range = range_from_headers(&headers);
    let content = state.adapter.load_content(&key, Some(range)).await?;
    Ok(into_http_response(content.into_response()))
}

async fn metadata(
    State(state): State<ReelState>,
    Path(key): Path<String>,
) -> Result<Json<ObjectMetadata>, ReelAxumError> {
    Ok(Json(state.adapter.content_metadata(&key).await?))
}

async fn size(
    State(state): State<ReelState>,
    Path(key): Path<String>,
) -> Result<Json<u64>, ReelAxumError> {
    Ok(Json(state.adapter.content_size(&key).await?))
}

/// Render a chunk response; the body is streamed as the client reads it
pub fn into_http_response(response: ContentResponse) -> Response {
    let mut builder = Response::builder().status(response.status);
    for (name, value) in response.headers {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from_stream(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
