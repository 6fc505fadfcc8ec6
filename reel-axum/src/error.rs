use axum::{
    http::{header::CONTENT_RANGE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reel_stream::response::unsatisfied_content_range;
use reel_stream::StreamError;
use serde_json::json;

#[derive(Debug)]
pub struct ReelAxumError(pub anyhow::Error);

impl From<anyhow::Error> for ReelAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<StreamError> for ReelAxumError {
    fn from(e: StreamError) -> Self {
        Self(anyhow::Error::new(e))
    }
}

/// Feathers-style error body: name, message, code, className
fn error_body(status: StatusCode, name: &str, class_name: &str, message: String) -> Response {
    let body = json!({
        "name": name,
        "message": message,
        "code": status.as_u16(),
        "className": class_name,
    });
    (status, Json(body)).into_response()
}

impl IntoResponse for ReelAxumError {
    fn into_response(self) -> Response {
        // Look through anyhow contexts for the streaming error
        let Some(err) = self.0.chain().find_map(|e| e.downcast_ref::<StreamError>()) else {
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "GeneralError",
                "general-error",
                self.0.to_string(),
            );
        };

        match err {
            StreamError::NotFound { .. } => {
                error_body(StatusCode::NOT_FOUND, "NotFound", "not-found", err.to_string())
            }
            StreamError::RangeNotSatisfiable { size, .. } => {
                let mut res = error_body(
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    "RangeNotSatisfiable",
                    "range-not-satisfiable",
                    err.to_string(),
                );
                if let Ok(value) = HeaderValue::from_str(&unsatisfied_content_range(*size)) {
                    res.headers_mut().insert(CONTENT_RANGE, value);
                }
                res
            }
            // Backend details stay in the logs
            StreamError::Backend { .. } | StreamError::Invalid { .. } => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "GeneralError",
                "general-error",
                "Failed to read content from the backing store".to_string(),
            ),
        }
    }
}
