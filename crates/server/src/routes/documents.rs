use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use common::types::{FileList, SavedAck};
use service::{json, DocumentName};

use super::AppState;
use crate::errors::ApiError;

/// Body of `POST /upload`. Both fields are optional on the wire.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "empty_object")]
    pub content: Value,
}

fn default_filename() -> String {
    "data.json".to_string()
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// `application/json` or any `+json` media type, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(ct) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

// Body is decoded by hand rather than through `Json<T>`: the extractor stops
// at serde_json's 128-level default and documents may nest deeper.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SavedAck>, ApiError> {
    if !is_json_content_type(&headers) {
        return Err(ApiError::UnsupportedMediaType);
    }
    let req: UploadRequest = json::from_slice(&body, state.max_json_depth)
        .map_err(|e| ApiError::BadRequest(format!("Failed to parse the request body as JSON: {e}")))?;
    let name = DocumentName::parse(&req.filename)?;
    state.store.save(&name, &req.content).await?;
    Ok(Json(SavedAck { ok: true, saved: name.into_string() }))
}

pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let name = DocumentName::parse(&filename)?;
    let content = state.store.load(&name).await?;
    Ok(Json(content))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<FileList>, ApiError> {
    let files = state.store.list().await?;
    Ok(Json(FileList { files }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_ct(ct: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        h
    }

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type(&with_ct("application/json")));
        assert!(is_json_content_type(&with_ct("Application/JSON; charset=utf-8")));
        assert!(is_json_content_type(&with_ct("application/vnd.api+json")));
        assert!(!is_json_content_type(&with_ct("text/plain")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }
}
