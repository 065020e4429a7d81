//! Whole-object download with an attachment disposition.

use crate::auth::CallerContext;
use crate::error::HttpAppError;
use crate::handlers::delivery::{guard_stream, load_authorized, read_timeout, spawn_download_count};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use lectern_core::AppError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;
use uuid::Uuid;

/// Bytes that stay unencoded in an RFC 5987 `filename*` value (attr-char):
/// ALPHA / DIGIT / "!" / "#" / "$" / "&" / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Serve the whole object as a file download.
///
/// The download path ignores `Range` headers entirely; it is the resumable
/// `/stream/{id}` endpoint's job to serve slices. What it adds is the
/// `Content-Disposition: attachment` hint carrying the original filename.
#[tracing::instrument(skip(state, caller_ctx), fields(object_id = %id, operation = "download"))]
pub async fn download_object(
    State(state): State<Arc<AppState>>,
    caller_ctx: CallerContext,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let object = load_authorized(&state, &caller_ctx.caller, id).await?;
    let total = object.total_bytes();

    tracing::debug!(
        bucket = %object.bucket,
        key = %object.object_key,
        "Proxying object from storage for download"
    );

    let stream = state
        .store
        .get(&object.bucket, &object.object_key)
        .await
        .map_err(HttpAppError::from)?;
    spawn_download_count(&state, object.id);

    let body = Body::from_stream(guard_stream(stream, read_timeout(&state), object.id));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.mime_type.as_str())
        .header(header::CONTENT_LENGTH, total)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&object.original_name),
        )
        .body(body)
        .map_err(|e| HttpAppError(AppError::Internal(format!("Failed to build response: {}", e))))
}

/// Build the `Content-Disposition` value for an arbitrary Unicode filename.
///
/// The quoted `filename` parameter is an ASCII approximation for legacy
/// clients; when it loses information the exact name rides along in the
/// RFC 5987 `filename*` parameter, percent-encoded as UTF-8. The original
/// bytes are never reinterpreted in another charset.
fn attachment_disposition(original_name: &str) -> String {
    let fallback = ascii_fallback(original_name);
    if fallback == original_name {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(original_name, ATTR_CHAR)
        )
    }
}

/// Replace everything a quoted-string filename cannot safely carry.
fn ascii_fallback(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(['_', ' ']).is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
