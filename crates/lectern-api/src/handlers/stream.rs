//! Byte-range streaming of stored objects.

use crate::auth::CallerContext;
use crate::error::HttpAppError;
use crate::handlers::delivery::{guard_stream, load_authorized, read_timeout, spawn_download_count};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use lectern_core::models::StoredObject;
use lectern_core::{negotiate, AppError, RangeDecision};
use std::sync::Arc;
use uuid::Uuid;

/// Serve an object's bytes with HTTP range semantics.
///
/// The `Range` header is negotiated against the metadata record's size, the
/// single size source for the request: 200 with the whole object when the
/// header is absent or malformed, 206 with exactly the requested slice, 416
/// when the range lies outside the object's bounds. Bodies are streamed
/// chunk by chunk; memory use does not scale with object size.
#[tracing::instrument(skip(state, caller_ctx, headers), fields(object_id = %id, operation = "stream"))]
pub async fn stream_object(
    State(state): State<Arc<AppState>>,
    caller_ctx: CallerContext,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let object = load_authorized(&state, &caller_ctx.caller, id).await?;
    let total = object.total_bytes();

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    match negotiate(range_header, total) {
        RangeDecision::NotSatisfiable => {
            tracing::debug!(range = ?range_header, total_bytes = total, "Range outside object bounds");
            Err(HttpAppError(AppError::RangeNotSatisfiable {
                total_bytes: total,
            }))
        }
        RangeDecision::FullContent => {
            let stream = state
                .store
                .get(&object.bucket, &object.object_key)
                .await
                .map_err(HttpAppError::from)?;
            spawn_download_count(&state, object.id);

            let body = Body::from_stream(guard_stream(stream, read_timeout(&state), object.id));
            full_response(&object, total, body)
        }
        RangeDecision::PartialContent { start, end } => {
            let stream = state
                .store
                .get_range(&object.bucket, &object.object_key, start, end - start + 1)
                .await
                .map_err(HttpAppError::from)?;
            spawn_download_count(&state, object.id);

            let body = Body::from_stream(guard_stream(stream, read_timeout(&state), object.id));
            partial_response(&object, start, end, total, body)
        }
    }
}

fn full_response(object: &StoredObject, total: u64, body: Body) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.mime_type.as_str())
        .header(header::CONTENT_LENGTH, total)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| HttpAppError(AppError::Internal(format!("Failed to build response: {}", e))))
}

fn partial_response(
    object: &StoredObject,
    start: u64,
    end: u64,
    total: u64,
    body: Body,
) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, object.mime_type.as_str())
        .header(header::CONTENT_LENGTH, end - start + 1)
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, total),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| HttpAppError(AppError::Internal(format!("Failed to build response: {}", e))))
}
