//! Upload path: multipart in, object store write, then metadata record.
//!
//! The write order is the invariant here. Bytes land in the object store
//! first and the row is only inserted after the stored size is verified, so
//! a metadata record never points at bytes that were not fully written. On
//! any failure past the write, the orphaned object is deleted best-effort
//! (the reaper collects anything the delete misses).

use crate::auth::CallerContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use lectern_core::models::{AccessLevel, ObjectKind, StoredObjectResponse};
use lectern_core::validation::{normalize_original_name, validate_payload_size};
use lectern_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// JSON sidecar part describing the uploaded file.
#[derive(Debug, Deserialize)]
pub struct UploadMetadata {
    pub kind: ObjectKind,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub lesson_id: Option<Uuid>,
}

struct UploadParts {
    data: Bytes,
    original_name: String,
    mime_type: String,
    metadata: UploadMetadata,
}

/// Accept a `multipart/form-data` upload with a binary `file` part and a
/// JSON `metadata` part, store the bytes, and record the object.
#[tracing::instrument(skip(state, caller_ctx, multipart), fields(operation = "upload"))]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    caller_ctx: CallerContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    if !caller_ctx.caller.is_identified() {
        return Err(HttpAppError(AppError::Unauthorized(
            "Uploads require an authenticated caller".to_string(),
        )));
    }

    let parts = extract_upload_parts(multipart).await.map_err(HttpAppError)?;

    let max_size = match parts.metadata.kind {
        ObjectKind::Document => state.config.max_document_size_bytes(),
        ObjectKind::Video => state.config.max_video_size_bytes(),
    };
    validate_payload_size(parts.data.len(), max_size).map_err(HttpAppError)?;

    let bucket = match parts.metadata.kind {
        ObjectKind::Document => state.config.documents_bucket().to_string(),
        ObjectKind::Video => state.config.videos_bucket().to_string(),
    };

    let id = Uuid::new_v4();
    let key = object_key_for(id, &parts.original_name);
    let size_bytes = parts.data.len() as i64;

    if let Err(e) = state.store.put(&bucket, &key, parts.data).await {
        spawn_cleanup(&state, bucket, key);
        return Err(HttpAppError::from(e));
    }

    // The record must describe bytes that are actually in the store, so the
    // write is verified before the insert.
    match state.store.stat(&bucket, &key).await {
        Ok(stored_size) if stored_size == size_bytes as u64 => {}
        Ok(stored_size) => {
            spawn_cleanup(&state, bucket, key);
            return Err(HttpAppError(AppError::Storage(format!(
                "Stored size {} does not match payload size {}",
                stored_size, size_bytes
            ))));
        }
        Err(e) => {
            spawn_cleanup(&state, bucket, key);
            return Err(HttpAppError::from(e));
        }
    }

    let object = match state
        .objects
        .create(
            id,
            bucket.clone(),
            key.clone(),
            parts.original_name,
            parts.mime_type,
            size_bytes,
            parts.metadata.kind,
            parts.metadata.access_level,
            parts.metadata.lesson_id,
        )
        .await
    {
        Ok(object) => object,
        Err(e) => {
            spawn_cleanup(&state, bucket, key);
            return Err(HttpAppError::from(e));
        }
    };

    tracing::info!(
        object_id = %object.id,
        bucket = %object.bucket,
        key = %object.object_key,
        size_bytes = object.size_bytes,
        kind = ?object.kind,
        "Object uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(StoredObjectResponse::from(object)),
    ))
}

/// Pull the `file` and `metadata` parts out of the form.
/// Only one field named "file" is accepted; unrecognized fields are skipped.
async fn extract_upload_parts(mut multipart: Multipart) -> Result<UploadParts, AppError> {
    let mut file: Option<(Bytes, Option<String>, Option<String>)> = None;
    let mut metadata: Option<UploadMetadata> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().map(|s: &str| s.to_string());
                let content_type = field.content_type().map(|s: &str| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                file = Some((data, filename, content_type));
            }
            "metadata" => {
                let raw = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read metadata: {}", e))
                })?;
                metadata = Some(serde_json::from_str(&raw)?);
            }
            _ => continue,
        }
    }

    let (data, filename, content_type) =
        file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    let metadata =
        metadata.ok_or_else(|| AppError::InvalidInput("No metadata provided".to_string()))?;

    Ok(UploadParts {
        data,
        original_name: normalize_original_name(filename.as_deref().unwrap_or("unknown")),
        mime_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        metadata,
    })
}

/// Storage keys are opaque: the minted id plus the original extension.
fn object_key_for(id: Uuid, original_name: &str) -> String {
    match std::path::Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", id, ext.to_lowercase()),
        None => id.to_string(),
    }
}

fn spawn_cleanup(state: &AppState, bucket: String, key: String) {
    let store = state.store.clone();
    tokio::spawn(async move {
        if let Err(cleanup_err) = store.delete(&bucket, &key).await {
            tracing::debug!(
                error = %cleanup_err,
                bucket = %bucket,
                key = %key,
                "Failed to clean up stored object after upload error"
            );
        }
    });
}
