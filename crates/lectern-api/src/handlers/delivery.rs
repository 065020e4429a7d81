//! Shared serve-path plumbing: object lookup and authorization, the guarded
//! body stream, and the best-effort download counter.

use crate::error::HttpAppError;
use crate::state::AppState;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use lectern_core::models::StoredObject;
use lectern_core::{AccessDecision, AppError, Caller};
use lectern_storage::ByteStream;
use std::time::Duration;
use uuid::Uuid;

/// Load an object record and run the access check.
///
/// Unknown ids and soft-deleted records are indistinguishable to the caller:
/// both are `NotFound`, even though a deleted object's bytes may still sit in
/// the store until the reaper runs.
pub(crate) async fn load_authorized(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> Result<StoredObject, HttpAppError> {
    let object = state
        .objects
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Object not found".to_string()))?;

    if object.is_deleted() {
        return Err(HttpAppError(AppError::NotFound(
            "Object not found".to_string(),
        )));
    }

    match state.access_policy.authorize(caller, &object).await {
        AccessDecision::Allow => Ok(object),
        AccessDecision::Deny => Err(HttpAppError(AppError::Forbidden(
            "Access to this object is denied".to_string(),
        ))),
    }
}

/// Increment the download counter off the request path.
///
/// The counter is non-semantic; a failed increment is logged and otherwise
/// ignored, and the byte stream never waits for it.
pub(crate) fn spawn_download_count(state: &AppState, object_id: Uuid) {
    let objects = state.objects.clone();
    tokio::spawn(async move {
        if let Err(e) = objects.increment_download_count(object_id).await {
            tracing::debug!(error = %e, object_id = %object_id, "Failed to increment download count");
        }
    });
}

pub(crate) fn read_timeout(state: &AppState) -> Duration {
    Duration::from_secs(state.config.stream_read_timeout_secs())
}

/// Wrap a storage stream for use as a response body.
///
/// By the time this stream is polled the status line and headers are on the
/// wire, so failures can no longer change them. A read error or a read that
/// stalls past `timeout` yields one final `Err` item, which makes hyper cut
/// the connection short of the declared `Content-Length` instead of passing
/// off a truncated body as complete. The abort is logged here; the client
/// sees a reset.
pub(crate) fn guard_stream(
    stream: ByteStream,
    timeout: Duration,
    object_id: Uuid,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    futures::stream::unfold(Some(stream), move |state| async move {
        let mut stream = state?;
        match tokio::time::timeout(timeout, stream.next()).await {
            Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(stream))),
            Ok(Some(Err(e))) => {
                let aborted =
                    AppError::StreamAborted(format!("Backing store read failed: {}", e));
                tracing::error!(
                    error = %e,
                    error_type = aborted.error_type(),
                    object_id = %object_id,
                    "Aborting response stream after storage read failure"
                );
                Some((Err(std::io::Error::other(aborted.to_string())), None))
            }
            Ok(None) => None,
            Err(_) => {
                let aborted = AppError::StreamAborted(format!(
                    "Backing store read stalled for {}s",
                    timeout.as_secs()
                ));
                tracing::error!(
                    error_type = aborted.error_type(),
                    object_id = %object_id,
                    timeout_secs = timeout.as_secs(),
                    "Aborting response stream after storage read stall"
                );
                Some((Err(std::io::Error::other(aborted.to_string())), None))
            }
        }
    })
}
