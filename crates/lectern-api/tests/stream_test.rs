//! Streaming endpoint integration tests: range negotiation over real HTTP.
//!
//! Run with: `cargo test -p lectern-api --test stream_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::fixtures::patterned_body;
use helpers::{seed_object, setup_test_app, TEST_CALLER_TOKEN};
use lectern_core::models::{AccessLevel, ObjectKind};
use uuid::Uuid;

#[tokio::test]
async fn test_no_range_header_serves_full_content() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;

    let response = app.client().get(&format!("/stream/{}", object.id)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-length"), "1000");
    assert_eq!(response.header("accept-ranges"), "bytes");
    assert_eq!(response.header("content-type"), "video/mp4");
    assert_eq!(response.as_bytes().as_ref(), body.as_slice());
}

#[tokio::test]
async fn test_interior_range_returns_exact_slice() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;

    let response = app
        .client()
        .get(&format!("/stream/{}", object.id))
        .add_header("Range", "bytes=200-299")
        .await;

    assert_eq!(response.status_code(), 206);
    assert_eq!(response.header("content-range"), "bytes 200-299/1000");
    assert_eq!(response.header("content-length"), "100");
    assert_eq!(response.header("accept-ranges"), "bytes");
    assert_eq!(response.as_bytes().as_ref(), &body[200..300]);
}

#[tokio::test]
async fn test_single_byte_ranges_at_both_edges() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;
    let path = format!("/stream/{}", object.id);

    let first = app
        .client()
        .get(&path)
        .add_header("Range", "bytes=0-0")
        .await;
    assert_eq!(first.status_code(), 206);
    assert_eq!(first.header("content-range"), "bytes 0-0/1000");
    assert_eq!(first.as_bytes().as_ref(), &body[0..1]);

    let last = app
        .client()
        .get(&path)
        .add_header("Range", "bytes=999-999")
        .await;
    assert_eq!(last.status_code(), 206);
    assert_eq!(last.header("content-range"), "bytes 999-999/1000");
    assert_eq!(last.as_bytes().as_ref(), &body[999..1000]);
}

#[tokio::test]
async fn test_full_span_range_is_partial_content() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;

    let response = app
        .client()
        .get(&format!("/stream/{}", object.id))
        .add_header("Range", "bytes=0-999")
        .await;

    assert_eq!(response.status_code(), 206);
    assert_eq!(response.header("content-range"), "bytes 0-999/1000");
    assert_eq!(response.header("content-length"), "1000");
    assert_eq!(response.as_bytes().as_ref(), body.as_slice());
}

#[tokio::test]
async fn test_oversized_end_clamps_to_last_byte() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;

    let response = app
        .client()
        .get(&format!("/stream/{}", object.id))
        .add_header("Range", "bytes=900-5000")
        .await;

    assert_eq!(response.status_code(), 206);
    assert_eq!(response.header("content-range"), "bytes 900-999/1000");
    assert_eq!(response.header("content-length"), "100");
    assert_eq!(response.as_bytes().as_ref(), &body[900..1000]);
}

#[tokio::test]
async fn test_open_ended_range_runs_to_last_byte() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;

    let response = app
        .client()
        .get(&format!("/stream/{}", object.id))
        .add_header("Range", "bytes=200-")
        .await;

    assert_eq!(response.status_code(), 206);
    assert_eq!(response.header("content-range"), "bytes 200-999/1000");
    assert_eq!(response.header("content-length"), "800");
    assert_eq!(response.as_bytes().as_ref(), &body[200..]);
}

#[tokio::test]
async fn test_range_past_end_is_not_satisfiable() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;
    let path = format!("/stream/{}", object.id);

    // start == size: the last valid offset is 999
    let at_end = app
        .client()
        .get(&path)
        .add_header("Range", "bytes=1000-")
        .await;
    assert_eq!(at_end.status_code(), 416);
    assert_eq!(at_end.header("content-range"), "bytes */1000");
    assert!(at_end.as_bytes().is_empty());

    let past_end = app
        .client()
        .get(&path)
        .add_header("Range", "bytes=2000-5000")
        .await;
    assert_eq!(past_end.status_code(), 416);
    assert_eq!(past_end.header("content-range"), "bytes */1000");
    assert!(past_end.as_bytes().is_empty());
}

#[tokio::test]
async fn test_inverted_range_is_not_satisfiable() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;

    let response = app
        .client()
        .get(&format!("/stream/{}", object.id))
        .add_header("Range", "bytes=500-200")
        .await;

    assert_eq!(response.status_code(), 416);
    assert_eq!(response.header("content-range"), "bytes */1000");
}

#[tokio::test]
async fn test_unsupported_range_forms_serve_full_content() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;
    let path = format!("/stream/{}", object.id);

    // Suffix ranges, multi-range lists, and malformed values are all treated
    // like an absent header rather than rejected.
    for range in ["bytes=-500", "bytes=0-1,5-9", "items=0-5", "bytes=abc-def"] {
        let response = app.client().get(&path).add_header("Range", range).await;

        assert_eq!(response.status_code(), 200, "range {:?}", range);
        assert_eq!(response.header("content-length"), "1000", "range {:?}", range);
        assert_eq!(response.as_bytes().as_ref(), body.as_slice(), "range {:?}", range);
    }
}

#[tokio::test]
async fn test_repeated_range_request_is_idempotent() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-01.mp4",
        "video/mp4",
        &body,
    )
    .await;
    let path = format!("/stream/{}", object.id);

    let first = app
        .client()
        .get(&path)
        .add_header("Range", "bytes=100-899")
        .await;
    let second = app
        .client()
        .get(&path)
        .add_header("Range", "bytes=100-899")
        .await;

    assert_eq!(first.status_code(), second.status_code());
    assert_eq!(
        first.header("content-range"),
        second.header("content-range")
    );
    assert_eq!(first.as_bytes(), second.as_bytes());
    assert_eq!(first.as_bytes().as_ref(), &body[100..900]);
}

#[tokio::test]
async fn test_concurrent_overlapping_ranges() {
    let app = setup_test_app().await;
    let body = patterned_body(2000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Public,
        "lecture-02.mp4",
        "video/mp4",
        &body,
    )
    .await;
    let path = format!("/stream/{}", object.id);

    let (left, right) = tokio::join!(
        app.client().get(&path).add_header("Range", "bytes=0-999"),
        app.client().get(&path).add_header("Range", "bytes=500-1499"),
    );

    assert_eq!(left.status_code(), 206);
    assert_eq!(left.header("content-range"), "bytes 0-999/2000");
    assert_eq!(left.as_bytes().as_ref(), &body[0..1000]);

    assert_eq!(right.status_code(), 206);
    assert_eq!(right.header("content-range"), "bytes 500-1499/2000");
    assert_eq!(right.as_bytes().as_ref(), &body[500..1500]);
}

#[tokio::test]
async fn test_deleted_object_returns_not_found_while_bytes_remain() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Document,
        AccessLevel::Public,
        "reading-list.pdf",
        "application/pdf",
        &body,
    )
    .await;

    let marked = app.objects.mark_deleted(object.id).await.unwrap();
    assert!(marked);

    let response = app.client().get(&format!("/stream/{}", object.id)).await;
    assert_eq!(response.status_code(), 404);
    let data: serde_json::Value = response.json();
    assert_eq!(data["error"].as_str().unwrap_or(""), "Object not found");

    // Soft delete: the stored bytes stay in place for the offline reaper.
    let still_stored = app
        .store
        .exists(&object.bucket, &object.object_key)
        .await
        .unwrap();
    assert!(still_stored);
}

#[tokio::test]
async fn test_private_object_requires_identified_caller() {
    let app = setup_test_app().await;
    let body = patterned_body(1000);
    let object = seed_object(
        &app,
        ObjectKind::Video,
        AccessLevel::Private,
        "seminar.mp4",
        "video/mp4",
        &body,
    )
    .await;
    let path = format!("/stream/{}", object.id);

    let denied = app.client().get(&path).await;
    assert_eq!(denied.status_code(), 403);

    let allowed = app
        .client()
        .get(&path)
        .add_header("Authorization", format!("Bearer {}", TEST_CALLER_TOKEN))
        .add_header("Range", "bytes=0-99")
        .await;
    assert_eq!(allowed.status_code(), 206);
    assert_eq!(allowed.as_bytes().as_ref(), &body[0..100]);
}

#[tokio::test]
async fn test_unknown_object_returns_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&format!("/stream/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 404);
}
