// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /upload-image/ through the full router

use super::common::{multipart_request, send, Harness, Part, MAX_BODY_BYTES, SERVICE_KEY};
use axum::http::StatusCode;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

fn full_form<'a>() -> Vec<Part<'a>> {
    vec![
        Part {
            name: "collection",
            file: None,
            data: b"visual_memory",
        },
        Part {
            name: "source",
            file: None,
            data: b"phone",
        },
        Part {
            name: "file",
            file: Some(("garden.png", "image/png")),
            data: PNG_BYTES,
        },
    ]
}

#[tokio::test]
async fn test_upload_describes_embeds_and_saves() {
    let mut harness = Harness::new();
    let app = harness.router();

    let (status, body) = send(
        app,
        multipart_request("/upload-image/", Some(SERVICE_KEY), &full_form()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["collection"], "visual_memory");
    assert_eq!(
        harness.calls(),
        vec![
            format!("describe:image/png:{}", PNG_BYTES.len()),
            "embed:A hand-drawn map of the garden".to_string(),
            "upsert:visual_memory".to_string(),
        ]
    );

    let upserts = harness.store.upserts.lock().unwrap();
    let payload = &upserts[0].1.payload;
    assert_eq!(payload["source"], "image_upload/phone");
    assert_eq!(payload["tags"], serde_json::json!(["image_upload", "phone"]));
    assert_eq!(payload["text"], "A hand-drawn map of the garden");

    // YYYY-MM-DDTHH:MM:SS.ffffffZ
    let timestamp = payload["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), 27);
    assert!(timestamp.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_upload_ignores_unknown_fields() {
    let mut harness = Harness::new();
    let app = harness.router();

    let mut form = full_form();
    form.push(Part {
        name: "comment",
        file: None,
        data: b"ignored",
    });
    let (status, _) = send(app, multipart_request("/upload-image", Some(SERVICE_KEY), &form)).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_missing_file_is_bad_request() {
    let mut harness = Harness::new();
    let app = harness.router();

    let form: Vec<Part<'_>> = full_form().into_iter().take(2).collect();
    let (status, body) = send(app, multipart_request("/upload-image/", Some(SERVICE_KEY), &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "file");
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_upload_non_image_is_bad_request() {
    let mut harness = Harness::new();
    let app = harness.router();

    let mut form = full_form();
    form[2] = Part {
        name: "file",
        file: Some(("notes.txt", "text/plain")),
        data: b"just text",
    };
    let (status, body) = send(app, multipart_request("/upload-image/", Some(SERVICE_KEY), &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "file");
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_upload_empty_file_is_bad_request() {
    let mut harness = Harness::new();
    let app = harness.router();

    let mut form = full_form();
    form[2] = Part {
        name: "file",
        file: Some(("empty.png", "image/png")),
        data: b"",
    };
    let (status, _) = send(app, multipart_request("/upload-image/", Some(SERVICE_KEY), &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_upload_without_multipart_body_is_bad_request() {
    let mut harness = Harness::new();
    let app = harness.router();

    let request = super::common::json_request(
        "/upload-image/",
        Some(SERVICE_KEY),
        serde_json::json!({"collection": "visual_memory"}),
    );
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_vision_failure_skips_embedding() {
    let mut harness = Harness::new().vision_reply(Err(503));
    let app = harness.router();

    let (status, body) = send(
        app,
        multipart_request("/upload-image/", Some(SERVICE_KEY), &full_form()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"]["upstream"], "vision");
    assert_eq!(body["details"]["upstream_status"], 503);
    assert_eq!(harness.calls().len(), 1);
}

#[tokio::test]
async fn test_upload_blank_description_is_server_error() {
    let mut harness = Harness::new().vision_reply(Ok("  \n"));
    let app = harness.router();

    let (status, body) = send(
        app,
        multipart_request("/upload-image/", Some(SERVICE_KEY), &full_form()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"]["upstream"], "vision");
    assert!(harness.store.upserts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_oversized_file_is_payload_too_large() {
    let mut harness = Harness::new();
    let app = harness.router();

    let big = vec![0u8; MAX_BODY_BYTES + 1];
    let mut form = full_form();
    form[2] = Part {
        name: "file",
        file: Some(("huge.png", "image/png")),
        data: &big,
    };
    let (status, _) = send(app, multipart_request("/upload-image/", Some(SERVICE_KEY), &form)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(harness.calls().is_empty());
}
