//! Video API integration tests.
//!
//! Run with: `cargo test -p reelbox-api --test videos_test`

mod helpers;

use bytes::Bytes;
use helpers::fixtures::{multi_video_form, single_video_form, video_bytes};
use helpers::{setup_test_app, setup_test_app_with, RemoteMode, REMOTE_BASE_URL};
use serde_json::Value;

const MB: usize = 1024 * 1024;

async fn remote_keys(app: &helpers::TestApp) -> Vec<String> {
    let mut keys: Vec<String> = app
        .remote
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|object| object.key)
        .collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app_with(RemoteMode::Unconfigured, &[]).await;

    let response = app.client().get("/api/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["message"], "Video upload server is running");
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["backends"]["local"], "healthy");
    assert_eq!(body["backends"]["remote"], "not_configured");
}

#[tokio::test]
async fn test_upload_mov_then_list_and_fetch() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/api/upload")
        .multipart(single_video_form(
            "clip.MOV",
            "video/quicktime",
            video_bytes(5 * MB),
        ))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let key = body["data"]["storage_key"].as_str().unwrap().to_string();
    assert!(key.starts_with("video-"));
    assert!(key.ends_with(".mov"));
    assert_eq!(body["data"]["size_bytes"], 5 * MB);
    assert_eq!(body["data"]["source_backend"], "local");
    assert_eq!(body["data"]["original_filename"], "clip.MOV");

    let listing: Value = client.get("/api/videos-list").await.json();
    let entries = listing["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["storage_key"], key.as_str());
    assert_eq!(entries[0]["source_backend"], "local");
    assert_eq!(entries[0]["size_bytes"], 5 * MB);

    let urls: Value = client.get("/api/videos").await.json();
    let urls = urls["videos"].as_array().unwrap();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].as_str().unwrap().ends_with(&key));

    for path in [format!("/api/videos/{}", key), format!("/videos/{}", key)] {
        let file = client.get(&path).await;
        assert_eq!(file.status_code(), 200);
        assert_eq!(file.header("content-type"), "video/quicktime");
        assert_eq!(file.as_bytes().len(), 5 * MB);
    }
}

#[tokio::test]
async fn test_listing_reports_unconfigured_remote() {
    let app = setup_test_app_with(RemoteMode::Unconfigured, &[]).await;
    let client = app.client();

    client
        .post("/api/upload")
        .multipart(single_video_form("a.mp4", "video/mp4", video_bytes(64)))
        .await;

    let response = client.get("/api/videos-list").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let unavailable = body["unavailable"].as_array().unwrap();
    assert_eq!(unavailable.len(), 1);
    assert_eq!(unavailable[0]["backend"], "remote");
}

#[tokio::test]
async fn test_listing_merges_both_backends() {
    let app = setup_test_app().await;
    let client = app.client();

    app.remote
        .put("video-remote.mp4", video_bytes(16), "video/mp4")
        .await
        .unwrap();
    client
        .post("/api/upload")
        .multipart(single_video_form("local.webm", "video/webm", video_bytes(16)))
        .await;

    let body: Value = client.get("/api/videos-list").await.json();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["source_backend"], "local");
    assert_eq!(entries[1]["source_backend"], "remote");
    assert_eq!(entries[1]["url"], format!("{}/video-remote.mp4", REMOTE_BASE_URL));
    assert!(body["unavailable"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_video_redirects() {
    let app = setup_test_app().await;
    app.remote
        .put("video-remote.mp4", video_bytes(16), "video/mp4")
        .await
        .unwrap();

    let response = app.client().get("/api/videos/video-remote.mp4").await;
    assert_eq!(response.status_code(), 307);
    assert_eq!(
        response.header("location"),
        format!("{}/video-remote.mp4", REMOTE_BASE_URL).as_str()
    );
}

#[tokio::test]
async fn test_missing_video_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/videos/video-404.mp4").await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Video not found");
}

#[tokio::test]
async fn test_traversal_is_forbidden() {
    let app = setup_test_app().await;
    std::fs::write(app.root.parent().unwrap().join("secret.mp4"), b"secret").unwrap();

    for path in [
        "/api/videos/..%2F..%2Fetc%2Fpasswd",
        "/api/videos/..%2Fsecret.mp4",
        "/videos/..%2Fsecret.mp4",
    ] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 403, "{}", path);

        let body: Value = response.json();
        assert_eq!(body["message"], "Forbidden");
    }

    let response = app.client().delete("/api/videos/..%2Fsecret.mp4").await;
    assert_eq!(response.status_code(), 403);
    assert!(app.root.parent().unwrap().join("secret.mp4").exists());
}

#[tokio::test]
async fn test_delete_unknown_key_changes_nothing() {
    let app = setup_test_app().await;
    let client = app.client();

    client
        .post("/api/upload")
        .multipart(single_video_form("keep.mp4", "video/mp4", video_bytes(32)))
        .await;
    app.remote
        .put("video-remote.mp4", video_bytes(16), "video/mp4")
        .await
        .unwrap();
    let local_before = app.local_files();
    let remote_before = remote_keys(&app).await;

    let response = client.delete("/api/videos/video-404.mp4").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["message"], "Video not found");

    assert_eq!(app.local_files(), local_before);
    assert_eq!(remote_keys(&app).await, remote_before);
    assert_eq!(remote_before, ["video-remote.mp4"]);
}

#[tokio::test]
async fn test_listed_url_with_percent_in_key_is_fetchable_and_deletable() {
    let app = setup_test_app().await;
    let client = app.client();
    std::fs::write(app.root.join("a%20b.mp4"), b"odd name").unwrap();

    let listing: Value = client.get("/api/videos-list").await.json();
    let entries = listing["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["storage_key"], "a%20b.mp4");

    let url = entries[0]["url"].as_str().unwrap();
    let path = &url[url.find("/videos/").unwrap()..];
    assert_eq!(path, "/videos/a%2520b.mp4");

    let response = client.get(path).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), b"odd name");

    let response = client.delete(&format!("/api{}", path)).await;
    assert_eq!(response.status_code(), 200);
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_upload_without_extension_named_from_mime() {
    let app = setup_test_app().await;
    let client = app.client();

    let body: Value = client
        .post("/api/upload")
        .multipart(single_video_form("clip", "video/mp4", video_bytes(32)))
        .await
        .json();
    let key = body["data"]["storage_key"].as_str().unwrap().to_string();
    assert!(key.ends_with(".mp4"));

    let listing: Value = client.get("/api/videos-list").await.json();
    assert_eq!(listing["data"][0]["storage_key"], key.as_str());
}

#[tokio::test]
async fn test_delete_local_and_remote() {
    let app = setup_test_app().await;
    let client = app.client();

    let body: Value = client
        .post("/api/upload")
        .multipart(single_video_form("a.mp4", "video/mp4", video_bytes(32)))
        .await
        .json();
    let key = body["data"]["storage_key"].as_str().unwrap().to_string();
    app.remote
        .put("video-remote.mp4", video_bytes(16), "video/mp4")
        .await
        .unwrap();

    for key in [key.as_str(), "video-remote.mp4"] {
        let response = client.delete(&format!("/api/videos/{}", key)).await;
        assert_eq!(response.status_code(), 200, "{}", key);
        assert_eq!(response.json::<Value>()["success"], true);

        let response = client.get(&format!("/api/videos/{}", key)).await;
        assert_eq!(response.status_code(), 404, "{}", key);
    }

    assert!(app.local_files().is_empty());
    assert!(app.remote.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_non_video() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(single_video_form(
            "notes.txt",
            "text/plain",
            Bytes::from_static(b"hello"),
        ))
        .await;

    assert_eq!(response.status_code(), 415);
    assert_eq!(response.json::<Value>()["code"], "UNSUPPORTED_FILE_TYPE");
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(single_video_form("empty.mp4", "video/mp4", Bytes::new()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app().await;

    let form = axum_test::multipart::MultipartForm::new().add_text("title", "no file here");
    let response = app.client().post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["message"], "No video files uploaded");
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let app = setup_test_app_with(RemoteMode::InMemory, &[("MAX_VIDEO_SIZE_MB", "1")]).await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(single_video_form("big.mp4", "video/mp4", video_bytes(2 * MB)))
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(
        response.json::<Value>()["message"],
        "File size is too large. Max limit is 1MB"
    );
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_upload_multiple() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload-multiple")
        .multipart(multi_video_form(&[
            ("one.mp4", "video/mp4", video_bytes(16)),
            ("two.mkv", "video/x-matroska", video_bytes(16)),
        ]))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert!(body.get("failures").is_none());
    assert_eq!(app.local_files().len(), 2);
}

#[tokio::test]
async fn test_upload_too_many_files() {
    let app = setup_test_app().await;

    let files: Vec<(&str, &str, Bytes)> = (0..6)
        .map(|_| ("clip.mp4", "video/mp4", video_bytes(16)))
        .collect();
    let response = app
        .client()
        .post("/api/upload-multiple")
        .multipart(multi_video_form(&files))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "TOO_MANY_FILES");
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_all_or_nothing_batch_stores_nothing_on_invalid_item() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload-multiple")
        .multipart(multi_video_form(&[
            ("one.mp4", "video/mp4", video_bytes(16)),
            ("notes.txt", "text/plain", Bytes::from_static(b"x")),
        ]))
        .await;

    assert_eq!(response.status_code(), 415);
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_best_effort_batch_reports_failures() {
    let app = setup_test_app_with(
        RemoteMode::InMemory,
        &[("UPLOAD_BATCH_POLICY", "best_effort")],
    )
    .await;

    let response = app
        .client()
        .post("/api/upload-multiple")
        .multipart(multi_video_form(&[
            ("one.mp4", "video/mp4", video_bytes(16)),
            ("notes.txt", "text/plain", Bytes::from_static(b"x")),
        ]))
        .await;

    assert_eq!(response.status_code(), 207);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let failures = body["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["original_filename"], "notes.txt");
    assert_eq!(failures[0]["code"], "UNSUPPORTED_FILE_TYPE");
    assert_eq!(app.local_files().len(), 1);
}

#[tokio::test]
async fn test_best_effort_batch_with_nothing_stored_is_an_error() {
    let app = setup_test_app_with(
        RemoteMode::InMemory,
        &[("UPLOAD_BATCH_POLICY", "best_effort")],
    )
    .await;

    let response = app
        .client()
        .post("/api/upload-multiple")
        .multipart(multi_video_form(&[
            ("notes.txt", "text/plain", Bytes::from_static(b"x")),
            ("photo.png", "image/png", Bytes::from_static(b"y")),
        ]))
        .await;

    assert_eq!(response.status_code(), 415);
    assert_eq!(response.json::<Value>()["code"], "UNSUPPORTED_FILE_TYPE");
    assert!(app.local_files().is_empty());
}

#[tokio::test]
async fn test_remote_upload_target() {
    let app = setup_test_app_with(
        RemoteMode::InMemory,
        &[
            ("STORAGE_BACKEND", "remote"),
            ("S3_BUCKET", "videos"),
            ("S3_ENDPOINT", "http://localhost:9000"),
        ],
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(single_video_form("clip.mp4", "video/mp4", video_bytes(16)))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["data"]["source_backend"], "remote");
    assert!(body["data"]["public_url"]
        .as_str()
        .unwrap()
        .starts_with(REMOTE_BASE_URL));
    assert!(app.local_files().is_empty());
    assert_eq!(app.remote.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!(body["paths"]["/api/upload"].is_object());
    assert!(body["paths"]["/api/videos/{key}"].is_object());
}
