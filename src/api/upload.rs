use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};

use super::{ApiError, AppState};

const FILE_FIELD: &str = "file";

/// Stores the multipart `file` field and returns its public URL.
pub async fn upload(State(s): State<AppState>, multipart: Result<Multipart, MultipartRejection>) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest("No file provided".into()))?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else { continue };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        let stored = s.blobs.put(&filename, &bytes, content_type.as_deref()).await?;
        return Ok(Json(json!({"success": true, "url": stored.url, "filename": stored.filename})));
    }
    Err(ApiError::BadRequest("No file provided".into()))
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{body_json, test_app, test_app_with};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::json;
    use std::path::PathBuf;
    use tower::ServiceExt;
    use uuid::Uuid;

    const BOUNDARY: &str = "farmboundary";

    fn multipart_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn file_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// App writing into its own scratch directory.
    fn scratch_app(extra: &[(&str, &str)]) -> (Router, PathBuf) {
        let dir = std::env::temp_dir().join(format!("farm-upload-test-{}", Uuid::new_v4()));
        let dir_str = dir.to_string_lossy().into_owned();
        let mut env = vec![("UPLOAD_DIR", dir_str.as_str())];
        env.extend_from_slice(extra);
        (test_app_with(&env), dir)
    }

    #[tokio::test]
    async fn test_upload_without_file() {
        let body = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n");
        let response = test_app().oneshot(multipart_request(body.into_bytes())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "No file provided"}));
    }

    #[tokio::test]
    async fn test_upload_not_multipart() {
        let request = Request::builder().method("POST").uri("/api/upload").body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_stores_file() {
        let (app, dir) = scratch_app(&[]);
        let response = app.oneshot(multipart_request(file_body("miel.jpg", "image/jpeg", b"JPEGDATA"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        let filename = json["filename"].as_str().unwrap().to_string();
        assert!(filename.ends_with("-miel.jpg"));
        assert_eq!(json["url"], format!("/uploads/{filename}"));
        assert_eq!(tokio::fs::read(dir.join(&filename)).await.unwrap(), b"JPEGDATA");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_video_above_two_megabytes() {
        let (app, dir) = scratch_app(&[]);
        let clip = vec![7u8; 3 * 1024 * 1024];
        let response = app.oneshot(multipart_request(file_body("clip.mp4", "video/mp4", &clip))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let filename = body_json(response).await["filename"].as_str().unwrap().to_string();
        assert!(filename.ends_with("-clip.mp4"));
        assert_eq!(tokio::fs::metadata(dir.join(&filename)).await.unwrap().len(), clip.len() as u64);
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let (app, dir) = scratch_app(&[("UPLOAD_MAX_BYTES", "1024")]);
        let response = app.oneshot(multipart_request(file_body("clip.mp4", "video/mp4", &[7u8; 4096]))).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await, json!({"error": "File too large"}));
        assert!(!dir.exists());
    }
}
