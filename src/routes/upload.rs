use std::path::PathBuf;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};
use chrono::{DateTime, Utc};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::routes::{RouteError, RouteState};

/// Sidecar record written next to every stored upload.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UploadMeta {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

fn data_path(state: &RouteState, id: Uuid) -> PathBuf {
    state.upload_dir.join(format!("{id}.bin"))
}

fn meta_path(state: &RouteState, id: Uuid) -> PathBuf {
    state.upload_dir.join(format!("{id}.json"))
}

/// Persists an upload and returns the public share URL for it.
pub async fn store_upload(
    state: &RouteState,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<String, RouteError> {
    if content_type.is_empty() {
        return Err(RouteError::BadRequest);
    }
    if bytes.len() as u64 > state.max_upload_bytes {
        return Err(RouteError::PayloadTooLarge);
    }

    let id = Uuid::new_v4();
    let meta = UploadMeta {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        size: bytes.len() as u64,
        uploaded_at: Utc::now(),
    };

    tokio::fs::create_dir_all(&state.upload_dir).await?;
    tokio::fs::write(data_path(state, id), &bytes).await?;
    tokio::fs::write(meta_path(state, id), serde_json::to_vec(&meta)?).await?;

    tracing::info!(%id, size = meta.size, content_type = %meta.content_type, "stored upload");
    Ok(format!("{}/f/{}", state.public_url, id))
}

pub async fn load_meta(state: &RouteState, id: Uuid) -> Result<UploadMeta, RouteError> {
    let raw = match tokio::fs::read(meta_path(state, id)).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(%id, "unknown upload requested");
            return Err(RouteError::NotFound);
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&raw)?)
}

/// `GET /f/{id}` - streams a stored upload back with its original name and
/// content type.
pub async fn serve_file(
    State(state): State<RouteState>,
    Path(id): Path<String>,
) -> Result<Response, RouteError> {
    let id = Uuid::parse_str(&id).map_err(|_| RouteError::BadRequest)?;
    let meta = load_meta(&state, id).await?;

    let file = match tokio::fs::File::open(data_path(&state, id)).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(%id, "upload data missing for known metadata");
            return Err(RouteError::NotFound);
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, meta.content_type)
        .header(header::CONTENT_LENGTH, meta.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", sanitize_filename(&meta.file_name)),
        )
        .body(Body::from_stream(ReaderStream::new(file)))?)
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, sync::Arc};
    use tokio::sync::Mutex;

    fn state() -> RouteState {
        RouteState {
            upload_dir: std::env::temp_dir().join(format!("boonda-test-{}", Uuid::new_v4())),
            public_url: "http://test.invalid".to_string(),
            max_upload_bytes: 1024,
            tickets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn id_from_url(url: &str) -> Uuid {
        let tail = url.rsplit('/').next().expect("url tail");
        Uuid::parse_str(tail).expect("uuid tail")
    }

    #[tokio::test]
    async fn stored_upload_is_readable_back() {
        let state = state();
        let url = store_upload(&state, "notes.txt", "text/plain", b"hello".to_vec())
            .await
            .expect("stored");

        assert!(url.starts_with("http://test.invalid/f/"));
        let id = id_from_url(&url);

        let meta = load_meta(&state, id).await.expect("meta");
        assert_eq!(meta.file_name, "notes.txt");
        assert_eq!(meta.content_type, "text/plain");
        assert_eq!(meta.size, 5);

        let data = tokio::fs::read(data_path(&state, id)).await.expect("data");
        assert_eq!(data, b"hello");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let state = state();
        let res = store_upload(&state, "big.bin", "application/octet-stream", vec![0; 2048]).await;
        assert!(matches!(res, Err(RouteError::PayloadTooLarge)));
    }

    #[tokio::test]
    async fn untyped_upload_is_rejected() {
        let state = state();
        let res = store_upload(&state, "mystery", "", b"??".to_vec()).await;
        assert!(matches!(res, Err(RouteError::BadRequest)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = state();
        tokio::fs::create_dir_all(&state.upload_dir)
            .await
            .expect("upload dir");
        let res = load_meta(&state, Uuid::new_v4()).await;
        assert!(matches!(res, Err(RouteError::NotFound)));
    }

    #[test]
    fn filenames_are_sanitized_for_the_header() {
        assert_eq!(sanitize_filename("notes.txt"), "notes.txt");
        assert_eq!(sanitize_filename("a\"b\\c.txt"), "abc.txt");
        assert_eq!(sanitize_filename("\u{7}"), "upload");
    }
}
