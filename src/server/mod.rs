//! 画像アップロードサーバモジュール
//!
//! `POST /upload` でマルチパートフィールド `image` または生ボディを
//! 受け取り、秒精度タイムスタンプのJPEGとして保存する。
//! 認証・Content-Type検証・サイズ制限・同秒衝突の検出は行わない。

use crate::error::Result;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// アップロードAPIのレスポンス形式
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

struct ServerState {
    upload_dir: PathBuf,
}

/// アップロードルータを構築する
pub fn router(upload_dir: PathBuf) -> Router {
    let state = Arc::new(ServerState { upload_dir });
    Router::new()
        .route("/", get(|| async { "glasses-ai upload server" }))
        .route("/upload", post(upload))
        .with_state(state)
}

/// サーバを起動する
pub async fn run(port: u16, upload_dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&upload_dir)?;

    log::info!("🚀 アップロードサーバを起動");
    log::info!("🔥 Listening on: http://0.0.0.0:{}", port);
    log::info!("📁 保存先: {}", upload_dir.display());

    let app = router(upload_dir);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn upload(
    State(state): State<Arc<ServerState>>,
    request: Request,
) -> (StatusCode, Json<UploadResponse>) {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        return upload_multipart(&state, request).await;
    }

    // マルチパートでなければ生ボディとして受け付ける
    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(body) => body,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "No file found"),
    };

    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file found");
    }

    save_upload(&state, &body).await
}

async fn upload_multipart(
    state: &ServerState,
    request: Request,
) -> (StatusCode, Json<UploadResponse>) {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "No file found"),
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("image") {
                    continue;
                }

                if field.file_name().map(|n| n.is_empty()).unwrap_or(false) {
                    return error_response(StatusCode::BAD_REQUEST, "No selected file");
                }

                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(_) => return error_response(StatusCode::BAD_REQUEST, "No file found"),
                };

                return save_upload(state, &data).await;
            }
            Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No file found"),
            Err(_) => return error_response(StatusCode::BAD_REQUEST, "No file found"),
        }
    }
}

async fn save_upload(state: &ServerState, data: &[u8]) -> (StatusCode, Json<UploadResponse>) {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("image_{}.jpg", timestamp);
    let filepath = state.upload_dir.join(&filename);

    match tokio::fs::write(&filepath, data).await {
        Ok(()) => {
            log::info!("保存: {}", filepath.display());
            (
                StatusCode::OK,
                Json(UploadResponse {
                    status: "success",
                    message: "File uploaded".into(),
                    filename: Some(filename),
                }),
            )
        }
        Err(e) => {
            // ディスクフル・権限エラー等は500に落とす
            log::error!("保存失敗 {}: {}", filepath.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UploadResponse {
                    status: "error",
                    message: format!("Failed to save file: {}", e),
                    filename: None,
                }),
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<UploadResponse>) {
    (
        status,
        Json(UploadResponse {
            status: "error",
            message: message.to_string(),
            filename: None,
        }),
    )
}
