//! Telegram Bot APIクライアント
//!
//! 必要なメソッド（getUpdates / sendMessage / sendPhoto）のみを
//! reqwestで直接呼び出す薄いクライアント

use crate::error::{GlassesAiError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self> {
        // long polling（最大30秒）より長いクライアントタイムアウト
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(50))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", API_BASE, token),
        })
    }

    /// long pollingで新着アップデートを取得
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let response = self
            .client
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[("offset", offset.to_string()), ("timeout", timeout_secs.to_string())])
            .send()
            .await?;

        parse_reply(response).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        parse_reply::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// 写真をキャプション付きで送信
    pub async fn send_photo(&self, chat_id: i64, photo_path: &Path, caption: &str) -> Result<()> {
        let bytes = tokio::fs::read(photo_path).await.map_err(|_| {
            GlassesAiError::FileNotFound(photo_path.display().to_string())
        })?;

        let file_name = photo_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo.jpg".to_string());

        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part(
                "photo",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );

        let response = self
            .client
            .post(format!("{}/sendPhoto", self.base_url))
            .multipart(form)
            .send()
            .await?;

        parse_reply::<serde_json::Value>(response).await?;
        Ok(())
    }
}

async fn parse_reply<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let reply: ApiReply<T> = response
        .json()
        .await
        .map_err(|e| GlassesAiError::ChatApi(format!("レスポンス解析失敗 ({}): {}", status, e)))?;

    if !reply.ok {
        return Err(GlassesAiError::ChatApi(
            reply.description.unwrap_or_else(|| format!("HTTP {}", status)),
        ));
    }

    reply
        .result
        .ok_or_else(|| GlassesAiError::ChatApi("resultフィールドがありません".into()))
}
