use crate::error::{GlassesAiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 画像キャプション生成モデルのCLIコマンド
    pub caption_command: String,
    /// 抽出型QAモデルのCLIコマンド
    pub qa_command: String,
    /// Telegram Botトークン（環境変数優先）
    pub bot_token: Option<String>,
    /// アップロード画像の保存先フォルダ
    pub upload_dir: PathBuf,
    /// アップロードサーバのポート
    pub server_port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GlassesAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("glasses-ai").join("config.json"))
    }

    pub fn get_bot_token(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }

        self.bot_token.clone().ok_or(GlassesAiError::MissingBotToken)
    }

    pub fn set_bot_token(&mut self, token: String) -> Result<()> {
        self.bot_token = Some(token);
        self.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            caption_command: "blip-caption".into(),
            qa_command: "roberta-qa".into(),
            bot_token: None,
            upload_dir: PathBuf::from("photos"),
            server_port: 5000,
        }
    }
}
