use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlassesAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("Botトークンが設定されていません。`glasses-ai config --set-bot-token YOUR_TOKEN` で設定してください")]
    MissingBotToken,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("カメラエラー: {0}")]
    Camera(String),

    #[error("モデル呼び出しエラー: {0}")]
    ModelCall(String),

    #[error("モデル出力のパースに失敗: {0}")]
    ModelParse(String),

    #[error("キャプションストアのJSONが不正です ({path}): {message}")]
    StoreParse { path: String, message: String },

    #[error("Telegram APIエラー: {0}")]
    ChatApi(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlassesAiError>;
