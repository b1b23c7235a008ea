//! Glasses AI Rust
//!
//! スマートグラスのプロトタイプ一式:
//! カメラ映像のリアルタイムキャプション生成、キャプションストアの
//! 質問応答ボット、画像アップロードサーバ、ストアのフィルタリング。

pub mod bot;
pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod scanner;
pub mod server;
pub mod store;
pub mod worker;

pub use config::Config;
pub use error::{GlassesAiError, Result};
pub use store::CaptionRecord;
