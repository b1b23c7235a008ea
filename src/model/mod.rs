//! モデル連携モジュール
//!
//! キャプション生成・抽出型QAは外部モデルCLIに委譲する。
//! パイプラインをグローバルに持たず、サービスオブジェクトとして
//! 明示的に構築してワーカー/ハンドラに注入する。

mod cli_model;
mod parser;

pub use cli_model::{CliCaptionModel, CliQaModel};
pub use parser::{extract_json, parse_caption_response, parse_qa_response};

use crate::error::Result;
use image::RgbImage;

/// 画像キャプション生成モデル
pub trait CaptionModel: Send + Sync {
    /// RGBフレームからキャプションを生成
    fn caption(&self, frame: &RgbImage) -> Result<String>;
}

/// 抽出型QAモデルの回答（コンテキストの部分文字列＋信頼度スコア）
#[derive(Debug, Clone)]
pub struct QaAnswer {
    pub answer: String,
    pub score: f64,
}

/// 抽出型QAモデル
pub trait QaModel: Send + Sync {
    /// 質問とコンテキストから回答スパンとスコアを得る
    fn ask(&self, question: &str, context: &str) -> Result<QaAnswer>;
}
