//! キャプションストアモジュール
//!
//! { 画像パス, キャプション } レコードの順序付き配列を
//! 単一のJSONファイルとして読み書きする。読み込みは全件、
//! 書き込みは全件上書き（部分更新なし）。

use crate::error::{GlassesAiError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// キャプションレコード
///
/// フィールド名は外部パイプラインと共有するワイヤ形式
/// （`image` / `caption`）に固定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRecord {
    pub image: String,
    pub caption: String,
}

/// ストアファイルを読み込み
///
/// ファイルが存在しない・JSONが不正な場合は明確なエラーを返す
pub fn load(path: &Path) -> Result<Vec<CaptionRecord>> {
    if !path.exists() {
        return Err(GlassesAiError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let records: Vec<CaptionRecord> =
        serde_json::from_reader(reader).map_err(|e| GlassesAiError::StoreParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(records)
}

/// ストアファイルを保存（整形出力、全件上書き）
pub fn save(path: &Path, records: &[CaptionRecord]) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// 画像ファイルが存在するレコードのみ残す（順序維持）
pub fn filter_existing(records: &[CaptionRecord]) -> Vec<CaptionRecord> {
    records
        .iter()
        .filter(|r| Path::new(&r.image).exists())
        .cloned()
        .collect()
}
