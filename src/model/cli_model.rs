//! モデルCLI連携モジュール
//!
//! キャプション生成・QAとも、設定されたコマンドをサブプロセスとして
//! 起動し、標準出力のJSONをパースする。モデル本体は外部依存であり、
//! 本クレートは前処理と呼び出しのみを担う。

use crate::error::{GlassesAiError, Result};
use crate::model::{parser, CaptionModel, QaAnswer, QaModel};
use image::imageops::FilterType;
use image::RgbImage;
use std::path::PathBuf;
use std::process::Command;

/// キャプション生成の入力解像度（固定）
const CAPTION_WIDTH: u32 = 640;
const CAPTION_HEIGHT: u32 = 480;
/// ビームサーチ幅
const NUM_BEAMS: u32 = 5;
/// 最大出力トークン数
const MAX_LENGTH: u32 = 30;

/// 外部CLIを呼び出すキャプション生成モデル
pub struct CliCaptionModel {
    command: String,
    verbose: bool,
}

impl CliCaptionModel {
    pub fn new(command: impl Into<String>, verbose: bool) -> Self {
        Self {
            command: command.into(),
            verbose,
        }
    }

    /// フレームを一時JPEGに書き出してモデルに渡す
    fn stage_frame(&self, frame: &RgbImage) -> Result<PathBuf> {
        let temp_dir = std::env::temp_dir().join("glasses-ai");
        std::fs::create_dir_all(&temp_dir)?;

        // 固定解像度へリサイズ（RGB前提）
        let resized = image::imageops::resize(frame, CAPTION_WIDTH, CAPTION_HEIGHT, FilterType::Triangle);

        let path = temp_dir.join(format!("frame_{}.jpg", std::process::id()));
        resized
            .save(&path)
            .map_err(|e| GlassesAiError::ImageLoad(format!("フレーム書き出し失敗: {}", e)))?;
        Ok(path)
    }
}

impl CaptionModel for CliCaptionModel {
    fn caption(&self, frame: &RgbImage) -> Result<String> {
        let image_path = self.stage_frame(frame)?;

        let response = run_model_cli(
            &self.command,
            &[
                "--image",
                &image_path.display().to_string(),
                "--num-beams",
                &NUM_BEAMS.to_string(),
                "--max-length",
                &MAX_LENGTH.to_string(),
            ],
            self.verbose,
        )?;

        parser::parse_caption_response(&response)
    }
}

/// 外部CLIを呼び出す抽出型QAモデル
pub struct CliQaModel {
    command: String,
    verbose: bool,
}

impl CliQaModel {
    pub fn new(command: impl Into<String>, verbose: bool) -> Self {
        Self {
            command: command.into(),
            verbose,
        }
    }
}

impl QaModel for CliQaModel {
    fn ask(&self, question: &str, context: &str) -> Result<QaAnswer> {
        let response = run_model_cli(
            &self.command,
            &["--question", question, "--context", context],
            self.verbose,
        )?;

        parser::parse_qa_response(&response)
    }
}

fn run_model_cli(command: &str, args: &[&str], verbose: bool) -> Result<String> {
    // モデルCLI呼び出し（Windowsではcmd /c経由）
    #[cfg(windows)]
    let output = {
        let mut cmd_args = vec!["/c", command];
        cmd_args.extend_from_slice(args);
        Command::new("cmd")
            .args(&cmd_args)
            .output()
            .map_err(|e| GlassesAiError::ModelCall(format!("{} 実行エラー: {}", command, e)))?
    };

    #[cfg(not(windows))]
    let output = Command::new(command)
        .args(args)
        .output()
        .map_err(|e| GlassesAiError::ModelCall(format!("{} 実行エラー: {}", command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GlassesAiError::ModelCall(format!(
            "{} failed (code {:?}): {}",
            command,
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();

    if verbose {
        let preview: String = response.chars().take(500).collect();
        println!("  レスポンス: {}", preview);
    }

    Ok(response)
}
