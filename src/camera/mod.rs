//! カメラループモジュール
//!
//! Webカメラからフレームを取得し、キャプションワーカーに渡して
//! 最新キャプションを端末に表示し続ける。フレーム取得とキャプション
//! 生成の2本の制御の流れだけで構成する。

use crate::error::{GlassesAiError, Result};
use crate::worker::CaptionWorker;
use image::RgbImage;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// フレーム供給源
///
/// テストではWebカメラの代わりにスタブを注入する
pub trait FrameSource {
    fn grab_frame(&mut self) -> Result<RgbImage>;
}

/// nokhwa経由のWebカメラ入力
pub struct WebcamSource {
    camera: Camera,
}

impl WebcamSource {
    pub fn open(device: u32) -> Result<Self> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(device), requested)
            .map_err(|e| GlassesAiError::Camera(format!("カメラ{}を開けません: {}", device, e)))?;
        camera
            .open_stream()
            .map_err(|e| GlassesAiError::Camera(format!("ストリーム開始失敗: {}", e)))?;
        Ok(Self { camera })
    }
}

impl FrameSource for WebcamSource {
    fn grab_frame(&mut self) -> Result<RgbImage> {
        let frame = self
            .camera
            .frame()
            .map_err(|e| GlassesAiError::Camera(format!("フレーム取得失敗: {}", e)))?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| GlassesAiError::Camera(format!("フレームデコード失敗: {}", e)))?;
        Ok(decoded)
    }
}

/// キャプチャループ本体
///
/// フレームを取得してワーカーに投入し、キャプションが変わったら表示する。
/// フレーム取得エラーはループを止めず、次のフレームで継続する。
pub fn capture_loop(
    source: &mut dyn FrameSource,
    worker: &CaptionWorker,
    interval: Duration,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut last_caption = String::new();

    while !cancel.load(Ordering::SeqCst) {
        let frame = match source.grab_frame() {
            Ok(frame) => frame,
            Err(e) => {
                eprintln!("⚠ フレーム取得エラー: {}", e);
                std::thread::sleep(Duration::from_millis(100));
                continue;
            }
        };

        // スロットが埋まっていればフレームは破棄される
        worker.submit_frame(frame);

        let caption = worker.get_caption();
        if caption != last_caption {
            println!("📝 {}", caption);
            last_caption = caption;
        }

        std::thread::sleep(interval);
    }

    Ok(())
}

/// カメラコマンドのエントリポイント
pub fn run(device: u32, interval_ms: u64, worker: &mut CaptionWorker) -> Result<()> {
    // Ctrl+Cで停止フラグを立てる
    let cancel = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let cancel = cancel.clone();
        move || {
            cancel.store(true, Ordering::SeqCst);
            println!("停止シグナルを受信しました");
        }
    })
    .map_err(|e| GlassesAiError::Camera(format!("シグナルハンドラ登録失敗: {}", e)))?;

    let mut source = WebcamSource::open(device)?;
    println!("📹 カメラキャプチャ開始（Ctrl+Cで終了）");

    capture_loop(&mut source, worker, Duration::from_millis(interval_ms), &cancel)?;

    // 推論中の処理が終わるのを待ってから終了
    worker.stop();
    Ok(())
}
