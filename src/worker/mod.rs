//! キャプションワーカーモジュール
//!
//! カメラループを止めずにキャプションを更新し続けるための
//! バックグラウンドワーカー。フレームは容量1のスロットで受け渡し、
//! スロットが埋まっている間に来たフレームは破棄する（drop-on-full）。
//! ワーカーの起床はポーリングではなく条件変数で行う。

use crate::error::Result;
use crate::model::CaptionModel;
use image::RgbImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

/// 起動直後のプレースホルダキャプション
pub const INITIAL_CAPTION: &str = "キャプションを初期化中...";
/// 生成失敗時の固定キャプション
pub const FAILURE_CAPTION: &str = "キャプション生成に失敗しました";

struct WorkerInner {
    running: AtomicBool,
    /// 容量1のフレームスロット
    slot: Mutex<Option<RgbImage>>,
    wakeup: Condvar,
    latest_caption: Mutex<String>,
}

/// バックグラウンドキャプションワーカー
///
/// 状態遷移は Idle（スロット空）→ Processing（推論中）→ Idle のみ。
/// 生成失敗はエラー終了ではなく固定キャプションへの置き換えで吸収する。
pub struct CaptionWorker {
    inner: Arc<WorkerInner>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CaptionWorker {
    /// ワーカーを起動する
    pub fn start(model: Arc<dyn CaptionModel>) -> Result<Self> {
        let inner = Arc::new(WorkerInner {
            running: AtomicBool::new(true),
            slot: Mutex::new(None),
            wakeup: Condvar::new(),
            latest_caption: Mutex::new(INITIAL_CAPTION.to_string()),
        });

        let worker_inner = inner.clone();
        let handle = thread::Builder::new()
            .name("caption-worker".into())
            .spawn(move || caption_loop(worker_inner, model))?;

        Ok(Self {
            inner,
            handle: Some(handle),
        })
    }

    /// フレームを投入する
    ///
    /// スロットが空ならフレームを置いてワーカーを起こし true を返す。
    /// 埋まっていればフレームを破棄して false を返す。呼び出し側を
    /// ブロックすることはなく、処理待ちのフレームを置き換えることもない。
    pub fn submit_frame(&self, frame: RgbImage) -> bool {
        let mut slot = self.inner.slot.lock().expect("frame slot lock poisoned");
        if slot.is_some() {
            // 推論待ちフレームがある間は新しいフレームを破棄
            return false;
        }
        *slot = Some(frame);
        self.inner.wakeup.notify_one();
        true
    }

    /// 最新キャプションのスナップショットを返す
    pub fn get_caption(&self) -> String {
        self.inner
            .latest_caption
            .lock()
            .expect("caption lock poisoned")
            .clone()
    }

    /// ワーカーを停止してスレッドをjoinする
    ///
    /// 推論中のモデル呼び出しはキャンセルせず、完了を待つ。
    pub fn stop(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.wakeup.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CaptionWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn caption_loop(inner: Arc<WorkerInner>, model: Arc<dyn CaptionModel>) {
    loop {
        // スロットにフレームが来るまで待つ
        let frame = {
            let mut slot = inner.slot.lock().expect("frame slot lock poisoned");
            loop {
                if !inner.running.load(Ordering::SeqCst) {
                    return;
                }
                if let Some(frame) = slot.take() {
                    break frame;
                }
                slot = inner.wakeup.wait(slot).expect("frame slot lock poisoned");
            }
        };

        // 生成失敗はワーカーを止めず固定キャプションで継続
        let caption = match model.caption(&frame) {
            Ok(caption) => caption,
            Err(e) => {
                log::error!("キャプション生成エラー: {}", e);
                FAILURE_CAPTION.to_string()
            }
        };

        *inner
            .latest_caption
            .lock()
            .expect("caption lock poisoned") = caption;
    }
}
