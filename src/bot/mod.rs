//! 質問応答ボットモジュール
//!
//! Telegramのテキストメッセージを質問として受け取り、
//! キャプションストアを照合して最良レコードの写真と回答を返す。
//! メッセージは到着順に1件ずつ処理する。

mod telegram;

pub use telegram::{Chat, Message, TelegramClient, Update};

use crate::error::{GlassesAiError, Result};
use crate::matcher::{self, NO_ANSWER_MESSAGE};
use crate::model::QaModel;
use crate::store;
use std::path::Path;
use std::time::Duration;

/// /start への応答
pub const GREETING: &str =
    "こんにちは！スマートグラス連携ボットです。質問を送ると、保存済みの写真から回答を探します。";

const POLL_TIMEOUT_SECS: u64 = 30;

/// ボットのメインループ（long polling）
pub async fn run(token: &str, store_path: &Path, qa: &dyn QaModel) -> Result<()> {
    let client = TelegramClient::new(token)?;

    log::info!("🤖 Telegramボットを起動しました（long polling）");
    log::info!("📄 ストア: {}", store_path.display());

    let mut offset = 0i64;

    loop {
        let updates = match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                log::error!("getUpdates失敗: {}", e);
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text.clone() else {
                continue;
            };

            if let Err(e) = handle_message(&client, store_path, qa, message.chat.id, &text).await {
                log::error!("メッセージ処理エラー: {}", e);
            }
        }
    }
}

async fn handle_message(
    client: &TelegramClient,
    store_path: &Path,
    qa: &dyn QaModel,
    chat_id: i64,
    text: &str,
) -> Result<()> {
    if text == "/start" {
        return client.send_message(chat_id, GREETING).await;
    }

    // 毎回ストアを読み直す（フィルタ等との共有はファイル経由のみ）
    let records = match store::load(store_path) {
        Ok(records) => records,
        // ストア未作成は空として扱い、「該当なし」で応答する
        Err(GlassesAiError::FileNotFound(_)) => Vec::new(),
        Err(e) => {
            client
                .send_message(chat_id, &format!("ストアの読み込みに失敗しました: {}", e))
                .await?;
            return Ok(());
        }
    };

    match matcher::answer_question(&records, text, qa) {
        Ok(Some(best)) => {
            let photo_path = Path::new(&best.image);
            if let Err(e) = client.send_photo(chat_id, photo_path, &best.answer).await {
                // 写真が送れなくても回答テキストは返す
                log::warn!("写真送信失敗 {}: {}", best.image, e);
                client
                    .send_message(chat_id, &format!("{}（写真: {}）", best.answer, best.image))
                    .await?;
            }
        }
        Ok(None) => {
            client.send_message(chat_id, NO_ANSWER_MESSAGE).await?;
        }
        Err(e) => {
            // 推論失敗はハンドラを落とさずユーザに通知する
            log::error!("照合失敗: {}", e);
            client
                .send_message(chat_id, &format!("回答の生成に失敗しました: {}", e))
                .await?;
        }
    }

    Ok(())
}
