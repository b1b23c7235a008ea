//! キャプション照合モジュール
//!
//! 質問文をストア全レコードに対して線形に照合し、
//! 最高スコアのレコードを選ぶ。インデックスは持たない（設計上の選択）。

use crate::error::Result;
use crate::model::QaModel;
use crate::store::CaptionRecord;

/// 該当なしの固定メッセージ
pub const NO_ANSWER_MESSAGE: &str = "該当する回答が見つかりませんでした";

/// 照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// 回答スパン（キャプションの部分文字列）
    pub answer: String,
    /// 対応する画像パス
    pub image: String,
    /// QAモデルの信頼度スコア
    pub score: f64,
}

/// 全レコードをQAモデルで照合して最良の回答を返す
///
/// - スコアは「厳密により大きい」場合のみ更新する。同点は先勝ち
///   （入力順依存のタイブレーク）。
/// - 初期閾値は0.0のため、全レコードのスコアが非正なら `Ok(None)`。
///   レコードが空の場合も `Ok(None)`。
/// - モデル呼び出しの失敗は分離せず、そのまま伝播してスキャン全体を
///   中断する（呼び出し側がユーザ向けメッセージに変換する）。
pub fn answer_question(
    records: &[CaptionRecord],
    question: &str,
    model: &dyn QaModel,
) -> Result<Option<BestMatch>> {
    let mut best: Option<BestMatch> = None;
    let mut best_score = 0.0_f64;

    for record in records {
        let result = model.ask(question, &record.caption)?;

        if result.score > best_score {
            best_score = result.score;
            best = Some(BestMatch {
                answer: result.answer,
                image: record.image.clone(),
                score: result.score,
            });
        }
    }

    Ok(best)
}
