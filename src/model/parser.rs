//! モデルCLIレスポンスパーサー
//!
//! モデルCLIの標準出力からJSONを抽出し、
//! キャプション/QAの結果をパースする

use crate::error::{GlassesAiError, Result};
use crate::model::QaAnswer;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
}

#[derive(Debug, Deserialize)]
struct QaResponse {
    answer: String,
    score: f64,
}

/// レスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(GlassesAiError::ModelParse("JSONが見つかりません".into()))
}

/// キャプション生成レスポンスをパース
pub fn parse_caption_response(response: &str) -> Result<String> {
    let json_str = extract_json(response)?;
    let parsed: CaptionResponse = serde_json::from_str(json_str)
        .map_err(|e| GlassesAiError::ModelParse(format!("キャプションJSONパースエラー: {}", e)))?;
    Ok(parsed.caption.trim().to_string())
}

/// QAレスポンスをパース
pub fn parse_qa_response(response: &str) -> Result<QaAnswer> {
    let json_str = extract_json(response)?;
    let parsed: QaResponse = serde_json::from_str(json_str)
        .map_err(|e| GlassesAiError::ModelParse(format!("QA JSONパースエラー: {}", e)))?;
    Ok(QaAnswer {
        answer: parsed.answer.trim().to_string(),
        score: parsed.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the result:
```json
{"caption": "a cat on a mat"}
```
"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("a cat on a mat"));
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"caption": "a dog"}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_extract_json_with_noise() {
        let response = "loading model...\n{\"answer\": \"a dog\", \"score\": 0.8}\ndone";
        let json = extract_json(response).unwrap();
        assert_eq!(json, "{\"answer\": \"a dog\", \"score\": 0.8}");
    }

    #[test]
    fn test_extract_json_not_found() {
        let result = extract_json("no json here");
        assert!(matches!(result, Err(GlassesAiError::ModelParse(_))));
    }

    #[test]
    fn test_parse_caption_response() {
        let caption = parse_caption_response(r#"{"caption": "  a laptop on a desk  "}"#).unwrap();
        assert_eq!(caption, "a laptop on a desk");
    }

    #[test]
    fn test_parse_caption_response_missing_field() {
        let result = parse_caption_response(r#"{"text": "a laptop"}"#);
        assert!(matches!(result, Err(GlassesAiError::ModelParse(_))));
    }

    #[test]
    fn test_parse_qa_response() {
        let answer = parse_qa_response(r#"{"answer": "in a yard", "score": 0.87}"#).unwrap();
        assert_eq!(answer.answer, "in a yard");
        assert!((answer.score - 0.87).abs() < 1e-9);
    }

    #[test]
    fn test_parse_qa_response_fenced() {
        let response = "```json\n{\"answer\": \"on the mat\", \"score\": 0.42}\n```";
        let answer = parse_qa_response(response).unwrap();
        assert_eq!(answer.answer, "on the mat");
    }
}
