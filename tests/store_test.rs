//! キャプションストアテスト
//!
//! ストアの読み書きとフィルタリングを検証

use glasses_ai_rust::error::GlassesAiError;
use glasses_ai_rust::store::{self, CaptionRecord};
use tempfile::tempdir;

/// 存在しないストアファイルの読み込み
#[test]
fn test_load_missing_store() {
    let result = store::load(std::path::Path::new("/nonexistent/captions.json"));
    assert!(matches!(result, Err(GlassesAiError::FileNotFound(_))));
}

/// 不正なJSONのストアファイル
#[test]
fn test_load_malformed_store() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("captions.json");
    std::fs::write(&store_path, "{ invalid json }").unwrap();

    let result = store::load(&store_path);
    let err = result.unwrap_err();
    assert!(matches!(err, GlassesAiError::StoreParse { .. }));

    // エラーメッセージにファイルパスが含まれる
    let display = format!("{}", err);
    assert!(display.contains("captions.json"));
}

/// 保存と再読み込みのラウンドトリップ
#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("captions.json");

    let records = vec![
        CaptionRecord {
            image: "/photos/a.jpg".into(),
            caption: "a cat on a mat".into(),
        },
        CaptionRecord {
            image: "/photos/b.jpg".into(),
            caption: "a dog in a yard".into(),
        },
    ];

    store::save(&store_path, &records).expect("ストア保存失敗");
    let loaded = store::load(&store_path).expect("ストア読み込み失敗");

    assert_eq!(loaded, records);
}

/// 非ASCIIキャプションがそのまま保存される
#[test]
fn test_save_preserves_non_ascii() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("captions.json");

    let records = vec![CaptionRecord {
        image: "/photos/десктоп.jpg".into(),
        caption: "机の上にノートパソコンがある".into(),
    }];

    store::save(&store_path, &records).expect("ストア保存失敗");

    // エスケープされず生のUTF-8で書かれている
    let content = std::fs::read_to_string(&store_path).unwrap();
    assert!(content.contains("机の上にノートパソコンがある"));
    assert!(content.contains("десктоп"));

    let loaded = store::load(&store_path).expect("ストア読み込み失敗");
    assert_eq!(loaded, records);
}

/// ワイヤ形式のフィールド名（image / caption）
#[test]
fn test_wire_field_names() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("captions.json");

    // 外部パイプラインが書いた形式をそのまま読めること
    let json = r#"[
        {"image": "/photos/x.jpg", "caption": "there is a laptop on a desk"}
    ]"#;
    std::fs::write(&store_path, json).unwrap();

    let loaded = store::load(&store_path).expect("ストア読み込み失敗");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].image, "/photos/x.jpg");
    assert_eq!(loaded[0].caption, "there is a laptop on a desk");
}

/// フィルタ: 存在するファイルのレコードだけ残る（順序維持）
#[test]
fn test_filter_keeps_existing_in_order() {
    let dir = tempdir().expect("Failed to create temp dir");

    // a.jpg と c.jpg は実在、b.jpg は実在しない
    let a_path = dir.path().join("a.jpg");
    let c_path = dir.path().join("c.jpg");
    std::fs::write(&a_path, b"fake image a").unwrap();
    std::fs::write(&c_path, b"fake image c").unwrap();

    let records = vec![
        CaptionRecord {
            image: a_path.display().to_string(),
            caption: "first".into(),
        },
        CaptionRecord {
            image: dir.path().join("b.jpg").display().to_string(),
            caption: "second".into(),
        },
        CaptionRecord {
            image: c_path.display().to_string(),
            caption: "third".into(),
        },
    ];

    let filtered = store::filter_existing(&records);

    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0].caption, "first");
    assert_eq!(filtered[1].caption, "third");
}

/// フィルタ結果の保存がJSONパースでラウンドトリップする
#[test]
fn test_filter_output_roundtrips() {
    let dir = tempdir().expect("Failed to create temp dir");

    let a_path = dir.path().join("a.jpg");
    std::fs::write(&a_path, b"fake").unwrap();

    let records = vec![
        CaptionRecord {
            image: a_path.display().to_string(),
            caption: "kept".into(),
        },
        CaptionRecord {
            image: "/nonexistent/gone.jpg".into(),
            caption: "removed".into(),
        },
    ];

    let filtered = store::filter_existing(&records);
    let output_path = dir.path().join("filtered.json");
    store::save(&output_path, &filtered).expect("保存失敗");

    let reloaded = store::load(&output_path).expect("再読み込み失敗");
    assert_eq!(reloaded, filtered);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].caption, "kept");
}

/// 空ストアのラウンドトリップ
#[test]
fn test_empty_store_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("captions.json");

    store::save(&store_path, &[]).expect("保存失敗");
    let loaded = store::load(&store_path).expect("読み込み失敗");
    assert!(loaded.is_empty());
}
