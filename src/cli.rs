use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glasses-ai")]
#[command(about = "スマートグラス向けカメラキャプション生成・質問応答ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カメラ映像をリアルタイムでキャプション生成
    Camera {
        /// カメラデバイス番号
        #[arg(short, long, default_value = "0")]
        device: u32,

        /// フレーム取得間隔（ミリ秒）
        #[arg(short, long, default_value = "100")]
        interval_ms: u64,
    },

    /// 写真フォルダをキャプション生成してストアJSONを出力
    Caption {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "captions.json")]
        output: PathBuf,
    },

    /// キャプションストアに対して質問を実行
    Ask {
        /// 質問文
        #[arg(required = true)]
        question: String,

        /// キャプションストアJSONファイル
        #[arg(short, long, default_value = "captions.json")]
        store: PathBuf,
    },

    /// Telegramボットを起動（質問 → 写真＋回答）
    Bot {
        /// キャプションストアJSONファイル
        #[arg(short, long, default_value = "captions.json")]
        store: PathBuf,
    },

    /// 画像アップロードサーバを起動
    Serve {
        /// 待ち受けポート（省略時は設定値）
        #[arg(short, long)]
        port: Option<u16>,

        /// アップロード画像の保存先（省略時は設定値）
        #[arg(short, long)]
        upload_dir: Option<PathBuf>,
    },

    /// 画像ファイルが存在しないレコードをストアから除去
    Filter {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時はcaptions.jsonを上書き）
        #[arg(short, long, default_value = "captions.json")]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// Telegram Botトークンを設定
        #[arg(long)]
        set_bot_token: Option<String>,

        /// キャプション生成コマンドを設定
        #[arg(long)]
        set_caption_command: Option<String>,

        /// QAコマンドを設定
        #[arg(long)]
        set_qa_command: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
