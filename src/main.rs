use clap::Parser;
use glasses_ai_rust::{bot, camera, cli, config, error, matcher, model, scanner, server, store, worker};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use model::{CaptionModel, CliCaptionModel, CliQaModel};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Camera { device, interval_ms } => {
            println!("📸 glasses-ai - リアルタイムキャプション\n");

            let model: Arc<dyn CaptionModel> =
                Arc::new(CliCaptionModel::new(&config.caption_command, cli.verbose));
            let mut caption_worker = worker::CaptionWorker::start(model)?;

            camera::run(device, interval_ms, &mut caption_worker)?;

            println!("\n✅ 終了");
        }

        Commands::Caption { folder, output } => {
            println!("📸 glasses-ai - フォルダキャプション生成\n");

            // 1. 画像スキャン
            println!("[1/3] 写真をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            println!("✔ {}枚の写真を検出\n", images.len());

            if images.is_empty() {
                return Err(error::GlassesAiError::NoImagesFound(
                    folder.display().to_string(),
                ));
            }

            // 2. キャプション生成
            println!("[2/3] キャプション生成中...");
            let model = CliCaptionModel::new(&config.caption_command, cli.verbose);
            let records = caption_folder(&images, &model);
            println!("✔ {}件のキャプションを生成\n", records.len());

            // 3. ストア保存
            println!("[3/3] ストアを保存中...");
            store::save(&output, &records)?;
            println!("✔ ストアを保存: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Ask { question, store: store_path } => {
            println!("❓ glasses-ai - 質問応答\n");

            let records = store::load(&store_path)?;
            println!("✔ {}件のレコードを読み込み\n", records.len());

            let qa = CliQaModel::new(&config.qa_command, cli.verbose);
            match matcher::answer_question(&records, &question, &qa)? {
                Some(best) => {
                    println!("回答: {}", best.answer);
                    println!("写真: {} (score: {:.3})", best.image, best.score);
                }
                None => {
                    println!("{}", matcher::NO_ANSWER_MESSAGE);
                }
            }
        }

        Commands::Bot { store: store_path } => {
            println!("🤖 glasses-ai - Telegramボット\n");

            let token = config.get_bot_token()?;
            let qa = CliQaModel::new(&config.qa_command, cli.verbose);
            bot::run(&token, &store_path, &qa).await?;
        }

        Commands::Serve { port, upload_dir } => {
            println!("🌐 glasses-ai - アップロードサーバ\n");

            let port = port.unwrap_or(config.server_port);
            let upload_dir = upload_dir.unwrap_or_else(|| config.upload_dir.clone());
            server::run(port, upload_dir).await?;
        }

        Commands::Filter { input, output } => {
            println!("🧹 glasses-ai - ストアフィルタ\n");

            let records = store::load(&input)?;
            let before = records.len();

            let filtered = store::filter_existing(&records);
            store::save(&output, &filtered)?;

            println!("✔ {}件 → {}件 ({}件を除去)", before, filtered.len(), before - filtered.len());
            println!("✔ 出力: {}", output.display());
        }

        Commands::Config { set_bot_token, set_caption_command, set_qa_command, show } => {
            let mut config = config;

            if let Some(token) = set_bot_token {
                config.set_bot_token(token)?;
                println!("✔ Botトークンを設定しました");
            }

            if let Some(command) = set_caption_command {
                config.caption_command = command;
                config.save()?;
                println!("✔ キャプション生成コマンドを設定しました");
            }

            if let Some(command) = set_qa_command {
                config.qa_command = command;
                config.save()?;
                println!("✔ QAコマンドを設定しました");
            }

            if show {
                println!("設定:");
                println!("  キャプション生成コマンド: {}", config.caption_command);
                println!("  QAコマンド: {}", config.qa_command);
                println!("  アップロード保存先: {}", config.upload_dir.display());
                println!("  サーバポート: {}", config.server_port);
                println!("  Botトークン: {}", if config.bot_token.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// フォルダ内の画像を順にキャプション生成する
///
/// 個々の画像の失敗はスキップし、残りを継続する
fn caption_folder(images: &[scanner::ImageInfo], model: &CliCaptionModel) -> Vec<store::CaptionRecord> {
    let pb = indicatif::ProgressBar::new(images.len() as u64);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Failed to set progress bar style")
            .progress_chars("##>-"),
    );

    let mut records = Vec::new();

    for img in images {
        pb.set_message(img.file_name.clone());

        let frame = match image::open(&img.path) {
            Ok(frame) => frame.to_rgb8(),
            Err(e) => {
                pb.println(format!("⚠ 読み込み失敗 {}: {}", img.file_name, e));
                pb.inc(1);
                continue;
            }
        };

        match model.caption(&frame) {
            Ok(caption) => {
                records.push(store::CaptionRecord {
                    image: img.path.display().to_string(),
                    caption,
                });
            }
            Err(e) => {
                pb.println(format!("⚠ キャプション生成失敗 {}: {}", img.file_name, e));
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    records
}
