use anyhow::{bail, Result};
use chrono::Utc;
use clap::Parser;
use std::time::Duration;
use stylegenie::{cache, cli, config, error, looks, scanner, tagging};
use stylegenie_common::{CombinationGenerator, Garment, OutfitSuggestion, SuggestionGenerator, TagSet};
use cache::{CachedWardrobe, Preferences, WardrobeCache};
use cli::{Cli, Commands, LooksAction};
use config::Config;
use looks::{LookBook, RemoteStore, SavedLook};
use tagging::GeminiVision;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Tag { images, json } => {
            if !json {
                println!("🏷  stylegenie - タグ付け\n");
            }

            let infos: Vec<scanner::ImageInfo> = images
                .iter()
                .map(|path| scanner::ImageInfo {
                    path: path.clone(),
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    category: None,
                })
                .collect();

            let model = GeminiVision::from_config(&config)?;
            let tagged = tagging::tag_images(&model, &infos, !json).await;

            if json {
                let mut output = Vec::with_capacity(tagged.len());
                for t in &tagged {
                    let mut value = serde_json::to_value(t.to_response())?;
                    value["file"] = serde_json::Value::String(t.garment.image.clone());
                    output.push(value);
                }
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for t in &tagged {
                    println!("- {}: {} [{}]", t.garment.image, t.garment.label(), t.garment.style_tags.join(", "));
                    if let Some(reason) = &t.fallback_reason {
                        println!("  (デモモード: {})", reason);
                    }
                }
            }
        }

        Commands::Combine { folder, output, complete, event, country, notes } => {
            println!("👕 stylegenie - 組み合わせ生成\n");

            // 1. 画像スキャン
            println!("[1/3] ワードローブをスキャン中...");
            let images = scanner::scan_wardrobe(&folder)?;
            if images.is_empty() {
                return Err(error::StyleError::NoImagesFound(folder.display().to_string()).into());
            }
            let wardrobe = scanner::Wardrobe::from_images(&images);
            println!("✔ {}枚の画像を検出\n", images.len());

            if complete && !wardrobe.is_complete() {
                let missing: Vec<&str> = wardrobe.missing_categories().iter().map(|c| c.as_str()).collect();
                println!("⚠ 全カテゴリが揃っていないためスキップします（不足: {}）", missing.join(", "));
                return Ok(());
            }

            let mut session = open_cache()?;
            session.save_wardrobe(&CachedWardrobe::from_wardrobe(&wardrobe, Utc::now()))?;

            // 2. タグ付け
            let model = GeminiVision::from_config(&config)?;
            if !model.is_configured() {
                println!("  APIキー未設定のためデモモードで実行します");
            }
            println!("[2/3] タグ付け中...");
            let tagged = tagging::tag_images(&model, &images, true).await;
            let fallbacks = tagged.iter().filter(|t| t.is_fallback()).count();
            println!("✔ タグ付け完了（フォールバック: {}件）\n", fallbacks);

            // 3. 組み合わせ
            println!("[3/3] 組み合わせを生成中...");
            let tables = config.load_tables()?;
            let garments: Vec<Garment> = tagged.into_iter().map(|t| t.garment).collect();
            let combinations = CombinationGenerator::new(&tables.compatibility).generate(&garments);

            if combinations.is_empty() {
                println!("組み合わせを作るには2点以上の服が必要です");
                return Ok(());
            }

            for (i, c) in combinations.iter().enumerate() {
                println!("{}. {} ({}点)", i + 1, c.title, c.compatibility_score);
                println!("   {}", c.description);
                println!("   {}", c.reasoning);
            }

            let output = output.unwrap_or_else(|| folder.join("combinations.json"));
            std::fs::write(&output, serde_json::to_string_pretty(&combinations)?)?;
            println!("\n✔ 結果を保存: {}", output.display());

            let preferences = Preferences {
                country,
                event_type: event,
                specifications: notes,
            };
            session.save_combination(combinations[0].clone(), preferences)?;

            println!("\n✅ 完了");
        }

        Commands::Suggest { garment_type, color, json } => {
            let tables = config.load_tables()?;
            let suggestions = SuggestionGenerator::new(&tables.style).suggest(&garment_type, &color);

            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                println!("✨ {} {} のコーデ提案\n", color, garment_type);
                print_suggestions(&suggestions);
            }
        }

        Commands::History => {
            let mut session = open_cache()?;
            let history = session.history()?;

            if history.is_empty() {
                println!("履歴はありません");
            }

            for (i, entry) in history.iter().enumerate() {
                println!(
                    "{}. [{}] {} ({}点)",
                    i + 1,
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.combination.title,
                    entry.combination.compatibility_score
                );
                println!("   {}", entry.preferences.describe());
            }
        }

        Commands::Looks { action } => {
            let mut book = LookBook::open(&Config::looks_path()?);

            match action {
                LooksAction::List => {
                    if book.is_empty() {
                        println!("保存済みのコーデはありません");
                    }
                    for look in book.list() {
                        println!(
                            "- {} [{}] {} {}: {}",
                            look.id,
                            look.saved_at.format("%Y-%m-%d %H:%M"),
                            look.garment_color,
                            look.garment_type,
                            look.suggestion.title
                        );
                    }
                }

                LooksAction::Save { garment_type, color, image, index } => {
                    let tables = config.load_tables()?;
                    let suggestions = SuggestionGenerator::new(&tables.style).suggest(&garment_type, &color);
                    let Some(suggestion) = suggestions.get(index) else {
                        bail!("提案番号が範囲外です: {}（0〜{}）", index, suggestions.len().saturating_sub(1));
                    };

                    let garment = Garment::new("look", TagSet::new(&garment_type, &color, &[]), image.unwrap_or_default());
                    let look = SavedLook::from_suggestion(&garment, suggestion, Utc::now());

                    let remote = config
                        .remote
                        .as_ref()
                        .map(|r| RemoteStore::new(r, Duration::from_secs(config.timeout_seconds)))
                        .transpose()?;

                    match looks::save_look(&mut book, look, remote.as_ref()).await {
                        Ok(receipt) => println!("✔ {}", receipt.message),
                        Err(e) => {
                            println!("⚠ ローカルには保存しましたが、リモート同期に失敗しました");
                            return Err(e.into());
                        }
                    }
                }

                LooksAction::Delete { id } => {
                    if book.remove(&id)? {
                        println!("✔ 削除しました: {}", id);
                    } else {
                        println!("コーデが見つかりません: {}", id);
                    }
                }
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
                match &config.tables {
                    Some(path) => println!("  テーブル: {}", path.display()),
                    None => println!("  テーブル: 組み込み"),
                }
                match &config.remote {
                    Some(remote) => println!("  リモート保存先: {}", remote.url),
                    None => println!("  リモート保存先: 未設定"),
                }
            }
        }

        Commands::Cache { clear, info } => {
            let cache_path = Config::cache_path()?;

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let mut session = WardrobeCache::open(&cache_path);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", session.len());
                    if let Some(wardrobe) = session.load_wardrobe() {
                        println!("  ワードローブ: {}枚", wardrobe.total());
                    }
                    if let Some(current) = session.load_combination() {
                        println!("  現在の組み合わせ: {}", current.combination.title);
                    }
                    println!("  履歴: {}件", session.history()?.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                if cache_path.exists() {
                    WardrobeCache::open(&cache_path).clear_all_caches()?;
                    println!("✔ キャッシュを削除しました: {}", cache_path.display());
                } else {
                    println!("キャッシュファイルが存在しません");
                }
            }
        }
    }

    Ok(())
}

fn open_cache() -> error::Result<WardrobeCache> {
    let path = Config::cache_path()?;
    Ok(WardrobeCache::open(&path))
}

fn print_suggestions(suggestions: &[OutfitSuggestion]) {
    for (i, s) in suggestions.iter().enumerate() {
        println!("{}. {}", i, s.title);
        println!("   {}", s.description);
        for piece in &s.pieces {
            println!("   - {} ({})", piece.item, piece.color);
        }
        println!("   {}", s.mockup_image);
    }
}
