use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stylegenie")]
#[command(about = "ワードローブ写真からコーデを提案するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をタグ付け（種類・色・スタイル）
    Tag {
        /// 画像ファイル
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ワードローブフォルダから組み合わせを生成
    Combine {
        /// ワードローブフォルダ（shirts/pants/shoes/addons サブフォルダ可）
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 全カテゴリが揃っている場合のみ実行
        #[arg(long)]
        complete: bool,

        /// 利用シーン（例: wedding）
        #[arg(long)]
        event: Option<String>,

        /// 国・地域
        #[arg(long)]
        country: Option<String>,

        /// その他の希望
        #[arg(long)]
        notes: Option<String>,
    },

    /// 1点の服からコーデ提案を生成
    Suggest {
        /// 服の種類（shirt, jeans...）
        #[arg(long = "type")]
        garment_type: String,

        /// 服の色
        #[arg(long)]
        color: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 過去の組み合わせを表示
    History,

    /// お気に入りコーデ管理
    Looks {
        #[command(subcommand)]
        action: LooksAction,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Subcommand)]
pub enum LooksAction {
    /// 保存済みコーデを一覧表示
    List,

    /// 提案を保存
    Save {
        /// 服の種類
        #[arg(long = "type")]
        garment_type: String,

        /// 服の色
        #[arg(long)]
        color: String,

        /// 服の画像パス
        #[arg(long)]
        image: Option<String>,

        /// 保存する提案の番号（0始まり）
        #[arg(long, default_value = "0")]
        index: usize,
    },

    /// 保存済みコーデを削除
    Delete {
        /// コーデID
        id: String,
    },
}
