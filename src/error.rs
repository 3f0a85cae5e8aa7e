use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`stylegenie config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("リモート保存エラー: {0}")]
    RemoteSave(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error(transparent)]
    Common(#[from] stylegenie_common::Error),
}

pub type Result<T> = std::result::Result<T, StyleError>;
