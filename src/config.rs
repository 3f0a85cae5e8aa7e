use crate::error::{StyleError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stylegenie_common::TableConfig;

/// リモート保存先（未設定ならローカル保存のみ）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
    /// 相性テーブル・テンプレートのJSON（省略時は組み込み）
    pub tables: Option<PathBuf>,
    pub remote: Option<RemoteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".into(),
            timeout_seconds: 60,
            tables: None,
            remote: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StyleError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("stylegenie").join("config.json"))
    }

    /// セッションキャッシュの保存先
    pub fn cache_path() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| StyleError::Config("キャッシュディレクトリが見つかりません".into()))?;
        Ok(dir.join("stylegenie").join("session.json"))
    }

    /// お気に入りコーデの保存先
    pub fn looks_path() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| StyleError::Config("データディレクトリが見つかりません".into()))?;
        Ok(dir.join("stylegenie").join("looks.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(StyleError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// 相性テーブル・テンプレートを読み込み
    pub fn load_tables(&self) -> Result<TableConfig> {
        match &self.tables {
            Some(path) => Ok(TableConfig::from_file(path)?),
            None => Ok(TableConfig::default()),
        }
    }
}
