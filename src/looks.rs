//! お気に入りコーデ（Look Book）
//!
//! ローカルのJSONファイルが正。リモート保存先が設定されていれば
//! 保存後にPOSTで同期する（失敗してもローカルはそのまま）。

use crate::config::RemoteConfig;
use crate::error::{Result, StyleError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stylegenie_common::{Garment, OutfitSuggestion};

/// リモート未設定時のメッセージ
pub const LOCAL_ONLY_MESSAGE: &str = "Look saved locally. Connect a remote store for cloud sync.";

/// 保存済みコーデ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLook {
    pub id: String,
    pub garment_image: String,
    pub garment_type: String,
    pub garment_color: String,
    pub suggestion: OutfitSuggestion,
    pub saved_at: DateTime<Utc>,
}

impl SavedLook {
    /// 提案から保存レコードを作成（IDはミリ秒タイムスタンプ）
    pub fn from_suggestion(garment: &Garment, suggestion: &OutfitSuggestion, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            garment_image: garment.image.clone(),
            garment_type: garment.garment_type.clone(),
            garment_color: garment.color.clone(),
            suggestion: suggestion.clone(),
            saved_at: now,
        }
    }
}

/// Look Book（新しい順）
#[derive(Debug, Clone, Default)]
pub struct LookBook {
    path: Option<PathBuf>,
    looks: Vec<SavedLook>,
}

impl LookBook {
    /// ファイルから読み込み（存在しない・壊れている場合は空）
    pub fn open(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            looks: Self::read_file(path).unwrap_or_default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    fn read_file(path: &Path) -> Option<Vec<SavedLook>> {
        if !path.exists() {
            return None;
        }

        let reader = BufReader::new(File::open(path).ok()?);
        match serde_json::from_reader(reader) {
            Ok(looks) => Some(looks),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Look Bookが壊れているため空で開始します");
                None
            }
        }
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.looks)?;
        Ok(())
    }

    /// 先頭に追加（同じIDがあれば置き換え）
    pub fn add(&mut self, look: SavedLook) -> Result<()> {
        self.looks.retain(|l| l.id != look.id);
        self.looks.insert(0, look);
        self.flush()
    }

    pub fn list(&self) -> &[SavedLook] {
        &self.looks
    }

    pub fn get(&self, id: &str) -> Option<&SavedLook> {
        self.looks.iter().find(|l| l.id == id)
    }

    /// 削除（見つからなければ false）
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.looks.len();
        self.looks.retain(|l| l.id != id);

        if self.looks.len() == before {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.looks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.looks.is_empty()
    }
}

/// 保存結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReceipt {
    pub success: bool,
    pub synced: bool,
    pub message: String,
}

/// リモート保存先への同期クライアント
#[derive(Debug, Clone)]
pub struct RemoteStore {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(remote: &RemoteConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StyleError::Config(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            url: remote.url.clone(),
            token: remote.token.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// コーデをJSONでPOST
    pub async fn push(&self, look: &SavedLook) -> Result<()> {
        let mut request = self.client.post(&self.url).json(look);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StyleError::RemoteSave(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StyleError::RemoteSave(format!("{}: {}", status, body)));
        }

        Ok(())
    }
}

/// コーデを保存（ローカル優先、リモートはベストエフォート）
pub async fn save_look(book: &mut LookBook, look: SavedLook, remote: Option<&RemoteStore>) -> Result<SaveReceipt> {
    let id = look.id.clone();
    book.add(look)?;
    tracing::info!(id = %id, "コーデをローカルに保存");

    let Some(remote) = remote else {
        return Ok(SaveReceipt {
            success: true,
            synced: false,
            message: LOCAL_ONLY_MESSAGE.to_string(),
        });
    };

    let Some(saved) = book.get(&id) else {
        return Err(StyleError::RemoteSave(format!("保存したコーデが見つかりません: {}", id)));
    };

    if let Err(e) = remote.push(saved).await {
        tracing::warn!(url = remote.url(), error = %e, "リモート同期失敗");
        return Err(e);
    }

    Ok(SaveReceipt {
        success: true,
        synced: true,
        message: format!("Look saved and synced to {}", remote.url()),
    })
}
