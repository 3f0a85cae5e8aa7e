//! ワードローブキャッシュ
//!
//! セッション単位のキー・バリューストア。各エントリにタイムスタンプを付け、
//! 24時間を過ぎたものは読み込み時に破棄する。
//! - wardrobe: カテゴリ別の画像
//! - combination: 現在の組み合わせ
//! - history: 過去の組み合わせ（新しい順・最大10件）

mod history;
mod records;

pub use history::{BoundedHistory, HISTORY_CAPACITY};
pub use records::{CachedCombination, CachedImage, CachedWardrobe, Preferences};

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use stylegenie_common::Combination;

/// キャッシュの有効期間
pub const CACHE_TTL_HOURS: i64 = 24;

pub const WARDROBE_KEY: &str = "wardrobe";
pub const COMBINATION_KEY: &str = "combination";
pub const HISTORY_KEY: &str = "history";

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    payload: Value,
    timestamp: DateTime<Utc>,
}

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 期限切れか（保存から24時間を超えた）
pub fn is_expired(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(timestamp) > Duration::hours(CACHE_TTL_HOURS)
}

/// TTL付きワードローブキャッシュ
#[derive(Debug, Clone, Default)]
pub struct WardrobeCache {
    path: Option<PathBuf>,
    file: CacheFile,
}

impl WardrobeCache {
    /// キャッシュファイルを読み込み（存在しない・壊れている場合は空）
    pub fn open(path: &Path) -> Self {
        let file = Self::read_file(path).unwrap_or_default();
        Self {
            path: Some(path.to_path_buf()),
            file,
        }
    }

    /// ファイルに書き出さないキャッシュ
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn read_file(path: &Path) -> Option<CacheFile> {
        if !path.exists() {
            return None;
        }

        let reader = BufReader::new(File::open(path).ok()?);
        match serde_json::from_reader::<_, CacheFile>(reader) {
            Ok(cache) if cache.version == CacheFile::CURRENT_VERSION => Some(cache),
            Ok(_) => {
                tracing::warn!("キャッシュバージョン不一致、再生成します");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "キャッシュファイルが壊れているため無視します");
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
        serde_json::to_writer_pretty(writer, &self.file)?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// エントリ件数（期限切れも含む）
    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    /// 上書き保存（現在時刻を付与）
    pub fn save<T: Serialize>(&mut self, key: &str, payload: &T) -> Result<()> {
        self.save_at(key, payload, Utc::now())
    }

    pub fn save_at<T: Serialize>(&mut self, key: &str, payload: &T, now: DateTime<Utc>) -> Result<()> {
        let entry = CacheEntry {
            payload: serde_json::to_value(payload)?,
            timestamp: now,
        };
        self.file.entries.insert(key.to_string(), entry);
        self.flush()
    }

    /// 読み込み
    ///
    /// 未保存・期限切れ（破棄する）・型が合わない場合は `None`。
    pub fn load<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.load_at(key, Utc::now())
    }

    pub fn load_at<T: DeserializeOwned>(&mut self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let entry = self.file.entries.get(key)?;

        if is_expired(entry.timestamp, now) {
            tracing::debug!(key, "キャッシュ期限切れ、削除します");
            self.file.entries.remove(key);
            if let Err(e) = self.flush() {
                tracing::warn!(error = %e, "キャッシュ書き込み失敗");
            }
            return None;
        }

        match serde_json::from_value(entry.payload.clone()) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(key, error = %e, "キャッシュの内容が不正なため無視します");
                None
            }
        }
    }

    /// 指定キーを削除
    pub fn clear(&mut self, key: &str) -> Result<bool> {
        let removed = self.file.entries.remove(key).is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    /// すべて削除
    pub fn clear_all(&mut self) -> Result<()> {
        self.file.entries.clear();
        self.flush()
    }

    // =============================================
    // ワードローブ
    // =============================================

    pub fn save_wardrobe(&mut self, wardrobe: &CachedWardrobe) -> Result<()> {
        self.save(WARDROBE_KEY, wardrobe)
    }

    pub fn load_wardrobe(&mut self) -> Option<CachedWardrobe> {
        self.load(WARDROBE_KEY)
    }

    pub fn clear_wardrobe(&mut self) -> Result<bool> {
        self.clear(WARDROBE_KEY)
    }

    // =============================================
    // 組み合わせ・履歴
    // =============================================

    /// 現在の組み合わせとして保存し、履歴にも追加
    pub fn save_combination(&mut self, combination: Combination, preferences: Preferences) -> Result<()> {
        self.save_combination_at(combination, preferences, Utc::now())
    }

    pub fn save_combination_at(
        &mut self,
        combination: Combination,
        preferences: Preferences,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let cached = CachedCombination {
            combination,
            preferences,
            timestamp: now,
        };
        self.save_at(COMBINATION_KEY, &cached, now)?;
        self.add_to_history(&cached, now)
    }

    pub fn load_combination(&mut self) -> Option<CachedCombination> {
        self.load(COMBINATION_KEY)
    }

    pub fn load_combination_at(&mut self, now: DateTime<Utc>) -> Option<CachedCombination> {
        self.load_at(COMBINATION_KEY, now)
    }

    pub fn clear_combination(&mut self) -> Result<bool> {
        self.clear(COMBINATION_KEY)
    }

    fn add_to_history(&mut self, cached: &CachedCombination, now: DateTime<Utc>) -> Result<()> {
        let mut history: BoundedHistory<Value> = self
            .load_at::<Vec<Value>>(HISTORY_KEY, now)
            .unwrap_or_default()
            .into_iter()
            .collect();

        history.push(serde_json::to_value(cached)?);
        tracing::debug!(total = history.len(), "履歴に追加");
        self.save_at(HISTORY_KEY, &history, now)
    }

    /// 過去の組み合わせ（新しい順、期限切れ・不正な要素は除く）
    pub fn history(&mut self) -> Result<Vec<CachedCombination>> {
        self.history_at(Utc::now())
    }

    pub fn history_at(&mut self, now: DateTime<Utc>) -> Result<Vec<CachedCombination>> {
        let Some(stored) = self.load_at::<Vec<Value>>(HISTORY_KEY, now) else {
            return Ok(Vec::new());
        };

        let valid: Vec<CachedCombination> = stored
            .iter()
            .filter_map(|value| serde_json::from_value::<CachedCombination>(value.clone()).ok())
            .filter(|c| !is_expired(c.timestamp, now))
            .take(HISTORY_CAPACITY)
            .collect();

        if valid.len() != stored.len() {
            let timestamp = self
                .file
                .entries
                .get(HISTORY_KEY)
                .map(|e| e.timestamp)
                .unwrap_or(now);
            let history: BoundedHistory<&CachedCombination> = valid.iter().collect();
            self.save_at(HISTORY_KEY, &history, timestamp)?;
        }

        Ok(valid)
    }

    /// 全キー削除（ワードローブ・組み合わせ・履歴）
    pub fn clear_all_caches(&mut self) -> Result<()> {
        for key in [WARDROBE_KEY, COMBINATION_KEY, HISTORY_KEY] {
            self.file.entries.remove(key);
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_expired_boundary() {
        let saved = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_expired(saved, saved + Duration::hours(24)));
        assert!(is_expired(saved, saved + Duration::hours(24) + Duration::milliseconds(1)));
    }

    #[test]
    fn test_in_memory_has_no_path() {
        let mut cache = WardrobeCache::in_memory();
        assert!(cache.path().is_none());
        cache.save("k", &1).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.clear("k").unwrap());
        assert!(!cache.clear("k").unwrap());
    }

    #[test]
    fn test_history_over_capacity_is_trimmed() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let garments = vec![
            stylegenie_common::Garment::new("a", stylegenie_common::TagSet::new("shirt", "white", &[]), ""),
            stylegenie_common::Garment::new("b", stylegenie_common::TagSet::new("jeans", "black", &[]), ""),
        ];
        let combination = stylegenie_common::find_best_combinations(&garments).remove(0);

        // ファイルを手で編集した等で容量を超えた履歴
        let entries: Vec<CachedCombination> = (0..12)
            .map(|_| CachedCombination {
                combination: combination.clone(),
                preferences: Preferences::default(),
                timestamp: now,
            })
            .collect();

        let mut cache = WardrobeCache::in_memory();
        cache.save_at(HISTORY_KEY, &entries, now).unwrap();

        assert_eq!(cache.history_at(now).unwrap().len(), HISTORY_CAPACITY);
        let stored: Vec<Value> = cache.load_at(HISTORY_KEY, now).unwrap();
        assert_eq!(stored.len(), HISTORY_CAPACITY);
    }
}
