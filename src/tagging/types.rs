use crate::error::{StyleError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use stylegenie_common::TagSet;

/// タグ付けできなかったときの固定タグ
pub fn fallback_tags() -> TagSet {
    TagSet::new("shirt", "white", &["casual", "cotton", "button-down"])
}

/// タグ付け結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagResult {
    /// モデルの出力をそのまま採用
    Detected(TagSet),
    /// 失敗したため固定タグで代替（理由付き）
    Fallback { tags: TagSet, reason: String },
}

impl TagResult {
    pub fn fallback(reason: impl Into<String>) -> Self {
        TagResult::Fallback {
            tags: fallback_tags(),
            reason: reason.into(),
        }
    }

    pub fn tags(&self) -> &TagSet {
        match self {
            TagResult::Detected(tags) => tags,
            TagResult::Fallback { tags, .. } => tags,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TagResult::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            TagResult::Detected(_) => None,
            TagResult::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn into_tags(self) -> TagSet {
        match self {
            TagResult::Detected(tags) => tags,
            TagResult::Fallback { tags, .. } => tags,
        }
    }

    /// 境界のJSON形式へ変換
    pub fn to_response(&self) -> DetectionResponse {
        DetectionResponse {
            tags: self.tags().clone(),
            fallback: self.is_fallback(),
            error: self.reason().map(str::to_string),
        }
    }
}

/// タグ付け境界のJSON: `{type, color, styleTags, _fallback, _error?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(flatten)]
    pub tags: TagSet,
    #[serde(rename = "_fallback", default)]
    pub fallback: bool,
    #[serde(rename = "_error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Visionモデルへ渡す画像（Base64インライン）
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
    digest: String,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: BASE64.encode(bytes),
            digest: hex::encode(Sha256::digest(bytes)),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| StyleError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_bytes(&bytes, mime_type_for(path)))
    }

    /// "data:image/jpeg;base64,..." 形式から作成
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let data = extract_base64_from_data_url(data_url)
            .ok_or_else(|| StyleError::ImageLoad("Data URLではありません".into()))?;
        let bytes = BASE64
            .decode(data)
            .map_err(|e| StyleError::ImageLoad(format!("Base64デコードエラー: {}", e)))?;
        Ok(Self::from_bytes(&bytes, extract_mime_type_from_data_url(data_url)))
    }

    /// 画像内容のハッシュ（SHA-256の先頭12桁）
    pub fn content_id(&self) -> String {
        self.digest[..ID_LEN].to_string()
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

const ID_LEN: usize = 12;

/// アップロード1件ごとの服ID
///
/// 同じ写真を別の枠に入れても別の服として扱うため、
/// 内容ハッシュに読み込み順とパスを混ぜる。
pub fn upload_id(content_id: &str, slot: usize, source: &str) -> String {
    let digest = hex::encode(Sha256::digest(format!("{}:{}:{}", slot, source, content_id)));
    digest[..ID_LEN].to_string()
}

/// 拡張子からMIMEタイプを推定
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    if !data_url.starts_with("data:") {
        return None;
    }
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出（取れなければimage/jpeg）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}
