//! Visionモデルのレスポンスパーサー
//!
//! モデルの出力からMarkdownのコードフェンスを取り除き、
//! タグ付け結果 `{type, color, styleTags}` をパースする

use crate::error::{Error, Result};
use crate::types::TagSet;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    /// ```json / ``` のフェンス（直後の改行も含む）
    static ref CODE_FENCE: Regex = Regex::new(r"```(?:json|JSON)?[ \t]*\r?\n?").unwrap();
}

/// モデル出力のままの形（必須項目の欠落を検出するためOption）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTagResponse {
    #[serde(rename = "type")]
    garment_type: Option<String>,
    color: Option<String>,
    #[serde(default)]
    style_tags: Vec<String>,
}

/// Markdownのコードフェンスを除去
///
/// # Examples
/// ```
/// use stylegenie_common::strip_code_fences;
///
/// let response = "```json\n{\"type\": \"shirt\"}\n```";
/// assert_eq!(strip_code_fences(response), "{\"type\": \"shirt\"}");
/// ```
pub fn strip_code_fences(response: &str) -> String {
    CODE_FENCE.replace_all(response, "").trim().to_string()
}

/// レスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. フェンス除去後の文字列がそのまま `{...}`
/// 2. 前後に説明文がある場合は最初の `{` から最後の `}` まで
/// 3. エラー
pub fn extract_json_object(response: &str) -> Result<String> {
    let cleaned = strip_code_fences(response);

    if cleaned.starts_with('{') && cleaned.ends_with('}') {
        return Ok(cleaned);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if end > start {
            return Ok(cleaned[start..=end].to_string());
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// タグ付けレスポンスをパース
///
/// `type` と `color` は必須（空文字も不可）。値は小文字に正規化する。
pub fn parse_tag_response(response: &str) -> Result<TagSet> {
    let json_str = extract_json_object(response)?;
    let raw: RawTagResponse = serde_json::from_str(&json_str)
        .map_err(|e| Error::Parse(format!("タグJSONパースエラー: {}", e)))?;

    let tags = TagSet {
        garment_type: raw
            .garment_type
            .ok_or_else(|| Error::Parse("typeがありません".into()))?,
        color: raw
            .color
            .ok_or_else(|| Error::Parse("colorがありません".into()))?,
        style_tags: raw.style_tags,
    }
    .normalized();

    if !tags.is_complete() {
        return Err(Error::Parse("typeまたはcolorが空です".into()));
    }

    Ok(tags)
}
