//! コーディネート関連の型定義
//!
//! CLIと解析エンジンで共有される型:
//! - TagSet: Vision APIのタグ付け結果（正規化済み）
//! - Garment: タグ付け済みの服1点
//! - Combination: 2〜3点の組み合わせとスコア
//! - OutfitSuggestion: テンプレートから生成したコーデ提案

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// タグ付け結果: 種類・色・スタイルタグ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSet {
    #[serde(rename = "type")]
    pub garment_type: String,
    pub color: String,
    #[serde(default)]
    pub style_tags: Vec<String>,
}

impl TagSet {
    pub fn new(garment_type: &str, color: &str, style_tags: &[&str]) -> Self {
        Self {
            garment_type: garment_type.to_string(),
            color: color.to_string(),
            style_tags: style_tags.iter().map(|t| t.to_string()).collect(),
        }
        .normalized()
    }

    /// 種類・色を小文字化し、スタイルタグの空要素と重複を除く
    pub fn normalized(self) -> Self {
        let mut style_tags: Vec<String> = Vec::with_capacity(self.style_tags.len());
        for tag in self.style_tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !style_tags.contains(&tag) {
                style_tags.push(tag);
            }
        }

        Self {
            garment_type: self.garment_type.trim().to_lowercase(),
            color: self.color.trim().to_lowercase(),
            style_tags,
        }
    }

    /// 種類と色が揃っているか
    pub fn is_complete(&self) -> bool {
        !self.garment_type.is_empty() && !self.color.is_empty()
    }
}

/// タグ付け済みの服
///
/// 同一性は `id` のみで判定する。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garment {
    pub id: String,

    #[serde(rename = "type")]
    pub garment_type: String,     // 種類（shirt, jeans...）

    pub color: String,            // 主色

    #[serde(default)]
    pub style_tags: Vec<String>,  // スタイルタグ

    #[serde(default)]
    pub image: String,            // 画像パスまたはData URL
}

impl Garment {
    pub fn new(id: impl Into<String>, tags: TagSet, image: impl Into<String>) -> Self {
        let tags = tags.normalized();
        Self {
            id: id.into(),
            garment_type: tags.garment_type,
            color: tags.color,
            style_tags: tags.style_tags,
            image: image.into(),
        }
    }

    /// "white shirt" 形式の表示名
    pub fn label(&self) -> String {
        format!("{} {}", self.color, self.garment_type)
    }
}

impl PartialEq for Garment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Garment {}

impl Hash for Garment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// 組み合わせ提案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub id: String,
    pub title: String,
    pub description: String,
    pub garments: Vec<Garment>,
    pub compatibility_score: u8,
    pub reasoning: String,
}

/// コーデ提案の1アイテム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitPiece {
    pub item: String,
    pub color: String,
}

/// テンプレートから生成したコーデ提案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSuggestion {
    pub title: String,
    pub description: String,
    pub pieces: Vec<OutfitPiece>,
    pub mockup_image: String,
}
