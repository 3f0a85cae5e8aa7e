use crate::scanner::{Wardrobe, WardrobeCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stylegenie_common::Combination;

/// キャッシュ済みの画像参照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedImage {
    pub preview: String,
    pub timestamp: DateTime<Utc>,
}

/// カテゴリ別にアップロードされた画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWardrobe {
    #[serde(default)]
    pub shirts: Vec<CachedImage>,
    #[serde(default)]
    pub pants: Vec<CachedImage>,
    #[serde(default)]
    pub shoes: Vec<CachedImage>,
    #[serde(default)]
    pub addons: Vec<CachedImage>,
    pub timestamp: DateTime<Utc>,
}

impl CachedWardrobe {
    pub fn from_wardrobe(wardrobe: &Wardrobe, now: DateTime<Utc>) -> Self {
        let images = |category: WardrobeCategory| -> Vec<CachedImage> {
            wardrobe
                .images(category)
                .iter()
                .map(|img| CachedImage {
                    preview: img.path.display().to_string(),
                    timestamp: now,
                })
                .collect()
        };

        Self {
            shirts: images(WardrobeCategory::Shirts),
            pants: images(WardrobeCategory::Pants),
            shoes: images(WardrobeCategory::Shoes),
            addons: images(WardrobeCategory::Addons),
            timestamp: now,
        }
    }

    pub fn images(&self, category: WardrobeCategory) -> &[CachedImage] {
        match category {
            WardrobeCategory::Shirts => &self.shirts,
            WardrobeCategory::Pants => &self.pants,
            WardrobeCategory::Shoes => &self.shoes,
            WardrobeCategory::Addons => &self.addons,
        }
    }

    pub fn total(&self) -> usize {
        WardrobeCategory::ALL.iter().map(|c| self.images(*c).len()).sum()
    }
}

/// 利用シーンの希望（任意）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
}

impl Preferences {
    /// "for a wedding in Japan" 形式の説明
    pub fn describe(&self) -> String {
        let event = self.event_type.as_deref().unwrap_or("any occasion");
        match self.country.as_deref() {
            Some(country) => format!("Perfect for {} in {}", event, country),
            None => format!("Perfect for {}", event),
        }
    }
}

/// 現在の組み合わせ（履歴にも同じ形で入る）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedCombination {
    pub combination: Combination,
    #[serde(default)]
    pub preferences: Preferences,
    pub timestamp: DateTime<Utc>,
}
