use serde::{Deserialize, Serialize};

/// ワードローブのカテゴリ（アップロード枠）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WardrobeCategory {
    Shirts,
    Pants,
    Shoes,
    Addons,
}

impl WardrobeCategory {
    pub const ALL: [WardrobeCategory; 4] = [
        WardrobeCategory::Shirts,
        WardrobeCategory::Pants,
        WardrobeCategory::Shoes,
        WardrobeCategory::Addons,
    ];

    /// フォルダ名からカテゴリを判定（単数形・別名も可）
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "shirts" | "shirt" | "tops" | "top" => Some(WardrobeCategory::Shirts),
            "pants" | "pant" | "bottoms" | "bottom" => Some(WardrobeCategory::Pants),
            "shoes" | "shoe" | "footwear" => Some(WardrobeCategory::Shoes),
            "addons" | "addon" | "add-ons" | "accessories" => Some(WardrobeCategory::Addons),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WardrobeCategory::Shirts => "shirts",
            WardrobeCategory::Pants => "pants",
            WardrobeCategory::Shoes => "shoes",
            WardrobeCategory::Addons => "addons",
        }
    }
}

impl std::fmt::Display for WardrobeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
