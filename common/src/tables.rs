//! 相性テーブル・スタイルテンプレート
//!
//! スコア計算と提案生成が参照する読み取り専用の設定データ。
//! 組み込みの既定値（`Default`）か、JSONファイルから一度だけ構築して
//! 各エンジンへ渡す。キーはすべて小文字。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 色相性スコアの上限
pub const MAX_SCORE: u8 = 100;

/// 組み込みの色相性表（非対称。逆方向も引くこと）
const BUILTIN_COLORS: &[(&str, &[(&str, u8)])] = &[
    ("white", &[("black", 100), ("navy", 95), ("gray", 90), ("blue", 85), ("red", 80), ("beige", 85), ("brown", 75)]),
    ("black", &[("white", 100), ("gray", 90), ("red", 85), ("gold", 80), ("silver", 85), ("beige", 70)]),
    ("blue", &[("white", 95), ("beige", 85), ("brown", 80), ("gray", 85), ("navy", 70), ("khaki", 75)]),
    ("navy", &[("white", 95), ("beige", 90), ("khaki", 85), ("burgundy", 80), ("gray", 85), ("brown", 75)]),
    ("red", &[("black", 90), ("white", 85), ("navy", 80), ("gray", 75), ("beige", 70)]),
    ("green", &[("beige", 85), ("brown", 90), ("white", 80), ("navy", 75), ("khaki", 85)]),
    ("yellow", &[("navy", 85), ("gray", 80), ("white", 85), ("blue", 75), ("black", 70)]),
    ("pink", &[("gray", 85), ("white", 90), ("navy", 80), ("beige", 85), ("black", 75)]),
    ("gray", &[("white", 90), ("black", 90), ("navy", 85), ("burgundy", 80), ("blue", 85), ("pink", 80)]),
    ("brown", &[("beige", 95), ("white", 85), ("cream", 90), ("olive", 85), ("navy", 75)]),
    ("beige", &[("white", 90), ("brown", 95), ("navy", 85), ("olive", 80), ("gray", 85)]),
];

const TOPS: &[&str] = &["pants", "trousers", "jeans", "skirt", "shorts", "jacket", "blazer"];
const BOTTOMS: &[&str] = &["shirt", "blouse", "sweater", "jacket", "blazer", "tshirt", "top"];

/// 組み込みの種類相性表
const BUILTIN_TYPES: &[(&str, &[&str])] = &[
    ("shirt", TOPS),
    ("blouse", TOPS),
    ("dress", &["jacket", "blazer", "cardigan", "coat"]),
    ("pants", BOTTOMS),
    ("trousers", BOTTOMS),
    ("jeans", &["shirt", "blouse", "sweater", "jacket", "tshirt", "top", "hoodie"]),
    ("skirt", BOTTOMS),
    ("jacket", &["shirt", "blouse", "pants", "jeans", "dress", "skirt", "tshirt"]),
    ("blazer", &["shirt", "blouse", "pants", "trousers", "jeans", "skirt", "dress"]),
    ("sweater", &["pants", "jeans", "skirt", "trousers"]),
    ("tshirt", &["jeans", "pants", "shorts", "skirt", "jacket"]),
    ("top", &["jeans", "pants", "shorts", "skirt", "jacket", "blazer"]),
];

/// 組み込みのカラーハーモニー（補色・中間色の優先順）
const BUILTIN_HARMONY: &[(&str, &[&str])] = &[
    ("white", &["black", "navy", "gray", "beige"]),
    ("black", &["white", "gray", "red", "gold"]),
    ("blue", &["white", "beige", "brown", "gray"]),
    ("navy", &["white", "beige", "khaki", "burgundy"]),
    ("red", &["black", "white", "navy", "gray"]),
    ("green", &["beige", "brown", "white", "navy"]),
    ("yellow", &["navy", "gray", "white", "denim"]),
    ("pink", &["gray", "white", "navy", "beige"]),
    ("gray", &["white", "black", "navy", "burgundy"]),
    ("brown", &["beige", "white", "cream", "olive"]),
    ("beige", &["white", "brown", "navy", "olive"]),
];

type TemplateDef = (&'static str, &'static str, &'static [(&'static str, ColorRole)]);

use self::ColorRole::{Base, Complement1, Complement2, Neutral};

/// 組み込みのスタイルテンプレート（種類ごとに2件）
const BUILTIN_TEMPLATES: &[(&str, &[TemplateDef])] = &[
    ("shirt", &[
        ("Smart Casual", "Perfect for office or dinner dates",
            &[("Dark trousers", Complement1), ("Leather belt", Complement2), ("Dress shoes", Complement1)]),
        ("Weekend Casual", "Relaxed and comfortable for everyday wear",
            &[("Denim jeans", Complement2), ("Canvas sneakers", Neutral), ("Casual watch", Complement1)]),
    ]),
    ("blouse", &[
        ("Professional Chic", "Polished look for the workplace",
            &[("Pencil skirt", Complement1), ("Blazer", Complement2), ("Heeled pumps", Complement1)]),
        ("Brunch Ready", "Effortlessly stylish for daytime outings",
            &[("High-waisted jeans", Complement2), ("Statement earrings", Base), ("Ankle boots", Complement1)]),
    ]),
    ("dress", &[
        ("Evening Elegance", "Sophisticated for special occasions",
            &[("Strappy heels", Complement1), ("Clutch bag", Complement2), ("Statement necklace", Neutral)]),
        ("Daytime Charm", "Fresh and feminine for casual events",
            &[("Denim jacket", Complement2), ("Crossbody bag", Complement1), ("White sneakers", Neutral)]),
    ]),
    ("pants", &[
        ("Business Professional", "Sharp and confident for meetings",
            &[("Crisp button-down", Neutral), ("Blazer", Complement1), ("Oxford shoes", Complement2)]),
        ("Smart Casual", "Versatile for work or play",
            &[("Fitted sweater", Complement2), ("Loafers", Complement1), ("Leather bag", Complement2)]),
    ]),
    ("jacket", &[
        ("Layered Look", "Stylish warmth for cooler days",
            &[("Basic tee", Neutral), ("Slim jeans", Complement1), ("Boots", Complement2)]),
        ("Street Style", "Urban edge with comfort",
            &[("Hoodie", Complement2), ("Joggers", Complement1), ("High-top sneakers", Neutral)]),
    ]),
];

/// 種類が未登録のときのテンプレート
const BUILTIN_DEFAULT_TEMPLATES: &[TemplateDef] = &[
    ("Classic Combination", "Timeless pairing that always works",
        &[("Neutral bottoms", Complement1), ("Complementary shoes", Complement2), ("Simple accessories", Neutral)]),
    ("Modern Mix", "Contemporary style with personality",
        &[("Statement piece", Complement2), ("Coordinating item", Complement1), ("Finishing touch", Neutral)]),
];

/// 色相性・種類相性テーブル
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityTables {
    /// 色 → (相手の色 → スコア0-100)
    pub colors: HashMap<String, HashMap<String, u8>>,
    /// 種類 → 合わせられる種類
    pub types: HashMap<String, Vec<String>>,
}

impl Default for CompatibilityTables {
    fn default() -> Self {
        let colors = BUILTIN_COLORS
            .iter()
            .map(|(color, row)| {
                let row = row.iter().map(|(other, score)| (other.to_string(), *score)).collect();
                (color.to_string(), row)
            })
            .collect();

        let types = BUILTIN_TYPES
            .iter()
            .map(|(t, partners)| (t.to_string(), partners.iter().map(|p| p.to_string()).collect()))
            .collect();

        Self { colors, types }
    }
}

impl CompatibilityTables {
    /// 空のテーブル（テスト用の差し替えなどに使う）
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
            types: HashMap::new(),
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Self = serde_json::from_str(json)?;
        tables.normalized()
    }

    /// 片方向の色相性スコア（小文字キー前提）
    pub fn color_entry(&self, from: &str, to: &str) -> Option<u8> {
        self.colors.get(from).and_then(|row| row.get(to)).copied()
    }

    /// `from` の相性リストに `to` が含まれるか（小文字キー前提）
    pub fn type_lists(&self, from: &str, to: &str) -> bool {
        self.types
            .get(from)
            .map(|partners| partners.iter().any(|p| p == to))
            .unwrap_or(false)
    }

    /// キーを小文字化し、100を超えるスコアを拒否する
    pub fn normalized(self) -> Result<Self> {
        let mut colors = HashMap::with_capacity(self.colors.len());
        for (color, row) in self.colors {
            let color = color.trim().to_lowercase();
            let mut normalized_row: HashMap<String, u8> = HashMap::with_capacity(row.len());
            for (other, score) in row {
                if score > MAX_SCORE {
                    return Err(Error::InvalidTable(format!(
                        "color score {} -> {} = {} (max {})",
                        color, other, score, MAX_SCORE
                    )));
                }
                normalized_row.insert(other.trim().to_lowercase(), score);
            }
            colors.entry(color).or_insert_with(HashMap::new).extend(normalized_row);
        }

        let mut types: HashMap<String, Vec<String>> = HashMap::with_capacity(self.types.len());
        for (t, partners) in self.types {
            types
                .entry(t.trim().to_lowercase())
                .or_default()
                .extend(partners.into_iter().map(|p| p.trim().to_lowercase()));
        }

        Ok(Self { colors, types })
    }
}

/// テンプレート内アイテムの色の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorRole {
    /// 元の服の色
    Base,
    /// ハーモニーの1番目
    Complement1,
    /// ハーモニーの2番目
    Complement2,
    /// ハーモニーの3番目
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePiece {
    pub item: String,
    pub role: ColorRole,
}

/// コーデの骨組み（タイトル＋役割付きアイテム）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTemplate {
    pub title: String,
    pub description: String,
    pub pieces: Vec<TemplatePiece>,
}

impl StyleTemplate {
    fn from_def((title, description, pieces): &TemplateDef) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            pieces: pieces
                .iter()
                .map(|(item, role)| TemplatePiece { item: item.to_string(), role: *role })
                .collect(),
        }
    }
}

/// カラーハーモニーとスタイルテンプレート
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGuide {
    /// 色 → 合わせる色（優先順）
    pub harmony: HashMap<String, Vec<String>>,
    /// 種類 → テンプレート
    pub templates: HashMap<String, Vec<StyleTemplate>>,
    /// 種類が未登録・入力不足のときのテンプレート
    pub default_templates: Vec<StyleTemplate>,
}

impl Default for StyleGuide {
    fn default() -> Self {
        let harmony = BUILTIN_HARMONY
            .iter()
            .map(|(color, list)| (color.to_string(), list.iter().map(|c| c.to_string()).collect()))
            .collect();

        let templates = BUILTIN_TEMPLATES
            .iter()
            .map(|(t, defs)| (t.to_string(), defs.iter().map(StyleTemplate::from_def).collect()))
            .collect();

        let default_templates = BUILTIN_DEFAULT_TEMPLATES
            .iter()
            .map(StyleTemplate::from_def)
            .collect();

        Self {
            harmony,
            templates,
            default_templates,
        }
    }
}

impl StyleGuide {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let guide: Self = serde_json::from_str(json)?;
        guide.normalized()
    }

    pub fn harmony_for(&self, color: &str) -> Option<&[String]> {
        self.harmony.get(color).map(Vec::as_slice)
    }

    pub fn templates_for(&self, garment_type: &str) -> Option<&[StyleTemplate]> {
        self.templates.get(garment_type).map(Vec::as_slice)
    }

    /// キーを小文字化し、空のテンプレートセットを拒否する
    pub fn normalized(self) -> Result<Self> {
        if self.default_templates.is_empty() {
            return Err(Error::InvalidTable("default_templates is empty".into()));
        }

        let harmony = self
            .harmony
            .into_iter()
            .map(|(color, list)| {
                let list = list.into_iter().map(|c| c.trim().to_lowercase()).collect();
                (color.trim().to_lowercase(), list)
            })
            .collect();

        let mut templates = HashMap::with_capacity(self.templates.len());
        for (t, set) in self.templates {
            if set.is_empty() {
                return Err(Error::InvalidTable(format!("templates for '{}' is empty", t)));
            }
            templates.insert(t.trim().to_lowercase(), set);
        }

        Ok(Self {
            harmony,
            templates,
            default_templates: self.default_templates,
        })
    }
}

/// テーブル設定ファイル（両セクションとも省略時は組み込み値）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub compatibility: CompatibilityTables,
    pub style: StyleGuide,
}

impl TableConfig {
    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(Self {
            compatibility: config.compatibility.normalized()?,
            style: config.style.normalized()?,
        })
    }
}
