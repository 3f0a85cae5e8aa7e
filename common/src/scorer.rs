//! 相性スコア計算
//!
//! 2点の服の (種類, 色) から0-100の整数スコアを算出する。
//! 種類の相性を6割、色の相性を4割で重み付けする。

use crate::tables::CompatibilityTables;
use crate::types::Garment;

/// 色の組み合わせが未登録のときのスコア
pub const DEFAULT_COLOR_SCORE: u8 = 60;
/// 種類の組み合わせが未登録のときのスコア
pub const DEFAULT_TYPE_SCORE: u8 = 40;
/// 相性リストに載っている種類のスコア
pub const COMPATIBLE_TYPE_SCORE: u8 = 100;
/// 同じ種類同士のスコア
pub const SAME_TYPE_SCORE: u8 = 0;

/// スコア帯による評価
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Interesting,
    Good,
    Great,
    Excellent,
}

impl MatchTier {
    /// 85 / 70 / 55 を境界に4段階へ分類
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => MatchTier::Excellent,
            70..=84 => MatchTier::Great,
            55..=69 => MatchTier::Good,
            _ => MatchTier::Interesting,
        }
    }

    pub fn reasoning(&self) -> &'static str {
        match self {
            MatchTier::Excellent => {
                "Excellent match! These pieces complement each other perfectly in both style and color."
            }
            MatchTier::Great => {
                "Great combination! These items work well together and create a cohesive look."
            }
            MatchTier::Good => {
                "Good pairing! This combination is versatile and can work for various occasions."
            }
            MatchTier::Interesting => {
                "Interesting mix! This combination offers a unique style statement."
            }
        }
    }
}

/// スコアから説明文を生成
pub fn reasoning_for(score: u8) -> &'static str {
    MatchTier::from_score(score).reasoning()
}

/// 相性スコア計算器
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    tables: &'a CompatibilityTables,
}

impl<'a> Scorer<'a> {
    pub fn new(tables: &'a CompatibilityTables) -> Self {
        Self { tables }
    }

    /// 色相性スコア（両方向を引き、なければ60）
    pub fn color_score(&self, color_a: &str, color_b: &str) -> u8 {
        let a = color_a.trim().to_lowercase();
        let b = color_b.trim().to_lowercase();

        self.tables
            .color_entry(&a, &b)
            .or_else(|| self.tables.color_entry(&b, &a))
            .unwrap_or(DEFAULT_COLOR_SCORE)
    }

    /// 種類相性スコア（同種0、相性リストにあれば100、なければ40）
    pub fn type_score(&self, type_a: &str, type_b: &str) -> u8 {
        let a = type_a.trim().to_lowercase();
        let b = type_b.trim().to_lowercase();

        if a == b {
            return SAME_TYPE_SCORE;
        }

        if self.tables.type_lists(&a, &b) || self.tables.type_lists(&b, &a) {
            COMPATIBLE_TYPE_SCORE
        } else {
            DEFAULT_TYPE_SCORE
        }
    }

    /// 総合スコア = round(種類 * 0.6 + 色 * 0.4)
    pub fn score(&self, a: &Garment, b: &Garment) -> u8 {
        let type_score = u32::from(self.type_score(&a.garment_type, &b.garment_type));
        let color_score = u32::from(self.color_score(&a.color, &b.color));

        // 6t + 4c は常に偶数なので四捨五入の境界(…5)に乗らない
        let weighted = (6 * type_score + 4 * color_score + 5) / 10;
        weighted.min(u32::from(crate::tables::MAX_SCORE)) as u8
    }
}
