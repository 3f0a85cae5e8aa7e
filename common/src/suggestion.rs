//! テンプレートベースのコーデ提案
//!
//! 1点の服の (種類, 色) からスタイルテンプレートとカラーハーモニーを引き、
//! 各アイテムの色を確定させた提案を返す。

use crate::tables::{ColorRole, StyleGuide, StyleTemplate};
use crate::types::{OutfitPiece, OutfitSuggestion};

/// ハーモニー未登録の色に使う補色セット
pub const DEFAULT_COMPLEMENTS: [&str; 3] = ["white", "black", "gray"];
/// 入力不足のときに全アイテムへ使う色
pub const PLACEHOLDER_COLOR: &str = "gray";

const FALLBACK_COMPLEMENT1: &str = "black";
const FALLBACK_COMPLEMENT2: &str = "white";
const FALLBACK_NEUTRAL: &str = "gray";

const MOCKUP_BASE: &str = "/placeholder.svg?height=400&width=600&query=";

/// 役割 → 具体的な色
#[derive(Debug, Clone)]
struct ColorMap<'a> {
    base: &'a str,
    complement1: &'a str,
    complement2: &'a str,
    neutral: &'a str,
}

impl<'a> ColorMap<'a> {
    fn new(base: &'a str, complements: &'a [String]) -> Self {
        let pick = |index: usize, fallback: &'a str| -> &'a str {
            complements.get(index).map(String::as_str).unwrap_or(fallback)
        };

        Self {
            base,
            complement1: pick(0, FALLBACK_COMPLEMENT1),
            complement2: pick(1, FALLBACK_COMPLEMENT2),
            neutral: pick(2, FALLBACK_NEUTRAL),
        }
    }

    fn resolve(&self, role: ColorRole) -> &'a str {
        match role {
            ColorRole::Base => self.base,
            ColorRole::Complement1 => self.complement1,
            ColorRole::Complement2 => self.complement2,
            ColorRole::Neutral => self.neutral,
        }
    }
}

/// コーデ提案生成器
#[derive(Debug, Clone, Copy)]
pub struct SuggestionGenerator<'a> {
    guide: &'a StyleGuide,
}

impl<'a> SuggestionGenerator<'a> {
    pub fn new(guide: &'a StyleGuide) -> Self {
        Self { guide }
    }

    /// 種類と色から提案を生成（空になることはない）
    pub fn suggest(&self, garment_type: &str, garment_color: &str) -> Vec<OutfitSuggestion> {
        let garment_type = garment_type.trim();
        let garment_color = garment_color.trim();

        if garment_type.is_empty() || garment_color.is_empty() {
            tracing::warn!("種類または色が未指定のため既定テンプレートを使用");
            return self.placeholder_suggestions();
        }

        let type_key = garment_type.to_lowercase();
        let color_key = garment_color.to_lowercase();

        let default_complements: Vec<String> =
            DEFAULT_COMPLEMENTS.iter().map(|c| c.to_string()).collect();
        let complements = self
            .guide
            .harmony_for(&color_key)
            .unwrap_or(default_complements.as_slice());

        let templates = self.guide.templates_for(&type_key).unwrap_or_else(|| {
            tracing::debug!(garment_type = %type_key, "テンプレート未登録、既定テンプレートを使用");
            self.guide.default_templates.as_slice()
        });

        let colors = ColorMap::new(garment_color, complements);

        templates
            .iter()
            .map(|template| OutfitSuggestion {
                title: template.title.clone(),
                description: template.description.clone(),
                pieces: resolve_pieces(template, |role| colors.resolve(role)),
                mockup_image: mockup_url(&format!(
                    "{} {} {} outfit combination",
                    garment_color, garment_type, template.title
                )),
            })
            .collect()
    }

    /// 入力不足時: 既定テンプレート、全アイテムをプレースホルダ色に
    fn placeholder_suggestions(&self) -> Vec<OutfitSuggestion> {
        self.guide
            .default_templates
            .iter()
            .map(|template| OutfitSuggestion {
                title: template.title.clone(),
                description: template.description.clone(),
                pieces: resolve_pieces(template, |_| PLACEHOLDER_COLOR),
                mockup_image: mockup_url(&format!("{} outfit mockup", template.title)),
            })
            .collect()
    }
}

/// 組み込みテーブルで提案を生成
pub fn generate_outfit_suggestions(garment_type: &str, garment_color: &str) -> Vec<OutfitSuggestion> {
    let guide = StyleGuide::default();
    SuggestionGenerator::new(&guide).suggest(garment_type, garment_color)
}

fn resolve_pieces<'c>(
    template: &StyleTemplate,
    color_of: impl Fn(ColorRole) -> &'c str,
) -> Vec<OutfitPiece> {
    template
        .pieces
        .iter()
        .map(|piece| OutfitPiece {
            item: piece.item.clone(),
            color: color_of(piece.role).to_string(),
        })
        .collect()
}

/// モックアップ画像の参照（クエリ部分をURLエンコード）
pub fn mockup_url(query: &str) -> String {
    format!("{}{}", MOCKUP_BASE, urlencoding::encode(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TemplatePiece;
    use std::collections::HashMap;

    fn colors_of(suggestion: &OutfitSuggestion) -> Vec<&str> {
        suggestion.pieces.iter().map(|p| p.color.as_str()).collect()
    }

    #[test]
    fn test_suggest_empty_input_returns_defaults() {
        for (t, c) in [("", ""), ("shirt", ""), ("", "white"), ("  ", "navy")] {
            let result = generate_outfit_suggestions(t, c);
            assert_eq!(result.len(), 2);
            assert_eq!(result[0].title, "Classic Combination");
            assert_eq!(result[1].title, "Modern Mix");
            assert!(result
                .iter()
                .flat_map(|s| s.pieces.iter())
                .all(|p| p.color == PLACEHOLDER_COLOR));
        }
    }

    #[test]
    fn test_suggest_empty_input_mockup() {
        let result = generate_outfit_suggestions("", "");
        assert_eq!(
            result[0].mockup_image,
            "/placeholder.svg?height=400&width=600&query=Classic%20Combination%20outfit%20mockup"
        );
    }

    #[test]
    fn test_suggest_white_shirt() {
        let result = generate_outfit_suggestions("shirt", "white");

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Smart Casual");
        assert_eq!(result[0].description, "Perfect for office or dinner dates");
        // complement1, complement2, complement1
        assert_eq!(colors_of(&result[0]), vec!["black", "navy", "black"]);

        assert_eq!(result[1].title, "Weekend Casual");
        // complement2, neutral, complement1
        assert_eq!(colors_of(&result[1]), vec!["navy", "gray", "black"]);
    }

    #[test]
    fn test_suggest_normalizes_case_and_keeps_base_color() {
        let result = generate_outfit_suggestions("Blouse", "Red");

        assert_eq!(result[1].title, "Brunch Ready");
        // 役割baseは入力された色そのまま
        assert_eq!(colors_of(&result[1]), vec!["white", "Red", "black"]);
    }

    #[test]
    fn test_suggest_unknown_type_uses_default_templates() {
        let result = generate_outfit_suggestions("kimono", "navy");

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Classic Combination");
        // navy: white, beige, khaki
        assert_eq!(colors_of(&result[0]), vec!["white", "beige", "khaki"]);
    }

    #[test]
    fn test_suggest_unknown_color_uses_default_complements() {
        let result = generate_outfit_suggestions("jacket", "teal");

        assert_eq!(result[0].title, "Layered Look");
        // neutral, complement1, complement2
        assert_eq!(colors_of(&result[0]), vec!["gray", "white", "black"]);
    }

    #[test]
    fn test_suggest_short_harmony_list_falls_back() {
        let mut guide = StyleGuide::default();
        guide.harmony.insert("teal".to_string(), vec!["coral".to_string()]);

        let result = SuggestionGenerator::new(&guide).suggest("jacket", "teal");
        // neutral → gray, complement1 → coral, complement2 → white
        assert_eq!(colors_of(&result[0]), vec!["gray", "coral", "white"]);
    }

    #[test]
    fn test_suggest_mockup_url() {
        let result = generate_outfit_suggestions("shirt", "white");
        assert_eq!(
            result[0].mockup_image,
            "/placeholder.svg?height=400&width=600&query=white%20shirt%20Smart%20Casual%20outfit%20combination"
        );
    }

    #[test]
    fn test_suggest_with_injected_guide() {
        let template = StyleTemplate {
            title: "Festival".to_string(),
            description: "Summer night".to_string(),
            pieces: vec![
                TemplatePiece { item: "Obi".to_string(), role: ColorRole::Base },
                TemplatePiece { item: "Geta".to_string(), role: ColorRole::Neutral },
            ],
        };
        let guide = StyleGuide {
            harmony: HashMap::new(),
            templates: HashMap::from([("kimono".to_string(), vec![template])]),
            default_templates: StyleGuide::default().default_templates,
        };

        let result = SuggestionGenerator::new(&guide).suggest("Kimono", "indigo");
        assert_eq!(result.len(), 1);
        assert_eq!(colors_of(&result[0]), vec!["indigo", "gray"]);
    }
}
