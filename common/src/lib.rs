//! StyleGenie Common Library
//!
//! 服の相性スコア計算・組み合わせ生成・コーデ提案のエンジンと共有型

pub mod types;
pub mod tables;
pub mod error;
pub mod parser;
pub mod scorer;
pub mod combination;
pub mod suggestion;

pub use types::{Combination, Garment, OutfitPiece, OutfitSuggestion, TagSet};
pub use tables::{ColorRole, CompatibilityTables, StyleGuide, StyleTemplate, TableConfig, TemplatePiece};
pub use error::{Error, Result};
pub use parser::{extract_json_object, parse_tag_response, strip_code_fences};
pub use scorer::{reasoning_for, MatchTier, Scorer};
pub use combination::{find_best_combinations, CombinationGenerator, MAX_COMBINATIONS};
pub use suggestion::{generate_outfit_suggestions, SuggestionGenerator};
