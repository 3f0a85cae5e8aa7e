//! 組み合わせ生成
//!
//! 服のリストから2点・3点の組み合わせを列挙してスコア付けし、
//! スコア降順の上位を返す。

use crate::scorer::{reasoning_for, Scorer};
use crate::tables::CompatibilityTables;
use crate::types::{Combination, Garment};

/// 返す組み合わせの最大数
pub const MAX_COMBINATIONS: usize = 6;

/// 組み合わせ生成器
#[derive(Debug, Clone, Copy)]
pub struct CombinationGenerator<'a> {
    scorer: Scorer<'a>,
    limit: usize,
}

impl<'a> CombinationGenerator<'a> {
    pub fn new(tables: &'a CompatibilityTables) -> Self {
        Self {
            scorer: Scorer::new(tables),
            limit: MAX_COMBINATIONS,
        }
    }

    /// 上位何件まで返すか（既定6）
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 2点・3点の組み合わせを生成
    ///
    /// 同点の場合は列挙順（2点をi<j順、続けて3点をi<j<k順）を保つ。
    pub fn generate(&self, garments: &[Garment]) -> Vec<Combination> {
        let n = garments.len();
        if n < 2 {
            return Vec::new();
        }

        let mut combinations = Vec::with_capacity(pair_count(n) + triple_count(n));

        for i in 0..n {
            for j in (i + 1)..n {
                let score = self.scorer.score(&garments[i], &garments[j]);
                combinations.push(build_pair(&garments[i], &garments[j], score));
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let (a, b, c) = (&garments[i], &garments[j], &garments[k]);
                    let total = u32::from(self.scorer.score(a, b))
                        + u32::from(self.scorer.score(b, c))
                        + u32::from(self.scorer.score(a, c));
                    let score = (f64::from(total) / 3.0).round() as u8;
                    combinations.push(build_triple(a, b, c, score));
                }
            }
        }

        // sort_byは安定ソート
        combinations.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));
        combinations.truncate(self.limit);

        tracing::debug!(
            garments = n,
            returned = combinations.len(),
            "組み合わせを生成"
        );

        combinations
    }
}

/// 組み込みテーブルで組み合わせを生成
pub fn find_best_combinations(garments: &[Garment]) -> Vec<Combination> {
    let tables = CompatibilityTables::default();
    CombinationGenerator::new(&tables).generate(garments)
}

fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn triple_count(n: usize) -> usize {
    n * n.saturating_sub(1) * n.saturating_sub(2) / 6
}

fn join_ids(garments: &[&Garment]) -> String {
    garments
        .iter()
        .map(|g| g.id.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

fn build_pair(a: &Garment, b: &Garment, score: u8) -> Combination {
    Combination {
        id: join_ids(&[a, b]),
        title: format!("{} + {}", a.garment_type, b.garment_type),
        description: format!(
            "{} {} paired with {} {}",
            a.color, a.garment_type, b.color, b.garment_type
        ),
        garments: vec![a.clone(), b.clone()],
        compatibility_score: score,
        reasoning: reasoning_for(score).to_string(),
    }
}

fn build_triple(a: &Garment, b: &Garment, c: &Garment, score: u8) -> Combination {
    Combination {
        id: join_ids(&[a, b, c]),
        title: format!("{} + {} + {}", a.garment_type, b.garment_type, c.garment_type),
        description: format!(
            "Complete outfit with {} {}, {} {}, and {} {}",
            a.color, a.garment_type, b.color, b.garment_type, c.color, c.garment_type
        ),
        garments: vec![a.clone(), b.clone(), c.clone()],
        compatibility_score: score,
        reasoning: reasoning_for(score).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagSet;

    fn garment(id: &str, t: &str, color: &str) -> Garment {
        Garment::new(id, TagSet::new(t, color, &[]), format!("{}.jpg", id))
    }

    fn sample_outfit() -> Vec<Garment> {
        vec![
            garment("s1", "shirt", "white"),
            garment("p1", "jeans", "black"),
            garment("f1", "shoes", "brown"),
        ]
    }

    #[test]
    fn test_generate_empty_and_single() {
        assert!(find_best_combinations(&[]).is_empty());
        assert!(find_best_combinations(&[garment("a", "shirt", "white")]).is_empty());
    }

    #[test]
    fn test_generate_pair() {
        let result = find_best_combinations(&[
            garment("a", "shirt", "white"),
            garment("b", "jeans", "black"),
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "a-b");
        assert_eq!(result[0].title, "shirt + jeans");
        assert_eq!(result[0].description, "white shirt paired with black jeans");
        assert_eq!(result[0].compatibility_score, 100);
        assert!(result[0].reasoning.starts_with("Excellent match!"));
    }

    #[test]
    fn test_generate_three_garments_ranking() {
        let result = find_best_combinations(&sample_outfit());

        // C(3,2) + C(3,3) = 4
        assert_eq!(result.len(), 4);

        let ids: Vec<&str> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s1-p1", "s1-p1-f1", "s1-f1", "p1-f1"]);

        let scores: Vec<u8> = result.iter().map(|c| c.compatibility_score).collect();
        // (100 + 48 + 54) / 3 = 67.33 → 67
        assert_eq!(scores, vec![100, 67, 54, 48]);
    }

    #[test]
    fn test_generate_triple_description() {
        let result = find_best_combinations(&sample_outfit());
        let triple = result.iter().find(|c| c.garments.len() == 3).unwrap();

        assert_eq!(triple.title, "shirt + jeans + shoes");
        assert_eq!(
            triple.description,
            "Complete outfit with white shirt, black jeans, and brown shoes"
        );
        assert!(triple.reasoning.starts_with("Good pairing!"));
    }

    #[test]
    fn test_generate_truncates_to_six() {
        let garments: Vec<Garment> = ["shirt", "jeans", "blazer", "shoes", "belt"]
            .iter()
            .enumerate()
            .map(|(i, t)| garment(&format!("g{}", i), t, "navy"))
            .collect();

        let result = find_best_combinations(&garments);
        assert_eq!(result.len(), MAX_COMBINATIONS);
        assert!(result
            .windows(2)
            .all(|w| w[0].compatibility_score >= w[1].compatibility_score));
    }

    #[test]
    fn test_generate_length_formula() {
        for n in 0..6 {
            let garments: Vec<Garment> = (0..n)
                .map(|i| garment(&format!("g{}", i), &format!("type{}", i), "gray"))
                .collect();

            let expected = (pair_count(n) + triple_count(n)).min(MAX_COMBINATIONS);
            assert_eq!(find_best_combinations(&garments).len(), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_generate_ties_keep_enumeration_order() {
        // 未登録の種類・色のみ → 全ペア48、全トリプル48
        let garments: Vec<Garment> = (0..4)
            .map(|i| garment(&format!("g{}", i), &format!("type{}", i), "teal"))
            .collect();

        let result = find_best_combinations(&garments);
        let ids: Vec<&str> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["g0-g1", "g0-g2", "g0-g3", "g1-g2", "g1-g3", "g2-g3"]
        );
    }

    #[test]
    fn test_generate_no_self_pairs() {
        let result = find_best_combinations(&sample_outfit());
        for combination in &result {
            let mut ids: Vec<&str> = combination.garments.iter().map(|g| g.id.as_str()).collect();
            let len = ids.len();
            ids.dedup();
            assert_eq!(ids.len(), len);
        }
    }

    #[test]
    fn test_generate_with_limit() {
        let tables = CompatibilityTables::default();
        let result = CombinationGenerator::new(&tables)
            .with_limit(2)
            .generate(&sample_outfit());

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "s1-p1");
    }

    #[test]
    fn test_counts() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(4), 6);
        assert_eq!(triple_count(2), 0);
        assert_eq!(triple_count(5), 10);
    }
}
