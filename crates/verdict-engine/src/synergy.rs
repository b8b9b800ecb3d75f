use serde::{Deserialize, Serialize};
use verdict_core::CanonicalFeatureRow;

/// Deterministic auxiliary scores over the two aligned rows.
///
/// These replace the unseeded-random ESG/PMI numbers some prototypes shipped.
/// Auxiliary output only — nothing here feeds the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyScore {
    /// Revenue-scale closeness of the two companies, in [0, 1]
    pub scale_similarity: f64,
    /// Closeness of the two EBITDA margins, in [0, 1]
    pub margin_alignment: f64,
    /// Mean of the two components
    pub overall: f64,
}

/// Score the pair. Missing inputs (zero revenue) score 0.0 for the affected
/// component rather than inventing a value.
pub fn score(company_a: &CanonicalFeatureRow, company_b: &CanonicalFeatureRow) -> SynergyScore {
    let scale_similarity = ratio_similarity(
        company_a.get("revenue").unwrap_or(0.0),
        company_b.get("revenue").unwrap_or(0.0),
    );

    let margin_alignment = match (ebitda_margin(company_a), ebitda_margin(company_b)) {
        (Some(a), Some(b)) => 1.0 - (a - b).abs().min(1.0),
        _ => 0.0,
    };

    SynergyScore {
        scale_similarity,
        margin_alignment,
        overall: (scale_similarity + margin_alignment) / 2.0,
    }
}

/// min/max of two magnitudes: 1.0 when equal, tending to 0.0 as they diverge
fn ratio_similarity(x: f64, y: f64) -> f64 {
    let (x, y) = (x.abs(), y.abs());
    if x == 0.0 || y == 0.0 {
        return 0.0;
    }
    x.min(y) / x.max(y)
}

fn ebitda_margin(row: &CanonicalFeatureRow) -> Option<f64> {
    let revenue = row.get("revenue").unwrap_or(0.0);
    if revenue > 0.0 {
        Some(row.get("ebitda").unwrap_or(0.0) / revenue)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(revenue: f64, ebitda: f64) -> CanonicalFeatureRow {
        CanonicalFeatureRow::new(
            vec!["revenue".to_string(), "ebitda".to_string()],
            vec![revenue, ebitda],
        )
    }

    #[test]
    fn identical_companies_score_perfectly() {
        let a = row(1000.0, 150.0);
        let result = score(&a, &a.clone());

        assert_eq!(result.scale_similarity, 1.0);
        assert_eq!(result.margin_alignment, 1.0);
        assert_eq!(result.overall, 1.0);
    }

    #[test]
    fn scores_are_deterministic_and_bounded() {
        let a = row(1000.0, 150.0);
        let b = row(1200.0, 100.0);

        let first = score(&a, &b);
        let second = score(&a, &b);
        assert_eq!(first.overall, second.overall);
        assert!((0.0..=1.0).contains(&first.scale_similarity));
        assert!((0.0..=1.0).contains(&first.margin_alignment));
        assert!((0.0..=1.0).contains(&first.overall));
    }

    #[test]
    fn symmetry_in_the_pair() {
        let a = row(1000.0, 150.0);
        let b = row(4000.0, 300.0);

        let ab = score(&a, &b);
        let ba = score(&b, &a);
        assert_eq!(ab.scale_similarity, ba.scale_similarity);
        assert_eq!(ab.margin_alignment, ba.margin_alignment);
    }

    #[test]
    fn missing_revenue_scores_zero_not_fabricated() {
        let a = row(0.0, 150.0);
        let b = row(1200.0, 100.0);

        let result = score(&a, &b);
        assert_eq!(result.scale_similarity, 0.0);
        assert_eq!(result.margin_alignment, 0.0);
        assert_eq!(result.overall, 0.0);
    }
}
