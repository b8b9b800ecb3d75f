use verdict_core::{DealContext, FeatureDelta, VerdictResult};

const DEFAULT_MAX_HIGHLIGHTS: usize = 3;

/// Deterministic template filling over the verdict.
///
/// Exactly two branches (success/failure) interpolating the probability and
/// the largest feature divergences. Pure: no side effects, no network, and
/// despite the "GPT-style" framing in the original prototypes, no language
/// model anywhere near this.
pub struct NarrativeGenerator {
    max_highlights: usize,
}

impl NarrativeGenerator {
    pub fn new() -> Self {
        Self {
            max_highlights: DEFAULT_MAX_HIGHLIGHTS,
        }
    }

    pub fn render(
        &self,
        result: &VerdictResult,
        deltas: &[FeatureDelta],
        context: Option<&DealContext>,
    ) -> String {
        let pct = result.probability * 100.0;
        let mut text = if result.verdict.is_success() {
            format!(
                "This M&A deal appears promising with a success probability of {pct:.1}%. \
                 Consider moving ahead, focusing on synergies and integration planning."
            )
        } else {
            format!(
                "The deal shows a low probability of success ({pct:.1}%). \
                 Re-evaluate the strategic fit, financial leverage, and cultural alignment between the firms."
            )
        };

        let highlights = self.highlights(deltas);
        if !highlights.is_empty() {
            text.push_str(&format!(" Largest divergences: {}.", highlights.join(", ")));
        }

        if let Some(env) = context.and_then(|c| c.environment.as_deref()) {
            text.push_str(&format!(" Assessment assumes a {env} market environment."));
        }

        text
    }

    /// Top divergences by magnitude; ties keep schema order (stable sort)
    fn highlights(&self, deltas: &[FeatureDelta]) -> Vec<String> {
        let mut ranked: Vec<&FeatureDelta> = deltas.iter().filter(|d| d.delta != 0.0).collect();
        ranked.sort_by(|a, b| {
            b.delta
                .abs()
                .partial_cmp(&a.delta.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.max_highlights);
        ranked
            .iter()
            .map(|d| format!("{} ({:+.1})", display_name(&d.slot), d.delta))
            .collect()
    }
}

impl Default for NarrativeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(slot: &str) -> String {
    slot.replace('_', " ")
}
