use verdict_core::{
    CanonicalFeatureRow, DealFeatureVector, DealResult, FeatureDelta, FeatureSchema, VerdictError,
};

/// Merges the two companies' canonical rows into the single classifier input.
///
/// The combination rule is fixed: elementwise absolute difference, per slot,
/// in schema order. This is the system's defined semantics — the model was
/// trained against divergence magnitudes, and mean/concatenation renditions
/// of the same data are not equivalent and not supported.
pub struct FeatureCombiner {
    schema: FeatureSchema,
}

impl FeatureCombiner {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn combine(
        &self,
        company_a: &CanonicalFeatureRow,
        company_b: &CanonicalFeatureRow,
    ) -> DealResult<DealFeatureVector> {
        self.check_row(company_a, "company A")?;
        self.check_row(company_b, "company B")?;

        let values: Vec<f64> = company_a
            .values()
            .iter()
            .zip(company_b.values())
            .map(|(a, b)| (a - b).abs())
            .collect();

        Ok(DealFeatureVector::new(self.schema.slot_names(), values))
    }

    /// Signed per-slot divergences (A - B), kept for narrative highlights
    pub fn deltas(
        &self,
        company_a: &CanonicalFeatureRow,
        company_b: &CanonicalFeatureRow,
    ) -> DealResult<Vec<FeatureDelta>> {
        self.check_row(company_a, "company A")?;
        self.check_row(company_b, "company B")?;

        Ok(self
            .schema
            .slots()
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let a = company_a.values()[i];
                let b = company_b.values()[i];
                FeatureDelta {
                    slot: slot.name.clone(),
                    company_a: a,
                    company_b: b,
                    delta: a - b,
                }
            })
            .collect())
    }

    fn check_row(&self, row: &CanonicalFeatureRow, which: &str) -> DealResult<()> {
        let expected = self.schema.slot_names();
        if row.slot_names() != expected.as_slice() {
            return Err(VerdictError::SchemaMismatch(format!(
                "{} row slots {:?} do not match the canonical schema {:?}",
                which,
                row.slot_names(),
                expected
            )));
        }
        Ok(())
    }
}
