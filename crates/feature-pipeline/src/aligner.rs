use verdict_core::{
    coerce_numeric, encode_categorical, CanonicalFeatureRow, DealContext, FeatureSchema,
    RawFinancialRecord, SlotKind,
};

/// Maps a messy raw record onto the canonical schema.
///
/// Alignment never fails. For each slot the raw fields are scanned in their
/// original document order and the first label matching any synonym
/// (case-insensitive, exact or substring) supplies the value; everything
/// else defaults to 0.0. Silent defaulting is the documented policy here,
/// not an error. Raw fields matching no slot are dropped.
pub struct FeatureAligner {
    schema: FeatureSchema,
}

impl FeatureAligner {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn align(
        &self,
        record: &RawFinancialRecord,
        context: Option<&DealContext>,
    ) -> CanonicalFeatureRow {
        let normalized: Vec<(String, &str)> = record
            .fields
            .iter()
            .map(|f| (f.label.trim().to_lowercase(), f.value.as_str()))
            .collect();

        let mut slots = Vec::with_capacity(self.schema.len());
        let mut values = Vec::with_capacity(self.schema.len());
        let mut defaulted = 0usize;

        for slot in self.schema.slots() {
            let matched = normalized
                .iter()
                .find(|(label, _)| slot.synonyms.iter().any(|syn| label.contains(syn.as_str())));

            let value = match (slot.kind, matched) {
                (SlotKind::Numeric, Some(&(_, raw))) => coerce_numeric(raw).unwrap_or(0.0),
                (SlotKind::Categorical, Some(&(_, raw))) => {
                    // Already-encoded categoricals pass through; names go
                    // through the fixed code tables.
                    coerce_numeric(raw).unwrap_or_else(|| encode_categorical(&slot.name, raw))
                }
                (SlotKind::Categorical, None) => context
                    .map(|c| context_value(&slot.name, c))
                    .unwrap_or(0.0),
                (SlotKind::Numeric, None) => 0.0,
            };

            if matched.is_none() {
                defaulted += 1;
            }
            slots.push(slot.name.clone());
            values.push(value);
        }

        if defaulted > 0 {
            tracing::debug!(
                "aligned {} document: {} of {} slots defaulted",
                record.format.name(),
                defaulted,
                self.schema.len()
            );
        }

        CanonicalFeatureRow::new(slots, values)
    }
}

/// Context strings fill categorical slots the document left empty
fn context_value(slot_name: &str, context: &DealContext) -> f64 {
    let source = match slot_name {
        "region" => context.region.as_deref(),
        "sector" => context.sector.as_deref(),
        _ => None,
    };
    source
        .map(|v| encode_categorical(slot_name, v))
        .unwrap_or(0.0)
}
