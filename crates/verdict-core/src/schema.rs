use serde::{Deserialize, Serialize};

/// Kind of value a canonical slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Numeric,
    Categorical,
}

/// One named slot in the canonical schema, with the synonym patterns the
/// aligner matches raw labels against (lowercase, matched exact-or-substring)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSlot {
    pub name: String,
    pub kind: SlotKind,
    pub synonyms: Vec<String>,
}

impl FeatureSlot {
    pub fn numeric(name: &str, synonyms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Numeric,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn categorical(name: &str, synonyms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Categorical,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The fixed, ordered list of feature slots the classifier was trained on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    slots: Vec<FeatureSlot>,
}

impl FeatureSchema {
    pub fn new(slots: Vec<FeatureSlot>) -> Self {
        Self { slots }
    }

    /// The schema of the bundled M&A deal model
    pub fn deal_default() -> Self {
        Self::new(vec![
            FeatureSlot::numeric("revenue", &["revenue", "sales", "turnover"]),
            FeatureSlot::numeric("ebitda", &["ebitda"]),
            FeatureSlot::numeric("net_income", &["net income", "net profit", "earnings"]),
            FeatureSlot::numeric("total_assets", &["total assets", "assets"]),
            FeatureSlot::numeric(
                "total_liabilities",
                &["total liabilities", "liabilities", "total debt"],
            ),
            FeatureSlot::numeric("equity", &["equity", "net worth"]),
            FeatureSlot::numeric(
                "operating_cash_flow",
                &["operating cash flow", "cash flow from operations", "cash flow"],
            ),
            FeatureSlot::numeric("capex", &["capex", "capital expenditure"]),
            FeatureSlot::categorical("region", &["region", "geography"]),
            FeatureSlot::categorical("sector", &["sector", "industry"]),
            FeatureSlot::numeric(
                "deal_size",
                &["deal size", "deal value", "transaction value", "purchase price"],
            ),
        ])
    }

    pub fn slots(&self) -> &[FeatureSlot] {
        &self.slots
    }

    pub fn slot_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Fixed code table for the region slot. Unknown regions encode as 0.0.
const REGION_CODES: &[(&str, f64)] = &[
    ("north america", 1.0),
    ("europe", 2.0),
    ("asia", 3.0),
    ("asia pacific", 3.0),
    ("latin america", 4.0),
    ("south america", 4.0),
    ("middle east", 5.0),
    ("africa", 6.0),
];

/// Fixed code table for the sector slot. Unknown sectors encode as 0.0.
const SECTOR_CODES: &[(&str, f64)] = &[
    ("technology", 1.0),
    ("healthcare", 2.0),
    ("financials", 3.0),
    ("finance", 3.0),
    ("energy", 4.0),
    ("consumer", 5.0),
    ("retail", 5.0),
    ("industrials", 6.0),
    ("manufacturing", 6.0),
    ("utilities", 7.0),
    ("materials", 8.0),
    ("real estate", 9.0),
    ("telecom", 10.0),
];

fn lookup_code(table: &[(&str, f64)], value: &str) -> f64 {
    let normalized = value.trim().to_lowercase();
    table
        .iter()
        .find(|(name, _)| normalized == *name || normalized.contains(name))
        .map(|(_, code)| *code)
        .unwrap_or(0.0)
}

/// Encode a region name to its fixed numeric code
pub fn region_code(value: &str) -> f64 {
    lookup_code(REGION_CODES, value)
}

/// Encode a sector name to its fixed numeric code
pub fn sector_code(value: &str) -> f64 {
    lookup_code(SECTOR_CODES, value)
}

/// Encode a categorical value for the given slot name. Slots without a code
/// table fall back to 0.0 rather than guessing.
pub fn encode_categorical(slot_name: &str, value: &str) -> f64 {
    match slot_name {
        "region" => region_code(value),
        "sector" => sector_code(value),
        _ => 0.0,
    }
}
