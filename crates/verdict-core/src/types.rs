use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declared format of an uploaded financial document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Csv,
    Excel,
    Pdf,
}

impl DocumentFormat {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentFormat::Csv => "csv",
            DocumentFormat::Excel => "excel",
            DocumentFormat::Pdf => "pdf",
        }
    }
}

/// One label/value pair pulled from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawField {
    pub label: String,
    pub value: String,
}

impl RawField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Untrusted, heterogeneous fields extracted from one uploaded document.
/// Labels are arbitrary strings; values may or may not be numeric.
/// Field order is the document's original left-to-right/top-to-bottom order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFinancialRecord {
    pub format: DocumentFormat,
    pub fields: Vec<RawField>,
}

impl RawFinancialRecord {
    pub fn new(format: DocumentFormat, fields: Vec<RawField>) -> Self {
        Self { format, fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// An uploaded file as handed over by the host UI
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Optional deal context supplied alongside the uploads.
/// Region and sector fill their canonical slots when the documents carry
/// neither; environment is surfaced in the narrative only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealContext {
    pub region: Option<String>,
    pub sector: Option<String>,
    pub environment: Option<String>,
}

/// Fixed-length numeric row keyed by the canonical schema's slots.
/// Every slot is present; unmatched source data defaults to 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFeatureRow {
    slots: Vec<String>,
    values: Vec<f64>,
}

impl CanonicalFeatureRow {
    pub fn new(slots: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(slots.len(), values.len());
        Self { slots, values }
    }

    pub fn slot_names(&self) -> &[String] {
        &self.slots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, slot: &str) -> Option<f64> {
        self.slots
            .iter()
            .position(|s| s == slot)
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The single row fed to the classifier, combined from two canonical rows.
/// Slot names and order exactly match the schema the model declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealFeatureVector {
    slots: Vec<String>,
    values: Vec<f64>,
}

impl DealFeatureVector {
    pub fn new(slots: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(slots.len(), values.len());
        Self { slots, values }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.slots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Signed per-slot divergence between the two companies, kept for
/// narrative highlights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDelta {
    pub slot: String,
    pub company_a: f64,
    pub company_b: f64,
    /// company_a - company_b
    pub delta: f64,
}

/// Probability at or above which a deal is called a success.
/// Fixed operating point; callers needing a different one derive their own
/// verdict from the probability.
pub const SUCCESS_THRESHOLD: f64 = 0.5;

/// Binary deal verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Fail,
    Succeed,
}

impl Verdict {
    /// Threshold rule: Succeed iff probability >= 0.5 (inclusive boundary).
    pub fn from_probability(probability: f64) -> Self {
        if probability >= SUCCESS_THRESHOLD {
            Verdict::Succeed
        } else {
            Verdict::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Succeed => "Likely to Succeed",
            Verdict::Fail => "Likely to Fail",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Succeed)
    }
}

/// Classifier output for one deal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictResult {
    pub verdict: Verdict,
    pub probability: f64,
    pub evaluated_at: DateTime<Utc>,
}

impl VerdictResult {
    pub fn new(probability: f64) -> Self {
        Self {
            verdict: Verdict::from_probability(probability),
            probability,
            evaluated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_threshold_is_inclusive() {
        assert_eq!(Verdict::from_probability(0.5), Verdict::Succeed);
        assert_eq!(Verdict::from_probability(0.49999), Verdict::Fail);
        assert_eq!(Verdict::from_probability(1.0), Verdict::Succeed);
        assert_eq!(Verdict::from_probability(0.0), Verdict::Fail);
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::Succeed.label(), "Likely to Succeed");
        assert_eq!(Verdict::Fail.label(), "Likely to Fail");
        assert!(Verdict::Succeed.is_success());
        assert!(!Verdict::Fail.is_success());
    }

    #[test]
    fn canonical_row_lookup() {
        let row = CanonicalFeatureRow::new(
            vec!["revenue".to_string(), "ebitda".to_string()],
            vec![1000.0, 150.0],
        );
        assert_eq!(row.get("revenue"), Some(1000.0));
        assert_eq!(row.get("ebitda"), Some(150.0));
        assert_eq!(row.get("capex"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn verdict_result_derives_from_probability() {
        let result = VerdictResult::new(0.72);
        assert_eq!(result.verdict, Verdict::Succeed);
        assert_eq!(result.probability, 0.72);
    }
}
