pub mod model;
pub mod narrative;
pub mod synergy;

pub use model::{LogisticModel, ModelArtifact, ScalerParams};
pub use narrative::NarrativeGenerator;
pub use synergy::SynergyScore;

use std::path::PathBuf;
use std::sync::Arc;

use document_loader::DocumentLoader;
use feature_pipeline::{FeatureAligner, FeatureCombiner};
use serde::{Deserialize, Serialize};
use verdict_core::{
    DealClassifier, DealContext, DealResult, DocumentUpload, FeatureDelta, FeatureSchema,
    VerdictError, VerdictResult,
};

/// Engine configuration. `Default` resolves the artifact path from
/// `DEAL_MODEL_PATH`, falling back to `./models/deal_verdict.json`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model_path: PathBuf,
    pub schema: FeatureSchema,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: std::env::var("DEAL_MODEL_PATH")
                .unwrap_or_else(|_| "./models/deal_verdict.json".to_string())
                .into(),
            schema: FeatureSchema::deal_default(),
        }
    }
}

/// Everything the host UI gets back for one deal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAssessment {
    pub result: VerdictResult,
    pub narrative: String,
    /// Signed per-slot divergences (company A minus company B)
    pub deltas: Vec<FeatureDelta>,
    pub synergy: SynergyScore,
}

/// The deal verdict pipeline: two uploaded documents in, one assessment out.
///
/// The classifier is loaded once at initialization and shared read-only for
/// the life of the process; each `evaluate` call is otherwise stateless.
/// Requests run synchronously, one at a time.
pub struct DealVerdictEngine {
    loader: DocumentLoader,
    aligner: FeatureAligner,
    combiner: FeatureCombiner,
    narrative: NarrativeGenerator,
    classifier: Arc<dyn DealClassifier>,
}

impl std::fmt::Debug for DealVerdictEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealVerdictEngine")
            .field("classifier_features", &self.classifier.feature_names())
            .finish_non_exhaustive()
    }
}

impl DealVerdictEngine {
    /// Load the model artifact and wire the pipeline around it
    pub fn initialize(config: EngineConfig) -> DealResult<Self> {
        tracing::info!("loading deal model from {}", config.model_path.display());
        let model = LogisticModel::load(&config.model_path)?;
        Self::with_classifier(Arc::new(model), config.schema)
    }

    /// Wire the pipeline around an already-built classifier. The classifier's
    /// declared feature names must match the canonical schema exactly.
    pub fn with_classifier(
        classifier: Arc<dyn DealClassifier>,
        schema: FeatureSchema,
    ) -> DealResult<Self> {
        let expected = schema.slot_names();
        if classifier.feature_names() != expected.as_slice() {
            return Err(VerdictError::FeatureOrderMismatch(format!(
                "model declares features {:?} but the canonical schema is {:?}",
                classifier.feature_names(),
                expected
            )));
        }

        tracing::info!("deal verdict engine ready ({} features)", expected.len());
        Ok(Self {
            loader: DocumentLoader::new(),
            aligner: FeatureAligner::new(schema.clone()),
            combiner: FeatureCombiner::new(schema),
            narrative: NarrativeGenerator::new(),
            classifier,
        })
    }

    /// Run one request through the full pipeline:
    /// load → align → combine → classify → narrate
    pub fn evaluate(
        &self,
        company_a: &DocumentUpload,
        company_b: &DocumentUpload,
        context: Option<&DealContext>,
    ) -> DealResult<DealAssessment> {
        let record_a = self.loader.load(company_a)?;
        let record_b = self.loader.load(company_b)?;

        let row_a = self.aligner.align(&record_a, context);
        let row_b = self.aligner.align(&record_b, context);

        let vector = self.combiner.combine(&row_a, &row_b)?;
        let deltas = self.combiner.deltas(&row_a, &row_b)?;

        let probability = self.classifier.predict_probability(&vector)?;
        let result = VerdictResult::new(probability);
        tracing::info!(
            "deal verdict: {} (probability {:.3})",
            result.verdict.label(),
            probability
        );

        let narrative = self.narrative.render(&result, &deltas, context);
        let synergy = synergy::score(&row_a, &row_b);

        Ok(DealAssessment {
            result,
            narrative,
            deltas,
            synergy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use verdict_core::{DealFeatureVector, FeatureSlot, Verdict};

    /// Fixed-probability classifier that records what it was asked to score
    struct StubClassifier {
        features: Vec<String>,
        probability: f64,
        calls: AtomicUsize,
        last_vector: Mutex<Option<Vec<f64>>>,
    }

    impl StubClassifier {
        fn new(features: &[&str], probability: f64) -> Self {
            Self {
                features: features.iter().map(|s| s.to_string()).collect(),
                probability,
                calls: AtomicUsize::new(0),
                last_vector: Mutex::new(None),
            }
        }
    }

    impl DealClassifier for StubClassifier {
        fn feature_names(&self) -> &[String] {
            &self.features
        }

        fn predict_probability(&self, vector: &DealFeatureVector) -> DealResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_vector.lock().unwrap() = Some(vector.values().to_vec());
            Ok(self.probability)
        }
    }

    fn two_slot_schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            FeatureSlot::numeric("revenue", &["revenue"]),
            FeatureSlot::numeric("ebitda", &["ebitda"]),
        ])
    }

    fn csv_upload(name: &str, content: &str) -> DocumentUpload {
        DocumentUpload::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn end_to_end_success_scenario() {
        let stub = Arc::new(StubClassifier::new(&["revenue", "ebitda"], 0.72));
        let engine = DealVerdictEngine::with_classifier(stub.clone(), two_slot_schema()).unwrap();

        let a = csv_upload("company_a.csv", "Revenue,EBITDA\n1000,150\n");
        let b = csv_upload("company_b.csv", "Revenue,EBITDA\n1200,100\n");

        let assessment = engine.evaluate(&a, &b, None).unwrap();

        // The classifier saw the absolute-difference vector
        assert_eq!(
            stub.last_vector.lock().unwrap().as_deref(),
            Some(&[200.0, 50.0][..])
        );

        assert_eq!(assessment.result.verdict, Verdict::Succeed);
        assert_eq!(assessment.result.probability, 0.72);
        assert!(assessment.narrative.contains("72"));
        assert!(assessment.narrative.contains("promising"));

        assert_eq!(assessment.deltas[0].slot, "revenue");
        assert_eq!(assessment.deltas[0].delta, -200.0);
        assert_eq!(assessment.deltas[1].delta, 50.0);
    }

    #[test]
    fn unsupported_upload_halts_before_the_classifier() {
        let stub = Arc::new(StubClassifier::new(&["revenue", "ebitda"], 0.72));
        let engine = DealVerdictEngine::with_classifier(stub.clone(), two_slot_schema()).unwrap();

        let a = csv_upload("pitch_deck.docx", "irrelevant");
        let b = csv_upload("company_b.csv", "Revenue,EBITDA\n1200,100\n");

        let err = engine.evaluate(&a, &b, None).unwrap_err();
        assert!(matches!(err, VerdictError::UnsupportedFormat(_)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn classifier_schema_disagreement_fails_initialization() {
        let stub = Arc::new(StubClassifier::new(&["revenue", "capex"], 0.5));
        let err = DealVerdictEngine::with_classifier(stub, two_slot_schema()).unwrap_err();
        assert!(matches!(err, VerdictError::FeatureOrderMismatch(_)));
    }

    #[test]
    fn initialize_loads_a_real_artifact() {
        let artifact = ModelArtifact {
            feature_names: vec!["revenue".to_string(), "ebitda".to_string()],
            coefficients: vec![0.01, -0.02],
            intercept: 0.1,
            scaler: None,
        };
        let path = std::env::temp_dir().join(format!(
            "deal_engine_init_test_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

        let engine = DealVerdictEngine::initialize(EngineConfig {
            model_path: path.clone(),
            schema: two_slot_schema(),
        })
        .unwrap();
        std::fs::remove_file(&path).ok();

        let a = csv_upload("a.csv", "Revenue,EBITDA\n1000,150\n");
        let b = csv_upload("b.csv", "Revenue,EBITDA\n1200,100\n");
        let assessment = engine.evaluate(&a, &b, None).unwrap();

        // z = 200*0.01 - 50*0.02 + 0.1 = 1.1 -> comfortably a success
        assert_eq!(assessment.result.verdict, Verdict::Succeed);
        assert!(assessment.result.probability > 0.5);

        // Same request, same verdict: the pipeline is deterministic
        let again = engine.evaluate(&a, &b, None).unwrap();
        assert_eq!(again.result.probability, assessment.result.probability);
    }

    #[test]
    fn context_flows_through_to_the_narrative() {
        let stub = Arc::new(StubClassifier::new(&["revenue", "ebitda"], 0.2));
        let engine = DealVerdictEngine::with_classifier(stub, two_slot_schema()).unwrap();

        let a = csv_upload("a.csv", "Revenue,EBITDA\n1000,150\n");
        let b = csv_upload("b.csv", "Revenue,EBITDA\n1200,100\n");
        let context = DealContext {
            region: None,
            sector: None,
            environment: Some("high-rate".to_string()),
        };

        let assessment = engine.evaluate(&a, &b, Some(&context)).unwrap();
        assert_eq!(assessment.result.verdict, Verdict::Fail);
        assert!(assessment.narrative.contains("high-rate market environment"));
    }
}
