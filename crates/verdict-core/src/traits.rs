use crate::{DealFeatureVector, DealResult, Verdict};

/// Inference seam over a pre-trained binary classifier.
///
/// Implementations wrap an externally supplied model artifact; they own no
/// training logic and must be deterministic: the same vector always yields
/// the same probability. The input vector's slot names and order must match
/// `feature_names()` exactly, failing with `FeatureOrderMismatch` otherwise.
pub trait DealClassifier: Send + Sync {
    /// Ordered feature names the model was trained against
    fn feature_names(&self) -> &[String];

    /// Probability of deal success in [0, 1]
    fn predict_probability(&self, vector: &DealFeatureVector) -> DealResult<f64>;

    /// Thresholded verdict derived from the probability
    fn predict(&self, vector: &DealFeatureVector) -> DealResult<Verdict> {
        Ok(Verdict::from_probability(self.predict_probability(vector)?))
    }
}
