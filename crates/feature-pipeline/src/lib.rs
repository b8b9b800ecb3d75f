pub mod aligner;
pub mod combiner;

pub use aligner::FeatureAligner;
pub use combiner::FeatureCombiner;
