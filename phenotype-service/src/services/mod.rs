pub mod metrics;
pub mod model;
pub mod predictor;

pub use model::{Classifier, TreePipeline};
pub use predictor::{LabelAlignment, PhenotypePredictor};
