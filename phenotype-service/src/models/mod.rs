pub mod phenotype;

pub use phenotype::{Prediction, PHENOTYPE_NAMES};
