//! Item and document ITC eligibility.

pub mod classifier;

pub use classifier::{EligibilityAssessment, EligibilityClassifier, ItemAssessment};
