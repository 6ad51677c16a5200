//! Survey data the dashboard reads: the respondent's answers, the cluster
//! catalog, the population table, the classifier and chart output.
//!
//! Everything here is loaded once and read-only afterwards. None of it
//! touches [`SessionState`](crate::core::SessionState).

pub mod catalog;
pub mod chart;
pub mod classifier;
pub mod error;
pub mod population;
pub mod record;

pub use catalog::{ClusterCatalog, ClusterDescription};
pub use chart::{ChartSink, Histogram, TextChart};
pub use classifier::{Classifier, ModeProfileClassifier};
pub use error::SurveyError;
pub use population::{Population, Respondent};
pub use record::{Field, SurveyRecord};
