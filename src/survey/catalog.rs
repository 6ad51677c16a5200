//! Cluster names and descriptions.

use crate::core::ClusterId;
use crate::survey::error::SurveyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// What the dashboard says about a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDescription {
    pub name: String,
    pub description: String,
}

/// Read-only map from cluster id to its description.
///
/// The JSON form is an object keyed by cluster id:
///
/// ```rust
/// use cluster_feedback::core::ClusterId;
/// use cluster_feedback::survey::ClusterCatalog;
///
/// let catalog = ClusterCatalog::from_json(r#"{
///     "Cluster 0": {"name": "Forest dog people", "description": "They like dogs and forests."}
/// }"#).unwrap();
///
/// let cluster = catalog.describe(&ClusterId::from("Cluster 0")).unwrap();
/// assert_eq!(cluster.name, "Forest dog people");
/// assert!(catalog.describe(&ClusterId::from("Cluster 9")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterCatalog {
    clusters: BTreeMap<ClusterId, ClusterDescription>,
}

impl ClusterCatalog {
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Look up a cluster. A miss means the classifier produced an id the
    /// catalog does not know about.
    pub fn describe(&self, id: &ClusterId) -> Result<&ClusterDescription, SurveyError> {
        self.clusters
            .get(id)
            .ok_or_else(|| SurveyError::UnknownCluster(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
