//! Assigning a survey record to a cluster.

use crate::core::ClusterId;
use crate::survey::error::SurveyError;
use crate::survey::population::Population;
use crate::survey::record::{Field, SurveyRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Maps a record to the cluster it belongs to. Must be deterministic.
pub trait Classifier: Send + Sync {
    fn classify(&self, record: &SurveyRecord) -> Result<ClusterId, SurveyError>;
}

/// Classifier holding one typical answer set per cluster.
///
/// A record belongs to the cluster whose profile differs from it in the fewest
/// fields; ties go to the smallest cluster id.
///
/// The serialized model is a JSON object of profiles keyed by cluster id:
///
/// ```rust
/// use cluster_feedback::survey::{Classifier, ModeProfileClassifier, SurveyRecord};
///
/// let model = ModeProfileClassifier::from_json(r#"{
///     "Cluster 0": {"age": "25-34", "edu_level": "Wyższe", "fav_animals": "Psy",
///                   "fav_place": "W lesie", "gender": "Kobieta"},
///     "Cluster 1": {"age": "<18", "edu_level": "Podstawowe", "fav_animals": "Koty",
///                   "fav_place": "Nad wodą", "gender": "Mężczyzna"}
/// }"#).unwrap();
///
/// let record = SurveyRecord::default(); // "<18", "Podstawowe", ...
/// assert_eq!(model.classify(&record).unwrap().as_str(), "Cluster 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeProfileClassifier {
    profiles: BTreeMap<ClusterId, SurveyRecord>,
}

impl ModeProfileClassifier {
    pub fn new(profiles: BTreeMap<ClusterId, SurveyRecord>) -> Result<Self, SurveyError> {
        if profiles.is_empty() {
            return Err(SurveyError::EmptyModel);
        }
        Ok(Self { profiles })
    }

    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        let profiles: BTreeMap<ClusterId, SurveyRecord> = serde_json::from_str(json)?;
        Self::new(profiles)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build profiles from the labeled respondents of `population`: for each
    /// cluster, the most common answer to every field. Ties go to the answer
    /// that comes first among the field's options.
    pub fn fit(population: &Population) -> Result<Self, SurveyError> {
        let mut by_cluster: BTreeMap<&ClusterId, Vec<&SurveyRecord>> = BTreeMap::new();
        for respondent in population.respondents() {
            if let Some(cluster) = &respondent.cluster {
                by_cluster.entry(cluster).or_default().push(&respondent.answers);
            }
        }
        if by_cluster.is_empty() {
            return Err(SurveyError::Unlabeled);
        }

        let profiles = by_cluster
            .into_iter()
            .map(|(cluster, members)| {
                let mut profile = SurveyRecord::default();
                for field in Field::ALL {
                    let value = most_common(field, &members);
                    // Values outside the options cannot be set on a record.
                    if field.rank(&value).is_some() {
                        profile.set(field, &value)?;
                    }
                }
                Ok((cluster.clone(), profile))
            })
            .collect::<Result<BTreeMap<_, _>, SurveyError>>()?;

        debug!(clusters = profiles.len(), "classifier fitted from labeled data");
        Self::new(profiles)
    }

    /// Profiles in cluster id order.
    pub fn profiles(&self) -> impl Iterator<Item = (&ClusterId, &SurveyRecord)> {
        self.profiles.iter()
    }

    pub fn to_json(&self) -> Result<String, SurveyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the model where [`load`](Self::load) can read it back.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SurveyError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), clusters = self.profiles.len(), "classifier saved");
        Ok(())
    }
}

fn most_common(field: Field, members: &[&SurveyRecord]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in members {
        *counts.entry(record.get(field)).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, count_a), (b, count_b)| {
            count_a
                .cmp(count_b)
                // Higher rank wins on max, so compare ranks in reverse.
                .then_with(|| option_order(field, b).cmp(&option_order(field, a)))
        })
        .map(|(value, _)| value.to_string())
        .unwrap_or_default()
}

/// Known options by position, then anything else alphabetically.
fn option_order(field: Field, value: &str) -> (usize, String) {
    match field.rank(value) {
        Some(rank) => (rank, String::new()),
        None => (usize::MAX, value.to_string()),
    }
}

fn distance(a: &SurveyRecord, b: &SurveyRecord) -> usize {
    Field::ALL
        .into_iter()
        .filter(|field| a.get(*field) != b.get(*field))
        .count()
}

impl Classifier for ModeProfileClassifier {
    fn classify(&self, record: &SurveyRecord) -> Result<ClusterId, SurveyError> {
        // min_by_key keeps the first minimum, and profiles iterate in id order.
        self.profiles
            .iter()
            .min_by_key(|(_, profile)| distance(record, profile))
            .map(|(id, _)| id.clone())
            .ok_or(SurveyError::EmptyModel)
    }
}
