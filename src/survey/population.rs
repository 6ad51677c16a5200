//! The table of previously surveyed respondents.

use crate::core::ClusterId;
use crate::survey::catalog::ClusterCatalog;
use crate::survey::chart::Histogram;
use crate::survey::classifier::Classifier;
use crate::survey::error::SurveyError;
use crate::survey::record::{Field, SurveyRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column delimiter of the survey CSV.
pub const DELIMITER: u8 = b';';

/// One row of the survey table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Respondent {
    pub answers: SurveyRecord,
    pub cluster: Option<ClusterId>,
}

/// Static, read-only table of respondents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    respondents: Vec<Respondent>,
}

#[derive(Debug, Deserialize)]
struct Row {
    age: String,
    edu_level: String,
    fav_animals: String,
    fav_place: String,
    gender: String,
    #[serde(rename = "Cluster", default)]
    cluster: Option<String>,
}

impl Population {
    pub fn new(respondents: Vec<Respondent>) -> Self {
        Self { respondents }
    }

    /// Parse a `;`-separated table with a header row. The `Cluster` column is
    /// optional; empty cells leave the respondent unlabeled.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SurveyError> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut respondents = Vec::new();
        for row in csv.deserialize::<Row>() {
            let row = row?;
            respondents.push(Respondent {
                answers: SurveyRecord {
                    age: row.age,
                    edu_level: row.edu_level,
                    fav_animals: row.fav_animals,
                    fav_place: row.fav_place,
                    gender: row.gender,
                },
                cluster: row.cluster.filter(|c| !c.is_empty()).map(ClusterId::from),
            });
        }
        Ok(Self { respondents })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let population = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = population.len(), "survey data loaded");
        Ok(population)
    }

    /// Assign every respondent the cluster `classifier` predicts for them,
    /// replacing any existing label.
    pub fn labeled_by(&self, classifier: &dyn Classifier) -> Result<Self, SurveyError> {
        let respondents = self
            .respondents
            .iter()
            .map(|r| {
                Ok(Respondent {
                    answers: r.answers.clone(),
                    cluster: Some(classifier.classify(&r.answers)?),
                })
            })
            .collect::<Result<Vec<_>, SurveyError>>()?;
        Ok(Self { respondents })
    }

    pub fn respondents(&self) -> &[Respondent] {
        &self.respondents
    }

    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    /// Respondents labeled with `cluster`.
    pub fn members(&self, cluster: &ClusterId) -> Population {
        Population {
            respondents: self
                .respondents
                .iter()
                .filter(|r| r.cluster.as_ref() == Some(cluster))
                .cloned()
                .collect(),
        }
    }

    /// Count answers to `field`. Known options come first in option order,
    /// then any other values in order of first appearance. Options nobody
    /// picked are left out.
    pub fn histogram(&self, field: Field) -> Histogram {
        let mut known = vec![0usize; field.options().len()];
        let mut other: Vec<(String, usize)> = Vec::new();

        for respondent in &self.respondents {
            let value = respondent.answers.get(field);
            match field.rank(value) {
                Some(rank) => known[rank] += 1,
                None => match other.iter_mut().find(|(v, _)| v == value) {
                    Some((_, count)) => *count += 1,
                    None => other.push((value.to_string(), 1)),
                },
            }
        }

        let bins = field
            .options()
            .iter()
            .zip(known)
            .filter(|(_, count)| *count > 0)
            .map(|(option, count)| (option.to_string(), count))
            .chain(other)
            .collect();

        Histogram::new(format!("{} distribution", field.label()), field.label(), bins)
    }

    /// Respondents per cluster name, in cluster id order. Unlabeled
    /// respondents are not counted.
    pub fn cluster_sizes(&self, catalog: &ClusterCatalog) -> Result<Histogram, SurveyError> {
        let mut counts: BTreeMap<&ClusterId, usize> = BTreeMap::new();
        for cluster in self.respondents.iter().filter_map(|r| r.cluster.as_ref()) {
            *counts.entry(cluster).or_default() += 1;
        }

        let bins = counts
            .into_iter()
            .map(|(id, count)| Ok((catalog.describe(id)?.name.clone(), count)))
            .collect::<Result<Vec<_>, SurveyError>>()?;

        Ok(Histogram::new("Respondents per group", "Group", bins))
    }
}
