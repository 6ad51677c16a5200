//! A respondent's answers and the allowed values for each question.

use crate::survey::error::SurveyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One question of the welcome survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    EduLevel,
    FavAnimals,
    FavPlace,
    Gender,
}

impl Field {
    /// Every field, in questionnaire order.
    pub const ALL: [Field; 5] = [
        Field::Age,
        Field::EduLevel,
        Field::FavAnimals,
        Field::FavPlace,
        Field::Gender,
    ];

    /// Column name in the survey CSV.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::EduLevel => "edu_level",
            Self::FavAnimals => "fav_animals",
            Self::FavPlace => "fav_place",
            Self::Gender => "gender",
        }
    }

    /// Human label used in prompts and chart axes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::EduLevel => "Education",
            Self::FavAnimals => "Favourite animals",
            Self::FavPlace => "Favourite place",
            Self::Gender => "Gender",
        }
    }

    /// Allowed answers, in display order.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Age => &[
                "<18", "18-24", "25-34", "35-44", "45-54", "55-64", ">=65", "unknown",
            ],
            Self::EduLevel => &["Podstawowe", "Średnie", "Wyższe"],
            Self::FavAnimals => &["Brak ulubionych", "Psy", "Koty", "Inne", "Koty i Psy"],
            Self::FavPlace => &["Nad wodą", "W lesie", "W górach", "Inne"],
            Self::Gender => &["Mężczyzna", "Kobieta"],
        }
    }

    /// Position of `value` among [`options`](Field::options).
    pub fn rank(&self, value: &str) -> Option<usize> {
        self.options().iter().position(|o| *o == value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or_else(|| SurveyError::UnknownField(s.to_string()))
    }
}

/// The answers fed to the classifier.
///
/// # Example
///
/// ```rust
/// use cluster_feedback::survey::{Field, SurveyRecord};
///
/// let mut record = SurveyRecord::default();
/// assert_eq!(record.get(Field::Age), "<18");
///
/// record.set(Field::Age, "25-34").unwrap();
/// assert_eq!(record.get(Field::Age), "25-34");
/// assert!(record.set(Field::Age, "ancient").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub age: String,
    pub edu_level: String,
    pub fav_animals: String,
    pub fav_place: String,
    pub gender: String,
}

impl SurveyRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Age => &self.age,
            Field::EduLevel => &self.edu_level,
            Field::FavAnimals => &self.fav_animals,
            Field::FavPlace => &self.fav_place,
            Field::Gender => &self.gender,
        }
    }

    /// Set an answer, refusing values outside the field's options.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), SurveyError> {
        let Some(rank) = field.rank(value) else {
            return Err(SurveyError::InvalidAnswer {
                field: field.column(),
                value: value.to_string(),
            });
        };
        let value = field.options()[rank].to_string();
        match field {
            Field::Age => self.age = value,
            Field::EduLevel => self.edu_level = value,
            Field::FavAnimals => self.fav_animals = value,
            Field::FavPlace => self.fav_place = value,
            Field::Gender => self.gender = value,
        }
        Ok(())
    }
}

impl Default for SurveyRecord {
    /// First option of every field.
    fn default() -> Self {
        Self {
            age: Field::Age.options()[0].to_string(),
            edu_level: Field::EduLevel.options()[0].to_string(),
            fav_animals: Field::FavAnimals.options()[0].to_string(),
            fav_place: Field::FavPlace.options()[0].to_string(),
            gender: Field::Gender.options()[0].to_string(),
        }
    }
}
