//! Process configuration.
//!
//! Values come from the environment, after loading a `.env` file from the
//! working directory if there is one. Only the note store credentials are
//! secret; everything else has a default.

use crate::qdrant::QdrantConfig;
use crate::validation::CommentRules;
use std::path::PathBuf;
use thiserror::Error;

pub const QDRANT_URL: &str = "QDRANT_URL";
pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";
pub const QDRANT_COLLECTION: &str = "QDRANT_COLLECTION";
pub const SURVEY_DATA: &str = "SURVEY_DATA";
pub const CLUSTER_DESCRIPTIONS: &str = "CLUSTER_DESCRIPTIONS";
pub const CLUSTER_MODEL: &str = "CLUSTER_MODEL";
pub const FEEDBACK_MAX_CHARS: &str = "FEEDBACK_MAX_CHARS";
pub const NOTE_STORE_MAX_RETRIES: &str = "NOTE_STORE_MAX_RETRIES";

const DEFAULT_COLLECTION: &str = "user_feedback";
const DEFAULT_SURVEY_DATA: &str = "welcome_survey_simple_v2.csv";
const DEFAULT_CLUSTER_DESCRIPTIONS: &str = "welcome_survey_cluster_names_and_descriptions_v3.json";
const DEFAULT_CLUSTER_MODEL: &str = "welcome_survey_clustering_profiles_v3.json";
const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Where comments go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteStoreSettings {
    /// No URL configured: keep comments in memory for this process only.
    InMemory,
    Qdrant {
        url: String,
        api_key: Option<String>,
        collection: String,
        max_retries: u32,
    },
}

impl NoteStoreSettings {
    /// Qdrant connection settings, if a Qdrant store is configured.
    pub fn qdrant_config(&self) -> Option<QdrantConfig> {
        match self {
            Self::InMemory => None,
            Self::Qdrant {
                url,
                api_key,
                collection,
                max_retries,
            } => Some(QdrantConfig {
                url: url.clone(),
                api_key: api_key.clone(),
                collection: collection.clone(),
                max_retries: *max_retries,
                ..QdrantConfig::default()
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub note_store: NoteStoreSettings,
    pub survey_data: PathBuf,
    pub cluster_descriptions: PathBuf,
    pub cluster_model: PathBuf,
    /// Comment length limit. Unset means no limit.
    pub max_comment_chars: Option<usize>,
}

impl Settings {
    /// Load `.env` (if present), then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is normal; variables may come from the environment.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let path = |name: &str, default: &str| PathBuf::from(var(name).unwrap_or_else(|| default.to_string()));

        let note_store = match var(QDRANT_URL) {
            None => NoteStoreSettings::InMemory,
            Some(url) => NoteStoreSettings::Qdrant {
                url,
                api_key: var(QDRANT_API_KEY),
                collection: var(QDRANT_COLLECTION).unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
                max_retries: number(NOTE_STORE_MAX_RETRIES, var(NOTE_STORE_MAX_RETRIES))?
                    .unwrap_or(DEFAULT_MAX_RETRIES),
            },
        };

        Ok(Self {
            note_store,
            survey_data: path(SURVEY_DATA, DEFAULT_SURVEY_DATA),
            cluster_descriptions: path(CLUSTER_DESCRIPTIONS, DEFAULT_CLUSTER_DESCRIPTIONS),
            cluster_model: path(CLUSTER_MODEL, DEFAULT_CLUSTER_MODEL),
            max_comment_chars: number(FEEDBACK_MAX_CHARS, var(FEEDBACK_MAX_CHARS))?,
        })
    }

    pub fn comment_rules(&self) -> CommentRules {
        match self.max_comment_chars {
            Some(max) => CommentRules::new().max_chars(max),
            None => CommentRules::new(),
        }
    }
}

fn number<T: std::str::FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value: v.clone() })
        })
        .transpose()
}
