//! Operator settings: the optional settings file that seeds the form, and the
//! per-run form input that becomes a [`RunConfig`].

use crate::{
    ConfigError, CoreError, RedditCredentials, RunConfig, DEFAULT_POST_LIMIT, DEFAULT_USER_AGENT,
    MAX_POST_LIMIT, MIN_POST_LIMIT,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SETTINGS_FILE_NAME: &str = "reddit-research.toml";
pub const SETTINGS_PATH_ENV: &str = "REDDIT_RESEARCH_CONFIG";
pub const DEFAULT_EXPORT_FILE: &str = "reddit_insights.csv";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub user_agent: String,
    pub communities: Vec<String>,
    pub keywords: Vec<String>,
    pub post_limit: u32,
    pub export_path: PathBuf,
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            communities: vec![
                "Entrepreneur".to_string(),
                "marketing".to_string(),
                "startups".to_string(),
            ],
            keywords: vec![
                "hate".to_string(),
                "problem".to_string(),
                "wish".to_string(),
                "annoying".to_string(),
                "frustrating".to_string(),
            ],
            post_limit: DEFAULT_POST_LIMIT,
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
            log_filter: None,
        }
    }
}

impl Settings {
    /// Loads settings from `$REDDIT_RESEARCH_CONFIG`, else from
    /// `reddit-research.toml` in the working directory, else defaults.
    ///
    /// An explicitly configured path that does not exist is an error; a
    /// missing default file is not.
    pub fn load() -> Result<Self, CoreError> {
        match std::env::var_os(SETTINGS_PATH_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => {
                let path = Path::new(SETTINGS_FILE_NAME);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    debug!("No {} found, using default settings", SETTINGS_FILE_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CoreError::Io(e)
            }
        })?;

        let settings = Self::from_toml_str(&contents)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_post_limit(self.post_limit)?;
        if self.export_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export_path".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }
}

/// Raw form input for one "Run Research" action.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub communities: String,
    pub keywords: String,
    pub post_limit: u32,
    pub llm_api_key: String,
}

impl RunRequest {
    /// A form prefilled with the settings' defaults and no credentials.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: settings.user_agent.clone(),
            communities: settings.communities.join(","),
            keywords: settings.keywords.join(","),
            post_limit: settings.post_limit,
            llm_api_key: String::new(),
        }
    }

    pub fn to_config(&self) -> Result<RunConfig, CoreError> {
        let client_id = self.client_id.trim();
        if client_id.is_empty() {
            return Err(CoreError::MissingCredentials {
                field: "client_id".to_string(),
            });
        }
        let client_secret = self.client_secret.trim();
        if client_secret.is_empty() {
            return Err(CoreError::MissingCredentials {
                field: "client_secret".to_string(),
            });
        }

        let user_agent = match self.user_agent.trim() {
            "" => DEFAULT_USER_AGENT,
            agent => agent,
        };

        let communities = parse_list(&self.communities);
        if communities.is_empty() {
            return Err(ConfigError::MissingField {
                field: "communities".to_string(),
            }
            .into());
        }
        let keywords = parse_list(&self.keywords);
        if keywords.is_empty() {
            return Err(ConfigError::MissingField {
                field: "keywords".to_string(),
            }
            .into());
        }

        validate_post_limit(self.post_limit)?;

        Ok(RunConfig {
            credentials: RedditCredentials::new(
                client_id.to_string(),
                client_secret.to_string(),
                user_agent.to_string(),
            ),
            communities,
            keywords,
            post_limit: self.post_limit,
        })
    }

    /// The language-model key, if one was entered.
    pub fn summary_key(&self) -> Option<&str> {
        match self.llm_api_key.trim() {
            "" => None,
            key => Some(key),
        }
    }
}

/// Splits comma-separated input, trimming entries and dropping empty ones.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_post_limit(limit: u32) -> Result<(), ConfigError> {
    if (MIN_POST_LIMIT..=MAX_POST_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: "post_limit".to_string(),
            value: limit.to_string(),
        })
    }
}
