/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Runtime configuration for the catalog backend.
//!
//! Configuration is TOML with environment-variable substitution in the
//! `${VAR}` / `${VAR:-default}` forms. Every section has defaults, so an
//! empty file (or no file at all) yields a working development setup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Environment variable substitution failed: {0}")]
    EnvSubstitutionError(String),
}

/// Top-level configuration for the catalog backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub import: ImportConfig,
    pub drafts: DraftConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite path or `file:` URL for the catalog database.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Base URL under which manually uploaded artifacts are served.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Upper bound on a single round-trip to an external repository.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Age after which abandoned drafts become eligible for eviction.
    pub ttl_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            uploads: UploadConfig::default(),
            import: ImportConfig::default(),
            drafts: DraftConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "${ADDONHUB_DATABASE_URL:-addonhub.db}".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: "/uploads".to_string(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        // One day: long enough to survive a lunch break, short enough that
        // abandoned drafts do not pile up.
        Self { ttl_secs: 86_400 }
    }
}

impl PortalConfig {
    /// Loads configuration from a TOML file, applying environment-variable
    /// substitution and a `.env` file if one is present.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string with `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let substituted = substitute_env_vars(content)?;
        let mut config: PortalConfig = toml::from_str(&substituted)?;
        // The database URL default carries a substitution expression itself.
        config.database.url = substitute_env_vars(&config.database.url)?;
        Ok(config)
    }

    /// Resolved import timeout.
    pub fn import_timeout(&self) -> Duration {
        Duration::from_secs(self.import.timeout_secs)
    }

    /// Resolved draft time-to-live.
    pub fn draft_ttl(&self) -> Duration {
        Duration::from_secs(self.drafts.ttl_secs)
    }
}

/// Substitutes `${VAR}` and `${VAR:-default}` expressions with values from
/// the process environment.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    let mut result = content.to_string();

    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_expr = &cap[1];

        let replacement = if let Some((name, default)) = var_expr.split_once(":-") {
            env::var(name).unwrap_or_else(|_| default.to_string())
        } else {
            env::var(var_expr).map_err(|_| {
                ConfigError::EnvSubstitutionError(format!(
                    "environment variable '{}' is not set and has no default",
                    var_expr
                ))
            })?
        };
        result = result.replace(full_match, &replacement);
    }

    Ok(result)
}
