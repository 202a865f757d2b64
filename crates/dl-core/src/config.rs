//! Translator configuration, loaded from `sql2dl.yml`

use crate::error::{CoreError, CoreResult};
use crate::names::{RelationName, TableName, TypeName};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main translator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQL dialect used to parse statement text
    #[serde(default)]
    pub dialect: Dialect,

    /// How relation and type names are derived from table names
    #[serde(default)]
    pub naming: NamingConfig,

    /// Where the operator library (`sqlop.dl`) is written
    #[serde(default = "default_library_path")]
    pub library_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            naming: NamingConfig::default(),
            library_path: default_library_path(),
        }
    }
}

/// SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB SQL dialect
    #[default]
    DuckDb,
    /// sqlparser's permissive generic dialect
    Generic,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Generic => write!(f, "generic"),
        }
    }
}

/// Prefixes used to derive DDlog declaration names.
///
/// A table `t1` becomes relation `<relation_prefix>t1` of record type
/// `<type_prefix>t1`. Bare `SELECT` statements are named
/// `<query_prefix><n>` before the prefixes are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    #[serde(default = "default_relation_prefix")]
    pub relation_prefix: String,

    #[serde(default = "default_type_prefix")]
    pub type_prefix: String,

    #[serde(default = "default_query_prefix")]
    pub query_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            relation_prefix: default_relation_prefix(),
            type_prefix: default_type_prefix(),
            query_prefix: default_query_prefix(),
        }
    }
}

impl NamingConfig {
    /// Relation name for a table or view
    pub fn relation_name(&self, table: &TableName) -> RelationName {
        RelationName::new(format!("{}{}", self.relation_prefix, table))
    }

    /// Record type name for a table or view
    pub fn type_name(&self, table: &TableName) -> TypeName {
        TypeName::new(format!("{}{}", self.type_prefix, table))
    }

    /// Name of the `index`-th anonymous query
    pub fn query_name(&self, index: usize) -> TableName {
        TableName::new(format!("{}{}", self.query_prefix, index))
    }
}

fn default_relation_prefix() -> String {
    "R".to_string()
}

fn default_type_prefix() -> String {
    "T".to_string()
}

fn default_query_prefix() -> String {
    "query".to_string()
}

fn default_library_path() -> String {
    "lib/sqlop.dl".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a directory containing `sql2dl.yml` or `sql2dl.yaml`
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("sql2dl.yml");
        let yaml_path = dir.join("sql2dl.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        // DDlog relation and type names must start with an uppercase letter
        for (key, prefix) in [
            ("naming.relation_prefix", &self.naming.relation_prefix),
            ("naming.type_prefix", &self.naming.type_prefix),
        ] {
            if !prefix.starts_with(|c: char| c.is_ascii_uppercase()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{key} must start with an uppercase ASCII letter, got '{prefix}'"),
                });
            }
        }

        if self.naming.relation_prefix == self.naming.type_prefix {
            log::warn!(
                "Relation and type prefixes are both '{}'; DDlog accepts this but the output is hard to read",
                self.naming.relation_prefix
            );
        }

        if self.naming.query_prefix.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "naming.query_prefix cannot be empty".to_string(),
            });
        }

        if self.library_path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "library_path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Library output path, resolved against `root` when relative
    pub fn library_path_absolute(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.library_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
