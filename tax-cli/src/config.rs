//! Optional TOML configuration.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! file = "tax.log"
//!
//! [tables]
//! standard_deductions = "data/standard_deductions.csv"
//! brackets = "data/tax_brackets.csv"
//! ```
//!
//! Every key is optional. Relative paths are resolved against the directory
//! holding the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tax_core::TaxTables;
use tax_data::TaxTableLoader;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub tables: TablesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Any `EnvFilter` directive, e.g. `"debug"` or `"tax_core=trace,warn"`.
    pub level: Option<String>,
    /// Append log records to this file in addition to stderr.
    pub file: Option<PathBuf>,
}

/// Replacement tables. Both files must be given, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub standard_deductions: Option<PathBuf>,
    pub brackets: Option<PathBuf>,
}

impl AppConfig {
    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base_dir))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Makes relative paths relative to `base_dir`.
    pub fn resolve_paths(
        mut self,
        base_dir: &Path,
    ) -> Self {
        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(p) = path.as_mut() {
                if p.is_relative() {
                    *p = base_dir.join(&*p);
                }
            }
        };

        resolve(&mut self.logging.file);
        resolve(&mut self.tables.standard_deductions);
        resolve(&mut self.tables.brackets);
        self
    }
}

impl TablesConfig {
    /// Loads the configured replacement tables, or `None` to use the
    /// built-in federal tables.
    pub fn load(&self) -> Result<Option<TaxTables>> {
        match (&self.standard_deductions, &self.brackets) {
            (None, None) => Ok(None),
            (Some(standard_deductions), Some(brackets)) => {
                let tables = TaxTableLoader::load(standard_deductions, brackets)
                    .context("failed to load configured tax tables")?;
                Ok(Some(tables))
            }
            _ => bail!("tables.standard_deductions and tables.brackets must be configured together"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn parses_all_sections() {
        let toml = r#"
            [logging]
            level = "debug"
            file = "tax.log"

            [tables]
            standard_deductions = "deductions.csv"
            brackets = "brackets.csv"
        "#;

        let config = AppConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, Some(PathBuf::from("tax.log")));
        assert_eq!(
            config.tables.standard_deductions,
            Some(PathBuf::from("deductions.csv"))
        );
        assert_eq!(config.tables.brackets, Some(PathBuf::from("brackets.csv")));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = AppConfig::from_toml_str("[logging]\nverbosity = 3\n");

        assert!(result.is_err());
    }

    #[test]
    fn resolves_relative_paths_against_base_dir() {
        let config = AppConfig::from_toml_str("[tables]\nbrackets = \"b.csv\"\n")
            .unwrap()
            .resolve_paths(Path::new("/etc/tax"));

        assert_eq!(config.tables.brackets, Some(PathBuf::from("/etc/tax/b.csv")));
    }

    #[test]
    fn keeps_absolute_paths() {
        let config = AppConfig::from_toml_str("[logging]\nfile = \"/var/log/tax.log\"\n")
            .unwrap()
            .resolve_paths(Path::new("/etc/tax"));

        assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/tax.log")));
    }

    #[test]
    fn no_tables_means_built_in() {
        let tables = TablesConfig::default().load().unwrap();

        assert!(tables.is_none());
    }

    #[test]
    fn half_configured_tables_are_rejected() {
        let config = TablesConfig {
            standard_deductions: None,
            brackets: Some(PathBuf::from("brackets.csv")),
        };

        let err = config.load().unwrap_err();

        assert!(err.to_string().contains("must be configured together"));
    }
}
