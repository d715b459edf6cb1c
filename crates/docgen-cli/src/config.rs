//! Configuration file handling

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "docgen.toml";

/// Configuration for docgen
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory to scan
    pub root: Option<String>,

    /// Directory the document is written to
    pub output: Option<String>,

    /// Document format (markdown, json)
    pub format: Option<String>,

    /// SQL dialect (postgresql, mysql)
    pub dialect: Option<String>,

    /// Continue past Go files that fail to parse
    #[serde(default)]
    pub keep_going: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try to find and load docgen.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let current_dir = std::env::current_dir().into_diagnostic()?;
        Self::find_from(current_dir)
    }

    fn find_from(mut dir: PathBuf) -> Result<Option<Self>> {
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(Some(Self::from_file(&config_path)?));
            }

            // Try parent directory
            if !dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(
        mut self,
        root: Option<&Path>,
        output: Option<&Path>,
        format: Option<crate::args::DocumentFormat>,
        dialect: Option<&str>,
        keep_going: bool,
    ) -> Self {
        if let Some(root) = root {
            self.root = Some(root.display().to_string());
        }

        if let Some(output) = output {
            self.output = Some(output.display().to_string());
        }

        if let Some(fmt) = format {
            self.format = Some(format!("{:?}", fmt).to_lowercase());
        }

        if let Some(dialect) = dialect {
            self.dialect = Some(dialect.to_string());
        }

        self.keep_going |= keep_going;

        self
    }
}
