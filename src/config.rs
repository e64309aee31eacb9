//! Run configuration.
//!
//! A conversion run is configured from a TOML file. Every section and every
//! key is optional:
//!
//! ```toml
//! [extract]
//! dimension = 2
//! model_name = "rectangle"
//!
//! [output]
//! root = "output"
//! timestamped = true
//! format = "vtu"
//!
//! [logging]
//! level = "info"
//! log_file = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::extract::MAX_DIMENSION;
use crate::io::Format;

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RipplConfig {
    /// What to extract from the kernel.
    pub extract: ExtractConfig,
    /// Where and how to write results.
    pub output: OutputConfig,
    /// Log verbosity and destinations.
    pub logging: LoggingConfig,
}

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Spatial dimension of the elements to extract.
    #[serde(default = "default_dimension")]
    pub dimension: u8,
    /// Model name for the kernel session.
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory that receives run outputs.
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
    /// Write each run into a fresh timestamped subdirectory of `root`.
    #[serde(default = "default_true")]
    pub timestamped: bool,
    /// Grid file format.
    #[serde(default = "default_format")]
    pub format: Format,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Maximum level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Mirror log output into `app.log` in the output directory.
    #[serde(default = "default_true")]
    pub log_file: bool,
}

fn default_dimension() -> u8 {
    2
}

fn default_model_name() -> String {
    "model".to_string()
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

fn default_true() -> bool {
    true
}

fn default_format() -> Format {
    Format::Vtu
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            model_name: default_model_name(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            timestamped: default_true(),
            format: default_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file: default_true(),
        }
    }
}

impl LoggingConfig {
    /// Parsed log level.
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| MeshError::Config(format!("unknown log level '{}'", self.level)))
    }
}

impl RipplConfig {
    /// Load and validate a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            MeshError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        contents.parse()
    }

    /// Check values serde cannot check.
    pub fn validate(&self) -> Result<()> {
        if self.extract.dimension > MAX_DIMENSION {
            return Err(MeshError::Config(format!(
                "extract.dimension must be at most {}, got {}",
                MAX_DIMENSION, self.extract.dimension
            )));
        }
        if self.extract.model_name.trim().is_empty() {
            return Err(MeshError::Config(
                "extract.model_name must not be empty".to_string(),
            ));
        }
        if self.output.format == Format::Msh {
            return Err(MeshError::Config(
                "output.format must be vtk or vtu".to_string(),
            ));
        }
        self.logging.level_filter()?;
        Ok(())
    }

    /// Create the directory for this run's outputs.
    ///
    /// With `timestamped` set this is `root/<local time>`, otherwise `root`
    /// itself.
    pub fn set_up_output_dir(&self) -> Result<PathBuf> {
        let dir = if self.output.timestamped {
            let stamp = Local::now().format("%Y-%m-%dT%H-%M-%S%.6f").to_string();
            self.output.root.join(stamp)
        } else {
            self.output.root.clone()
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl FromStr for RipplConfig {
    type Err = MeshError;

    /// Parse and validate TOML text.
    fn from_str(s: &str) -> Result<Self> {
        let config: RipplConfig =
            toml::from_str(s).map_err(|e| MeshError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
