//! Configuration management for metmasker.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MaskerError, Result};
use crate::raster::Geometry;

/// Command-line arguments for metmasker
#[derive(Parser, Debug)]
#[command(name = "metmasker")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to JSON configuration file
    #[arg(short, long, env = "METMASKER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "METMASKER_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Report format (text or json)
    #[arg(short, long, env = "METMASKER_FORMAT", global = true)]
    pub format: Option<String>,
}

/// What to run
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sum rainfall (mm) of met color images inside a mask
    TotalMet {
        /// Mask image; pixels with a nonzero first channel are inside
        #[arg(short, long)]
        mask: PathBuf,
        /// Met color images
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Sum rainfall (mm) of converted grayscale images inside a mask
    TotalGray {
        /// Mask image; pixels with a nonzero first channel are inside
        #[arg(short, long)]
        mask: PathBuf,
        /// Grayscale images
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Count masked pixels per rainfall channel of a grayscale image
    Channels {
        /// Mask image
        #[arg(short, long)]
        mask: PathBuf,
        /// Grayscale image
        file: PathBuf,
    },

    /// Summarise the millimetre grid of a grayscale image
    Grid {
        /// Optional mask; without one the whole frame is used
        #[arg(short, long)]
        mask: Option<PathBuf>,
        /// Grayscale image
        file: PathBuf,
    },

    /// Convert a met color image to a grayscale PNG
    Convert {
        /// Met color image
        input: PathBuf,
        /// Destination PNG
        output: PathBuf,
    },

    /// Show the layout of an image, and its mask bounds with --as-mask
    Inspect {
        /// Image to inspect
        file: PathBuf,
        /// Also compute the mask bounding box
        #[arg(long)]
        as_mask: bool,
    },
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format, `text` or `json`
    #[serde(default = "default_format")]
    pub format: String,

    /// Pretty-print JSON reports
    #[serde(default)]
    pub pretty: bool,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Frame size and bit depth every input must have
    #[serde(default)]
    pub geometry: Geometry,

    /// Report configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Some(format) = args.format {
            config.output.format = format;
        }

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.geometry = other.geometry;
        self.output = other.output;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.geometry.width == 0 || self.geometry.height == 0 {
            return Err(MaskerError::Config {
                message: format!("Geometry must be non-empty, got {}", self.geometry),
            });
        }

        if self.geometry.bit_depth != 8 {
            return Err(MaskerError::Config {
                message: format!(
                    "Unsupported bit depth: {}. Only 8-bit images are supported",
                    self.geometry.bit_depth
                ),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(MaskerError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Validate report format
        match self.output.format.as_str() {
            "text" | "json" => {}
            _ => {
                return Err(MaskerError::Config {
                    message: format!(
                        "Invalid output format: {}. Must be one of: text, json",
                        self.output.format
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            pretty: false,
        }
    }
}

// Default value functions for serde
fn default_format() -> String {
    "text".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
