//! Configuration for the custom info engine
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! template = "Speed: {Player.Speed}"
//! decimals = 3
//! round_values = true
//! frame_rate = 60.0
//!
//! [aliases]
//! "Theo@" = "TheoCrystal@"
//!
//! [precision_overrides]
//! types = ["Celeste.Actor", "Celeste.Platform"]
//! members = ["ExactPosition", "get_ExactPosition()"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::template::FormatOptions;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

const DEFAULT_TEMPLATE: &str = "Wind: {Level.Wind}\n\
AutoJump: {Player.AutoJump} ({Player.AutoJumpTimer.toFrame()})\n\
ForceMoveX: {Player.forceMoveX} ({Player.forceMoveXTimer.toFrame()})\n\
Theo: {TheoCrystal.ExactPosition}\n\
TheoCantGrab: {TheoCrystal.Hold.cannotHoldTimer.toFrame()}";

/// Member tokens that read a higher-precision position on specific host types
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrecisionOverrides {
    /// Base types (full names) whose instances get the override
    pub types: Vec<String>,
    /// Member tokens, exactly as written in expressions
    pub members: Vec<String>,
}

impl Default for PrecisionOverrides {
    fn default() -> Self {
        Self {
            types: vec!["Celeste.Actor".to_string(), "Celeste.Platform".to_string()],
            members: vec![
                "ExactPosition".to_string(),
                "get_ExactPosition()".to_string(),
            ],
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    /// Template rendered by `get_info`
    pub template: String,
    /// Decimal places for floating point values
    pub decimals: usize,
    /// When false, floats are printed at full precision
    pub round_values: bool,
    /// Simulation frames per second
    pub frame_rate: f32,
    /// Type reference rewrites, keyed by `name@assembly`
    pub aliases: BTreeMap<String, String>,
    pub precision_overrides: PrecisionOverrides,
}

impl Default for InfoConfig {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("Theo@".to_string(), "TheoCrystal@".to_string());
        aliases.insert("Jellyfish@".to_string(), "Glider@".to_string());
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            decimals: 2,
            round_values: true,
            frame_rate: 60.0,
            aliases,
            precision_overrides: PrecisionOverrides::default(),
        }
    }
}

impl InfoConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the template rendered by `get_info`
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Set the number of decimal places
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Enable or disable rounding of floating point values
    pub fn with_round_values(mut self, round: bool) -> Self {
        self.round_values = round;
        self
    }

    /// Set the frame rate used by unit conversion helpers
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Add a type alias, e.g. `("Theo@", "TheoCrystal@")`
    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    /// Format options for a render at `decimals` places
    pub fn format_options(&self, decimals: usize) -> FormatOptions {
        FormatOptions {
            decimals,
            round_values: self.round_values,
            frame_rate: self.frame_rate,
        }
    }
}
