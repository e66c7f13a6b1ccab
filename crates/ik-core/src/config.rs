//! Scene and solver configuration
//!
//! Configuration is stored as RON. Every field has a default, so a partial
//! file (or an empty `()`) yields the reference two-arm scene.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FRAME_COUNT, DEFAULT_SEGMENTS_PER_CHAIN, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH, LINK_LENGTH_DIVISOR,
};
use crate::solver::SolverParams;

const fn default_width() -> f64 {
    DEFAULT_VIEWPORT_WIDTH
}
const fn default_height() -> f64 {
    DEFAULT_VIEWPORT_HEIGHT
}
const fn default_segments_per_chain() -> usize {
    DEFAULT_SEGMENTS_PER_CHAIN
}
const fn default_frames() -> u32 {
    DEFAULT_FRAME_COUNT
}

/// Viewport and chain layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Viewport width; the left chain owns the left half
    #[serde(default = "default_width")]
    pub width: f64,
    /// Viewport height
    #[serde(default = "default_height")]
    pub height: f64,
    /// Number of segments in each chain
    #[serde(default = "default_segments_per_chain")]
    pub segments_per_chain: usize,
    /// Length of every segment; `None` means `height / 8`
    #[serde(default)]
    pub link_length: Option<f64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            segments_per_chain: default_segments_per_chain(),
            link_length: None,
        }
    }
}

impl SceneConfig {
    /// Segment length actually used when building chains
    pub fn link_length(&self) -> f64 {
        self.link_length.unwrap_or(self.height / LINK_LENGTH_DIVISOR)
    }
}

/// A pointer click replayed by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedClick {
    /// Frame at whose start the click is applied
    pub frame: u32,
    pub x: f64,
    pub y: f64,
}

/// Complete configuration for the two-arm scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub solver: SolverParams,
    /// Clicks to replay, in any order
    #[serde(default)]
    pub script: Vec<ScriptedClick>,
    /// Number of frames the driver runs
    #[serde(default = "default_frames")]
    pub frames: u32,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            solver: SolverParams::default(),
            script: Vec::new(),
            frames: default_frames(),
        }
    }
}

impl IkConfig {
    /// Check every value the solvers and scene depend on
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("scene.width", self.scene.width)?;
        positive("scene.height", self.scene.height)?;
        if self.scene.segments_per_chain == 0 {
            return Err(ConfigError::invalid(
                "scene.segments_per_chain",
                "must be at least 1",
            ));
        }
        positive("scene.link_length", self.scene.link_length())?;

        let params = &self.solver;
        positive("solver.tolerance", params.tolerance)?;
        positive("solver.stall_epsilon", params.stall_epsilon)?;
        positive("solver.ccd_step", params.ccd_step)?;
        positive("solver.jacobian_step", params.jacobian_step)?;
        positive("solver.jacobian_scale", params.jacobian_scale)?;

        for click in &self.script {
            if !click.x.is_finite() || !click.y.is_finite() {
                return Err(ConfigError::invalid(
                    "script",
                    format!("click at frame {} has a non-finite position", click.frame),
                ));
            }
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_string_pretty()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Serialize configuration to pretty RON
    pub fn to_string_pretty(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load and validate configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::load_from_str(&content)
    }

    /// Parse and validate configuration from RON text
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        let config: IkConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
