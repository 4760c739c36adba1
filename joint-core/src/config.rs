use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, joint::validate_constraints, types::Rgba};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_radius() -> f32 {
    25.0
}
const fn default_stretch_limit() -> f32 {
    1.10
}
const fn default_retract_limit() -> f32 {
    0.90
}
const fn default_color() -> Rgba {
    [1.0, 0.0, 0.0, 1.0]
}
const fn default_segments() -> usize {
    19
}
const fn default_root_radius() -> f32 {
    45.0
}
const fn default_radius_step() -> f32 {
    1.0
}
const fn default_min_radius() -> f32 {
    4.0
}
const fn default_root_color() -> Rgba {
    [0.2, 0.0, 0.0, 1.0]
}
const fn default_head_color() -> Rgba {
    [1.0, 0.0, 1.0, 1.0]
}
const fn default_fade_color() -> Rgba {
    [0.5, 0.1, 0.4, 1.0]
}
const fn default_follow_speed() -> f32 {
    12.0
}
const fn default_true() -> bool {
    true
}
const fn default_joints() -> usize {
    40
}
const fn default_max_children() -> usize {
    3
}
const fn default_random_min_radius() -> f32 {
    8.0
}
const fn default_random_max_radius() -> f32 {
    30.0
}

// ---------------------------------------------------------------------------
// JointConfig
// ---------------------------------------------------------------------------

/// Parameters of a single joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    /// Joint radius; the annulus scales with it (default: 25).
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Maximum child distance as a multiple of `radius` (default: 1.10).
    #[serde(default = "default_stretch_limit")]
    pub stretch_limit: f32,

    /// Minimum child distance as a multiple of `radius` (default: 0.90).
    #[serde(default = "default_retract_limit")]
    pub retract_limit: f32,

    /// RGBA handed to the renderer.
    #[serde(default = "default_color")]
    pub color: Rgba,
}

impl Default for JointConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            stretch_limit: default_stretch_limit(),
            retract_limit: default_retract_limit(),
            color: default_color(),
        }
    }
}

impl JointConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_constraints(self.radius, self.stretch_limit, self.retract_limit)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// A tapered chain: a root followed by `segments` links whose radius
/// shrinks by `radius_step` per link, down to `min_radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of links after the root (default: 19).
    #[serde(default = "default_segments")]
    pub segments: usize,

    #[serde(default = "default_root_radius")]
    pub root_radius: f32,

    #[serde(default = "default_radius_step")]
    pub radius_step: f32,

    /// Links never get smaller than this.
    #[serde(default = "default_min_radius")]
    pub min_radius: f32,

    #[serde(default = "default_stretch_limit")]
    pub stretch_limit: f32,

    #[serde(default = "default_retract_limit")]
    pub retract_limit: f32,

    #[serde(default = "default_root_color")]
    pub root_color: Rgba,

    /// Color the fade starts from.
    #[serde(default = "default_head_color")]
    pub head_color: Rgba,

    /// Color the fade heads toward. Link `i` gets
    /// `head + (fade - head) * i / (segments + 1)`, so the last link stops
    /// one step short of it.
    #[serde(default = "default_fade_color")]
    pub fade_color: Rgba,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            root_radius: default_root_radius(),
            radius_step: default_radius_step(),
            min_radius: default_min_radius(),
            stretch_limit: default_stretch_limit(),
            retract_limit: default_retract_limit(),
            root_color: default_root_color(),
            head_color: default_head_color(),
            fade_color: default_fade_color(),
        }
    }
}

impl ChainConfig {
    /// Parses a chain description from TOML and validates it.
    ///
    /// Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_constraints(self.root_radius, self.stretch_limit, self.retract_limit)?;
        validate_constraints(self.min_radius, self.stretch_limit, self.retract_limit)?;
        if !(self.radius_step >= 0.0 && self.radius_step.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "radius_step",
                message: format!("must be finite and >= 0, got {}", self.radius_step),
            });
        }
        Ok(())
    }

    /// Radius of link `i` (1-based; `0` is the root).
    pub fn radius_at(&self, i: usize) -> f32 {
        (self.root_radius - self.radius_step * i as f32).max(self.min_radius)
    }
}

// ---------------------------------------------------------------------------
// RandomTreeConfig
// ---------------------------------------------------------------------------

/// Parameters for [`crate::builder::random_tree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomTreeConfig {
    /// Total number of joints including the root (default: 40).
    #[serde(default = "default_joints")]
    pub joints: usize,

    /// Upper bound on children per joint (default: 3).
    #[serde(default = "default_max_children")]
    pub max_children: usize,

    #[serde(default = "default_random_min_radius")]
    pub min_radius: f32,

    #[serde(default = "default_random_max_radius")]
    pub max_radius: f32,

    #[serde(default = "default_stretch_limit")]
    pub stretch_limit: f32,

    #[serde(default = "default_retract_limit")]
    pub retract_limit: f32,
}

impl Default for RandomTreeConfig {
    fn default() -> Self {
        Self {
            joints: default_joints(),
            max_children: default_max_children(),
            min_radius: default_random_min_radius(),
            max_radius: default_random_max_radius(),
            stretch_limit: default_stretch_limit(),
            retract_limit: default_retract_limit(),
        }
    }
}

impl RandomTreeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_constraints(self.min_radius, self.stretch_limit, self.retract_limit)?;
        validate_constraints(self.max_radius, self.stretch_limit, self.retract_limit)?;
        if self.min_radius > self.max_radius {
            return Err(ConfigError::InvalidValue {
                field: "min_radius",
                message: format!(
                    "{} exceeds max_radius {}",
                    self.min_radius, self.max_radius
                ),
            });
        }
        if self.joints == 0 {
            return Err(ConfigError::InvalidValue {
                field: "joints",
                message: "a tree needs at least its root".into(),
            });
        }
        if self.max_children == 0 && self.joints > 1 {
            return Err(ConfigError::InvalidValue {
                field: "max_children",
                message: "must be >= 1 to place more than one joint".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FollowConfig
// ---------------------------------------------------------------------------

/// How the anchor follows the host's target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowConfig {
    /// Interpolate toward the target; `false` jumps straight to it.
    #[serde(default = "default_true")]
    pub smooth: bool,

    /// Fraction of the remaining distance covered per second (default: 12).
    #[serde(default = "default_follow_speed")]
    pub speed: f32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            smooth: default_true(),
            speed: default_follow_speed(),
        }
    }
}

impl FollowConfig {
    /// Parses follow settings from TOML and validates them.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `speed` must be finite and positive, whether or not `smooth` is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "speed",
                message: format!("must be finite and > 0, got {}", self.speed),
            });
        }
        Ok(())
    }
}
