#![forbid(unsafe_code)]

//! Container configuration as data.
//!
//! [`SortableConfig`] groups every tunable of a sortable container and can
//! be loaded from TOML or JSON with the `config-files` feature.
//!
//! ```toml
//! activation_delay_ms = 200
//! movement_tolerance_px = 5.0
//! axis = "grid"
//! grid_columns = 3
//!
//! [drop_animation]
//! duration_ms = 180
//! easing = "ease_out"
//! ghost_opacity = 0.5
//! ```
//!
//! ```rust,ignore
//! let config = SortableConfig::from_toml_file("sortable.toml")?;
//! ```
//!
//! # Defaults
//!
//! Immediate activation, vertical list, closest-center resolution with no
//! proximity limit, 250 ms `ease` drop animation, ghost opacity 0.4,
//! announcements on.

#[cfg(feature = "config-files")]
use std::path::Path;

use dndsort_core::geometry::Orientation;
use dndsort_core::sensor::{ActivationConstraint, Arrangement};
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionMetric, CollisionResolver};
use crate::overlay::DropAnimation;

/// Layout family of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    List,
    Grid,
}

/// Sortable container configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableConfig {
    /// Press-and-hold time before a pointer drag starts. 0 disables.
    pub activation_delay_ms: u64,
    /// Distance a pointer may travel (delay mode) or must travel (distance
    /// mode) before activation.
    pub movement_tolerance_px: f32,
    pub axis: Axis,
    /// Main axis for lists; ignored for grids.
    pub orientation: Orientation,
    /// Columns for keyboard row steps in grid mode.
    pub grid_columns: u16,
    /// Maximum edge gap for a collision candidate. `None` is unbounded.
    pub proximity_threshold_px: Option<f32>,
    pub drop_animation: DropAnimation,
    /// Buffer screen reader announcements.
    pub announcements: bool,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: 0,
            movement_tolerance_px: 0.0,
            axis: Axis::List,
            orientation: Orientation::Vertical,
            grid_columns: 4,
            proximity_threshold_px: None,
            drop_animation: DropAnimation::default(),
            announcements: true,
        }
    }
}

impl SortableConfig {
    /// Vertical list defaults.
    #[must_use]
    pub fn list() -> Self {
        Self::default()
    }

    /// Grid defaults with `columns` columns.
    #[must_use]
    pub fn grid(columns: u16) -> Self {
        Self {
            axis: Axis::Grid,
            grid_columns: columns,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_activation(mut self, delay_ms: u64, tolerance_px: f32) -> Self {
        self.activation_delay_ms = delay_ms;
        self.movement_tolerance_px = tolerance_px;
        self
    }

    #[must_use]
    pub fn with_proximity(mut self, threshold_px: Option<f32>) -> Self {
        self.proximity_threshold_px = threshold_px;
        self
    }

    #[must_use]
    pub fn with_drop_animation(mut self, drop_animation: DropAnimation) -> Self {
        self.drop_animation = drop_animation;
        self
    }

    #[must_use]
    pub fn with_announcements(mut self, enabled: bool) -> Self {
        self.announcements = enabled;
        self
    }

    /// Pointer activation constraint for the configured delay/tolerance.
    #[must_use]
    pub fn activation_constraint(&self) -> ActivationConstraint {
        ActivationConstraint::from_settings(self.activation_delay_ms, self.movement_tolerance_px)
    }

    /// Keyboard step mapping for the configured axis.
    #[must_use]
    pub fn arrangement(&self) -> Arrangement {
        match self.axis {
            Axis::List => Arrangement::List(self.orientation),
            Axis::Grid => Arrangement::Grid {
                columns: self.grid_columns,
            },
        }
    }

    /// Collision resolver for the configured axis. Lists measure along their
    /// main axis; grids use 2-D distance.
    #[must_use]
    pub fn collision_resolver(&self) -> CollisionResolver {
        let metric = match self.axis {
            Axis::List => CollisionMetric::ClosestCenterOnAxis(self.orientation),
            Axis::Grid => CollisionMetric::ClosestCenter,
        };
        CollisionResolver::new(metric).with_proximity(self.proximity_threshold_px)
    }

    /// Check every field is within its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axis == Axis::Grid && self.grid_columns == 0 {
            return Err(ConfigError::ZeroGridColumns);
        }
        let tolerance = self.movement_tolerance_px;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance { value: tolerance });
        }
        if let Some(threshold) = self.proximity_threshold_px
            && (!threshold.is_finite() || threshold < 0.0)
        {
            return Err(ConfigError::InvalidProximity { value: threshold });
        }
        let opacity = self.drop_animation.ghost_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::InvalidGhostOpacity { value: opacity });
        }
        Ok(())
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Configuration load and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Grid axis with zero columns.
    ZeroGridColumns,
    InvalidTolerance { value: f32 },
    InvalidProximity { value: f32 },
    /// Ghost opacity outside `[0, 1]`.
    InvalidGhostOpacity { value: f32 },
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroGridColumns => write!(f, "grid_columns must be > 0 for a grid"),
            Self::InvalidTolerance { value } => {
                write!(f, "movement_tolerance_px must be finite and >= 0 (got {value})")
            }
            Self::InvalidProximity { value } => {
                write!(f, "proximity_threshold_px must be finite and >= 0 (got {value})")
            }
            Self::InvalidGhostOpacity { value } => {
                write!(f, "ghost_opacity must be within [0, 1] (got {value})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}
