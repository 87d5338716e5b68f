//! Display configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RobotError};

/// How joints are laid out in the property inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// Joints nest under their parent joint; details sit in a collapsible
    /// grouping and checkboxes summarize whole subtrees.
    #[default]
    Tree,
    /// Joints form one flat list; details sit directly under each joint and
    /// checkboxes reflect only the joint's own child link.
    List,
}

impl DisplayStyle {
    /// Whether this is the hierarchical style.
    pub fn is_tree(self) -> bool {
        matches!(self, DisplayStyle::Tree)
    }
}

/// Ambient display settings for a robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial layout style.
    pub style: DisplayStyle,
    /// Expand each joint's detail properties after a style change.
    pub expand_details: bool,
    /// Expand the root joint grouping.
    pub expand_joint_tree: bool,
    /// Length of the frame axes visual (m).
    pub axes_length: f64,
    /// Radius of the frame axes visual (m).
    pub axes_radius: f64,
    /// Length of the joint axis arrow (m).
    pub axis_arrow_length: f64,
    /// Shaft radius of the joint axis arrow (m).
    pub axis_arrow_radius: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: DisplayStyle::Tree,
            expand_details: false,
            expand_joint_tree: true,
            axes_length: 0.1,
            axes_radius: 0.01,
            axis_arrow_length: 0.15,
            axis_arrow_radius: 0.02,
        }
    }
}

impl DisplayConfig {
    /// Parse and validate a TOML config. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: DisplayConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("axes_length", self.axes_length),
            ("axes_radius", self.axes_radius),
            ("axis_arrow_length", self.axis_arrow_length),
            ("axis_arrow_radius", self.axis_arrow_radius),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(RobotError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
