//! Static model description handed over by the model loader.
//!
//! These are plain serde types. Parsing robot description formats happens
//! upstream; by the time a [`RobotDescription`] reaches this crate its
//! values are assumed validated.

use serde::{Deserialize, Serialize};

use kinetree_math::{Pose, Vec3};

/// Joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointKind {
    /// No relative motion.
    Fixed,
    /// Rotation about the axis, between limits.
    Revolute,
    /// Unbounded rotation about the axis.
    Continuous,
    /// Translation along the axis, between limits.
    Prismatic,
    /// Six degrees of freedom.
    Floating,
    /// Translation in the plane normal to the axis.
    Planar,
}

impl JointKind {
    /// Lowercase type name, as shown in the inspector.
    pub fn as_str(self) -> &'static str {
        match self {
            JointKind::Fixed => "fixed",
            JointKind::Revolute => "revolute",
            JointKind::Continuous => "continuous",
            JointKind::Prismatic => "prismatic",
            JointKind::Floating => "floating",
            JointKind::Planar => "planar",
        }
    }

    /// Whether the joint moves along or about a single axis.
    pub fn uses_axis(self) -> bool {
        matches!(
            self,
            JointKind::Revolute | JointKind::Continuous | JointKind::Prismatic
        )
    }

    /// Whether position limits apply to this joint type.
    pub fn uses_limits(self) -> bool {
        matches!(self, JointKind::Revolute | JointKind::Prismatic)
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joint position limits (radians or meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    /// Lower position limit.
    pub lower: f64,
    /// Upper position limit.
    pub upper: f64,
}

/// One link of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDescription {
    /// Unique link name.
    pub name: String,
    /// Whether the link carries visual geometry.
    #[serde(default)]
    pub has_geometry: bool,
    /// Initial enabled flag.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl LinkDescription {
    /// A link with geometry, enabled.
    pub fn visual(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_geometry: true,
            enabled: true,
        }
    }

    /// A link without geometry.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_geometry: false,
            enabled: true,
        }
    }

    /// Builder: set the initial enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// One joint of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDescription {
    /// Unique joint name.
    pub name: String,
    /// Joint type.
    pub kind: JointKind,
    /// Name of the parent link.
    pub parent_link: String,
    /// Name of the child link.
    pub child_link: String,
    /// Origin translation relative to the parent link frame.
    #[serde(default)]
    pub origin_xyz: [f64; 3],
    /// Origin fixed-axis roll/pitch/yaw relative to the parent link frame.
    #[serde(default)]
    pub origin_rpy: [f64; 3],
    /// Motion axis in the joint frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f64; 3]>,
    /// Position limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<JointLimits>,
}

impl JointDescription {
    /// A joint at the parent link origin.
    pub fn new(
        name: impl Into<String>,
        kind: JointKind,
        parent_link: impl Into<String>,
        child_link: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            parent_link: parent_link.into(),
            child_link: child_link.into(),
            origin_xyz: [0.0; 3],
            origin_rpy: [0.0; 3],
            axis: None,
            limits: None,
        }
    }

    /// Builder: set the origin.
    pub fn with_origin(mut self, xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        self.origin_xyz = xyz;
        self.origin_rpy = rpy;
        self
    }

    /// Builder: set the motion axis.
    pub fn with_axis(mut self, axis: [f64; 3]) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Builder: set position limits.
    pub fn with_limits(mut self, lower: f64, upper: f64) -> Self {
        self.limits = Some(JointLimits { lower, upper });
        self
    }

    /// Origin as a pose relative to the parent link frame.
    pub fn origin(&self) -> Pose {
        Pose::from_xyz_rpy(self.origin_xyz, self.origin_rpy)
    }

    /// Motion axis as a vector, if given.
    pub fn axis_vector(&self) -> Option<Vec3> {
        self.axis.map(|[x, y, z]| Vec3::new(x, y, z))
    }
}

/// A complete model: links and the joints connecting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotDescription {
    /// Model name.
    pub name: String,
    /// All links.
    pub links: Vec<LinkDescription>,
    /// All joints.
    pub joints: Vec<JointDescription>,
}

impl RobotDescription {
    /// Create an empty description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add a link.
    pub fn link(mut self, link: LinkDescription) -> Self {
        self.links.push(link);
        self
    }

    /// Builder: add a joint.
    pub fn joint(mut self, joint: JointDescription) -> Self {
        self.joints.push(joint);
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_fills_defaults() {
        let json = r#"{
            "name": "arm",
            "links": [
                { "name": "base" },
                { "name": "upper_arm", "has_geometry": true }
            ],
            "joints": [
                {
                    "name": "shoulder",
                    "kind": "revolute",
                    "parent_link": "base",
                    "child_link": "upper_arm",
                    "axis": [0.0, 0.0, 1.0],
                    "limits": { "lower": -1.5, "upper": 1.5 }
                }
            ]
        }"#;
        let desc = RobotDescription::from_json(json).unwrap();

        assert!(!desc.links[0].has_geometry);
        assert!(desc.links[0].enabled);
        assert!(desc.links[1].has_geometry);

        let shoulder = &desc.joints[0];
        assert_eq!(shoulder.kind, JointKind::Revolute);
        assert_eq!(shoulder.origin_xyz, [0.0; 3]);
        assert_eq!(shoulder.axis_vector(), Some(Vec3::z()));
        assert_eq!(shoulder.limits.unwrap().upper, 1.5);
    }

    #[test]
    fn json_round_trip() {
        let desc = RobotDescription::new("arm")
            .link(LinkDescription::empty("base"))
            .link(LinkDescription::visual("upper_arm").with_enabled(false))
            .joint(
                JointDescription::new("shoulder", JointKind::Prismatic, "base", "upper_arm")
                    .with_origin([0.0, 0.1, 0.2], [0.0, 0.5, 0.0])
                    .with_axis([1.0, 0.0, 0.0])
                    .with_limits(-0.25, 0.75),
            );
        let json = desc.to_json().unwrap();
        assert_eq!(RobotDescription::from_json(&json).unwrap(), desc);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&JointKind::Continuous).unwrap();
        assert_eq!(json, r#""continuous""#);
        assert_eq!(JointKind::Prismatic.to_string(), "prismatic");
    }

    #[test]
    fn kind_capabilities() {
        assert!(JointKind::Continuous.uses_axis());
        assert!(!JointKind::Continuous.uses_limits());
        assert!(JointKind::Prismatic.uses_limits());
        assert!(!JointKind::Fixed.uses_axis());
        assert!(!JointKind::Floating.uses_limits());
    }

    #[test]
    fn builder_origin() {
        let joint = JointDescription::new("j", JointKind::Fixed, "a", "b")
            .with_origin([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert_eq!(joint.origin().position, Vec3::x());
    }
}
