//! Links as seen by the joint display.

use crate::description::LinkDescription;

/// A rigid body segment of the model.
///
/// Links are owned by the [`ModelRegistry`](crate::ModelRegistry); joints
/// reference them by name. Only the robot container and the joint
/// enable/cascade logic write the `enabled` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotLink {
    name: String,
    enabled: bool,
    has_geometry: bool,
    parent_joint: Option<String>,
    child_joints: Vec<String>,
}

impl RobotLink {
    /// Create a link from its description. Joint references are filled in
    /// when the model is assembled.
    pub fn new(desc: &LinkDescription) -> Self {
        Self {
            name: desc.name.clone(),
            enabled: desc.enabled,
            has_geometry: desc.has_geometry,
            parent_joint: None,
            child_joints: Vec::new(),
        }
    }

    /// Link name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the link's geometry is shown.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Show or hide the link's geometry.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the link carries visual geometry.
    pub fn has_geometry(&self) -> bool {
        self.has_geometry
    }

    /// Name of the joint this link hangs from, `None` for a root link.
    pub fn parent_joint_name(&self) -> Option<&str> {
        self.parent_joint.as_deref()
    }

    /// Names of the outgoing joints, in model order.
    pub fn child_joint_names(&self) -> &[String] {
        &self.child_joints
    }

    pub(crate) fn set_parent_joint(&mut self, joint: Option<String>) {
        self.parent_joint = joint;
    }

    pub(crate) fn add_child_joint(&mut self, joint: String) {
        self.child_joints.push(joint);
    }

    pub(crate) fn remove_child_joint(&mut self, joint: &str) {
        self.child_joints.retain(|j| j != joint);
    }
}
