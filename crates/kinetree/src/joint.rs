//! Joint display nodes.
//!
//! A [`RobotJoint`] holds the static data of one model joint, the property
//! nodes it shows in the inspector, and the display state derived from the
//! links below it. Operations that touch other joints or links go through
//! the [`Robot`](crate::Robot) container; the pure parts live here.

use std::ops::{Add, AddAssign};

use kinetree_math::{compose, Pose, Quat, Tolerance, Vec3};
use kinetree_property::{PropertyId, PropertyTree, PropertyValue, Result as PropertyResult};
use tracing::debug;

use crate::description::{JointDescription, JointKind, JointLimits};
use crate::link::RobotLink;
use crate::registry::ModelRegistry;
use crate::scene::SceneObjectId;

/// Aggregate enabled state of a set of links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    /// Every link with geometry is enabled.
    On,
    /// No link with geometry is enabled.
    Off,
    /// Some are, some are not. Only ever derived, never assigned.
    Mixed,
}

/// What a joint checkbox shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkbox {
    /// No descendant geometry: no checkbox at all.
    Hidden,
    /// A checkbox in the given state.
    Shown(TriState),
}

/// Link counts gathered below a joint.
///
/// `with_geometry == enabled + disabled` always holds; links without
/// geometry are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStateCounts {
    /// Links that carry geometry.
    pub with_geometry: usize,
    /// Links with geometry that are enabled.
    pub enabled: usize,
    /// Links with geometry that are disabled.
    pub disabled: usize,
}

impl LinkStateCounts {
    /// Counts contributed by a single link.
    pub fn of_link(link: &RobotLink) -> Self {
        if !link.has_geometry() {
            return Self::default();
        }
        let enabled = usize::from(link.enabled());
        Self {
            with_geometry: 1,
            enabled,
            disabled: 1 - enabled,
        }
    }

    /// Whether any counted link has geometry.
    pub fn has_geometry(&self) -> bool {
        self.with_geometry > 0
    }

    /// Summary state. With no geometry at all this is `Mixed`; callers
    /// that show checkboxes use [`LinkStateCounts::checkbox`] instead.
    pub fn tri_state(&self) -> TriState {
        if self.with_geometry > 0 && self.enabled == 0 {
            TriState::Off
        } else if self.with_geometry > 0 && self.enabled == self.with_geometry {
            TriState::On
        } else {
            TriState::Mixed
        }
    }

    /// Checkbox for these counts.
    pub fn checkbox(&self) -> Checkbox {
        if self.has_geometry() {
            Checkbox::Shown(self.tri_state())
        } else {
            Checkbox::Hidden
        }
    }
}

impl Add for LinkStateCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            with_geometry: self.with_geometry + rhs.with_geometry,
            enabled: self.enabled + rhs.enabled,
            disabled: self.disabled + rhs.disabled,
        }
    }
}

impl AddAssign for LinkStateCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Re-entrancy state of a joint's checkbox.
///
/// Anything other than `Idle` means the joint is in the middle of a write
/// it started itself; change notifications arriving for its checkbox in
/// that window are absorbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckboxGuard {
    /// No write in progress.
    #[default]
    Idle,
    /// Pushing a user toggle down the subtree.
    Cascading,
    /// Writing a recomputed aggregate into the checkbox.
    Recomputing,
}

/// Property nodes owned by one joint.
#[derive(Debug, Clone)]
pub struct JointProperties {
    /// Top-level node; its value is the enable checkbox.
    pub joint: PropertyId,
    /// Collapsible grouping for the detail nodes in tree style.
    pub details: PropertyId,
    /// "Show Axes" toggle.
    pub show_axes: PropertyId,
    /// World position (read-only).
    pub position: PropertyId,
    /// World orientation (read-only).
    pub orientation: PropertyId,
    /// "Show Joint Axis" toggle, for joints with a motion axis.
    pub show_axis: Option<PropertyId>,
    /// Motion axis (read-only).
    pub axis: Option<PropertyId>,
    /// Joint type (read-only).
    pub kind: PropertyId,
    /// Lower limit (read-only).
    pub lower_limit: Option<PropertyId>,
    /// Upper limit (read-only).
    pub upper_limit: Option<PropertyId>,
}

impl JointProperties {
    fn build(desc: &JointDescription, axis: Option<Vec3>, tree: &mut PropertyTree) -> PropertyResult<Self> {
        let joint = tree.add(desc.name.clone(), PropertyValue::Bool(true));
        let details = tree.add("Details", PropertyValue::Empty);
        tree.set_description(details, "Properties of this joint.")?;

        let show_axes = tree.add_child(joint, "Show Axes", PropertyValue::Bool(false))?;
        tree.set_description(show_axes, "Show or hide the frame axes of this joint.")?;

        let origin = desc.origin();
        let position = read_only(
            tree,
            joint,
            "Position",
            PropertyValue::Vector(origin.position),
            "Position of this joint, in world coordinates.",
        )?;
        let orientation = read_only(
            tree,
            joint,
            "Orientation",
            PropertyValue::Quaternion(origin.orientation),
            "Orientation of this joint, in world coordinates.",
        )?;

        let (show_axis, axis) = match axis {
            Some(axis) => {
                let show = tree.add_child(joint, "Show Joint Axis", PropertyValue::Bool(false))?;
                tree.set_description(show, "Show or hide the motion axis of this joint.")?;
                let vector = read_only(
                    tree,
                    joint,
                    "Joint Axis",
                    PropertyValue::Vector(axis),
                    "Motion axis of this joint, in the joint frame.",
                )?;
                (Some(show), Some(vector))
            }
            None => (None, None),
        };

        let kind = read_only(
            tree,
            joint,
            "Type",
            PropertyValue::Text(desc.kind.as_str().to_string()),
            "Type of this joint.",
        )?;

        let (lower_limit, upper_limit) = match desc.limits.filter(|_| desc.kind.uses_limits()) {
            Some(JointLimits { lower, upper }) => (
                Some(read_only(
                    tree,
                    joint,
                    "Lower Limit",
                    PropertyValue::Float(lower),
                    "Lower position limit of this joint.",
                )?),
                Some(read_only(
                    tree,
                    joint,
                    "Upper Limit",
                    PropertyValue::Float(upper),
                    "Upper position limit of this joint.",
                )?),
            ),
            None => (None, None),
        };

        Ok(Self {
            joint,
            details,
            show_axes,
            position,
            orientation,
            show_axis,
            axis,
            kind,
            lower_limit,
            upper_limit,
        })
    }

    /// The nodes that move between the top-level node and the detail
    /// grouping, in display order.
    pub fn detail_nodes(&self) -> Vec<PropertyId> {
        let mut nodes = vec![self.show_axes, self.position, self.orientation];
        nodes.extend(self.show_axis);
        nodes.extend(self.axis);
        nodes.push(self.kind);
        nodes.extend(self.lower_limit);
        nodes.extend(self.upper_limit);
        nodes
    }

    /// Every node this joint owns, top-level node first.
    pub fn owned_nodes(&self) -> Vec<PropertyId> {
        let mut nodes = vec![self.joint, self.details];
        nodes.extend(self.detail_nodes());
        nodes
    }
}

fn read_only(
    tree: &mut PropertyTree,
    parent: PropertyId,
    name: &str,
    value: PropertyValue,
    description: &str,
) -> PropertyResult<PropertyId> {
    let id = tree.add_child(parent, name, value)?;
    tree.set_read_only(id, true)?;
    tree.set_description(id, description)?;
    Ok(id)
}

/// One joint of the displayed model.
#[derive(Debug)]
pub struct RobotJoint {
    name: String,
    parent_link_name: String,
    child_link_name: String,
    kind: JointKind,
    origin: Pose,
    axis: Option<Vec3>,
    limits: Option<JointLimits>,
    pub(crate) properties: JointProperties,
    pub(crate) has_descendant_geometry: bool,
    pub(crate) guard: CheckboxGuard,
    pub(crate) world_pose: Pose,
    pub(crate) axes_visual: Option<SceneObjectId>,
    pub(crate) axis_visual: Option<SceneObjectId>,
}

impl RobotJoint {
    /// Create a joint and its property nodes. The top-level node starts
    /// detached; the robot places it according to the display style.
    pub fn new(desc: &JointDescription, tree: &mut PropertyTree) -> PropertyResult<Self> {
        let axis = desc
            .axis_vector()
            .filter(|a| desc.kind.uses_axis() && !Tolerance::DEFAULT.is_zero(a));
        let properties = JointProperties::build(desc, axis, tree)?;
        let origin = desc.origin();
        debug!(joint = %desc.name, kind = %desc.kind, "created joint");
        Ok(Self {
            name: desc.name.clone(),
            parent_link_name: desc.parent_link.clone(),
            child_link_name: desc.child_link.clone(),
            kind: desc.kind,
            origin,
            axis,
            limits: desc.limits,
            properties,
            has_descendant_geometry: false,
            guard: CheckboxGuard::Idle,
            world_pose: origin,
            axes_visual: None,
            axis_visual: None,
        })
    }

    /// Joint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the parent link.
    pub fn parent_link_name(&self) -> &str {
        &self.parent_link_name
    }

    /// Name of the child link.
    pub fn child_link_name(&self) -> &str {
        &self.child_link_name
    }

    /// Joint type.
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// Origin relative to the parent link frame.
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    /// Motion axis, for joints that have one.
    pub fn axis(&self) -> Option<Vec3> {
        self.axis
    }

    /// Position limits, if any.
    pub fn limits(&self) -> Option<JointLimits> {
        self.limits
    }

    /// Top-level property node.
    pub fn joint_property(&self) -> PropertyId {
        self.properties.joint
    }

    /// All property nodes owned by this joint.
    pub fn properties(&self) -> &JointProperties {
        &self.properties
    }

    /// Whether any link below this joint carries geometry. Gates the
    /// checkbox; refreshed on style changes and model mutations.
    pub fn has_descendant_links_with_geometry(&self) -> bool {
        self.has_descendant_geometry
    }

    /// Current re-entrancy state.
    pub fn guard(&self) -> CheckboxGuard {
        self.guard
    }

    /// Last world pose written by [`Robot::set_joint_transforms`](crate::Robot::set_joint_transforms).
    pub fn world_pose(&self) -> &Pose {
        &self.world_pose
    }

    /// World position of the joint frame.
    pub fn position(&self) -> Vec3 {
        self.world_pose.position
    }

    /// World orientation of the joint frame.
    pub fn orientation(&self) -> Quat {
        self.world_pose.orientation
    }

    /// Joints have no geometry of their own; alpha is ignored.
    pub fn set_robot_alpha(&mut self, _alpha: f32) {}

    /// World pose of this joint given its parent link's world pose.
    pub fn compute_world_pose(&self, parent_position: &Vec3, parent_orientation: &Quat) -> Pose {
        compose(parent_position, parent_orientation, &self.origin)
    }

    /// Count the links below this joint.
    ///
    /// Non-recursive: only the child link. Recursive: the child link and
    /// every link reachable through its outgoing joints. A child link that
    /// does not resolve counts as having no geometry.
    pub fn child_link_state(&self, registry: &ModelRegistry, recursive: bool) -> LinkStateCounts {
        let Some(link) = registry.link(&self.child_link_name) else {
            debug!(joint = %self.name, link = %self.child_link_name, "child link not found");
            return LinkStateCounts::default();
        };
        let mut counts = LinkStateCounts::of_link(link);
        if recursive {
            for child in link.child_joint_names() {
                if let Some(joint) = registry.joint(child) {
                    counts += joint.child_link_state(registry, true);
                }
            }
        }
        counts
    }

    /// Enabled state as shown by the checkbox. Joints with no checkbox
    /// read as `On`.
    pub fn enabled(&self, tree: &PropertyTree) -> TriState {
        if !self.has_descendant_geometry {
            return TriState::On;
        }
        let Some(property) = tree.get(self.properties.joint) else {
            return TriState::On;
        };
        match property.value.as_bool() {
            None => TriState::On,
            Some(_) if property.indeterminate => TriState::Mixed,
            Some(true) => TriState::On,
            Some(false) => TriState::Off,
        }
    }
}
