//! The robot container.
//!
//! [`Robot`] owns everything a joint display touches: the model registry,
//! the inspector's property tree and the scene objects. Joint operations
//! that reach beyond a single joint are methods here, split by concern:
//!
//! - `aggregate`: bottom-up tri-state checkbox computation
//! - `cascade`: top-down propagation of user toggles, with the re-entrancy guard
//! - `layout`: property placement for the tree and list styles
//! - `transform`: world poses and the axis visuals that follow them

mod aggregate;
mod cascade;
mod layout;
mod transform;

use slotmap::SecondaryMap;
use tracing::{debug, info, warn};

use kinetree_property::{PropertyError, PropertyId, PropertyTree, PropertyValue};

use crate::config::{DisplayConfig, DisplayStyle};
use crate::description::{JointDescription, LinkDescription, RobotDescription};
use crate::error::{Result, RobotError};
use crate::joint::{CheckboxGuard, LinkStateCounts, RobotJoint, TriState};
use crate::link::RobotLink;
use crate::registry::{JointId, LinkId, ModelRegistry};
use crate::scene::Scene;

/// Which handler a property change is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyOwner {
    JointCheckbox(JointId),
    ShowAxes(JointId),
    ShowAxis(JointId),
}

/// A displayed robot model.
#[derive(Debug)]
pub struct Robot {
    name: String,
    config: DisplayConfig,
    style: DisplayStyle,
    registry: ModelRegistry,
    properties: PropertyTree,
    scene: Scene,
    joint_tree: PropertyId,
    owners: SecondaryMap<PropertyId, PropertyOwner>,
    aggregate: LinkStateCounts,
}

impl Robot {
    /// Create an empty robot.
    pub fn new(name: impl Into<String>, config: DisplayConfig) -> Result<Self> {
        config.validate()?;
        let mut properties = PropertyTree::new();
        let joint_tree = properties.add("Joints", PropertyValue::Empty);
        properties.set_description(joint_tree, "Joints of the robot model.")?;
        properties.set_expanded(joint_tree, config.expand_joint_tree)?;
        Ok(Self {
            name: name.into(),
            style: config.style,
            config,
            registry: ModelRegistry::new(),
            properties,
            scene: Scene::new(),
            joint_tree,
            owners: SecondaryMap::new(),
            aggregate: LinkStateCounts::default(),
        })
    }

    /// Build a robot from a model description and lay it out in the
    /// configured style.
    pub fn from_description(desc: &RobotDescription, config: DisplayConfig) -> Result<Self> {
        let mut robot = Self::new(desc.name.clone(), config)?;
        for link in &desc.links {
            robot.registry.insert_link(RobotLink::new(link))?;
        }
        for joint in &desc.joints {
            robot.insert_joint(joint)?;
        }
        robot.apply_style()?;
        info!(
            robot = %robot.name,
            links = robot.registry.num_links(),
            joints = robot.registry.num_joints(),
            "robot model built"
        );
        Ok(robot)
    }

    /// Build a robot from a JSON model description.
    pub fn from_json(json: &str, config: DisplayConfig) -> Result<Self> {
        let desc = RobotDescription::from_json(json)?;
        Self::from_description(&desc, config)
    }

    fn insert_joint(&mut self, desc: &JointDescription) -> Result<JointId> {
        let joint = RobotJoint::new(desc, &mut self.properties)?;
        let props = joint.properties().clone();
        match self.registry.insert_joint(joint) {
            Ok(id) => {
                self.owners.insert(props.joint, PropertyOwner::JointCheckbox(id));
                self.owners.insert(props.show_axes, PropertyOwner::ShowAxes(id));
                if let Some(show_axis) = props.show_axis {
                    self.owners.insert(show_axis, PropertyOwner::ShowAxis(id));
                }
                Ok(id)
            }
            Err(err) => {
                for node in props.owned_nodes() {
                    self.properties.remove(node);
                }
                Err(err)
            }
        }
    }

    /// Add a link to a built model and refresh the display.
    pub fn add_link(&mut self, desc: &LinkDescription) -> Result<LinkId> {
        let id = self.registry.insert_link(RobotLink::new(desc))?;
        self.apply_style()?;
        Ok(id)
    }

    /// Add a joint to a built model and refresh the display.
    pub fn add_joint(&mut self, desc: &JointDescription) -> Result<JointId> {
        let id = self.insert_joint(desc)?;
        self.apply_style()?;
        Ok(id)
    }

    /// Tear down one joint: its property nodes and scene visuals are
    /// released, other joints' nodes attached under it are detached, and
    /// the links it referenced stay.
    pub fn remove_joint(&mut self, name: &str) -> Result<()> {
        let id = self.joint_id(name)?;
        self.destroy_joint(id)?;
        self.apply_style()
    }

    /// Tear down the whole model.
    pub fn clear(&mut self) -> Result<()> {
        let ids: Vec<JointId> = self.registry.joints().map(|(id, _)| id).collect();
        for id in ids {
            self.destroy_joint(id)?;
        }
        self.registry = ModelRegistry::new();
        self.aggregate = LinkStateCounts::default();
        Ok(())
    }

    fn destroy_joint(&mut self, id: JointId) -> Result<()> {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return Ok(());
        };
        let name = joint.name().to_string();
        let props = joint.properties().clone();
        let owned = props.owned_nodes();

        for holder in [props.joint, props.details] {
            let foreign: Vec<PropertyId> = self
                .properties
                .children(holder)
                .iter()
                .copied()
                .filter(|child| !owned.contains(child))
                .collect();
            for child in foreign {
                self.properties.attach(child, None)?;
            }
        }

        if let Some(joint) = self.registry.remove_joint(&name) {
            for visual in [joint.axes_visual, joint.axis_visual].into_iter().flatten() {
                self.scene.destroy(visual);
            }
        }
        for node in owned {
            self.owners.remove(node);
            self.properties.remove(node);
        }
        debug!(joint = %name, "joint destroyed");
        Ok(())
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display configuration.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Current display style.
    pub fn style(&self) -> DisplayStyle {
        self.style
    }

    /// Link and joint registry.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Inspector property tree.
    pub fn properties(&self) -> &PropertyTree {
        &self.properties
    }

    /// Inspector property tree, for collaborators that add their own
    /// groupings. Writes made here bypass change notification.
    pub fn properties_mut(&mut self) -> &mut PropertyTree {
        &mut self.properties
    }

    /// Scene objects owned by joints.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Root grouping that holds the joints.
    pub fn joint_tree_property(&self) -> PropertyId {
        self.joint_tree
    }

    /// Look up a joint.
    pub fn joint(&self, name: &str) -> Option<&RobotJoint> {
        self.registry.joint(name)
    }

    /// Look up a link.
    pub fn link(&self, name: &str) -> Option<&RobotLink> {
        self.registry.link(name)
    }

    /// Nearest ancestor joint of `name`, `None` at a root.
    pub fn parent_joint(&self, name: &str) -> Option<&RobotJoint> {
        self.registry.parent_joint(name)
    }

    /// Link counts over the whole model from the last checkbox pass.
    pub fn aggregate_counts(&self) -> LinkStateCounts {
        self.aggregate
    }

    /// Robot-wide enabled state. A model without geometry reads as `On`.
    pub fn aggregate_state(&self) -> TriState {
        if self.aggregate.has_geometry() {
            self.aggregate.tri_state()
        } else {
            TriState::On
        }
    }

    fn joint_id(&self, name: &str) -> Result<JointId> {
        self.registry
            .joint_id(name)
            .ok_or_else(|| RobotError::joint_not_found(name))
    }

    fn guard(&self, id: JointId) -> Option<CheckboxGuard> {
        self.registry.joint_by_id(id).map(RobotJoint::guard)
    }

    fn set_guard(&mut self, id: JointId, guard: CheckboxGuard) {
        if let Some(joint) = self.registry.joint_by_id_mut(id) {
            joint.guard = guard;
        }
    }

    /// Show or hide a link's geometry, then recompute every joint checkbox.
    pub fn set_link_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        self.registry
            .link_mut(name)
            .ok_or_else(|| RobotError::link_not_found(name))?
            .set_enabled(enabled);
        self.calculate_joint_checkboxes();
        Ok(())
    }

    /// Write a property on behalf of the user and deliver the change
    /// notification to its owner.
    ///
    /// A write to a checkbox drawn as indeterminate always notifies, even if
    /// the stored boolean did not change: the user clicked a mixed box and
    /// the reported value is meant as a definite state.
    ///
    /// Toggles only accept booleans, and a joint checkbox that is hidden
    /// accepts nothing; rejected writes leave the tree untouched.
    pub fn set_property_value(&mut self, id: PropertyId, value: PropertyValue) -> Result<()> {
        self.check_owner_write(id, &value)?;
        let was_indeterminate = self.properties.get(id).is_some_and(|p| p.indeterminate);
        let changed = self.properties.set_value_from_ui(id, value)?;
        if was_indeterminate {
            self.properties.set_indeterminate(id, false)?;
        }
        if changed || was_indeterminate {
            self.property_changed(id);
        }
        Ok(())
    }

    fn check_owner_write(&self, id: PropertyId, value: &PropertyValue) -> Result<()> {
        let Some(owner) = self.owners.get(id).copied() else {
            return Ok(());
        };
        if value.as_bool().is_none() {
            return Err(PropertyError::TypeMismatch {
                id,
                expected: "boolean",
            }
            .into());
        }
        if let PropertyOwner::JointCheckbox(joint) = owner {
            if !self.checkbox_shown(joint) {
                let name = self
                    .registry
                    .joint_by_id(joint)
                    .map(|j| j.name().to_string())
                    .unwrap_or_default();
                return Err(RobotError::CheckboxHidden(name));
            }
        }
        Ok(())
    }

    /// Programmatic write that still notifies the owner.
    fn write_property(&mut self, id: PropertyId, value: PropertyValue) -> Result<()> {
        if self.properties.set_value(id, value)? {
            self.property_changed(id);
        }
        Ok(())
    }

    fn property_changed(&mut self, id: PropertyId) {
        match self.owners.get(id).copied() {
            Some(PropertyOwner::JointCheckbox(joint)) => self.joint_checkbox_changed(joint),
            Some(PropertyOwner::ShowAxes(joint)) => self.update_axes(joint),
            Some(PropertyOwner::ShowAxis(joint)) => self.update_axis(joint),
            None => {}
        }
    }

    /// Change the display style. Entering a style re-lays out every joint,
    /// refreshes descriptions and recomputes checkboxes; asking for the
    /// current style does nothing.
    pub fn set_style(&mut self, style: DisplayStyle) -> Result<()> {
        if style == self.style {
            return Ok(());
        }
        debug!(robot = %self.name, from = ?self.style, to = ?style, "display style change");
        self.style = style;
        self.apply_style()
    }

    fn refresh_joint(&mut self, id: JointId) {
        if let Err(err) = self.set_joint_property_description_by_id(id) {
            warn!(error = %err, "failed to refresh joint description");
        }
    }
}
