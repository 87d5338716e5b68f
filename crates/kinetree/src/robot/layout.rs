//! Property placement for the two display styles.

use kinetree_property::PropertyId;
use tracing::debug;

use super::Robot;
use crate::error::Result;
use crate::registry::JointId;

impl Robot {
    /// Move a joint's detail nodes under its "Details" grouping (`true`) or
    /// directly under its top-level node (`false`).
    ///
    /// Nodes are moved, never recreated, so their identity and expanded
    /// state survive; their relative order is the same in both places.
    pub fn use_detail_property(&mut self, name: &str, use_detail: bool) -> Result<()> {
        let id = self.joint_id(name)?;
        self.place_details(id, use_detail)
    }

    /// Expand or collapse whichever node currently holds the detail nodes.
    pub fn expand_details(&mut self, name: &str, expand: bool) -> Result<()> {
        let id = self.joint_id(name)?;
        self.expand_details_by_id(id, expand)
    }

    /// Re-parent a joint's top-level node. `None` detaches it and keeps it
    /// alive.
    pub fn set_parent_property(&mut self, name: &str, parent: Option<PropertyId>) -> Result<()> {
        let id = self.joint_id(name)?;
        self.set_parent_property_by_id(id, parent)
    }

    /// Hide or show everything below a joint's top-level node that the
    /// joint owns.
    pub fn hide_sub_properties(&mut self, name: &str, hide: bool) -> Result<()> {
        let id = self.joint_id(name)?;
        let Some(joint) = self.registry.joint_by_id(id) else {
            return Ok(());
        };
        let props = joint.properties();
        let nodes: Vec<PropertyId> = std::iter::once(props.details)
            .chain(props.detail_nodes())
            .collect();
        for node in nodes {
            self.properties.set_hidden(node, hide)?;
        }
        Ok(())
    }

    fn place_details(&mut self, id: JointId, use_detail: bool) -> Result<()> {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return Ok(());
        };
        let props = joint.properties().clone();
        let nodes = props.detail_nodes();

        if use_detail {
            for (index, &node) in nodes.iter().enumerate() {
                self.properties.attach_at(node, Some(props.details), index)?;
            }
            self.properties.attach_at(props.details, Some(props.joint), 0)?;
        } else {
            self.properties.attach(props.details, None)?;
            for (index, &node) in nodes.iter().enumerate() {
                self.properties.attach_at(node, Some(props.joint), index)?;
            }
        }
        Ok(())
    }

    fn expand_details_by_id(&mut self, id: JointId, expand: bool) -> Result<()> {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return Ok(());
        };
        let props = joint.properties();
        let holder = if self.properties.parent(props.details).is_some() {
            props.details
        } else {
            props.joint
        };
        self.properties.set_expanded(holder, expand)?;
        Ok(())
    }

    fn set_parent_property_by_id(&mut self, id: JointId, parent: Option<PropertyId>) -> Result<()> {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return Ok(());
        };
        self.properties.attach(joint.joint_property(), parent)?;
        Ok(())
    }

    /// Run the entry action of the current style on every joint, then
    /// refresh descriptions and checkboxes.
    pub(super) fn apply_style(&mut self) -> Result<()> {
        let tree = self.style.is_tree();
        let order = if tree {
            self.registry.joints_depth_first()
        } else {
            let mut named: Vec<(&str, JointId)> = self
                .registry
                .joints()
                .map(|(id, joint)| (joint.name(), id))
                .collect();
            named.sort();
            named.into_iter().map(|(_, id)| id).collect()
        };

        for &id in &order {
            self.set_parent_property_by_id(id, None)?;
        }
        for &id in &order {
            self.place_details(id, tree)?;
            let parent = if tree {
                self.registry
                    .joint_by_id(id)
                    .and_then(|joint| self.registry.parent_joint(joint.name()))
                    .map(|parent| parent.joint_property())
                    .unwrap_or(self.joint_tree)
            } else {
                self.joint_tree
            };
            self.set_parent_property_by_id(id, Some(parent))?;
        }

        for &id in &order {
            self.refresh_joint(id);
            self.expand_details_by_id(id, self.config.expand_details)?;
        }
        self.properties
            .set_expanded(self.joint_tree, self.config.expand_joint_tree)?;
        debug!(robot = %self.name, style = ?self.style, joints = order.len(), "style applied");

        self.calculate_joint_checkboxes();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{arm, arm_description};
    use super::*;
    use crate::config::{DisplayConfig, DisplayStyle};

    const DETAILS: [&str; 7] = [
        "Show Axes",
        "Position",
        "Orientation",
        "Show Joint Axis",
        "Joint Axis",
        "Type",
        "Lower Limit",
    ];

    fn joint_node(robot: &Robot, name: &str) -> PropertyId {
        robot.joint(name).unwrap().joint_property()
    }

    #[test]
    fn tree_style_nests_joints_and_groups_details() {
        let robot = arm(DisplayStyle::Tree);
        let root = robot.joint_tree_property();
        let shoulder = joint_node(&robot, "shoulder");
        let elbow = joint_node(&robot, "elbow");

        assert_eq!(robot.properties().children(root), &[shoulder]);
        assert_eq!(robot.properties().child_names(shoulder), ["Details", "elbow"]);
        assert_eq!(robot.properties().parent(elbow), Some(shoulder));

        let details = robot.joint("shoulder").unwrap().properties().details;
        let names = robot.properties().child_names(details);
        assert_eq!(&names[..7], &DETAILS);
        assert_eq!(names[7], "Upper Limit");
    }

    #[test]
    fn list_style_is_flat_and_sorted() {
        let robot = arm(DisplayStyle::List);
        let root = robot.joint_tree_property();
        assert_eq!(robot.properties().child_names(root), ["elbow", "shoulder"]);

        let elbow = joint_node(&robot, "elbow");
        let names = robot.properties().child_names(elbow);
        assert_eq!(&names[..7], &DETAILS);
        assert!(!names.contains(&"Details"));
    }

    #[test]
    fn detail_round_trip_restores_order_and_identity() {
        let mut robot = arm(DisplayStyle::List);
        let elbow = joint_node(&robot, "elbow");
        let before = robot.properties().children(elbow).to_vec();
        let show_axes = robot.joint("elbow").unwrap().properties().show_axes;
        robot.properties_mut().set_expanded(show_axes, true).unwrap();

        robot.use_detail_property("elbow", true).unwrap();
        let details = robot.joint("elbow").unwrap().properties().details;
        assert_eq!(robot.properties().children(elbow), &[details]);
        assert_eq!(robot.properties().children(details), before.as_slice());

        robot.use_detail_property("elbow", false).unwrap();
        assert_eq!(robot.properties().children(elbow), before.as_slice());
        assert!(robot.properties().parent(details).is_none());
        assert!(robot.properties().contains(details));
        assert!(robot.properties().get(show_axes).unwrap().expanded);
    }

    #[test]
    fn style_switch_moves_nodes_without_recreating_them() {
        let mut robot = arm(DisplayStyle::Tree);
        let len = robot.properties().len();
        let elbow = joint_node(&robot, "elbow");
        let root = robot.joint_tree_property();

        robot.set_style(DisplayStyle::List).unwrap();
        assert_eq!(robot.properties().parent(elbow), Some(root));
        assert_eq!(robot.properties().len(), len);

        robot.set_style(DisplayStyle::Tree).unwrap();
        assert_eq!(robot.properties().parent(elbow), Some(joint_node(&robot, "shoulder")));
        assert_eq!(robot.properties().len(), len);
        assert_eq!(robot.style(), DisplayStyle::Tree);
    }

    #[test]
    fn expand_details_targets_current_holder() {
        let config = DisplayConfig {
            expand_details: true,
            ..Default::default()
        };
        let mut robot = Robot::from_description(&arm_description(), config).unwrap();
        let props = robot.joint("elbow").unwrap().properties().clone();
        assert!(robot.properties().get(props.details).unwrap().expanded);

        robot.set_style(DisplayStyle::List).unwrap();
        assert!(robot.properties().get(props.joint).unwrap().expanded);

        robot.expand_details("elbow", false).unwrap();
        assert!(!robot.properties().get(props.joint).unwrap().expanded);
        assert!(robot.properties().get(props.details).unwrap().expanded);
    }

    #[test]
    fn detached_joint_stays_alive() {
        let mut robot = arm(DisplayStyle::Tree);
        let elbow = joint_node(&robot, "elbow");
        let shoulder = joint_node(&robot, "shoulder");

        robot.set_parent_property("elbow", None).unwrap();
        assert!(robot.properties().parent(elbow).is_none());
        assert!(robot.properties().contains(elbow));
        assert_eq!(robot.properties().child_names(shoulder), ["Details"]);

        robot.set_parent_property("elbow", Some(shoulder)).unwrap();
        assert_eq!(robot.properties().parent(elbow), Some(shoulder));
    }

    #[test]
    fn hide_sub_properties_keeps_checkbox_visible() {
        let mut robot = arm(DisplayStyle::Tree);
        let props = robot.joint("shoulder").unwrap().properties().clone();

        robot.hide_sub_properties("shoulder", true).unwrap();
        assert!(!robot.properties().get(props.joint).unwrap().hidden);
        for node in std::iter::once(props.details).chain(props.detail_nodes()) {
            assert!(robot.properties().get(node).unwrap().hidden);
        }

        robot.hide_sub_properties("shoulder", false).unwrap();
        assert!(!robot.properties().get(props.position).unwrap().hidden);
    }
}
