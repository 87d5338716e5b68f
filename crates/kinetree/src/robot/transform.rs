//! World poses and the visuals that follow them.

use kinetree_math::{Pose, Quat, Vec3};
use kinetree_property::{PropertyId, PropertyValue};
use tracing::{trace, warn};

use super::Robot;
use crate::error::Result;
use crate::registry::JointId;
use crate::scene::VisualKind;

impl Robot {
    /// Place a joint given its parent link's world pose and return the
    /// joint's world pose.
    ///
    /// The result is cached on the joint, mirrored into its read-only
    /// position and orientation properties, and pushed to its axes and
    /// axis-arrow visuals. Repeating a call with the same input changes
    /// nothing.
    pub fn set_joint_transforms(
        &mut self,
        name: &str,
        parent_position: &Vec3,
        parent_orientation: &Quat,
    ) -> Result<Pose> {
        let id = self.joint_id(name)?;
        let parent = Pose::new(*parent_position, *parent_orientation);
        Ok(self.set_transforms(id, &parent).unwrap_or(parent))
    }

    /// Place every joint at zero displacement, starting from `root` as the
    /// world pose of the root links.
    pub fn update_transforms(&mut self, root: &Pose) {
        let mut stack: Vec<(JointId, Pose)> = self
            .registry
            .root_joints()
            .into_iter()
            .rev()
            .map(|id| (id, *root))
            .collect();
        while let Some((id, parent)) = stack.pop() {
            let Some(pose) = self.set_transforms(id, &parent) else {
                continue;
            };
            stack.extend(
                self.registry
                    .child_joints(id)
                    .into_iter()
                    .rev()
                    .map(|child| (child, pose)),
            );
        }
    }

    fn set_transforms(&mut self, id: JointId, parent: &Pose) -> Option<Pose> {
        let joint = self.registry.joint_by_id_mut(id)?;
        let pose = joint.compute_world_pose(&parent.position, &parent.orientation);
        joint.world_pose = pose;
        let (position, orientation) = (joint.properties.position, joint.properties.orientation);
        let (axes, arrow, axis) = (joint.axes_visual, joint.axis_visual, joint.axis());

        for (property, value) in [
            (position, PropertyValue::Vector(pose.position)),
            (orientation, PropertyValue::Quaternion(pose.orientation)),
        ] {
            if let Err(err) = self.properties.set_value(property, value) {
                warn!(error = %err, "failed to mirror joint pose");
            }
        }
        if let Some(axes) = axes {
            self.scene.set_pose(axes, pose);
        }
        if let (Some(arrow), Some(axis)) = (arrow, axis) {
            self.scene.set_pose(arrow, pose);
            self.scene.set_direction(arrow, pose.rotate(&axis));
        }
        Some(pose)
    }

    /// Show or hide a joint's frame axes. Goes through the same change
    /// notification as a click on "Show Axes".
    pub fn set_show_axes(&mut self, name: &str, show: bool) -> Result<()> {
        let property = self.registry.resolve_joint(name)?.properties().show_axes;
        self.set_property_value(property, PropertyValue::Bool(show))
    }

    /// Show or hide a joint's motion axis arrow. Joints without a motion
    /// axis ignore the call.
    pub fn set_show_axis(&mut self, name: &str, show: bool) -> Result<()> {
        match self.registry.resolve_joint(name)?.properties().show_axis {
            Some(property) => self.set_property_value(property, PropertyValue::Bool(show)),
            None => Ok(()),
        }
    }

    /// Sync the frame axes visual with the "Show Axes" toggle. The visual
    /// is created the first time it is shown.
    pub(super) fn update_axes(&mut self, id: JointId) {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return;
        };
        let show = self.toggle_value(joint.properties.show_axes);
        let (pose, existing) = (joint.world_pose, joint.axes_visual);
        let visual = match existing {
            Some(visual) => visual,
            None if show => {
                let visual = self.scene.create(VisualKind::Axes {
                    length: self.config.axes_length,
                    radius: self.config.axes_radius,
                });
                if let Some(joint) = self.registry.joint_by_id_mut(id) {
                    joint.axes_visual = Some(visual);
                }
                visual
            }
            None => return,
        };
        self.scene.set_pose(visual, pose);
        self.scene.set_visible(visual, show);
        trace!(?id, show, "axes visual updated");
    }

    /// Sync the axis arrow with the "Show Joint Axis" toggle.
    pub(super) fn update_axis(&mut self, id: JointId) {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return;
        };
        let (Some(toggle), Some(axis)) = (joint.properties.show_axis, joint.axis()) else {
            return;
        };
        let show = self.toggle_value(toggle);
        let (pose, existing) = (joint.world_pose, joint.axis_visual);
        let visual = match existing {
            Some(visual) => visual,
            None if show => {
                let visual = self.scene.create(VisualKind::Arrow {
                    length: self.config.axis_arrow_length,
                    radius: self.config.axis_arrow_radius,
                });
                if let Some(joint) = self.registry.joint_by_id_mut(id) {
                    joint.axis_visual = Some(visual);
                }
                visual
            }
            None => return,
        };
        self.scene.set_pose(visual, pose);
        self.scene.set_direction(visual, pose.rotate(&axis));
        self.scene.set_visible(visual, show);
        trace!(?id, show, "axis visual updated");
    }

    fn toggle_value(&self, property: PropertyId) -> bool {
        self.properties
            .value(property)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::arm;
    use super::*;
    use crate::config::DisplayStyle;
    use crate::description::{JointDescription, JointKind, LinkDescription};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn composes_parent_pose() {
        let mut robot = arm(DisplayStyle::Tree);
        let parent_rotation = Quat::from_euler_angles(FRAC_PI_2, 0.0, 0.0);
        let pose = robot
            .set_joint_transforms("elbow", &Vec3::new(1.0, 0.0, 0.0), &parent_rotation)
            .unwrap();

        // Elbow sits 0.4 along +z of a frame rolled 90 degrees about x.
        assert_relative_eq!(pose.position, Vec3::new(1.0, -0.4, 0.0), epsilon = 1e-12);
        assert_relative_eq!(pose.orientation, parent_rotation, epsilon = 1e-12);

        let elbow = robot.joint("elbow").unwrap();
        assert_eq!(elbow.world_pose(), &pose);
        assert_eq!(
            robot.properties().value(elbow.properties().position),
            Some(&PropertyValue::Vector(pose.position))
        );
    }

    #[test]
    fn repeated_transforms_are_idempotent() {
        let mut robot = arm(DisplayStyle::Tree);
        robot.set_show_axes("shoulder", true).unwrap();
        let (p, q) = (Vec3::new(0.2, 0.3, 0.0), Quat::from_euler_angles(0.0, 0.0, 0.5));

        let first = robot.set_joint_transforms("shoulder", &p, &q).unwrap();
        let position = robot.joint("shoulder").unwrap().properties().position;
        let mirrored = robot.properties().value(position).cloned();
        let visual = robot.joint("shoulder").unwrap().axes_visual.unwrap();
        let object = robot.scene().get(visual).unwrap().clone();

        let second = robot.set_joint_transforms("shoulder", &p, &q).unwrap();
        assert_eq!(first, second);
        assert_eq!(robot.scene().get(visual), Some(&object));
        assert_eq!(robot.properties().value(position).cloned(), mirrored);
    }

    #[test]
    fn update_transforms_walks_the_chain() {
        let mut robot = arm(DisplayStyle::List);
        let root = Pose::new(Vec3::new(0.0, 0.0, 1.0), Quat::identity());
        robot.update_transforms(&root);

        assert_relative_eq!(
            robot.joint("shoulder").unwrap().position(),
            Vec3::new(0.0, 0.0, 1.1),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            robot.joint("elbow").unwrap().position(),
            Vec3::new(0.0, 0.0, 1.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn axes_visual_is_created_on_first_show() {
        let mut robot = arm(DisplayStyle::Tree);
        robot.update_transforms(&Pose::identity());
        assert!(robot.scene().is_empty());

        robot.set_show_axes("elbow", false).unwrap();
        assert!(robot.scene().is_empty());

        robot.set_show_axes("elbow", true).unwrap();
        let visual = robot.joint("elbow").unwrap().axes_visual.unwrap();
        let object = robot.scene().get(visual).unwrap();
        assert!(object.visible);
        assert_eq!(
            object.kind,
            VisualKind::Axes {
                length: 0.1,
                radius: 0.01
            }
        );
        assert_relative_eq!(object.pose.position, Vec3::new(0.0, 0.0, 0.5), epsilon = 1e-12);

        robot.set_show_axes("elbow", false).unwrap();
        assert!(!robot.scene().get(visual).unwrap().visible);
        assert_eq!(robot.scene().len(), 1);
    }

    #[test]
    fn axis_arrow_points_along_world_axis() {
        let mut robot = arm(DisplayStyle::Tree);
        robot.set_show_axis("elbow", true).unwrap();
        let rolled = Quat::from_euler_angles(FRAC_PI_2, 0.0, 0.0);
        robot
            .set_joint_transforms("elbow", &Vec3::zeros(), &rolled)
            .unwrap();

        let visual = robot.joint("elbow").unwrap().axis_visual.unwrap();
        let arrow = robot.scene().get(visual).unwrap();
        assert!(arrow.visible);
        // Local +y rolled about x lands on +z.
        assert_relative_eq!(arrow.direction, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn axes_toggle_rejects_non_boolean() {
        let mut robot = arm(DisplayStyle::Tree);
        let toggle = robot.joint("elbow").unwrap().properties().show_axes;
        assert!(robot
            .set_property_value(toggle, PropertyValue::Text("yes".into()))
            .is_err());
        assert_eq!(robot.properties().value(toggle), Some(&PropertyValue::Bool(false)));
        assert!(robot.scene().is_empty());
    }

    #[test]
    fn joints_without_axis_ignore_axis_toggle() {
        let mut robot = arm(DisplayStyle::Tree);
        robot.add_link(&LinkDescription::visual("camera")).unwrap();
        robot
            .add_joint(&JointDescription::new(
                "camera_mount",
                JointKind::Fixed,
                "forearm",
                "camera",
            ))
            .unwrap();

        robot.set_show_axis("camera_mount", true).unwrap();
        assert!(robot.scene().is_empty());
        assert!(robot.joint("camera_mount").unwrap().properties().show_axis.is_none());
    }
}
