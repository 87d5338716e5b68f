//! Bottom-up checkbox aggregation.

use kinetree_property::PropertyValue;
use tracing::{debug, warn};

use super::Robot;
use crate::error::Result;
use crate::joint::{Checkbox, CheckboxGuard, LinkStateCounts, TriState};
use crate::registry::JointId;

impl Robot {
    /// Recompute every joint checkbox from the links' enabled flags and
    /// return the counts for the whole model.
    pub fn calculate_joint_checkboxes(&mut self) -> LinkStateCounts {
        let mut total = self
            .registry
            .root_links()
            .into_iter()
            .map(LinkStateCounts::of_link)
            .fold(LinkStateCounts::default(), |acc, c| acc + c);
        for root in self.registry.root_joints() {
            total += self.calculate_joint_checkboxes_recursive(root);
        }
        debug!(
            robot = %self.name,
            with_geometry = total.with_geometry,
            enabled = total.enabled,
            "joint checkboxes recomputed"
        );
        self.aggregate = total;
        total
    }

    /// Set the checkbox of `id` and everything below it; returns the counts
    /// over `id`'s whole subtree.
    ///
    /// In list style each checkbox reflects only the joint's own child link,
    /// in tree style the full subtree. A joint already on the call stack
    /// contributes nothing, which bounds the walk even on a corrupted graph.
    pub fn calculate_joint_checkboxes_recursive(&mut self, id: JointId) -> LinkStateCounts {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return LinkStateCounts::default();
        };
        if joint.guard() != CheckboxGuard::Idle {
            return LinkStateCounts::default();
        }
        let own = joint.child_link_state(&self.registry, false);
        let tree = self.style.is_tree();

        if !tree {
            self.set_joint_checkbox(id, own.checkbox());
        }

        self.set_guard(id, CheckboxGuard::Recomputing);
        let mut total = own;
        for child in self.registry.child_joints(id) {
            total += self.calculate_joint_checkboxes_recursive(child);
        }
        self.set_guard(id, CheckboxGuard::Idle);

        if tree {
            self.set_joint_checkbox(id, total.checkbox());
        }
        total
    }

    /// Write a checkbox state without cascading. The write goes through
    /// change notification; the guard makes the joint ignore it.
    pub(crate) fn set_joint_checkbox(&mut self, id: JointId, checkbox: Checkbox) {
        let Some(joint) = self.registry.joint_by_id_mut(id) else {
            return;
        };
        let property = joint.properties.joint;
        let previous = joint.guard;
        if previous == CheckboxGuard::Idle {
            joint.guard = CheckboxGuard::Recomputing;
        }

        let (value, indeterminate) = match checkbox {
            Checkbox::Hidden => (PropertyValue::Empty, false),
            Checkbox::Shown(TriState::On) => (PropertyValue::Bool(true), false),
            Checkbox::Shown(TriState::Off) => (PropertyValue::Bool(false), false),
            Checkbox::Shown(TriState::Mixed) => (PropertyValue::Bool(true), true),
        };
        let result = self
            .properties
            .set_indeterminate(property, indeterminate)
            .map_err(Into::into)
            .and_then(|()| self.write_property(property, value));
        if let Err(err) = result {
            warn!(error = %err, "failed to write joint checkbox");
        }

        self.set_guard(id, previous);
    }

    /// Refresh the description text and descendant-geometry flag of a joint.
    pub fn set_joint_property_description(&mut self, name: &str) -> Result<()> {
        let id = self.joint_id(name)?;
        self.set_joint_property_description_by_id(id)
    }

    pub(crate) fn set_joint_property_description_by_id(&mut self, id: JointId) -> Result<()> {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return Ok(());
        };
        let subtree = joint.child_link_state(&self.registry, true);
        let own = joint.child_link_state(&self.registry, false);
        let property = joint.joint_property();

        let mut description = format!(
            "Joint {} with parent link {} and child link {}.",
            joint.name(),
            joint.parent_link_name(),
            joint.child_link_name()
        );
        let checkbox_shown = if !subtree.has_geometry() {
            description.push_str("  This joint's descendants have no geometry.");
            false
        } else if self.style.is_tree() {
            description.push_str("  Check/uncheck to show/hide all descendants of this joint.");
            true
        } else if !own.has_geometry() {
            description.push_str("  This joint's child link has no geometry.");
            false
        } else {
            description.push_str("  Check/uncheck to show/hide this joint's child link.");
            true
        };

        if let Some(joint) = self.registry.joint_by_id_mut(id) {
            joint.has_descendant_geometry = subtree.has_geometry();
        }
        self.properties.set_description(property, description)?;
        if !checkbox_shown {
            self.set_joint_checkbox(id, Checkbox::Hidden);
        }
        Ok(())
    }

    /// Whether the checkbox of `id` is offered to the user in the current
    /// style.
    pub(crate) fn checkbox_shown(&self, id: JointId) -> bool {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return false;
        };
        joint.has_descendant_links_with_geometry()
            && (self.style.is_tree()
                || joint.child_link_state(&self.registry, false).has_geometry())
    }
}
