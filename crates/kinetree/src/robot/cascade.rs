//! Top-down propagation of user toggles.
//!
//! A toggle writes the joint's checkbox, pushes the boolean into the links
//! below, then recomputes every checkbox bottom-up. Each of those writes
//! raises a change notification that lands back in
//! `joint_checkbox_changed`; the per-joint [`CheckboxGuard`] is what turns
//! those echoes into no-ops instead of a second cascade.

use tracing::{debug, trace};

use super::Robot;
use crate::error::Result;
use crate::joint::{Checkbox, CheckboxGuard, TriState};
use crate::registry::JointId;

impl Robot {
    /// Enable or disable everything below a joint.
    ///
    /// In tree style this reaches every link in the joint's subtree; in list
    /// style only the joint's own child link. Joints whose checkbox is
    /// hidden ignore the call, as do joints already mid-write.
    pub fn set_joint_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let id = self.joint_id(name)?;
        self.enable_joint(id, enabled, true);
        Ok(())
    }

    /// Flip a joint the way a checkbox click does and return the value
    /// applied. A mixed joint turns on.
    pub fn toggle_joint(&mut self, name: &str) -> Result<bool> {
        let enabled = !matches!(self.joint_enabled(name)?, TriState::On);
        self.set_joint_enabled(name, enabled)?;
        Ok(enabled)
    }

    /// Current tri-state of a joint's checkbox.
    pub fn joint_enabled(&self, name: &str) -> Result<TriState> {
        Ok(self.registry.resolve_joint(name)?.enabled(&self.properties))
    }

    /// Change notification for a joint's checkbox.
    pub(super) fn joint_checkbox_changed(&mut self, id: JointId) {
        if self.guard(id) != Some(CheckboxGuard::Idle) {
            trace!(?id, "absorbed checkbox notification");
            return;
        }
        let enabled = self
            .registry
            .joint_by_id(id)
            .and_then(|joint| self.properties.value(joint.joint_property()))
            .and_then(|value| value.as_bool());
        if let Some(enabled) = enabled {
            self.enable_joint(id, enabled, false);
        }
    }

    fn enable_joint(&mut self, id: JointId, enabled: bool, write_checkbox: bool) {
        match self.guard(id) {
            Some(CheckboxGuard::Idle) => {}
            Some(_) => {
                trace!(?id, "joint already writing its checkbox");
                return;
            }
            None => return,
        }
        if !self.checkbox_shown(id) {
            debug!(?id, "joint has no checkbox; toggle ignored");
            return;
        }

        self.set_guard(id, CheckboxGuard::Cascading);
        if write_checkbox {
            self.set_joint_checkbox(id, Checkbox::Shown(tri_state(enabled)));
        }
        self.cascade(id, enabled);
        self.set_guard(id, CheckboxGuard::Idle);

        self.calculate_joint_checkboxes();
    }

    /// Push `enabled` into `id`'s child link and, in tree style, down
    /// through every joint below it, depth-first.
    fn cascade(&mut self, id: JointId, enabled: bool) {
        let Some(joint) = self.registry.joint_by_id(id) else {
            return;
        };
        let child_link = joint.child_link_name().to_string();
        match self.registry.link_mut(&child_link) {
            Some(link) => link.set_enabled(enabled),
            None => debug!(link = %child_link, "child link not found; nothing to enable"),
        }
        if !self.style.is_tree() {
            return;
        }

        for child in self.registry.child_joints(id) {
            if self.guard(child) != Some(CheckboxGuard::Idle) {
                continue;
            }
            self.set_guard(child, CheckboxGuard::Cascading);
            let shown = self
                .registry
                .joint_by_id(child)
                .is_some_and(|joint| joint.has_descendant_links_with_geometry());
            if shown {
                self.set_joint_checkbox(child, Checkbox::Shown(tri_state(enabled)));
            }
            self.cascade(child, enabled);
            self.set_guard(child, CheckboxGuard::Idle);
        }
    }
}

fn tri_state(enabled: bool) -> TriState {
    if enabled {
        TriState::On
    } else {
        TriState::Off
    }
}
