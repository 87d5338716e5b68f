//! Name-keyed registry of links and joints.
//!
//! Links and joints live in slotmap arenas and refer to each other by
//! name, resolved through this registry. The registry keeps the joint graph
//! a forest: inserting a joint that would close a loop, or give a link a
//! second parent, is rejected.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};
use tracing::warn;

use crate::error::{Result, RobotError};
use crate::joint::RobotJoint;
use crate::link::RobotLink;

new_key_type! {
    /// Stable handle to a link.
    pub struct LinkId;
    /// Stable handle to a joint.
    pub struct JointId;
}

/// Registry of the links and joints of one model.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    links: SlotMap<LinkId, RobotLink>,
    joints: SlotMap<JointId, RobotJoint>,
    link_index: HashMap<String, LinkId>,
    joint_index: HashMap<String, JointId>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Number of joints.
    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    /// Add a link. Joints already referencing it by name are wired up.
    pub fn insert_link(&mut self, mut link: RobotLink) -> Result<LinkId> {
        if self.link_index.contains_key(link.name()) {
            return Err(RobotError::DuplicateLink(link.name().to_string()));
        }
        for joint in self.joints.values() {
            if joint.parent_link_name() == link.name() {
                link.add_child_joint(joint.name().to_string());
            }
            if joint.child_link_name() == link.name() {
                if let Some(first) = link.parent_joint_name() {
                    return Err(RobotError::MultipleParents {
                        link: link.name().to_string(),
                        first: first.to_string(),
                        second: joint.name().to_string(),
                    });
                }
                link.set_parent_joint(Some(joint.name().to_string()));
            }
        }
        let name = link.name().to_string();
        let parent_joint = link.parent_joint_name().map(str::to_string);
        let id = self.links.insert(link);
        self.link_index.insert(name.clone(), id);

        // Any loop through the new link also runs through its parent joint.
        if let Some(parent_joint) = parent_joint {
            if self.closes_loop(&parent_joint) {
                self.remove_link(&name);
                return Err(RobotError::KinematicLoop(parent_joint));
            }
        }
        Ok(id)
    }

    /// Add a joint and wire it to its parent and child links.
    ///
    /// Dangling link names are allowed (the joint then sees no geometry on
    /// that side). Duplicate names, a second parent for the child link, or a
    /// loop are errors and leave the registry unchanged.
    pub fn insert_joint(&mut self, joint: RobotJoint) -> Result<JointId> {
        let name = joint.name().to_string();
        if self.joint_index.contains_key(&name) {
            return Err(RobotError::DuplicateJoint(name));
        }
        if let Some(child) = self.link(joint.child_link_name()) {
            if let Some(first) = child.parent_joint_name() {
                return Err(RobotError::MultipleParents {
                    link: child.name().to_string(),
                    first: first.to_string(),
                    second: name,
                });
            }
        }
        if joint.parent_link_name() == joint.child_link_name() {
            return Err(RobotError::KinematicLoop(name));
        }

        let parent_link = joint.parent_link_name().to_string();
        let child_link = joint.child_link_name().to_string();
        match self.link_mut(&parent_link) {
            Some(link) => link.add_child_joint(name.clone()),
            None => warn!(joint = %name, link = %parent_link, "parent link not found"),
        }
        match self.link_mut(&child_link) {
            Some(link) => link.set_parent_joint(Some(name.clone())),
            None => warn!(joint = %name, link = %child_link, "child link not found"),
        }
        let id = self.joints.insert(joint);
        self.joint_index.insert(name.clone(), id);

        if self.closes_loop(&name) {
            self.remove_joint(&name);
            return Err(RobotError::KinematicLoop(name));
        }
        Ok(id)
    }

    fn closes_loop(&self, name: &str) -> bool {
        let mut steps = 0;
        let mut current = self.parent_joint(name);
        while let Some(joint) = current {
            if joint.name() == name || steps > self.joints.len() {
                return true;
            }
            steps += 1;
            current = self.parent_joint(joint.name());
        }
        false
    }

    /// Remove a joint and unhook it from its links. The links stay.
    pub fn remove_joint(&mut self, name: &str) -> Option<RobotJoint> {
        let id = self.joint_index.remove(name)?;
        let joint = self.joints.remove(id)?;
        if let Some(link) = self.link_mut(joint.parent_link_name()) {
            link.remove_child_joint(name);
        }
        if let Some(link) = self.link_mut(joint.child_link_name()) {
            if link.parent_joint_name() == Some(name) {
                link.set_parent_joint(None);
            }
        }
        Some(joint)
    }

    /// Remove a link. Joints referencing it keep dangling names.
    pub fn remove_link(&mut self, name: &str) -> Option<RobotLink> {
        let id = self.link_index.remove(name)?;
        self.links.remove(id)
    }

    /// Look up a link by name.
    pub fn link(&self, name: &str) -> Option<&RobotLink> {
        self.link_index.get(name).and_then(|&id| self.links.get(id))
    }

    /// Look up a link by name, mutably.
    pub fn link_mut(&mut self, name: &str) -> Option<&mut RobotLink> {
        let id = *self.link_index.get(name)?;
        self.links.get_mut(id)
    }

    /// Look up a link, reporting a missing one as an error.
    pub fn resolve_link(&self, name: &str) -> Result<&RobotLink> {
        self.link(name).ok_or_else(|| RobotError::link_not_found(name))
    }

    /// Look up a joint by name.
    pub fn joint(&self, name: &str) -> Option<&RobotJoint> {
        self.joint_index.get(name).and_then(|&id| self.joints.get(id))
    }

    /// Look up a joint by name, reporting a missing one as an error.
    pub fn resolve_joint(&self, name: &str) -> Result<&RobotJoint> {
        self.joint(name).ok_or_else(|| RobotError::joint_not_found(name))
    }

    /// Handle of a named joint.
    pub fn joint_id(&self, name: &str) -> Option<JointId> {
        self.joint_index.get(name).copied()
    }

    /// Look up a joint by handle.
    pub fn joint_by_id(&self, id: JointId) -> Option<&RobotJoint> {
        self.joints.get(id)
    }

    /// Look up a joint by handle, mutably.
    pub fn joint_by_id_mut(&mut self, id: JointId) -> Option<&mut RobotJoint> {
        self.joints.get_mut(id)
    }

    /// All links.
    pub fn links(&self) -> impl Iterator<Item = &RobotLink> {
        self.links.values()
    }

    /// All joints with their handles.
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &RobotJoint)> {
        self.joints.iter()
    }

    /// The joint above `name`: the parent joint of its parent link.
    pub fn parent_joint(&self, name: &str) -> Option<&RobotJoint> {
        let joint = self.joint(name)?;
        let parent_link = self.link(joint.parent_link_name())?;
        self.joint(parent_link.parent_joint_name()?)
    }

    /// Joints hanging off `id`'s child link, in model order.
    pub fn child_joints(&self, id: JointId) -> Vec<JointId> {
        let Some(joint) = self.joints.get(id) else {
            return Vec::new();
        };
        self.link(joint.child_link_name())
            .map(|link| {
                link.child_joint_names()
                    .iter()
                    .filter_map(|name| self.joint_id(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Links without a parent joint, sorted by name.
    pub fn root_links(&self) -> Vec<&RobotLink> {
        let mut roots: Vec<&RobotLink> = self
            .links
            .values()
            .filter(|link| link.parent_joint_name().is_none())
            .collect();
        roots.sort_by(|a, b| a.name().cmp(b.name()));
        roots
    }

    /// Joints with no parent joint, in depth-first display order: outgoing
    /// joints of each root link, then joints whose parent link is missing,
    /// by name.
    pub fn root_joints(&self) -> Vec<JointId> {
        let mut roots: Vec<JointId> = self
            .root_links()
            .iter()
            .flat_map(|link| link.child_joint_names())
            .filter_map(|name| self.joint_id(name))
            .collect();
        let mut orphans: Vec<(&str, JointId)> = self
            .joints
            .iter()
            .filter(|(_, joint)| self.link(joint.parent_link_name()).is_none())
            .map(|(id, joint)| (joint.name(), id))
            .collect();
        orphans.sort();
        roots.extend(orphans.into_iter().map(|(_, id)| id));
        roots
    }

    /// All joints below `id` (excluding it), depth-first.
    pub fn descendant_joints(&self, id: JointId) -> Vec<JointId> {
        let mut out = Vec::new();
        let mut stack: Vec<JointId> = self.child_joints(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_joints(next).into_iter().rev());
        }
        out
    }

    /// Every joint, depth-first from the roots.
    pub fn joints_depth_first(&self) -> Vec<JointId> {
        let mut out = Vec::new();
        for root in self.root_joints() {
            out.push(root);
            out.extend(self.descendant_joints(root));
        }
        out
    }

    /// Names of links reachable from `id`'s child link, including it.
    pub fn subtree_links(&self, id: JointId) -> Vec<String> {
        std::iter::once(id)
            .chain(self.descendant_joints(id))
            .filter_map(|j| self.joints.get(j))
            .filter(|j| self.link(j.child_link_name()).is_some())
            .map(|j| j.child_link_name().to_string())
            .collect()
    }
}
