#![warn(missing_docs)]

//! Property tree for kinematic model inspectors.
//!
//! An inspector shows one tree of named, typed properties. Nodes live in a
//! single [`slotmap::SlotMap`] arena and reference each other by
//! [`PropertyId`], so moving a subtree between groupings is a single
//! parent/child index rewrite: node identity, expand state and child order
//! all survive the move.
//!
//! # Example
//!
//! ```
//! use kinetree_property::{PropertyTree, PropertyValue};
//!
//! let mut tree = PropertyTree::new();
//! let root = tree.add("Joints", PropertyValue::Empty);
//! let joint = tree.add_child(root, "shoulder", PropertyValue::Bool(true)).unwrap();
//! let details = tree.add("Details", PropertyValue::Empty);
//!
//! tree.attach(details, Some(joint)).unwrap();
//! assert_eq!(tree.children(joint), &[details]);
//! ```

mod error;

pub use error::{PropertyError, Result};

use kinetree_math::{Quat, Vec3};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a node of a [`PropertyTree`].
    pub struct PropertyId;
}

/// The value shown by a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// No value. For checkbox properties this hides the checkbox.
    Empty,
    /// A boolean, displayed as a checkbox.
    Bool(bool),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// A 3D vector.
    Vector(Vec3),
    /// An orientation.
    Quaternion(Quat),
}

impl PropertyValue {
    /// The boolean value, if this is a checkbox value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The vector value, if any.
    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            PropertyValue::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// The orientation value, if any.
    pub fn as_quaternion(&self) -> Option<Quat> {
        match self {
            PropertyValue::Quaternion(q) => Some(*q),
            _ => None,
        }
    }

    /// True for [`PropertyValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, PropertyValue::Empty)
    }
}

/// A node of the property tree.
#[derive(Debug, Clone)]
pub struct Property {
    /// Display name.
    pub name: String,
    /// Help text shown by the inspector.
    pub description: String,
    /// Current value.
    pub value: PropertyValue,
    /// Whether UI writes are rejected.
    pub read_only: bool,
    /// Whether the node is hidden from display.
    pub hidden: bool,
    /// Whether the node is expanded in the inspector.
    pub expanded: bool,
    /// Third visual state of a checkbox. The value stays a concrete
    /// boolean; this only changes how it is drawn.
    pub indeterminate: bool,
    parent: Option<PropertyId>,
    children: Vec<PropertyId>,
}

impl Property {
    fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            value,
            read_only: false,
            hidden: false,
            expanded: false,
            indeterminate: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The node this one is attached under, if any.
    pub fn parent(&self) -> Option<PropertyId> {
        self.parent
    }

    /// Ordered children.
    pub fn children(&self) -> &[PropertyId] {
        &self.children
    }
}

/// An arena of property nodes forming a forest.
///
/// Nodes are created detached; [`PropertyTree::attach`] and
/// [`PropertyTree::attach_at`] move them. Removing a node destroys its whole
/// subtree; detach anything that must survive first.
#[derive(Debug, Default)]
pub struct PropertyTree {
    nodes: SlotMap<PropertyId, Property>,
}

impl PropertyTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: PropertyId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Create a detached node.
    pub fn add(&mut self, name: impl Into<String>, value: PropertyValue) -> PropertyId {
        self.nodes.insert(Property::new(name, value))
    }

    /// Create a node appended under `parent`.
    pub fn add_child(
        &mut self,
        parent: PropertyId,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> Result<PropertyId> {
        self.node(parent)?;
        let id = self.add(name, value);
        self.link(id, parent, usize::MAX);
        Ok(id)
    }

    /// Look up a node.
    pub fn get(&self, id: PropertyId) -> Option<&Property> {
        self.nodes.get(id)
    }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, id: PropertyId) -> Option<&mut Property> {
        self.nodes.get_mut(id)
    }

    fn node(&self, id: PropertyId) -> Result<&Property> {
        self.nodes.get(id).ok_or(PropertyError::NotFound(id))
    }

    fn node_mut(&mut self, id: PropertyId) -> Result<&mut Property> {
        self.nodes.get_mut(id).ok_or(PropertyError::NotFound(id))
    }

    /// Parent of `id`, or `None` if detached or unknown.
    pub fn parent(&self, id: PropertyId) -> Option<PropertyId> {
        self.nodes.get(id).and_then(|p| p.parent)
    }

    /// Ordered children of `id` (empty for unknown ids).
    pub fn children(&self, id: PropertyId) -> &[PropertyId] {
        self.nodes
            .get(id)
            .map(|p| p.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: PropertyId, node: PropertyId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Move `node` to the end of `new_parent`'s children, or detach it when
    /// `new_parent` is `None`. The node and its subtree stay alive.
    pub fn attach(&mut self, node: PropertyId, new_parent: Option<PropertyId>) -> Result<()> {
        self.attach_at(node, new_parent, usize::MAX)
    }

    /// Move `node` under `new_parent` at `index` (clamped to the child
    /// count), or detach it when `new_parent` is `None`.
    ///
    /// Fails without changing anything if `new_parent` lies inside `node`'s
    /// own subtree.
    pub fn attach_at(
        &mut self,
        node: PropertyId,
        new_parent: Option<PropertyId>,
        index: usize,
    ) -> Result<()> {
        self.node(node)?;
        if let Some(parent) = new_parent {
            self.node(parent)?;
            if self.is_ancestor(node, parent) {
                return Err(PropertyError::WouldCycle { node, parent });
            }
        }
        self.unlink(node);
        if let Some(parent) = new_parent {
            self.link(node, parent, index);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. Fails if `child` is not attached there.
    pub fn take_child(&mut self, parent: PropertyId, child: PropertyId) -> Result<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(PropertyError::NotAChild { parent, child });
        }
        self.unlink(child);
        Ok(())
    }

    fn unlink(&mut self, node: PropertyId) {
        let Some(old_parent) = self.nodes.get_mut(node).and_then(|p| p.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(old_parent) {
            parent.children.retain(|&c| c != node);
        }
    }

    fn link(&mut self, node: PropertyId, parent: PropertyId, index: usize) {
        if let Some(p) = self.nodes.get_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, node);
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = Some(parent);
        }
    }

    /// Destroy `id` and its whole subtree. Returns the number of nodes freed.
    pub fn remove(&mut self, id: PropertyId) -> usize {
        if !self.nodes.contains_key(id) {
            return 0;
        }
        self.unlink(id);
        let mut stack = vec![id];
        let mut freed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                freed += 1;
            }
        }
        freed
    }

    /// Current value of `id`.
    pub fn value(&self, id: PropertyId) -> Option<&PropertyValue> {
        self.nodes.get(id).map(|p| &p.value)
    }

    /// Programmatic write. Ignores `read_only`. Returns whether the value
    /// changed.
    pub fn set_value(&mut self, id: PropertyId, value: PropertyValue) -> Result<bool> {
        let node = self.node_mut(id)?;
        if node.value == value {
            return Ok(false);
        }
        node.value = value;
        Ok(true)
    }

    /// Write on behalf of the user. Rejects read-only nodes.
    pub fn set_value_from_ui(&mut self, id: PropertyId, value: PropertyValue) -> Result<bool> {
        if self.node(id)?.read_only {
            return Err(PropertyError::ReadOnly(id));
        }
        self.set_value(id, value)
    }

    /// Set the help text.
    pub fn set_description(&mut self, id: PropertyId, description: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.description = description.into();
        Ok(())
    }

    /// Mark the node read-only (or writable).
    pub fn set_read_only(&mut self, id: PropertyId, read_only: bool) -> Result<()> {
        self.node_mut(id)?.read_only = read_only;
        Ok(())
    }

    /// Hide or show the node.
    pub fn set_hidden(&mut self, id: PropertyId, hidden: bool) -> Result<()> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Expand or collapse the node.
    pub fn set_expanded(&mut self, id: PropertyId, expanded: bool) -> Result<()> {
        self.node_mut(id)?.expanded = expanded;
        Ok(())
    }

    /// Set the indeterminate checkbox hint.
    pub fn set_indeterminate(&mut self, id: PropertyId, indeterminate: bool) -> Result<()> {
        self.node_mut(id)?.indeterminate = indeterminate;
        Ok(())
    }

    /// Names of `id`'s children, in order. Handy for inspecting layouts.
    pub fn child_names(&self, id: PropertyId) -> Vec<&str> {
        self.children(id)
            .iter()
            .filter_map(|&c| self.nodes.get(c))
            .map(|p| p.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped() -> (PropertyTree, PropertyId, [PropertyId; 3]) {
        let mut tree = PropertyTree::new();
        let root = tree.add("root", PropertyValue::Empty);
        let a = tree.add_child(root, "a", PropertyValue::Float(1.0)).unwrap();
        let b = tree.add_child(root, "b", PropertyValue::Float(2.0)).unwrap();
        let c = tree.add_child(root, "c", PropertyValue::Float(3.0)).unwrap();
        (tree, root, [a, b, c])
    }

    #[test]
    fn test_add_child_appends_in_order() {
        let (tree, root, ids) = grouped();
        assert_eq!(tree.children(root), &ids);
        assert_eq!(tree.child_names(root), vec!["a", "b", "c"]);
        for id in ids {
            assert_eq!(tree.parent(id), Some(root));
        }
    }

    #[test]
    fn test_attach_moves_between_parents() {
        let (mut tree, root, [a, b, c]) = grouped();
        let group = tree.add("group", PropertyValue::Empty);
        tree.attach(b, Some(group)).unwrap();

        assert_eq!(tree.children(root), &[a, c]);
        assert_eq!(tree.children(group), &[b]);
        assert_eq!(tree.parent(b), Some(group));
    }

    #[test]
    fn test_attach_none_detaches_but_keeps_node() {
        let (mut tree, root, [a, b, c]) = grouped();
        tree.set_expanded(b, true).unwrap();
        tree.attach(b, None).unwrap();

        assert_eq!(tree.children(root), &[a, c]);
        assert_eq!(tree.parent(b), None);
        assert!(tree.contains(b));
        assert!(tree.get(b).unwrap().expanded);
    }

    #[test]
    fn test_attach_at_same_parent_reorders() {
        let (mut tree, root, [a, b, c]) = grouped();
        tree.attach_at(c, Some(root), 0).unwrap();
        assert_eq!(tree.children(root), &[c, a, b]);

        // Index past the end clamps.
        tree.attach_at(c, Some(root), 99).unwrap();
        assert_eq!(tree.children(root), &[a, b, c]);
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let (mut tree, root, [a, ..]) = grouped();
        let err = tree.attach(root, Some(a)).unwrap_err();
        assert!(matches!(err, PropertyError::WouldCycle { .. }));
        assert!(tree.attach(a, Some(a)).is_err());
        // Nothing moved.
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_take_child() {
        let (mut tree, root, [a, b, _]) = grouped();
        tree.take_child(root, a).unwrap();
        assert_eq!(tree.parent(a), None);
        assert!(matches!(
            tree.take_child(root, a),
            Err(PropertyError::NotAChild { .. })
        ));
        assert!(matches!(
            tree.take_child(a, b),
            Err(PropertyError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut tree, root, [a, _, _]) = grouped();
        let leaf = tree.add_child(a, "leaf", PropertyValue::Empty).unwrap();
        let other = tree.add("other", PropertyValue::Empty);

        assert_eq!(tree.remove(root), 5);
        assert!(!tree.contains(leaf));
        assert!(tree.contains(other));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.remove(root), 0);
    }

    #[test]
    fn test_remove_unlinks_from_parent() {
        let (mut tree, root, [a, b, c]) = grouped();
        tree.remove(b);
        assert_eq!(tree.children(root), &[a, c]);
    }

    #[test]
    fn test_set_value_reports_change() {
        let (mut tree, _, [a, ..]) = grouped();
        assert!(!tree.set_value(a, PropertyValue::Float(1.0)).unwrap());
        assert!(tree.set_value(a, PropertyValue::Float(4.0)).unwrap());
        assert_eq!(tree.value(a), Some(&PropertyValue::Float(4.0)));
    }

    #[test]
    fn test_ui_write_respects_read_only() {
        let (mut tree, _, [a, ..]) = grouped();
        tree.set_read_only(a, true).unwrap();
        assert!(matches!(
            tree.set_value_from_ui(a, PropertyValue::Float(9.0)),
            Err(PropertyError::ReadOnly(_))
        ));
        // Programmatic writes still go through.
        assert!(tree.set_value(a, PropertyValue::Float(9.0)).unwrap());
    }

    #[test]
    fn test_stale_ids() {
        let (mut tree, _, [a, ..]) = grouped();
        tree.remove(a);
        assert!(matches!(
            tree.set_value(a, PropertyValue::Empty),
            Err(PropertyError::NotFound(_))
        ));
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(PropertyValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PropertyValue::Empty.as_bool(), None);
        assert!(PropertyValue::Empty.is_empty());
        assert_eq!(
            PropertyValue::Vector(Vec3::x()).as_vector(),
            Some(Vec3::x())
        );
        assert!(PropertyValue::Quaternion(Quat::identity())
            .as_quaternion()
            .is_some());
    }
}
