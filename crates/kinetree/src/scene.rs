//! Scene sink for auxiliary joint visuals.
//!
//! The renderer itself lives elsewhere. This is the part of it joints talk
//! to: a store of frame-axes and arrow objects that accept pose, direction
//! and visibility writes.

use slotmap::{new_key_type, SlotMap};

use kinetree_math::{Pose, Vec3};

new_key_type! {
    /// Handle to an object in the [`Scene`].
    pub struct SceneObjectId;
}

/// Shape of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    /// A coordinate frame triad.
    Axes {
        /// Length of each axis (m).
        length: f64,
        /// Radius of each axis (m).
        radius: f64,
    },
    /// A single arrow.
    Arrow {
        /// Total length (m).
        length: f64,
        /// Shaft radius (m).
        radius: f64,
    },
}

/// One object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Shape.
    pub kind: VisualKind,
    /// World pose.
    pub pose: Pose,
    /// Pointing direction in world space (arrows only).
    pub direction: Vec3,
    /// Whether the object is drawn.
    pub visible: bool,
}

/// Store of scene objects.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<SceneObjectId, SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Create a hidden object at the origin.
    pub fn create(&mut self, kind: VisualKind) -> SceneObjectId {
        self.objects.insert(SceneObject {
            kind,
            pose: Pose::identity(),
            direction: Vec3::z(),
            visible: false,
        })
    }

    /// Look up an object.
    pub fn get(&self, id: SceneObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Move an object.
    pub fn set_pose(&mut self, id: SceneObjectId, pose: Pose) {
        if let Some(object) = self.objects.get_mut(id) {
            object.pose = pose;
        }
    }

    /// Point an arrow.
    pub fn set_direction(&mut self, id: SceneObjectId, direction: Vec3) {
        if let Some(object) = self.objects.get_mut(id) {
            object.direction = direction;
        }
    }

    /// Show or hide an object.
    pub fn set_visible(&mut self, id: SceneObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(id) {
            object.visible = visible;
        }
    }

    /// Destroy an object. Returns whether it existed.
    pub fn destroy(&mut self, id: SceneObjectId) -> bool {
        self.objects.remove(id).is_some()
    }
}
