#![warn(missing_docs)]

//! Math types for kinematic tree displays.
//!
//! Thin wrappers around nalgebra providing the pose types used by joints,
//! links and scene visuals: positions, orientations, rigid poses, and
//! tolerance constants for comparing them.

use nalgebra::{UnitQuaternion, Vector3};

/// A vector (or position) in 3D space, in meters.
pub type Vec3 = Vector3<f64>;

/// A unit quaternion orientation.
pub type Quat = UnitQuaternion<f64>;

/// A rigid pose: position plus orientation.
///
/// A pose is either expressed in world space or relative to a parent frame,
/// depending on where it is stored. Joints keep their origin as a pose
/// relative to the parent link frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Translation component.
    pub position: Vec3,
    /// Rotation component.
    pub orientation: Quat,
}

impl Pose {
    /// The identity pose.
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }

    /// Create a pose from its parts.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Create a pose from an `xyz` translation and fixed-axis `rpy` angles
    /// in radians (roll about X, then pitch about Y, then yaw about Z).
    pub fn from_xyz_rpy(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self {
            position: Vec3::new(xyz[0], xyz[1], xyz[2]),
            orientation: Quat::from_euler_angles(rpy[0], rpy[1], rpy[2]),
        }
    }

    /// Compose `self` (a parent frame) with `local`, a pose expressed in
    /// that parent frame.
    ///
    /// `orientation = parent ∘ local`, `position = parent + parent·local`.
    pub fn compose(&self, local: &Pose) -> Pose {
        compose(&self.position, &self.orientation, local)
    }

    /// Rotate a direction vector into this pose's frame (no translation).
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        self.orientation * v
    }

    /// Inverse of this pose.
    pub fn inverse(&self) -> Pose {
        let orientation = self.orientation.inverse();
        Pose {
            position: -(orientation * self.position),
            orientation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Compose a parent world pose, given as parts, with a local offset pose.
pub fn compose(parent_position: &Vec3, parent_orientation: &Quat, local: &Pose) -> Pose {
    Pose {
        position: parent_position + parent_orientation * local.position,
        orientation: parent_orientation * local.orientation,
    }
}

/// Tolerance constants for pose comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in meters.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default display tolerances (1e-9 m linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        angular: 1e-9,
    };

    /// Check if two positions coincide within tolerance.
    pub fn positions_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two orientations are equal within tolerance.
    pub fn orientations_equal(&self, a: &Quat, b: &Quat) -> bool {
        a.angle_to(b) < self.angular
    }

    /// Check if two poses are equal within tolerance.
    pub fn poses_equal(&self, a: &Pose, b: &Pose) -> bool {
        self.positions_equal(&a.position, &b.position)
            && self.orientations_equal(&a.orientation, &b.orientation)
    }

    /// Check if a vector is effectively zero.
    pub fn is_zero(&self, v: &Vec3) -> bool {
        v.norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_compose() {
        let local = Pose::from_xyz_rpy([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]);
        let world = Pose::identity().compose(&local);
        assert!(Tolerance::DEFAULT.poses_equal(&world, &local));
    }

    #[test]
    fn test_parent_rotation_applies_to_offset() {
        // Parent yawed 90 degrees: a local +X offset lands on world +Y.
        let parent = Pose::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_euler_angles(0.0, 0.0, FRAC_PI_2),
        );
        let local = Pose::new(Vec3::new(2.0, 0.0, 0.0), Quat::identity());
        let world = parent.compose(&local);

        assert_relative_eq!(world.position, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(world.orientation.angle(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_orientation_order() {
        let parent = Pose::from_xyz_rpy([0.0; 3], [FRAC_PI_2, 0.0, 0.0]);
        let local = Pose::from_xyz_rpy([0.0; 3], [0.0, 0.0, FRAC_PI_2]);
        let world = parent.compose(&local);
        let expected = parent.orientation * local.orientation;
        assert!(Tolerance::DEFAULT.orientations_equal(&world.orientation, &expected));

        // Rotations do not commute; the reversed product must differ.
        let reversed = local.orientation * parent.orientation;
        assert!(!Tolerance::DEFAULT.orientations_equal(&world.orientation, &reversed));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let parent = Pose::from_xyz_rpy([0.5, -0.25, 1.0], [0.3, -0.7, 1.1]);
        let local = Pose::from_xyz_rpy([0.1, 0.2, 0.3], [0.0, 0.4, 0.0]);
        assert_eq!(parent.compose(&local), parent.compose(&local));
        assert_eq!(
            parent.compose(&local),
            compose(&parent.position, &parent.orientation, &local)
        );
    }

    #[test]
    fn test_inverse() {
        let pose = Pose::from_xyz_rpy([0.5, -0.25, 1.0], [0.3, -0.7, 1.1]);
        let round = pose.compose(&pose.inverse());
        assert!(Tolerance::DEFAULT.poses_equal(&round, &Pose::identity()));
    }

    #[test]
    fn test_rotate_direction() {
        let pose = Pose::from_xyz_rpy([5.0, 5.0, 5.0], [0.0, 0.0, FRAC_PI_2]);
        let dir = pose.rotate(&Vec3::x());
        assert_relative_eq!(dir, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_tolerance_zero() {
        let tol = Tolerance::default();
        assert!(tol.is_zero(&Vec3::new(1e-12, 0.0, 0.0)));
        assert!(!tol.is_zero(&Vec3::z()));
    }
}
