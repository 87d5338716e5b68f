#![warn(missing_docs)]

//! kinetree: joint display state for articulated robot models.
//!
//! A [`Robot`] holds the links and joints of one model together with the
//! inspector's property tree and the scene objects joints own. On top of
//! that it provides:
//!
//! - world poses for every joint, composed from parent link frames
//! - tri-state enable checkboxes summarizing the links below each joint,
//!   and the cascade that pushes a user toggle down the subtree
//! - the tree and list layouts of the joint properties
//!
//! # Example
//!
//! ```
//! use kinetree::{
//!     DisplayConfig, JointDescription, JointKind, LinkDescription, Robot, RobotDescription,
//!     TriState,
//! };
//!
//! let desc = RobotDescription::new("arm")
//!     .link(LinkDescription::empty("base"))
//!     .link(LinkDescription::visual("upper_arm"))
//!     .link(LinkDescription::visual("forearm").with_enabled(false))
//!     .joint(JointDescription::new("shoulder", JointKind::Revolute, "base", "upper_arm"))
//!     .joint(JointDescription::new("elbow", JointKind::Revolute, "upper_arm", "forearm"));
//!
//! let mut robot = Robot::from_description(&desc, DisplayConfig::default()).unwrap();
//! assert_eq!(robot.joint_enabled("shoulder").unwrap(), TriState::Mixed);
//!
//! robot.set_joint_enabled("shoulder", true).unwrap();
//! assert!(robot.link("forearm").unwrap().enabled());
//! assert_eq!(robot.joint_enabled("shoulder").unwrap(), TriState::On);
//! ```

pub mod config;
pub mod description;
pub mod error;
pub mod joint;
pub mod link;
pub mod registry;
pub mod robot;
pub mod scene;

pub use config::{DisplayConfig, DisplayStyle};
pub use description::{JointDescription, JointKind, JointLimits, LinkDescription, RobotDescription};
pub use error::{ElementKind, Result, RobotError};
pub use joint::{Checkbox, CheckboxGuard, JointProperties, LinkStateCounts, RobotJoint, TriState};
pub use link::RobotLink;
pub use registry::{JointId, LinkId, ModelRegistry};
pub use robot::Robot;
pub use scene::{Scene, SceneObject, SceneObjectId, VisualKind};

pub use kinetree_math::{compose, Pose, Quat, Tolerance, Vec3};
pub use kinetree_property::{Property, PropertyError, PropertyId, PropertyTree, PropertyValue};
