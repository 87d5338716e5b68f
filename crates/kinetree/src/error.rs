//! Error types for robot joint displays.

use thiserror::Error;

use kinetree_property::PropertyError;

/// What kind of model element a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A link.
    Link,
    /// A joint.
    Joint,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Link => write!(f, "link"),
            ElementKind::Joint => write!(f, "joint"),
        }
    }
}

/// Errors raised by the robot display.
#[derive(Error, Debug)]
pub enum RobotError {
    /// A name did not resolve in the model registry.
    #[error("{kind} not found: {name}")]
    ReferenceNotFound {
        /// Kind of element that was looked up.
        kind: ElementKind,
        /// The name that did not resolve.
        name: String,
    },

    /// Two links share a name.
    #[error("duplicate link name: {0}")]
    DuplicateLink(String),

    /// Two joints share a name.
    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// A link is the child of more than one joint.
    #[error("link {link} has parent joints {first} and {second}")]
    MultipleParents {
        /// The link with two parents.
        link: String,
        /// The first joint claiming it.
        first: String,
        /// The second joint claiming it.
        second: String,
    },

    /// The joint graph contains a cycle.
    #[error("kinematic loop detected at joint {0}")]
    KinematicLoop(String),

    /// A UI write targeted the checkbox of a joint with nothing to toggle.
    #[error("joint {0} has no checkbox")]
    CheckboxHidden(String),

    /// Display configuration is out of range.
    #[error("invalid display config: {0}")]
    InvalidConfig(String),

    /// Property tree operation failed.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Display configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Model description could not be (de)serialized.
    #[error("description error: {0}")]
    Description(#[from] serde_json::Error),
}

impl RobotError {
    /// A link name that did not resolve.
    pub fn link_not_found(name: impl Into<String>) -> Self {
        RobotError::ReferenceNotFound {
            kind: ElementKind::Link,
            name: name.into(),
        }
    }

    /// A joint name that did not resolve.
    pub fn joint_not_found(name: impl Into<String>) -> Self {
        RobotError::ReferenceNotFound {
            kind: ElementKind::Joint,
            name: name.into(),
        }
    }
}

/// Result type for robot display operations.
pub type Result<T> = std::result::Result<T, RobotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_messages() {
        assert_eq!(
            RobotError::link_not_found("forearm").to_string(),
            "link not found: forearm"
        );
        assert_eq!(
            RobotError::joint_not_found("elbow").to_string(),
            "joint not found: elbow"
        );
    }
}
