use thiserror::Error;

use crate::types::JointId;

/// Errors raised by [`Point2D`](crate::point::Point2D) arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
}

/// A joint's radius or limits are outside their valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConstraintError {
    #[error("radius must be positive and finite, got {0}")]
    NonPositiveRadius(f32),

    #[error("stretch limit must be >= 1, got {0}")]
    StretchBelowOne(f32),

    #[error("retract limit must be in (0, 1], got {0}")]
    RetractOutOfRange(f32),
}

/// Errors raised while building or updating a [`JointTree`](crate::tree::JointTree).
///
/// Every variant is returned before the tree is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum JointError {
    #[error("joint {0} cannot be attached to itself")]
    SelfAttachment(JointId),

    #[error("joint {child} is already attached to joint {parent}")]
    AlreadyAttached { child: JointId, parent: JointId },

    #[error("attaching joint {child} to joint {parent} would create a cycle")]
    WouldCreateCycle { parent: JointId, child: JointId },

    #[error("unknown joint id {0}")]
    UnknownJoint(JointId),

    #[error("invalid constraint parameters: {0}")]
    InvalidConstraintParameters(#[from] ConstraintError),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid constraint parameters: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("tree construction failed: {0}")]
    Joint(#[from] JointError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_error_converts_into_joint_error() {
        let err: JointError = ConstraintError::NonPositiveRadius(0.0).into();
        assert_eq!(
            err,
            JointError::InvalidConstraintParameters(ConstraintError::NonPositiveRadius(0.0))
        );
    }

    #[test]
    fn messages_name_the_offending_ids() {
        let err = JointError::AlreadyAttached {
            child: 3,
            parent: 1,
        };
        assert_eq!(err.to_string(), "joint 3 is already attached to joint 1");
        assert_eq!(
            JointError::SelfAttachment(7).to_string(),
            "joint 7 cannot be attached to itself"
        );
    }
}
