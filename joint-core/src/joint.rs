use crate::{
    config::JointConfig,
    error::ConstraintError,
    point::Point2D,
    projector::Annulus,
    types::{JointId, Rgba},
};

/// Checks a joint's radius and limits.
///
/// - `radius` must be positive and finite.
/// - `stretch_limit` must be at least `1`.
/// - `retract_limit` must lie in `(0, 1]`.
///
/// NaN fails every check.
pub fn validate_constraints(
    radius: f32,
    stretch_limit: f32,
    retract_limit: f32,
) -> Result<(), ConstraintError> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(ConstraintError::NonPositiveRadius(radius));
    }
    if !(stretch_limit >= 1.0) {
        return Err(ConstraintError::StretchBelowOne(stretch_limit));
    }
    if !(retract_limit > 0.0 && retract_limit <= 1.0) {
        return Err(ConstraintError::RetractOutOfRange(retract_limit));
    }
    Ok(())
}

/// A node of a [`JointTree`](crate::tree::JointTree).
///
/// The constraint parameters describe the annulus this joint imposes on
/// each of its children. They are validated once, at construction. The
/// position is only changed by the owning tree, and the parent/child links
/// are maintained by the tree's attach operations.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub(crate) pos: Point2D,
    radius: f32,
    color: Rgba,
    stretch_limit: f32,
    retract_limit: f32,
    pub(crate) parent: Option<JointId>,
    pub(crate) children: Vec<JointId>,
}

impl Joint {
    /// Creates an unattached joint.
    ///
    /// ### Errors
    /// A [`ConstraintError`] if the parameters fail [`validate_constraints`].
    pub fn new(
        pos: Point2D,
        radius: f32,
        color: Rgba,
        stretch_limit: f32,
        retract_limit: f32,
    ) -> Result<Self, ConstraintError> {
        validate_constraints(radius, stretch_limit, retract_limit)?;
        Ok(Self {
            pos,
            radius,
            color,
            stretch_limit,
            retract_limit,
            parent: None,
            children: Vec::with_capacity(2),
        })
    }

    /// Creates an unattached joint at `pos` from a [`JointConfig`].
    pub fn from_config(pos: Point2D, cfg: &JointConfig) -> Result<Self, ConstraintError> {
        Self::new(
            pos,
            cfg.radius,
            cfg.color,
            cfg.stretch_limit,
            cfg.retract_limit,
        )
    }

    #[inline]
    pub fn pos(&self) -> Point2D {
        self.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    #[inline]
    pub fn stretch_limit(&self) -> f32 {
        self.stretch_limit
    }

    #[inline]
    pub fn retract_limit(&self) -> f32 {
        self.retract_limit
    }

    #[inline]
    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// Child ids in attachment order.
    #[inline]
    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    /// The band of distances this joint allows for its children.
    pub fn annulus(&self) -> Annulus {
        Annulus::new(self.radius, self.stretch_limit, self.retract_limit)
    }

    /// Where a child currently at `candidate` must go when this joint sits
    /// at `center`.
    #[inline]
    pub(crate) fn project_child(&self, center: Point2D, candidate: Point2D) -> Point2D {
        crate::projector::project(
            center,
            self.radius,
            candidate,
            self.stretch_limit,
            self.retract_limit,
        )
    }
}
