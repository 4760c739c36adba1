use log::trace;

use crate::{
    error::JointError,
    point::Point2D,
    smoother::AnchorSmoother,
    tree::{JointTree, Traverse},
    types::JointId,
};

/// A joint tree driven through its anchor once per host tick.
///
/// The rig owns the tree, so a whole tick (smoothing plus propagation)
/// runs under one `&mut` borrow and no caller can observe a half-updated
/// tree. Hosts that share a rig across threads wrap it in a single lock.
#[derive(Clone, Debug)]
pub struct Rig {
    tree: JointTree,
    root: JointId,
    smoother: AnchorSmoother,
}

impl Rig {
    /// ### Errors
    /// [`JointError::UnknownJoint`] if `root` is not in `tree`.
    pub fn new(
        tree: JointTree,
        root: JointId,
        smoother: AnchorSmoother,
    ) -> Result<Self, JointError> {
        if tree.joint(root).is_none() {
            return Err(JointError::UnknownJoint(root));
        }
        Ok(Self {
            tree,
            root,
            smoother,
        })
    }

    /// Advances the rig by one tick.
    ///
    /// The anchor moves toward `target` according to the smoother and the
    /// tree is re-propagated from the new anchor. Propagation runs on every
    /// tick, even if the anchor did not move. A non-finite `target` leaves
    /// the anchor where it is.
    ///
    /// ### Parameters
    /// - `target` - Where the host wants the anchor to be.
    /// - `dt` - Seconds elapsed since the previous tick.
    ///
    /// ### Returns
    /// The effective anchor position used for this tick.
    pub fn tick(&mut self, target: Point2D, dt: f32) -> Result<Point2D, JointError> {
        let anchor = self.smoother.step(self.anchor(), target, dt);
        self.tree.update(self.root, anchor)?;
        trace!("tick: target {target}, anchor {anchor}, dt {dt}");
        Ok(anchor)
    }

    /// Current position of the root joint.
    pub fn anchor(&self) -> Point2D {
        self.tree
            .joint(self.root)
            .map(|j| j.pos())
            .unwrap_or_default()
    }

    #[inline]
    pub fn root(&self) -> JointId {
        self.root
    }

    #[inline]
    pub fn tree(&self) -> &JointTree {
        &self.tree
    }

    /// Mutable access for attaching joints between ticks.
    #[inline]
    pub fn tree_mut(&mut self) -> &mut JointTree {
        &mut self.tree
    }

    #[inline]
    pub fn smoother(&self) -> AnchorSmoother {
        self.smoother
    }

    pub fn set_smoother(&mut self, smoother: AnchorSmoother) {
        self.smoother = smoother;
    }

    /// Depth-first walk from the anchor, for rendering.
    pub fn traverse(&self) -> Traverse<'_> {
        self.tree.traverse(self.root)
    }

    /// Replaces the tree and root, keeping the smoother.
    pub fn reset_to(&mut self, tree: JointTree, root: JointId) -> Result<(), JointError> {
        *self = Self::new(tree, root, self.smoother)?;
        Ok(())
    }
}
