use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::{error::JointError, joint::Joint, point::Point2D, types::JointId};

/// Arena of [`Joint`]s linked into a forest of trees.
///
/// Joints are addressed by their [`JointId`] (index into the arena) and are
/// never removed, so ids stay valid for the lifetime of the tree. Every
/// joint has at most one parent, and [`JointTree::attach`] refuses links
/// that would close a cycle, so the graph reachable from any joint is a
/// finite tree.
#[derive(Clone, Debug, Default)]
pub struct JointTree {
    nodes: Vec<Joint>,
}

impl JointTree {
    /// Id of the joint passed to [`JointTree::new`].
    pub const ROOT: JointId = 0;

    /// Creates a tree holding a single root joint with id [`JointTree::ROOT`].
    pub fn new(root: Joint) -> Self {
        let mut nodes = Vec::with_capacity(16);
        nodes.push(Self::detached(root));
        Self { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the joint with the given id, if any.
    #[inline]
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.nodes.get(id)
    }

    /// Iterates over all joints in id order, attached or not.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &Joint)> {
        self.nodes.iter().enumerate()
    }

    /// Ids of all joints without a parent.
    pub fn roots(&self) -> impl Iterator<Item = JointId> + '_ {
        self.iter()
            .filter_map(|(id, j)| j.parent.is_none().then_some(id))
    }

    /// Adds an unattached joint and returns its id.
    ///
    /// Any links the joint carried are dropped; use [`JointTree::attach`]
    /// to connect it.
    pub fn add_joint(&mut self, joint: Joint) -> JointId {
        let id = self.nodes.len();
        self.nodes.push(Self::detached(joint));
        id
    }

    /// Adds `joint` as the last child of `parent` and returns its id.
    ///
    /// ### Errors
    /// [`JointError::UnknownJoint`] if `parent` does not exist; the tree is
    /// left unchanged.
    pub fn add_child(&mut self, parent: JointId, joint: Joint) -> Result<JointId, JointError> {
        self.check(parent)?;
        let id = self.add_joint(joint);
        self.link(parent, id);
        Ok(id)
    }

    /// Attaches the existing joint `child` as the last child of `parent`.
    ///
    /// ### Errors
    /// Checked in this order, all before any mutation:
    /// - [`JointError::SelfAttachment`] if `parent == child`.
    /// - [`JointError::UnknownJoint`] if either id does not exist.
    /// - [`JointError::AlreadyAttached`] if `child` already has a parent.
    /// - [`JointError::WouldCreateCycle`] if `child` is an ancestor of
    ///   `parent`.
    pub fn attach(&mut self, parent: JointId, child: JointId) -> Result<(), JointError> {
        if parent == child {
            warn!("rejected self-attachment of joint {parent}");
            return Err(JointError::SelfAttachment(parent));
        }
        self.check(parent)?;
        self.check(child)?;

        if let Some(existing) = self.nodes[child].parent {
            warn!("joint {child} already has parent {existing}");
            return Err(JointError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor(child, parent) {
            warn!("attaching {child} under {parent} would create a cycle");
            return Err(JointError::WouldCreateCycle { parent, child });
        }

        self.link(parent, child);
        Ok(())
    }

    /// Returns `true` if `ancestor` lies on the parent chain of `id`.
    ///
    /// A joint is not its own ancestor. Unknown ids yield `false`.
    pub fn is_ancestor(&self, ancestor: JointId, id: JointId) -> bool {
        let mut cur = self.nodes.get(id).and_then(|j| j.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes[p].parent;
        }
        false
    }

    /// Moves `root` to `target` and re-satisfies every constraint below it.
    ///
    /// Joints are processed breadth-first from `root`. For each dequeued
    /// `(joint, p)`:
    ///
    /// 1. The joint's position is set to `p` if it differs.
    /// 2. Each child, in attachment order, is projected from its current
    ///    position into the annulus around `p` and enqueued with the
    ///    projected position.
    ///
    /// Children are visited even when their parent did not move. Each edge
    /// is visited exactly once.
    ///
    /// ### Postconditions
    /// `root` sits at `target`, and every joint reachable from `root` lies
    /// within its parent's annulus.
    ///
    /// ### Errors
    /// [`JointError::UnknownJoint`] if `root` does not exist.
    pub fn update(&mut self, root: JointId, target: Point2D) -> Result<(), JointError> {
        self.check(root)?;

        let mut queue = VecDeque::with_capacity(self.nodes.len());
        queue.push_back((root, target));
        let mut visited = 0usize;

        while let Some((id, p)) = queue.pop_front() {
            visited += 1;
            if self.nodes[id].pos != p {
                self.nodes[id].pos = p;
            }

            let joint = &self.nodes[id];
            for &child in &joint.children {
                let proj = joint.project_child(p, self.nodes[child].pos);
                queue.push_back((child, proj));
            }
        }

        trace!("update: joint {root} -> {target}, {visited} joints visited");
        Ok(())
    }

    /// Depth-first, pre-order walk over the joints reachable from `root`.
    ///
    /// Children are emitted in attachment order. Each call starts a fresh
    /// walk, and a visited set guarantees every joint is emitted at most
    /// once. An unknown `root` yields an empty walk.
    pub fn traverse(&self, root: JointId) -> Traverse<'_> {
        let mut stack = Vec::with_capacity(16);
        if root < self.nodes.len() {
            stack.push(root);
        }
        Traverse {
            tree: self,
            stack,
            visited: vec![false; self.nodes.len()],
        }
    }

    /// `(parent, child)` position pairs for every edge reachable from `root`,
    /// in [`JointTree::traverse`] order.
    pub fn links(&self, root: JointId) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.traverse(root).flat_map(move |(_, joint)| {
            joint
                .children
                .iter()
                .map(move |&c| (joint.pos, self.nodes[c].pos))
        })
    }

    /// Largest distance by which any edge below `root` lies outside its
    /// parent's annulus. `0.0` means every constraint holds.
    pub fn max_violation(&self, root: JointId) -> f32 {
        self.traverse(root)
            .flat_map(move |(_, joint)| {
                let annulus = joint.annulus();
                joint
                    .children
                    .iter()
                    .map(move |&c| annulus.violation(joint.pos.distance(self.nodes[c].pos)))
            })
            .fold(0.0, f32::max)
    }

    /// Finds the joint closest to `pos`.
    ///
    /// ### Returns
    /// `Some((id, distance_squared))`, or `None` for an empty tree.
    pub fn find_nearest_joint(&self, pos: Point2D) -> Option<(JointId, f32)> {
        let mut best = None;
        let mut best_d2 = f32::MAX;
        for (id, j) in self.nodes.iter().enumerate() {
            let d = j.pos - pos;
            let d2 = d.x * d.x + d.y * d.y;
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }

    fn check(&self, id: JointId) -> Result<(), JointError> {
        if id < self.nodes.len() {
            Ok(())
        } else {
            Err(JointError::UnknownJoint(id))
        }
    }

    fn link(&mut self, parent: JointId, child: JointId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        debug!("attached joint {child} to joint {parent}");
    }

    fn detached(mut joint: Joint) -> Joint {
        joint.parent = None;
        joint.children.clear();
        joint
    }
}

/// Iterator returned by [`JointTree::traverse`].
#[derive(Clone, Debug)]
pub struct Traverse<'a> {
    tree: &'a JointTree,
    stack: Vec<JointId>,
    visited: Vec<bool>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (JointId, &'a Joint);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if std::mem::replace(&mut self.visited[id], true) {
                continue;
            }
            let joint = &self.tree.nodes[id];
            // Reversed so the first child is popped first.
            self.stack.extend(joint.children.iter().rev());
            return Some((id, joint));
        }
        None
    }
}
