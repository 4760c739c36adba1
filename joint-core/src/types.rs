/// Identifier for a joint in a [`crate::tree::JointTree`].
///
/// This is an index into the tree's arena, and is only meaningful within
/// the lifetime of a given `JointTree` instance.
pub type JointId = usize;

/// RGBA color carried by each joint. The core never interprets it; it is
/// handed back to the renderer unchanged.
pub type Rgba = [f32; 4];
