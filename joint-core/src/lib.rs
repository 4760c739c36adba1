//! Core 2-D joint tree and distance-constraint propagation library.
//!
//! Main components:
//! - [`point`] — the [`Point2D`](point::Point2D) value type and its arithmetic.
//! - [`projector`] — clamping a candidate point into a joint's annulus.
//! - [`joint`] — single joints and their constraint parameters.
//! - [`tree`] — the joint arena, attachment rules and update propagation.
//! - [`smoother`] — interpolation of the externally supplied anchor target.
//! - [`rig`] — one tree, its root and a smoother, driven once per tick.
//! - [`builder`] — factories for demo chains and random appendages.
//! - [`config`] — serde-backed configuration for joints, chains and follow.
//! - [`error`] — error types shared by the modules above.
//! - [`types`] — shared type aliases and IDs.

pub mod builder;
pub mod config;
pub mod error;
pub mod joint;
pub mod point;
pub mod projector;
pub mod rig;
pub mod smoother;
pub mod tree;
pub mod types;
