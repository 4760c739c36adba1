//! Factories for ready-made joint trees.
//!
//! Both builders lay joints out so that every constraint already holds:
//! each child starts exactly one parent radius away from its parent.

use std::f32::consts::TAU;

use log::debug;
use rand::Rng;

use crate::{
    config::{ChainConfig, RandomTreeConfig},
    error::ConfigError,
    joint::Joint,
    point::Point2D,
    tree::JointTree,
    types::{JointId, Rgba},
};

/// Builds a tapered chain rooted at `origin`, extending along `+x`.
///
/// The root uses `cfg.root_radius` and `cfg.root_color`. Link `i` (1-based)
/// has radius [`ChainConfig::radius_at`]`(i)` and color
/// `lerp(head_color, fade_color, i / (segments + 1))`.
///
/// ### Returns
/// The tree and the id of its root.
pub fn tapered_chain(
    origin: Point2D,
    cfg: &ChainConfig,
) -> Result<(JointTree, JointId), ConfigError> {
    cfg.validate()?;

    let root = Joint::new(
        origin,
        cfg.root_radius,
        cfg.root_color,
        cfg.stretch_limit,
        cfg.retract_limit,
    )?;
    let mut tree = JointTree::new(root);

    let mut parent = JointTree::ROOT;
    let mut pos = origin;
    let mut parent_radius = cfg.root_radius;

    for i in 1..=cfg.segments {
        pos = pos + Point2D::new(parent_radius, 0.0);
        let radius = cfg.radius_at(i);
        let t = i as f32 / (cfg.segments + 1) as f32;
        let link = Joint::new(
            pos,
            radius,
            lerp_color(cfg.head_color, cfg.fade_color, t),
            cfg.stretch_limit,
            cfg.retract_limit,
        )?;
        parent = tree.add_child(parent, link)?;
        parent_radius = radius;
    }

    debug!("built tapered chain of {} joints at {origin}", tree.len());
    Ok((tree, JointTree::ROOT))
}

/// Builds a random branching tree rooted at `origin`.
///
/// Each new joint picks a random existing joint with fewer than
/// `cfg.max_children` children as its parent, and is placed one parent
/// radius away in a random direction. Radii are uniform in
/// `[min_radius, max_radius]` and colors are random and opaque.
pub fn random_tree(
    origin: Point2D,
    cfg: &RandomTreeConfig,
    rng: &mut impl Rng,
) -> Result<(JointTree, JointId), ConfigError> {
    cfg.validate()?;

    let root = Joint::new(
        origin,
        cfg.max_radius,
        random_color(rng),
        cfg.stretch_limit,
        cfg.retract_limit,
    )?;
    let mut tree = JointTree::new(root);
    let mut open: Vec<JointId> = vec![JointTree::ROOT];

    while tree.len() < cfg.joints {
        let slot = rng.random_range(0..open.len());
        let parent = open[slot];
        let (parent_pos, parent_radius) = match tree.joint(parent) {
            Some(j) => (j.pos(), j.radius()),
            None => break,
        };

        let angle = rng.random_range(0.0..TAU);
        let pos = parent_pos + Point2D::new(angle.cos(), angle.sin()) * parent_radius;
        let radius = rng.random_range(cfg.min_radius..=cfg.max_radius);
        let joint = Joint::new(
            pos,
            radius,
            random_color(rng),
            cfg.stretch_limit,
            cfg.retract_limit,
        )?;
        let id = tree.add_child(parent, joint)?;

        if tree.joint(parent).map_or(0, |j| j.children().len()) >= cfg.max_children {
            open.swap_remove(slot);
        }
        open.push(id);
    }

    debug!("built random tree of {} joints at {origin}", tree.len());
    Ok((tree, JointTree::ROOT))
}

fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

fn random_color(rng: &mut impl Rng) -> Rgba {
    [rng.random(), rng.random(), rng.random(), 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn default_chain_matches_demo_shape() {
        let (tree, root) =
            tapered_chain(Point2D::new(100.0, 100.0), &ChainConfig::default()).unwrap();

        assert_eq!(tree.len(), 20);
        let ids: Vec<JointId> = tree.traverse(root).map(|(id, _)| id).collect();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());

        let root_joint = tree.joint(root).unwrap();
        assert_eq!(root_joint.radius(), 45.0);
        assert_eq!(root_joint.color(), [0.2, 0.0, 0.0, 1.0]);
        assert_eq!(tree.joint(1).unwrap().radius(), 44.0);
        assert_eq!(tree.joint(19).unwrap().radius(), 26.0);
        // Link i of m = 20 is (1 - 0.5 i/m, 0.1 i/m, 1 - 0.6 i/m).
        let tip = tree.joint(19).unwrap().color();
        for (got, want) in tip.iter().zip([0.525f32, 0.095, 0.43, 1.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-6);
        }

        // Every joint is a single child of the previous one.
        for (id, j) in tree.iter().skip(1) {
            assert_eq!(j.parent(), Some(id - 1));
        }
        assert_eq!(tree.max_violation(root), 0.0);
    }

    #[test]
    fn chain_links_are_one_parent_radius_apart() {
        let cfg = ChainConfig {
            segments: 3,
            root_radius: 10.0,
            radius_step: 2.0,
            ..ChainConfig::default()
        };
        let (tree, _) = tapered_chain(Point2D::ZERO, &cfg).unwrap();

        let xs: Vec<f32> = tree.iter().map(|(_, j)| j.pos().x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 18.0, 24.0]);
    }

    #[test]
    fn chain_colors_fade() {
        let cfg = ChainConfig {
            segments: 3,
            head_color: [0.0, 0.0, 0.0, 1.0],
            fade_color: [1.0, 1.0, 1.0, 1.0],
            ..ChainConfig::default()
        };
        let (tree, _) = tapered_chain(Point2D::ZERO, &cfg).unwrap();
        let reds: Vec<f32> = (1..=3).map(|id| tree.joint(id).unwrap().color()[0]).collect();
        for (got, want) in reds.iter().zip([0.25f32, 0.5, 0.75]) {
            assert_relative_eq!(*got, want, epsilon = 1e-6);
        }
        assert_eq!(tree.joint(3).unwrap().color()[3], 1.0);
    }

    #[test]
    fn chain_with_no_segments_is_just_the_root() {
        let cfg = ChainConfig {
            segments: 0,
            ..ChainConfig::default()
        };
        let (tree, _) = tapered_chain(Point2D::ZERO, &cfg).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn chain_rejects_invalid_config() {
        let cfg = ChainConfig {
            root_radius: 0.0,
            ..ChainConfig::default()
        };
        assert!(tapered_chain(Point2D::ZERO, &cfg).is_err());
    }

    #[test]
    fn random_tree_respects_config() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = RandomTreeConfig {
            joints: 60,
            max_children: 2,
            ..RandomTreeConfig::default()
        };

        let (tree, root) = random_tree(Point2D::new(5.0, 5.0), &cfg, &mut rng).unwrap();

        assert_eq!(tree.len(), 60);
        assert_eq!(tree.traverse(root).count(), 60);
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![root]);
        for (_, j) in tree.iter() {
            assert!(j.children().len() <= 2);
            assert!((cfg.min_radius..=cfg.max_radius).contains(&j.radius()));
        }
        assert!(tree.max_violation(root) < 1e-3);
    }

    #[test]
    fn random_tree_is_deterministic_for_a_seed() {
        let cfg = RandomTreeConfig::default();
        let (a, _) = random_tree(Point2D::ZERO, &cfg, &mut StdRng::seed_from_u64(9)).unwrap();
        let (b, _) = random_tree(Point2D::ZERO, &cfg, &mut StdRng::seed_from_u64(9)).unwrap();

        let pa: Vec<Point2D> = a.iter().map(|(_, j)| j.pos()).collect();
        let pb: Vec<Point2D> = b.iter().map(|(_, j)| j.pos()).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn random_tree_with_single_joint() {
        let cfg = RandomTreeConfig {
            joints: 1,
            max_children: 0,
            ..RandomTreeConfig::default()
        };
        let (tree, _) = random_tree(Point2D::ZERO, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
