use nalgebra::Point3;

use super::animation::{MoonOrbit, OrbitNode};
use super::catalog::{CelestialBodySpec, MOON_MATERIAL};
use super::scene_graph::SceneGraphNode;

/// Builds the subtree for one planet and hangs it off `parent`.
///
/// The planet sits on the pivot's +x axis, so spinning the pivot carries it
/// around `parent`'s origin. Moons are parented to the planet's own node, which
/// means they follow it around without any extra bookkeeping.
pub fn create_planet<N: SceneGraphNode>(
    parent: &mut N,
    spec: &'static CelestialBodySpec,
) -> OrbitNode<N> {
    let mut pivot = parent.add_group();

    let mut body = pivot.add_unit_sphere(spec.surface);
    body.set_uniform_scale(spec.radius);
    body.set_position(Point3::new(spec.distance, 0.0, 0.0));

    let moons = spec
        .moons
        .iter()
        .map(|moon_spec| {
            let mut node = body.add_unit_sphere(MOON_MATERIAL);
            node.set_uniform_scale(moon_spec.radius);
            MoonOrbit::new(moon_spec, node)
        })
        .collect();

    OrbitNode::new(spec, pivot, body, moons)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use itertools::Itertools;

    use crate::model::catalog::{find_planet, PLANETS};
    use crate::model::scene_graph::{DetachedNode, NodeKind};

    #[test]
    fn test_planet_hierarchy() {
        let mut root = DetachedNode::root();
        let mars = create_planet(&mut root, find_planet("Mars").unwrap());

        // root -> pivot -> body -> moons
        assert_eq!(root.num_children(), 1);
        assert!(root.child(0).unwrap().same_node(mars.pivot()));
        assert_eq!(mars.pivot().num_children(), 1);
        assert!(mars.pivot().child(0).unwrap().same_node(mars.body()));

        let body = mars.body().data();
        assert_eq!(body.kind(), NodeKind::Sphere(mars.spec().surface));
        assert_relative_eq!(body.scale(), 0.7);
        assert_relative_eq!(body.position(), Point3::new(25.0, 0.0, 0.0));
        assert_eq!(body.children().len(), 2);
    }

    #[test]
    fn test_moons_pair_with_their_nodes() {
        let mut root = DetachedNode::root();
        let mars = create_planet(&mut root, find_planet("Mars").unwrap());

        for (idx, moon) in mars.moons().iter().enumerate() {
            let node = mars.body().child(idx).unwrap();
            assert!(node.same_node(moon.node()));
            assert_eq!(moon.spec(), &mars.spec().moons[idx]);

            let data = node.data();
            assert_eq!(data.kind(), NodeKind::Sphere(MOON_MATERIAL));
            assert_relative_eq!(data.scale(), moon.spec().radius);
            assert_relative_eq!(data.position(), Point3::new(0.0, 0.0, moon.spec().distance));
            assert_eq!(moon.state().current_angle(), 0.0);
        }
    }

    #[test]
    fn test_planets_get_separate_pivots() {
        let mut root = DetachedNode::root();
        let planets: Vec<_> = PLANETS.iter().map(|p| create_planet(&mut root, p)).collect();

        assert_eq!(root.num_children(), PLANETS.len());
        for (a, b) in planets.iter().tuple_combinations() {
            assert!(!a.pivot().same_node(b.pivot()));
        }
        for planet in planets.iter() {
            assert_eq!(planet.revolution_angle(), 0.0);
            assert_eq!(planet.spin_angle(), 0.0);
            assert_eq!(planet.moons().len(), planet.spec().moons.len());
        }
    }
}
