use super::animation::OrbitNode;
use super::catalog::{CelestialBodySpec, PLANETS, SUN_MATERIAL, SUN_SCALE};
use super::factory::create_planet;
use super::scene_graph::SceneGraphNode;

/// The sun plus every planet in the table, attached to a scene root.
pub struct SolarSystem<N> {
    sun: N,
    planets: Vec<OrbitNode<N>>,
    steps: u64,
}

impl<N: SceneGraphNode> SolarSystem<N> {
    /// Builds the default system from the planet table.
    pub fn assemble(root: &mut N) -> Self {
        Self::assemble_from(root, &PLANETS)
    }

    pub fn assemble_from(root: &mut N, planets: &'static [CelestialBodySpec]) -> Self {
        // The sun stays put, so it needs no pivot.
        let mut sun = root.add_unit_sphere(SUN_MATERIAL);
        sun.set_uniform_scale(SUN_SCALE);

        let planets = planets
            .iter()
            .map(|spec| create_planet(root, spec))
            .collect();

        SolarSystem {
            sun,
            planets,
            steps: 0,
        }
    }

    /// Advances every planet and moon by one frame's worth of motion.
    pub fn step(&mut self) {
        for planet in self.planets.iter_mut() {
            planet.step();
        }
        self.steps += 1;
    }

    pub fn sun(&self) -> &N {
        &self.sun
    }

    pub fn planets(&self) -> &[OrbitNode<N>] {
        &self.planets
    }

    pub fn planet(&self, name: &str) -> Option<&OrbitNode<N>> {
        self.planets
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Number of times `step` has been called.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use crate::model::scene_graph::{DetachedNode, NodeKind};

    #[test]
    fn test_assemble_layout() {
        let mut root = DetachedNode::root();
        let system = SolarSystem::assemble(&mut root);

        // Sun first, then one pivot per planet
        assert_eq!(root.num_children(), 1 + PLANETS.len());
        assert!(root.child(0).unwrap().same_node(system.sun()));

        let sun = system.sun().data();
        assert_eq!(sun.kind(), NodeKind::Sphere(SUN_MATERIAL));
        assert_relative_eq!(sun.scale(), SUN_SCALE);
        assert_relative_eq!(sun.position(), Point3::origin());

        let names: Vec<_> = system.planets().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Mercury", "Venus", "Earth", "Mars"]);
        for (idx, planet) in system.planets().iter().enumerate() {
            assert!(root.child(idx + 1).unwrap().same_node(planet.pivot()));
        }
    }

    #[test]
    fn test_step_counts() {
        let mut root = DetachedNode::root();
        let mut system = SolarSystem::assemble(&mut root);
        for _ in 0..7 {
            system.step();
        }
        assert_eq!(system.steps(), 7);
        assert!(system.planet("venus").is_some());
        assert!(system.planet("Jupiter").is_none());
    }
}
