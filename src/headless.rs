//! Runs the animation with no window attached.

use nalgebra::Point3;

use crate::model::{DetachedNode, SolarSystem};
use crate::run_loop::RunLoop;

/// Where one body ended up, in scene (sun-centered) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyReport {
    pub name: &'static str,
    pub orbiting: Option<&'static str>,
    pub position: Point3<f64>,
}

/// Assembles a fresh system and steps it until `run_loop` stops.
pub fn run(run_loop: &mut RunLoop) -> SolarSystem<DetachedNode> {
    let mut root = DetachedNode::root();
    let mut system = SolarSystem::assemble(&mut root);
    run_loop.run(|| system.step());
    system
}

pub fn report(system: &SolarSystem<DetachedNode>) -> Vec<BodyReport> {
    let mut reports = vec![];
    for planet in system.planets() {
        let to_scene = |p: Point3<f64>| planet.pivot().to_parent(&planet.body().to_parent(&p));

        reports.push(BodyReport {
            name: planet.name(),
            orbiting: None,
            position: to_scene(Point3::origin()),
        });
        for moon in planet.moons() {
            reports.push(BodyReport {
                name: moon.name(),
                orbiting: Some(planet.name()),
                position: to_scene(moon.node().data().position()),
            });
        }
    }
    reports
}
