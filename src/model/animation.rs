use nalgebra::Point3;

use super::catalog::{CelestialBodySpec, MoonSpec};
use super::scene_graph::SceneGraphNode;

/// Self-rotation applied to every planet each frame, in radians.
pub const SPIN_STEP: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct MoonAnimationState {
    angular_speed: f64,
    orbit_radius: f64,
    current_angle: f64,
}

impl MoonAnimationState {
    pub fn new(spec: &MoonSpec) -> Self {
        MoonAnimationState {
            angular_speed: spec.angular_speed,
            orbit_radius: spec.distance,
            current_angle: 0.0,
        }
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn advance(&mut self) {
        self.current_angle += self.angular_speed;
    }

    /// Position on the circular orbit, in the planet's horizontal plane.
    pub fn position(&self) -> Point3<f64> {
        let (sin, cos) = self.current_angle.sin_cos();
        Point3::new(sin * self.orbit_radius, 0.0, cos * self.orbit_radius)
    }
}

/// A moon's scene node, paired with the state that drives it.
#[derive(Debug, Clone)]
pub struct MoonOrbit<N> {
    spec: &'static MoonSpec,
    node: N,
    state: MoonAnimationState,
}

impl<N: SceneGraphNode> MoonOrbit<N> {
    /// Pairs `node` with a fresh state and parks it at the start of its orbit.
    pub(crate) fn new(spec: &'static MoonSpec, mut node: N) -> Self {
        let state = MoonAnimationState::new(spec);
        node.set_position(state.position());
        MoonOrbit { spec, node, state }
    }

    fn step(&mut self) {
        self.state.advance();
        self.node.set_position(self.state.position());
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn spec(&self) -> &'static MoonSpec {
        self.spec
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn state(&self) -> &MoonAnimationState {
        &self.state
    }
}

/// A planet as it lives in the scene: the pivot that carries it around the
/// sun, the body node itself, and its moons.
#[derive(Debug, Clone)]
pub struct OrbitNode<N> {
    spec: &'static CelestialBodySpec,
    pivot: N,
    body: N,
    revolution_angle: f64,
    spin_angle: f64,
    moons: Vec<MoonOrbit<N>>,
}

impl<N: SceneGraphNode> OrbitNode<N> {
    pub(crate) fn new(
        spec: &'static CelestialBodySpec,
        pivot: N,
        body: N,
        moons: Vec<MoonOrbit<N>>,
    ) -> Self {
        debug_assert_eq!(spec.moons.len(), moons.len());
        OrbitNode {
            spec,
            pivot,
            body,
            revolution_angle: 0.0,
            spin_angle: 0.0,
            moons,
        }
    }

    /// Advances the planet and its moons by one frame.
    pub fn step(&mut self) {
        self.revolution_angle += self.spec.angular_speed;
        self.pivot.set_yaw(self.revolution_angle);

        self.spin_angle += SPIN_STEP;
        self.body.set_yaw(self.spin_angle);

        for moon in self.moons.iter_mut() {
            moon.step();
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn spec(&self) -> &'static CelestialBodySpec {
        self.spec
    }

    pub fn angular_speed(&self) -> f64 {
        self.spec.angular_speed
    }

    pub fn revolution_angle(&self) -> f64 {
        self.revolution_angle
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    pub fn pivot(&self) -> &N {
        &self.pivot
    }

    pub fn body(&self) -> &N {
        &self.body
    }

    pub fn moons(&self) -> &[MoonOrbit<N>] {
        &self.moons
    }
}
