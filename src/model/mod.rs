//! Scene description and animation, independent of any particular renderer.

pub mod animation;
pub mod assembly;
pub mod catalog;
pub mod factory;
pub mod scene_graph;

pub use animation::{MoonAnimationState, MoonOrbit, OrbitNode, SPIN_STEP};
pub use assembly::SolarSystem;
pub use catalog::{BodyTexture, CelestialBodySpec, MoonSpec, Shading, SurfaceMaterial};
pub use scene_graph::{DetachedNode, SceneGraphNode};
