use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kiss3d::camera::Camera;
use kiss3d::event::{EventManager, WindowEvent};
use kiss3d::light::Light;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use log::{debug, info};
use nalgebra::Point3;

use self::camera::OrbitCamera;
use self::fps::FrameRate;
use self::materials::Materials;
use self::scene::{Kiss3dNode, SceneContext};
use self::skybox::SkyboxRenderer;
use self::textures::TextureCache;
use self::viewport::{apply_resize, Viewport};
use crate::config::Config;
use crate::model::catalog::{AMBIENT_LIGHT, POINT_LIGHT};
use crate::model::SolarSystem;
use crate::run_loop::RunLoop;

pub mod camera;
mod fps;
mod materials;
pub mod scene;
pub mod skybox;
mod textures;
pub mod viewport;

pub const WINDOW_TITLE: &str = "Solar System";

pub struct Simulation {
    system: SolarSystem<Kiss3dNode>,
    camera: OrbitCamera,
    viewport: Viewport,
    skybox: SkyboxRenderer,
    textures: TextureCache,
    run_loop: RunLoop,
    frame_rate: FrameRate,
}

impl Simulation {
    pub fn new(window: &mut Window, config: &Config, run_loop: RunLoop) -> Self {
        window.set_background_color(0.0, 0.0, 0.0);
        window.set_light(Light::Absolute(Point3::from(POINT_LIGHT.position)));

        let context = Rc::new(RefCell::new(SceneContext::new(Materials::new(
            &AMBIENT_LIGHT,
            &POINT_LIGHT,
        ))));
        let mut root = Kiss3dNode::new(window.add_group(), context.clone());
        let system = SolarSystem::assemble(&mut root);
        info!("Assembled the sun and {} planets", system.planets().len());

        // Start loading only once every mesh is bound, so nothing can resolve
        // before its consumers exist
        let textures = TextureCache::start(&config.asset_dir, context);

        let viewport = Viewport::new(window.width(), window.height(), window.scale_factor());
        debug!(
            "Drawing {}x{} at pixel ratio {}",
            viewport.width(),
            viewport.height(),
            viewport.pixel_ratio()
        );

        Simulation {
            system,
            camera: OrbitCamera::overview(viewport.width(), viewport.height()),
            viewport,
            skybox: SkyboxRenderer::new(),
            textures,
            run_loop,
            frame_rate: FrameRate::new(Duration::from_secs(1)),
        }
    }

    pub fn system(&self) -> &SolarSystem<Kiss3dNode> {
        &self.system
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            if let WindowEvent::FramebufferSize(w, h) = event.value {
                apply_resize(&mut self.viewport, &mut self.camera, w, h);
            }
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.skybox), None)
    }

    // kiss3d runs this before advancing the camera and drawing the frame
    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        let system = &mut self.system;
        if !self.run_loop.tick(|| system.step()) {
            info!("Stopping after {} frames", self.run_loop.frames_run());
            window.close();
            return;
        }

        if !self.textures.is_settled() {
            self.textures.poll(&mut self.skybox);
        }

        if let Some(fps) = self.frame_rate.frame() {
            debug!("{:.0} fps", fps);
        }
    }
}
