use std::f32::consts::{PI, TAU};

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

pub const FOVY_DEGREES: f32 = 35.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 400.0;
pub const MIN_DISTANCE: f32 = 20.0;
pub const MAX_DISTANCE: f32 = 200.0;
pub const DAMPING_FACTOR: f32 = 0.05;

// An orbit camera in the style of ArcBall: drag with the left button to orbit,
// with the right button to pan, and scroll to zoom. Unlike ArcBall, rotation
// and panning don't land all at once. Each input adds to a pending delta, and
// every frame a fixed fraction of what's pending is applied, so motion eases
// out after the mouse stops.
//
// Angles are measured with +y as up: `theta` is the azimuth (zero looks down
// -z from the +z side) and `phi` is the polar angle from +y.
pub struct OrbitCamera {
    // -- position --
    target: Point3<f32>,
    theta: f32,
    phi: f32,
    radius: f32,
    // -- motion not yet applied --
    theta_pending: f32,
    phi_pending: f32,
    pan_pending: Vector3<f32>,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    theta_step: f32,
    phi_step: f32,
    scroll_ratio: f32,
    phi_limit: f32,
    radius_limits: (f32, f32),
    damping: f32,
}

impl OrbitCamera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, width: u32, height: u32) -> Self {
        let radius_limits = (MIN_DISTANCE, MAX_DISTANCE);
        let phi_limit = 0.001;

        let offset = eye - target;
        let radius = offset.norm();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                nalgebra::clamp(offset.y / radius, -1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        OrbitCamera {
            target,
            theta,
            phi: nalgebra::clamp(phi, phi_limit, PI - phi_limit),
            radius: nalgebra::clamp(radius, radius_limits.0, radius_limits.1),
            theta_pending: 0.0,
            phi_pending: 0.0,
            pan_pending: Vector3::zeros(),
            width,
            height,
            fovy: FOVY_DEGREES.to_radians(),
            last_cursor_pos: Vector2::zeros(),
            theta_step: 0.005,
            phi_step: 0.005,
            scroll_ratio: 1.1,
            phi_limit,
            radius_limits,
            damping: DAMPING_FACTOR,
        }
    }

    pub fn overview(width: u32, height: u32) -> Self {
        OrbitCamera::new(Point3::new(0.0, 5.0, 100.0), Point3::origin(), width, height)
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, Z_NEAR, Z_FAR)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn aspect(&self) -> f32 {
        // A minimized window reports zero; don't divide by it
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.theta, self.phi)
    }

    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.theta_pending += dtheta;
        self.phi_pending += dphi;
    }

    // dx, dy in pixels of mouse motion
    pub fn pan(&mut self, dx: f32, dy: f32) {
        // Size of one pixel at the target's depth
        let pixel = 2.0 * self.radius * (self.fovy / 2.0).tan() / self.height.max(1) as f32;

        let camera_to_world = self.view_transform().inverse();
        let right = camera_to_world.transform_vector(&Vector3::x());
        let up = camera_to_world.transform_vector(&Vector3::y());
        self.pan_pending += (up * dy - right * dx) * pixel;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = nalgebra::clamp(
            self.radius * factor,
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }

    pub fn update_damping(&mut self) {
        let d = self.damping;

        self.theta = (self.theta + self.theta_pending * d) % TAU;
        self.phi = nalgebra::clamp(
            self.phi + self.phi_pending * d,
            self.phi_limit,
            PI - self.phi_limit,
        );
        self.target += self.pan_pending * d;

        self.theta_pending *= 1.0 - d;
        self.phi_pending *= 1.0 - d;
        self.pan_pending *= 1.0 - d;
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);
                let dpos = curr_pos - self.last_cursor_pos;

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Drag right == camera swings left around the target
                    self.rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                } else if canvas.get_mouse_button(MouseButton::Button2) == Action::Press {
                    self.pan(dpos.x, dpos.y);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            // Resizes are applied by the simulation, together with the viewport
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + self.radius * Vector3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.target, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .expect("Camera transformation should be invertible")
    }

    fn clip_planes(&self) -> (f32, f32) {
        (Z_NEAR, Z_FAR)
    }

    fn update(&mut self, _canvas: &Canvas) {
        self.update_damping();
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_overview_eye() {
        let camera = OrbitCamera::overview(800, 600);
        assert_relative_eq!(camera.eye(), Point3::new(0.0, 5.0, 100.0), epsilon = 1e-4);
        assert_relative_eq!(camera.aspect(), 800.0 / 600.0);
        assert_eq!(camera.clip_planes(), (0.1, 400.0));
        assert_relative_eq!(camera.fovy(), 35.0f32.to_radians());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::overview(800, 600);
        for _ in 0..100 {
            camera.zoom(0.5);
            assert!(camera.distance() >= MIN_DISTANCE);
        }
        assert_relative_eq!(camera.distance(), MIN_DISTANCE);

        for _ in 0..100 {
            camera.zoom(3.0);
            assert!(camera.distance() <= MAX_DISTANCE);
        }
        assert_relative_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_start_is_clamped() {
        let camera = OrbitCamera::new(Point3::new(0.0, 0.0, 1.0), Point3::origin(), 10, 10);
        assert_relative_eq!(camera.distance(), MIN_DISTANCE);
    }

    #[test]
    fn test_rotation_eases_in() {
        let mut camera = OrbitCamera::overview(800, 600);
        let (theta0, _) = camera.angles();
        camera.rotate(0.5, 0.0);

        // Nothing moves until a frame goes by
        assert_eq!(camera.angles().0, theta0);

        camera.update_damping();
        assert_relative_eq!(camera.angles().0, theta0 + 0.5 * DAMPING_FACTOR);

        let mut previous = camera.angles().0;
        for _ in 0..600 {
            camera.update_damping();
            let theta = camera.angles().0;
            assert!(theta >= previous);
            previous = theta;
        }
        assert_abs_diff_eq!(camera.angles().0, theta0 + 0.5, epsilon = 1e-4);

        // Orbiting never changes the distance
        assert_relative_eq!(camera.eye().coords.norm(), camera.distance(), max_relative = 1e-5);
    }

    #[test]
    fn test_pole_is_avoided() {
        let mut camera = OrbitCamera::overview(800, 600);
        camera.rotate(0.0, -100.0);
        for _ in 0..600 {
            camera.update_damping();
        }
        let (_, phi) = camera.angles();
        assert!(phi > 0.0);
        assert!(camera.eye().y < camera.distance());
    }

    #[test]
    fn test_pan_moves_target_sideways() {
        let mut camera = OrbitCamera::overview(800, 600);
        camera.pan(100.0, 0.0);
        for _ in 0..600 {
            camera.update_damping();
        }

        // Dragging right slides the view to the left
        let target = camera.target();
        assert!(target.x < 0.0);
        assert_abs_diff_eq!(target.y, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(target.z, 0.0, epsilon = 1e-3);
    }
}
