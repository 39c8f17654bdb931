use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform, Texture,
};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::model::catalog::CUBE_MAP_FACES;

const NUM_FACES: usize = 6;
const VERTICES_PER_FACE: usize = 6;

// Far enough out to sit behind every body, near enough that even the cube's
// corners stay inside the far clip plane.
const HALF_SIZE: f32 = 150.0;

// (direction, right, up) for each face, seen from inside, in CUBE_MAP_FACES order
const FACE_AXES: [([f32; 3], [f32; 3], [f32; 3]); NUM_FACES] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

pub fn face_vertices(face: usize) -> [(Point3<f32>, Point2<f32>); VERTICES_PER_FACE] {
    let (dir, right, up) = FACE_AXES[face];
    let (dir, right, up) = (Vector3::from(dir), Vector3::from(right), Vector3::from(up));

    let corner = |u: f32, v: f32| {
        let p = dir + right * (2.0 * u - 1.0) + up * (1.0 - 2.0 * v);
        (Point3::from(p), Point2::new(u, v))
    };

    let top_left = corner(0.0, 0.0);
    let top_right = corner(1.0, 0.0);
    let bottom_left = corner(0.0, 1.0);
    let bottom_right = corner(1.0, 1.0);
    [
        top_left,
        bottom_left,
        bottom_right,
        top_left,
        bottom_right,
        top_right,
    ]
}

pub struct SkyboxRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    tex_coord: ShaderAttribute<Point2<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    eye: ShaderUniform<Point3<f32>>,
    half_size: ShaderUniform<f32>,
    // Data storage
    positions: GPUVec<Point3<f32>>,
    tex_coords: GPUVec<Point2<f32>>,
    faces: [Option<Rc<Texture>>; NUM_FACES],
}

impl SkyboxRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        let (positions, tex_coords): (Vec<_>, Vec<_>) = (0..NUM_FACES)
            .flat_map(|face| face_vertices(face).to_vec())
            .unzip();
        debug_assert_eq!(CUBE_MAP_FACES.len(), NUM_FACES);

        SkyboxRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            tex_coord: shader
                .get_attrib::<Point2<f32>>("tex_coord")
                .expect("Failed to get shader attribute."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            eye: shader
                .get_uniform::<Point3<f32>>("eye")
                .expect("Failed to get shader uniform."),
            half_size: shader
                .get_uniform::<f32>("half_size")
                .expect("Failed to get shader uniform."),
            shader,
            positions: GPUVec::new(positions, BufferType::Array, AllocationType::StaticDraw),
            tex_coords: GPUVec::new(tex_coords, BufferType::Array, AllocationType::StaticDraw),
            faces: Default::default(),
        }
    }

    pub fn set_face(&mut self, face: usize, texture: Rc<Texture>) {
        self.faces[face] = Some(texture);
    }

    pub fn num_loaded_faces(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }
}

impl Renderer for SkyboxRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.num_loaded_faces() == 0 {
            return;
        }

        self.shader.use_program();
        self.pos.enable();
        self.tex_coord.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.eye.upload(&camera.eye());
        self.half_size.upload(&HALF_SIZE);

        self.pos.bind_sub_buffer(&mut self.positions, 0, 0);
        self.tex_coord.bind_sub_buffer(&mut self.tex_coords, 0, 0);

        let ctxt = Context::get();
        ctxt.disable(Context::CULL_FACE);
        ctxt.active_texture(Context::TEXTURE0);
        for (idx, face) in self.faces.iter().enumerate() {
            let texture = match face {
                Some(texture) => texture,
                None => continue,
            };
            ctxt.bind_texture(Context::TEXTURE_2D, Some(&**texture));
            ctxt.draw_arrays(
                Context::TRIANGLES,
                (idx * VERTICES_PER_FACE) as i32,
                VERTICES_PER_FACE as i32,
            );
        }

        self.pos.disable();
        self.tex_coord.disable();
    }
}

// Pins the cube to the eye and pushes it out to the far plane
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec2 tex_coord;
    uniform mat4 proj;
    uniform mat4 view;
    uniform vec3 eye;
    uniform float half_size;
    varying vec2 tex_coord_v;

    void main() {
        vec4 clip = proj * view * vec4(eye + half_size * position, 1.0);
        gl_Position = vec4(clip.xy, 0.99999 * clip.w, clip.w);
        tex_coord_v = tex_coord;
    }";

static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform sampler2D tex;
    varying vec2 tex_coord_v;

    void main() {
        gl_FragColor = texture2D(tex, tex_coord_v);
    }";

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_faces_lie_on_cube() {
        for face in 0..NUM_FACES {
            let (dir, _, _) = FACE_AXES[face];
            let dir = Vector3::from(dir);
            for (p, uv) in face_vertices(face).iter() {
                assert_relative_eq!(p.coords.dot(&dir), 1.0);
                assert_relative_eq!(p.coords.amax(), 1.0);
                assert!((0.0..=1.0).contains(&uv.x));
                assert!((0.0..=1.0).contains(&uv.y));
            }
        }
    }

    #[test]
    fn test_faces_cover_corners() {
        for face in 0..NUM_FACES {
            let vertices = face_vertices(face);
            let mut uvs: Vec<_> = vertices.iter().map(|(_, uv)| (uv.x, uv.y)).collect();
            uvs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            uvs.dedup();
            assert_eq!(uvs, vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]);
        }
    }

    #[test]
    fn test_cube_fits_in_clip_range() {
        let corner = HALF_SIZE * 3.0f32.sqrt();
        assert!(corner < crate::gui::camera::Z_FAR);
    }
}
