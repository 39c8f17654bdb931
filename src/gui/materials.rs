use std::cell::RefCell;
use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::light::Light;
use kiss3d::resource::{Effect, Material, Mesh, ShaderAttribute, ShaderUniform};
use kiss3d::scene::ObjectData;
use nalgebra::{Isometry3, Matrix3, Matrix4, Point2, Point3, Vector3};

use crate::model::catalog::{AmbientLight, PointLight, Shading};

pub type MaterialHandle = Rc<RefCell<Box<dyn Material + 'static>>>;

pub struct Materials {
    basic: MaterialHandle,
    standard: MaterialHandle,
}

impl Materials {
    pub fn new(ambient: &AmbientLight, point: &PointLight) -> Self {
        Materials {
            basic: Rc::new(RefCell::new(
                Box::new(BasicMaterial::new()) as Box<dyn Material + 'static>
            )),
            standard: Rc::new(RefCell::new(
                Box::new(StandardMaterial::new(ambient, point)) as Box<dyn Material + 'static>
            )),
        }
    }

    pub fn get(&self, shading: Shading) -> MaterialHandle {
        match shading {
            Shading::Basic => self.basic.clone(),
            Shading::Standard => self.standard.clone(),
        }
    }
}

fn set_culling(ctxt: &Context, data: &ObjectData) {
    if data.backface_culling_enabled() {
        ctxt.enable(Context::CULL_FACE);
    } else {
        ctxt.disable(Context::CULL_FACE);
    }
}

fn scale_matrix(scale: &Vector3<f32>) -> Matrix3<f32> {
    Matrix3::from_diagonal(scale)
}

// Texture times color, no lighting
pub struct BasicMaterial {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    tex_coord: ShaderAttribute<Point2<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    scale: ShaderUniform<Matrix3<f32>>,
    color: ShaderUniform<Point3<f32>>,
}

impl BasicMaterial {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(BASIC_VERTEX_SRC, BASIC_FRAGMENT_SRC);

        shader.use_program();

        BasicMaterial {
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
            transform: shader
                .get_uniform::<Matrix4<f32>>("transform")
                .expect("Failed to get shader uniform."),
            scale: shader
                .get_uniform::<Matrix3<f32>>("scale")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            shader,
        }
    }
}

impl Material for BasicMaterial {
    fn render(
        &mut self,
        pass: usize,
        transform: &Isometry3<f32>,
        scale: &Vector3<f32>,
        camera: &mut dyn Camera,
        _: &Light,
        data: &ObjectData,
        mesh: &mut Mesh,
    ) {
        if !data.surface_rendering_active() {
            return;
        }
        let ctxt = Context::get();

        self.shader.use_program();
        self.pos.enable();
        self.tex_coord.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.transform.upload(&transform.to_homogeneous());
        self.scale.upload(&scale_matrix(scale));
        self.color.upload(data.color());

        mesh.bind_coords(&mut self.pos);
        mesh.bind_uvs(&mut self.tex_coord);
        mesh.bind_faces();

        ctxt.active_texture(Context::TEXTURE0);
        ctxt.bind_texture(Context::TEXTURE_2D, Some(&*data.texture()));
        set_culling(&ctxt, data);

        ctxt.draw_elements(
            Context::TRIANGLES,
            mesh.num_pts() as i32,
            Context::UNSIGNED_SHORT,
            0,
        );

        mesh.unbind();
        self.pos.disable();
        self.tex_coord.disable();
    }
}

pub struct StandardMaterial {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    normal: ShaderAttribute<Vector3<f32>>,
    tex_coord: ShaderAttribute<Point2<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    ntransform: ShaderUniform<Matrix3<f32>>,
    scale: ShaderUniform<Matrix3<f32>>,
    color: ShaderUniform<Point3<f32>>,
    light_position: ShaderUniform<Point3<f32>>,
    ambient: ShaderUniform<Vector3<f32>>,
    point_color: ShaderUniform<Vector3<f32>>,
    point_intensity: ShaderUniform<f32>,
    // Lights
    ambient_radiance: Vector3<f32>,
    point_light: PointLight,
}

impl StandardMaterial {
    pub fn new(ambient: &AmbientLight, point: &PointLight) -> Self {
        let mut shader = Effect::new_from_str(STANDARD_VERTEX_SRC, STANDARD_FRAGMENT_SRC);

        shader.use_program();

        StandardMaterial {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            normal: shader
                .get_attrib::<Vector3<f32>>("normal")
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
            transform: shader
                .get_uniform::<Matrix4<f32>>("transform")
                .expect("Failed to get shader uniform."),
            ntransform: shader
                .get_uniform::<Matrix3<f32>>("ntransform")
                .expect("Failed to get shader uniform."),
            scale: shader
                .get_uniform::<Matrix3<f32>>("scale")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            light_position: shader
                .get_uniform::<Point3<f32>>("light_position")
                .expect("Failed to get shader uniform."),
            ambient: shader
                .get_uniform::<Vector3<f32>>("ambient")
                .expect("Failed to get shader uniform."),
            point_color: shader
                .get_uniform::<Vector3<f32>>("point_color")
                .expect("Failed to get shader uniform."),
            point_intensity: shader
                .get_uniform::<f32>("point_intensity")
                .expect("Failed to get shader uniform."),
            shader,
            ambient_radiance: Vector3::from(ambient.color) * ambient.intensity,
            point_light: *point,
        }
    }
}

impl Material for StandardMaterial {
    fn render(
        &mut self,
        pass: usize,
        transform: &Isometry3<f32>,
        scale: &Vector3<f32>,
        camera: &mut dyn Camera,
        light: &Light,
        data: &ObjectData,
        mesh: &mut Mesh,
    ) {
        if !data.surface_rendering_active() {
            return;
        }
        let ctxt = Context::get();

        self.shader.use_program();
        self.pos.enable();
        self.normal.enable();
        self.tex_coord.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        // The window's light wins over the one we were built with, so moving
        // it at runtime still works
        let light_position = match *light {
            Light::Absolute(p) => p,
            Light::StickToCamera => camera.eye(),
        };
        self.light_position.upload(&light_position);
        self.ambient.upload(&self.ambient_radiance);
        self.point_color.upload(&Vector3::from(self.point_light.color));
        self.point_intensity.upload(&self.point_light.intensity);

        self.transform.upload(&transform.to_homogeneous());
        self.ntransform
            .upload(&transform.rotation.to_rotation_matrix().into_inner());
        self.scale.upload(&scale_matrix(scale));
        self.color.upload(data.color());

        mesh.bind(&mut self.pos, &mut self.normal, &mut self.tex_coord);

        ctxt.active_texture(Context::TEXTURE0);
        ctxt.bind_texture(Context::TEXTURE_2D, Some(&*data.texture()));
        set_culling(&ctxt, data);

        ctxt.draw_elements(
            Context::TRIANGLES,
            mesh.num_pts() as i32,
            Context::UNSIGNED_SHORT,
            0,
        );

        mesh.unbind();
        self.pos.disable();
        self.normal.disable();
        self.tex_coord.disable();
    }
}

static BASIC_VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec2 tex_coord;
    uniform mat4 proj;
    uniform mat4 view;
    uniform mat4 transform;
    uniform mat3 scale;
    varying vec2 tex_coord_v;

    void main() {
        tex_coord_v = tex_coord;
        gl_Position = proj * view * transform * vec4(scale * position, 1.0);
    }";

static BASIC_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3 color;
    uniform sampler2D tex;
    varying vec2 tex_coord_v;

    void main() {
        gl_FragColor = texture2D(tex, tex_coord_v) * vec4(color, 1.0);
    }";

static STANDARD_VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 normal;
    attribute vec2 tex_coord;
    uniform mat4 proj;
    uniform mat4 view;
    uniform mat4 transform;
    uniform mat3 ntransform;
    uniform mat3 scale;
    varying vec3 ws_position;
    varying vec3 ws_normal;
    varying vec2 tex_coord_v;

    void main() {
        vec4 world = transform * vec4(scale * position, 1.0);
        ws_position = world.xyz;
        ws_normal = ntransform * normal;
        tex_coord_v = tex_coord;
        gl_Position = proj * view * world;
    }";

static STANDARD_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3 color;
    uniform vec3 light_position;
    uniform vec3 ambient;
    uniform vec3 point_color;
    uniform float point_intensity;
    uniform sampler2D tex;
    varying vec3 ws_position;
    varying vec3 ws_normal;
    varying vec2 tex_coord_v;

    void main() {
        vec3 to_light = light_position - ws_position;
        float dist2 = max(dot(to_light, to_light), 0.0001);
        float lambert = max(dot(normalize(ws_normal), normalize(to_light)), 0.0);
        float irradiance = min(point_intensity * lambert / dist2, 1.0);

        vec4 base = texture2D(tex, tex_coord_v) * vec4(color, 1.0);
        gl_FragColor = vec4(base.rgb * (ambient + point_color * irradiance), base.a);
    }";
