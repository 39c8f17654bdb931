use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kiss3d::scene::SceneNode;
use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};

use super::materials::Materials;
use crate::model::catalog::{BodyTexture, SurfaceMaterial};
use crate::model::scene_graph::SceneGraphNode;

#[derive(Default)]
pub struct SurfaceBindings {
    nodes: HashMap<BodyTexture, Vec<SceneNode>>,
}

impl SurfaceBindings {
    pub fn bind(&mut self, texture: BodyTexture, node: SceneNode) {
        self.nodes.entry(texture).or_default().push(node);
    }

    pub fn apply(&mut self, texture: BodyTexture) {
        let nodes = match self.nodes.get_mut(&texture) {
            Some(nodes) => nodes,
            None => return,
        };
        for node in nodes.iter_mut() {
            node.set_color(1.0, 1.0, 1.0);
            node.set_texture_with_name(texture.texture_name());
        }
    }
}

pub struct SceneContext {
    materials: Materials,
    bindings: SurfaceBindings,
}

impl SceneContext {
    pub fn new(materials: Materials) -> Self {
        SceneContext {
            materials,
            bindings: SurfaceBindings::default(),
        }
    }

    pub fn bindings_mut(&mut self) -> &mut SurfaceBindings {
        &mut self.bindings
    }
}

// Every node is a group. Spheres get one extra child holding the mesh, which
// keeps the mesh's own scale out of the way of anything parented to the body.
#[derive(Clone)]
pub struct Kiss3dNode {
    group: SceneNode,
    parent: Option<SceneNode>,
    context: Rc<RefCell<SceneContext>>,
}

impl Kiss3dNode {
    pub fn new(group: SceneNode, context: Rc<RefCell<SceneContext>>) -> Self {
        Kiss3dNode {
            group,
            parent: None,
            context,
        }
    }

    fn add_child(&mut self, group: SceneNode) -> Self {
        Kiss3dNode {
            group,
            parent: Some(self.group.clone()),
            context: self.context.clone(),
        }
    }

    pub fn scene_node(&self) -> &SceneNode {
        &self.group
    }
}

impl SceneGraphNode for Kiss3dNode {
    fn add_group(&mut self) -> Self {
        let group = self.group.add_group();
        self.add_child(group)
    }

    fn add_unit_sphere(&mut self, material: SurfaceMaterial) -> Self {
        let mut group = self.group.add_group();

        // kiss3d scales its sphere mesh by the diameter
        let mut mesh = group.add_sphere(1.0);
        let color = material.texture.fallback_color();
        mesh.set_color(color.x, color.y, color.z);

        {
            let mut context = self.context.borrow_mut();
            mesh.set_material(context.materials.get(material.shading));
            context.bindings.bind(material.texture, mesh);
        }

        self.add_child(group)
    }

    fn set_uniform_scale(&mut self, scale: f64) {
        let scale = scale as f32;
        self.group.set_local_scale(scale, scale, scale);
    }

    // kiss3d applies a parent's scale to its children's size but not to their
    // offsets, so scale the offset here
    fn set_position(&mut self, position: Point3<f64>) {
        let position: Point3<f32> = nalgebra::convert(position);
        let parent_scale = match &self.parent {
            Some(parent) => parent.data().local_scale(),
            None => Vector3::repeat(1.0),
        };
        self.group.set_local_translation(Translation3::from(
            position.coords.component_mul(&parent_scale),
        ));
    }

    fn set_yaw(&mut self, angle: f64) {
        self.group.set_local_rotation(UnitQuaternion::from_axis_angle(
            &Vector3::y_axis(),
            angle as f32,
        ));
    }
}
