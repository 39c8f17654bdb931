use std::cell::{Ref, RefCell};
use std::rc::Rc;

use nalgebra::{Point3, Rotation3, Vector3};

use super::catalog::SurfaceMaterial;

/// The handful of scene graph operations the orrery needs from a renderer.
///
/// Implementors are cheap handles (like kiss3d's `SceneNode`): cloning one
/// yields another handle to the same node. A child's transform is expressed in
/// its parent's frame.
pub trait SceneGraphNode: Sized {
    /// Adds an empty transform node as a child of this one.
    fn add_group(&mut self) -> Self;

    /// Adds a child that draws the shared radius-one sphere with `material`.
    /// Children added to the returned node inherit its scale and rotation.
    fn add_unit_sphere(&mut self, material: SurfaceMaterial) -> Self;

    fn set_uniform_scale(&mut self, scale: f64);

    fn set_position(&mut self, position: Point3<f64>);

    /// Sets the rotation about the vertical (+y) axis.
    fn set_yaw(&mut self, angle: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Group,
    Sphere(SurfaceMaterial),
}

#[derive(Debug)]
pub struct NodeData {
    kind: NodeKind,
    position: Point3<f64>,
    scale: f64,
    yaw: f64,
    children: Vec<DetachedNode>,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn children(&self) -> &[DetachedNode] {
        &self.children
    }
}

/// A scene graph that lives purely in memory. Used when running without a
/// window, and handy for inspecting what the factory builds.
#[derive(Debug, Clone)]
pub struct DetachedNode(Rc<RefCell<NodeData>>);

impl DetachedNode {
    pub fn root() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    fn with_kind(kind: NodeKind) -> Self {
        DetachedNode(Rc::new(RefCell::new(NodeData {
            kind,
            position: Point3::origin(),
            scale: 1.0,
            yaw: 0.0,
            children: vec![],
        })))
    }

    fn add_child(&mut self, kind: NodeKind) -> Self {
        let child = Self::with_kind(kind);
        self.0.borrow_mut().children.push(child.clone());
        child
    }

    pub fn data(&self) -> Ref<'_, NodeData> {
        self.0.borrow()
    }

    pub fn child(&self, idx: usize) -> Option<DetachedNode> {
        self.0.borrow().children.get(idx).cloned()
    }

    pub fn num_children(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Whether both handles point at the same node.
    pub fn same_node(&self, other: &DetachedNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Maps a point from this node's frame into its parent's frame.
    pub fn to_parent(&self, point: &Point3<f64>) -> Point3<f64> {
        let data = self.0.borrow();
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), data.yaw);
        data.position + rotation * (point.coords * data.scale)
    }
}

impl SceneGraphNode for DetachedNode {
    fn add_group(&mut self) -> Self {
        self.add_child(NodeKind::Group)
    }

    fn add_unit_sphere(&mut self, material: SurfaceMaterial) -> Self {
        self.add_child(NodeKind::Sphere(material))
    }

    fn set_uniform_scale(&mut self, scale: f64) {
        self.0.borrow_mut().scale = scale;
    }

    fn set_position(&mut self, position: Point3<f64>) {
        self.0.borrow_mut().position = position;
    }

    fn set_yaw(&mut self, angle: f64) {
        self.0.borrow_mut().yaw = angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    use crate::model::catalog::MOON_MATERIAL;

    #[test]
    fn test_handles_share_nodes() {
        let mut root = DetachedNode::root();
        let mut child = root.add_unit_sphere(MOON_MATERIAL);
        child.set_uniform_scale(3.0);

        let same = root.child(0).unwrap();
        assert!(same.same_node(&child));
        assert_eq!(same.data().scale(), 3.0);
        assert_eq!(same.data().kind(), NodeKind::Sphere(MOON_MATERIAL));
        assert_eq!(root.data().kind(), NodeKind::Group);
    }

    #[test]
    fn test_to_parent() {
        let mut node = DetachedNode::root();
        node.set_position(Point3::new(10.0, 0.0, 0.0));
        node.set_uniform_scale(2.0);
        node.set_yaw(FRAC_PI_2);

        // Rotating +x by a quarter turn about +y lands on -z
        assert_relative_eq!(
            node.to_parent(&Point3::new(1.0, 0.0, 0.0)),
            Point3::new(10.0, 0.0, -2.0),
            epsilon = 1e-12
        );
    }
}
