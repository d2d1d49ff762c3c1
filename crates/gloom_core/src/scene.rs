//! Scene graph types for gloom.
//!
//! A [`Scene`] owns a forest of [`SceneNode`] trees. Each node exclusively
//! owns its mesh and its children; there are no parent pointers. World
//! transforms and world bounds are caches, rebuilt top-down by
//! [`Scene::propagate`] once per frame.
//!
//! Updates follow two phases:
//!
//! 1. Mutate local state through `&mut Scene` (move, rotate, enable, add,
//!    remove, [`Scene::advance`] for scripted motion).
//! 2. Call [`Scene::propagate`], which returns a [`FrameView`]. The view
//!    borrows the scene, so no mutation can happen while collision or
//!    rendering reads world-space data through it.

use std::collections::HashMap;
use std::fmt;

use gloom_math::{Aabb, EulerRot, Mat4, Mat4Ext, Quat, Vec3};
use thiserror::Error;

use crate::mesh::IndexedMesh;

/// Errors from structural scene edits and lookups.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("No node named {0:?}")]
    UnknownName(String),

    #[error("A node named {0:?} already exists")]
    DuplicateName(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Stable handle of a node inside a [`Scene`].
///
/// Handles are assigned when a node is added and stay valid until the node
/// is removed. They are never reused within one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transform components that can be composed into a matrix.
///
/// Only scale, rotation and translation are representable. Shear and
/// projective terms have no place here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a transform from translation, XYZ Euler angles in degrees and scale.
    pub fn from_euler_degrees(translation: Vec3, degrees: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Create a new transform from a 4x4 matrix.
    ///
    /// Decomposes the matrix into translation, rotation, and scale. The input
    /// must be an affine SRT matrix; any shear or projective part is lost.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Scripted constant-rate movement, applied in [`Scene::advance`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    /// Units per second, in the parent's space
    pub velocity: Vec3,

    /// Rotation axis scaled by radians per second, in local space
    pub angular_velocity: Vec3,
}

impl Motion {
    fn apply(&self, transform: &mut Transform, dt: f32) {
        transform.translation += self.velocity * dt;
        if self.angular_velocity != Vec3::ZERO {
            let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
            transform.rotation = (transform.rotation * spin).normalize();
        }
    }
}

/// A mesh placed in the hierarchy.
///
/// The local transform is kept as SRT components rather than a raw matrix so
/// that scripted motion and incremental moves compose without drift.
#[derive(Clone, Debug)]
pub struct SceneNode {
    id: Option<NodeId>,
    name: String,
    local: Transform,
    mesh: IndexedMesh,
    children: Vec<SceneNode>,
    instances: Vec<Transform>,
    motion: Option<Motion>,
    active: bool,
    interactive: bool,

    // Derived, rebuilt by propagate()
    world_transform: Mat4,
    world_bounds: Aabb,
    instance_transforms: Vec<Mat4>,
    instance_bounds: Vec<Aabb>,
}

impl SceneNode {
    /// Create an active, non-interactive node with an identity transform.
    pub fn new(name: impl Into<String>, mesh: IndexedMesh) -> Self {
        Self {
            id: None,
            name: name.into(),
            local: Transform::default(),
            mesh,
            children: Vec::new(),
            instances: Vec::new(),
            motion: None,
            active: true,
            interactive: false,
            world_transform: Mat4::IDENTITY,
            world_bounds: Aabb::EMPTY,
            instance_transforms: Vec::new(),
            instance_bounds: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.local = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Draw and collide this mesh once per instance transform, each relative
    /// to the node's world transform, instead of once at the node itself.
    pub fn with_instances(mut self, instances: Vec<Transform>) -> Self {
        self.instances = instances;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Handle assigned by the owning scene, `None` while detached.
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn instances(&self) -> &[Transform] {
        &self.instances
    }

    // ---- local state (phase 1) ----

    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Replace the local transform. Use [`Transform::from_matrix`] to set it
    /// from an SRT matrix.
    pub fn set_local_transform(&mut self, transform: Transform) {
        self.local = transform;
    }

    /// Move by `delta` in the parent's space.
    pub fn translate(&mut self, delta: Vec3) {
        self.local.translation += delta;
    }

    /// Teleport to `position` in the parent's space.
    pub fn set_translation(&mut self, position: Vec3) {
        self.local.translation = position;
    }

    /// Rotate about the node's own axes.
    pub fn rotate(&mut self, rotation: Quat) {
        self.local.rotation = (self.local.rotation * rotation).normalize();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.local.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.local.scale = scale;
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    pub fn set_motion(&mut self, motion: Option<Motion>) {
        self.motion = motion;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enable(&mut self) {
        self.active = true;
    }

    pub fn disable(&mut self) {
        self.active = false;
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    // ---- world state (phase 2) ----

    /// Cached world transform from the last propagation. Before the first
    /// propagation this is the identity matrix.
    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    /// Cached world bounds from the last propagation. Empty for meshes
    /// without vertices and before the first propagation.
    pub fn world_bounds(&self) -> Aabb {
        self.world_bounds
    }

    /// Cached world transforms of each instance.
    pub fn instance_transforms(&self) -> &[Mat4] {
        &self.instance_transforms
    }

    /// Volumes collision should test: one per instance when instanced,
    /// otherwise the node's own world bounds. Empty for meshes without
    /// vertices, whose bounds are undefined.
    pub fn collision_bounds(&self) -> &[Aabb] {
        if self.mesh.is_empty() {
            &[]
        } else if self.instances.is_empty() {
            std::slice::from_ref(&self.world_bounds)
        } else {
            &self.instance_bounds
        }
    }

    /// Recompute world caches for this subtree.
    ///
    /// `world = parent_world * local`, and the world bounds are the bounds of
    /// the 8 local-bounds corners moved by `world`. Bounds are always rebuilt
    /// from local space, never from last frame's world bounds. Inactive
    /// nodes still propagate so their children stay correct.
    pub fn propagate(&mut self, parent_world: &Mat4) {
        self.world_transform = *parent_world * self.local.to_matrix();

        let local_bounds = self.mesh.bounds();
        self.world_bounds = self.world_transform.transform_aabb(&local_bounds);

        self.instance_transforms.clear();
        self.instance_bounds.clear();
        for instance in &self.instances {
            let matrix = self.world_transform * instance.to_matrix();
            self.instance_transforms.push(matrix);
            self.instance_bounds.push(matrix.transform_aabb(&local_bounds));
        }

        let world = self.world_transform;
        for child in &mut self.children {
            child.propagate(&world);
        }
    }

    fn advance(&mut self, dt: f32) {
        if let Some(motion) = self.motion {
            motion.apply(&mut self.local, dt);
        }
        for child in &mut self.children {
            child.advance(dt);
        }
    }

    fn assign_ids(&mut self, next_id: &mut u32) {
        self.id = Some(NodeId(*next_id));
        *next_id += 1;
        for child in &mut self.children {
            child.assign_ids(next_id);
        }
    }

    fn clear_ids(&mut self) {
        self.id = None;
        for child in &mut self.children {
            child.clear_ids();
        }
    }
}

/// Pre-order iterator over a forest of nodes.
pub struct Nodes<'a> {
    stack: Vec<std::slice::Iter<'a, SceneNode>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    self.stack.push(node.children.iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// The scene manager: root nodes in registration order plus handle and
/// name indices over the whole forest.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from the config file)
    pub name: String,

    roots: Vec<SceneNode>,
    next_id: u32,
    generation: u64,

    // Rebuilt on every structural edit
    paths: HashMap<NodeId, Vec<usize>>,
    names: HashMap<String, NodeId>,
    registered: Vec<NodeId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a tree as a new root. Returns the handle of its top node.
    pub fn add_root(&mut self, node: SceneNode) -> SceneResult<NodeId> {
        let id = self.attach(node, None)?;
        log::debug!("Added root {} to scene {:?}", id, self.name);
        Ok(id)
    }

    /// Add a tree under an existing node. Returns the handle of its top node.
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> SceneResult<NodeId> {
        if !self.paths.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.attach(node, Some(parent))?;
        log::debug!("Added {} under {}", id, parent);
        Ok(id)
    }

    fn attach(&mut self, mut node: SceneNode, parent: Option<NodeId>) -> SceneResult<NodeId> {
        self.check_names(&node)?;
        let id = NodeId(self.next_id);
        node.assign_ids(&mut self.next_id);

        match parent {
            None => self.roots.push(node),
            Some(parent) => self
                .node_mut(parent)
                .ok_or(SceneError::UnknownNode(parent))?
                .children
                .push(node),
        }

        self.rebuild_index();
        Ok(id)
    }

    /// Reject a subtree whose names clash with the scene or with itself.
    fn check_names(&self, node: &SceneNode) -> SceneResult<()> {
        let mut seen: Vec<&str> = Vec::new();
        let subtree = Nodes {
            stack: vec![std::slice::from_ref(node).iter()],
        };
        for n in subtree {
            if self.names.contains_key(n.name()) || seen.contains(&n.name()) {
                return Err(SceneError::DuplicateName(n.name().to_string()));
            }
            seen.push(n.name());
        }
        Ok(())
    }

    /// Remove a node and its whole subtree, returning it detached.
    pub fn remove(&mut self, id: NodeId) -> SceneResult<SceneNode> {
        let path = self.paths.get(&id).ok_or(SceneError::UnknownNode(id))?.clone();

        let mut node = match path.split_last() {
            Some((&last, [])) => self.roots.remove(last),
            Some((&last, parent_path)) => {
                let parent = Self::walk_mut(&mut self.roots, parent_path)
                    .ok_or(SceneError::UnknownNode(id))?;
                parent.children.remove(last)
            }
            None => return Err(SceneError::UnknownNode(id)),
        };

        node.clear_ids();
        self.rebuild_index();
        log::debug!("Removed {} ({:?}) from scene {:?}", id, node.name, self.name);
        Ok(node)
    }

    fn rebuild_index(&mut self) {
        self.paths.clear();
        self.names.clear();

        let mut path = Vec::new();
        for (i, root) in self.roots.iter().enumerate() {
            path.push(i);
            Self::index_subtree(root, &mut path, &mut self.paths, &mut self.names);
            path.pop();
        }

        // Ids are handed out in registration order
        self.registered.clear();
        self.registered.extend(self.paths.keys().copied());
        self.registered.sort_unstable();
    }

    fn index_subtree(
        node: &SceneNode,
        path: &mut Vec<usize>,
        paths: &mut HashMap<NodeId, Vec<usize>>,
        names: &mut HashMap<String, NodeId>,
    ) {
        if let Some(id) = node.id {
            paths.insert(id, path.clone());
            names.insert(node.name.clone(), id);
        }
        for (i, child) in node.children.iter().enumerate() {
            path.push(i);
            Self::index_subtree(child, path, paths, names);
            path.pop();
        }
    }

    fn walk<'a>(roots: &'a [SceneNode], path: &[usize]) -> Option<&'a SceneNode> {
        let (&first, rest) = path.split_first()?;
        let mut node = roots.get(first)?;
        for &i in rest {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    fn walk_mut<'a>(roots: &'a mut [SceneNode], path: &[usize]) -> Option<&'a mut SceneNode> {
        let (&first, rest) = path.split_first()?;
        let mut node = roots.get_mut(first)?;
        for &i in rest {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Look up a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        Self::walk(&self.roots, self.paths.get(&id)?)
    }

    /// Look up a node by handle for local edits.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let path = self.paths.get(&id)?;
        Self::walk_mut(&mut self.roots, path)
    }

    /// Handle of the node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Like [`find`](Self::find) followed by [`node_mut`](Self::node_mut),
    /// with an error naming the missing node.
    pub fn find_mut(&mut self, name: &str) -> SceneResult<&mut SceneNode> {
        let id = self
            .find(name)
            .ok_or_else(|| SceneError::UnknownName(name.to_string()))?;
        self.node_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    pub fn roots(&self) -> &[SceneNode] {
        &self.roots
    }

    /// All nodes, depth-first, roots in registration order.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![self.roots.iter()],
        }
    }

    /// All nodes in the order they were added to the scene.
    ///
    /// Differs from [`iter`](Self::iter) when a child is attached to an
    /// earlier root after a later root was added.
    pub fn iter_registered(&self) -> impl Iterator<Item = &SceneNode> + '_ {
        self.registered.iter().filter_map(move |&id| self.node(id))
    }

    /// Get total node count.
    pub fn node_count(&self) -> usize {
        self.paths.len()
    }

    /// Get total triangle count across all nodes (instanced nodes count once
    /// per instance).
    pub fn total_triangle_count(&self) -> usize {
        self.iter()
            .map(|n| n.mesh.triangle_count() * n.instances.len().max(1))
            .sum()
    }

    /// Number of completed propagation passes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply scripted motion for `dt` seconds. Phase 1.
    pub fn advance(&mut self, dt: f32) {
        for root in &mut self.roots {
            root.advance(dt);
        }
    }

    /// Recompute every world transform and world bound, root to leaf. Phase 2.
    ///
    /// The returned view is the only way to query collision volumes and
    /// render items, so they are always read after a full pass.
    pub fn propagate(&mut self) -> FrameView<'_> {
        for root in &mut self.roots {
            root.propagate(&Mat4::IDENTITY);
        }
        self.generation += 1;

        FrameView {
            generation: self.generation,
            scene: &*self,
        }
    }
}

/// A world-space volume offered to the collision resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionVolume<'a> {
    pub node: NodeId,
    pub name: &'a str,
    pub bounds: Aabb,
}

/// What the renderer needs to draw one node.
#[derive(Clone, Copy, Debug)]
pub struct RenderItem<'a> {
    pub node: NodeId,
    pub mesh: &'a IndexedMesh,

    /// One matrix per draw: the node's world transform, or each instance's
    pub transforms: &'a [Mat4],
    pub interactive: bool,
}

/// Read-only world-space view of a freshly propagated scene.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    scene: &'a Scene,
    generation: u64,
}

impl<'a> FrameView<'a> {
    /// Propagation pass this view belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn node(&self, id: NodeId) -> Option<&'a SceneNode> {
        self.scene.node(id)
    }

    /// Collision candidates of active nodes in registration order.
    ///
    /// Inactive nodes are skipped but their children are not. Meshes without
    /// vertices contribute nothing.
    pub fn collision_volumes(&self) -> impl Iterator<Item = CollisionVolume<'a>> + 'a {
        self.scene
            .iter_registered()
            .filter(|n| n.active)
            .filter_map(|n| Some((n.id?, n)))
            .flat_map(|(node, n)| {
                n.collision_bounds().iter().map(move |&bounds| CollisionVolume {
                    node,
                    name: n.name(),
                    bounds,
                })
            })
    }

    /// Draw list of active nodes that have geometry.
    pub fn render_items(&self) -> impl Iterator<Item = RenderItem<'a>> + 'a {
        self.scene
            .iter()
            .filter(|n| n.active && !n.mesh.is_empty())
            .filter_map(|n| {
                let transforms = if n.instances.is_empty() {
                    std::slice::from_ref(&n.world_transform)
                } else {
                    n.instance_transforms.as_slice()
                };
                Some(RenderItem {
                    node: n.id?,
                    mesh: &n.mesh,
                    transforms,
                    interactive: n.interactive,
                })
            })
    }

    /// Union of all collision volumes; empty when there are none.
    pub fn world_bounds(&self) -> Aabb {
        self.collision_volumes()
            .fold(Aabb::EMPTY, |acc, v| Aabb::surrounding(&acc, &v.bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;
    use gloom_math::Vec2;

    /// Closed box mesh spanning `min..max` (8 corners, 12 triangles).
    fn box_mesh(min: Vec3, max: Vec3) -> IndexedMesh {
        let aabb = Aabb::from_points(min, max);
        let vertices = aabb
            .corners()
            .into_iter()
            .map(|p| Vertex::new(p, Vec2::ZERO, Vec3::ZERO))
            .collect();
        let indices = vec![
            0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1, 2, 3, 7, 2, 7, 6, 0, 2, 6, 0, 6,
            4, 1, 5, 7, 1, 7, 3,
        ];
        IndexedMesh::new(vertices, indices).unwrap()
    }

    fn unit_box() -> IndexedMesh {
        box_mesh(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity_world_bounds_equal_local() {
        let mut scene = Scene::new("test");
        let id = scene.add_root(SceneNode::new("box", unit_box())).unwrap();

        let view = scene.propagate();
        let node = view.node(id).unwrap();
        assert_eq!(node.world_transform(), Mat4::IDENTITY);
        assert_eq!(node.world_bounds(), node.mesh().bounds());
    }

    #[test]
    fn test_child_composes_parent_transform() {
        let child = SceneNode::new("child", unit_box())
            .with_transform(Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)));
        let parent = SceneNode::new("parent", unit_box())
            .with_transform(Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .with_child(child);

        let mut scene = Scene::new("test");
        scene.add_root(parent).unwrap();
        let child_id = scene.find("child").unwrap();

        let view = scene.propagate();
        let bounds = view.node(child_id).unwrap().world_bounds();
        assert_vec3_near(bounds.min(), Vec3::new(9.0, 2.0, -1.0));
        assert_vec3_near(bounds.max(), Vec3::new(11.0, 4.0, 1.0));
    }

    #[test]
    fn test_rotated_parent_scaled_child() {
        use std::f32::consts::FRAC_PI_2;

        let child = SceneNode::new("child", box_mesh(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0)))
            .with_transform(Transform {
                scale: Vec3::splat(2.0),
                ..Default::default()
            });
        let parent = SceneNode::new("parent", IndexedMesh::empty())
            .with_transform(Transform {
                rotation: Quat::from_rotation_z(FRAC_PI_2),
                ..Default::default()
            })
            .with_child(child);

        let mut scene = Scene::new("test");
        scene.add_root(parent).unwrap();
        let id = scene.find("child").unwrap();
        let view = scene.propagate();

        // Scaled to [0,4]x[0,2]x[0,2], then +90 degrees about Z: x -> y, y -> -x
        let bounds = view.node(id).unwrap().world_bounds();
        assert_vec3_near(bounds.min(), Vec3::new(-2.0, 0.0, 0.0));
        assert_vec3_near(bounds.max(), Vec3::new(0.0, 4.0, 2.0));
    }

    #[test]
    fn test_propagate_is_idempotent() {
        let node = SceneNode::new("box", unit_box()).with_transform(Transform::from_euler_degrees(
            Vec3::new(1.5, -2.0, 0.25),
            Vec3::new(10.0, 33.0, -71.0),
            Vec3::new(1.0, 2.0, 0.5),
        ));
        let mut scene = Scene::new("test");
        let id = scene.add_root(node).unwrap();

        let first = {
            let view = scene.propagate();
            let n = view.node(id).unwrap();
            (n.world_transform(), n.world_bounds())
        };
        let second = {
            let view = scene.propagate();
            let n = view.node(id).unwrap();
            (n.world_transform(), n.world_bounds())
        };

        assert_eq!(first.0.to_cols_array(), second.0.to_cols_array());
        assert_eq!(first.1, second.1);
        assert_eq!(scene.generation(), 2);
    }

    #[test]
    fn test_bounds_rebuilt_from_local_each_frame() {
        let mut scene = Scene::new("test");
        let id = scene.add_root(SceneNode::new("box", unit_box())).unwrap();

        // Spin 45 degrees, propagate, spin back; bounds must not stay inflated
        let spin = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        scene.node_mut(id).unwrap().rotate(spin);
        let _ = scene.propagate();
        scene.node_mut(id).unwrap().rotate(spin.inverse());

        let view = scene.propagate();
        let bounds = view.node(id).unwrap().world_bounds();
        assert_vec3_near(bounds.min(), Vec3::splat(-1.0));
        assert_vec3_near(bounds.max(), Vec3::splat(1.0));
    }

    #[test]
    fn test_inactive_parent_still_propagates_children() {
        let child = SceneNode::new("child", unit_box())
            .with_transform(Transform::from_translation(Vec3::X * 5.0));
        let parent = SceneNode::new("parent", unit_box())
            .with_transform(Transform::from_translation(Vec3::Y * 5.0))
            .with_active(false)
            .with_child(child);

        let mut scene = Scene::new("test");
        scene.add_root(parent).unwrap();
        let child_id = scene.find("child").unwrap();

        let view = scene.propagate();
        let volumes: Vec<_> = view.collision_volumes().collect();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].node, child_id);
        assert_vec3_near(volumes[0].bounds.centroid(), Vec3::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn test_empty_mesh_has_no_collision_volume() {
        let mut scene = Scene::new("test");
        scene.add_root(SceneNode::new("empty", IndexedMesh::empty())).unwrap();

        let view = scene.propagate();
        assert_eq!(view.collision_volumes().count(), 0);
        assert_eq!(view.render_items().count(), 0);
        assert!(view.world_bounds().is_empty());
    }

    #[test]
    fn test_instances_each_get_bounds() {
        let node = SceneNode::new("pillars", unit_box())
            .with_transform(Transform::from_translation(Vec3::Z * 10.0))
            .with_instances(vec![
                Transform::from_translation(Vec3::X * -4.0),
                Transform::from_translation(Vec3::X * 4.0),
            ]);
        let mut scene = Scene::new("test");
        scene.add_root(node).unwrap();

        let view = scene.propagate();
        let centers: Vec<Vec3> = view.collision_volumes().map(|v| v.bounds.centroid()).collect();
        assert_eq!(centers.len(), 2);
        assert_vec3_near(centers[0], Vec3::new(-4.0, 0.0, 10.0));
        assert_vec3_near(centers[1], Vec3::new(4.0, 0.0, 10.0));

        let items: Vec<_> = view.render_items().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].transforms.len(), 2);
        assert_eq!(scene.total_triangle_count(), 24);
    }

    #[test]
    fn test_activity_state_machine() {
        let mut node = SceneNode::new("n", IndexedMesh::empty());
        assert!(node.is_active());

        node.toggle();
        assert!(!node.is_active());
        node.disable();
        assert!(!node.is_active());
        node.enable();
        node.enable();
        assert!(node.is_active());
        node.toggle();
        node.toggle();
        assert!(node.is_active());
    }

    #[test]
    fn test_names_and_handles() {
        let mut scene = Scene::new("test");
        let a = scene.add_root(SceneNode::new("a", unit_box())).unwrap();
        let b = scene.add_child(a, SceneNode::new("b", unit_box())).unwrap();
        let c = scene.add_root(SceneNode::new("c", unit_box())).unwrap();

        assert_eq!(scene.find("b"), Some(b));
        assert_eq!(scene.node(c).unwrap().name(), "c");
        assert_eq!(scene.node_count(), 3);

        let order: Vec<&str> = scene.iter().map(|n| n.name()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);

        assert_eq!(
            scene.add_root(SceneNode::new("b", unit_box())),
            Err(SceneError::DuplicateName("b".to_string()))
        );
    }

    #[test]
    fn test_remove_subtree_keeps_other_handles() {
        let mut scene = Scene::new("test");
        let a = scene.add_root(SceneNode::new("a", unit_box())).unwrap();
        let b = scene.add_child(a, SceneNode::new("b", unit_box())).unwrap();
        let c = scene.add_root(SceneNode::new("c", unit_box())).unwrap();
        let d = scene.add_child(c, SceneNode::new("d", unit_box())).unwrap();

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(removed.id(), None);
        assert_eq!(removed.children()[0].id(), None);

        assert!(scene.node(b).is_none());
        assert_eq!(scene.find("a"), None);
        assert_eq!(scene.node(d).unwrap().name(), "d");
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.remove(a).unwrap_err(), SceneError::UnknownNode(a));

        // Name is free again; the new node gets a fresh handle
        let a2 = scene.add_root(SceneNode::new("a", unit_box())).unwrap();
        assert_ne!(a2, a);
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut scene = Scene::new("test");
        let a = scene.add_root(SceneNode::new("a", unit_box())).unwrap();
        scene.remove(a).unwrap();

        assert_eq!(
            scene.add_child(a, SceneNode::new("b", unit_box())),
            Err(SceneError::UnknownNode(a))
        );
    }

    #[test]
    fn test_collision_volumes_follow_registration_order() {
        let mut scene = Scene::new("test");
        let a = scene.add_root(SceneNode::new("a", unit_box())).unwrap();
        let b = scene.add_root(SceneNode::new("b", unit_box())).unwrap();
        let c = scene.add_child(a, SceneNode::new("c", unit_box())).unwrap();

        let tree_order: Vec<_> = scene.iter().filter_map(SceneNode::id).collect();
        assert_eq!(tree_order, vec![a, c, b]);

        let view = scene.propagate();
        let order: Vec<_> = view.collision_volumes().map(|v| v.node).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_advance_applies_motion() {
        let node = SceneNode::new("mover", unit_box()).with_motion(Motion {
            velocity: Vec3::new(2.0, 0.0, 0.0),
            angular_velocity: Vec3::ZERO,
        });
        let mut scene = Scene::new("test");
        let id = scene.add_root(node).unwrap();

        scene.advance(0.5);
        scene.advance(0.5);
        assert_vec3_near(
            scene.node(id).unwrap().local_transform().translation,
            Vec3::new(2.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_teleport_and_find_mut() {
        let mut scene = Scene::new("test");
        scene.add_root(SceneNode::new("box", unit_box())).unwrap();

        scene.find_mut("box").unwrap().set_translation(Vec3::new(0.0, 0.0, -20.0));
        assert!(matches!(scene.find_mut("nope"), Err(SceneError::UnknownName(_))));

        let view = scene.propagate();
        assert_vec3_near(view.world_bounds().centroid(), Vec3::new(0.0, 0.0, -20.0));
    }

    #[test]
    fn test_local_transform_from_srt_matrix() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 3.0, 0.5),
            Quat::from_rotation_x(0.6),
            Vec3::new(-4.0, 2.0, 7.0),
        );
        let mut scene = Scene::new("test");
        let id = scene.add_root(SceneNode::new("box", unit_box())).unwrap();
        scene
            .node_mut(id)
            .unwrap()
            .set_local_transform(Transform::from_matrix(matrix));

        let view = scene.propagate();
        let world = view.node(id).unwrap().world_transform();
        assert!(world.abs_diff_eq(matrix, 1e-5));
    }

    #[test]
    fn test_transform_matrix_roundtrip() {
        let transform = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };

        let matrix = transform.to_matrix();
        let recovered = Transform::from_matrix(matrix);

        assert!((recovered.translation - transform.translation).length() < 0.001);
        assert!((recovered.scale - transform.scale).length() < 0.001);
    }
}
