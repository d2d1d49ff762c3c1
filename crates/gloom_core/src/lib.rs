//! Gloom Core - mesh loading, scene graph and camera collision.
//!
//! This crate provides:
//!
//! - **OBJ loading**: face-record parsing, quad triangulation and vertex
//!   deduplication into an [`IndexedMesh`]
//! - **Scene graph**: [`Scene`] and [`SceneNode`] with per-frame world
//!   transform and bounds propagation
//! - **Collision**: sphere-vs-AABB tests that veto camera moves
//!
//! # Example
//!
//! ```ignore
//! use gloom_core::{frame, load_obj, CameraState, Scene, SceneNode};
//! use gloom_math::Vec3;
//!
//! let mut scene = Scene::new("crypt");
//! scene.add_root(SceneNode::new("pillar", load_obj("pillar.obj")?))?;
//!
//! let mut camera = CameraState::new(Vec3::new(0.0, 1.0, 5.0), 0.5);
//! let report = frame::step(&mut scene, &mut camera, Vec3::new(0.0, 0.0, -0.1), 1.0 / 60.0);
//! if report.blocked_by.is_some() {
//!     println!("bumped into something");
//! }
//! ```

pub mod camera;
pub mod collision;
pub mod frame;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use camera::{CameraState, DEFAULT_CAMERA_RADIUS};
pub use collision::MoveOutcome;
pub use frame::FrameReport;
pub use mesh::{IndexedMesh, Vertex};
pub use obj::{load_obj, load_obj_from_str, ObjError};
pub use scene::{FrameView, Motion, NodeId, Scene, SceneError, SceneNode, Transform};
