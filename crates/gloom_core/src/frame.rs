//! One logical frame: scripted motion, camera move, propagation, collision.

use gloom_math::Vec3;

use crate::camera::CameraState;
use crate::collision::{try_move, MoveOutcome};
use crate::scene::{NodeId, Scene};

/// What happened during [`step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Propagation pass the collision test ran against
    pub generation: u64,

    /// Position the camera asked to move to
    pub attempted: Vec3,

    /// Camera position after the frame
    pub position: Vec3,

    /// Node that vetoed the move, if any
    pub blocked_by: Option<NodeId>,
}

/// Run one frame.
///
/// 1. advance scripted motion by `dt`
/// 2. move the camera by `movement`
/// 3. propagate world transforms and bounds
/// 4. test the camera against this frame's bounds and revert on a hit
///
/// The caller polls input before this and hands the propagated scene to the
/// renderer after it.
pub fn step(scene: &mut Scene, camera: &mut CameraState, movement: Vec3, dt: f32) -> FrameReport {
    scene.advance(dt);

    let attempted = camera.position + movement;
    let view = scene.propagate();
    let outcome = try_move(camera, attempted, &view);

    FrameReport {
        generation: view.generation(),
        attempted,
        position: camera.position,
        blocked_by: match outcome {
            MoveOutcome::Blocked { node } => Some(node),
            MoveOutcome::Accepted => None,
        },
    }
}
