//! Camera-vs-geometry collision.
//!
//! Discrete end-of-frame tests only: the camera sphere is checked at its new
//! position against every candidate box. There is no swept test, so a fast
//! enough move can pass through thin geometry.

use gloom_math::{Aabb, Sphere, Vec3};

use crate::camera::CameraState;
use crate::scene::{CollisionVolume, FrameView, NodeId};

/// True if a sphere at `center` with `radius` overlaps any candidate box.
///
/// Stops at the first overlapping box. Empty boxes are ignored.
pub fn resolve<I>(center: Vec3, radius: f32, candidates: I) -> bool
where
    I: IntoIterator<Item = Aabb>,
{
    let sphere = Sphere::new(center, radius);
    candidates.into_iter().any(|aabb| sphere.intersects_aabb(&aabb))
}

/// First volume, in candidate order, that the sphere overlaps.
pub fn first_hit<'a, I>(sphere: &Sphere, candidates: I) -> Option<CollisionVolume<'a>>
where
    I: IntoIterator<Item = CollisionVolume<'a>>,
{
    candidates
        .into_iter()
        .find(|volume| sphere.intersects_aabb(&volume.bounds))
}

/// Result of one attempted camera move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// The camera now sits at the requested position
    Accepted,

    /// The move was vetoed and the camera restored to where it started
    Blocked { node: NodeId },
}

impl MoveOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, MoveOutcome::Blocked { .. })
    }
}

/// Move the camera to `target`, reverting to the previous position on the
/// first collision against the propagated scene.
///
/// Candidates are tested in registration order and the first hit wins. A
/// blocked move restores the pre-move position; it does not slide or push
/// the camera out.
pub fn try_move(camera: &mut CameraState, target: Vec3, view: &FrameView<'_>) -> MoveOutcome {
    let snapshot = camera.position;
    camera.position = target;

    match first_hit(&camera.sphere(), view.collision_volumes()) {
        Some(hit) => {
            log::debug!(
                "Camera move to {:?} blocked by {:?} ({})",
                target,
                hit.name,
                hit.node
            );
            camera.position = snapshot;
            MoveOutcome::Blocked { node: hit.node }
        }
        None => MoveOutcome::Accepted,
    }
}
