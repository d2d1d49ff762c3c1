//! Gloom Math - glam re-exports plus the bounding-volume types used by the
//! scene graph and collision.

// Re-export glam for convenience
pub use glam::*;

// Gloom math types
mod aabb;
mod interval;
mod sphere;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use sphere::Sphere;
pub use transform::Mat4Ext;
