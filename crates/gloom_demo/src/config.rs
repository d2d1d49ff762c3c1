//! Walkthrough configuration read from JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gloom_core::{Motion, Transform, DEFAULT_CAMERA_RADIUS};
use gloom_math::Vec3;
use serde::{Deserialize, Serialize};

/// Top-level demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub camera: CameraConfig,

    /// Fixed timestep in seconds
    pub dt: f32,

    /// Number of frames to run; the script's last step repeats past its end
    pub frames: u32,

    /// Held-key timeline
    pub script: Vec<InputStep>,

    pub models: Vec<ModelConfig>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            dt: 1.0 / 60.0,
            frames: 600,
            script: Vec::new(),
            models: Vec::new(),
        }
    }
}

impl DemoConfig {
    /// Read a config file. Relative model paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: DemoConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        if let Some(base) = path.parent() {
            for model in &mut config.models {
                if model.path.is_relative() {
                    model.path = base.join(&model.path);
                }
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub radius: f32,
    pub yaw_degrees: f32,

    /// Walk speed in units per second
    pub speed: f32,

    /// Turn rate in degrees per second
    pub turn_rate: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.0, 5.0],
            radius: DEFAULT_CAMERA_RADIUS,
            yaw_degrees: 0.0,
            speed: 3.0,
            turn_rate: 90.0,
        }
    }
}

/// Keys held for a run of frames, e.g. `{ "frames": 30, "keys": "WD" }`.
///
/// Keys follow the viewer layout: W/S forward/back, A/D strafe, E/Q up/down,
/// J/L turn left/right. Unknown characters are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputStep {
    pub frames: u32,
    pub keys: String,

    /// Names of nodes whose active flag flips at the start of this step
    pub toggle: Vec<String>,
}

/// One OBJ model placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub path: PathBuf,
    pub translation: [f32; 3],
    pub rotation_degrees: [f32; 3],
    pub scale: [f32; 3],

    /// Name of a previously listed model to attach under
    pub parent: Option<String>,

    /// Extra placements, relative to the node
    pub instances: Vec<InstanceConfig>,
    pub motion: Option<MotionConfig>,
    pub active: bool,
    pub interactive: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: PathBuf::new(),
            translation: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
            parent: None,
            instances: Vec::new(),
            motion: None,
            active: true,
            interactive: false,
        }
    }
}

impl ModelConfig {
    pub fn transform(&self) -> Transform {
        Transform::from_euler_degrees(
            Vec3::from(self.translation),
            Vec3::from(self.rotation_degrees),
            Vec3::from(self.scale),
        )
    }

    pub fn instance_transforms(&self) -> Vec<Transform> {
        self.instances.iter().map(InstanceConfig::transform).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub translation: [f32; 3],
    pub rotation_degrees: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl InstanceConfig {
    pub fn transform(&self) -> Transform {
        Transform::from_euler_degrees(
            Vec3::from(self.translation),
            Vec3::from(self.rotation_degrees),
            Vec3::from(self.scale),
        )
    }
}

/// Constant-rate movement; rates are per second.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub velocity: [f32; 3],
    pub spin_degrees: [f32; 3],
}

impl MotionConfig {
    pub fn to_motion(&self) -> Motion {
        Motion {
            velocity: Vec3::from(self.velocity),
            angular_velocity: Vec3::from(self.spin_degrees.map(f32::to_radians)),
        }
    }
}
