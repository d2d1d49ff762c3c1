//! Headless walkthrough: build the scene from config and run scripted frames.

use anyhow::{Context, Result};
use gloom_core::{frame, load_obj, CameraState, NodeId, Scene, SceneNode};
use gloom_math::{Aabb, Vec3};

use crate::config::DemoConfig;
use crate::input::Script;

/// Load every model and assemble the hierarchy.
///
/// Parents must be listed before their children.
pub fn build_scene(name: &str, config: &DemoConfig) -> Result<Scene> {
    let mut scene = Scene::new(name);

    for model in &config.models {
        let mesh = load_obj(&model.path)
            .with_context(|| format!("Failed to load model {:?}", model.name))?;

        let mut node = SceneNode::new(model.name.clone(), mesh)
            .with_transform(model.transform())
            .with_instances(model.instance_transforms())
            .with_active(model.active)
            .with_interactive(model.interactive);
        if let Some(motion) = &model.motion {
            node = node.with_motion(motion.to_motion());
        }

        match &model.parent {
            Some(parent) => {
                let parent_id = scene.find(parent).with_context(|| {
                    format!("Parent {:?} of {:?} is not loaded", parent, model.name)
                })?;
                scene
                    .add_child(parent_id, node)
                    .with_context(|| format!("Failed to attach {:?}", model.name))?;
            }
            None => {
                scene
                    .add_root(node)
                    .with_context(|| format!("Failed to add {:?}", model.name))?;
            }
        }
    }

    log::info!(
        "Scene {:?}: {} nodes, {} triangles",
        scene.name,
        scene.node_count(),
        scene.total_triangle_count()
    );
    Ok(scene)
}

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub frames: u32,
    pub blocked_frames: u32,
    pub final_position: Vec3,
    pub last_blocker: Option<NodeId>,
    pub draw_calls: usize,
    pub world_bounds: Aabb,
}

/// Run `config.frames` frames of scripted input against `scene`.
pub fn run(scene: &mut Scene, config: &DemoConfig) -> Result<Summary> {
    let mut camera = CameraState::new(Vec3::from(config.camera.position), config.camera.radius);
    camera.look(config.camera.yaw_degrees.to_radians(), 0.0);

    let turn_rate = config.camera.turn_rate.to_radians();
    let mut script = Script::new(&config.script);
    let mut blocked_frames = 0;
    let mut last_blocker = None;

    for index in 0..config.frames {
        let scripted = script.next_frame();
        for name in scripted.toggle {
            let node = scene
                .find_mut(name)
                .with_context(|| format!("Frame {}: cannot toggle node", index))?;
            node.toggle();
            log::info!(
                "Frame {}: {:?} is now {}",
                index,
                name,
                if node.is_active() { "active" } else { "inactive" }
            );
        }

        let input = scripted.input;
        camera.look(input.turn * turn_rate * config.dt, 0.0);
        let movement = if input.is_moving() {
            camera.walk_delta(input.forward, input.right, input.up, config.camera.speed, config.dt)
        } else {
            Vec3::ZERO
        };

        let report = frame::step(scene, &mut camera, movement, config.dt);
        if let Some(node) = report.blocked_by {
            blocked_frames += 1;
            if last_blocker != Some(node) {
                let name = scene.node(node).map_or("?", |n| n.name());
                log::info!(
                    "Frame {}: blocked by {:?} at ({:.2}, {:.2}, {:.2})",
                    index,
                    name,
                    report.position.x,
                    report.position.y,
                    report.position.z
                );
            }
        }
        last_blocker = report.blocked_by;
    }

    let view = scene.propagate();
    Ok(Summary {
        frames: config.frames,
        blocked_frames,
        final_position: camera.position,
        last_blocker,
        draw_calls: view.render_items().map(|item| item.transforms.len()).sum(),
        world_bounds: view.world_bounds(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InputStep, ModelConfig};
    use std::io::Write;

    const CUBE_OBJ: &str = "\
v -1 -1 -1
v  1 -1 -1
v  1  1 -1
v -1  1 -1
v -1 -1  1
v  1 -1  1
v  1  1  1
v -1  1  1
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";

    fn cube_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CUBE_OBJ.as_bytes()).unwrap();
        file
    }

    fn model(name: &str, file: &tempfile::NamedTempFile) -> ModelConfig {
        ModelConfig {
            name: name.to_string(),
            path: file.path().to_path_buf(),
            ..Default::default()
        }
    }

    fn walk_forward(frames: u32) -> DemoConfig {
        let mut config = DemoConfig {
            frames,
            dt: 0.1,
            script: vec![InputStep {
                frames,
                keys: "W".to_string(),
                toggle: Vec::new(),
            }],
            ..Default::default()
        };
        config.camera.position = [0.0, 0.0, 5.0];
        config.camera.speed = 1.0;
        config
    }

    #[test]
    fn test_build_scene_with_parent() {
        let file = cube_file();
        let mut config = DemoConfig::default();
        config.models.push(model("base", &file));
        config.models.push(ModelConfig {
            parent: Some("base".to_string()),
            translation: [0.0, 2.0, 0.0],
            ..model("top", &file)
        });

        let scene = build_scene("test", &config).unwrap();

        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.roots().len(), 1);
        assert_eq!(scene.roots()[0].children()[0].name(), "top");
    }

    #[test]
    fn test_build_scene_rejects_unknown_parent() {
        let file = cube_file();
        let mut config = DemoConfig::default();
        config.models.push(ModelConfig {
            parent: Some("nowhere".to_string()),
            ..model("orphan", &file)
        });

        assert!(build_scene("test", &config).is_err());
    }

    #[test]
    fn test_walk_into_cube_is_blocked() {
        let file = cube_file();
        let mut config = walk_forward(60);
        config.models.push(model("cube", &file));

        let mut scene = build_scene("test", &config).unwrap();
        let summary = run(&mut scene, &config).unwrap();

        assert!(summary.blocked_frames > 0);
        assert!(summary.final_position.z >= 1.5);
        assert_eq!(summary.last_blocker, scene.find("cube"));
        assert_eq!(summary.draw_calls, 1);
    }

    #[test]
    fn test_inactive_model_lets_camera_through() {
        let file = cube_file();
        let mut config = walk_forward(60);
        config.models.push(ModelConfig {
            active: false,
            ..model("ghost", &file)
        });

        let mut scene = build_scene("test", &config).unwrap();
        let summary = run(&mut scene, &config).unwrap();

        assert_eq!(summary.blocked_frames, 0);
        assert!(summary.final_position.z < -0.9);
        assert_eq!(summary.draw_calls, 0);
        assert!(summary.world_bounds.is_empty());
    }

    #[test]
    fn test_toggle_unknown_node_fails() {
        let mut config = walk_forward(2);
        config.script[0].toggle = vec!["missing".to_string()];

        let mut scene = Scene::new("empty");
        assert!(run(&mut scene, &config).is_err());
    }
}
