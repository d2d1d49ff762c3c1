//! Scripted keyboard input.

use crate::config::InputStep;

/// Axis amounts for one frame, each in -1..=1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub forward: f32,
    pub right: f32,
    pub up: f32,

    /// Positive turns left
    pub turn: f32,
}

impl InputState {
    /// Map held keys to axes. Opposing keys cancel.
    pub fn from_keys(keys: &str) -> Self {
        let mut input = Self::default();

        for key in keys.chars().map(|c| c.to_ascii_uppercase()) {
            match key {
                'W' => input.forward += 1.0,
                'S' => input.forward -= 1.0,
                'A' => input.right -= 1.0,
                'D' => input.right += 1.0,
                'E' => input.up += 1.0,
                'Q' => input.up -= 1.0,
                'J' => input.turn += 1.0,
                'L' => input.turn -= 1.0,
                _ => {}
            }
        }

        input.forward = input.forward.clamp(-1.0, 1.0);
        input.right = input.right.clamp(-1.0, 1.0);
        input.up = input.up.clamp(-1.0, 1.0);
        input.turn = input.turn.clamp(-1.0, 1.0);
        input
    }

    pub fn is_moving(&self) -> bool {
        self.forward != 0.0 || self.right != 0.0 || self.up != 0.0
    }
}

/// Walks a step timeline one frame at a time.
pub struct Script<'a> {
    steps: &'a [InputStep],
    index: usize,
    frame_in_step: u32,
}

/// What the script asks for on one frame.
pub struct ScriptFrame<'a> {
    pub input: InputState,

    /// Node names to toggle before this frame runs, in step order
    pub toggle: Vec<&'a str>,
}

impl<'a> Script<'a> {
    pub fn new(steps: &'a [InputStep]) -> Self {
        Self {
            steps,
            index: 0,
            frame_in_step: 0,
        }
    }

    /// Input for the next frame. Once the timeline is exhausted the last
    /// step's keys stay held; with no steps nothing is held.
    pub fn next_frame(&mut self) -> ScriptFrame<'a> {
        let steps = self.steps;

        // Skip zero-length steps, but still honour their toggles
        let mut toggle = Vec::new();
        while let Some(step) = steps.get(self.index) {
            if self.frame_in_step == 0 {
                toggle.extend(step.toggle.iter().map(String::as_str));
            }
            if self.frame_in_step < step.frames || self.index + 1 == steps.len() {
                break;
            }
            self.index += 1;
            self.frame_in_step = 0;
        }

        let input = steps
            .get(self.index)
            .map(|step| InputState::from_keys(&step.keys))
            .unwrap_or_default();
        self.frame_in_step = self.frame_in_step.saturating_add(1);

        ScriptFrame { input, toggle }
    }
}
