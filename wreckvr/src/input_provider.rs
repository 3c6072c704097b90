use std::collections::VecDeque;
use std::path::Path;

use engine::input_log;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WreckVrError};
use crate::input_context::InputFrame;

/// Source of per-frame VR input. Hosts wrap their XR runtime in this so the
/// locomotion core never reaches for runtime globals.
pub trait VrInputProvider {
    fn poll(&mut self) -> InputFrame;
}

/// One entry of a recorded input script: `frame` repeated `repeat` times.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    pub frame: InputFrame,
}

fn default_repeat() -> u32 {
    1
}

/// Replays a fixed list of frames, then reports no session.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInputProvider {
    frames: VecDeque<InputFrame>,
    polled: usize,
}

impl ScriptedInputProvider {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        ScriptedInputProvider {
            frames: frames.into_iter().collect(),
            polled: 0,
        }
    }

    pub fn from_steps(steps: Vec<ScriptStep>) -> Self {
        Self::new(steps.into_iter().flat_map(|step| {
            std::iter::repeat_n(step.frame, step.repeat as usize)
        }))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let steps: Vec<ScriptStep> =
            serde_json::from_str(json).map_err(|err| WreckVrError::parse("input script", err))?;
        Ok(Self::from_steps(steps))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| WreckVrError::io(format!("read {}", path.display()), err))?;
        let provider = Self::from_json_str(&content)?;
        input_log!(INFO, "Loaded {} scripted frames from {}", provider.remaining(), path.display());
        Ok(provider)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn polled(&self) -> usize {
        self.polled
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl VrInputProvider for ScriptedInputProvider {
    fn poll(&mut self) -> InputFrame {
        self.polled += 1;
        self.frames.pop_front().unwrap_or_default()
    }
}
