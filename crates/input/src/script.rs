use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use crate::action::{Action, direction};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown script command `{0}`")]
    UnknownCommand(String),
    #[error("invalid frame count `{count}` in `{token}`")]
    InvalidCount { token: String, count: String },
    #[error("button `{0}` does not take a frame count")]
    ButtonWithCount(String),
}

/// One script instruction: an action held for a number of frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    pub action: Action,
    pub frames: u32,
}

/// A headless input script.
///
/// Whitespace-separated tokens. Movement is `dir:frames`, where `dir` is one
/// of `left`, `right`, `up`, `down`, or several joined with `+`
/// (`right+down:30`). `wait:frames` idles. `start`, `quit` and `restart`
/// press a button for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let steps = source
            .split_whitespace()
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(steps = steps.len(), "input script parsed");
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Total frames the script spans.
    pub fn frame_count(&self) -> u64 {
        self.steps.iter().map(|s| s.frames as u64).sum()
    }

    /// One action per frame.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.steps
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.action, s.frames as usize))
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for InputScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.steps {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match step.action {
                Action::Start => f.write_str("start")?,
                Action::Quit => f.write_str("quit")?,
                Action::Restart => f.write_str("restart")?,
                Action::Noop => write!(f, "wait:{}", step.frames)?,
                Action::Move(dir) => write!(f, "{}:{}", direction_name(dir), step.frames)?,
            }
        }
        Ok(())
    }
}

fn parse_token(token: &str) -> Result<ScriptStep, ScriptError> {
    let (command, count) = match token.split_once(':') {
        Some((command, count)) => (command, Some(count)),
        None => (token, None),
    };
    let command = command.to_ascii_lowercase();

    let button = match command.as_str() {
        "start" => Some(Action::Start),
        "quit" => Some(Action::Quit),
        "restart" => Some(Action::Restart),
        _ => None,
    };
    if let Some(action) = button {
        if count.is_some() {
            return Err(ScriptError::ButtonWithCount(command));
        }
        return Ok(ScriptStep { action, frames: 1 });
    }

    let frames = match count {
        Some(count) => count.parse::<u32>().map_err(|_| ScriptError::InvalidCount {
            token: token.to_string(),
            count: count.to_string(),
        })?,
        None => 1,
    };

    if command == "wait" {
        return Ok(ScriptStep {
            action: Action::Noop,
            frames,
        });
    }

    let (mut left, mut right, mut up, mut down) = (false, false, false, false);
    for part in command.split('+') {
        match part {
            "left" => left = true,
            "right" => right = true,
            "up" => up = true,
            "down" => down = true,
            _ => return Err(ScriptError::UnknownCommand(token.to_string())),
        }
    }
    Ok(ScriptStep {
        action: Action::Move(direction(left, right, up, down)),
        frames,
    })
}

fn direction_name(dir: Vec2) -> String {
    let mut parts = Vec::new();
    if dir.x < 0.0 {
        parts.push("left");
    }
    if dir.x > 0.0 {
        parts.push("right");
    }
    if dir.y < 0.0 {
        parts.push("up");
    }
    if dir.y > 0.0 {
        parts.push("down");
    }
    if parts.is_empty() {
        return "wait".to_string();
    }
    parts.join("+")
}
