use glam::Vec2;

/// A high-level action produced once per frame by whatever drives the game
/// (keyboard, script, test).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the player along a direction. Non-zero vectors are normalized by
    /// the player, so diagonal input is not faster.
    Move(Vec2),
    /// Press the Start button.
    Start,
    /// Press the Quit button.
    Quit,
    /// Press the Restart button on the game-over screen.
    Restart,
    /// Nothing this frame.
    Noop,
}

impl Action {
    /// Movement direction carried by this action, zero for buttons.
    pub fn movement(&self) -> Vec2 {
        match self {
            Action::Move(dir) => *dir,
            _ => Vec2::ZERO,
        }
    }
}

/// Direction vector for a set of held directional keys.
///
/// Screen convention: `+x` is right and `+y` is down. Opposite keys cancel.
pub fn direction(left: bool, right: bool, up: bool, down: bool) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if left {
        dir.x -= 1.0;
    }
    if right {
        dir.x += 1.0;
    }
    if up {
        dir.y -= 1.0;
    }
    if down {
        dir.y += 1.0;
    }
    dir
}
