use dodgecoin_input::Action;
use serde::Serialize;

/// Top-level game state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
    Quit,
}

/// Menu buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Start,
    Quit,
    Restart,
}

impl ButtonAction {
    pub fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::Start => Some(ButtonAction::Start),
            Action::Quit => Some(ButtonAction::Quit),
            Action::Restart => Some(ButtonAction::Restart),
            Action::Move(_) | Action::Noop => None,
        }
    }
}

/// What a button press does to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing, the button is not shown in this state.
    Ignored,
    /// Begin a fresh run: new level, new player, timer reset.
    StartRun,
    /// Leave the game.
    Exit,
}

impl GameState {
    /// Buttons shown in this state.
    pub fn buttons(self) -> &'static [ButtonAction] {
        match self {
            GameState::Menu => &[ButtonAction::Start, ButtonAction::Quit],
            GameState::GameOver => &[ButtonAction::Restart, ButtonAction::Quit],
            GameState::Playing | GameState::Quit => &[],
        }
    }

    pub fn press(self, button: ButtonAction) -> Transition {
        if !self.buttons().contains(&button) {
            return Transition::Ignored;
        }
        match button {
            ButtonAction::Start | ButtonAction::Restart => Transition::StartRun,
            ButtonAction::Quit => Transition::Exit,
        }
    }

    pub fn is_running(self) -> bool {
        self != GameState::Quit
    }
}

/// Seconds survived in the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurvivalTimer {
    elapsed: f32,
}

impl SurvivalTimer {
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_buttons() {
        assert_eq!(GameState::Menu.press(ButtonAction::Start), Transition::StartRun);
        assert_eq!(GameState::Menu.press(ButtonAction::Quit), Transition::Exit);
        assert_eq!(GameState::Menu.press(ButtonAction::Restart), Transition::Ignored);
    }

    #[test]
    fn game_over_buttons() {
        assert_eq!(
            GameState::GameOver.press(ButtonAction::Restart),
            Transition::StartRun
        );
        assert_eq!(GameState::GameOver.press(ButtonAction::Quit), Transition::Exit);
        assert_eq!(
            GameState::GameOver.press(ButtonAction::Start),
            Transition::Ignored
        );
    }

    #[test]
    fn playing_has_no_buttons() {
        for button in [ButtonAction::Start, ButtonAction::Quit, ButtonAction::Restart] {
            assert_eq!(GameState::Playing.press(button), Transition::Ignored);
        }
    }

    #[test]
    fn actions_map_to_buttons() {
        assert_eq!(ButtonAction::from_action(&Action::Start), Some(ButtonAction::Start));
        assert_eq!(ButtonAction::from_action(&Action::Noop), None);
    }

    #[test]
    fn timer_accumulates_and_resets() {
        let mut t = SurvivalTimer::default();
        t.tick(0.25);
        t.tick(0.25);
        assert_eq!(t.elapsed_secs(), 0.5);
        t.reset();
        assert_eq!(t.elapsed_secs(), 0.0);
    }
}
