//! Play: a headless dodgecoin game built on the room streamer.
//!
//! # Invariants
//! - One frame runs input, movement, trigger dispatch, the deferred flush,
//!   then coins, in that order.
//! - Trigger events reach only the listener whose id they carry.
//! - The center room of every neighborhood has all doors open.

pub mod bootstrap;
pub mod coin;
pub mod config;
pub mod detector;
pub mod menu;
pub mod player;
pub mod session;

pub use bootstrap::{LevelBootstrap, LevelStart};
pub use coin::Coin;
pub use config::{CoinConfig, ConfigError, LevelConfig, PlayerConfig};
pub use detector::TriggerDetector;
pub use menu::{ButtonAction, GameState, SurvivalTimer, Transition};
pub use player::Player;
pub use session::{
    DEFAULT_FRAME_SECS, FrameEvent, SceneCounters, Session, SessionError, SessionEvent,
};

/// Returns the crate name and version for diagnostics.
pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().starts_with("dodgecoin-play"));
    }
}
