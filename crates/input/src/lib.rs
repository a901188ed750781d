//! Input: high-level actions and scripted input.
//!
//! # Invariants
//! - Game logic consumes `Action`s, never raw key state.
//! - A script expands to exactly one action per frame.

pub mod action;
pub mod script;

pub use action::{Action, direction};
pub use script::{InputScript, ScriptError, ScriptStep};

/// Returns the crate name and version for diagnostics.
pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().starts_with("dodgecoin-input"));
    }
}
