//! Developer tooling: level inspector and neighborhood map.
//!
//! # Invariants
//! - Tools only read the scene; they never mutate it.

pub mod inspector;

pub use inspector::{LevelInspector, LevelSummary, RoomInfo};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
