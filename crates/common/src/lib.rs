//! Shared types for the dodgecoin workspace.

mod types;

pub use types::{Aabb, NodeId};
