//! Scene kernel: the node tree that owns level content, plus the end-of-frame
//! deferred-call queue.
//!
//! # Invariants
//! - All node mutations flow through explicit operations and are logged.
//! - Freeing a node frees its whole subtree.
//! - Deferred calls run in FIFO order, after the frame's callbacks, never
//!   interleaved with them.

pub mod deferred;
pub mod scene;

pub use deferred::{DeferredCall, DeferredQueue};
pub use scene::{Node, Scene, SceneError, SceneEvent};
