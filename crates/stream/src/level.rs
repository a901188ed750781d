use dodgecoin_common::NodeId;
use dodgecoin_kernel::Scene;

use crate::grid::GridCoord;
use crate::room::Room;
use crate::trigger::RoomTrigger;

/// Group tag carried by every room node the streamer spawns.
pub const LEVEL_GROUP: &str = "level";

/// Payload of a node in the level scene.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelNode {
    Room(Room),
    Trigger(RoomTrigger),
}

impl LevelNode {
    pub fn as_room(&self) -> Option<&Room> {
        match self {
            LevelNode::Room(room) => Some(room),
            LevelNode::Trigger(_) => None,
        }
    }

    pub fn as_trigger(&self) -> Option<&RoomTrigger> {
        match self {
            LevelNode::Trigger(trigger) => Some(trigger),
            LevelNode::Room(_) => None,
        }
    }
}

/// Deferred application calls on the level scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCall {
    /// Generate the neighborhood around `center`. `sequence` is the
    /// regeneration request that queued it.
    Generate { center: GridCoord, sequence: u64 },
}

pub type LevelScene = Scene<LevelNode, LevelCall>;

/// All live rooms, in tree order.
pub fn rooms(scene: &LevelScene) -> Vec<(NodeId, &Room)> {
    scene
        .walk()
        .into_iter()
        .filter_map(|id| scene.get(id).and_then(LevelNode::as_room).map(|r| (id, r)))
        .collect()
}

/// All live triggers, in tree order.
pub fn triggers(scene: &LevelScene) -> Vec<(NodeId, &RoomTrigger)> {
    scene
        .walk()
        .into_iter()
        .filter_map(|id| {
            scene
                .get(id)
                .and_then(LevelNode::as_trigger)
                .map(|t| (id, t))
        })
        .collect()
}

/// The trigger attached to a room node, if any.
pub fn trigger_of(scene: &LevelScene, room_node: NodeId) -> Option<&RoomTrigger> {
    scene
        .children(Some(room_node))
        .iter()
        .find_map(|child| scene.get(*child).and_then(LevelNode::as_trigger))
}
