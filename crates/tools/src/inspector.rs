use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use dodgecoin_common::NodeId;
use dodgecoin_stream::{
    GridCoord, LevelScene, RoomGridStreamer, Side, StreamerState, rooms, trigger_of, triggers,
    window,
};
use serde::Serialize;

/// Level inspector for developer tooling.
///
/// Read-only queries against a level scene and its streamer, for the CLI and
/// for debugging.
pub struct LevelInspector;

impl LevelInspector {
    /// Produce a summary of the level state.
    pub fn summary(scene: &LevelScene, streamer: &RoomGridStreamer) -> LevelSummary {
        let stats = streamer.stats();
        LevelSummary {
            frame: scene.frame(),
            center: streamer.center(),
            state: streamer.state(),
            radius: streamer.config().radius,
            rooms: rooms(scene).len(),
            triggers: triggers(scene).len(),
            nodes: scene.node_count(),
            pending_calls: scene.deferred().len(),
            generations: stats.generations,
            regenerations_requested: stats.regenerations_requested,
            stale_generations_skipped: stats.stale_generations_skipped,
        }
    }

    /// Details of every live room at grid cell `id`. More than one only while
    /// superseded neighborhoods overlap.
    pub fn inspect_room(scene: &LevelScene, id: GridCoord) -> Vec<RoomInfo> {
        rooms(scene)
            .into_iter()
            .filter(|(_, room)| room.id() == id)
            .map(|(node, room)| RoomInfo {
                node,
                id: room.id(),
                archetype: room.archetype().to_string(),
                position: [room.position().x, room.position().y],
                size: [room.width(), room.height()],
                open_doors: Side::ALL
                    .into_iter()
                    .filter(|side| room.is_door_open(*side))
                    .collect(),
                has_trigger: trigger_of(scene, node).is_some(),
            })
            .collect()
    }

    /// Grid ids of all live rooms, sorted.
    pub fn list_rooms(scene: &LevelScene) -> Vec<GridCoord> {
        let mut ids: Vec<GridCoord> = rooms(scene).iter().map(|(_, room)| room.id()).collect();
        ids.sort();
        ids
    }

    /// ASCII map of the streamer's window, one row of cells per grid row, top
    /// row first.
    ///
    /// `[C]` center, `[ ]` room with a trigger, `[P]` the player's cell,
    /// `[2]`.. cells holding several rooms, ` . ` empty cells.
    pub fn ascii_map(
        scene: &LevelScene,
        streamer: &RoomGridStreamer,
        player: Option<GridCoord>,
    ) -> String {
        let mut counts: BTreeMap<GridCoord, usize> = BTreeMap::new();
        for (_, room) in rooms(scene) {
            *counts.entry(room.id()).or_default() += 1;
        }

        let center = streamer.center();
        let r = streamer.config().radius as i32;
        let mut out = String::new();
        for drow in -r..=r {
            for dcol in -r..=r {
                let Some(id) = center.checked_offset(dcol, drow) else {
                    out.push_str(" . ");
                    continue;
                };
                let cell = match counts.get(&id).copied().unwrap_or(0) {
                    0 => " . ".to_string(),
                    _ if player == Some(id) => "[P]".to_string(),
                    n if n > 1 => format!("[{}]", n.min(9)),
                    _ if id == center => "[C]".to_string(),
                    _ => "[ ]".to_string(),
                };
                out.push_str(&cell);
            }
            out.push('\n');
        }
        let _ = writeln!(out, "center {center}, radius {r}");
        out
    }

    /// Grid ids the streamer's window should cover.
    pub fn expected_window(streamer: &RoomGridStreamer) -> Vec<GridCoord> {
        window(streamer.center(), streamer.config().radius)
            .into_iter()
            .flatten()
            .map(|(_, id)| id)
            .collect()
    }
}

/// Summary of level state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    pub frame: u64,
    pub center: GridCoord,
    pub state: StreamerState,
    pub radius: u32,
    pub rooms: usize,
    pub triggers: usize,
    pub nodes: usize,
    pub pending_calls: usize,
    pub generations: u64,
    pub regenerations_requested: u64,
    pub stale_generations_skipped: u64,
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: frame={} center={} state={:?} radius={} rooms={} triggers={} nodes={} pending_calls={} generations={}",
            self.frame,
            self.center,
            self.state,
            self.radius,
            self.rooms,
            self.triggers,
            self.nodes,
            self.pending_calls,
            self.generations,
        )
    }
}

/// Detailed info about a single room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomInfo {
    pub node: NodeId,
    pub id: GridCoord,
    pub archetype: String,
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub open_doors: Vec<Side>,
    pub has_trigger: bool,
}

impl fmt::Display for RoomInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room {} [{}] `{}` pos=({:.0}, {:.0}) size={:.0}x{:.0} doors={:?}{}",
            self.id,
            self.node.short(),
            self.archetype,
            self.position[0],
            self.position[1],
            self.size[0],
            self.size[1],
            self.open_doors,
            if self.has_trigger { " trigger" } else { "" },
        )
    }
}
