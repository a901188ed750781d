use std::time::{Duration, Instant};

use dodgecoin_common::NodeId;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypeSet;
use crate::error::{ConfigurationError, StreamError};
use crate::grid::{GridCoord, MAX_RADIUS, window};
use crate::level::{LEVEL_GROUP, LevelCall, LevelNode, LevelScene};
use crate::room::{Room, Side};
use crate::trigger::{ListenerId, PlayerEntered, RoomEntryListener, RoomTrigger};

/// How queued regenerations that have been superseded are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationPolicy {
    /// Every queued generation runs, in arrival order.
    #[default]
    Interleave,
    /// Only the most recently requested generation runs; older ones queued
    /// before it are skipped when flushed.
    Latest,
}

/// Streaming configuration: window radius and generation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Half-width of the neighborhood in cells; a side is `2r+1` cells.
    pub radius: u32,
    /// Probability that each door of a generated off-center room starts closed.
    pub door_close_chance: f64,
    pub regeneration: RegenerationPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            door_close_chance: 0.0,
            regeneration: RegenerationPolicy::Interleave,
        }
    }
}

impl StreamConfig {
    /// Cells along one side of the window.
    pub fn side(&self) -> u32 {
        2 * self.radius + 1
    }

    /// Rooms spawned by one generation.
    pub fn room_count(&self) -> usize {
        let side = self.side() as usize;
        side * side
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.radius > MAX_RADIUS {
            return Err(ConfigurationError::RadiusTooLarge {
                radius: self.radius,
                max: MAX_RADIUS,
            });
        }
        if !(0.0..=1.0).contains(&self.door_close_chance) {
            return Err(ConfigurationError::InvalidDoorChance(self.door_close_chance));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamerState {
    /// A neighborhood is generated and stable.
    Idle,
    /// Teardown is scheduled and at least one generation is queued.
    Regenerating,
}

/// Streaming statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    pub generations: u64,
    pub regenerations_requested: u64,
    pub stale_generations_skipped: u64,
    pub rooms_spawned: u64,
    pub last_generate_time: Duration,
}

/// Owns the active neighborhood of rooms and regenerates it around the
/// player's room whenever a trigger reports an entry.
pub struct RoomGridStreamer {
    config: StreamConfig,
    archetypes: ArchetypeSet,
    cell_size: Vec2,
    listener: ListenerId,
    center: GridCoord,
    state: StreamerState,
    pending: usize,
    sequence: u64,
    neighborhood: Vec<NodeId>,
    stats: StreamStats,
}

impl RoomGridStreamer {
    /// Create a streamer, failing fast on any misconfiguration.
    pub fn new(config: StreamConfig, archetypes: ArchetypeSet) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let cell_size = archetypes.validate()?;
        if config.radius > 0 {
            if let Some(bare) = archetypes.missing_triggers().next() {
                return Err(ConfigurationError::MissingTrigger(bare.name.clone()));
            }
        }
        Ok(Self {
            config,
            archetypes,
            cell_size,
            listener: ListenerId::next(),
            center: GridCoord::ORIGIN,
            state: StreamerState::Idle,
            pending: 0,
            sequence: 0,
            neighborhood: Vec::new(),
            stats: StreamStats::default(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn archetypes(&self) -> &ArchetypeSet {
        &self.archetypes
    }

    /// Size shared by every room in the grid.
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Most recently recorded center.
    pub fn center(&self) -> GridCoord {
        self.center
    }

    pub fn state(&self) -> StreamerState {
        self.state
    }

    /// Generations queued but not yet flushed.
    pub fn pending_generations(&self) -> usize {
        self.pending
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Live rooms created by the most recent generation.
    pub fn neighborhood<'a>(&self, scene: &'a LevelScene) -> Vec<&'a Room> {
        self.neighborhood
            .iter()
            .filter_map(|id| scene.get(*id).and_then(LevelNode::as_room))
            .collect()
    }

    /// Node ids of the rooms created by the most recent generation.
    pub fn neighborhood_nodes(&self) -> &[NodeId] {
        &self.neighborhood
    }

    /// Forget the current neighborhood and any queued work, for use after the
    /// scene has been cleared.
    pub fn reset(&mut self) {
        self.center = GridCoord::ORIGIN;
        self.state = StreamerState::Idle;
        self.pending = 0;
        self.neighborhood.clear();
    }

    /// Generate the neighborhood around `center`.
    ///
    /// Every archetype pick and trigger check happens before the first room
    /// is added, so a failing call leaves the scene untouched.
    pub fn generate<R: Rng>(
        &mut self,
        scene: &mut LevelScene,
        center: GridCoord,
        rng: &mut R,
    ) -> Result<Vec<NodeId>, StreamError> {
        let _span = tracing::info_span!("generate", %center, radius = self.config.radius).entered();
        let start = Instant::now();

        let radius = self.config.radius;
        let cells = window(center, radius).ok_or(StreamError::OutOfGrid { center, radius })?;
        let mut plan = Vec::with_capacity(cells.len());
        for (offset, id) in cells {
            let archetype = self.archetypes.choose(rng)?;
            let is_center = offset == (0, 0);
            let area = if is_center {
                None
            } else {
                Some(
                    archetype
                        .trigger
                        .ok_or_else(|| ConfigurationError::MissingTrigger(archetype.name.clone()))?,
                )
            };
            let mut room = Room::from_archetype(id, archetype);
            if is_center {
                for side in Side::ALL {
                    room.set_door(side, true);
                }
            } else if self.config.door_close_chance > 0.0 {
                for side in Side::ALL {
                    if rng.gen_bool(self.config.door_close_chance) {
                        room.set_door(side, false);
                    }
                }
            }
            plan.push((room, area));
        }

        let mut spawned = Vec::with_capacity(plan.len());
        for (room, area) in plan {
            let id = room.id();
            let archetype = room.archetype().to_string();
            let trigger = area.map(|a| RoomTrigger::attach(&room, a, self.listener));
            let node = scene.add_child(None, LevelNode::Room(room), &[LEVEL_GROUP])?;
            let triggered = trigger.is_some();
            if let Some(trigger) = trigger {
                scene.add_child(Some(node), LevelNode::Trigger(trigger), &[])?;
            }
            tracing::debug!(room = %id, %archetype, triggered, "room spawned");
            spawned.push(node);
        }

        self.center = center;
        self.neighborhood = spawned.clone();
        if self.pending == 0 {
            self.state = StreamerState::Idle;
        }
        self.stats.generations += 1;
        self.stats.rooms_spawned += spawned.len() as u64;
        self.stats.last_generate_time = start.elapsed();

        tracing::debug!(
            rooms = spawned.len(),
            elapsed = ?self.stats.last_generate_time,
            "neighborhood generated"
        );
        Ok(spawned)
    }

    /// Schedule teardown of every level room and a regeneration around the
    /// entered room, both on the scene's deferred queue.
    pub fn on_player_entered(&mut self, scene: &mut LevelScene, event: PlayerEntered) {
        let _span = tracing::info_span!("on_player_entered", room = %event.room).entered();
        tracing::info!(room = %event.room, position = ?event.position, "player entered room");

        let previous = self.center;
        self.center = event.room;

        let level: Vec<NodeId> = scene
            .children(None)
            .iter()
            .copied()
            .filter(|id| scene.is_in_group(*id, LEVEL_GROUP))
            .collect();
        for id in &level {
            scene.queue_free(*id);
        }

        self.sequence += 1;
        scene.call_deferred(LevelCall::Generate {
            center: event.room,
            sequence: self.sequence,
        });
        self.pending += 1;
        self.state = StreamerState::Regenerating;
        self.stats.regenerations_requested += 1;

        tracing::debug!(
            from = %previous,
            to = %event.room,
            queued_frees = level.len(),
            pending = self.pending,
            "regeneration queued"
        );
    }

    /// Execute a deferred level call.
    pub fn handle_call<R: Rng>(
        &mut self,
        scene: &mut LevelScene,
        call: LevelCall,
        rng: &mut R,
    ) -> Result<(), StreamError> {
        match call {
            LevelCall::Generate { center, sequence } => {
                self.pending = self.pending.saturating_sub(1);
                let stale = sequence != self.sequence;
                if stale && self.config.regeneration == RegenerationPolicy::Latest {
                    tracing::debug!(%center, sequence, latest = self.sequence, "stale generation skipped");
                    self.stats.stale_generations_skipped += 1;
                    if self.pending == 0 {
                        self.state = StreamerState::Idle;
                    }
                    return Ok(());
                }
                self.generate(scene, center, rng)?;
                Ok(())
            }
        }
    }

    /// Flush the scene's deferred queue, routing level calls to this streamer.
    pub fn flush<R: Rng>(&mut self, scene: &mut LevelScene, rng: &mut R) -> Result<usize, StreamError> {
        scene.flush_deferred(|scene, call| self.handle_call(scene, call, rng))
    }
}

impl RoomEntryListener for RoomGridStreamer {
    fn listener_id(&self) -> ListenerId {
        self.listener
    }

    fn on_player_entered(&mut self, scene: &mut LevelScene, event: PlayerEntered) {
        RoomGridStreamer::on_player_entered(self, scene, event);
    }
}
