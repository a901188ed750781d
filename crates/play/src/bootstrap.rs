use dodgecoin_common::NodeId;
use dodgecoin_stream::{GridCoord, LevelScene, RoomGridStreamer, StreamError};
use glam::Vec2;
use rand::Rng;

/// Entry point of a level: the first generation, always at the grid origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelBootstrap;

/// Result of starting a level.
#[derive(Debug, Clone)]
pub struct LevelStart {
    /// Rooms of the first neighborhood.
    pub rooms: Vec<NodeId>,
    /// Center of the origin room, where the player spawns.
    pub spawn_point: Vec2,
}

impl LevelBootstrap {
    /// Clear whatever the scene holds and generate the first neighborhood.
    pub fn start<R: Rng>(
        &self,
        scene: &mut LevelScene,
        streamer: &mut RoomGridStreamer,
        rng: &mut R,
    ) -> Result<LevelStart, StreamError> {
        let _span = tracing::info_span!("level_bootstrap").entered();
        scene.clear();
        streamer.reset();
        let rooms = streamer.generate(scene, GridCoord::ORIGIN, rng)?;
        let cell = streamer.cell_size();
        let spawn_point = GridCoord::ORIGIN.to_position(cell) + cell * 0.5;
        tracing::info!(rooms = rooms.len(), "level started");
        Ok(LevelStart { rooms, spawn_point })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodgecoin_stream::{ArchetypeSet, RoomArchetype, StreamConfig, rooms};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn starts_at_origin() {
        let mut streamer = RoomGridStreamer::new(
            StreamConfig::default(),
            ArchetypeSet::new(vec![RoomArchetype::default()]),
        )
        .unwrap();
        let mut scene = LevelScene::new();
        let mut rng = StdRng::seed_from_u64(8);
        let start = LevelBootstrap
            .start(&mut scene, &mut streamer, &mut rng)
            .unwrap();

        assert_eq!(start.rooms.len(), 25);
        assert_eq!(streamer.center(), GridCoord::ORIGIN);
        assert_eq!(start.spawn_point, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn restart_replaces_previous_level() {
        let mut streamer = RoomGridStreamer::new(
            StreamConfig {
                radius: 1,
                ..StreamConfig::default()
            },
            ArchetypeSet::new(vec![RoomArchetype::default()]),
        )
        .unwrap();
        let mut scene = LevelScene::new();
        let mut rng = StdRng::seed_from_u64(8);
        LevelBootstrap.start(&mut scene, &mut streamer, &mut rng).unwrap();
        LevelBootstrap.start(&mut scene, &mut streamer, &mut rng).unwrap();
        assert_eq!(rooms(&scene).len(), 9);
    }
}
