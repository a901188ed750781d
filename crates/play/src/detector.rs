use std::collections::BTreeSet;

use dodgecoin_common::NodeId;
use dodgecoin_stream::{BodyKind, LevelScene, PlayerEntered, triggers};
use glam::Vec2;

/// Overlap tracking between a body and the level's room triggers.
///
/// A body overlaps a trigger while the body's center lies inside the trigger
/// area. Crossing from outside to inside is an overlap-begin and produces the
/// trigger's event. A trigger seen for the first time with the body already
/// inside is primed instead of fired.
#[derive(Debug, Default)]
pub struct TriggerDetector {
    seen: BTreeSet<NodeId>,
    inside: BTreeSet<NodeId>,
}

impl TriggerDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `point` against every live trigger and collect the
    /// overlap-begin events.
    pub fn detect(&mut self, scene: &LevelScene, body: BodyKind, point: Vec2) -> Vec<PlayerEntered> {
        let live = triggers(scene);
        let mut events = Vec::new();

        for (node, trigger) in &live {
            let overlapping = trigger.area().contains(point);
            let first_seen = self.seen.insert(*node);
            if !overlapping {
                self.inside.remove(node);
                continue;
            }
            if !self.inside.insert(*node) || first_seen {
                continue;
            }
            if let Some(event) = trigger.on_entered(body) {
                events.push(event);
            }
        }

        self.prune(live.iter().map(|(node, _)| *node).collect());
        events
    }

    /// Record the overlap state of triggers not seen before, without firing.
    ///
    /// Call after new triggers are spawned so a body that moves on the next
    /// frame is compared against where it actually stood when they appeared.
    pub fn prime(&mut self, scene: &LevelScene, point: Vec2) {
        let live = triggers(scene);
        for (node, trigger) in &live {
            if self.seen.insert(*node) && trigger.area().contains(point) {
                self.inside.insert(*node);
            }
        }
        self.prune(live.iter().map(|(node, _)| *node).collect());
    }

    fn prune(&mut self, alive: BTreeSet<NodeId>) {
        self.seen.retain(|node| alive.contains(node));
        self.inside.retain(|node| alive.contains(node));
    }

    pub fn reset(&mut self) {
        self.seen.clear();
        self.inside.clear();
    }

    /// Triggers the body currently overlaps.
    pub fn overlapping(&self) -> usize {
        self.inside.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodgecoin_stream::{
        ArchetypeSet, GridCoord, RoomArchetype, RoomGridStreamer, StreamConfig,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn level() -> (LevelScene, RoomGridStreamer) {
        let config = StreamConfig {
            radius: 1,
            ..StreamConfig::default()
        };
        let set = ArchetypeSet::new(vec![RoomArchetype::new("plain", 100.0, 100.0)]);
        let mut streamer = RoomGridStreamer::new(config, set).unwrap();
        let mut scene = LevelScene::new();
        streamer
            .generate(&mut scene, GridCoord::ORIGIN, &mut StdRng::seed_from_u64(0))
            .unwrap();
        (scene, streamer)
    }

    #[test]
    fn crossing_into_neighbor_fires_once() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        assert!(detector.detect(&scene, BodyKind::Player, Vec2::splat(50.0)).is_empty());

        let events = detector.detect(&scene, BodyKind::Player, Vec2::new(101.0, 50.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].room, GridCoord::new(1, 0));

        // staying inside is not a new overlap
        assert!(detector.detect(&scene, BodyKind::Player, Vec2::new(120.0, 50.0)).is_empty());
    }

    #[test]
    fn re_entry_fires_again() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        detector.detect(&scene, BodyKind::Player, Vec2::splat(50.0));
        assert_eq!(detector.detect(&scene, BodyKind::Player, Vec2::new(150.0, 50.0)).len(), 1);
        assert!(detector.detect(&scene, BodyKind::Player, Vec2::splat(50.0)).is_empty());
        assert_eq!(detector.detect(&scene, BodyKind::Player, Vec2::new(150.0, 50.0)).len(), 1);
    }

    #[test]
    fn trigger_already_containing_body_is_primed() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        assert!(detector.detect(&scene, BodyKind::Player, Vec2::new(150.0, 50.0)).is_empty());
        assert_eq!(detector.overlapping(), 1);
    }

    #[test]
    fn primed_trigger_fires_on_first_move_in() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        detector.prime(&scene, Vec2::splat(50.0));
        assert_eq!(detector.overlapping(), 0);
        let events = detector.detect(&scene, BodyKind::Player, Vec2::new(-1.0, 50.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].room, GridCoord::new(-1, 0));
    }

    #[test]
    fn prime_never_fires_and_keeps_known_state() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        detector.prime(&scene, Vec2::new(150.0, 50.0));
        assert_eq!(detector.overlapping(), 1);
        // already known, so a later prime does not reclassify it
        detector.prime(&scene, Vec2::splat(50.0));
        assert_eq!(detector.overlapping(), 1);
        assert!(detector.detect(&scene, BodyKind::Player, Vec2::new(160.0, 50.0)).is_empty());
    }

    #[test]
    fn coins_never_fire() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        detector.detect(&scene, BodyKind::Coin, Vec2::splat(50.0));
        assert!(detector.detect(&scene, BodyKind::Coin, Vec2::new(150.0, 50.0)).is_empty());
    }

    #[test]
    fn center_room_has_nothing_to_fire() {
        let (scene, _) = level();
        let mut detector = TriggerDetector::new();
        detector.detect(&scene, BodyKind::Player, Vec2::new(-50.0, -50.0));
        assert!(detector.detect(&scene, BodyKind::Player, Vec2::splat(10.0)).is_empty());
    }
}
