use std::sync::atomic::{AtomicU64, Ordering};

use dodgecoin_common::Aabb;
use glam::Vec2;

use crate::archetype::TriggerArea;
use crate::grid::GridCoord;
use crate::level::LevelScene;
use crate::room::Room;

/// Kind of physics body reported by the collision collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Player,
    Coin,
}

/// Identity of a listener that triggers are bound to at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Raised when the player body begins overlapping a room trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerEntered {
    /// World position of the entered room.
    pub position: Vec2,
    /// Grid identity of the entered room.
    pub room: GridCoord,
    /// Listener the trigger was bound to.
    pub listener: ListenerId,
}

/// Receiver of room-entry events.
pub trait RoomEntryListener {
    fn listener_id(&self) -> ListenerId;

    fn on_player_entered(&mut self, scene: &mut LevelScene, event: PlayerEntered);
}

/// Detector attached to a non-center room of a neighborhood.
///
/// Lives as a child node of its room and is freed with it, which also ends
/// its binding to the listener.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTrigger {
    room: GridCoord,
    position: Vec2,
    area: Aabb,
    listener: ListenerId,
}

impl RoomTrigger {
    pub fn attach(room: &Room, area: TriggerArea, listener: ListenerId) -> Self {
        Self {
            room: room.id(),
            position: room.position(),
            area: room.bounds().shrink(area.inset),
            listener,
        }
    }

    pub fn room(&self) -> GridCoord {
        self.room
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn area(&self) -> Aabb {
        self.area
    }

    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    /// Overlap-begin callback. Only the player body raises an event.
    pub fn on_entered(&self, body: BodyKind) -> Option<PlayerEntered> {
        match body {
            BodyKind::Player => Some(PlayerEntered {
                position: self.position,
                room: self.room,
                listener: self.listener,
            }),
            BodyKind::Coin => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_ids_are_unique() {
        assert_ne!(ListenerId::next(), ListenerId::next());
    }

    #[test]
    fn player_entry_carries_room_identity() {
        let room = Room::create(GridCoord::new(2, -1), 100.0, 50.0);
        let listener = ListenerId::next();
        let trigger = RoomTrigger::attach(&room, TriggerArea::default(), listener);

        let event = trigger.on_entered(BodyKind::Player).unwrap();
        assert_eq!(event.room, GridCoord::new(2, -1));
        assert_eq!(event.position, Vec2::new(200.0, -50.0));
        assert_eq!(event.listener, listener);
    }

    #[test]
    fn non_player_bodies_are_ignored() {
        let room = Room::create(GridCoord::ORIGIN, 10.0, 10.0);
        let trigger = RoomTrigger::attach(&room, TriggerArea::default(), ListenerId::next());
        assert!(trigger.on_entered(BodyKind::Coin).is_none());
    }

    #[test]
    fn repeated_entries_fire_every_time() {
        let room = Room::create(GridCoord::ORIGIN, 10.0, 10.0);
        let trigger = RoomTrigger::attach(&room, TriggerArea::default(), ListenerId::next());
        let first = trigger.on_entered(BodyKind::Player);
        let second = trigger.on_entered(BodyKind::Player);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn inset_shrinks_area() {
        let room = Room::create(GridCoord::ORIGIN, 100.0, 100.0);
        let trigger = RoomTrigger::attach(&room, TriggerArea { inset: 10.0 }, ListenerId::next());
        assert_eq!(trigger.area().min, Vec2::splat(10.0));
        assert_eq!(trigger.area().max, Vec2::splat(90.0));
    }
}
