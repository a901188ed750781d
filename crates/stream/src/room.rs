use dodgecoin_common::Aabb;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::archetype::RoomArchetype;
use crate::grid::GridCoord;

pub(crate) const DEFAULT_WALL_THICKNESS: f32 = 20.0;
pub(crate) const DEFAULT_PASSAGE_WIDTH: f32 = 100.0;

/// One of the four cardinal sides of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Up,
    Down,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Up, Side::Down];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Up => Side::Down,
            Side::Down => Side::Up,
        }
    }

    /// Grid step towards the neighbor on this side. Up is `row - 1`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
            Side::Up => (0, -1),
            Side::Down => (0, 1),
        }
    }
}

/// Door-open flags, one per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Doors {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Default for Doors {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
            up: true,
            down: true,
        }
    }
}

impl Doors {
    pub fn is_open(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Up => self.up,
            Side::Down => self.down,
        }
    }

    pub fn set(&mut self, side: Side, open: bool) {
        match side {
            Side::Left => self.left = open,
            Side::Right => self.right = open,
            Side::Up => self.up = open,
            Side::Down => self.down = open,
        }
    }

    pub fn open_count(&self) -> u8 {
        Side::ALL.iter().filter(|s| self.is_open(**s)).count() as u8
    }
}

/// A single grid cell's content.
///
/// The position is always `id * (width, height)`, so a room's id can be
/// recovered from its position and rooms built from the same cell size tile
/// the plane with no gaps or overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    id: GridCoord,
    archetype: String,
    size: Vec2,
    position: Vec2,
    doors: Doors,
    open_door_count: u8,
    wall_thickness: f32,
    passage_width: f32,
}

impl Room {
    /// Create a room at grid cell `id` with all doors open.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive. Sizes taken from an
    /// [`ArchetypeSet`](crate::ArchetypeSet) are already validated.
    pub fn create(id: GridCoord, width: f32, height: f32) -> Self {
        assert!(width > 0.0 && height > 0.0, "room size must be positive");
        let size = Vec2::new(width, height);
        let doors = Doors::default();
        Self {
            id,
            archetype: "default".into(),
            size,
            position: id.to_position(size),
            doors,
            open_door_count: doors.open_count(),
            wall_thickness: DEFAULT_WALL_THICKNESS,
            passage_width: DEFAULT_PASSAGE_WIDTH,
        }
    }

    /// Instantiate an archetype at grid cell `id`.
    pub fn from_archetype(id: GridCoord, archetype: &RoomArchetype) -> Self {
        let mut room = Self::create(id, archetype.width, archetype.height);
        room.archetype = archetype.name.clone();
        room.doors = archetype.doors;
        room.open_door_count = room.doors.open_count();
        room.wall_thickness = archetype.wall_thickness;
        room.passage_width = archetype.passage_width;
        room
    }

    pub fn id(&self) -> GridCoord {
        self.id
    }

    pub fn archetype(&self) -> &str {
        &self.archetype
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// World position of the room's origin corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_origin_size(self.position, self.size)
    }

    pub fn doors(&self) -> Doors {
        self.doors
    }

    pub fn is_door_open(&self, side: Side) -> bool {
        self.doors.is_open(side)
    }

    pub fn open_door_count(&self) -> u8 {
        self.open_door_count
    }

    pub fn set_door(&mut self, side: Side, open: bool) {
        self.doors.set(side, open);
        self.open_door_count = self.doors.open_count();
    }

    /// Wall segments along the four edges. Walls straddle the edge line; an
    /// open door leaves a centered gap of the passage width.
    pub fn wall_segments(&self) -> Vec<Aabb> {
        let min = self.position;
        let max = self.position + self.size;
        let edges = [
            (Side::Up, min, Vec2::new(max.x, min.y)),
            (Side::Down, Vec2::new(min.x, max.y), max),
            (Side::Left, min, Vec2::new(min.x, max.y)),
            (Side::Right, Vec2::new(max.x, min.y), max),
        ];
        let mut out = Vec::with_capacity(8);
        for (side, from, to) in edges {
            let gap = if self.is_door_open(side) {
                self.passage_width
            } else {
                0.0
            };
            edge_segments(from, to, self.wall_thickness, gap, &mut out);
        }
        out
    }
}

fn edge_segments(from: Vec2, to: Vec2, thickness: f32, gap: f32, out: &mut Vec<Aabb>) {
    let along = to - from;
    let len = along.length();
    if len <= 0.0 || thickness <= 0.0 {
        return;
    }
    let axis = (along / len).abs();
    let across = Vec2::new(axis.y, axis.x) * thickness;
    let gap = gap.clamp(0.0, len);
    if gap == 0.0 {
        out.push(Aabb::from_center_size((from + to) * 0.5, axis * len + across));
        return;
    }
    let piece = (len - gap) * 0.5;
    if piece <= 0.0 {
        return;
    }
    let dir = along / len;
    for center in [from + dir * (piece * 0.5), to - dir * (piece * 0.5)] {
        out.push(Aabb::from_center_size(center, axis * piece + across));
    }
}
