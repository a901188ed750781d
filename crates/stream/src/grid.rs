use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A room's identity in the infinite room lattice.
///
/// Columns grow to the right (+x), rows grow downward (+y). Two rooms are the
/// same room iff their coordinates are equal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub col: i32,
    pub row: i32,
}

impl GridCoord {
    pub const ORIGIN: Self = Self { col: 0, row: 0 };

    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// # Panics
    ///
    /// Panics on overflow in debug builds, like integer `+`. Use
    /// `checked_offset` for cells near the edge of the grid.
    pub fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }

    /// The cell `(dcol, drow)` away, or `None` if it lies outside the `i32` grid.
    pub fn checked_offset(self, dcol: i32, drow: i32) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add(dcol)?,
            row: self.row.checked_add(drow)?,
        })
    }

    /// World position of the cell's origin corner.
    pub fn to_position(self, cell_size: Vec2) -> Vec2 {
        Vec2::new(
            self.col as f32 * cell_size.x,
            self.row as f32 * cell_size.y,
        )
    }

    /// Cell containing a world position (floor division by the cell size).
    pub fn from_position(pos: Vec2, cell_size: Vec2) -> Self {
        Self {
            col: (pos.x / cell_size.x).floor() as i32,
            row: (pos.y / cell_size.y).floor() as i32,
        }
    }

    /// Chebyshev distance, i.e. the smallest window radius that covers both cells.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.col
            .abs_diff(other.col)
            .max(self.row.abs_diff(other.row))
    }
}

impl Add for GridCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.offset(rhs.col, rhs.row)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid grid coordinate `{0}`, expected `col,row`")]
pub struct ParseGridCoordError(String);

impl FromStr for GridCoord {
    type Err = ParseGridCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let err = || ParseGridCoordError(s.to_string());
        let (col, row) = trimmed.split_once(',').ok_or_else(err)?;
        Ok(Self {
            col: col.trim().parse().map_err(|_| err())?,
            row: row.trim().parse().map_err(|_| err())?,
        })
    }
}

/// Largest window radius a streamer accepts.
pub const MAX_RADIUS: u32 = 256;

/// All cells of the square window of `radius` around `center`, as
/// `(offset, cell)` pairs. Columns are the outer loop, rows the inner one.
///
/// `None` if `radius` exceeds `MAX_RADIUS` or the window leaves the `i32` grid.
pub fn window(center: GridCoord, radius: u32) -> Option<Vec<((i32, i32), GridCoord)>> {
    if radius > MAX_RADIUS {
        return None;
    }
    let r = radius as i32;
    let side = 2 * radius as usize + 1;
    let mut out = Vec::with_capacity(side * side);
    for dc in -r..=r {
        for dr in -r..=r {
            out.push(((dc, dr), center.checked_offset(dc, dr)?));
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn position_round_trip() {
        let size = Vec2::new(600.0, 400.0);
        for col in -7..=7 {
            for row in -7..=7 {
                let id = GridCoord::new(col, row);
                let pos = id.to_position(size);
                assert_eq!(pos, Vec2::new(col as f32 * 600.0, row as f32 * 400.0));
                assert_eq!(GridCoord::from_position(pos, size), id);
            }
        }
    }

    #[test]
    fn from_position_floors_negative() {
        let size = Vec2::splat(16.0);
        assert_eq!(
            GridCoord::from_position(Vec2::new(10.0, 10.0), size),
            GridCoord::new(0, 0)
        );
        assert_eq!(
            GridCoord::from_position(Vec2::new(20.0, -5.0), size),
            GridCoord::new(1, -1)
        );
    }

    #[test]
    fn window_covers_square() {
        for radius in 0..4u32 {
            let center = GridCoord::new(3, -2);
            let cells = window(center, radius).unwrap();
            let side = (2 * radius + 1) as usize;
            assert_eq!(cells.len(), side * side);

            let unique: HashSet<GridCoord> = cells.iter().map(|(_, c)| *c).collect();
            assert_eq!(unique.len(), cells.len());
            for (_, c) in &cells {
                assert!(center.chebyshev_distance(*c) <= radius);
            }
        }
    }

    #[test]
    fn window_radius_zero_is_center_only() {
        let cells = window(GridCoord::new(5, 5), 0).unwrap();
        assert_eq!(cells, vec![((0, 0), GridCoord::new(5, 5))]);
    }

    #[test]
    fn window_at_grid_edge_is_none() {
        assert!(window(GridCoord::new(i32::MAX, 0), 1).is_none());
        assert!(window(GridCoord::new(0, i32::MIN), 2).is_none());
        assert!(window(GridCoord::new(i32::MAX, 0), 0).is_some());
        assert!(window(GridCoord::new(i32::MAX - 1, 0), 1).is_some());
    }

    #[test]
    fn window_rejects_huge_radius() {
        assert!(window(GridCoord::ORIGIN, MAX_RADIUS + 1).is_none());
        assert!(window(GridCoord::ORIGIN, u32::MAX / 2 + 1).is_none());
    }

    #[test]
    fn checked_offset_stops_at_edge() {
        assert_eq!(GridCoord::new(i32::MAX, 0).checked_offset(1, 0), None);
        assert_eq!(
            GridCoord::new(1, 1).checked_offset(-2, 3),
            Some(GridCoord::new(-1, 4))
        );
    }

    #[test]
    fn parse_grid_coord() {
        assert_eq!("1,-2".parse::<GridCoord>().unwrap(), GridCoord::new(1, -2));
        assert_eq!("(3, 4)".parse::<GridCoord>().unwrap(), GridCoord::new(3, 4));
        assert!("3".parse::<GridCoord>().is_err());
        assert!("a,b".parse::<GridCoord>().is_err());
    }

    #[test]
    fn display_and_add() {
        let c = GridCoord::new(1, 2) + GridCoord::new(-3, 1);
        assert_eq!(c, GridCoord::new(-2, 3));
        assert_eq!(c.to_string(), "(-2, 3)");
    }
}
