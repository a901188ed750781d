use dodgecoin_kernel::SceneError;

use crate::grid::GridCoord;

/// Misconfiguration of the level. Fatal: a level that produces one of these
/// must not load.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("room archetype set is empty")]
    EmptyArchetypeSet,
    #[error("room archetype `{name}` has invalid size {width}x{height}")]
    InvalidSize { name: String, width: f32, height: f32 },
    #[error(
        "room archetype `{name}` is {width}x{height}, but the grid cell is {cell_width}x{cell_height}"
    )]
    MismatchedSize {
        name: String,
        width: f32,
        height: f32,
        cell_width: f32,
        cell_height: f32,
    },
    #[error(
        "room archetype `{name}` has invalid walls (thickness {thickness}, passage {passage})"
    )]
    InvalidWalls {
        name: String,
        thickness: f32,
        passage: f32,
    },
    #[error("room archetype `{0}` has no trigger area")]
    MissingTrigger(String),
    #[error("door close chance {0} is outside 0..=1")]
    InvalidDoorChance(f64),
    #[error("window radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: u32, max: u32 },
}

/// Errors from neighborhood generation.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("window of radius {radius} around {center} leaves the grid")]
    OutOfGrid { center: GridCoord, radius: u32 },
}
