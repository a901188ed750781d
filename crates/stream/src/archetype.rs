use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::room::{DEFAULT_PASSAGE_WIDTH, DEFAULT_WALL_THICKNESS, Doors};

/// Trigger area of a room: the room's bounds shrunk by `inset` on every side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerArea {
    pub inset: f32,
}

/// A pre-authored room template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomArchetype {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Door state the room starts with.
    pub doors: Doors,
    pub wall_thickness: f32,
    pub passage_width: f32,
    /// Without a trigger area the archetype can only fill a neighborhood center.
    pub trigger: Option<TriggerArea>,
}

impl Default for RoomArchetype {
    fn default() -> Self {
        Self {
            name: "plain".into(),
            width: 600.0,
            height: 600.0,
            doors: Doors::default(),
            wall_thickness: DEFAULT_WALL_THICKNESS,
            passage_width: DEFAULT_PASSAGE_WIDTH,
            trigger: Some(TriggerArea::default()),
        }
    }
}

impl RoomArchetype {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let valid_dim = |v: f32| v.is_finite() && v > 0.0;
        if !valid_dim(self.width) || !valid_dim(self.height) {
            return Err(ConfigurationError::InvalidSize {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
            });
        }
        let thickness_ok = self.wall_thickness.is_finite() && self.wall_thickness >= 0.0;
        let passage_ok = self.passage_width.is_finite() && self.passage_width >= 0.0;
        let inset_ok = self
            .trigger
            .is_none_or(|t| t.inset.is_finite() && t.inset >= 0.0);
        if !thickness_ok || !passage_ok || !inset_ok {
            return Err(ConfigurationError::InvalidWalls {
                name: self.name.clone(),
                thickness: self.wall_thickness,
                passage: self.passage_width,
            });
        }
        Ok(())
    }
}

/// The ordered set of archetypes a neighborhood is filled from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeSet {
    archetypes: Vec<RoomArchetype>,
}

impl ArchetypeSet {
    /// Wrap a list of archetypes. Call `validate` before generating from it.
    pub fn new(archetypes: Vec<RoomArchetype>) -> Self {
        Self { archetypes }
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomArchetype> {
        self.archetypes.iter()
    }

    /// Check the set and return the shared grid cell size.
    ///
    /// Every archetype must have the same size, otherwise rooms positioned at
    /// `id * size` would overlap or leave gaps.
    pub fn validate(&self) -> Result<Vec2, ConfigurationError> {
        let first = self
            .archetypes
            .first()
            .ok_or(ConfigurationError::EmptyArchetypeSet)?;
        for archetype in &self.archetypes {
            archetype.validate()?;
            if archetype.size() != first.size() {
                return Err(ConfigurationError::MismatchedSize {
                    name: archetype.name.clone(),
                    width: archetype.width,
                    height: archetype.height,
                    cell_width: first.width,
                    cell_height: first.height,
                });
            }
        }
        Ok(first.size())
    }

    /// Archetypes that cannot be used off-center.
    pub fn missing_triggers(&self) -> impl Iterator<Item = &RoomArchetype> {
        self.archetypes.iter().filter(|a| a.trigger.is_none())
    }

    /// Pick an archetype uniformly at random.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Result<&RoomArchetype, ConfigurationError> {
        self.archetypes
            .choose(rng)
            .ok_or(ConfigurationError::EmptyArchetypeSet)
    }
}

impl From<Vec<RoomArchetype>> for ArchetypeSet {
    fn from(archetypes: Vec<RoomArchetype>) -> Self {
        Self::new(archetypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn default_archetype_is_standard_room() {
        let a = RoomArchetype::default();
        assert_eq!(a.size(), Vec2::new(600.0, 600.0));
        assert_eq!(a.wall_thickness, 20.0);
        assert_eq!(a.passage_width, 100.0);
        assert!(a.trigger.is_some());
    }

    #[test]
    fn empty_set_is_rejected() {
        let set = ArchetypeSet::default();
        assert_eq!(set.validate(), Err(ConfigurationError::EmptyArchetypeSet));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            set.choose(&mut rng),
            Err(ConfigurationError::EmptyArchetypeSet)
        );
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let set = ArchetypeSet::new(vec![
            RoomArchetype::new("a", 600.0, 600.0),
            RoomArchetype::new("b", 300.0, 600.0),
        ]);
        assert!(matches!(
            set.validate(),
            Err(ConfigurationError::MismatchedSize { ref name, .. }) if name == "b"
        ));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let set = ArchetypeSet::new(vec![RoomArchetype::new("flat", 600.0, 0.0)]);
        assert!(matches!(
            set.validate(),
            Err(ConfigurationError::InvalidSize { .. })
        ));
    }

    #[test]
    fn negative_walls_are_rejected() {
        let mut a = RoomArchetype::new("a", 10.0, 10.0);
        a.wall_thickness = -1.0;
        let set = ArchetypeSet::new(vec![a]);
        assert!(matches!(
            set.validate(),
            Err(ConfigurationError::InvalidWalls { .. })
        ));
    }

    #[test]
    fn validate_returns_cell_size() {
        let set = ArchetypeSet::new(vec![
            RoomArchetype::new("a", 320.0, 240.0),
            RoomArchetype::new("b", 320.0, 240.0),
        ]);
        assert_eq!(set.validate(), Ok(Vec2::new(320.0, 240.0)));
    }

    #[test]
    fn choose_reaches_every_archetype() {
        let set = ArchetypeSet::new(vec![
            RoomArchetype::new("a", 10.0, 10.0),
            RoomArchetype::new("b", 10.0, 10.0),
            RoomArchetype::new("c", 10.0, 10.0),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..3000 {
            let a = set.choose(&mut rng).unwrap();
            *counts.entry(a.name.clone()).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        for n in counts.values() {
            assert!(*n > 800, "uneven pick count {n}");
        }
    }

    #[test]
    fn missing_triggers_lists_triggerless_archetypes() {
        let mut bare = RoomArchetype::new("bare", 10.0, 10.0);
        bare.trigger = None;
        let set = ArchetypeSet::new(vec![RoomArchetype::new("a", 10.0, 10.0), bare]);
        let names: Vec<&str> = set.missing_triggers().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["bare"]);
    }
}
