//! Movement rate rules: what it costs one unit to enter one tile type
//!
//! Rules are evaluated strictly in table order and the first match wins.
//! Content relies on that order for overrides, e.g. a flood-immunity rule
//! listed ahead of the generic swamp rule, so never reorder or rank them.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{DoubledMoves, SkillId, TileTypeId};

/// One row of the movement rate table
///
/// Each predicate is optional; `None` means "don't care".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRateRule {
    #[serde(default)]
    pub tile_type: Option<TileTypeId>,
    /// Skill the moving unit itself must have
    #[serde(default)]
    pub unit_skill: Option<SkillId>,
    /// Skill someone in the moving stack must have (pathfinding and friends)
    #[serde(default)]
    pub unit_stack_skill: Option<SkillId>,
    /// Doubled cost; `None` declares the tile impassable outright
    #[serde(default)]
    pub double_movement: Option<DoubledMoves>,
}

impl MovementRateRule {
    pub fn new(double_movement: Option<DoubledMoves>) -> Self {
        Self {
            tile_type: None,
            unit_skill: None,
            unit_stack_skill: None,
            double_movement,
        }
    }

    pub fn for_tile(mut self, tile_type: impl Into<TileTypeId>) -> Self {
        self.tile_type = Some(tile_type.into());
        self
    }

    pub fn with_unit_skill(mut self, skill: impl Into<SkillId>) -> Self {
        self.unit_skill = Some(skill.into());
        self
    }

    pub fn with_stack_skill(mut self, skill: impl Into<SkillId>) -> Self {
        self.unit_stack_skill = Some(skill.into());
        self
    }

    /// Do all of this rule's non-null predicates hold?
    pub fn matches(
        &self,
        tile_type: &TileTypeId,
        unit_skills: &AHashSet<SkillId>,
        stack_skills: &AHashSet<SkillId>,
    ) -> bool {
        self.tile_type.as_ref().map_or(true, |t| t == tile_type)
            && self
                .unit_skill
                .as_ref()
                .map_or(true, |s| unit_skills.contains(s))
            && self
                .unit_stack_skill
                .as_ref()
                .map_or(true, |s| stack_skills.contains(s))
    }
}

/// Doubled cost for a unit with `unit_skills`, moving in a stack with
/// `stack_skills`, to enter `tile_type`; `None` if impassable
pub fn double_movement_to_enter_tile_type(
    unit_skills: &AHashSet<SkillId>,
    stack_skills: &AHashSet<SkillId>,
    tile_type: &TileTypeId,
    rules: &[MovementRateRule],
) -> Option<DoubledMoves> {
    rules
        .iter()
        .find(|rule| rule.matches(tile_type, unit_skills, stack_skills))
        .and_then(|rule| rule.double_movement)
}
