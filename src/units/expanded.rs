//! Expanded unit details: everything movement needs to know about one unit
//!
//! Built once per query by the caller, merging base stats with whatever
//! spells and experience are currently in effect, then passed around by
//! reference. Nothing downstream re-derives or downcasts it.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{DoubledMoves, SkillId, TileTypeId};
use crate::rules::database::MovementRules;
use crate::rules::movement_rate::double_movement_to_enter_tile_type;

/// Ranged attack and the ammunition or mana to fuel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangedAttack {
    pub ammo: u32,
    pub mana: u32,
    /// Mana spent per shot; 0 for units that only fire ammunition
    pub mana_per_shot: u32,
}

/// Capability view of one unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpandedUnit {
    pub name: String,
    pub double_overland_moves: DoubledMoves,
    pub double_combat_moves: DoubledMoves,
    pub skills: AHashSet<SkillId>,
    /// Number of other units this one can carry (ships), 0 if none
    pub transport_capacity: u32,
    pub ranged_attack: Option<RangedAttack>,
    /// Pays a flat cost on the combat map and ignores walls (teleporting,
    /// merging)
    pub ignores_combat_terrain: bool,
}

impl ExpandedUnit {
    pub fn new(name: impl Into<String>, double_overland_moves: DoubledMoves) -> Self {
        Self {
            name: name.into(),
            double_overland_moves,
            double_combat_moves: double_overland_moves,
            ..Default::default()
        }
    }

    pub fn with_skill(mut self, skill: impl Into<SkillId>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    pub fn with_transport_capacity(mut self, capacity: u32) -> Self {
        self.transport_capacity = capacity;
        self
    }

    pub fn with_combat_moves(mut self, moves: DoubledMoves) -> Self {
        self.double_combat_moves = moves;
        self
    }

    pub fn with_ranged_attack(mut self, ranged: RangedAttack) -> Self {
        self.ranged_attack = Some(ranged);
        self
    }

    pub fn ignoring_combat_terrain(mut self) -> Self {
        self.ignores_combat_terrain = true;
        self
    }

    pub fn is_transport(&self) -> bool {
        self.transport_capacity > 0
    }

    /// Doubled cost for this unit to enter `tile_type`, None if impassable
    pub fn double_movement_to_enter(
        &self,
        tile_type: &TileTypeId,
        stack_skills: &AHashSet<SkillId>,
        rules: &impl MovementRules,
    ) -> Option<DoubledMoves> {
        double_movement_to_enter_tile_type(
            &self.skills,
            stack_skills,
            tile_type,
            rules.movement_rate_rules(),
        )
    }

    /// True if some tile type is impassable to this unit on its own, so it
    /// depends on being carried to cross it
    pub fn needs_transport(&self, rules: &impl MovementRules) -> bool {
        rules
            .tile_types()
            .iter()
            .any(|t| self.double_movement_to_enter(&t.id, &self.skills, rules).is_none())
    }

    /// Can fire right now: has a ranged attack and something left to fire
    pub fn can_fire_ranged(&self) -> bool {
        self.ranged_attack.is_some_and(|r| {
            r.ammo > 0 || (r.mana_per_shot > 0 && r.mana >= r.mana_per_shot)
        })
    }
}
