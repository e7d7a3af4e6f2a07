//! Per-query movement cost table for a whole stack

use ahash::AHashMap;
use ahash::AHashSet;

use crate::core::types::{DoubledMoves, SkillId, TileTypeId};
use crate::rules::database::MovementRules;
use crate::units::roster::UnitSnapshot;
use crate::units::stack::UnitStack;

/// Worst cost among `units` for `tile_type`; None if any of them can't enter
pub fn stack_cost(
    units: &[UnitSnapshot],
    stack_skills: &AHashSet<SkillId>,
    tile_type: &TileTypeId,
    rules: &impl MovementRules,
) -> Option<DoubledMoves> {
    let mut worst = 0;
    for unit in units {
        let cost = unit
            .details
            .double_movement_to_enter(tile_type, stack_skills, rules)?;
        worst = worst.max(cost);
    }
    Some(worst)
}

/// Tile type costs for one stack, computed once before relaxation
///
/// Impassable tile types are absent from `costs`. Tile types the stack can't
/// cross but its transports could are listed in `boarding` with the number of
/// riders that would need a seat on a friendly transport already there.
#[derive(Debug, Clone, Default)]
pub struct MovementCostTable {
    costs: AHashMap<TileTypeId, DoubledMoves>,
    boarding: AHashMap<TileTypeId, u32>,
}

impl MovementCostTable {
    pub fn for_stack(stack: &UnitStack, rules: &impl MovementRules) -> Self {
        let mut table = Self::default();
        let skills = stack.stack_skills();

        for tile in rules.tile_types() {
            if let Some(cost) = stack_cost(stack.charged_units(), skills, &tile.id, rules) {
                table.costs.insert(tile.id.clone(), cost);
                continue;
            }

            let transports_blocked = stack
                .transports()
                .iter()
                .any(|t| t.details.double_movement_to_enter(&tile.id, skills, rules).is_none());
            if transports_blocked {
                continue;
            }

            let riders_needing = stack
                .riders()
                .iter()
                .filter(|r| r.details.double_movement_to_enter(&tile.id, skills, rules).is_none())
                .count() as u32;
            if riders_needing > 0 {
                table.boarding.insert(tile.id.clone(), riders_needing);
            }
        }

        tracing::trace!(
            passable = table.costs.len(),
            boardable = table.boarding.len(),
            "Built stack movement cost table"
        );
        table
    }

    pub fn cost(&self, tile_type: &TileTypeId) -> Option<DoubledMoves> {
        self.costs.get(tile_type).copied()
    }

    /// Seats needed to carry the stack onto `tile_type`, if boarding could help
    pub fn riders_needing_transport(&self, tile_type: &TileTypeId) -> Option<u32> {
        self.boarding.get(tile_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PlayerId, UnitId};
    use crate::rules::database::RulesDatabase;
    use crate::rules::movement_rate::MovementRateRule;
    use crate::spatial::PlaneCoords;
    use crate::units::expanded::ExpandedUnit;
    use crate::units::roster::{PlayerKind, Players, UnitRoster};
    use crate::units::stack::create_unit_stack;

    fn rules() -> RulesDatabase {
        let mut db = RulesDatabase::new();
        db.add_tile_type("grass")
            .add_tile_type("hills")
            .add_tile_type("ocean")
            .add_unit_skill("sailing")
            .add_unit_skill("mountaineer")
            .add_rule(
                MovementRateRule::new(Some(2))
                    .for_tile("ocean")
                    .with_unit_skill("sailing"),
            )
            .add_rule(
                MovementRateRule::new(Some(2))
                    .for_tile("hills")
                    .with_unit_skill("mountaineer"),
            )
            .add_rule(MovementRateRule::new(Some(2)).for_tile("grass"))
            .add_rule(MovementRateRule::new(Some(6)).for_tile("hills"));
        db
    }

    fn stack_of(units: Vec<ExpandedUnit>) -> UnitStack {
        let mut roster = UnitRoster::new();
        let mut ids = Vec::new();
        for (i, details) in units.into_iter().enumerate() {
            let id = UnitId(i as u32 + 1);
            roster.add(crate::units::roster::UnitSnapshot::new(
                id,
                PlayerId(1),
                PlaneCoords::new(0, 0, 0),
                details,
            ));
            ids.push(id);
        }
        let mut players = Players::new();
        players.add(PlayerId(1), "Merlin", PlayerKind::Human);
        create_unit_stack(&ids, &roster, &players, &rules()).unwrap()
    }

    #[test]
    fn test_stack_pays_worst_cost() {
        let stack = stack_of(vec![
            ExpandedUnit::new("Dwarves", 2).with_skill("mountaineer"),
            ExpandedUnit::new("Spearmen", 2),
        ]);
        let table = MovementCostTable::for_stack(&stack, &rules());
        assert_eq!(table.cost(&TileTypeId::new("hills")), Some(6));
        assert_eq!(table.cost(&TileTypeId::new("grass")), Some(2));
    }

    #[test]
    fn test_one_blocked_unit_blocks_the_stack() {
        let stack = stack_of(vec![ExpandedUnit::new("Spearmen", 2)]);
        let table = MovementCostTable::for_stack(&stack, &rules());
        assert_eq!(table.cost(&TileTypeId::new("ocean")), None);
        assert_eq!(table.riders_needing_transport(&TileTypeId::new("ocean")), Some(1));
    }

    #[test]
    fn test_transported_stack_charges_only_transports() {
        let stack = stack_of(vec![
            ExpandedUnit::new("Trireme", 4)
                .with_skill("sailing")
                .with_transport_capacity(2),
            ExpandedUnit::new("Spearmen", 2),
        ]);
        let table = MovementCostTable::for_stack(&stack, &rules());
        assert_eq!(table.cost(&TileTypeId::new("ocean")), Some(2));
        assert_eq!(table.riders_needing_transport(&TileTypeId::new("ocean")), None);
    }
}
