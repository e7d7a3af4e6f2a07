//! Combat movement graph
//!
//! Same ring-order relaxation as overland, over the battle grid, with walls,
//! mud and occupancy layered on top. Ranged targets are marked afterwards
//! since shooting needs no path.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::CombatMap;
use crate::core::config::MovementConfig;
use crate::core::error::{MovementError, Result};
use crate::core::types::{DoubledMoves, PlayerId, UnitId};
use crate::movement::grid::{MovementGrid, Reach};
use crate::movement::relax::{relax_ring_order, Step};
use crate::rules::database::{BorderBlocking, MovementRules};
use crate::spatial::Coords;
use crate::units::expanded::ExpandedUnit;
use crate::units::roster::{Players, UnitStatus};

/// A unit standing on the combat map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatUnit {
    pub id: UnitId,
    pub owner: PlayerId,
    pub position: Coords,
    pub status: UnitStatus,
    pub details: ExpandedUnit,
}

impl CombatUnit {
    pub fn new(id: UnitId, owner: PlayerId, position: Coords, details: ExpandedUnit) -> Self {
        Self {
            id,
            owner,
            position,
            status: UnitStatus::Alive,
            details,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == UnitStatus::Alive
    }
}

/// Read-only battle snapshot a combat query runs against
#[derive(Debug)]
pub struct CombatContext<'a, R: MovementRules> {
    pub map: &'a CombatMap,
    pub units: &'a [CombatUnit],
    pub players: &'a Players,
    pub rules: &'a R,
    pub config: &'a MovementConfig,
}

/// Cheapest combat costs for `mover` with `double_movement_remaining` left
/// this turn
pub fn calculate_combat_movement<R: MovementRules>(
    ctx: &CombatContext<'_, R>,
    mover: &CombatUnit,
    double_movement_remaining: DoubledMoves,
) -> Result<MovementGrid> {
    let origin = mover.position;
    if ctx.map.get(origin).is_none() {
        return Err(MovementError::PreconditionViolation(format!(
            "Combat unit {:?} at {:?} is off the map",
            mover.id, origin
        )));
    }
    ctx.players.find(mover.owner)?;

    let mut friendly = AHashSet::new();
    let mut enemies = AHashSet::new();
    for unit in ctx.units.iter().filter(|u| u.is_alive() && u.id != mover.id) {
        ctx.players.find(unit.owner)?;
        if unit.owner == mover.owner {
            friendly.insert(unit.position);
        } else {
            enemies.insert(unit.position);
        }
    }

    let ignores_terrain = mover.details.ignores_combat_terrain;
    let mut grid = MovementGrid::new(ctx.map.width(), ctx.map.height());
    let stats = relax_ring_order(
        &mut grid,
        &ctx.map.coordinate_system,
        origin,
        double_movement_remaining,
        |from, direction, to| {
            let Some(cell) = ctx.map.get(to) else {
                return Ok(Step::Impassable);
            };
            if cell.off_grid_edge
                || cell.has_border_of_kind(BorderBlocking::WholeTileImpassable, ctx.rules)?
                || friendly.contains(&to)
            {
                return Ok(Step::Impassable);
            }

            let cost = if ignores_terrain {
                ctx.config.ignore_terrain_cost
            } else {
                if ctx.map.crossing_blocked(from, direction, to, ctx.rules)? {
                    return Ok(Step::Blocked);
                }
                // Always look the layers up so bad content is caught in mud too
                let layered = cell.layered_cost(ctx.rules)?;
                if cell.mud {
                    ctx.config.mud_cost
                } else {
                    match layered {
                        Some(cost) => cost,
                        None => return Ok(Step::Impassable),
                    }
                }
            };

            Ok(Step::Enter {
                cost,
                attack: enemies.contains(&to),
            })
        },
    )?;

    let ranged = mover.details.can_fire_ranged();
    if ranged {
        for &at in &enemies {
            if let Some(cell) = grid.cell_mut(at) {
                cell.reach = Reach::Cost(ctx.config.ranged_attack_cost);
                cell.direction = None;
                cell.reachable_this_turn =
                    ctx.config.ranged_attack_cost <= double_movement_remaining;
                cell.results_in_attack = true;
                cell.ranged_target = true;
            }
        }
    }

    tracing::debug!(
        unit = ?mover.id,
        ?origin,
        expanded = stats.expanded,
        improved = stats.improved,
        ranged,
        "Calculated combat movement"
    );

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::classification::MoveType;
    use crate::rules::database::{CombatMapLayer, CombatTileMovement, RulesDatabase};
    use crate::spatial::{Direction, DirectionSet};
    use crate::units::expanded::RangedAttack;
    use crate::units::roster::PlayerKind;

    const ME: PlayerId = PlayerId(1);
    const THEM: PlayerId = PlayerId(2);

    fn rules() -> RulesDatabase {
        let mut db = RulesDatabase::new();
        db.add_combat_tile_type("grass", CombatMapLayer::Terrain, CombatTileMovement::Cost(2))
            .add_combat_tile_type("swamp", CombatMapLayer::Terrain, CombatTileMovement::Cost(6))
            .add_combat_tile_type("rock", CombatMapLayer::Building, CombatTileMovement::Impassable)
            .add_combat_tile_border("stone_wall", BorderBlocking::CannotCrossSpecifiedBorders)
            .add_combat_tile_border("wall_corner", BorderBlocking::WholeTileImpassable);
        db
    }

    fn players() -> Players {
        let mut players = Players::new();
        players
            .add(ME, "Merlin", PlayerKind::Human)
            .add(THEM, "Raven", PlayerKind::Ai);
        players
    }

    fn unit(id: u32, owner: PlayerId, x: i32, y: i32) -> CombatUnit {
        CombatUnit::new(
            UnitId(id),
            owner,
            Coords::new(x, y),
            ExpandedUnit::new("Swordsmen", 2).with_combat_moves(2),
        )
    }

    fn run(
        map: &CombatMap,
        units: &[CombatUnit],
        mover: &CombatUnit,
        remaining: DoubledMoves,
    ) -> Result<MovementGrid> {
        let rules = rules();
        let players = players();
        let config = MovementConfig::default();
        let ctx = CombatContext {
            map,
            units,
            players: &players,
            rules: &rules,
            config: &config,
        };
        calculate_combat_movement(&ctx, mover, remaining)
    }

    #[test]
    fn test_open_field_costs() {
        let map = CombatMap::new(5, 5, "grass");
        let mover = unit(1, ME, 2, 2);
        let grid = run(&map, &[mover.clone()], &mover, 2).unwrap();
        assert_eq!(grid.cost(Coords::new(2, 2)), Some(0));
        assert_eq!(grid.cost(Coords::new(3, 3)), Some(2));
        assert_eq!(grid.cost(Coords::new(0, 0)), Some(4));
        assert!(grid.cell(Coords::new(3, 2)).unwrap().reachable_this_turn);
        assert!(!grid.cell(Coords::new(4, 2)).unwrap().reachable_this_turn);
    }

    #[test]
    fn test_wall_blocks_approach_from_south() {
        let mut map = CombatMap::new(3, 3, "grass");
        map.add_border(
            Coords::new(1, 1),
            "stone_wall",
            DirectionSet::empty().with(Direction::North),
        );
        map.set_off_grid_edge(Coords::new(0, 1));
        map.set_off_grid_edge(Coords::new(2, 1));
        let mover = unit(1, ME, 1, 2);

        let grid = run(&map, &[mover.clone()], &mover, 10).unwrap();
        assert_eq!(grid.cost(Coords::new(1, 1)), None);
        assert_eq!(grid.move_type(Coords::new(1, 1)), MoveType::CannotMove);
        assert_eq!(grid.cost(Coords::new(0, 2)), Some(2));
    }

    #[test]
    fn test_same_layout_without_wall_is_open() {
        let mut map = CombatMap::new(3, 3, "grass");
        map.set_off_grid_edge(Coords::new(0, 1));
        map.set_off_grid_edge(Coords::new(2, 1));
        let mover = unit(1, ME, 1, 2);

        let grid = run(&map, &[mover.clone()], &mover, 10).unwrap();
        assert_eq!(grid.cost(Coords::new(1, 1)), Some(2));
        assert_eq!(
            grid.cell(Coords::new(1, 1)).unwrap().direction,
            Some(Direction::North)
        );
    }

    #[test]
    fn test_wrecked_wall_is_open() {
        let mut map = CombatMap::new(3, 3, "grass");
        map.add_border(
            Coords::new(1, 1),
            "stone_wall",
            DirectionSet::empty().with(Direction::North),
        );
        map.set_wrecked(Coords::new(1, 1), true);
        let mover = unit(1, ME, 1, 2);

        let grid = run(&map, &[mover.clone()], &mover, 10).unwrap();
        assert_eq!(grid.cost(Coords::new(1, 1)), Some(2));
    }

    #[test]
    fn test_ignoring_terrain_skips_walls_and_layers() {
        let mut map = CombatMap::new(3, 3, "swamp");
        map.add_border(
            Coords::new(1, 1),
            "stone_wall",
            DirectionSet::empty().with(Direction::North),
        );
        map.set_off_grid_edge(Coords::new(0, 1));
        map.set_off_grid_edge(Coords::new(2, 1));
        let mut mover = unit(1, ME, 1, 2);
        mover.details = mover.details.ignoring_combat_terrain();

        let grid = run(&map, &[mover.clone()], &mover, 10).unwrap();
        assert_eq!(grid.cost(Coords::new(1, 1)), Some(2));
        assert_eq!(grid.cost(Coords::new(1, 0)), Some(4));
    }

    #[test]
    fn test_whole_tile_border_and_off_edge_impassable() {
        let mut map = CombatMap::new(3, 1, "grass");
        map.add_border(Coords::new(1, 0), "wall_corner", DirectionSet::empty());
        let mover = unit(1, ME, 0, 0);

        let grid = run(&map, &[mover.clone()], &mover, 10).unwrap();
        assert_eq!(grid.reach(Coords::new(1, 0)), Reach::Impassable);
        assert_eq!(grid.cost(Coords::new(2, 0)), None);
    }

    #[test]
    fn test_mud_overrides_layer_cost() {
        let mut map = CombatMap::new(3, 1, "grass");
        map.set_mud(Coords::new(1, 0), true);
        let mover = unit(1, ME, 0, 0);
        let config = MovementConfig::default();

        let grid = run(&map, &[mover.clone()], &mover, 2).unwrap();
        assert_eq!(grid.cost(Coords::new(1, 0)), Some(config.mud_cost));
        assert!(!grid.cell(Coords::new(1, 0)).unwrap().reachable_this_turn);
    }

    #[test]
    fn test_impassable_building_layer() {
        let mut map = CombatMap::new(3, 1, "grass");
        map.set_building(Coords::new(1, 0), "rock");
        let mover = unit(1, ME, 0, 0);

        let grid = run(&map, &[mover.clone()], &mover, 10).unwrap();
        assert_eq!(grid.reach(Coords::new(1, 0)), Reach::Impassable);
    }

    #[test]
    fn test_friendly_blocks_and_enemy_is_melee_dead_end() {
        // (2,0) can only be entered through the enemy at (2,1)
        let mut map = CombatMap::new(3, 3, "grass");
        map.set_building(Coords::new(1, 0), "rock");
        map.set_building(Coords::new(1, 1), "rock");
        let mover = unit(1, ME, 0, 2);
        let units = vec![mover.clone(), unit(2, ME, 2, 2), unit(3, THEM, 2, 1)];

        let grid = run(&map, &units, &mover, 10).unwrap();
        assert_eq!(grid.reach(Coords::new(2, 2)), Reach::Impassable);
        assert_eq!(grid.move_type(Coords::new(2, 2)), MoveType::CannotMove);

        let enemy = grid.cell(Coords::new(2, 1)).unwrap();
        assert_eq!(enemy.reach, Reach::Cost(4));
        assert_eq!(enemy.direction, Some(Direction::NorthEast));
        assert_eq!(grid.move_type(Coords::new(2, 1)), MoveType::Melee);
        assert_eq!(grid.cost(Coords::new(2, 0)), None);
    }

    #[test]
    fn test_enemy_reached_at_relaxed_cost_does_not_propagate() {
        let mut map = CombatMap::new(4, 3, "grass");
        map.set_building(Coords::new(2, 0), "rock");
        map.set_building(Coords::new(2, 2), "rock");
        let mover = unit(1, ME, 0, 1);
        let units = vec![
            mover.clone(),
            unit(2, ME, 3, 2),
            unit(3, THEM, 2, 1),
        ];

        let grid = run(&map, &units, &mover, 10).unwrap();
        let enemy = grid.cell(Coords::new(2, 1)).unwrap();
        assert_eq!(enemy.reach, Reach::Cost(4));
        assert!(enemy.results_in_attack);
        assert_eq!(grid.move_type(Coords::new(2, 1)), MoveType::Melee);
        // Behind the enemy: friendly cell never reached, open cells not reached
        assert_eq!(grid.cost(Coords::new(3, 2)), None);
        assert_eq!(grid.cost(Coords::new(3, 1)), None);
        assert_eq!(grid.cost(Coords::new(3, 0)), None);
    }

    #[test]
    fn test_ranged_unit_marks_every_enemy() {
        let mut map = CombatMap::new(5, 5, "grass");
        map.set_building(Coords::new(3, 3), "rock");
        let mover = CombatUnit::new(
            UnitId(1),
            ME,
            Coords::new(0, 0),
            ExpandedUnit::new("Bowmen", 2).with_ranged_attack(RangedAttack {
                ammo: 8,
                ..Default::default()
            }),
        );
        let units = vec![mover.clone(), unit(2, THEM, 1, 0), unit(3, THEM, 4, 4)];

        let grid = run(&map, &units, &mover, 2).unwrap();
        let config = MovementConfig::default();
        for at in [Coords::new(1, 0), Coords::new(4, 4)] {
            let cell = grid.cell(at).unwrap();
            assert_eq!(cell.reach, Reach::Cost(config.ranged_attack_cost));
            assert!(cell.ranged_target);
            assert!(!cell.reachable_this_turn);
            assert_eq!(grid.move_type(at), MoveType::Ranged);
        }
    }

    #[test]
    fn test_ranged_targets_beyond_budget_are_not_reachable() {
        let map = CombatMap::new(5, 1, "grass");
        let mover = CombatUnit::new(
            UnitId(1),
            ME,
            Coords::new(0, 0),
            ExpandedUnit::new("Bowmen", 2).with_ranged_attack(RangedAttack {
                ammo: 4,
                ..Default::default()
            }),
        );
        let units = vec![mover.clone(), unit(2, THEM, 4, 0)];

        let grid = run(&map, &units, &mover, 2).unwrap();
        let target = grid.cell(Coords::new(4, 0)).unwrap();
        assert!(target.ranged_target);
        assert!(target.results_in_attack);
        assert!(!target.reachable_this_turn);
        assert!(grid.cell(Coords::new(1, 0)).unwrap().reachable_this_turn);
        assert!(!grid.cell(Coords::new(2, 0)).unwrap().reachable_this_turn);
        for (_, cell) in grid.iter() {
            if let Some(cost) = cell.reach.cost() {
                assert!(!cell.reachable_this_turn || cost <= 2);
            }
        }
    }

    #[test]
    fn test_melee_target_beyond_budget_is_not_reachable() {
        let map = CombatMap::new(5, 1, "grass");
        let mover = unit(1, ME, 0, 0);
        let units = vec![mover.clone(), unit(2, THEM, 3, 0)];

        let grid = run(&map, &units, &mover, 4).unwrap();
        let enemy = grid.cell(Coords::new(3, 0)).unwrap();
        assert_eq!(enemy.reach, Reach::Cost(6));
        assert!(enemy.results_in_attack);
        assert!(!enemy.reachable_this_turn);
        assert_eq!(grid.move_type(Coords::new(3, 0)), MoveType::Melee);
    }

    #[test]
    fn test_out_of_ammo_falls_back_to_melee() {
        let map = CombatMap::new(3, 1, "grass");
        let mover = CombatUnit::new(
            UnitId(1),
            ME,
            Coords::new(0, 0),
            ExpandedUnit::new("Bowmen", 2).with_ranged_attack(RangedAttack::default()),
        );
        let units = vec![mover.clone(), unit(2, THEM, 1, 0)];

        let grid = run(&map, &units, &mover, 2).unwrap();
        assert_eq!(grid.move_type(Coords::new(1, 0)), MoveType::Melee);
        assert_eq!(grid.cost(Coords::new(1, 0)), Some(2));
    }

    #[test]
    fn test_dead_units_do_not_occupy() {
        let map = CombatMap::new(3, 1, "grass");
        let mover = unit(1, ME, 0, 0);
        let mut corpse = unit(2, THEM, 1, 0);
        corpse.status = UnitStatus::Dead;

        let grid = run(&map, &[mover.clone(), corpse], &mover, 10).unwrap();
        assert_eq!(grid.move_type(Coords::new(1, 0)), MoveType::Move);
        assert_eq!(grid.cost(Coords::new(2, 0)), Some(4));
    }

    #[test]
    fn test_mover_off_map_is_precondition_violation() {
        let map = CombatMap::new(3, 3, "grass");
        let mover = unit(1, ME, 5, 5);
        let err = run(&map, &[], &mover, 2).unwrap_err();
        assert!(matches!(err, MovementError::PreconditionViolation(_)));
    }

    #[test]
    fn test_unknown_border_is_configuration_error() {
        let mut map = CombatMap::new(3, 1, "grass");
        map.add_border(Coords::new(1, 0), "moat", DirectionSet::empty().with(Direction::East));
        let mover = unit(1, ME, 0, 0);
        let err = run(&map, &[mover.clone()], &mover, 2).unwrap_err();
        assert!(matches!(err, MovementError::Configuration(_)));
    }
}
