//! Overland movement graph
//!
//! Prices every cell of the campaign map for one unit stack. Tower starts
//! run one independent relaxation per plane.

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::campaign::capacity::TransportCapacityMap;
use crate::campaign::map::CampaignMap;
use crate::core::config::MovementConfig;
use crate::core::error::{MovementError, Result};
use crate::core::types::{DoubledMoves, PlayerId};
use crate::movement::classification::MoveType;
use crate::movement::cost_table::MovementCostTable;
use crate::movement::grid::{MovementCell, MovementGrid};
use crate::movement::relax::{relax_ring_order, Step};
use crate::rules::database::MovementRules;
use crate::spatial::{Coords, PlaneCoords};
use crate::units::roster::{Players, UnitRoster};
use crate::units::stack::UnitStack;

/// Read-only world snapshot an overland query runs against
#[derive(Debug)]
pub struct OverlandContext<'a, R: MovementRules> {
    pub map: &'a CampaignMap,
    pub roster: &'a UnitRoster,
    pub players: &'a Players,
    pub rules: &'a R,
    pub config: &'a MovementConfig,
}

/// Who stands where, from the moving player's point of view
#[derive(Debug, Default)]
struct Occupancy {
    friendly: AHashMap<PlaneCoords, u32>,
    enemies: AHashSet<PlaneCoords>,
}

impl Occupancy {
    fn gather(map: &CampaignMap, roster: &UnitRoster, players: &Players, owner: PlayerId) -> Result<Self> {
        let mut occupancy = Self::default();
        for (unit, location) in roster.alive_on_map() {
            players.find(unit.owner)?;
            for plane in map.planes_occupied_from(location) {
                let at = location.coords().on_plane(plane);
                if unit.owner == owner {
                    *occupancy.friendly.entry(at).or_default() += 1;
                } else {
                    occupancy.enemies.insert(at);
                }
            }
        }
        Ok(occupancy)
    }

    fn friendly_count(&self, at: PlaneCoords) -> u32 {
        self.friendly.get(&at).copied().unwrap_or(0)
    }

    fn has_enemy(&self, at: PlaneCoords) -> bool {
        self.enemies.contains(&at)
    }
}

/// Result of one overland query: a grid per plane
///
/// Planes the stack can't reach from its start cell come back unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlandMovement {
    pub start: PlaneCoords,
    planes: Vec<MovementGrid>,
}

impl OverlandMovement {
    pub fn plane(&self, plane: u8) -> Option<&MovementGrid> {
        self.planes.get(plane as usize)
    }

    pub fn planes(&self) -> &[MovementGrid] {
        &self.planes
    }

    pub fn cell(&self, at: PlaneCoords) -> Option<&MovementCell> {
        self.plane(at.plane)?.cell(at.coords())
    }

    pub fn cost(&self, at: PlaneCoords) -> Option<DoubledMoves> {
        self.plane(at.plane)?.cost(at.coords())
    }

    pub fn move_type(&self, at: PlaneCoords) -> MoveType {
        self.cell(at).map(MovementCell::move_type).unwrap_or_default()
    }

    /// Cells from the start to `dest` on `dest`'s plane
    pub fn path_to(&self, map: &CampaignMap, dest: PlaneCoords) -> Option<Vec<Coords>> {
        self.plane(dest.plane)?
            .path_to(&map.coordinate_system, dest.coords())
    }
}

/// Cheapest overland costs for `stack` with `double_movement_remaining` left
/// this turn
pub fn calculate_overland_movement<R: MovementRules>(
    ctx: &OverlandContext<'_, R>,
    stack: &UnitStack,
    double_movement_remaining: DoubledMoves,
) -> Result<OverlandMovement> {
    let start = stack.location();
    if !ctx.map.contains(start) {
        return Err(MovementError::PreconditionViolation(format!(
            "Stack start {:?} is not on the map",
            start
        )));
    }

    let owner = stack.owner();
    let costs = MovementCostTable::for_stack(stack, ctx.rules);
    let capacity = TransportCapacityMap::calculate(ctx.map, ctx.roster, owner, ctx.players, ctx.rules)?;
    let occupancy = Occupancy::gather(ctx.map, ctx.roster, ctx.players, owner)?;

    let width = ctx.map.width();
    let height = ctx.map.height();
    let mut planes: Vec<MovementGrid> = (0..ctx.map.plane_count())
        .map(|_| MovementGrid::new(width, height))
        .collect();

    let origin = start.coords();
    let relaxed_planes = ctx.map.planes_occupied_from(start);
    for &plane in &relaxed_planes {
        let grid = &mut planes[plane as usize];
        let stats = relax_ring_order(
            grid,
            &ctx.map.coordinate_system,
            origin,
            double_movement_remaining,
            |_, _, to| {
                let at = to.on_plane(plane);
                let Some(cell) = ctx.map.get(at) else {
                    return Ok(Step::Impassable);
                };
                if occupancy.friendly_count(at) >= ctx.config.max_units_per_cell {
                    return Ok(Step::Impassable);
                }

                let tile_type = cell.tile_type_or(&ctx.config.unseen_tile_type);
                let cost = match costs.cost(tile_type) {
                    Some(cost) => cost,
                    None => match costs.riders_needing_transport(tile_type) {
                        Some(needed) if capacity.spare_capacity(at) >= needed => {
                            ctx.config.boarding_cost
                        }
                        Some(_) => return Ok(Step::Impassable),
                        None => {
                            ctx.rules.find_tile_type(tile_type)?;
                            return Ok(Step::Impassable);
                        }
                    },
                };

                let attack = occupancy.has_enemy(at)
                    || cell.city_owner.is_some_and(|city| city != owner);
                Ok(Step::Enter { cost, attack })
            },
        )?;

        tracing::trace!(
            plane,
            expanded = stats.expanded,
            improved = stats.improved,
            "Relaxed overland plane"
        );
    }

    tracing::debug!(
        ?start,
        units = stack.len(),
        transported = stack.is_transported(),
        planes = relaxed_planes.len(),
        double_movement_remaining,
        "Calculated overland movement"
    );

    Ok(OverlandMovement { start, planes })
}

/// Run independent overland queries in parallel, one result per request
pub fn calculate_overland_movement_batch<R: MovementRules + Sync>(
    ctx: &OverlandContext<'_, R>,
    requests: &[(UnitStack, DoubledMoves)],
) -> Vec<Result<OverlandMovement>> {
    requests
        .par_iter()
        .map(|(stack, remaining)| calculate_overland_movement(ctx, stack, *remaining))
        .collect()
}
