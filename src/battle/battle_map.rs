//! Combat map: the tactical grid a single battle is fought on
//!
//! Each cell stacks up to three tile layers (terrain, road, building) and may
//! carry wall borders on some of its sides.

use serde::{Deserialize, Serialize};

use crate::core::config::MovementConfig;
use crate::core::error::Result;
use crate::core::types::{BorderId, CombatTileTypeId, DoubledMoves};
use crate::rules::database::{BorderBlocking, CombatMapLayer, CombatTileMovement, MovementRules};
use crate::spatial::{CellGrid, Coords, Direction, DirectionSet, SquareCoordinateSystem};

/// A single combat cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatCell {
    pub terrain: Option<CombatTileTypeId>,
    pub road: Option<CombatTileTypeId>,
    pub building: Option<CombatTileTypeId>,
    pub borders: Vec<BorderId>,
    /// Sides of the cell the borders run along
    pub border_directions: DirectionSet,
    /// Walls knocked down; borders no longer apply
    pub wrecked: bool,
    pub mud: bool,
    /// Outside the diamond of playable cells
    pub off_grid_edge: bool,
}

impl CombatCell {
    pub fn new(terrain: impl Into<CombatTileTypeId>) -> Self {
        Self {
            terrain: Some(terrain.into()),
            ..Default::default()
        }
    }

    /// Tile types present, lowest layer first
    pub fn layers(&self) -> impl Iterator<Item = (CombatMapLayer, &CombatTileTypeId)> + '_ {
        [
            (CombatMapLayer::Terrain, &self.terrain),
            (CombatMapLayer::Road, &self.road),
            (CombatMapLayer::Building, &self.building),
        ]
        .into_iter()
        .filter_map(|(layer, tile)| tile.as_ref().map(|t| (layer, t)))
    }

    /// Borders still standing
    pub fn active_borders(&self) -> impl Iterator<Item = &BorderId> + '_ {
        self.borders.iter().filter(move |_| !self.wrecked)
    }

    /// Any standing border of `kind`
    pub fn has_border_of_kind(&self, kind: BorderBlocking, rules: &impl MovementRules) -> Result<bool> {
        for id in self.active_borders() {
            if rules.find_combat_tile_border(id)?.blocks_movement == kind {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Doubled cost of the stacked layers, None if impassable
    ///
    /// Any impassable layer wins outright; otherwise the highest layer that
    /// sets a cost decides it. A cell where no layer sets a cost can't be
    /// entered.
    pub fn layered_cost(&self, rules: &impl MovementRules) -> Result<Option<DoubledMoves>> {
        let mut cost = None;
        for (_, id) in self.layers() {
            match rules.find_combat_tile_type(id)?.movement {
                CombatTileMovement::Impassable => return Ok(None),
                CombatTileMovement::Cost(c) => cost = Some(c),
                CombatTileMovement::NoEffect => {}
            }
        }
        Ok(cost)
    }

    /// Whether this cell's walls stop a crossing along `direction`
    ///
    /// Checked against both `direction` and its opposite, each widened by one
    /// step, so a straight wall can't be slipped past diagonally and the
    /// answer is the same whichever way the crossing is made. A unit standing
    /// on a walled cell therefore can't step straight away from its own wall
    /// either; that is intended.
    pub fn blocks_crossing(&self, direction: Direction, rules: &impl MovementRules) -> Result<bool> {
        if self.wrecked || self.border_directions.is_empty() {
            return Ok(false);
        }
        let covered = self.border_directions.contains_widened(direction)
            || self.border_directions.contains_widened(direction.opposite());
        if !covered {
            return Ok(false);
        }
        self.has_border_of_kind(BorderBlocking::CannotCrossSpecifiedBorders, rules)
    }
}

/// The full combat map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatMap {
    pub coordinate_system: SquareCoordinateSystem,
    cells: CellGrid<CombatCell>,
}

impl CombatMap {
    /// Create a map with every cell set to `terrain`
    pub fn new(width: i32, height: i32, terrain: impl Into<CombatTileTypeId>) -> Self {
        let cell = CombatCell::new(terrain);
        Self {
            coordinate_system: SquareCoordinateSystem::bounded(width, height),
            cells: CellGrid::filled(width as usize, height as usize, cell),
        }
    }

    /// Create a map at the configured combat size
    pub fn from_config(config: &MovementConfig, terrain: impl Into<CombatTileTypeId>) -> Self {
        Self::new(config.combat_map_width, config.combat_map_height, terrain)
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn get(&self, at: Coords) -> Option<&CombatCell> {
        self.cells.get(at)
    }

    pub fn get_mut(&mut self, at: Coords) -> Option<&mut CombatCell> {
        self.cells.get_mut(at)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coords, &CombatCell)> + '_ {
        self.cells.iter()
    }

    pub fn set_road(&mut self, at: Coords, road: impl Into<CombatTileTypeId>) {
        if let Some(cell) = self.get_mut(at) {
            cell.road = Some(road.into());
        }
    }

    pub fn set_building(&mut self, at: Coords, building: impl Into<CombatTileTypeId>) {
        if let Some(cell) = self.get_mut(at) {
            cell.building = Some(building.into());
        }
    }

    /// Add a border running along `directions` of the cell
    pub fn add_border(&mut self, at: Coords, border: impl Into<BorderId>, directions: DirectionSet) {
        if let Some(cell) = self.get_mut(at) {
            cell.borders.push(border.into());
            for d in directions.iter() {
                cell.border_directions.insert(d);
            }
        }
    }

    pub fn set_wrecked(&mut self, at: Coords, wrecked: bool) {
        if let Some(cell) = self.get_mut(at) {
            cell.wrecked = wrecked;
        }
    }

    pub fn set_mud(&mut self, at: Coords, mud: bool) {
        if let Some(cell) = self.get_mut(at) {
            cell.mud = mud;
        }
    }

    pub fn set_off_grid_edge(&mut self, at: Coords) {
        if let Some(cell) = self.get_mut(at) {
            cell.off_grid_edge = true;
        }
    }

    /// Walls on either side stop the step `from` -> `from + direction`
    pub fn crossing_blocked(
        &self,
        from: Coords,
        direction: Direction,
        to: Coords,
        rules: &impl MovementRules,
    ) -> Result<bool> {
        if let Some(cell) = self.get(from) {
            if cell.blocks_crossing(direction, rules)? {
                return Ok(true);
            }
        }
        match self.get(to) {
            Some(cell) => cell.blocks_crossing(direction, rules),
            None => Ok(false),
        }
    }
}
