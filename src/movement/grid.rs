//! Per-cell movement results for one query

use serde::{Deserialize, Serialize};

use crate::core::types::DoubledMoves;
use crate::movement::classification::MoveType;
use crate::spatial::{CellGrid, CoordinateSystem, Coords, Direction};

/// How far relaxation got with a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reach {
    #[default]
    Unchecked,
    Impassable,
    Cost(DoubledMoves),
}

impl Reach {
    pub fn cost(self) -> Option<DoubledMoves> {
        match self {
            Reach::Cost(cost) => Some(cost),
            _ => None,
        }
    }

    pub fn is_reached(self) -> bool {
        matches!(self, Reach::Cost(_))
    }
}

/// Everything recorded about one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementCell {
    pub reach: Reach,
    /// Direction of the final step into this cell on the cheapest path
    pub direction: Option<Direction>,
    pub reachable_this_turn: bool,
    pub results_in_attack: bool,
    /// Combat only: an enemy the unit can shoot from where it stands
    pub ranged_target: bool,
}

impl MovementCell {
    pub fn move_type(&self) -> MoveType {
        MoveType::classify(self)
    }
}

/// Movement results for every cell of one plane or combat map
///
/// Allocated fresh per query and handed to the caller by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementGrid {
    cells: CellGrid<MovementCell>,
}

impl MovementGrid {
    /// Grid with every cell unchecked
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: CellGrid::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn cell(&self, c: Coords) -> Option<&MovementCell> {
        self.cells.get(c)
    }

    pub(crate) fn cell_mut(&mut self, c: Coords) -> Option<&mut MovementCell> {
        self.cells.get_mut(c)
    }

    pub fn reach(&self, c: Coords) -> Reach {
        self.cell(c).map(|cell| cell.reach).unwrap_or_default()
    }

    pub fn cost(&self, c: Coords) -> Option<DoubledMoves> {
        self.reach(c).cost()
    }

    pub fn move_type(&self, c: Coords) -> MoveType {
        self.cell(c).map(MovementCell::move_type).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coords, &MovementCell)> + '_ {
        self.cells.iter()
    }

    /// True if relaxation touched any cell at all
    pub fn is_populated(&self) -> bool {
        self.iter().any(|(_, cell)| cell.reach.is_reached())
    }

    pub fn move_types(&self) -> CellGrid<MoveType> {
        self.cells.map(MovementCell::move_type)
    }

    pub fn costs(&self) -> CellGrid<Option<DoubledMoves>> {
        self.cells.map(|cell| cell.reach.cost())
    }

    pub fn directions(&self) -> CellGrid<Option<Direction>> {
        self.cells.map(|cell| cell.direction)
    }

    pub fn reachable_this_turn(&self) -> CellGrid<bool> {
        self.cells.map(|cell| cell.reachable_this_turn)
    }

    /// Cells from the origin to `dest`, both inclusive, following the
    /// recorded approach directions backwards
    pub fn path_to(&self, sys: &impl CoordinateSystem, dest: Coords) -> Option<Vec<Coords>> {
        self.cost(dest)?;

        let mut path = vec![dest];
        let mut current = dest;
        while let Some(direction) = self.cell(current)?.direction {
            current = sys.step(current, direction.opposite())?;
            path.push(current);
            if path.len() > self.cells.len() {
                return None;
            }
        }

        if self.cost(current) != Some(0) {
            return None;
        }
        path.reverse();
        Some(path)
    }
}
