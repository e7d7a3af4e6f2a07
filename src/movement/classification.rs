//! What clicking a cell would do, derived from a finished movement grid

use serde::{Deserialize, Serialize};

use crate::movement::grid::{MovementCell, Reach};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveType {
    #[default]
    CannotMove,
    Move,
    Melee,
    Ranged,
}

impl MoveType {
    /// Classify one cell. Stateless: the same cell always gives the same answer.
    pub fn classify(cell: &MovementCell) -> Self {
        if cell.ranged_target {
            return MoveType::Ranged;
        }
        match cell.reach {
            Reach::Unchecked | Reach::Impassable => MoveType::CannotMove,
            Reach::Cost(_) if cell.results_in_attack => MoveType::Melee,
            Reach::Cost(_) => MoveType::Move,
        }
    }

    pub fn is_attack(self) -> bool {
        matches!(self, MoveType::Melee | MoveType::Ranged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(reach: Reach, attack: bool, ranged: bool) -> MovementCell {
        MovementCell {
            reach,
            results_in_attack: attack,
            ranged_target: ranged,
            ..Default::default()
        }
    }

    #[test]
    fn test_unreached_cells_cannot_move() {
        assert_eq!(MoveType::classify(&cell(Reach::Unchecked, false, false)), MoveType::CannotMove);
        assert_eq!(MoveType::classify(&cell(Reach::Impassable, false, false)), MoveType::CannotMove);
    }

    #[test]
    fn test_reached_cells() {
        assert_eq!(MoveType::classify(&cell(Reach::Cost(4), false, false)), MoveType::Move);
        assert_eq!(MoveType::classify(&cell(Reach::Cost(4), true, false)), MoveType::Melee);
    }

    #[test]
    fn test_ranged_wins_even_when_unreached() {
        assert_eq!(MoveType::classify(&cell(Reach::Unchecked, true, true)), MoveType::Ranged);
        assert_eq!(MoveType::classify(&cell(Reach::Cost(999), true, true)), MoveType::Ranged);
        assert!(MoveType::Ranged.is_attack());
        assert!(!MoveType::Move.is_attack());
    }
}
