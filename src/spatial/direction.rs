//! Compass directions for square grids
//!
//! Directions are numbered 1..=8 clockwise starting at north, which is the
//! numbering rules content uses when it lists blocked border directions.

use serde::{Deserialize, Serialize};

/// One of the eight neighbour directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Numbering order, north clockwise
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Order relaxation tries neighbours in: orthogonal steps before
    /// diagonals, so equal-cost ties resolve to straight lines
    pub const RELAXATION_ORDER: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Direction number, 1 = north through 8 = north-west
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1..=8 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// Cell offset for this direction; y grows southwards
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Rotate clockwise by `steps` eighths of a turn (negative = anticlockwise)
    pub fn rotate(self, steps: i32) -> Self {
        let index = (self as i32 + steps).rem_euclid(8);
        Self::ALL[index as usize]
    }

    pub fn opposite(self) -> Self {
        self.rotate(4)
    }
}

/// Bitset of directions, used for the sides a combat border covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Direction>", into = "Vec<Direction>")]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << (direction as u8);
    }

    pub fn with(mut self, direction: Direction) -> Self {
        self.insert(direction);
        self
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & (1 << (direction as u8)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if the set holds `direction` or either of its diagonal neighbours
    ///
    /// The widening stops a diagonal step from slipping past the end of a
    /// straight wall.
    pub fn contains_widened(&self, direction: Direction) -> bool {
        self.contains(direction)
            || self.contains(direction.rotate(1))
            || self.contains(direction.rotate(-1))
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::empty();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

impl From<Vec<Direction>> for DirectionSet {
    fn from(directions: Vec<Direction>) -> Self {
        directions.into_iter().collect()
    }
}

impl From<DirectionSet> for Vec<Direction> {
    fn from(set: DirectionSet) -> Self {
        set.iter().collect()
    }
}
