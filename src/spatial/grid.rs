//! Dense per-cell storage indexed by coordinates

use serde::{Deserialize, Serialize};

use crate::spatial::coordinate_system::Coords;

/// Generic 2D grid stored as one flat arena, index = `y * width + x`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGrid<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> CellGrid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T: Clone + Default> CellGrid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> CellGrid<T> {
    /// Build a grid by calling `f` for every cell in row order
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Coords) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(Coords::new(x as i32, y as i32)));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn index_of(&self, c: Coords) -> Option<usize> {
        if c.x >= 0 && c.y >= 0 && (c.x as usize) < self.width && (c.y as usize) < self.height {
            Some(c.y as usize * self.width + c.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, c: Coords) -> Option<&T> {
        self.index_of(c).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, c: Coords) -> Option<&mut T> {
        self.index_of(c).map(move |i| &mut self.data[i])
    }

    #[inline]
    pub fn set(&mut self, c: Coords, value: T) {
        if let Some(i) = self.index_of(c) {
            self.data[i] = value;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate cells in row order together with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = (Coords, &T)> + '_ {
        let width = self.width;
        self.data.iter().enumerate().map(move |(i, v)| {
            (Coords::new((i % width) as i32, (i / width) as i32), v)
        })
    }

    /// Same-shaped grid holding `f` of every cell
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> CellGrid<U> {
        CellGrid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(&mut f).collect(),
        }
    }
}
