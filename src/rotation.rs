//! Orientation transforms for shape grids
//!
//! Each orientation is a fixed remapping of grid coordinates: output cell
//! `(r, c)` takes the value of input cell `source_cell(r, c)`. The four
//! mappings are literal constants and do not form a strict rotation group:
//! orientation 1 is a transpose, 2 and 3 are reflections.

use crate::tetromino::{GRID_SIZE, Grid, Shape, ShapeLibrary};

const LAST: usize = GRID_SIZE - 1;

/// The four display orientations, indexed 0-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// 0: `(r, c) <- (r, c)`
    #[default]
    Identity,
    /// 1: `(r, c) <- (c, r)`
    Transpose,
    /// 2: `(r, c) <- (3 - r, c)`
    Rotate180,
    /// 3: `(r, c) <- (3 - c, r)`
    AntiTranspose,
}

/// Direction of an orientation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Left,
    Right,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Identity,
        Orientation::Transpose,
        Orientation::Rotate180,
        Orientation::AntiTranspose,
    ];

    /// Orientation for any integer index, taken modulo 4 (negatives wrap too)
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    pub fn index(&self) -> usize {
        match self {
            Orientation::Identity => 0,
            Orientation::Transpose => 1,
            Orientation::Rotate180 => 2,
            Orientation::AntiTranspose => 3,
        }
    }

    /// Step right: 0 -> 1 -> 2 -> 3 -> 0
    pub fn next(&self) -> Self {
        match self {
            Orientation::Identity => Orientation::Transpose,
            Orientation::Transpose => Orientation::Rotate180,
            Orientation::Rotate180 => Orientation::AntiTranspose,
            Orientation::AntiTranspose => Orientation::Identity,
        }
    }

    /// Step left: 0 -> 3 -> 2 -> 1 -> 0
    pub fn prev(&self) -> Self {
        match self {
            Orientation::Identity => Orientation::AntiTranspose,
            Orientation::AntiTranspose => Orientation::Rotate180,
            Orientation::Rotate180 => Orientation::Transpose,
            Orientation::Transpose => Orientation::Identity,
        }
    }

    pub fn step(&self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Left => self.prev(),
            RotationDirection::Right => self.next(),
        }
    }

    /// Input cell read for output cell `(row, col)`
    pub fn source_cell(&self, row: usize, col: usize) -> (usize, usize) {
        match self {
            Orientation::Identity => (row, col),
            Orientation::Transpose => (col, row),
            Orientation::Rotate180 => (LAST - row, col),
            Orientation::AntiTranspose => (LAST - col, row),
        }
    }

    /// Apply this orientation to a raw grid
    pub fn apply(&self, grid: &Grid) -> Grid {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                let (r1, c1) = self.source_cell(row, col);
                grid[r1][c1]
            })
        })
    }
}

/// Produce the `orientation` variant of `shape`; the color is carried over
pub fn rotate(shape: &Shape, orientation: Orientation) -> Shape {
    Shape::from_parts(shape.kind(), orientation.apply(shape.grid()), shape.color())
}

/// Every orientation of every shape in a library, computed once
#[derive(Debug, Clone)]
pub struct RotationTable {
    variants: [Vec<Shape>; 4],
}

impl RotationTable {
    pub fn new(library: &ShapeLibrary) -> Self {
        let variants = Orientation::ALL.map(|orientation| {
            (0..library.len())
                .map(|index| {
                    let shape = library.get(index);
                    let rotated = rotate(shape, orientation);
                    debug_assert_eq!(rotated.occupied_count(), shape.occupied_count());
                    rotated
                })
                .collect()
        });
        Self { variants }
    }

    /// Look up a variant; the shape index wraps like `ShapeLibrary::get`
    pub fn get(&self, orientation: Orientation, shape_index: usize) -> &Shape {
        let row = &self.variants[orientation.index()];
        &row[shape_index % row.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    fn rows(shape: &Shape) -> Vec<[u8; 4]> {
        shape
            .grid()
            .iter()
            .map(|row| row.map(|cell| cell as u8))
            .collect()
    }

    #[test]
    fn test_identity_returns_same_grid() {
        for shape in ShapeLibrary::standard().iter() {
            assert_eq!(&rotate(shape, Orientation::Identity), shape);
        }
    }

    #[test]
    fn test_orientations_preserve_occupied_cells() {
        for shape in ShapeLibrary::standard().iter() {
            for orientation in Orientation::ALL {
                let rotated = rotate(shape, orientation);
                assert_eq!(
                    rotated.occupied_count(),
                    shape.occupied_count(),
                    "{} at {:?}",
                    shape.name(),
                    orientation
                );
                assert_eq!(rotated.color(), shape.color());
            }
        }
    }

    #[test]
    fn test_source_cell_is_permutation() {
        for orientation in Orientation::ALL {
            let mut seen = [[false; GRID_SIZE]; GRID_SIZE];
            for row in 0..GRID_SIZE {
                for col in 0..GRID_SIZE {
                    let (r1, c1) = orientation.source_cell(row, col);
                    assert!(!seen[r1][c1], "{:?} reads ({}, {}) twice", orientation, r1, c1);
                    seen[r1][c1] = true;
                }
            }
        }
    }

    #[test]
    fn test_i_transpose_is_horizontal() {
        let i = Shape::new(TetrominoType::I);
        let rotated = rotate(&i, Orientation::Transpose);
        assert_eq!(rows(&rotated), [[1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
    }

    #[test]
    fn test_t_flip_and_anti_transpose() {
        let t = Shape::new(TetrominoType::T);
        assert_eq!(
            rows(&rotate(&t, Orientation::Rotate180)),
            [[0, 0, 0, 0], [0, 0, 0, 0], [0, 1, 0, 0], [1, 1, 1, 0]]
        );
        assert_eq!(
            rows(&rotate(&t, Orientation::AntiTranspose)),
            [[0, 0, 0, 1], [0, 0, 1, 1], [0, 0, 0, 1], [0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_orientation_wraps() {
        assert_eq!(Orientation::Identity.prev(), Orientation::AntiTranspose);
        assert_eq!(Orientation::AntiTranspose.next(), Orientation::Identity);
        assert_eq!(Orientation::from_index(-1).index(), 3);
        assert_eq!(Orientation::from_index(4).index(), 0);
        assert_eq!(Orientation::from_index(7), Orientation::AntiTranspose);
    }

    #[test]
    fn test_next_and_prev_are_inverse() {
        for orientation in Orientation::ALL {
            assert_eq!(orientation.next().prev(), orientation);
            assert_eq!(orientation.step(RotationDirection::Left).step(RotationDirection::Right), orientation);
            assert_eq!(Orientation::from_index(orientation.index() as i32), orientation);
        }
    }

    #[test]
    fn test_table_lookup() {
        let library = ShapeLibrary::standard();
        let table = RotationTable::new(&library);
        assert_eq!(table.get(Orientation::Identity, 3), library.get(3));
        assert_eq!(
            table.get(Orientation::Transpose, 0),
            &rotate(library.get(0), Orientation::Transpose)
        );
        assert_eq!(table.get(Orientation::Rotate180, 7), table.get(Orientation::Rotate180, 0));
    }
}
