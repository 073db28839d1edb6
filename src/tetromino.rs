//! Tetromino definitions and shapes
//!
//! All 7 standard tetrominoes as 4x4 occupancy grids, each with a display color.

use ratatui::style::Color;

/// Side length of every shape grid
pub const GRID_SIZE: usize = 4;

/// A 4x4 occupancy grid, indexed `[row][col]` with row 0 at the top
pub type Grid = [[bool; GRID_SIZE]; GRID_SIZE];

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<Rgba> for Color {
    // Terminals have no alpha channel
    fn from(c: Rgba) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// The 7 tetromino types, in library order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Teal - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

impl TetrominoType {
    /// All tetromino types in library order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }

    /// Get the color for this tetromino
    pub fn color(&self) -> Rgba {
        match self {
            TetrominoType::I => Rgba::opaque(0, 180, 200),
            TetrominoType::J => Rgba::opaque(0, 0, 200),
            TetrominoType::L => Rgba::opaque(180, 100, 0),
            TetrominoType::O => Rgba::opaque(240, 230, 0),
            TetrominoType::S => Rgba::opaque(0, 200, 0),
            TetrominoType::T => Rgba::opaque(240, 0, 230),
            TetrominoType::Z => Rgba::opaque(200, 0, 0),
        }
    }

    /// Get the base occupancy grid for this tetromino
    pub fn grid(&self) -> Grid {
        // One nibble per row, high bit is column 0
        //  I:    J:    L:    O:    S:    T:    Z:
        //  #...  .#..  #...  ....  .##.  ###.  ##..
        //  #...  .#..  #...  .##.  ##..  .#..  .##.
        //  #...  ##..  ##..  .##.  ....  ....  ....
        //  #...  ....  ....  ....  ....  ....  ....
        let rows: [u8; GRID_SIZE] = match self {
            TetrominoType::I => [0b1000, 0b1000, 0b1000, 0b1000],
            TetrominoType::J => [0b0100, 0b0100, 0b1100, 0b0000],
            TetrominoType::L => [0b1000, 0b1000, 0b1100, 0b0000],
            TetrominoType::O => [0b0000, 0b0110, 0b0110, 0b0000],
            TetrominoType::S => [0b0110, 0b1100, 0b0000, 0b0000],
            TetrominoType::T => [0b1110, 0b0100, 0b0000, 0b0000],
            TetrominoType::Z => [0b1100, 0b0110, 0b0000, 0b0000],
        };
        rows.map(|bits| std::array::from_fn(|col| bits & (0b1000u8 >> col) != 0))
    }
}

/// An immutable shape: a 4x4 occupancy grid plus a color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    kind: TetrominoType,
    grid: Grid,
    color: Rgba,
}

impl Shape {
    /// Build the base (unrotated) shape of a tetromino
    pub fn new(kind: TetrominoType) -> Self {
        Self::from_parts(kind, kind.grid(), kind.color())
    }

    pub(crate) fn from_parts(kind: TetrominoType, grid: Grid, color: Rgba) -> Self {
        Self { kind, grid, color }
    }

    pub fn kind(&self) -> TetrominoType {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.grid[row][col]
    }

    /// Number of filled cells (4 for every tetromino)
    pub fn occupied_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&cell| cell).count()
    }
}

/// Ordered, immutable registry of shapes
///
/// Built once at startup and passed by reference to whoever needs shapes.
/// Lookups are cyclic: index `len()` is the first shape again.
#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    shapes: Vec<Shape>,
}

impl ShapeLibrary {
    /// The seven standard tetrominoes: I, J, L, O, S, T, Z
    pub fn standard() -> Self {
        Self {
            shapes: TetrominoType::all().into_iter().map(Shape::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Get a shape, wrapping the index around the end of the library
    pub fn get(&self, index: usize) -> &Shape {
        &self.shapes[index % self.shapes.len()]
    }
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_order() {
        let lib = ShapeLibrary::standard();
        let names: Vec<_> = lib.iter().map(Shape::name).collect();
        assert_eq!(names, ["I", "J", "L", "O", "S", "T", "Z"]);
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for shape in ShapeLibrary::standard().iter() {
            assert_eq!(shape.occupied_count(), 4, "shape {}", shape.name());
        }
    }

    #[test]
    fn test_i_grid() {
        let i = Shape::new(TetrominoType::I);
        for row in 0..GRID_SIZE {
            assert_eq!(i.grid()[row], [true, false, false, false]);
        }
    }

    #[test]
    fn test_t_grid() {
        let t = Shape::new(TetrominoType::T);
        assert_eq!(t.grid()[0], [true, true, true, false]);
        assert_eq!(t.grid()[1], [false, true, false, false]);
        assert_eq!(t.grid()[2], [false; 4]);
    }

    #[test]
    fn test_cyclic_selection() {
        let lib = ShapeLibrary::standard();
        assert_eq!(lib.get(lib.len()), lib.get(0));
        assert_eq!(lib.get(lib.len() + 3).name(), "O");
    }

    #[test]
    fn test_colors() {
        assert_eq!(TetrominoType::O.color(), Rgba::new(240, 230, 0, 255));
        assert_eq!(Color::from(TetrominoType::Z.color()), Color::Rgb(200, 0, 0));
    }
}
