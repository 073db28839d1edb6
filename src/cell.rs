//! Beveled cell rendering
//!
//! An occupied cell is three polygons: a flat inner square inset by a tenth
//! of the cell size, then two trim hexagons (top/left and bottom/right) that
//! are a shade lighter or darker than the fill. An empty cell is a plain
//! outline.

use crate::surface::{Point, Surface};
use crate::tetromino::{GRID_SIZE, Rgba, Shape};
use serde::{Deserialize, Serialize};

/// Percentage the trim colors differ from the fill
pub const TRIM_PCT: i32 = 10;

/// Outline color for empty cells
pub const EMPTY_CELL_COLOR: Rgba = Rgba::WHITE;

/// Which trim catches the light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bevel {
    /// Light top/left trim, dark bottom/right trim
    #[default]
    Raised,
    /// Dark top/left trim, light bottom/right trim
    Sunken,
}

impl Bevel {
    /// Percentages for the (top/left, bottom/right) trims
    pub fn trim_pcts(&self) -> (i32, i32) {
        match self {
            Bevel::Raised => (-TRIM_PCT, TRIM_PCT),
            Bevel::Sunken => (TRIM_PCT, -TRIM_PCT),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bevel::Raised => "raised",
            Bevel::Sunken => "sunken",
        }
    }
}

/// Scale one channel by `(100 - pct)%`, clamped to a byte
///
/// Positive `pct` darkens, negative brightens. Integer division truncates, so
/// darkening then brightening may land one step off the original.
pub fn adjust_channel(channel: u8, pct: i32) -> u8 {
    let c = i32::from(channel);
    ((100 * c - c * pct) / 100).clamp(0, 255) as u8
}

/// Adjust R, G and B independently; alpha is unchanged
pub fn adjust_color(color: Rgba, pct: i32) -> Rgba {
    Rgba {
        r: adjust_channel(color.r, pct),
        g: adjust_channel(color.g, pct),
        b: adjust_channel(color.b, pct),
        a: color.a,
    }
}

/// Draw one occupied cell with its top-left corner at `(x, y)`
pub fn draw_cell(surface: &mut impl Surface, x: i32, y: i32, size: i32, color: Rgba, bevel: Bevel) {
    let w = size;
    let m = size / 10;
    let (top_left_pct, bottom_right_pct) = bevel.trim_pcts();

    surface.fill_polygon(
        &[(x + m, y + m), (x + m, y + w - m), (x + w - m, y + w - m), (x + w - m, y + m)],
        color,
    );
    surface.fill_polygon(
        &[
            (x, y),
            (x, y + w),
            (x + m, y + w - m),
            (x + m, y + m),
            (x + w - m, y + m),
            (x + w, y),
        ],
        adjust_color(color, top_left_pct),
    );
    surface.fill_polygon(
        &[
            (x, y + w),
            (x + w, y + w),
            (x + w, y),
            (x + w - m, y + m),
            (x + w - m, y + w - m),
            (x + m, y + w - m),
        ],
        adjust_color(color, bottom_right_pct),
    );
}

/// Draw an empty cell as an unfilled square
pub fn draw_empty_cell(surface: &mut impl Surface, x: i32, y: i32, size: i32) {
    let square: [Point; 4] = [(x, y + size), (x + size, y + size), (x + size, y), (x, y)];
    surface.outline_polygon(&square, EMPTY_CELL_COLOR);
}

/// Draw the full 4x4 grid of a shape with its top-left corner at `(x, y)`
pub fn draw_shape(surface: &mut impl Surface, x: i32, y: i32, size: i32, shape: &Shape, bevel: Bevel) {
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let cx = x + col as i32 * size;
            let cy = y + row as i32 * size;
            if shape.is_occupied(row, col) {
                draw_cell(surface, cx, cy, size, shape.color(), bevel);
            } else {
                draw_empty_cell(surface, cx, cy, size);
            }
        }
    }
}
