//! Drawing surface and display list
//!
//! The cell renderer only talks to [`Surface`]. [`DisplayList`] records the
//! calls for a frame; once presented, the frame is handed to a ratatui
//! canvas which rasterizes it at logical resolution and downsamples to
//! terminal pixels.

use crate::tetromino::Rgba;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Painter, Shape as CanvasShape};
use std::collections::{BTreeMap, HashMap};

/// A vertex in logical coordinates, y growing downward
pub type Point = (i32, i32);

/// Polygon drawing target
pub trait Surface {
    /// Start a new frame filled with `color`
    fn clear(&mut self, color: Rgba);
    fn fill_polygon(&mut self, points: &[Point], color: Rgba);
    fn outline_polygon(&mut self, points: &[Point], color: Rgba);
    /// Publish the current frame
    fn present(&mut self);
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Fill { points: Vec<Point>, color: Rgba },
    Outline { points: Vec<Point>, color: Rgba },
}

impl DrawCommand {
    pub fn color(&self) -> Rgba {
        match self {
            DrawCommand::Fill { color, .. } | DrawCommand::Outline { color, .. } => *color,
        }
    }

    pub fn points(&self) -> &[Point] {
        match self {
            DrawCommand::Fill { points, .. } | DrawCommand::Outline { points, .. } => points,
        }
    }
}

/// One frame's worth of draw commands over a fixed logical area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    width: i32,
    height: i32,
    background: Rgba,
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            background: Rgba::BLACK,
            commands: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rasterize every command at logical resolution, later commands on top
    ///
    /// Only covered points are returned; everything else is background.
    pub fn rasterize(&self) -> BTreeMap<Point, Rgba> {
        let mut pixels = BTreeMap::new();
        for command in &self.commands {
            let covered = match command {
                DrawCommand::Fill { .. } => fill_points(command.points()),
                DrawCommand::Outline { .. } => outline_points(command.points()),
            };
            for p in covered {
                pixels.insert(p, command.color());
            }
        }
        pixels.retain(|&(x, y), _| x >= 0 && y >= 0 && x < self.width && y < self.height);
        pixels
    }
}

impl CanvasShape for Scene {
    fn draw(&self, painter: &mut Painter) {
        // Several logical points land on each terminal pixel; the color
        // covering most of them wins
        let mut votes: HashMap<(usize, usize), Vec<(Rgba, u32)>> = HashMap::new();
        for ((x, y), color) in self.rasterize() {
            // Sample at the point's center; canvas y grows upward
            let cx = f64::from(x) + 0.5;
            let cy = f64::from(self.height) - (f64::from(y) + 0.5);
            let Some(cell) = painter.get_point(cx, cy) else {
                continue;
            };
            let tally = votes.entry(cell).or_default();
            match tally.iter_mut().find(|(c, _)| *c == color) {
                Some((_, n)) => *n += 1,
                None => tally.push((color, 1)),
            }
        }

        for ((px, py), tally) in votes {
            if let Some((color, _)) = tally.into_iter().max_by_key(|(_, n)| *n) {
                painter.paint(px, py, Color::from(color));
            }
        }
    }
}

/// Records draw calls; `present` swaps the pending frame in for display
#[derive(Debug, Clone)]
pub struct DisplayList {
    pending: Scene,
    presented: Scene,
    frames: u64,
}

impl DisplayList {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            pending: Scene::new(width, height),
            presented: Scene::new(width, height),
            frames: 0,
        }
    }

    /// The frame being drawn
    #[cfg(test)]
    pub fn pending(&self) -> &Scene {
        &self.pending
    }

    /// The last presented frame
    pub fn presented(&self) -> &Scene {
        &self.presented
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Surface for DisplayList {
    fn clear(&mut self, color: Rgba) {
        self.pending.background = color;
        self.pending.commands.clear();
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        self.pending.commands.push(DrawCommand::Fill {
            points: points.to_vec(),
            color,
        });
    }

    fn outline_polygon(&mut self, points: &[Point], color: Rgba) {
        self.pending.commands.push(DrawCommand::Outline {
            points: points.to_vec(),
            color,
        });
    }

    fn present(&mut self) {
        let next = Scene::new(self.pending.width, self.pending.height);
        self.presented = std::mem::replace(&mut self.pending, next);
        self.pending.background = self.presented.background;
        self.frames += 1;
    }
}

/// Even-odd test for a point against a closed polygon
pub fn polygon_contains(points: &[Point], x: f64, y: f64) -> bool {
    let Some(&last) = points.last() else {
        return false;
    };
    let mut inside = false;
    let (mut xj, mut yj) = (f64::from(last.0), f64::from(last.1));
    for &(px, py) in points {
        let (xi, yi) = (f64::from(px), f64::from(py));
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        (xj, yj) = (xi, yi);
    }
    inside
}

/// Integer points whose centers fall inside the polygon
fn fill_points(points: &[Point]) -> Vec<Point> {
    let (Some(min_x), Some(max_x)) = (
        points.iter().map(|p| p.0).min(),
        points.iter().map(|p| p.0).max(),
    ) else {
        return Vec::new();
    };
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);

    let mut covered = Vec::new();
    for y in min_y..max_y {
        for x in min_x..max_x {
            if polygon_contains(points, f64::from(x) + 0.5, f64::from(y) + 0.5) {
                covered.push((x, y));
            }
        }
    }
    covered
}

/// Integer points along every edge of the closed polygon
fn outline_points(points: &[Point]) -> Vec<Point> {
    let mut covered = Vec::new();
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs());
        if steps == 0 {
            covered.push(a);
            continue;
        }
        for s in 0..=steps {
            let t = f64::from(s) / f64::from(steps);
            let x = f64::from(a.0) + f64::from(b.0 - a.0) * t;
            let y = f64::from(a.1) + f64::from(b.1 - a.1) * t;
            covered.push((x.round() as i32, y.round() as i32));
        }
    }
    covered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Bevel, draw_cell};
    use ratatui::{
        Terminal,
        backend::TestBackend,
        symbols::Marker,
        widgets::canvas::Canvas,
    };

    const SQUARE: [Point; 4] = [(0, 0), (0, 10), (10, 10), (10, 0)];

    #[test]
    fn test_polygon_contains() {
        assert!(polygon_contains(&SQUARE, 5.0, 5.0));
        assert!(polygon_contains(&SQUARE, 0.5, 9.5));
        assert!(!polygon_contains(&SQUARE, 10.5, 5.0));
        assert!(!polygon_contains(&SQUARE, 5.0, -0.5));
        assert!(!polygon_contains(&[], 0.0, 0.0));
    }

    #[test]
    fn test_hexagon_trim_excludes_center() {
        // Top/left trim of a 20px cell at the origin
        let trim = [(0, 0), (0, 20), (2, 18), (2, 2), (18, 2), (20, 0)];
        assert!(polygon_contains(&trim, 1.0, 10.0));
        assert!(polygon_contains(&trim, 10.0, 1.0));
        assert!(!polygon_contains(&trim, 10.0, 10.0));
        assert!(!polygon_contains(&trim, 19.0, 19.0));
    }

    #[test]
    fn test_fill_covers_whole_square() {
        let points = fill_points(&SQUARE);
        assert_eq!(points.len(), 100);
        assert!(points.contains(&(0, 0)));
        assert!(points.contains(&(9, 9)));
        assert!(!points.contains(&(10, 10)));
    }

    #[test]
    fn test_outline_traces_edges() {
        let points = outline_points(&SQUARE);
        assert!(points.contains(&(0, 5)));
        assert!(points.contains(&(10, 5)));
        assert!(points.contains(&(5, 0)));
        assert!(points.contains(&(5, 10)));
        assert!(!points.contains(&(5, 5)));
    }

    #[test]
    fn test_later_commands_paint_over_earlier() {
        let mut list = DisplayList::new(100, 100);
        let red = Rgba::opaque(200, 0, 0);
        let blue = Rgba::opaque(0, 0, 200);
        list.fill_polygon(&SQUARE, red);
        list.fill_polygon(&[(5, 0), (5, 10), (10, 10), (10, 0)], blue);

        let pixels = list.pending().rasterize();
        assert_eq!(pixels.get(&(1, 1)), Some(&red));
        assert_eq!(pixels.get(&(7, 7)), Some(&blue));
        assert_eq!(pixels.get(&(50, 50)), None);
    }

    #[test]
    fn test_rasterize_clips_to_scene() {
        let mut list = DisplayList::new(5, 5);
        list.fill_polygon(&SQUARE, Rgba::WHITE);
        let pixels = list.pending().rasterize();
        assert_eq!(pixels.len(), 25);
    }

    #[test]
    fn test_present_swaps_frames() {
        let mut list = DisplayList::new(100, 100);
        let grey = Rgba::opaque(20, 20, 20);
        list.clear(grey);
        list.outline_polygon(&SQUARE, Rgba::WHITE);
        list.present();

        assert_eq!(list.frames(), 1);
        assert_eq!(list.presented().commands().len(), 1);
        assert_eq!(list.presented().background(), grey);
        assert!(list.pending().commands().is_empty());

        list.clear(Rgba::BLACK);
        assert_eq!(list.presented().background(), grey);
        assert_eq!(list.pending().background(), Rgba::BLACK);
    }

    #[test]
    fn test_canvas_fill_outvotes_trims() {
        // Two 20px cells side by side; on a 3x1 half-block canvas each one
        // collapses into a single terminal pixel
        let red = Rgba::opaque(200, 0, 0);
        let blue = Rgba::opaque(0, 0, 200);
        let mut list = DisplayList::new(40, 20);
        list.clear(Rgba::BLACK);
        draw_cell(&mut list, 0, 0, 20, red, Bevel::Raised);
        draw_cell(&mut list, 20, 0, 20, blue, Bevel::Raised);
        list.present();
        let scene = list.presented();

        let mut terminal = Terminal::new(TestBackend::new(3, 1)).unwrap();
        terminal
            .draw(|frame| {
                let canvas = Canvas::default()
                    .marker(Marker::HalfBlock)
                    .x_bounds([0.0, f64::from(scene.width())])
                    .y_bounds([0.0, f64::from(scene.height())])
                    .paint(|ctx| ctx.draw(scene));
                frame.render_widget(canvas, frame.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0u16, 0u16)].fg, Color::from(red));
        assert_eq!(buffer[(1u16, 0u16)].fg, Color::from(blue));
        assert_eq!(buffer[(0u16, 0u16)].symbol(), "▀");
    }
}
