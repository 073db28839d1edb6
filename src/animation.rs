//! Animation state: the selected shape bouncing around the window

use crate::rotation::{Orientation, RotationDirection, RotationTable};
use crate::settings::AnimationSettings;
use crate::tetromino::{GRID_SIZE, Shape};

/// Logical window size
pub const WINDOW_WIDTH: i32 = 800;
pub const WINDOW_HEIGHT: i32 = 600;

/// Input actions the demo can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextShape,
    RotateLeft,
    RotateRight,
    Quit,
}

/// Selected shape, orientation and the bouncing position
#[derive(Debug, Clone)]
pub struct Animation {
    /// Index into the shape library
    pub shape_index: usize,
    pub orientation: Orientation,
    /// Top-left corner of the 4x4 grid
    pub x: i32,
    pub y: i32,
    /// Per-frame velocity
    pub vx: i32,
    pub vy: i32,
    /// Cell size in logical pixels
    pub block_size: i32,
    width: i32,
    height: i32,
    shape_count: usize,
    running: bool,
    frame: u64,
}

impl Animation {
    /// Start centered in a `width` x `height` window
    pub fn new(width: i32, height: i32, shape_count: usize, settings: &AnimationSettings) -> Self {
        Self {
            shape_index: settings.start_shape % shape_count.max(1),
            orientation: Orientation::from_index(settings.start_orientation),
            x: width / 2,
            y: height / 2,
            vx: settings.speed,
            vy: settings.speed,
            block_size: settings.block_size,
            width,
            height,
            shape_count: shape_count.max(1),
            running: true,
            frame: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Process an action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::NextShape => {
                self.shape_index = (self.shape_index + 1) % self.shape_count;
            }
            Action::RotateLeft => self.rotate(RotationDirection::Left),
            Action::RotateRight => self.rotate(RotationDirection::Right),
            Action::Quit => self.running = false,
        }
    }

    fn rotate(&mut self, direction: RotationDirection) {
        self.orientation = self.orientation.step(direction);
        tracing::debug!("rotation {}", self.orientation.index());
    }

    /// Advance one frame: move, then bounce off any edge reached
    pub fn step(&mut self) {
        let extent = self.block_size * GRID_SIZE as i32;

        self.x += self.vx;
        self.y += self.vy;
        if self.x >= self.width - extent || self.x <= 0 {
            self.vx = -self.vx;
        }
        if self.y >= self.height - extent || self.y <= 0 {
            self.vy = -self.vy;
        }
        self.frame += 1;
    }

    /// The shape to draw this frame
    pub fn current<'a>(&self, table: &'a RotationTable) -> &'a Shape {
        table.get(self.orientation, self.shape_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MAX_SPEED, Settings};
    use crate::tetromino::ShapeLibrary;

    fn animation() -> Animation {
        Animation::new(WINDOW_WIDTH, WINDOW_HEIGHT, 7, &AnimationSettings::default())
    }

    #[test]
    fn test_starts_centered() {
        let anim = animation();
        assert_eq!((anim.x, anim.y), (400, 300));
        assert_eq!((anim.vx, anim.vy), (2, 2));
        assert_eq!(anim.shape_index, 0);
        assert_eq!(anim.orientation, Orientation::Identity);
        assert!(anim.is_running());
    }

    #[test]
    fn test_start_selection_wraps() {
        let settings = AnimationSettings {
            start_shape: 9,
            start_orientation: -1,
            ..AnimationSettings::default()
        };
        let anim = Animation::new(WINDOW_WIDTH, WINDOW_HEIGHT, 7, &settings);
        assert_eq!(anim.shape_index, 2);
        assert_eq!(anim.orientation, Orientation::AntiTranspose);
    }

    #[test]
    fn test_next_shape_wraps() {
        let mut anim = animation();
        for _ in 0..7 {
            anim.apply(Action::NextShape);
        }
        assert_eq!(anim.shape_index, 0);
    }

    #[test]
    fn test_rotation_wraps_both_ways() {
        let mut anim = animation();
        anim.apply(Action::RotateLeft);
        assert_eq!(anim.orientation.index(), 3);
        anim.apply(Action::RotateRight);
        anim.apply(Action::RotateRight);
        assert_eq!(anim.orientation.index(), 1);
    }

    #[test]
    fn test_quit_stops() {
        let mut anim = animation();
        anim.apply(Action::Quit);
        assert!(!anim.is_running());
    }

    #[test]
    fn test_bounces_off_right_and_bottom() {
        let mut anim = animation();
        anim.x = 716;
        anim.y = 516;
        anim.step();
        // Reached 720/520 = window minus four cells
        assert_eq!((anim.x, anim.y), (718, 518));
        assert_eq!((anim.vx, anim.vy), (2, 2));
        anim.step();
        assert_eq!((anim.x, anim.y), (720, 520));
        assert_eq!((anim.vx, anim.vy), (-2, -2));
        anim.step();
        assert_eq!((anim.x, anim.y), (718, 518));
    }

    #[test]
    fn test_bounces_off_left_and_top() {
        let mut anim = animation();
        anim.x = 2;
        anim.y = 2;
        anim.vx = -2;
        anim.vy = -2;
        anim.step();
        assert_eq!((anim.x, anim.y), (0, 0));
        assert_eq!((anim.vx, anim.vy), (2, 2));
    }

    #[test]
    fn test_stays_in_window() {
        let mut anim = animation();
        for _ in 0..2000 {
            anim.step();
            assert!(anim.x >= 0 && anim.x <= WINDOW_WIDTH - 80);
            assert!(anim.y >= 0 && anim.y <= WINDOW_HEIGHT - 80);
        }
        assert_eq!(anim.frame(), 2000);
    }

    #[test]
    fn test_oversized_settings_step_without_overflow() {
        let settings =
            Settings::parse("[animation]\nblock_size = 1000000000\nspeed = 2000000000\n").unwrap();
        let mut anim = Animation::new(WINDOW_WIDTH, WINDOW_HEIGHT, 7, &settings.animation);
        for _ in 0..1000 {
            anim.step();
            assert!(anim.x.abs() <= WINDOW_WIDTH + MAX_SPEED);
            assert!(anim.y.abs() <= WINDOW_HEIGHT + MAX_SPEED);
        }
    }

    #[test]
    fn test_current_shape_follows_state() {
        let library = ShapeLibrary::standard();
        let table = RotationTable::new(&library);
        let mut anim = animation();
        anim.apply(Action::NextShape);
        anim.apply(Action::RotateRight);
        assert_eq!(anim.current(&table), table.get(Orientation::Transpose, 1));
        assert_eq!(anim.current(&table).name(), "J");
    }
}
