use crate::error::ConfigError;
use crate::piece::{Shape, DEFAULT_SHAPES, SHAPE_COUNT};

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;
/// Seconds between gravity steps.
pub const DEFAULT_DROP_INTERVAL: f64 = 1.0;

/// Opaque per-shape identity carried by locked cells and events. The core
/// never interprets it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ColorId(pub u8);

pub const DEFAULT_COLORS: [ColorId; SHAPE_COUNT] = [
    ColorId(0),
    ColorId(1),
    ColorId(2),
    ColorId(3),
    ColorId(4),
    ColorId(5),
    ColorId(6),
];

/// Fixed for the lifetime of a game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub drop_interval: f64,
    pub shapes: [Shape; SHAPE_COUNT],
    pub colors: [ColorId; SHAPE_COUNT],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            drop_interval: DEFAULT_DROP_INTERVAL,
            shapes: DEFAULT_SHAPES,
            colors: DEFAULT_COLORS,
        }
    }
}

impl GameConfig {
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_drop_interval(mut self, seconds: f64) -> Self {
        self.drop_interval = seconds;
        self
    }

    pub fn with_shapes(mut self, shapes: [Shape; SHAPE_COUNT]) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_colors(mut self, colors: [ColorId; SHAPE_COUNT]) -> Self {
        self.colors = colors;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyBoard { width, height });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(ConfigError::BoardTooLarge { width, height });
        }
        if !self.drop_interval.is_finite() || self.drop_interval <= 0.0 {
            return Err(ConfigError::InvalidDropInterval(self.drop_interval));
        }
        Ok(())
    }

    pub fn color_of(&self, shape_index: usize) -> ColorId {
        self.colors[shape_index % SHAPE_COUNT]
    }
}
