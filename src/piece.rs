use crate::geometry::{rotate, Position, Rotation};

pub const SHAPE_COUNT: usize = 7;

/// Four cell offsets around a pivot, at rotation 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Shape {
    pub offsets: [Position; 4],
}

impl Shape {
    pub const fn new(offsets: [(i32, i32); 4]) -> Self {
        Self {
            offsets: [
                Position::new(offsets[0].0, offsets[0].1),
                Position::new(offsets[1].0, offsets[1].1),
                Position::new(offsets[2].0, offsets[2].1),
                Position::new(offsets[3].0, offsets[3].1),
            ],
        }
    }
}

/// I, O, T, S, Z, J, L at rotation 0.
///
/// Every cell sits on the pivot row or the row below it, so a piece spawned on
/// the top row is fully inside the board. This is the classic upward-pointing
/// table turned a half-turn about each pivot; pass [`UPWARD_SHAPES`] to
/// [`GameConfig::with_shapes`](crate::GameConfig::with_shapes) to use the
/// upward table instead, in which case only the I piece fits on spawn.
pub const DEFAULT_SHAPES: [Shape; SHAPE_COUNT] = [
    Shape::new([(1, 0), (0, 0), (-1, 0), (-2, 0)]),   // I
    Shape::new([(0, 0), (-1, 0), (0, -1), (-1, -1)]), // O
    Shape::new([(1, 0), (0, 0), (-1, 0), (0, -1)]),   // T
    Shape::new([(0, 0), (-1, 0), (1, -1), (0, -1)]),  // S
    Shape::new([(1, 0), (0, 0), (0, -1), (-1, -1)]),  // Z
    Shape::new([(1, 0), (0, 0), (-1, 0), (1, -1)]),   // J
    Shape::new([(1, 0), (0, 0), (-1, 0), (-1, -1)]),  // L
];

/// The classic table with cells on the pivot row and the row above it.
pub const UPWARD_SHAPES: [Shape; SHAPE_COUNT] = [
    Shape::new([(-1, 0), (0, 0), (1, 0), (2, 0)]), // I
    Shape::new([(0, 0), (1, 0), (0, 1), (1, 1)]),  // O
    Shape::new([(-1, 0), (0, 0), (1, 0), (0, 1)]), // T
    Shape::new([(0, 0), (1, 0), (-1, 1), (0, 1)]), // S
    Shape::new([(-1, 0), (0, 0), (0, 1), (1, 1)]), // Z
    Shape::new([(-1, 0), (0, 0), (1, 0), (-1, 1)]), // J
    Shape::new([(-1, 0), (0, 0), (1, 0), (1, 1)]), // L
];

/// The active falling piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub shape_index: usize,
    pub shape: Shape,
    pub rotation: Rotation,
    pub position: Position,
}

impl Piece {
    /// Places a fresh piece at rotation 0, centred on the top row.
    pub fn spawn(shape_index: usize, shape: Shape, width: usize, height: usize) -> Self {
        let x = (width / 2) as i32;
        let y = height as i32 - 1;
        Self::new_at(shape_index, shape, Position::new(x, y))
    }

    pub fn new_at(shape_index: usize, shape: Shape, position: Position) -> Self {
        Self {
            shape_index,
            shape,
            rotation: Rotation::R0,
            position,
        }
    }

    /// Absolute board cells at the current rotation and position.
    pub fn cells(&self) -> [Position; 4] {
        self.shape
            .offsets
            .map(|offset| rotate(offset, self.rotation) + self.position)
    }

    pub fn rotate_forward(&mut self) {
        self.rotation = self.rotation.forward();
    }

    pub fn rotate_backward(&mut self) {
        self.rotation = self.rotation.backward();
    }

    /// Candidate copy translated by `(dx, dy)`.
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position + Position::new(dx, dy),
            ..*self
        }
    }

    /// Candidate copy turned one step forward.
    pub fn rotated(&self) -> Self {
        let mut candidate = *self;
        candidate.rotate_forward();
        candidate
    }
}
