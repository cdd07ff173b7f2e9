use std::ops::Add;

/// Integer board coordinate or shape offset. `y` grows upwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// One of the four quarter-turn orientations of a piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn index(self) -> usize {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn forward(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn backward(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

/// Turns a local offset about the origin by `rotation` quarter turns.
pub fn rotate(offset: Position, rotation: Rotation) -> Position {
    let Position { x, y } = offset;
    match rotation {
        Rotation::R0 => Position::new(x, y),
        Rotation::R90 => Position::new(-y, x),
        Rotation::R180 => Position::new(-x, -y),
        Rotation::R270 => Position::new(y, -x),
    }
}
