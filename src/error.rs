use thiserror::Error;

/// Why a candidate placement was rejected. Gameplay only looks at whether
/// there was an error; the variant is for diagnostics and tests.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum PlacementError {
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("cell ({x}, {y}) is already occupied")]
    Collision { x: i32, y: i32 },
}

#[derive(Debug, Error, PartialEq, Clone, Copy)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("board dimensions {width}x{height} do not fit in signed coordinates")]
    BoardTooLarge { width: usize, height: usize },
    #[error("drop interval must be a positive number of seconds, got {0}")]
    InvalidDropInterval(f64),
    #[error("board is {board_width}x{board_height} but the game is configured for {width}x{height}")]
    BoardMismatch {
        width: usize,
        height: usize,
        board_width: usize,
        board_height: usize,
    },
}
