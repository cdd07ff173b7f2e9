//! Falling-block puzzle core: pieces, board occupancy, move and rotation
//! validation, locking and line clearing.
//!
//! The library owns no rendering, input or timing. Hosts feed it commands and
//! elapsed time, and read back [`game::GameEvent`]s.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod piece;

pub use board::{Board, Cell};
pub use config::{ColorId, GameConfig, DEFAULT_DROP_INTERVAL, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use error::{ConfigError, PlacementError};
pub use game::{
    Command, DropOutcome, Game, GameEvent, GameState, PieceProvider, RandomPieceProvider,
    SequencePieceProvider, Status,
};
pub use geometry::{rotate, Position, Rotation};
pub use piece::{Piece, Shape, DEFAULT_SHAPES, SHAPE_COUNT, UPWARD_SHAPES};
