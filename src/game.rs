use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Cell};
use crate::config::{ColorId, GameConfig};
use crate::error::ConfigError;
use crate::geometry::Position;
use crate::piece::{Piece, SHAPE_COUNT};

// ============================================================================
// Types
// ============================================================================

/// Player-issued discrete commands. Gravity is driven by elapsed time instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Running,
    Over,
}

/// Result of a downward step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DropOutcome {
    Moved,
    /// The piece could not move down and was locked; a new piece was spawned
    /// (or the game ended).
    Locked,
    /// Nothing happened because the game is over.
    Idle,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceSpawned { cells: [Position; 4], color: ColorId },
    PieceMoved { cells: [Position; 4], color: ColorId },
    PieceLocked { cells: [Position; 4], color: ColorId },
    /// Row indices as they were before the clear, ascending.
    LinesCleared(Vec<usize>),
    GameOver,
    GameRestarted,
}

/// Everything the engine mutates: the board, the active piece and the
/// running flag.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    pub board: Board,
    pub current: Option<Piece>,
    pub status: Status,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

/// Chooses the shape index (0..7) of each spawned piece.
pub trait PieceProvider {
    fn next_shape(&mut self) -> usize;
}

pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_shape(&mut self) -> usize {
        self.rng.gen_range(0..SHAPE_COUNT)
    }
}

pub struct SequencePieceProvider {
    shapes: Vec<usize>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(shapes: Vec<usize>) -> Self {
        Self { shapes, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_shape(&mut self) -> usize {
        if self.shapes.is_empty() {
            return 0;
        }
        let shape = self.shapes[self.index % self.shapes.len()];
        self.index += 1;
        shape
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    state: GameState,
    config: GameConfig,
    provider: Box<dyn PieceProvider>,
    drop_timer: f64,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_provider(config, Box::new(RandomPieceProvider::new()))
    }

    pub fn with_provider(
        config: GameConfig,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        let board = Board::new(config.width, config.height);
        Self::with_board(config, board, provider)
    }

    /// Starts from a prepared board and spawns the first piece onto it.
    pub fn with_board(
        config: GameConfig,
        board: Board,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        let mut game = Self::assemble(config, board, provider)?;
        game.spawn_piece();
        Ok(game)
    }

    /// Starts from a prepared board with `piece` already active. The piece is
    /// not validated.
    pub fn with_piece(
        config: GameConfig,
        board: Board,
        piece: Piece,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        let mut game = Self::assemble(config, board, provider)?;
        game.state.current = Some(piece);
        Ok(game)
    }

    fn assemble(
        config: GameConfig,
        board: Board,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if (board.width(), board.height()) != (config.width, config.height) {
            return Err(ConfigError::BoardMismatch {
                width: config.width,
                height: config.height,
                board_width: board.width(),
                board_height: board.height(),
            });
        }

        Ok(Self {
            state: GameState {
                board,
                current: None,
                status: Status::Running,
            },
            drop_timer: config.drop_interval,
            config,
            provider,
            events: Vec::new(),
        })
    }

    // ------------------------------------------------------------------------
    // Frame entry point
    // ------------------------------------------------------------------------

    /// Applies `commands` in order, then advances the drop timer by
    /// `elapsed` seconds and performs at most one gravity step.
    pub fn update(&mut self, elapsed: f64, commands: &[Command]) {
        // Player input first, in arrival order
        for &command in commands {
            if self.is_game_over() {
                return;
            }
            self.apply(command);
        }
        if self.is_game_over() {
            return;
        }

        // Then gravity; negative or NaN elapsed time counts as none
        self.drop_timer -= elapsed.max(0.0);
        if self.drop_timer <= 0.0 {
            self.tick();
            self.drop_timer = self.config.drop_interval;
        }
    }

    /// Returns whether the command changed the game.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::Rotate => self.rotate(),
            Command::SoftDrop => self.soft_drop() != DropOutcome::Idle,
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn move_left(&mut self) -> bool {
        self.try_replace(|piece| piece.moved(-1, 0))
    }

    pub fn move_right(&mut self) -> bool {
        self.try_replace(|piece| piece.moved(1, 0))
    }

    pub fn rotate(&mut self) -> bool {
        self.try_replace(Piece::rotated)
    }

    /// One step down; if the step is blocked the piece locks.
    pub fn soft_drop(&mut self) -> DropOutcome {
        if self.is_game_over() || self.state.current.is_none() {
            return DropOutcome::Idle;
        }
        if self.try_replace(|piece| piece.moved(0, -1)) {
            DropOutcome::Moved
        } else {
            // Blocked below: the piece has landed
            self.lock_and_spawn();
            DropOutcome::Locked
        }
    }

    /// The gravity step issued when the drop timer expires.
    pub fn tick(&mut self) -> DropOutcome {
        self.soft_drop()
    }

    pub fn restart(&mut self) {
        // Clear the board and reset state to Running
        self.state = GameState {
            board: Board::new(self.config.width, self.config.height),
            current: None,
            status: Status::Running,
        };
        self.drop_timer = self.config.drop_interval;

        // Drop stale events and announce the restart before the new piece
        self.events.clear();
        self.events.push(GameEvent::GameRestarted);
        self.spawn_piece();
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Validates the candidate built from the active piece and adopts it only
    /// if it fits.
    fn try_replace(&mut self, candidate: impl FnOnce(&Piece) -> Piece) -> bool {
        if self.is_game_over() {
            return false;
        }
        let Some(piece) = self.state.current.as_ref() else {
            return false;
        };

        // Check the candidate before touching the active piece
        let next = candidate(piece);
        let cells = next.cells();
        if !self.state.board.is_valid_position(&cells) {
            return false;
        }

        // Commit
        let color = self.config.color_of(next.shape_index);
        self.state.current = Some(next);
        self.events.push(GameEvent::PieceMoved { cells, color });
        true
    }

    fn lock_and_spawn(&mut self) {
        let Some(piece) = self.state.current.take() else {
            return;
        };

        // Lock the piece into the board
        let cells = piece.cells();
        let color = self.config.color_of(piece.shape_index);
        self.state.board.commit(&cells, color);
        self.events.push(GameEvent::PieceLocked { cells, color });

        // Clear completed rows
        let cleared = self.state.board.clear_full_lines();
        if !cleared.is_empty() {
            self.events.push(GameEvent::LinesCleared(cleared));
        }

        // Spawn the next piece
        self.spawn_piece();
    }

    fn spawn_piece(&mut self) {
        let shape_index = self.provider.next_shape() % SHAPE_COUNT;
        let piece = Piece::spawn(
            shape_index,
            self.config.shapes[shape_index],
            self.config.width,
            self.config.height,
        );
        let cells = piece.cells();

        // Check if the new piece can be placed
        if self.state.board.is_valid_position(&cells) {
            let color = self.config.color_of(shape_index);
            self.state.current = Some(piece);
            self.events.push(GameEvent::PieceSpawned { cells, color });
        } else {
            // Board is left untouched; the game ends here
            self.state.current = None;
            self.state.status = Status::Over;
            self.events.push(GameEvent::GameOver);
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.state.current.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn is_game_over(&self) -> bool {
        self.state.status == Status::Over
    }

    /// Seconds left until the next gravity step.
    pub fn drop_timer(&self) -> f64 {
        self.drop_timer
    }

    /// Takes and clears all pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Board rows (bottom first) with the active piece overlaid.
    pub fn render_cells(&self) -> Vec<Vec<Cell>> {
        let mut rows = self.state.board.rows().to_vec();
        if let Some(piece) = &self.state.current {
            let color = self.config.color_of(piece.shape_index);
            for Position { x, y } in piece.cells() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *cell = Cell::Filled(color);
                }
            }
        }
        rows
    }
}
