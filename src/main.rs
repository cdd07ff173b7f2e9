use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};

use blockfall::{
    Cell, ColorId, Command, Game, GameConfig, GameEvent, RandomPieceProvider,
    DEFAULT_DROP_INTERVAL, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

// ============================================================================
// Arguments
// ============================================================================

// Keeps the board panel within a terminal's u16 coordinates.
const MIN_SIDE: i64 = 4;
const MAX_SIDE: i64 = 100;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board width in cells
    #[arg(
        long,
        default_value_t = DEFAULT_WIDTH as u16,
        value_parser = clap::value_parser!(u16).range(MIN_SIDE..=MAX_SIDE),
    )]
    width: u16,
    /// Board height in cells
    #[arg(
        long,
        default_value_t = DEFAULT_HEIGHT as u16,
        value_parser = clap::value_parser!(u16).range(MIN_SIDE..=MAX_SIDE),
    )]
    height: u16,
    /// Seconds between gravity steps
    #[arg(long, default_value_t = DEFAULT_DROP_INTERVAL)]
    drop_interval: f64,
    /// Seed for shape selection; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = " ·";
const FRAME: Duration = Duration::from_millis(16);

// Shape order: I, O, T, S, Z, J, L.
fn palette(color: ColorId) -> Color {
    match color.0 {
        0 => Color::Cyan,
        1 => Color::Yellow,
        2 => Color::Magenta,
        3 => Color::Green,
        4 => Color::Red,
        5 => Color::Rgb(255, 128, 0),
        6 => Color::Blue,
        _ => Color::White,
    }
}

// ============================================================================
// Presentation State
// ============================================================================

/// What the host remembers from the core's notifications.
#[derive(Default)]
struct Hud {
    lines: usize,
    pieces: usize,
    last_clear: Option<Vec<usize>>,
    game_over: bool,
}

impl Hud {
    fn observe(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::PieceLocked { .. } => self.pieces += 1,
                GameEvent::LinesCleared(rows) => {
                    self.lines += rows.len();
                    self.last_clear = Some(rows);
                }
                GameEvent::GameOver => self.game_over = true,
                GameEvent::GameRestarted => *self = Hud::default(),
                GameEvent::PieceSpawned { .. } | GameEvent::PieceMoved { .. } => {}
            }
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game, hud: &Hud) {
    let area = frame.size();
    let board = game.board();

    // Dimensions are bounded by the argument parser; saturate anyway.
    let cells_wide = u16::try_from(board.width()).unwrap_or(u16::MAX);
    let cells_high = u16::try_from(board.height()).unwrap_or(u16::MAX);
    let board_width = cells_wide.saturating_mul(CELL_WIDTH).saturating_add(2);
    let board_height = cells_high.saturating_add(2);
    let side_width = 24;
    let main_area = centered_rect(board_width.saturating_add(side_width), board_height, area);

    // Layout: [Board][Status]
    let horizontal = Layout::horizontal([
        Constraint::Length(board_width),
        Constraint::Length(side_width),
    ])
    .split(main_area);

    render_board(frame, game, horizontal[0]);
    render_side(frame, hud, horizontal[1]);
}

fn render_board(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Row 0 is the bottom of the board, so draw from the top row down.
    let lines: Vec<Line> = game
        .render_cells()
        .iter()
        .rev()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::styled(EMPTY_CHAR, Style::default().fg(Color::DarkGray)),
                    Cell::Filled(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(palette(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_side(frame: &mut Frame, hud: &Hud, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Status ")
        .title_alignment(Alignment::Center);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(hud.lines.to_string()),
        Line::from(""),
        Line::from(Span::styled("Pieces", Style::default().fg(Color::Green))),
        Line::from(hud.pieces.to_string()),
        Line::from(""),
    ];

    if let Some(rows) = &hud.last_clear {
        let rows: Vec<String> = rows.iter().map(usize::to_string).collect();
        lines.push(Line::from(format!("Cleared: {}", rows.join(","))));
        lines.push(Line::from(""));
    }

    if hud.game_over {
        lines.push(Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    for hint in ["←/a →/d: Move", "↓/s: Drop", "↑/w: Rotate", "r: Restart", "q/Esc: Quit"] {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

enum Input {
    Game(Command),
    Restart,
    Quit,
}

fn map_key(code: KeyCode) -> Option<Input> {
    let input = match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Input::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Restart,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Input::Game(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Input::Game(Command::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Input::Game(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Input::Game(Command::Rotate),
        _ => return None,
    };
    Some(input)
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    // Build the game
    let config = GameConfig::default()
        .with_dimensions(usize::from(args.width), usize::from(args.height))
        .with_drop_interval(args.drop_interval);
    let provider = match args.seed {
        Some(seed) => RandomPieceProvider::seeded(seed),
        None => RandomPieceProvider::new(),
    };
    let game = Game::with_provider(config, Box::new(provider)).context("invalid game settings")?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, game);

    // Always try to restore the terminal, even if the loop failed.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut game: Game) -> Result<()> {
    let mut hud = Hud::default();
    hud.observe(game.take_events());
    let mut last_frame = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| render(frame, &game, &hud))?;

        // Queue this frame's key presses; quit and restart act immediately
        let mut commands = Vec::new();
        let deadline = last_frame + FRAME;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match map_key(key.code) {
                Some(Input::Quit) => return Ok(()),
                Some(Input::Restart) => {
                    game.restart();
                    commands.clear();
                }
                Some(Input::Game(command)) => commands.push(command),
                None => {}
            }
        }

        // Commands first, then gravity, in one step
        let elapsed = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        game.update(elapsed, &commands);
        hud.observe(game.take_events());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let args = Args::try_parse_from(["blockfall"]).unwrap();
        assert_eq!(usize::from(args.width), DEFAULT_WIDTH);
        assert_eq!(usize::from(args.height), DEFAULT_HEIGHT);
        assert_eq!(args.drop_interval, DEFAULT_DROP_INTERVAL);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn oversized_board_is_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["blockfall", "--width", "40000"]).is_err());
        assert!(Args::try_parse_from(["blockfall", "--height", "101"]).is_err());
        assert!(Args::try_parse_from(["blockfall", "--width", "3"]).is_err());
    }

    #[test]
    fn largest_board_fits_the_panel_arithmetic() {
        let args = Args::try_parse_from(["blockfall", "--width", "100", "--height", "100"]).unwrap();
        let width = args.width.saturating_mul(CELL_WIDTH).saturating_add(2);
        assert_eq!(width, 202);
    }
}
