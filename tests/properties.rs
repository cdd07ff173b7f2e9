//! Property tests for geometry, bounds checking, spawning and line clearing.

use proptest::prelude::*;

use blockfall::board::test_helpers::set;
use blockfall::{
    Board, Cell, ColorId, Game, GameConfig, Piece, Position, Rotation, SequencePieceProvider,
    DEFAULT_SHAPES,
};

fn rotation() -> impl Strategy<Value = Rotation> {
    (0usize..4).prop_map(Rotation::from_index)
}

proptest! {
    #[test]
    fn four_forward_turns_restore_cells(
        shape in 0usize..7,
        x in -50i32..50,
        y in -50i32..50,
        start in rotation(),
    ) {
        let mut piece = Piece::new_at(shape, DEFAULT_SHAPES[shape], Position::new(x, y));
        piece.rotation = start;
        let original = piece.cells();

        for _ in 0..4 {
            piece.rotate_forward();
        }

        prop_assert_eq!(piece.cells(), original);
    }

    #[test]
    fn backward_undoes_forward(shape in 0usize..7, start in rotation()) {
        let mut piece = Piece::new_at(shape, DEFAULT_SHAPES[shape], Position::new(4, 4));
        piece.rotation = start;
        let before = piece;

        piece.rotate_forward();
        piece.rotate_backward();

        prop_assert_eq!(piece, before);
    }

    #[test]
    fn cells_outside_the_grid_are_never_valid(
        shape in 0usize..7,
        turn in rotation(),
        x in -6i32..16,
        y in -6i32..26,
    ) {
        let board = Board::new(10, 20);
        let mut piece = Piece::new_at(shape, DEFAULT_SHAPES[shape], Position::new(x, y));
        piece.rotation = turn;
        let cells = piece.cells();

        let inside = cells
            .iter()
            .all(|c| (0..10).contains(&c.x) && (0..20).contains(&c.y));
        prop_assert_eq!(board.is_valid_position(&cells), inside);
    }

    #[test]
    fn spawn_point_depends_only_on_dimensions(
        shape in 0usize..7,
        width in 4usize..40,
        height in 2usize..40,
    ) {
        let config = GameConfig::default().with_dimensions(width, height);
        let game = Game::with_provider(config, Box::new(SequencePieceProvider::new(vec![shape])))
            .unwrap();
        let piece = game.current_piece().unwrap();

        prop_assert_eq!(piece.position, Position::new((width / 2) as i32, height as i32 - 1));
        prop_assert_eq!(piece.rotation, Rotation::R0);
    }

    #[test]
    fn consecutive_full_rows_collapse_together(
        n in 1usize..=4,
        base in 0usize..12,
        marker_x in 0i32..10,
    ) {
        let full: Vec<usize> = (base + 1..base + n + 1).collect();
        let mut board = Board::with_filled_rows(10, 20, &full);
        set(&mut board, marker_x, 0, ColorId(5));
        let above = (base + n + 1) as i32;
        set(&mut board, marker_x, above, ColorId(6));

        let cleared = board.clear_full_lines();

        prop_assert_eq!(cleared, full);
        prop_assert_eq!(board.cell(marker_x, 0), Some(Cell::Filled(ColorId(5))));
        prop_assert_eq!(
            board.cell(marker_x, above - n as i32),
            Some(Cell::Filled(ColorId(6)))
        );
        prop_assert_eq!(board.total_filled_cells(), 2);
    }
}
