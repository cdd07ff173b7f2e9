use crate::config::ColorId;
use crate::error::PlacementError;
use crate::geometry::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ColorId),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Fixed-size occupancy grid. Row 0 is the bottom row.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    /// Empty board with every row listed in `rows` completely filled.
    pub fn with_filled_rows(width: usize, height: usize, rows: &[usize]) -> Self {
        let mut board = Self::new(width, height);
        for &y in rows {
            test_helpers::fill_row(&mut board, y);
        }
        board
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from bottom to top.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.rows.get(y).map(Vec::as_slice)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = self.index(x, y)?;
        Some(self.rows[y][x])
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(Cell::is_filled)
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    /// Reports the first cell that makes the placement illegal.
    pub fn check_position(&self, cells: &[Position]) -> Result<(), PlacementError> {
        for &Position { x, y } in cells {
            match self.cell(x, y) {
                None => return Err(PlacementError::OutOfBounds { x, y }),
                Some(Cell::Filled(_)) => return Err(PlacementError::Collision { x, y }),
                Some(Cell::Empty) => {}
            }
        }
        Ok(())
    }

    pub fn is_valid_position(&self, cells: &[Position]) -> bool {
        self.check_position(cells).is_ok()
    }

    /// Marks `cells` occupied. Callers validate first; cells off the board
    /// are skipped.
    pub fn commit(&mut self, cells: &[Position], color: ColorId) {
        for &Position { x, y } in cells {
            if let Some((x, y)) = self.index(x, y) {
                self.rows[y][x] = Cell::Filled(color);
            }
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    pub fn clear_row(&mut self, y: usize) {
        if let Some(row) = self.rows.get_mut(y) {
            row.fill(Cell::Empty);
        }
    }

    /// Moves every row above `y` down by one, overwriting row `y` and leaving
    /// the top row empty.
    pub fn collapse_above(&mut self, y: usize) {
        if y >= self.height {
            return;
        }
        self.rows.remove(y);
        self.rows.push(vec![Cell::Empty; self.width]);
    }

    /// Removes every full row and compacts the board. Returns the indices the
    /// removed rows had before the call, ascending.
    pub fn clear_full_lines(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();
        let mut y = 0;

        while y < self.height {
            if self.is_row_full(y) {
                cleared.push(y + cleared.len());
                self.clear_row(y);
                self.collapse_above(y);
                // Same index again: the row above has just moved into it.
            } else {
                y += 1;
            }
        }

        cleared
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows
            .get(y)
            .map_or(0, |row| row.iter().filter(|cell| cell.is_filled()).count())
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_filled()).count()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub const FILL: ColorId = ColorId(0);

    pub fn fill_row(board: &mut Board, y: usize) {
        let cells: Vec<Position> = (0..board.width())
            .map(|x| Position::new(x as i32, y as i32))
            .collect();
        board.commit(&cells, FILL);
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        let cells: Vec<Position> = (0..board.width())
            .filter(|&x| x != gap_x)
            .map(|x| Position::new(x as i32, y as i32))
            .collect();
        board.commit(&cells, FILL);
    }

    pub fn set(board: &mut Board, x: i32, y: i32, color: ColorId) {
        board.commit(&[Position::new(x, y)], color);
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn check_position_names_the_offending_cell() {
        let mut board = Board::new(4, 4);
        set(&mut board, 1, 1, ColorId(3));

        assert_eq!(board.check_position(&[p(0, 0), p(1, 0)]), Ok(()));
        assert_eq!(
            board.check_position(&[p(0, 0), p(-1, 0)]),
            Err(PlacementError::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(
            board.check_position(&[p(0, 4)]),
            Err(PlacementError::OutOfBounds { x: 0, y: 4 })
        );
        assert_eq!(
            board.check_position(&[p(1, 1)]),
            Err(PlacementError::Collision { x: 1, y: 1 })
        );
    }

    #[test]
    fn commit_stores_color() {
        let mut board = Board::new(4, 4);
        board.commit(&[p(0, 0), p(3, 3)], ColorId(5));
        assert_eq!(board.cell(0, 0), Some(Cell::Filled(ColorId(5))));
        assert_eq!(board.cell(3, 3), Some(Cell::Filled(ColorId(5))));
        assert_eq!(board.total_filled_cells(), 2);
    }

    #[test]
    fn collapse_above_shifts_rows_and_empties_top() {
        let mut board = Board::new(3, 4);
        set(&mut board, 0, 2, ColorId(1));
        set(&mut board, 2, 3, ColorId(2));
        set(&mut board, 1, 0, ColorId(4));

        board.clear_row(1);
        board.collapse_above(1);

        assert_eq!(board.cell(1, 0), Some(Cell::Filled(ColorId(4))));
        assert_eq!(board.cell(0, 1), Some(Cell::Filled(ColorId(1))));
        assert_eq!(board.cell(2, 2), Some(Cell::Filled(ColorId(2))));
        assert_eq!(board.filled_count_in_row(3), 0);
    }

    #[test]
    fn consecutive_full_rows_are_all_cleared() {
        let mut board = Board::new(4, 6);
        fill_row(&mut board, 0);
        fill_row(&mut board, 1);
        set(&mut board, 2, 2, ColorId(6));

        let cleared = board.clear_full_lines();

        assert_eq!(cleared, vec![0, 1]);
        assert_eq!(board.cell(2, 0), Some(Cell::Filled(ColorId(6))));
        assert_eq!(board.total_filled_cells(), 1);
    }

    #[test]
    fn with_filled_rows_fills_only_the_listed_rows() {
        let board = Board::with_filled_rows(4, 6, &[0, 2, 9]);

        assert!(board.is_row_full(0));
        assert!(!board.is_row_full(1));
        assert!(board.is_row_full(2));
        // Rows past the top are ignored.
        assert_eq!(board.total_filled_cells(), 8);
    }

    #[test]
    fn reported_indices_refer_to_the_board_before_clearing() {
        let mut board = Board::new(3, 8);
        fill_row(&mut board, 1);
        fill_row(&mut board, 2);
        fill_row_with_gap(&mut board, 3, 0);
        fill_row(&mut board, 5);

        assert_eq!(board.clear_full_lines(), vec![1, 2, 5]);
        assert_eq!(board.filled_count_in_row(1), 2);
        assert_eq!(board.total_filled_cells(), 2);
    }
}
