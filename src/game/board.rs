use std::fmt;

use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const WINDOW_LENGTH: usize = 4;

/// Scan directions as (row step, column step): right, up, up-right, down-right.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Human,
    Ai,
}

impl Cell {
    /// The piece belonging to the other side. `Empty` maps to itself.
    pub fn opponent(self) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Human => Cell::Ai,
            Cell::Ai => Cell::Human,
        }
    }
}

/// A 6x7 grid. Row 0 is the bottom row, so pieces stack upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// True if `col` is on the board and its top cell is still empty.
    pub fn is_valid_column(&self, col: usize) -> bool {
        col < COLS && self.cells[ROWS - 1][col] == Cell::Empty
    }

    /// Lowest empty row in `col`, or `None` when the column is full or out of range.
    pub fn next_open_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Set a cell. Callers are responsible for picking `next_open_row`.
    pub fn drop_piece(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Validate `col` and drop `cell` into it, returning the row where it landed.
    pub fn apply_move(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if !self.is_valid_column(col) {
            return Err(MoveError::InvalidColumn(col));
        }
        let row = self
            .next_open_row(col)
            .ok_or(MoveError::InvalidColumn(col))?;
        self.drop_piece(row, col, cell);
        Ok(row)
    }

    /// Columns that still accept a piece, in ascending order.
    pub fn valid_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_valid_column(col)).collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| !self.is_valid_column(col))
    }

    /// Number of non-empty cells.
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Every run of four cells along a row, a column or either diagonal.
    pub fn windows(&self) -> impl Iterator<Item = [Cell; WINDOW_LENGTH]> + '_ {
        DIRECTIONS.iter().flat_map(move |&(dr, dc)| {
            (0..ROWS).flat_map(move |row| {
                (0..COLS).filter_map(move |col| self.window_at(row, col, dr, dc))
            })
        })
    }

    fn window_at(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<[Cell; WINDOW_LENGTH]> {
        let span = (WINDOW_LENGTH - 1) as isize;
        let end_row = row as isize + dr * span;
        let end_col = col as isize + dc * span;
        if end_row < 0 || end_row >= ROWS as isize || end_col < 0 || end_col >= COLS as isize {
            return None;
        }

        let mut window = [Cell::Empty; WINDOW_LENGTH];
        for (i, slot) in window.iter_mut().enumerate() {
            let r = (row as isize + dr * i as isize) as usize;
            let c = (col as isize + dc * i as isize) as usize;
            *slot = self.cells[r][c];
        }
        Some(window)
    }

    /// True if `cell` has four in a row anywhere on the board.
    pub fn check_win(&self, cell: Cell) -> bool {
        if cell == Cell::Empty {
            return false;
        }
        self.windows()
            .any(|window| window.iter().all(|&c| c == cell))
    }

    /// Either side has won, or no column is left to play.
    pub fn is_terminal(&self) -> bool {
        self.check_win(Cell::Human) || self.check_win(Cell::Ai) || self.is_full()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Rows are printed top to bottom, followed by 1-based column numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let symbol = match self.cells[row][col] {
                    Cell::Empty => " . ",
                    Cell::Human => " X ",
                    Cell::Ai => " O ",
                };
                f.write_str(symbol)?;
            }
            writeln!(f)?;
        }
        for col in 0..COLS {
            write!(f, " {} ", col + 1)?;
        }
        Ok(())
    }
}
