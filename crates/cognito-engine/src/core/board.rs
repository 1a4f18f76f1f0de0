use std::fmt;

use super::piece::{Piece, PieceMask};

/// Number of rows of the host's board.
pub const DEFAULT_ROWS: usize = 19;
/// Number of columns of the host's board.
pub const DEFAULT_COLS: usize = 15;

/// Error returned when an occupancy matrix cannot be turned into a [`Board`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardShapeError {
    #[display("board has no rows or no columns")]
    Empty,
    #[display("row {row} has {actual} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Rectangular grid of cells; `0` is empty, any other value is filled.
///
/// Filled cells keep the value they were stamped with (the host uses it as a
/// color index), but every game rule only looks at empty vs. filled.
///
/// Row 0 is the top of the board. Cells outside the grid are treated as
/// colliding by [`Board::is_colliding`]; there is no sentinel border.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{}", self.rows, self.cols)?;
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|&c| if c == 0 { '.' } else { '#' })
                .collect();
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Builds a board from a row-major occupancy matrix.
    pub fn from_grid<R>(grid: &[R]) -> Result<Self, BoardShapeError>
    where
        R: AsRef<[u8]>,
    {
        let cols = grid.first().map_or(0, |row| row.as_ref().len());
        if grid.is_empty() || cols == 0 {
            return Err(BoardShapeError::Empty);
        }
        let mut cells = Vec::with_capacity(grid.len() * cols);
        for (row, values) in grid.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(BoardShapeError::Ragged {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self {
            rows: grid.len(),
            cols,
            cells,
        })
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `'#'` is a filled cell, `'.'` is an empty cell; other characters are
    /// ignored. Blank lines are skipped. The art describes the bottom rows of a
    /// board of `rows` rows: the last line of art is the bottom row.
    ///
    /// # Panics
    ///
    /// Panics if the art has more lines than `rows` or lines of unequal width.
    #[must_use]
    pub fn from_ascii(rows: usize, art: &str) -> Self {
        let lines: Vec<Vec<u8>> = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.chars()
                    .filter_map(|c| match c {
                        '#' => Some(1),
                        '.' => Some(0),
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        assert!(lines.len() <= rows, "art has more than {rows} rows");
        let cols = lines.first().map_or(0, Vec::len);
        let mut board = Self::new(rows, cols);
        let offset = rows - lines.len();
        for (y, line) in lines.iter().enumerate() {
            assert_eq!(line.len(), cols, "art row {y} has a different width");
            board.row_mut(offset + y).copy_from_slice(line);
        }
        board
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Returns the raw value stored at `(row, col)`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.cols + col]
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) != 0
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row * self.cols + col] = value;
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.cols..][..self.cols]
    }

    fn row_mut(&mut self, row: usize) -> &mut [u8] {
        &mut self.cells[row * self.cols..][..self.cols]
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + '_ {
        self.cells.chunks_exact(self.cols)
    }

    /// Returns the board as a row-major matrix.
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Converts signed coordinates to an index, or `None` when out of bounds.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let col = usize::try_from(x).ok().filter(|&c| c < self.cols)?;
        let row = usize::try_from(y).ok().filter(|&r| r < self.rows)?;
        Some(row * self.cols + col)
    }

    /// Checks whether `mask` anchored at `(x, y)` leaves the board or overlaps a filled cell.
    #[must_use]
    pub fn is_colliding(&self, mask: PieceMask, x: i32, y: i32) -> bool {
        mask.offsets()
            .any(|(dx, dy)| self.is_blocked(x + dx, y + dy))
    }

    /// Outside the board or filled.
    fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_none_or(|i| self.cells[i] != 0)
    }

    #[must_use]
    pub fn is_piece_colliding(&self, piece: Piece) -> bool {
        self.is_colliding(piece.mask(), piece.x(), piece.y())
    }

    /// Stamps `mask` at `(x, y)` with `value`; cells outside the board are skipped.
    pub fn fill_mask(&mut self, mask: PieceMask, x: i32, y: i32, value: u8) {
        for (dx, dy) in mask.offsets() {
            if let Some(i) = self.index(x + dx, y + dy) {
                self.cells[i] = value;
            }
        }
    }

    pub fn fill_piece(&mut self, piece: Piece, value: u8) {
        self.fill_mask(piece.mask(), piece.x(), piece.y(), value);
    }

    /// Empties the given `(row, col)` cells, ignoring positions outside the board.
    pub fn clear_cells<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        for (row, col) in cells {
            if let Some(i) = self.index(col, row) {
                self.cells[i] = 0;
            }
        }
    }

    /// Returns a copy of this board with the given `(row, col)` cells emptied.
    #[must_use]
    pub fn without_cells<I>(&self, cells: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut board = self.clone();
        board.clear_cells(cells);
        board
    }

    /// Removes every completely filled row and returns how many were removed.
    ///
    /// Surviving rows keep their relative order and slide down; vacated rows
    /// at the top become empty, so the row count never changes.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.rows).rev() {
            if self.row(y).iter().all(|&c| c != 0) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.cells
                    .copy_within(y * self.cols..(y + 1) * self.cols, (y + count) * self.cols);
            }
        }
        self.cells[..count * self.cols].fill(0);
        count
    }

    /// Stamps `mask` at `(x, y)` on a copy of this board and clears full rows.
    ///
    /// Returns the number of cleared rows and the resulting board.
    #[must_use]
    pub fn place_and_clear(&self, mask: PieceMask, x: i32, y: i32) -> (usize, Board) {
        let mut board = self.clone();
        board.fill_mask(mask, x, y, 1);
        let cleared = board.clear_lines();
        (cleared, board)
    }

    /// Hard-drop landing row of `mask` at column `x`, descending from row 0.
    ///
    /// Returns `None` when the mask already collides at row 0.
    #[must_use]
    pub fn drop_y(&self, mask: PieceMask, x: i32) -> Option<i32> {
        if self.is_colliding(mask, x, 0) {
            return None;
        }
        let mut y = 0;
        while !self.is_colliding(mask, x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Number of rows `piece` can still fall before it would collide.
    #[must_use]
    pub fn fall_distance(&self, piece: Piece) -> i32 {
        let mut rows = 0;
        while !self.is_colliding(piece.mask(), piece.x(), piece.y() + rows + 1) {
            rows += 1;
        }
        rows
    }
}
