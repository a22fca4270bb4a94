/// Position of a cell in the row-major grid.
pub type CellIndex = usize;

/// Points accumulated by removing pairs.
pub type Score = u32;

/// Fixed grid width.
pub const GRID_COLUMNS: usize = 9;

/// Rows a grid may grow to before the game is lost.
pub const MAX_ROWS: usize = 50;

pub const MAX_CELLS: usize = GRID_COLUMNS * MAX_ROWS;

/// `(row, col)` of `index`.
pub const fn position(index: CellIndex) -> (usize, usize) {
    (index / GRID_COLUMNS, index % GRID_COLUMNS)
}

pub const fn index_at(row: usize, col: usize) -> CellIndex {
    row * GRID_COLUMNS + col
}

/// Rows needed to lay out `len` cells.
pub const fn rows_for(len: usize) -> usize {
    len.div_ceil(GRID_COLUMNS)
}
