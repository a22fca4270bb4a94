use alloc::vec::Vec;

use crate::*;

/// Whether the tiles at `a` and `b` can be linked by an unobstructed path.
///
/// A path exists when the cells are orthogonal neighbours, when they share a
/// row or a column with only empty cells between them, or when one is the last
/// tile of a row and the other the first tile of the next row.
pub fn can_connect(grid: &Grid, a: CellIndex, b: CellIndex) -> bool {
    if a == b {
        return false;
    }

    let (row_a, col_a) = position(a);
    let (row_b, col_b) = position(b);

    are_adjacent((row_a, col_a), (row_b, col_b))
        || (row_a == row_b && is_row_clear(grid, row_a, col_a, col_b))
        || (col_a == col_b && is_column_clear(grid, col_a, row_a, row_b))
        || wraps_row_boundary(grid, a, b)
}

/// Whether `a` and `b` hold a matching pair that can be connected.
pub fn is_removable_pair(grid: &Grid, a: CellIndex, b: CellIndex) -> bool {
    match (grid.get(a), grid.get(b)) {
        (Some(x), Some(y)) => is_valid_pair(x, y) && can_connect(grid, a, b),
        _ => false,
    }
}

const fn are_adjacent((row_a, col_a): (usize, usize), (row_b, col_b): (usize, usize)) -> bool {
    row_a.abs_diff(row_b) + col_a.abs_diff(col_b) == 1
}

fn is_row_clear(grid: &Grid, row: usize, col_a: usize, col_b: usize) -> bool {
    let (start, end) = (col_a.min(col_b), col_a.max(col_b));
    (start + 1..end).all(|col| !grid.is_occupied(index_at(row, col)))
}

fn is_column_clear(grid: &Grid, col: usize, row_a: usize, row_b: usize) -> bool {
    let (start, end) = (row_a.min(row_b), row_a.max(row_b));
    (start + 1..end).all(|row| !grid.is_occupied(index_at(row, col)))
}

fn wraps_row_boundary(grid: &Grid, a: CellIndex, b: CellIndex) -> bool {
    let (upper, lower) = (a.min(b), a.max(b));
    let upper_row = position(upper).0;
    if position(lower).0 != upper_row + 1 {
        return false;
    }

    grid.rightmost_in_row(upper_row) == Some(upper)
        && grid.leftmost_in_row(upper_row + 1) == Some(lower)
}

/// Iterates every removable pair `(a, b)` with `a < b`, in grid order.
///
/// Checks all unordered pairs of non-empty cells, so a full scan is quadratic
/// in the number of tiles.
#[derive(Debug)]
pub struct RemovablePairIter<'a> {
    grid: &'a Grid,
    occupied: Vec<CellIndex>,
    first: usize,
    second: usize,
}

impl<'a> RemovablePairIter<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            occupied: grid.occupied().map(|(index, _)| index).collect(),
            first: 0,
            second: 1,
        }
    }
}

impl Iterator for RemovablePairIter<'_> {
    type Item = (CellIndex, CellIndex);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.first >= self.occupied.len() {
                return None;
            }
            if self.second >= self.occupied.len() {
                self.first += 1;
                self.second = self.first + 1;
                continue;
            }

            let pair = (self.occupied[self.first], self.occupied[self.second]);
            self.second += 1;

            if is_removable_pair(self.grid, pair.0, pair.1) {
                return Some(pair);
            }
        }
    }
}
