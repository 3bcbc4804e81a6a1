use std::{
    fmt::{self, Write},
    str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("board size must be at least 1")]
pub struct InvalidBoardSize;

#[derive(Debug, Error)]
#[error("unknown direction {0:?}, expected one of l, r, u, d")]
pub struct ParseDirectionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    fn letter(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Up => 'u',
            Direction::Down => 'd',
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l" | "L" => Ok(Direction::Left),
            "r" | "R" => Ok(Direction::Right),
            "u" | "U" => Ok(Direction::Up),
            "d" | "D" => Ok(Direction::Down),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.letter())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<u64>,
}

impl Board {
    /// Creates an all-empty `size` by `size` board.
    ///
    /// # Errors
    /// Returns an `InvalidBoardSize` error if `size` is zero.
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        if size == 0 {
            return Err(InvalidBoardSize);
        }

        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    pub fn from_rows<const N: usize>(rows: [[u64; N]; N]) -> Result<Self, InvalidBoardSize> {
        let mut board = Self::new(N)?;

        for (row, cells) in rows.into_iter().enumerate() {
            for (col, cell) in cells.into_iter().enumerate() {
                board.set(row, col, cell);
            }
        }

        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat row-major view of the grid.
    pub fn values(&self) -> &[u64] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        debug_assert!(row < self.size && col < self.size);
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u64) {
        debug_assert!(row < self.size && col < self.size);
        debug_assert!(value == 0 || value >= 2 && value.is_power_of_two());
        self.cells[row * self.size + col] = value;
    }

    pub fn set_flat(&mut self, index: usize, value: u64) {
        debug_assert!(index < self.cells.len());
        debug_assert!(value == 0 || value >= 2 && value.is_power_of_two());
        self.cells[index] = value;
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 0).count()
    }

    /// Flat indices of all empty cells, recomputed on every call.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &cell)| (cell == 0).then_some(i))
            .collect()
    }

    pub fn score(&self) -> u64 {
        self.cells.iter().sum()
    }

    pub fn max_tile(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// True iff no move of any direction could change the board: every cell
    /// is occupied and no two adjacent cells hold equal values.
    pub fn is_terminal(&self) -> bool {
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = self.get(row, col);

                if cell == 0 {
                    return false;
                }

                if col + 1 < self.size && self.get(row, col + 1) == cell {
                    return false;
                }

                if row + 1 < self.size && self.get(row + 1, col) == cell {
                    return false;
                }
            }
        }

        true
    }

    /// Packs every lane of the board toward the `direction` edge and reports
    /// whether any cell changed. Pure transformation: no spawning, no
    /// counting.
    pub fn shift(&mut self, direction: Direction) -> bool {
        let mut scratch = vec![0; self.size];
        let mut changed = false;

        for lane in 0..self.size {
            for offset in 0..self.size {
                scratch[offset] = self.cells[self.lane_index(direction, lane, offset)];
            }

            // Writeback only for lanes that moved.
            if crate::pack_lane(&mut scratch) {
                changed = true;

                for offset in 0..self.size {
                    let index = self.lane_index(direction, lane, offset);
                    self.cells[index] = scratch[offset];
                }
            }
        }

        changed
    }

    // Maps an oriented (lane, offset) pair to a flat row-major index. Offset 0
    // is the edge the lane packs toward.
    fn lane_index(&self, direction: Direction, lane: usize, offset: usize) -> usize {
        debug_assert!(lane < self.size && offset < self.size);
        let last = self.size - 1;

        let (row, col) = match direction {
            Direction::Left => (lane, offset),
            Direction::Right => (lane, last - offset),
            Direction::Up => (offset, lane),
            Direction::Down => (last - offset, lane),
        };

        row * self.size + col
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = self.cells.chunks(self.size);

        if let Some(row) = rows.next() {
            row.iter().try_for_each(|cell| write!(f, "{cell:6}"))?
        }

        for row in rows {
            f.write_char('\n')?;
            row.iter().try_for_each(|cell| write!(f, "{cell:6}"))?
        }

        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cell width grows with the board so larger grids fit larger tiles.
        let width = self.size.max(4);

        let mut border = String::with_capacity((width + 3) * self.size + 1);
        border.push(':');
        for _ in 0..self.size {
            for _ in 0..width + 2 {
                border.push('-');
            }
            border.push(':');
        }

        f.write_str(&border)?;

        for row in self.cells.chunks(self.size) {
            f.write_char('\n')?;
            f.write_char(':')?;

            for &cell in row {
                if cell == 0 {
                    write!(f, " {:width$} :", "")?;
                } else {
                    write!(f, " {cell:>width$} :")?;
                }
            }

            f.write_char('\n')?;
            f.write_str(&border)?;
        }

        Ok(())
    }
}

pub mod test_utils {
    use rand::seq::{IndexedRandom as _, SliceRandom};

    use super::Board;

    const TILES: [u64; 10] = [2, 4, 8, 16, 32, 64, 128, 256, 512, 1024];

    pub fn random_board(size: usize, filled: usize) -> Board {
        let mut rng = rand::rng();
        let mut board = Board::new(size).unwrap();

        let mut positions: Vec<usize> = (0..size * size).collect();
        positions.shuffle(&mut rng);

        for &index in positions.iter().take(filled) {
            board.set_flat(index, *TILES.choose(&mut rng).unwrap());
        }

        board
    }

    pub fn mirrored(board: &Board) -> Board {
        let size = board.size();
        let mut out = Board::new(size).unwrap();

        for row in 0..size {
            for col in 0..size {
                out.set(row, col, board.get(row, size - 1 - col));
            }
        }

        out
    }

    pub fn transposed(board: &Board) -> Board {
        let size = board.size();
        let mut out = Board::new(size).unwrap();

        for row in 0..size {
            for col in 0..size {
                out.set(row, col, board.get(col, row));
            }
        }

        out
    }
}
