//! The 4x4 board: cell model, the orbit permutation, and win detection.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const SIDE: usize = 4;

/// Precomputed winning lines: 4 rows, 4 columns, 2 diagonals.
static WIN_LINES: Lazy<Vec<[(usize, usize); 4]>> = Lazy::new(generate_win_lines);

/// The orbit permutation as explicit (source, destination) pairs.
/// Outer 12-cycle runs clockwise along the border, inner 4-cycle
/// counterclockwise through the central block. Every cell appears
/// exactly once on each side, so the transform is a bijection.
const ORBIT_STEPS: [((usize, usize), (usize, usize)); 16] = [
    // Left side down
    ((0, 0), (1, 0)),
    ((1, 0), (2, 0)),
    ((2, 0), (3, 0)),
    // Bottom row right
    ((3, 0), (3, 1)),
    ((3, 1), (3, 2)),
    ((3, 2), (3, 3)),
    // Right side up
    ((3, 3), (2, 3)),
    ((2, 3), (1, 3)),
    ((1, 3), (0, 3)),
    // Top row left
    ((0, 3), (0, 2)),
    ((0, 2), (0, 1)),
    ((0, 1), (0, 0)),
    // Inner block counterclockwise
    ((1, 1), (2, 1)),
    ((2, 1), (2, 2)),
    ((2, 2), (1, 2)),
    ((1, 2), (1, 1)),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    fn mark(self) -> char {
        match self {
            Player::White => 'W',
            Player::Black => 'B',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "white"),
            Player::Black => write!(f, "black"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Ball(Player),
}

/// A plain 16-cell value type; search clones it wholesale per branch.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Board {
    cells: [[Cell; SIDE]; SIDE],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [[Cell; SIDE]; SIDE]) -> Self {
        Self { cells }
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < SIDE && col < SIDE
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, player: Player) {
        self.cells[row][col] = Cell::Ball(player);
    }

    /// True iff (row, col) is on the board and holds no ball.
    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        Self::in_bounds(row, col) && self.cells[row][col] == Cell::Empty
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Cell::Empty))
    }

    /// Apply the orbit permutation, returning a fresh board.
    pub fn orbit(&self) -> Board {
        let mut next = Board::empty();
        for &((src_row, src_col), (dst_row, dst_col)) in &ORBIT_STEPS {
            next.cells[dst_row][dst_col] = self.cells[src_row][src_col];
        }
        next
    }

    /// True iff the player holds all four cells of any winning line.
    pub fn has_won(&self, player: Player) -> bool {
        WIN_LINES.iter().any(|line| {
            line.iter()
                .all(|&(row, col)| self.cells[row][col] == Cell::Ball(player))
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     0   1   2   3")?;
        writeln!(f, "   {}+", "+---".repeat(SIDE))?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{row}  ")?;
            for cell in cells {
                match cell {
                    Cell::Empty => write!(f, "|   ")?,
                    Cell::Ball(player) => write!(f, "| {} ", player.mark())?,
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "   {}+", "+---".repeat(SIDE))?;
        }
        Ok(())
    }
}

fn generate_win_lines() -> Vec<[(usize, usize); 4]> {
    let mut lines = Vec::new();
    for row in 0..SIDE {
        lines.push([(row, 0), (row, 1), (row, 2), (row, 3)]);
    }
    for col in 0..SIDE {
        lines.push([(0, col), (1, col), (2, col), (3, col)]);
    }
    lines.push([(0, 0), (1, 1), (2, 2), (3, 3)]);
    lines.push([(0, 3), (1, 2), (2, 1), (3, 0)]);
    lines
}
