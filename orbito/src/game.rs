//! The authoritative state machine: placement, rotation, turn order.
//!
//! A turn is two explicit steps. The current player places a ball on an
//! empty cell, then triggers the orbit; the engine never couples the two.
//! Callers that want to replay a whole game feed a move history string
//! (e.g. `W00B31W12`), with the orbit applied after every placement.

use std::fmt;

use thiserror::Error;

use crate::board::{Board, Cell, Player, SIDE};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    AwaitingPlacement,
    AwaitingRotation,
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingPlacement => write!(f, "awaiting placement"),
            Phase::AwaitingRotation => write!(f, "awaiting rotation"),
            Phase::Terminal => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid move string at position {position}: {reason}")]
    ParseMove { position: usize, reason: String },
    #[error("coordinates ({row}, {col}) are out of bounds")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },
    #[error("operation not allowed while {phase}")]
    WrongPhase { phase: Phase },
    #[error("expected a move by {expected}, history has {found}")]
    OutOfTurn { expected: Player, found: Player },
    #[error("the game is already over")]
    GameOver,
    #[error("no legal moves remain")]
    NoMoves,
    #[error("unrecognized difficulty {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

/// Result of one orbit. Both flags set at once is a draw: the source
/// rules treat a simultaneous double alignment as no one's win.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RotationOutcome {
    pub white_won: bool,
    pub black_won: bool,
}

impl RotationOutcome {
    pub fn is_over(self) -> bool {
        self.white_won || self.black_won
    }

    pub fn winner(self) -> Option<Player> {
        match (self.white_won, self.black_won) {
            (true, false) => Some(Player::White),
            (false, true) => Some(Player::Black),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        self.white_won && self.black_won
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    board: Board,
    current: Player,
    phase: Phase,
}

impl Game {
    /// Empty board, white to move.
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            current: Player::White,
            phase: Phase::AwaitingPlacement,
        }
    }

    /// Replay a history, applying the orbit after every placement.
    /// The replayed game may legitimately end in a win or draw on the
    /// last move; anything after that is an error.
    pub fn from_history(moves: &[TypedMove]) -> Result<Self, GameError> {
        let mut game = Game::new();
        for mv in moves {
            if game.phase == Phase::Terminal {
                return Err(GameError::GameOver);
            }
            if mv.player != game.current {
                return Err(GameError::OutOfTurn {
                    expected: game.current,
                    found: mv.player,
                });
            }
            game.place(mv.row, mv.col)?;
            game.rotate()?;
        }
        Ok(game)
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// In bounds and empty, regardless of turn or phase.
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        self.board.is_empty_cell(row, col)
    }

    pub fn is_board_full(&self) -> bool {
        self.board.is_full()
    }

    /// Place a ball for the current player. Rejected operations leave
    /// the game untouched.
    pub fn place(&mut self, row: usize, col: usize) -> Result<(), GameError> {
        if self.phase != Phase::AwaitingPlacement {
            return Err(GameError::WrongPhase { phase: self.phase });
        }
        if !Board::in_bounds(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        if self.board.cell(row, col) != Cell::Empty {
            return Err(GameError::CellOccupied { row, col });
        }
        self.board.set(row, col, self.current);
        self.phase = Phase::AwaitingRotation;
        Ok(())
    }

    /// Apply the orbit and settle the turn: a winner (or double winner)
    /// freezes the game, otherwise the other player is up.
    pub fn rotate(&mut self) -> Result<RotationOutcome, GameError> {
        if self.phase != Phase::AwaitingRotation {
            return Err(GameError::WrongPhase { phase: self.phase });
        }
        self.board = self.board.orbit();
        let outcome = RotationOutcome {
            white_won: self.board.has_won(Player::White),
            black_won: self.board.has_won(Player::Black),
        };
        if outcome.is_over() {
            // Board and player stay put for display.
            self.phase = Phase::Terminal;
        } else {
            self.current = self.current.opponent();
            self.phase = Phase::AwaitingPlacement;
        }
        Ok(outcome)
    }

    pub fn reset(&mut self) {
        *self = Game::new();
    }

    #[cfg(test)]
    pub(crate) fn from_parts(board: Board, current: Player, phase: Phase) -> Self {
        Self {
            board,
            current,
            phase,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypedMove {
    pub player: Player,
    pub row: usize,
    pub col: usize,
}

pub fn parse_history(history: &str) -> Result<Vec<TypedMove>, GameError> {
    if history.trim().is_empty() {
        return Ok(Vec::new());
    }
    let chars: Vec<char> = history.chars().collect();
    let mut moves = Vec::new();
    let mut idx = 0;
    while idx < chars.len() {
        let color = chars[idx];
        let player = match color {
            'W' | 'w' => Player::White,
            'B' | 'b' => Player::Black,
            _ => {
                return Err(GameError::ParseMove {
                    position: idx,
                    reason: format!("expected W or B, found {color}"),
                })
            }
        };
        let row = read_coordinate(&chars, idx + 1, "row")?;
        let col = read_coordinate(&chars, idx + 2, "column")?;
        moves.push(TypedMove { player, row, col });
        idx += 3;
    }
    Ok(moves)
}

fn read_coordinate(chars: &[char], idx: usize, what: &str) -> Result<usize, GameError> {
    let Some(&ch) = chars.get(idx) else {
        return Err(GameError::ParseMove {
            position: idx,
            reason: format!("missing {what} digit"),
        });
    };
    let Some(digit) = ch.to_digit(10) else {
        return Err(GameError::ParseMove {
            position: idx,
            reason: format!("expected {what} digit, found {ch}"),
        });
    };
    let value = digit as usize;
    if value >= SIDE {
        return Err(GameError::ParseMove {
            position: idx,
            reason: format!("{what} must be 0-{}", SIDE - 1),
        });
    }
    Ok(value)
}
