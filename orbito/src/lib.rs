//! Orbito engine with minimax and alpha-beta pruning.
//!
//! Orbito is a two-player abstract game on a 4x4 grid: place a ball,
//! then orbit the board (outer ring one step clockwise, inner block
//! one step counterclockwise); four aligned balls win. The engine can
//! be driven statefully through [`Game`], or statelessly: feed a move
//! history string (e.g. `W00B31W12`, orbit implied after every
//! placement) and request a move at a named difficulty. The AI plays
//! for the side whose turn is next after that history.

mod ai;
mod board;
mod game;

pub use ai::{best_move, choose_placement, evaluate, Difficulty, MoveRequest, MoveResponse};
pub use board::{Board, Cell, Player, SIDE};
pub use game::{parse_history, Game, GameError, Phase, RotationOutcome, TypedMove};
