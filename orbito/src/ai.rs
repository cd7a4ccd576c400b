//! Minimax opponent with alpha-beta pruning.
//!
//! The search explores placements only: the orbit is deterministic and
//! mandatory, so each simulated ply places a ball for the mover on a
//! copied board and immediately rotates it before recursing. Boards are
//! plain 16-cell values, so copy-per-branch is a trivial `Copy`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Player, SIDE};
use crate::game::{parse_history, Game, GameError, Phase};

const WIN_SCORE: i32 = 1000;
const RUN3_WEIGHT: i32 = 50;
const RUN2_WEIGHT: i32 = 10;
const CENTER_WEIGHT: i32 = 5;

const CENTER: [(usize, usize); 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];

/// Search depth presets. Plain lookup, validated at parse time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn depth(self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub position: String,
    pub level: Difficulty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub row: usize,
    pub col: usize,
}

/// Rebuild the game from a history string and pick a placement for the
/// side to move. A finished game or a full board is an error.
pub fn best_move(request: MoveRequest) -> Result<MoveResponse, GameError> {
    let moves = parse_history(&request.position)?;
    let game = Game::from_history(&moves)?;
    if game.phase() == Phase::Terminal {
        return Err(GameError::GameOver);
    }
    let (row, col) = choose_placement(&game, request.level).ok_or(GameError::NoMoves)?;
    Ok(MoveResponse { row, col })
}

/// Best placement for the current player, or `None` if the board is
/// full. Ties keep the first candidate in row-major order, so repeated
/// calls on the same position return the same cell.
pub fn choose_placement(game: &Game, difficulty: Difficulty) -> Option<(usize, usize)> {
    let ai = game.current_player();
    let board = game.board();
    let depth = difficulty.depth();
    let mut best = None;
    let mut best_score = i32::MIN;
    for row in 0..SIDE {
        for col in 0..SIDE {
            if board.cell(row, col) != Cell::Empty {
                continue;
            }
            let child = place_and_orbit(&board, row, col, ai);
            let score = minimax(&child, depth, false, i32::MIN / 2, i32::MAX / 2, ai);
            if score > best_score {
                best_score = score;
                best = Some((row, col));
            }
        }
    }
    best
}

fn place_and_orbit(board: &Board, row: usize, col: usize, mover: Player) -> Board {
    let mut child = *board;
    child.set(row, col, mover);
    child.orbit()
}

fn minimax(
    board: &Board,
    depth: usize,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    ai: Player,
) -> i32 {
    if depth == 0
        || board.has_won(Player::White)
        || board.has_won(Player::Black)
        || board.is_full()
    {
        return evaluate(board, ai);
    }
    let mover = if maximizing { ai } else { ai.opponent() };
    let mut best = if maximizing { i32::MIN / 2 } else { i32::MAX / 2 };
    'rows: for row in 0..SIDE {
        for col in 0..SIDE {
            if board.cell(row, col) != Cell::Empty {
                continue;
            }
            let child = place_and_orbit(board, row, col, mover);
            let score = minimax(&child, depth - 1, !maximizing, alpha, beta, ai);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break 'rows;
            }
        }
    }
    best
}

/// Heuristic desirability of `board` for `player`. A decided board is
/// worth exactly ±1000, dominating every heuristic term.
pub fn evaluate(board: &Board, player: Player) -> i32 {
    let opponent = player.opponent();
    if board.has_won(player) {
        return WIN_SCORE;
    }
    if board.has_won(opponent) {
        return -WIN_SCORE;
    }

    let mut score = 0;
    score += count_runs(board, player, 3) * RUN3_WEIGHT;
    score += count_runs(board, player, 2) * RUN2_WEIGHT;
    score -= count_runs(board, opponent, 3) * RUN3_WEIGHT;
    score -= count_runs(board, opponent, 2) * RUN2_WEIGHT;

    for &(row, col) in &CENTER {
        match board.cell(row, col) {
            Cell::Ball(p) if p == player => score += CENTER_WEIGHT,
            Cell::Ball(_) => score -= CENTER_WEIGHT,
            Cell::Empty => {}
        }
    }
    score
}

/// Number of length-`len` windows (rows, columns, both diagonal
/// directions) filled entirely with the player's balls.
fn count_runs(board: &Board, player: Player, len: usize) -> i32 {
    let owned = |row: usize, col: usize| board.cell(row, col) == Cell::Ball(player);
    let mut count = 0;
    for row in 0..SIDE {
        for start in 0..=SIDE - len {
            if (0..len).all(|t| owned(row, start + t)) {
                count += 1;
            }
        }
    }
    for col in 0..SIDE {
        for start in 0..=SIDE - len {
            if (0..len).all(|t| owned(start + t, col)) {
                count += 1;
            }
        }
    }
    for i in 0..=SIDE - len {
        for j in 0..=SIDE - len {
            if (0..len).all(|t| owned(i + t, j + t)) {
                count += 1;
            }
            if (0..len).all(|t| owned(i + t, j + len - 1 - t)) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [[u8; SIDE]; SIDE]) -> Board {
        let mut b = Board::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                match v {
                    0 => {}
                    1 => b.set(r, c, Player::White),
                    _ => b.set(r, c, Player::Black),
                }
            }
        }
        b
    }

    fn white_to_place(b: Board) -> Game {
        Game::from_parts(b, Player::White, Phase::AwaitingPlacement)
    }

    #[test]
    fn difficulty_depth_lookup() {
        assert_eq!(Difficulty::Easy.depth(), 2);
        assert_eq!(Difficulty::Medium.depth(), 3);
        assert_eq!(Difficulty::Hard.depth(), 4);
    }

    #[test]
    fn difficulty_parses_known_keys() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    }

    #[test]
    fn difficulty_rejects_unknown_key() {
        assert!(matches!(
            "impossible".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn won_board_scores_exactly_win_score() {
        // Heuristic features present, but the decided line dominates.
        let b = board([[1, 1, 1, 1], [2, 2, 0, 0], [0, 2, 0, 0], [0, 0, 0, 2]]);
        assert_eq!(evaluate(&b, Player::White), WIN_SCORE);
        assert_eq!(evaluate(&b, Player::Black), -WIN_SCORE);
    }

    #[test]
    fn empty_board_scores_zero() {
        assert_eq!(evaluate(&Board::empty(), Player::White), 0);
    }

    #[test]
    fn three_in_a_row_scores_seventy() {
        // One 3-window plus two 2-windows, no center cells involved.
        let b = board([[1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(evaluate(&b, Player::White), 70);
        assert_eq!(evaluate(&b, Player::Black), -70);
    }

    #[test]
    fn two_in_a_row_scores_ten() {
        let b = board([[1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(evaluate(&b, Player::White), 10);
    }

    #[test]
    fn center_ball_scores_five() {
        let b = board([[0, 0, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(evaluate(&b, Player::White), 5);
        assert_eq!(evaluate(&b, Player::Black), -5);
    }

    #[test]
    fn takes_the_first_of_two_winning_placements() {
        // Placing at (0,1) or at (3,2) both complete a line after the
        // orbit; the row-major tie-break must keep (0,1).
        let b = board([[1, 0, 0, 0], [1, 2, 2, 0], [1, 2, 2, 0], [1, 1, 0, 0]]);
        let game = white_to_place(b);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(choose_placement(&game, difficulty), Some((0, 1)));
        }
    }

    #[test]
    fn search_is_deterministic() {
        let b = board([[0, 0, 0, 0], [0, 0, 1, 0], [2, 0, 1, 0], [0, 0, 0, 0]]);
        let game = Game::from_parts(b, Player::Black, Phase::AwaitingPlacement);
        let first = choose_placement(&game, Difficulty::Medium);
        assert_eq!(first, choose_placement(&game, Difficulty::Medium));
        assert_eq!(first, Some((1, 0)));
    }

    #[test]
    fn depth_changes_the_chosen_placement() {
        let b = board([[0, 0, 0, 0], [0, 0, 1, 0], [2, 0, 1, 0], [0, 0, 0, 0]]);
        let game = Game::from_parts(b, Player::Black, Phase::AwaitingPlacement);
        assert_eq!(choose_placement(&game, Difficulty::Easy), Some((1, 0)));
        assert_eq!(choose_placement(&game, Difficulty::Hard), Some((2, 1)));
    }

    #[test]
    fn full_board_yields_no_placement() {
        let b = board([[2, 1, 2, 1], [2, 1, 1, 1], [1, 1, 2, 2], [2, 2, 1, 2]]);
        let game = white_to_place(b);
        assert_eq!(choose_placement(&game, Difficulty::Medium), None);
    }

    #[test]
    fn best_move_rejects_finished_game() {
        let result = best_move(MoveRequest {
            position: "W00B00W03B00W12B01W11".to_string(),
            level: Difficulty::Easy,
        });
        assert!(matches!(result, Err(GameError::GameOver)));
    }

    #[test]
    fn best_move_rejects_malformed_history() {
        let result = best_move(MoveRequest {
            position: "W0x".to_string(),
            level: Difficulty::Easy,
        });
        assert!(matches!(result, Err(GameError::ParseMove { .. })));
    }

    #[test]
    fn difficulty_deserializes_lowercase() {
        let level: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(level, Difficulty::Hard);
    }
}
