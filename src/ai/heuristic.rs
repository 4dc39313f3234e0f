use crate::game::{Board, Cell, Player, COLS, ROWS};

use super::Score;

const CENTER_COLUMN: usize = COLS / 2;
const CENTER_BONUS: Score = 3;

const FOUR_SCORE: Score = 100;
const THREE_SCORE: Score = 5;
const TWO_SCORE: Score = 2;
/// Smaller in magnitude than `THREE_SCORE`.
const OPPONENT_THREE_PENALTY: Score = -4;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> Score;
}

/// Scores center control plus every 4-cell window on the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowHeuristic;

impl WindowHeuristic {
    fn score_window(window: &[Cell], own_cell: Cell) -> Score {
        let opp_cell = own_cell.opponent();
        let mut own = 0;
        let mut opp = 0;
        let mut empty = 0;
        for &cell in window {
            match cell {
                Cell::Empty => empty += 1,
                c if c == own_cell => own += 1,
                c if c == opp_cell => opp += 1,
                _ => {}
            }
        }

        let mut score = if own == 4 {
            FOUR_SCORE
        } else if own == 3 && empty == 1 {
            THREE_SCORE
        } else if own == 2 && empty == 2 {
            TWO_SCORE
        } else {
            0
        };
        // No matching penalty for an opponent pair.
        if opp == 3 && empty == 1 {
            score += OPPONENT_THREE_PENALTY;
        }
        score
    }
}

impl Heuristic for WindowHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> Score {
        let own_cell = player.to_cell();

        let center = (0..ROWS)
            .filter(|&row| board.get(row, CENTER_COLUMN) == own_cell)
            .count() as Score;
        let mut score = center * CENTER_BONUS;

        for window in board.windows() {
            score += Self::score_window(&window, own_cell);
        }

        score
    }
}
