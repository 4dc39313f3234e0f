use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SearchError;
use crate::game::{Board, Cell, Player};

use super::heuristic::{Heuristic, WindowHeuristic};
use super::{Score, NEG_INF, POS_INF, WIN_SCORE};

/// Column chosen at a search node, paired with its score from the AI's side.
/// `column` is `None` at leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub column: Option<usize>,
    pub score: Score,
}

impl SearchResult {
    fn leaf(score: Score) -> Self {
        SearchResult { column: None, score }
    }
}

/// Depth-limited minimax with alpha-beta pruning. The AI maximizes, the human
/// minimizes.
pub struct MinimaxAgent {
    depth: usize,
    heuristic: Box<dyn Heuristic>,
    rng: StdRng,
    nodes: u64,
}

impl MinimaxAgent {
    /// Searches `depth` plies (at least one) with an OS-seeded tie-break source.
    pub fn new(depth: usize) -> Self {
        Self::from_rng(depth, Box::new(WindowHeuristic), StdRng::from_os_rng())
    }

    /// Reproducible agent: the same seed replays the same tie-breaks.
    pub fn with_seed(depth: usize, seed: u64) -> Self {
        Self::from_rng(depth, Box::new(WindowHeuristic), StdRng::seed_from_u64(seed))
    }

    pub fn with_heuristic(depth: usize, heuristic: Box<dyn Heuristic>, seed: u64) -> Self {
        Self::from_rng(depth, heuristic, StdRng::seed_from_u64(seed))
    }

    fn from_rng(depth: usize, heuristic: Box<dyn Heuristic>, rng: StdRng) -> Self {
        MinimaxAgent {
            depth: depth.max(1),
            heuristic,
            rng,
            nodes: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Nodes visited by the most recent `choose_move`.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Pick the AI's column for `board`.
    pub fn choose_move(&mut self, board: &Board) -> Result<usize, SearchError> {
        if board.valid_columns().is_empty() {
            return Err(SearchError::NoValidMoves);
        }
        if board.check_win(Cell::Human) || board.check_win(Cell::Ai) {
            return Err(SearchError::GameOver);
        }

        self.nodes = 0;
        let result = self.minimax(board, self.depth, NEG_INF, POS_INF, true);
        let column = result.column.ok_or(SearchError::NoValidMoves)?;

        tracing::debug!(
            depth = self.depth,
            column,
            score = result.score,
            nodes = self.nodes,
            "ai move chosen"
        );
        Ok(column)
    }

    /// One node of the search. `maximizing` is true when the AI is to move.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: usize,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> SearchResult {
        self.nodes += 1;

        if board.is_terminal() {
            return if board.check_win(Cell::Ai) {
                SearchResult::leaf(WIN_SCORE)
            } else if board.check_win(Cell::Human) {
                SearchResult::leaf(-WIN_SCORE)
            } else {
                SearchResult::leaf(0)
            };
        }
        if depth == 0 {
            return SearchResult::leaf(self.heuristic.evaluate(board, Player::Ai));
        }

        let valid = board.valid_columns();
        let mut column = valid[self.rng.random_range(0..valid.len())];

        if maximizing {
            let mut value = NEG_INF;
            for &col in &valid {
                let Some(row) = board.next_open_row(col) else {
                    continue;
                };
                let mut child = *board;
                child.drop_piece(row, col, Cell::Ai);
                let score = self.minimax(&child, depth - 1, alpha, beta, false).score;
                if score > value {
                    value = score;
                    column = col;
                }
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            SearchResult {
                column: Some(column),
                score: value,
            }
        } else {
            let mut value = POS_INF;
            for &col in &valid {
                let Some(row) = board.next_open_row(col) else {
                    continue;
                };
                let mut child = *board;
                child.drop_piece(row, col, Cell::Human);
                let score = self.minimax(&child, depth - 1, alpha, beta, true).score;
                if score < value {
                    value = score;
                    column = col;
                }
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            SearchResult {
                column: Some(column),
                score: value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameOutcome, GameState, COLS};

    fn board_from(moves: &[(usize, Cell)]) -> Board {
        let mut board = Board::new();
        for &(col, cell) in moves {
            board.apply_move(col, cell).unwrap();
        }
        board
    }

    /// Exhaustive minimax without pruning, first-seen wins on ties.
    fn plain_minimax(board: &Board, depth: usize, maximizing: bool) -> (Option<usize>, Score) {
        if board.is_terminal() {
            let score = if board.check_win(Cell::Ai) {
                WIN_SCORE
            } else if board.check_win(Cell::Human) {
                -WIN_SCORE
            } else {
                0
            };
            return (None, score);
        }
        if depth == 0 {
            return (None, WindowHeuristic.evaluate(board, Player::Ai));
        }

        let mut best: Option<(usize, Score)> = None;
        for col in board.valid_columns() {
            let mut child = *board;
            let cell = if maximizing { Cell::Ai } else { Cell::Human };
            child.apply_move(col, cell).unwrap();
            let (_, score) = plain_minimax(&child, depth - 1, !maximizing);
            let better = match best {
                None => true,
                Some((_, b)) if maximizing => score > b,
                Some((_, b)) => score < b,
            };
            if better {
                best = Some((col, score));
            }
        }
        let (col, score) = best.unwrap();
        (Some(col), score)
    }

    fn sample_boards() -> Vec<Board> {
        use crate::game::Cell::{Ai as A, Human as H};
        vec![
            Board::new(),
            board_from(&[(3, H), (3, A), (2, H), (4, A)]),
            board_from(&[(0, H), (1, H), (2, H), (6, A), (6, A)]),
            board_from(&[(3, A), (3, H), (4, A), (2, H), (5, A), (5, H), (1, A)]),
            board_from(&[
                (0, H), (0, A), (0, H), (0, A), (0, H), (0, A),
                (6, A), (6, H), (6, A), (3, H), (3, A), (2, H),
            ]),
            board_from(&[(1, A), (2, H), (2, A), (3, H), (4, A), (3, H), (3, A), (4, H)]),
        ]
    }

    #[test]
    fn selects_valid_column_on_empty_board() {
        let mut agent = MinimaxAgent::with_seed(1, 0);
        let board = Board::new();
        let col = agent.choose_move(&board).unwrap();
        assert!(col < COLS);
        assert!(board.is_valid_column(col));
        assert!(agent.nodes() > 0);
    }

    #[test]
    fn never_selects_full_column() {
        use crate::game::Cell::{Ai as A, Human as H};
        // Columns 2, 3 and 4 are full
        let mut moves = Vec::new();
        for col in 2..5 {
            for i in 0..6 {
                moves.push((col, if (i + col) % 2 == 0 { H } else { A }));
            }
        }
        let board = board_from(&moves);
        for seed in 0..10 {
            let mut agent = MinimaxAgent::with_seed(3, seed);
            let col = agent.choose_move(&board).unwrap();
            assert!(board.is_valid_column(col), "picked full column {col}");
        }
    }

    #[test]
    fn takes_winning_move() {
        use crate::game::Cell::{Ai as A, Human as H};
        // AI has the bottom row 0..3, human sits on top; column 3 wins
        let board = board_from(&[(0, A), (0, H), (1, A), (1, H), (2, A), (2, H)]);
        for depth in [1, 3, 5] {
            let mut agent = MinimaxAgent::with_seed(depth, 1);
            assert_eq!(agent.choose_move(&board), Ok(3), "depth {depth}");
        }

        let mut agent = MinimaxAgent::with_seed(1, 1);
        let result = agent.minimax(&board, 1, NEG_INF, POS_INF, true);
        assert_eq!(result, SearchResult { column: Some(3), score: WIN_SCORE });
    }

    #[test]
    fn blocks_opponent_win() {
        use crate::game::Cell::{Ai as A, Human as H};
        // Human threatens column 3 along the bottom row
        let board = board_from(&[(6, A), (0, H), (6, A), (1, H), (5, A), (2, H)]);
        for seed in 0..5 {
            let mut agent = MinimaxAgent::with_seed(3, seed);
            assert_eq!(agent.choose_move(&board), Ok(3));
        }
    }

    #[test]
    fn terminal_scores() {
        use crate::game::Cell::{Ai as A, Human as H};
        let mut agent = MinimaxAgent::with_seed(3, 0);

        let ai_won = board_from(&[(0, A), (1, A), (2, A), (3, A)]);
        assert_eq!(agent.minimax(&ai_won, 3, NEG_INF, POS_INF, false).score, WIN_SCORE);
        assert_eq!(agent.minimax(&ai_won, 3, NEG_INF, POS_INF, true).column, None);

        let human_won = board_from(&[(4, H), (4, H), (4, H), (4, H)]);
        assert_eq!(agent.minimax(&human_won, 3, NEG_INF, POS_INF, true).score, -WIN_SCORE);

        let quiet = board_from(&[(3, A)]);
        assert_eq!(
            agent.minimax(&quiet, 0, NEG_INF, POS_INF, true),
            SearchResult { column: None, score: 3 }
        );
    }

    #[test]
    fn alpha_beta_matches_plain_minimax() {
        for (i, board) in sample_boards().iter().enumerate() {
            for depth in 1..=4 {
                let (expected_col, expected_score) = plain_minimax(board, depth, true);
                for seed in 0..3 {
                    let mut agent = MinimaxAgent::with_seed(depth, seed);
                    let result = agent.minimax(board, depth, NEG_INF, POS_INF, true);
                    assert_eq!(result.score, expected_score, "board {i} depth {depth}");
                    assert_eq!(result.column, expected_col, "board {i} depth {depth}");
                }
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let board = Board::new();
        let mut agent = MinimaxAgent::with_seed(4, 0);
        agent.choose_move(&board).unwrap();
        // 1 + 7 + 49 + 343 + 2401 nodes without pruning
        assert!(agent.nodes() < 2801, "visited {}", agent.nodes());
    }

    #[test]
    fn same_seed_same_move() {
        use crate::game::Cell::{Ai as A, Human as H};
        let board = board_from(&[(3, H), (2, A), (4, H)]);
        let a = MinimaxAgent::with_seed(3, 42).choose_move(&board);
        let b = MinimaxAgent::with_seed(3, 42).choose_move(&board);
        assert_eq!(a, b);
    }

    #[test]
    fn search_leaves_board_untouched() {
        use crate::game::Cell::{Ai as A, Human as H};
        let board = board_from(&[(3, H), (2, A)]);
        let snapshot = board;
        MinimaxAgent::with_seed(5, 0).choose_move(&board).unwrap();
        assert_eq!(board, snapshot);
    }

    #[test]
    fn full_board_has_no_moves() {
        let mut board = Board::new();
        for col in 0..COLS {
            for row in 0..6 {
                let cell = if (row / 2 + col) % 2 == 0 { Cell::Human } else { Cell::Ai };
                board.drop_piece(row, col, cell);
            }
        }
        let mut agent = MinimaxAgent::with_seed(3, 0);
        assert_eq!(agent.choose_move(&board), Err(SearchError::NoValidMoves));
    }

    #[test]
    fn won_board_is_game_over() {
        let board = board_from(&[
            (0, Cell::Human),
            (1, Cell::Human),
            (2, Cell::Human),
            (3, Cell::Human),
        ]);
        let mut agent = MinimaxAgent::with_seed(3, 0);
        assert_eq!(agent.choose_move(&board), Err(SearchError::GameOver));
    }

    #[test]
    fn zero_depth_is_clamped() {
        let mut agent = MinimaxAgent::with_seed(0, 0);
        assert_eq!(agent.depth(), 1);
        assert!(agent.choose_move(&Board::new()).is_ok());
    }

    #[test]
    fn custom_heuristic_is_used() {
        struct PreferColumn(usize);
        impl Heuristic for PreferColumn {
            fn evaluate(&self, board: &Board, player: Player) -> Score {
                if board.get(0, self.0) == player.to_cell() {
                    1
                } else {
                    0
                }
            }
        }

        let mut agent = MinimaxAgent::with_heuristic(1, Box::new(PreferColumn(5)), 0);
        assert_eq!(agent.choose_move(&Board::new()), Ok(5));
    }

    #[test]
    fn full_game_against_itself_completes() {
        let mut ai = MinimaxAgent::with_seed(3, 9);
        let mut state = GameState::initial(Player::Ai);

        // The human side always takes the middle legal column
        while !state.is_terminal() {
            let col = match state.current_player() {
                Player::Ai => ai.choose_move(state.board()).unwrap(),
                Player::Human => {
                    let valid = state.legal_actions();
                    valid[valid.len() / 2]
                }
            };
            state.apply_move_mut(col).unwrap();
        }

        assert!(matches!(
            state.outcome(),
            Some(GameOutcome::Winner(_)) | Some(GameOutcome::Draw)
        ));
    }
}
