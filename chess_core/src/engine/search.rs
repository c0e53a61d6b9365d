use crate::engine::config::EngineConfig;
use crate::engine::eval::PstEvaluator;
use crate::engine::eval_constants::INFINITY;
use crate::engine::{Evaluator, SearchLimit, SearchResult, SearchStats, Searcher};
use crate::logic::game::GameState;
use log::debug;
use shakmaty::{Chess, Color, Move, Position};
use std::sync::Arc;

/// Fixed-depth minimax with alpha-beta pruning. Scores are always taken
/// from the side to move at the root: that side maximizes, the other
/// minimizes.
pub struct MinimaxEngine {
    config: Arc<EngineConfig>,
    evaluator: PstEvaluator,
    root_color: Color,
    nodes_searched: u32,
}

impl MinimaxEngine {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: PstEvaluator::new(config.clone()),
            config,
            root_color: Color::White,
            nodes_searched: 0,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = PstEvaluator::new(config.clone());
        self.config = config;
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    fn now() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            if let Some(window) = web_sys::window() {
                return window.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            let global = js_sys::global();
            if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
                return worker.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            0.0
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            #[allow(clippy::cast_precision_loss)]
            let time_ms = (since_the_epoch.as_secs() as f64).mul_add(
                1000.0,
                f64::from(since_the_epoch.subsec_nanos()) / 1_000_000.0,
            );
            time_ms
        }
    }

    /// Legal moves with captures in front. The sort is stable so the rules
    /// engine's order survives inside each group.
    #[must_use]
    pub fn ordered_moves(&self, pos: &Chess) -> Vec<Move> {
        let mut moves: Vec<Move> = pos.legal_moves().into_iter().collect();
        if self.config.order_captures {
            moves.sort_by_key(|mv| !mv.is_capture());
        }
        moves
    }

    fn leaf_score(&self, pos: &Chess) -> i32 {
        let score = self.evaluator.evaluate(pos);
        match self.root_color {
            Color::White => score,
            Color::Black => -score,
        }
    }

    /// Value of a node whose side to move has no legal moves. Mates found
    /// closer to the root score higher.
    fn no_move_score(&self, pos: &Chess, ply: u8) -> i32 {
        if !pos.is_check() {
            return 0;
        }
        let mate = self.config.mate_score() - i32::from(ply);
        if pos.turn() == self.root_color {
            -mate
        } else {
            mate
        }
    }

    fn alpha_beta(
        &mut self,
        pos: &Chess,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            if pos.is_checkmate() {
                return self.no_move_score(pos, ply);
            }
            return self.leaf_score(pos);
        }

        let moves = self.ordered_moves(pos);
        if moves.is_empty() {
            return self.no_move_score(pos, ply);
        }

        if pos.turn() == self.root_color {
            let mut best = -INFINITY;
            for mv in &moves {
                let mut child = pos.clone();
                child.play_unchecked(mv);
                best = best.max(self.alpha_beta(&child, depth - 1, ply + 1, alpha, beta));
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for mv in &moves {
                let mut child = pos.clone();
                child.play_unchecked(mv);
                best = best.min(self.alpha_beta(&child, depth - 1, ply + 1, alpha, beta));
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Full-width minimax, no pruning. Same scores as `alpha_beta` with a
    /// full window, only slower.
    fn minimax(&mut self, pos: &Chess, depth: u8, ply: u8) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            if pos.is_checkmate() {
                return self.no_move_score(pos, ply);
            }
            return self.leaf_score(pos);
        }

        let moves = self.ordered_moves(pos);
        if moves.is_empty() {
            return self.no_move_score(pos, ply);
        }

        let maximizing = pos.turn() == self.root_color;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for mv in &moves {
            let mut child = pos.clone();
            child.play_unchecked(mv);
            let score = self.minimax(&child, depth - 1, ply + 1);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }

    fn root(&mut self, pos: &Chess, depth: u8, prune: bool) -> Option<(Move, i32)> {
        self.root_color = pos.turn();
        let depth = depth.max(1);

        let mut alpha = -INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for mv in self.ordered_moves(pos) {
            let mut child = pos.clone();
            child.play_unchecked(&mv);
            // One below alpha so a child tying the best so far comes back exact.
            let score = if prune {
                self.alpha_beta(&child, depth - 1, 1, alpha - 1, INFINITY)
            } else {
                self.minimax(&child, depth - 1, 1)
            };

            // Later moves win ties.
            if best.as_ref().map_or(true, |(_, s)| score >= *s) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }
        best
    }

    /// Best move and its score without any pruning.
    pub fn minimax_best(&mut self, game: &GameState, depth: u8) -> Option<(Move, i32)> {
        self.nodes_searched = 0;
        self.root(game.position(), depth, false)
    }

    /// Exact score of playing `mv` and searching `depth - 1` plies below it.
    pub fn score_move(&mut self, game: &GameState, mv: &Move, depth: u8) -> i32 {
        let pos = game.position();
        self.root_color = pos.turn();
        let mut child = pos.clone();
        child.play_unchecked(mv);
        self.alpha_beta(&child, depth.max(1) - 1, 1, -INFINITY, INFINITY)
    }

    #[must_use]
    pub const fn nodes_searched(&self) -> u32 {
        self.nodes_searched
    }
}

impl Searcher for MinimaxEngine {
    fn search(&mut self, game_state: &GameState, limit: SearchLimit) -> Option<SearchResult> {
        let SearchLimit::Depth(depth) = limit;
        self.nodes_searched = 0;
        let start_time = Self::now();

        let (best_move, score) = self.root(game_state.position(), depth, true)?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let time_ms = (Self::now() - start_time).max(0.0) as u64;
        let stats = SearchStats {
            depth: depth.max(1),
            nodes: self.nodes_searched,
            time_ms,
        };
        debug!(
            "search depth={} best={} score={} nodes={} time={}ms",
            stats.depth,
            game_state.san_of(&best_move),
            score,
            stats.nodes,
            stats.time_ms
        );

        Some(SearchResult {
            best_move,
            score,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::eval_constants::MATE_SCORE;

    fn engine() -> MinimaxEngine {
        MinimaxEngine::new(Arc::new(EngineConfig::default()))
    }

    #[test]
    fn test_search_returns_legal_move() {
        let game = GameState::new();
        let mut engine = engine();
        for depth in 1..=3 {
            let result = engine.search(&game, SearchLimit::Depth(depth)).unwrap();
            assert!(game.legal_moves().contains(&result.best_move));
            assert_eq!(result.stats.depth, depth);
            assert!(result.stats.nodes > 0);
        }
    }

    #[test]
    fn test_no_move_when_game_over() {
        let mut game = GameState::new();
        for san in ["f3", "e5", "g4", "Qh4#"] {
            game.play_san(san).unwrap();
        }
        assert!(engine().search(&game, SearchLimit::Depth(2)).is_none());
    }

    #[test]
    fn test_captures_ordered_first() {
        let mut game = GameState::new();
        for san in ["e4", "d5"] {
            game.play_san(san).unwrap();
        }
        let moves = engine().ordered_moves(game.position());
        assert!(moves.first().unwrap().is_capture());
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 1);
        assert_eq!(moves.len(), game.legal_moves().len());
    }

    #[test]
    fn test_takes_hanging_queen() {
        // Black queen on d4 can be taken by the e3 pawn.
        let game = GameState::from_fen("4k3/8/8/8/3q4/4P3/8/4K3 w - - 0 1").unwrap();
        let result = engine().search(&game, SearchLimit::Depth(2)).unwrap();
        assert_eq!(game.san_of(&result.best_move), "exd4");
        assert!(result.score > 0);
    }

    #[test]
    fn test_black_side_maximizes_its_own_score() {
        // Same idea with colours swapped: Black to move wins the queen.
        let game = GameState::from_fen("4k3/8/4p3/3Q4/8/8/8/4K3 b - - 0 1").unwrap();
        let result = engine().search(&game, SearchLimit::Depth(2)).unwrap();
        assert_eq!(game.san_of(&result.best_move), "exd5");
        assert!(result.score > 0);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let mut game = GameState::new();
        for san in ["e4", "e5", "Nf3", "Nc6", "Bc4"] {
            game.play_san(san).unwrap();
        }
        let mut engine = engine();
        for depth in 1..=3 {
            let pruned = engine.search(&game, SearchLimit::Depth(depth)).unwrap();
            let pruned_nodes = pruned.stats.nodes;
            let (full_move, full_score) = engine.minimax_best(&game, depth).unwrap();
            assert_eq!(pruned.score, full_score, "depth {depth}");
            assert_eq!(pruned.best_move, full_move, "depth {depth}");
            if depth > 1 {
                assert!(pruned_nodes < engine.nodes_searched());
            }
        }
    }

    #[test]
    fn test_last_tied_root_move_wins() {
        let game = GameState::new();
        let mut engine = engine();
        let result = engine.search(&game, SearchLimit::Depth(2)).unwrap();

        let ordered = engine.ordered_moves(game.position());
        let scores: Vec<i32> = ordered
            .iter()
            .map(|mv| engine.score_move(&game, mv, 2))
            .collect();
        let best = *scores.iter().max().unwrap();
        let tied: Vec<&Move> = ordered
            .iter()
            .zip(&scores)
            .filter(|(_, s)| **s == best)
            .map(|(mv, _)| mv)
            .collect();

        assert!(tied.len() > 1);
        assert_eq!(result.score, best);
        assert_eq!(Some(&&result.best_move), tied.last());
        assert_eq!(game.san_of(&result.best_move), "Nf3");

        let (full_move, _) = engine.minimax_best(&game, 2).unwrap();
        assert_eq!(full_move, result.best_move);
    }

    #[test]
    fn test_out_of_range_mate_score_is_clamped() {
        let config = EngineConfig {
            mate_score: i32::MIN,
            ..EngineConfig::default()
        };
        let mut engine = MinimaxEngine::new(Arc::new(config));
        let game = GameState::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .unwrap();
        let result = engine.search(&game, SearchLimit::Depth(2)).unwrap();
        assert_eq!(game.san_of(&result.best_move), "Qxf7#");
        assert_eq!(result.score, MATE_SCORE - 1);
    }

    #[test]
    fn test_score_move_agrees_with_search() {
        let game = GameState::new();
        let mut engine = engine();
        let result = engine.search(&game, SearchLimit::Depth(2)).unwrap();
        assert_eq!(engine.score_move(&game, &result.best_move, 2), result.score);
    }

    #[test]
    fn test_stalemate_scores_zero() {
        // Black to move, not in check, no legal moves.
        let game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut engine = engine();
        engine.root_color = Color::White;
        assert_eq!(engine.alpha_beta(game.position(), 2, 0, -INFINITY, INFINITY), 0);
    }
}
