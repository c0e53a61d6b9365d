use crate::engine::config::EngineConfig;
use crate::engine::level::{Level, Strategy};
use crate::engine::search::MinimaxEngine;
use crate::engine::{SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use shakmaty::Move;
use std::sync::Arc;

/// The computer opponent: picks a move for the side to move according to
/// the difficulty level.
pub struct ChessAi {
    engine: MinimaxEngine,
    last_stats: Option<SearchStats>,
}

impl ChessAi {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            engine: MinimaxEngine::new(config),
            last_stats: None,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.engine.update_config(config);
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<EngineConfig> {
        self.engine.config()
    }

    pub fn engine_mut(&mut self) -> &mut MinimaxEngine {
        &mut self.engine
    }

    /// Stats of the last minimax search; `None` after a random pick.
    #[must_use]
    pub const fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    pub fn best_move<R: Rng + ?Sized>(
        &mut self,
        game: &GameState,
        level: Level,
        rng: &mut R,
    ) -> Option<Move> {
        self.last_stats = None;
        let moves = game.legal_moves();
        if moves.is_empty() {
            return None;
        }

        match level.strategy() {
            Strategy::Random => moves.choose(rng).cloned(),
            Strategy::Aggressive => {
                let captures: Vec<&Move> = moves.iter().filter(|m| m.is_capture()).collect();
                if captures.is_empty() {
                    moves.choose(rng).cloned()
                } else {
                    captures.choose(rng).map(|m| (*m).clone())
                }
            }
            Strategy::Minimax { depth } => {
                let result = self.engine.search(game, SearchLimit::Depth(depth))?;
                debug!(
                    "level {} picked {} ({} nodes)",
                    level.value(),
                    game.san_of(&result.best_move),
                    result.stats.nodes
                );
                self.last_stats = Some(result.stats);
                Some(result.best_move)
            }
        }
    }
}
