use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move};

pub mod ai;
pub mod config;
pub mod eval;
pub mod eval_constants;
pub mod level;
pub mod search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// From the point of view of the side to move at the root.
    pub score: i32,
    pub stats: SearchStats,
}

pub trait Evaluator {
    /// Static score of a position, positive when White is better.
    fn evaluate(&self, pos: &Chess) -> i32;
}

pub trait Searcher {
    fn search(&mut self, game_state: &GameState, limit: SearchLimit) -> Option<SearchResult>;
}
