use crate::engine::ai::ChessAi;
use crate::engine::config::EngineConfig;
use crate::engine::level::Level;
use crate::engine::SearchStats;
use crate::logic::game::GameState;
use gloo_worker::{HandlerId, Worker, WorkerScope};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::uci::Uci;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Input {
    ComputeMove {
        fen: String,
        level: Level,
        config: EngineConfig,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// `stats` is empty for the random levels.
    MoveFound {
        uci: String,
        san: String,
        stats: Option<SearchStats>,
    },
    NoMove,
    Error(String),
}

/// Runs the bot off the UI thread. The engine is kept between requests and
/// only its config is swapped.
pub struct GameWorker {
    ai: Option<ChessAi>,
}

impl GameWorker {
    fn ai_for(&mut self, config: EngineConfig) -> &mut ChessAi {
        let config = Arc::new(config.normalized());
        if let Some(ai) = self.ai.as_mut() {
            ai.update_config(Arc::clone(&config));
        }
        self.ai.get_or_insert_with(|| ChessAi::new(config))
    }
}

/// Answers one request. Split out of `received` so it runs without a scope.
pub fn compute_move<R: Rng + ?Sized>(
    ai: &mut ChessAi,
    fen: &str,
    level: Level,
    rng: &mut R,
) -> Output {
    let game = match GameState::from_fen(fen) {
        Ok(game) => game,
        Err(e) => return Output::Error(e.to_string()),
    };
    match ai.best_move(&game, level, rng) {
        Some(mv) => Output::MoveFound {
            uci: Uci::from_standard(&mv).to_string(),
            san: game.san_of(&mv),
            stats: ai.last_stats(),
        },
        None => Output::NoMove,
    }
}

impl Worker for GameWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self { ai: None }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        match msg {
            Input::ComputeMove { fen, level, config } => {
                let ai = self.ai_for(config);
                let output = compute_move(ai, &fen, level, &mut rand::thread_rng());
                if let Output::Error(e) = &output {
                    log::warn!("worker rejected request: {e}");
                }
                scope.respond(id, output);
            }
        }
    }
}
