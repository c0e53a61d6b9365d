use crate::engine::eval_constants::{
    INFINITY, MATE_SCORE, VAL_BISHOP, VAL_KING, VAL_KNIGHT, VAL_PAWN, VAL_QUEEN, VAL_ROOK,
};
use crate::logic::board::PieceType;
use serde::{Deserialize, Serialize};

/// Largest mate score that still leaves room below the search bounds.
pub const MAX_MATE_SCORE: i32 = INFINITY / 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,

    // Search Parameters
    pub mate_score: i32,
    pub order_captures: bool,

    // Pause before the bot answers, indexed by level - 1. Levels past the
    // end use `default_think_delay_ms`.
    pub think_delay_ms: Vec<u64>,
    pub default_think_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,

            mate_score: MATE_SCORE,
            order_captures: true,

            think_delay_ms: vec![500, 1000, 2000, 2500],
            default_think_delay_ms: 1000,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,

    mate_score: Option<i32>,
    order_captures: Option<bool>,

    think_delay_ms: Option<Vec<u64>>,
    default_think_delay_ms: Option<u64>,
}

impl EngineConfig {
    /// Reads a tuning file. Piece values are scale factors on the defaults;
    /// everything else is taken as-is apart from range clamping.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not a valid config.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),

            mate_score: json_config.mate_score.unwrap_or(default.mate_score),
            order_captures: json_config
                .order_captures
                .unwrap_or(default.order_captures),

            think_delay_ms: json_config
                .think_delay_ms
                .unwrap_or(default.think_delay_ms),
            default_think_delay_ms: json_config
                .default_think_delay_ms
                .unwrap_or(default.default_think_delay_ms),
        }
        .normalized())
    }

    /// `mate_score` kept inside the search window. A non-positive value
    /// would rank mates below material, so it falls back to the default.
    #[must_use]
    pub const fn mate_score(&self) -> i32 {
        if self.mate_score < 1 {
            MATE_SCORE
        } else if self.mate_score > MAX_MATE_SCORE {
            MAX_MATE_SCORE
        } else {
            self.mate_score
        }
    }

    /// Copy with out-of-range fields pulled back into range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.mate_score = self.mate_score();
        self
    }

    #[must_use]
    pub const fn piece_value(&self, piece_type: PieceType) -> i32 {
        match piece_type {
            PieceType::Pawn => self.val_pawn,
            PieceType::Knight => self.val_knight,
            PieceType::Bishop => self.val_bishop,
            PieceType::Rook => self.val_rook,
            PieceType::Queen => self.val_queen,
            PieceType::King => self.val_king,
        }
    }

    #[must_use]
    pub fn think_delay_ms(&self, level: u8) -> u64 {
        usize::from(level)
            .checked_sub(1)
            .and_then(|i| self.think_delay_ms.get(i))
            .copied()
            .unwrap_or(self.default_think_delay_ms)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.val_pawn, VAL_PAWN);
        assert!(config.order_captures);
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "val_pawn": 1.5,
            "val_queen": 0.5
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.val_pawn, 150);
        assert_eq!(config.val_queen, 450);
        // Others should be default
        assert_eq!(config.val_rook, VAL_ROOK);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let result = EngineConfig::load_from_json("{ invalid json }");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_search_fields() {
        let json = r#"{
            "mate_score": 50000,
            "order_captures": false,
            "think_delay_ms": [0, 0],
            "default_think_delay_ms": 10
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.mate_score, 50000);
        assert!(!config.order_captures);
        assert_eq!(config.think_delay_ms(1), 0);
        assert_eq!(config.think_delay_ms(2), 0);
        assert_eq!(config.think_delay_ms(3), 10);
    }

    #[test]
    fn test_mate_score_clamped() {
        let config = EngineConfig::load_from_json(r#"{ "mate_score": -2147483648 }"#).unwrap();
        assert_eq!(config.mate_score, MATE_SCORE);

        let config = EngineConfig::load_from_json(r#"{ "mate_score": 2147483647 }"#).unwrap();
        assert_eq!(config.mate_score, MAX_MATE_SCORE);

        // Deserialized directly the raw value survives, the accessor still clamps.
        let config: EngineConfig = serde_json::from_str(r#"{ "mate_score": -5 }"#).unwrap();
        assert_eq!(config.mate_score, -5);
        assert_eq!(config.mate_score(), MATE_SCORE);
        assert_eq!(config.normalized().mate_score, MATE_SCORE);
    }

    #[test]
    fn test_think_delay_per_level() {
        let config = EngineConfig::default();
        assert_eq!(config.think_delay_ms(1), 500);
        assert_eq!(config.think_delay_ms(2), 1000);
        assert_eq!(config.think_delay_ms(3), 2000);
        assert_eq!(config.think_delay_ms(4), 2500);
        assert_eq!(config.think_delay_ms(5), 1000);
        assert_eq!(config.think_delay_ms(17), 1000);
        assert_eq!(config.think_delay_ms(0), 1000);
    }

    #[test]
    fn test_deserialize_absolute_config() {
        let json = r#"{
            "val_pawn": 123,
            "val_king": 9999
        }"#;

        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.val_pawn, 123);
        assert_eq!(config.val_king, 9999);
        assert_eq!(config.val_rook, VAL_ROOK);
        assert_eq!(config.piece_value(PieceType::King), 9999);
    }
}
