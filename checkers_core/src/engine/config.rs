use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const VAL_MAN: i32 = 100;
pub const VAL_KING: i32 = 150;
pub const ADVANCE_BONUS: i32 = 3;
pub const EDGE_BONUS: i32 = 5;
pub const DEFAULT_DEPTH: u8 = 6;

/// Positional bonus per piece may reach at most this share (in tenths) of a
/// man's value, so material always outweighs position.
const POSITIONAL_CAP_TENTHS: i32 = 3;

/// Upper bound for a single piece value; keeps whole-board sums far from
/// `i32` overflow.
pub const MAX_PIECE_VALUE: i32 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("positional bonus {positional} per piece exceeds {cap} (30% of a man)")]
    PositionalTooLarge { positional: i32, cap: i32 },
    #[error("man value {0} must be positive")]
    ManNotPositive(i32),
    #[error("king value {king} must be at least the man value {man}")]
    KingBelowMan { king: i32, man: i32 },
    #[error("king value {king} exceeds {max}")]
    KingTooLarge { king: i32, max: i32 },
    #[error("{name} must not be negative, got {value}")]
    NegativeBonus { name: &'static str, value: i32 },
    #[error("search depth must be at least 1")]
    ZeroDepth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_man: i32,
    pub val_king: i32,
    pub advance_bonus: i32, // per row travelled by a man
    pub edge_bonus: i32,    // for standing on column 0 or 7

    // Search Parameters
    pub max_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_man: VAL_MAN,
            val_king: VAL_KING,
            advance_bonus: ADVANCE_BONUS,
            edge_bonus: EDGE_BONUS,

            max_depth: DEFAULT_DEPTH,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_man: Option<f32>,
    val_king: Option<f32>,
    advance_bonus: Option<f32>,
    edge_bonus: Option<f32>,

    max_depth: Option<u8>,
}

impl EngineConfig {
    /// Reads a json object of multipliers applied to the defaults; the depth
    /// is taken as an absolute value. The result is validated.
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        let config = Self {
            val_man: apply_scale(default.val_man, json_config.val_man),
            val_king: apply_scale(default.val_king, json_config.val_king),
            advance_bonus: apply_scale(default.advance_bonus, json_config.advance_bonus),
            edge_bonus: apply_scale(default.edge_bonus, json_config.edge_bonus),

            max_depth: json_config.max_depth.unwrap_or(default.max_depth),
        };
        config.validate()?;
        Ok(config)
    }

    /// Largest positional bonus a single piece can collect: a man one step
    /// from crowning, standing on an edge column.
    #[must_use]
    pub const fn max_positional_bonus(&self) -> i32 {
        self.advance_bonus
            .saturating_mul(6)
            .saturating_add(self.edge_bonus)
    }

    /// Scaled values saturate instead of wrapping, so every weight is
    /// bounded here before the evaluator sums them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.val_man < 1 {
            return Err(ConfigError::ManNotPositive(self.val_man));
        }
        if self.val_king < self.val_man {
            return Err(ConfigError::KingBelowMan {
                king: self.val_king,
                man: self.val_man,
            });
        }
        if self.val_king > MAX_PIECE_VALUE {
            return Err(ConfigError::KingTooLarge {
                king: self.val_king,
                max: MAX_PIECE_VALUE,
            });
        }
        for (name, value) in [
            ("advance_bonus", self.advance_bonus),
            ("edge_bonus", self.edge_bonus),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativeBonus { name, value });
            }
        }

        let cap = self.val_man * POSITIONAL_CAP_TENTHS / 10;
        let positional = self.max_positional_bonus();
        if positional > cap {
            return Err(ConfigError::PositionalTooLarge { positional, cap });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
