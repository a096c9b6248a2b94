//! Unit types and slider constants
//!
//! Foods are measured in grams or milliliters (profile is per 100 of those)
//! or in pieces, where one piece stands for a fixed gram weight.

use serde::{Deserialize, Serialize};

/// Default slider upper bound for ingredients (g/ml)
pub const DEFAULT_INGREDIENT_MAX: f64 = 1000.0;
/// Default slider upper bound for meals (pieces)
pub const DEFAULT_MEAL_MAX: f64 = 10.0;

/// Slider step for gram/milliliter amounts
pub const WEIGHT_STEP: f64 = 5.0;
/// Slider step for piece amounts
pub const PIECE_STEP: f64 = 1.0;

/// Measurement unit of a food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    #[default]
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "piece")]
    Piece,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Milliliter => "ml",
            Unit::Piece => "piece",
        }
    }

    /// Parse a unit, accepting the common spellings
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Unit::Gram),
            "ml" | "milliliter" | "milliliters" => Some(Unit::Milliliter),
            "piece" | "pieces" | "each" | "count" => Some(Unit::Piece),
            _ => None,
        }
    }

    /// Whether amounts in this unit scale a per-100 profile directly
    pub fn is_per_100(&self) -> bool {
        !matches!(self, Unit::Piece)
    }

    /// Slider step for this unit
    pub fn step(&self) -> f64 {
        match self {
            Unit::Gram | Unit::Milliliter => WEIGHT_STEP,
            Unit::Piece => PIECE_STEP,
        }
    }

    /// Slider upper bound used when an item carries none
    pub fn default_max(&self) -> f64 {
        match self {
            Unit::Gram | Unit::Milliliter => DEFAULT_INGREDIENT_MAX,
            Unit::Piece => DEFAULT_MEAL_MAX,
        }
    }
}

/// Snap an amount to the unit's slider step and clamp it to `[0, max]`
pub fn snap_amount(amount: f64, unit: Unit, max: f64) -> f64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0.0;
    }
    let step = unit.step();
    let snapped = (amount / step).round() * step;
    clamp_amount(snapped, max)
}

/// Clamp an amount to `[0, max]`; a non-positive max leaves only the lower bound
pub fn clamp_amount(amount: f64, max: f64) -> f64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0.0;
    }
    if max.is_finite() && max > 0.0 {
        amount.min(max)
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(Unit::from_str("g"), Some(Unit::Gram));
        assert_eq!(Unit::from_str("Grams"), Some(Unit::Gram));
        assert_eq!(Unit::from_str("ml"), Some(Unit::Milliliter));
        assert_eq!(Unit::from_str("piece"), Some(Unit::Piece));
        assert_eq!(Unit::from_str("each"), Some(Unit::Piece));
        assert_eq!(Unit::from_str("cup"), None);
    }

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::Milliliter).unwrap(), "\"ml\"");
        let u: Unit = serde_json::from_str("\"piece\"").unwrap();
        assert_eq!(u, Unit::Piece);
    }

    #[test]
    fn test_snap_amount_weight_step() {
        assert_eq!(snap_amount(247.0, Unit::Gram, 1000.0), 245.0);
        assert_eq!(snap_amount(248.0, Unit::Milliliter, 1000.0), 250.0);
        assert_eq!(snap_amount(1200.0, Unit::Gram, 1000.0), 1000.0);
    }

    #[test]
    fn test_snap_amount_pieces() {
        assert_eq!(snap_amount(2.4, Unit::Piece, 10.0), 2.0);
        assert_eq!(snap_amount(12.0, Unit::Piece, 10.0), 10.0);
        assert_eq!(snap_amount(-3.0, Unit::Piece, 10.0), 0.0);
    }

    #[test]
    fn test_clamp_amount() {
        assert_eq!(clamp_amount(50.0, 0.0), 50.0);
        assert_eq!(clamp_amount(f64::NAN, 100.0), 0.0);
        assert_eq!(clamp_amount(150.0, 100.0), 100.0);
    }
}
