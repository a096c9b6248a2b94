//! Nutrition calculation module
//!
//! Handles kcal derivation, per-100 scaling, aggregation and units.

pub mod calculator;
pub mod units;

pub use calculator::{
    aggregate, derive_kcal, kcal_from_macros, percent_of, scale_profile, with_kcal, MacroGrams,
    Portion,
};
pub use units::{clamp_amount, snap_amount, Unit, DEFAULT_INGREDIENT_MAX, DEFAULT_MEAL_MAX};
