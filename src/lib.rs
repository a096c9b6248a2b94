//! Calorie Board Library
//!
//! Nutrition calculator, food library, cooking pot and daily meal board.

pub mod db;
pub mod document;
pub mod models;
pub mod nutrition;
pub mod report;
pub mod store;
