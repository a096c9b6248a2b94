//! Data models
//!
//! Plain Rust structs for the library, the cooking pot, the day board and
//! the daily targets.

mod category;
mod day;
mod day_entry;
mod food_item;
mod library;
mod nutrition;
mod pot;
mod targets;
mod validation;

pub use category::Category;
pub use day::{CategorySummary, DayBoard, DaySummary};
pub use day_entry::{DayEntry, DayEntryUpdate};
pub use food_item::{FoodItem, FoodItemCreate, FoodKind, MealComponent, DEFAULT_LIBRARY_CATEGORY};
pub use library::{Library, LibraryFilter};
pub use nutrition::{round1, Nutrition};
pub use pot::{CookingPot, PotLine, PotTotals, MEAL_CATEGORY};
pub use targets::{DailyTargets, Progress, TargetsUpdate};
pub use validation::ValidationErrors;

/// Fresh opaque id for library items and day entries
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
