//! Day model
//!
//! The day board: food entries partitioned into meal categories, each
//! category ordered by its entries' `order` values.
//!
//! Plain adds append after the category's highest `order` and leave gaps
//! alone. Drag moves renumber every touched category to a dense `0..n` run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Category, DailyTargets, DayEntry, DayEntryUpdate, FoodItem, Nutrition, Progress};
use crate::nutrition::{aggregate, clamp_amount, Unit};

/// All entries of a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBoard {
    #[serde(rename = "cards")]
    entries: Vec<DayEntry>,
}

/// Totals for the day with percentages of the targets
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub totals: Nutrition,
    pub percent: Progress,
}

/// Totals for one category
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub totals: Nutrition,
}

impl DayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take entries as they are, `order` values included
    pub fn from_entries(entries: Vec<DayEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DayEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DayEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DayEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut DayEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Order value that places a new entry last in `category`
    pub fn next_order(&self, category: Category) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.order + 1)
            .max()
            .unwrap_or(0)
    }

    /// Append an entry at the end of its category
    pub fn add_entry(&mut self, mut entry: DayEntry) -> &DayEntry {
        entry.order = self.next_order(entry.category);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Snapshot a library item onto the board
    pub fn add_food(&mut self, item: &FoodItem, category: Category, amount: f64) -> &DayEntry {
        self.add_entry(DayEntry::from_food(item, category, amount))
    }

    /// Delete an entry; remaining `order` values are not renumbered
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Move an entry to `dest_index` within `dest` (possibly its own category)
    ///
    /// Both the source and destination categories are renumbered densely.
    /// An index past the end appends. Unknown ids are ignored.
    pub fn reorder(&mut self, moved_id: &str, dest: Category, dest_index: usize) -> bool {
        let Some(source) = self.get(moved_id).map(|e| e.category) else {
            return false;
        };

        let mut dest_ids: Vec<String> = self
            .sorted(dest)
            .into_iter()
            .filter(|e| e.id != moved_id)
            .map(|e| e.id.clone())
            .collect();
        let at = dest_index.min(dest_ids.len());
        dest_ids.insert(at, moved_id.to_string());

        if let Some(entry) = self.get_mut(moved_id) {
            entry.category = dest;
        }
        self.renumber(&dest_ids);

        if source != dest {
            let source_ids: Vec<String> = self.sorted(source).into_iter().map(|e| e.id.clone()).collect();
            self.renumber(&source_ids);
        }

        tracing::debug!(id = moved_id, from = %source, to = %dest, index = at, "Moved day entry");
        true
    }

    /// Set `order` to each entry's position in `ids`
    fn renumber(&mut self, ids: &[String]) {
        let positions: HashMap<&str, u32> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i as u32))
            .collect();
        for entry in &mut self.entries {
            if let Some(&pos) = positions.get(entry.id.as_str()) {
                entry.order = pos;
            }
        }
    }

    /// Set the consumed amount, clamped to `[0, max]`
    pub fn set_amount(&mut self, id: &str, amount: f64) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.amount = clamp_amount(amount, entry.max);
                true
            }
            None => false,
        }
    }

    /// Edit an entry; a category change re-appends it at the end of the new category
    pub fn edit_entry(&mut self, id: &str, update: &DayEntryUpdate) -> bool {
        let next_order = update.category.map(|c| self.next_order(c));
        let Some(entry) = self.get_mut(id) else {
            return false;
        };

        if let Some(ref name) = update.name {
            entry.name = name.trim().to_string();
        }
        if let Some(unit) = update.unit {
            entry.unit = unit;
            if unit != Unit::Piece {
                entry.grams_per_piece = None;
                entry.amount = clamp_amount(entry.amount, entry.max);
            }
        }
        if let Some(max) = update.max {
            entry.max = max;
            entry.amount = clamp_amount(entry.amount, max);
        }
        if let Some(per100) = update.per100 {
            entry.per100 = per100;
        }
        if let (Some(category), Some(order)) = (update.category, next_order) {
            if category != entry.category {
                entry.category = category;
                entry.order = order;
            }
        }
        true
    }

    /// Zero every amount in a category, keeping the entries
    pub fn reset_category(&mut self, category: Category) {
        for entry in self.entries.iter_mut().filter(|e| e.category == category) {
            entry.amount = 0.0;
        }
    }

    /// Zero every amount on the board
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.amount = 0.0;
        }
    }

    /// Remove every entry of a category
    pub fn clear_category(&mut self, category: Category) {
        self.entries.retain(|e| e.category != category);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries of a category in display order: `order`, then name
    pub fn sorted(&self, category: Category) -> Vec<&DayEntry> {
        let mut list: Vec<&DayEntry> = self.entries.iter().filter(|e| e.category == category).collect();
        list.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        list
    }

    /// Totals over the whole day
    pub fn totals(&self) -> Nutrition {
        aggregate(&self.entries)
    }

    /// Totals over one category
    pub fn category_totals(&self, category: Category) -> Nutrition {
        aggregate(self.entries.iter().filter(|e| e.category == category))
    }

    /// Per-category count and totals, in board order
    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        Category::ALL
            .iter()
            .map(|&category| CategorySummary {
                category,
                count: self.entries.iter().filter(|e| e.category == category).count(),
                totals: self.category_totals(category),
            })
            .collect()
    }

    /// Day totals against targets
    pub fn summary(&self, targets: &DailyTargets) -> DaySummary {
        let totals = self.totals();
        DaySummary {
            percent: Progress::of(&totals, targets),
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::Unit;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn entry(id: &str, name: &str, category: Category) -> DayEntry {
        DayEntry {
            id: id.to_string(),
            name: name.to_string(),
            category,
            unit: Unit::Gram,
            max: 1000.0,
            amount: 100.0,
            order: 0,
            per100: Nutrition { kcal: 100.0, protein: 10.0, ..Nutrition::zero() },
            grams_per_piece: None,
        }
    }

    fn board(entries: &[(&str, Category)]) -> DayBoard {
        let mut board = DayBoard::new();
        for (id, category) in entries {
            board.add_entry(entry(id, id, *category));
        }
        board
    }

    fn ids(board: &DayBoard, category: Category) -> Vec<String> {
        board.sorted(category).iter().map(|e| e.id.clone()).collect()
    }

    fn assert_dense(board: &DayBoard, category: Category) {
        let mut orders: Vec<u32> = board.sorted(category).iter().map(|e| e.order).collect();
        orders.sort_unstable();
        let expected: Vec<u32> = (0..orders.len() as u32).collect();
        assert_eq!(orders, expected, "category {} is not dense", category);
    }

    #[test]
    fn test_add_appends_after_max_order() {
        let mut b = board(&[("a", Category::Lunch), ("b", Category::Lunch)]);
        assert_eq!(b.get("a").unwrap().order, 0);
        assert_eq!(b.get("b").unwrap().order, 1);

        b.remove_entry("a");
        assert_eq!(b.get("b").unwrap().order, 1);

        b.add_entry(entry("c", "c", Category::Lunch));
        assert_eq!(b.get("c").unwrap().order, 2);

        b.add_entry(entry("d", "d", Category::Dinner));
        assert_eq!(b.get("d").unwrap().order, 0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut b = board(&[("a", Category::Lunch)]);
        assert!(!b.remove_entry("zzz"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_drag_lunch_entry_to_empty_dinner() {
        let mut b = board(&[("l0", Category::Lunch), ("l1", Category::Lunch)]);

        assert!(b.reorder("l1", Category::Dinner, 0));

        assert_eq!(ids(&b, Category::Lunch), ["l0"]);
        assert_eq!(b.get("l0").unwrap().order, 0);
        assert_eq!(ids(&b, Category::Dinner), ["l1"]);
        assert_eq!(b.get("l1").unwrap().order, 0);
    }

    #[test]
    fn test_reorder_within_category() {
        let mut b = board(&[("a", Category::Snack), ("b", Category::Snack), ("c", Category::Snack)]);

        b.reorder("c", Category::Snack, 0);
        assert_eq!(ids(&b, Category::Snack), ["c", "a", "b"]);

        b.reorder("c", Category::Snack, 99);
        assert_eq!(ids(&b, Category::Snack), ["a", "b", "c"]);
        assert_dense(&b, Category::Snack);
    }

    #[test]
    fn test_reorder_compacts_gaps() {
        let mut b = board(&[("a", Category::Lunch), ("b", Category::Lunch), ("c", Category::Lunch)]);
        b.remove_entry("b");
        b.reorder("a", Category::Breakfast, 0);

        assert_eq!(b.get("c").unwrap().order, 0);
        assert_dense(&b, Category::Lunch);
        assert_dense(&b, Category::Breakfast);
    }

    #[test]
    fn test_reorder_sequence_keeps_touched_categories_dense() {
        let mut b = board(&[
            ("a", Category::Breakfast),
            ("b", Category::Breakfast),
            ("c", Category::Breakfast),
            ("d", Category::Lunch),
            ("e", Category::Lunch),
        ]);
        let moves = [
            ("a", Category::Lunch, 1),
            ("e", Category::Breakfast, 0),
            ("c", Category::Lunch, 5),
            ("d", Category::Lunch, 0),
            ("b", Category::Breakfast, 1),
            ("a", Category::Breakfast, 2),
        ];
        for (id, dest, index) in moves {
            assert!(b.reorder(id, dest, index));
            assert_dense(&b, Category::Breakfast);
            assert_dense(&b, Category::Lunch);
        }
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn test_reorder_unknown_id_is_noop() {
        let mut b = board(&[("a", Category::Lunch)]);
        let before = b.clone();
        assert!(!b.reorder("missing", Category::Dinner, 0));
        assert_eq!(b, before);
    }

    #[test]
    fn test_sort_ties_break_on_name() {
        let mut b = DayBoard::from_entries(vec![
            entry("1", "Zucchini", Category::Dinner),
            entry("2", "Apple", Category::Dinner),
        ]);
        assert_eq!(ids(&b, Category::Dinner), ["2", "1"]);

        b.reorder("1", Category::Dinner, 0);
        assert_eq!(ids(&b, Category::Dinner), ["1", "2"]);
    }

    #[test]
    fn test_set_amount_clamps() {
        let mut b = board(&[("a", Category::Lunch)]);
        assert!(b.set_amount("a", 5000.0));
        assert_eq!(b.get("a").unwrap().amount, 1000.0);
        assert!(b.set_amount("a", -3.0));
        assert_eq!(b.get("a").unwrap().amount, 0.0);
        assert!(!b.set_amount("missing", 10.0));
    }

    #[test]
    fn test_reset_category_keeps_entries() {
        let mut b = board(&[("a", Category::Lunch), ("b", Category::Dinner)]);
        b.reset_category(Category::Lunch);
        assert_eq!(b.len(), 2);
        assert_eq!(b.get("a").unwrap().amount, 0.0);
        assert_eq!(b.get("b").unwrap().amount, 100.0);

        b.reset_all();
        assert!(b.totals().is_zero());
    }

    #[test]
    fn test_clear_category_removes_entries() {
        let mut b = board(&[("a", Category::Lunch), ("b", Category::Dinner)]);
        b.clear_category(Category::Lunch);
        assert_eq!(ids(&b, Category::Lunch), Vec::<String>::new());
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_edit_entry_category_change_appends() {
        let mut b = board(&[("a", Category::Lunch), ("b", Category::Dinner), ("c", Category::Dinner)]);
        let update = DayEntryUpdate { category: Some(Category::Dinner), ..Default::default() };
        assert!(b.edit_entry("a", &update));
        assert_eq!(b.get("a").unwrap().order, 2);
        assert_eq!(ids(&b, Category::Dinner), ["b", "c", "a"]);
    }

    #[test]
    fn test_edit_entry_away_from_pieces_drops_piece_weight() {
        let mut meal = entry("soup", "Soup", Category::Dinner);
        meal.unit = Unit::Piece;
        meal.max = 10.0;
        meal.amount = 2.0;
        meal.grams_per_piece = Some(350.0);
        let mut b = DayBoard::from_entries(vec![meal]);

        let update = DayEntryUpdate { unit: Some(Unit::Gram), ..Default::default() };
        assert!(b.edit_entry("soup", &update));
        let soup = b.get("soup").unwrap();
        assert_eq!(soup.grams_per_piece, None);
        assert_eq!(soup.grams(), 2.0);
    }

    #[test]
    fn test_totals_per_category_and_day() {
        let b = board(&[("a", Category::Lunch), ("b", Category::Lunch), ("c", Category::Dinner)]);
        assert!(approx(b.category_totals(Category::Lunch).kcal, 200.0));
        assert!(approx(b.category_totals(Category::Dinner).protein, 10.0));
        assert!(approx(b.totals().kcal, 300.0));
        assert!(b.category_totals(Category::Snack).is_zero());

        let summaries = b.category_summaries();
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[1].category, Category::Lunch);
        assert_eq!(summaries[1].count, 2);
    }

    #[test]
    fn test_summary_percentages() {
        let b = board(&[("a", Category::Lunch)]);
        let targets = DailyTargets::default();
        let summary = b.summary(&targets);
        assert_eq!(summary.percent.protein, 20);
    }
}
