//! Plain-text rendering of the board, the library and the pot

use std::fmt::Write;

use crate::models::{Category, CookingPot, DailyTargets, DayBoard, DayEntry, FoodItem, Library, Nutrition};
use crate::nutrition::{percent_of, Portion};

/// One-line macro chip: `163 kcal | P 8.5 | F 9.0 | C 12.0`
pub fn chip(n: &Nutrition) -> String {
    format!(
        "{:.0} kcal | P {:.1} | F {:.1} | C {:.1}",
        n.kcal, n.protein, n.fat, n.carbs
    )
}

fn amount_label(entry: &DayEntry) -> String {
    if entry.is_meal() {
        format!("{} pc ({:.0} g)", entry.amount, entry.grams())
    } else {
        format!("{} {}", entry.amount, entry.unit.as_str())
    }
}

/// Day board by category, then the daily summary against targets
pub fn render_day(day: &DayBoard, targets: &DailyTargets) -> String {
    let mut out = String::new();

    for category in Category::ALL {
        let entries = day.sorted(category);
        let _ = writeln!(out, "{}: {}", category.label(), chip(&day.category_totals(category)));
        if entries.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for entry in entries {
            let _ = writeln!(
                out,
                "  {}  {}  {}/{}  {:.0} kcal",
                entry.id,
                entry.name,
                amount_label(entry),
                entry.max,
                entry.nutrition().kcal
            );
        }
    }

    out.push('\n');
    out.push_str(&render_summary(&day.totals(), targets));
    out
}

/// Totals against targets, one nutrient per line
pub fn render_summary(totals: &Nutrition, targets: &DailyTargets) -> String {
    let t = targets.as_nutrition();
    let rows = [
        ("Calories", totals.kcal, t.kcal, "kcal"),
        ("Protein", totals.protein, t.protein, "g"),
        ("Fat", totals.fat, t.fat, "g"),
        ("Sat fat", totals.sat_fat, t.sat_fat, "g"),
        ("Carbs", totals.carbs, t.carbs, "g"),
        ("Sugar", totals.sugar, t.sugar, "g"),
        ("Fiber", totals.fiber, t.fiber, "g"),
        ("Salt", totals.salt, t.salt, "g"),
    ];

    let mut out = String::from("Daily summary\n");
    for (label, value, target, unit) in rows {
        let shown = if unit == "kcal" {
            format!("{:.0}", value)
        } else {
            format!("{:.1}", value)
        };
        let _ = writeln!(
            out,
            "  {:<9}{:>8} / {} {} ({}%)",
            label,
            shown,
            target,
            unit,
            percent_of(value, target)
        );
    }
    out
}

fn item_line(item: &FoodItem) -> String {
    let measure = match item.grams_per_piece() {
        Some(gpp) => format!("meal, 1 pc = {:.0} g", gpp),
        None => format!("per 100 {}", item.unit.as_str()),
    };
    format!(
        "{}  {} [{}] ({}): {}",
        item.id,
        item.name,
        item.category,
        measure,
        chip(&item.per100)
    )
}

pub fn render_library(items: &[&FoodItem]) -> String {
    if items.is_empty() {
        return "Library is empty.\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}", item_line(item));
    }
    out
}

/// Pot lines, totals and the blended per-100 profile
pub fn render_pot(pot: &CookingPot, library: &Library) -> String {
    let mut out = String::new();
    if let Some(id) = pot.editing_meal_id() {
        let name = library.get(id).map(|m| m.name.as_str()).unwrap_or(id);
        let _ = writeln!(out, "Editing meal: {}", name);
    }
    if pot.is_empty() {
        out.push_str("Pot is empty.\n");
        return out;
    }

    for line in pot.lines() {
        match library.get(&line.id) {
            Some(item) => {
                let unit = if item.is_meal() { "pc" } else { item.unit.as_str() };
                let _ = writeln!(
                    out,
                    "  {}  {} {}  {}",
                    item.name,
                    line.amount,
                    unit,
                    chip(&item.nutrition_for(line.amount))
                );
            }
            None => {
                let _ = writeln!(out, "  {} (deleted)", line.id);
            }
        }
    }

    let totals = pot.totals(library);
    let _ = writeln!(out, "Total {:.0} g: {}", totals.total_grams, chip(&totals.nutrition));
    if let Some(per100) = pot.per100(library) {
        let _ = writeln!(out, "Per 100 g: {}", chip(&per100));
    }
    out
}
