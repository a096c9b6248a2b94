//! Food library
//!
//! The user's catalog of ingredients and meals. Names are unique ignoring
//! case. Day entries copy from here; nothing here points at the day.

use serde::{Deserialize, Serialize};

use super::{FoodItem, FoodItemCreate, ValidationErrors};

const DUPLICATE_NAME: &str = "An item with this name already exists.";

/// Library filter; a search query wins over category, category over type
#[derive(Debug, Clone, Default)]
pub struct LibraryFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    /// `ingredient` or `meal`
    pub kind: Option<String>,
}

/// Ordered collection of food items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    items: Vec<FoodItem>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<FoodItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FoodItem> {
        self.items.iter().find(|x| x.id == id)
    }

    /// Look up by id, then by exact name ignoring case
    pub fn find(&self, id_or_name: &str) -> Option<&FoodItem> {
        self.get(id_or_name)
            .or_else(|| self.items.iter().find(|x| x.has_name(id_or_name)))
    }

    /// Whether another item already uses `name`
    pub fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> bool {
        self.items
            .iter()
            .any(|x| Some(x.id.as_str()) != exclude_id && x.has_name(name))
    }

    /// Create an ingredient; returns its id
    pub fn add_ingredient(&mut self, data: &FoodItemCreate) -> Result<String, ValidationErrors> {
        let item = FoodItem::new_ingredient(data)?;
        if self.name_exists(&item.name, None) {
            return Err(ValidationErrors::single(DUPLICATE_NAME));
        }
        let id = item.id.clone();
        tracing::debug!(id = %id, name = %item.name, "Added ingredient to library");
        self.items.push(item);
        Ok(id)
    }

    /// Edit an ingredient in place. `Ok(false)` when the id is unknown.
    pub fn update_ingredient(&mut self, id: &str, data: &FoodItemCreate) -> Result<bool, ValidationErrors> {
        data.validate()?;
        if self.name_exists(&data.name, Some(id)) {
            return Err(ValidationErrors::single(DUPLICATE_NAME));
        }
        match self.items.iter_mut().find(|x| x.id == id) {
            Some(item) => {
                item.apply_ingredient_update(data)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Insert a built meal, or replace the meal with `replace_id` keeping that id
    pub fn save_meal(&mut self, mut meal: FoodItem, replace_id: Option<&str>) -> Result<String, ValidationErrors> {
        if meal.name.trim().is_empty() {
            return Err(ValidationErrors::single("Name is required."));
        }
        if self.name_exists(&meal.name, replace_id) {
            return Err(ValidationErrors::single(DUPLICATE_NAME));
        }

        if let Some(id) = replace_id {
            if let Some(slot) = self.items.iter_mut().find(|x| x.id == id) {
                meal.id = id.to_string();
                *slot = meal;
                return Ok(id.to_string());
            }
        }

        let id = meal.id.clone();
        self.items.push(meal);
        Ok(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|x| x.id != id);
        self.items.len() != before
    }

    /// Move `src_id` next to `dest_id`; an unknown destination appends
    pub fn move_item(&mut self, src_id: &str, dest_id: &str, before: bool) -> bool {
        if src_id == dest_id {
            return false;
        }
        let Some(from) = self.items.iter().position(|x| x.id == src_id) else {
            return false;
        };
        let moved = self.items.remove(from);

        match self.items.iter().position(|x| x.id == dest_id) {
            Some(to) => {
                let at = if before { to } else { to + 1 };
                self.items.insert(at, moved);
            }
            None => self.items.push(moved),
        }
        true
    }

    /// Append items whose names are new; returns how many were added
    pub fn merge(&mut self, incoming: Vec<FoodItem>) -> usize {
        let mut added = 0;
        for item in incoming {
            if item.name.trim().is_empty() || self.name_exists(&item.name, None) {
                continue;
            }
            self.items.push(item);
            added += 1;
        }
        added
    }

    pub fn filter(&self, filter: &LibraryFilter) -> Vec<&FoodItem> {
        let query = filter
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        if let Some(q) = query {
            return self
                .items
                .iter()
                .filter(|x| x.name.to_lowercase().contains(&q))
                .collect();
        }

        if let Some(category) = filter.category.as_deref().filter(|c| *c != "all") {
            return self.items.iter().filter(|x| x.category == category).collect();
        }

        if let Some(kind) = filter.kind.as_deref().filter(|k| *k != "all") {
            return self.items.iter().filter(|x| x.type_str() == kind).collect();
        }

        self.items.iter().collect()
    }
}
