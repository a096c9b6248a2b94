//! Application state container
//!
//! All state changes go through `Store::dispatch`: the action is reduced
//! into the state, the touched parts are written to the database, then
//! subscribers are notified. Storage writes are best effort; a failed write
//! is logged and the in-memory state stays authoritative.

use thiserror::Error;

use crate::db::state::{load_state, load_value, save_state, DAY_KEY, LIBRARY_KEY, POT_KEY, TARGETS_KEY};
use crate::db::{Database, DbResult};
use crate::document::{library_state, restore_day, restore_library, seed_day};
use crate::models::{
    Category, CookingPot, DailyTargets, DayBoard, DayEntryUpdate, FoodItem, FoodItemCreate, Library,
    TargetsUpdate, ValidationErrors,
};

/// Everything the app keeps between runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub day: DayBoard,
    pub library: Library,
    pub targets: DailyTargets,
    pub pot: CookingPot,
}

impl AppState {
    /// Fresh install: demo day, empty library, default targets
    pub fn seeded() -> Self {
        Self {
            day: seed_day(),
            ..Self::default()
        }
    }
}

/// A user event
#[derive(Debug, Clone)]
pub enum Action {
    /// Copy a library item (by id or name) onto the day
    AddFromLibrary { item: String, category: Category, amount: f64 },
    /// New day entry straight from the food form, amount 0
    CreateEntry { category: Category, data: FoodItemCreate },
    SetAmount { id: String, amount: f64 },
    /// Drag an entry to `index` within `category`
    MoveEntry { id: String, category: Category, index: usize },
    RemoveEntry { id: String },
    EditEntry { id: String, category: Option<Category>, data: FoodItemCreate },
    ResetCategory(Category),
    ClearCategory(Category),
    ResetDay,
    ClearDay,
    /// Wholesale replacement, as after an import
    ReplaceDay(DayBoard),

    SetTargets(TargetsUpdate),
    ResetTargets,

    CreateIngredient(FoodItemCreate),
    UpdateIngredient { id: String, data: FoodItemCreate },
    /// Delete a library item; it also leaves the pot
    DeleteFood { id: String },
    MoveFood { id: String, target: String, before: bool },
    MergeLibrary(Vec<FoodItem>),

    AddToPot { item: String },
    SetPotAmount { id: String, amount: f64 },
    RemoveFromPot { id: String },
    ClearPot,
    /// Load a saved meal's components into the pot
    EditMeal { id: String },
    /// Save the pot as a meal, replacing the meal being edited if any
    SaveMeal { name: String },
    /// Save the pot's blended profile as a new ingredient
    SavePotAsIngredient { name: String, category: Option<String> },
}

const MEAL_CARD_EDIT: &str = "Meal cards cannot be edited; move them or change the amount.";

/// Why an action was rejected; the state is unchanged
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0} is not a meal")]
    NotAMeal(String),

    #[error("The cooking pot is empty")]
    EmptyPot,
}

/// Which parts of the state an action touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub day: bool,
    pub library: bool,
    pub targets: bool,
    pub pot: bool,
}

impl Changes {
    const DAY: Self = Self { day: true, library: false, targets: false, pot: false };
    const LIBRARY: Self = Self { day: false, library: true, targets: false, pot: false };
    const TARGETS: Self = Self { day: false, library: false, targets: true, pot: false };
    const POT: Self = Self { day: false, library: false, targets: false, pot: true };
    const LIBRARY_AND_POT: Self = Self { day: false, library: true, targets: false, pot: true };
}

fn found(ok: bool, id: &str) -> Result<(), ActionError> {
    if ok {
        Ok(())
    } else {
        Err(ActionError::NotFound(id.to_string()))
    }
}

/// Apply `action` to `state`. On error nothing has changed.
pub fn reduce(state: &mut AppState, action: &Action) -> Result<Changes, ActionError> {
    match action {
        Action::AddFromLibrary { item, category, amount } => {
            let food = state
                .library
                .find(item)
                .ok_or_else(|| ActionError::NotFound(item.clone()))?;
            state.day.add_food(food, *category, *amount);
            Ok(Changes::DAY)
        }
        Action::CreateEntry { category, data } => {
            let food = FoodItem::new_ingredient(data)?;
            state.day.add_food(&food, *category, 0.0);
            Ok(Changes::DAY)
        }
        Action::SetAmount { id, amount } => {
            found(state.day.set_amount(id, *amount), id)?;
            Ok(Changes::DAY)
        }
        Action::MoveEntry { id, category, index } => {
            found(state.day.reorder(id, *category, *index), id)?;
            Ok(Changes::DAY)
        }
        Action::RemoveEntry { id } => {
            found(state.day.remove_entry(id), id)?;
            Ok(Changes::DAY)
        }
        Action::EditEntry { id, category, data } => {
            let entry = state.day.get(id).ok_or_else(|| ActionError::NotFound(id.clone()))?;
            // a meal card's profile comes from the pot; edit the meal instead
            if entry.is_meal() {
                return Err(ValidationErrors::single(MEAL_CARD_EDIT).into());
            }
            let fields = FoodItem::new_ingredient(data)?;
            let update = DayEntryUpdate {
                name: Some(fields.name),
                category: *category,
                unit: Some(fields.unit),
                max: Some(fields.max),
                per100: Some(fields.per100),
            };
            state.day.edit_entry(id, &update);
            Ok(Changes::DAY)
        }
        Action::ResetCategory(category) => {
            state.day.reset_category(*category);
            Ok(Changes::DAY)
        }
        Action::ClearCategory(category) => {
            state.day.clear_category(*category);
            Ok(Changes::DAY)
        }
        Action::ResetDay => {
            state.day.reset_all();
            Ok(Changes::DAY)
        }
        Action::ClearDay => {
            state.day.clear();
            Ok(Changes::DAY)
        }
        Action::ReplaceDay(board) => {
            state.day = board.clone();
            Ok(Changes::DAY)
        }

        Action::SetTargets(update) => {
            state.targets.apply(update)?;
            Ok(Changes::TARGETS)
        }
        Action::ResetTargets => {
            state.targets = DailyTargets::default();
            Ok(Changes::TARGETS)
        }

        Action::CreateIngredient(data) => {
            state.library.add_ingredient(data)?;
            Ok(Changes::LIBRARY)
        }
        Action::UpdateIngredient { id, data } => {
            found(state.library.update_ingredient(id, data)?, id)?;
            Ok(Changes::LIBRARY)
        }
        Action::DeleteFood { id } => {
            found(state.library.remove(id), id)?;
            state.pot.remove(id);
            Ok(Changes::LIBRARY_AND_POT)
        }
        Action::MoveFood { id, target, before } => {
            found(state.library.move_item(id, target, *before), id)?;
            Ok(Changes::LIBRARY)
        }
        Action::MergeLibrary(items) => {
            let added = state.library.merge(items.clone());
            tracing::info!(added, offered = items.len(), "Merged items into library");
            Ok(Changes::LIBRARY)
        }

        Action::AddToPot { item } => {
            let food = state
                .library
                .find(item)
                .ok_or_else(|| ActionError::NotFound(item.clone()))?;
            state.pot.add_item(food);
            Ok(Changes::POT)
        }
        Action::SetPotAmount { id, amount } => {
            found(state.pot.set_amount(id, *amount, &state.library), id)?;
            Ok(Changes::POT)
        }
        Action::RemoveFromPot { id } => {
            found(state.pot.remove(id), id)?;
            Ok(Changes::POT)
        }
        Action::ClearPot => {
            state.pot.clear();
            Ok(Changes::POT)
        }
        Action::EditMeal { id } => {
            let meal = state
                .library
                .find(id)
                .ok_or_else(|| ActionError::NotFound(id.clone()))?;
            state.pot = CookingPot::load_meal(meal, &state.library)
                .ok_or_else(|| ActionError::NotAMeal(meal.name.clone()))?;
            Ok(Changes::POT)
        }
        Action::SaveMeal { name } => {
            let meal = state
                .pot
                .build_meal(name, &state.library)
                .ok_or(ActionError::EmptyPot)?;
            let replace = state.pot.editing_meal_id().map(str::to_owned);
            state.library.save_meal(meal, replace.as_deref())?;
            state.pot.clear();
            Ok(Changes::LIBRARY_AND_POT)
        }
        Action::SavePotAsIngredient { name, category } => {
            let mut form = state
                .pot
                .ingredient_prefill(&state.library)
                .ok_or(ActionError::EmptyPot)?;
            form.name = name.clone();
            form.category = category.clone();
            state.library.add_ingredient(&form)?;
            Ok(Changes::LIBRARY)
        }
    }
}

/// Handle returned by `Store::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&AppState, &Action)>;

/// State plus subscribers plus optional write-through storage
pub struct Store {
    state: AppState,
    database: Option<Database>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl Store {
    /// In-memory store, nothing persisted
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            database: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Load stored state; missing or unreadable parts fall back to defaults
    pub fn open(database: Database) -> Self {
        let state = match database.with_conn(load_app_state) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load stored state, starting fresh");
                AppState::seeded()
            }
        };
        Self {
            database: Some(database),
            ..Self::new(state)
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&AppState, &Action) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Reduce, persist, notify
    pub fn dispatch(&mut self, action: Action) -> Result<Changes, ActionError> {
        tracing::debug!(?action, "Dispatching action");
        let changes = reduce(&mut self.state, &action)?;
        self.persist(changes);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state, &action);
        }
        Ok(changes)
    }

    fn persist(&self, changes: Changes) {
        let Some(db) = &self.database else {
            return;
        };
        let state = &self.state;
        let result = db.with_conn(|conn| {
            if changes.day {
                save_state(conn, DAY_KEY, &state.day)?;
            }
            if changes.library {
                save_state(conn, LIBRARY_KEY, &library_state(&state.library))?;
            }
            if changes.targets {
                save_state(conn, TARGETS_KEY, &state.targets)?;
            }
            if changes.pot {
                save_state(conn, POT_KEY, &state.pot)?;
            }
            Ok(())
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to save state");
        }
    }
}

fn load_app_state(conn: &rusqlite::Connection) -> DbResult<AppState> {
    let day = match load_value(conn, DAY_KEY) {
        Ok(Some(v)) => restore_day(v),
        Ok(None) => seed_day(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored day unreadable, using demo day");
            seed_day()
        }
    };
    let library = match load_value(conn, LIBRARY_KEY) {
        Ok(v) => v.map(restore_library).unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored library unreadable");
            Library::default()
        }
    };
    let targets = load_state::<DailyTargets>(conn, TARGETS_KEY).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored targets unreadable");
        None
    });
    let pot = load_state::<CookingPot>(conn, POT_KEY).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored pot unreadable");
        None
    });

    Ok(AppState {
        day,
        library,
        targets: targets.unwrap_or_default(),
        pot: pot.unwrap_or_default(),
    })
}
