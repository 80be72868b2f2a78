//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The view-model
//! owns the task list; this store only mirrors what it publishes.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_core::{ListStatus, ListView, Task};

/// Rendered application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Tasks as currently shown (optimistic changes included)
    pub tasks: Vec<Task>,
    /// Loading / pending / settled
    pub status: ListStatus,
    /// Message of the last failure, until dismissed
    pub error: Option<String>,
    /// Whether a load has ever succeeded
    pub loaded: bool,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy a view-model snapshot into the store
pub fn store_apply_view(store: &AppStore, view: &ListView) {
    *store.tasks().write() = view.tasks.clone();
    *store.status().write() = view.status;
    *store.error().write() = view.last_error.as_ref().map(|e| e.to_string());
    *store.loaded().write() = view.loaded;
}

/// True until the first load has come back
pub fn store_is_initial_loading(store: &AppStore) -> bool {
    !store.loaded().get() && store.status().get() == ListStatus::Loading
}

/// (total, completed) counts for the footer
pub fn store_task_counts(store: &AppStore) -> (usize, usize) {
    let tasks = store.tasks().read();
    let completed = tasks.iter().filter(|t| t.completed).count();
    (tasks.len(), completed)
}
