//! Application Context
//!
//! Shared handle to the task view-model, provided via Leptos Context API.
//! Each action spawns the view-model operation on the local executor;
//! results reach the UI through the store subscription set up in `App`.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::{HttpTaskService, TaskId, TaskViewModel};

pub type TodoViewModel = TaskViewModel<HttpTaskService>;

/// App-wide actions provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Not `Send`, so it lives in local arena storage
    vm: StoredValue<TodoViewModel, LocalStorage>,
}

impl AppContext {
    pub fn new(vm: TodoViewModel) -> Self {
        Self {
            vm: StoredValue::new_local(vm),
        }
    }

    /// Fetch the task list
    pub fn load(&self) {
        let vm = self.vm.get_value();
        spawn_local(async move {
            match vm.load().await {
                Ok(tasks) => log::info!("[APP] Loaded {} tasks", tasks.len()),
                Err(e) => log::error!("[APP] Failed to load tasks: {}", e),
            }
        });
    }

    /// Add a task with the given title
    pub fn add(&self, title: String) {
        let vm = self.vm.get_value();
        spawn_local(async move {
            if let Err(e) = vm.add(&title).await {
                log::warn!("[APP] Add failed: {}", e);
            }
        });
    }

    /// Flip completion of a task
    pub fn toggle(&self, id: TaskId) {
        let vm = self.vm.get_value();
        spawn_local(async move {
            if let Err(e) = vm.toggle(id).await {
                log::warn!("[APP] Toggle of {} failed: {}", id, e);
            }
        });
    }

    /// Delete a task
    pub fn remove(&self, id: TaskId) {
        let vm = self.vm.get_value();
        spawn_local(async move {
            if let Err(e) = vm.remove(id).await {
                log::warn!("[APP] Delete of {} failed: {}", id, e);
            }
        });
    }

    /// Dismiss the error banner
    pub fn clear_error(&self) {
        self.vm.with_value(|vm| vm.clear_error());
    }
}
