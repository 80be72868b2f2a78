//! UI Components
//!
//! Reusable Leptos components.

mod new_task_form;
mod task_table;
mod task_row;
mod status_badge;
mod error_banner;

pub use new_task_form::NewTaskForm;
pub use task_table::TaskTable;
pub use task_row::TaskRow;
pub use status_badge::StatusBadge;
pub use error_banner::ErrorBanner;
