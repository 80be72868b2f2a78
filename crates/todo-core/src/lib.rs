//! Todo Core
//!
//! Layered architecture:
//! - domain: task records and errors
//! - service: the remote task store (HTTP, in-memory)
//! - view_model: optimistic task list over a service
//! - config: service and reconciliation settings

pub mod config;
pub mod domain;
pub mod service;
pub mod view_model;

pub use config::{ReconcileStrategy, ServiceConfig, ViewModelConfig};
pub use domain::{NewTask, Task, TaskError, TaskId, TaskResult};
pub use service::{HttpTaskService, InMemoryTaskService, TaskService};
pub use view_model::{ListStatus, ListView, Outcome, TaskViewModel};
