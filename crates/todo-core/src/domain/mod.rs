//! Domain Layer
//!
//! Task records and the error type shared by the service and view-model layers.

mod error;
mod task;

pub use error::{TaskError, TaskResult};
pub use task::{NewTask, Task, TaskId};
