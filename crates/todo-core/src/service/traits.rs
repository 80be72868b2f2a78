//! Service Layer - Core Trait
//!
//! Defines the abstract interface to the remote task store.
//! Implementations can speak HTTP, live in memory, etc.

use std::rc::Rc;

use async_trait::async_trait;

use crate::domain::{NewTask, Task, TaskId, TaskResult};

/// CRUD operations against the remote task store
///
/// Futures are not `Send`: in the browser they run on the single JS thread
/// via `spawn_local`, and the view-model that drives them is `Rc`-based.
#[async_trait(?Send)]
pub trait TaskService {
    /// Fetch the current page of tasks
    async fn list(&self) -> TaskResult<Vec<Task>>;

    /// Create a task, returning the stored record with its server id
    async fn create(&self, task: &NewTask) -> TaskResult<Task>;

    /// Replace a task with the given full record
    async fn update(&self, task: &Task) -> TaskResult<Task>;

    /// Delete a task by ID
    async fn delete(&self, id: TaskId) -> TaskResult<()>;
}

#[async_trait(?Send)]
impl<S: TaskService + ?Sized> TaskService for Rc<S> {
    async fn list(&self) -> TaskResult<Vec<Task>> {
        (**self).list().await
    }

    async fn create(&self, task: &NewTask) -> TaskResult<Task> {
        (**self).create(task).await
    }

    async fn update(&self, task: &Task) -> TaskResult<Task> {
        (**self).update(task).await
    }

    async fn delete(&self, id: TaskId) -> TaskResult<()> {
        (**self).delete(id).await
    }
}
