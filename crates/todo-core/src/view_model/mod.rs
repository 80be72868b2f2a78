//! Task View-Model
//!
//! Owns the task list and mediates between UI intent and the remote
//! service. Every mutation follows the same path: snapshot the current
//! list, apply the change locally and notify listeners, call the service,
//! then settle by accepting the confirmed data or rolling back.
//!
//! Single-threaded by construction: state lives behind `Rc<RefCell<_>>`
//! and no borrow is held across an `.await`.

mod state;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use log::warn;

use crate::config::ViewModelConfig;
use crate::domain::{NewTask, Task, TaskError, TaskId, TaskResult};
use crate::service::TaskService;

pub use state::{
    Confirmation, ListStatus, ListView, LoadTicket, Mutation, Outcome, PendingMutation,
    TaskListState,
};

type Listener = Rc<dyn Fn(&ListView)>;

/// Optimistic, eventually-consistent view of the remote task list
pub struct TaskViewModel<S> {
    service: Rc<S>,
    state: Rc<RefCell<TaskListState>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
    config: ViewModelConfig,
}

impl<S> Clone for TaskViewModel<S> {
    fn clone(&self) -> Self {
        Self {
            service: Rc::clone(&self.service),
            state: Rc::clone(&self.state),
            listeners: Rc::clone(&self.listeners),
            config: self.config,
        }
    }
}

impl<S: TaskService> TaskViewModel<S> {
    pub fn new(service: S) -> Self {
        Self::with_config(service, ViewModelConfig::default())
    }

    pub fn with_config(service: S, config: ViewModelConfig) -> Self {
        Self {
            service: Rc::new(service),
            state: Rc::new(RefCell::new(TaskListState::new())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            config,
        }
    }

    /// Call `listener` with a fresh view after every state change
    pub fn subscribe(&self, listener: impl Fn(&ListView) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn view(&self) -> ListView {
        self.state.borrow().view()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks().to_vec()
    }

    pub fn status(&self) -> ListStatus {
        self.state.borrow().status()
    }

    pub fn last_error(&self) -> Option<TaskError> {
        self.state.borrow().last_error().cloned()
    }

    /// Dismiss the error indicator
    pub fn clear_error(&self) {
        self.state.borrow_mut().clear_error();
        self.notify();
    }

    /// Fetch the list from the service.
    ///
    /// On failure the previous list stays and the error is recorded.
    pub async fn load(&self) -> TaskResult<Vec<Task>> {
        let ticket = self.state.borrow_mut().begin_load();
        self.notify();
        let result = self.service.list().await;
        let result = self.state.borrow_mut().finish_load(ticket, result);
        self.notify();
        result
    }

    /// Append a task. Blank titles are rejected without touching the list.
    pub async fn add(&self, title: &str) -> TaskResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let pending = self.state.borrow_mut().begin_add(title, now_ms)?;
        self.run(pending).await
    }

    /// Flip a task's completion status
    pub async fn toggle(&self, id: TaskId) -> TaskResult<()> {
        let pending = self.state.borrow_mut().begin_toggle(id)?;
        self.run(pending).await
    }

    /// Delete a task
    pub async fn remove(&self, id: TaskId) -> TaskResult<()> {
        let pending = self.state.borrow_mut().begin_remove(id)?;
        self.run(pending).await
    }

    /// Issue the service call for an applied mutation and settle it
    async fn run(&self, pending: PendingMutation) -> TaskResult<()> {
        self.notify();

        let result = match pending.mutation() {
            Mutation::Add { provisional } => self
                .service
                .create(&NewTask::new(provisional.title.clone()))
                .await
                .map(Confirmation::Created),
            Mutation::Toggle { after, .. } => {
                self.service.update(after).await.map(Confirmation::Updated)
            }
            Mutation::Remove { removed, .. } => self
                .service
                .delete(removed.id)
                .await
                .map(|()| Confirmation::Deleted),
        };
        let failure = result.as_ref().err().cloned();

        let refetch = self
            .state
            .borrow_mut()
            .settle(pending, result, self.config.reconcile);
        self.notify();

        if let Some(err) = failure {
            return Err(err);
        }
        if refetch {
            // The mutation itself went through; a failed refresh only
            // leaves the optimistic list in place
            if let Err(err) = self.load().await {
                warn!("Refresh after mutation failed: {}", err);
            }
        }
        Ok(())
    }

    fn notify(&self) {
        let view = self.state.borrow().view();
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&view);
        }
    }
}
