//! In-Memory Task Service
//!
//! Behaves like the remote store (sequential ids, page limit, 404 on
//! unknown ids) without a network. Failures can be scripted per call and
//! every call is recorded, which is what the view-model tests lean on.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;

use super::TaskService;
use crate::config::DEFAULT_PAGE_LIMIT;
use crate::domain::{NewTask, Task, TaskError, TaskId, TaskResult};

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    List,
    Create(NewTask),
    Update(Task),
    Delete(TaskId),
}

/// Task store held in process memory
#[derive(Debug)]
pub struct InMemoryTaskService {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<TaskId>,
    page_limit: usize,
    /// Per-call script: `None` lets the call through
    script: RefCell<VecDeque<Option<TaskError>>>,
    calls: RefCell<Vec<ServiceCall>>,
}

impl Default for InMemoryTaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskService {
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Seed the store; new ids continue after the highest seeded id
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            tasks: RefCell::new(tasks),
            next_id: Cell::new(next_id),
            page_limit: DEFAULT_PAGE_LIMIT as usize,
            script: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Make the next unscripted call fail with `err`
    pub fn fail_next(&self, err: TaskError) {
        self.script.borrow_mut().push_back(Some(err));
    }

    /// Let `successes` calls through, then fail the one after
    pub fn fail_next_after(&self, successes: usize, err: TaskError) {
        let mut script = self.script.borrow_mut();
        script.extend((0..successes).map(|_| None));
        script.push_back(Some(err));
    }

    /// Everything currently stored, ignoring the page limit
    pub fn stored(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: ServiceCall) -> TaskResult<()> {
        self.calls.borrow_mut().push(call);
        match self.script.borrow_mut().pop_front().flatten() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl TaskService for InMemoryTaskService {
    async fn list(&self) -> TaskResult<Vec<Task>> {
        self.record(ServiceCall::List)?;
        Ok(self
            .tasks
            .borrow()
            .iter()
            .take(self.page_limit)
            .cloned()
            .collect())
    }

    async fn create(&self, task: &NewTask) -> TaskResult<Task> {
        self.record(ServiceCall::Create(task.clone()))?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let created = task.with_id(id);
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update(&self, task: &Task) -> TaskResult<Task> {
        self.record(ServiceCall::Update(task.clone()))?;
        let mut tasks = self.tasks.borrow_mut();
        let stored = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(TaskError::Status { status: 404 })?;
        *stored = task.clone();
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> TaskResult<()> {
        self.record(ServiceCall::Delete(id))?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(TaskError::Status { status: 404 });
        }
        Ok(())
    }
}
