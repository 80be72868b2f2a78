//! Task List State
//!
//! The synchronous half of the view-model: the list itself plus the
//! snapshot / apply / settle bookkeeping. No I/O happens here, so every
//! transition can be driven and inspected step by step.
//!
//! The shown list is always rebuilt the same way: start from the confirmed
//! base (last load plus every settled mutation folded in), then replay the
//! mutation log in the order the mutations began. A failed mutation is
//! dropped from the log; a confirmed one stays in place until everything
//! before it has settled, so later mutations keep the last word.

use log::{debug, warn};

use crate::config::ReconcileStrategy;
use crate::domain::{Task, TaskError, TaskId, TaskResult};

/// How the most recent mutation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Coarse state shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    /// At least one mutation is optimistically applied and unconfirmed
    Pending,
    Settled(Outcome),
}

/// Everything a renderer needs, detached from the live state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListView {
    pub tasks: Vec<Task>,
    pub status: ListStatus,
    pub last_error: Option<TaskError>,
    /// True once a load has succeeded
    pub loaded: bool,
}

/// An optimistic change and what it replaced
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Add { provisional: Task },
    Toggle { before: Task, after: Task },
    Remove { removed: Task },
}

impl Mutation {
    /// Point the mutation at a new id for the same record
    fn rename(&mut self, from: TaskId, to: TaskId) {
        let records = match self {
            Mutation::Add { provisional } => vec![provisional],
            Mutation::Toggle { before, after } => vec![before, after],
            Mutation::Remove { removed } => vec![removed],
        };
        for task in records.into_iter().filter(|t| t.id == from) {
            task.id = to;
        }
    }
}

/// What the service confirmed
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    Created(Task),
    Updated(Task),
    Deleted,
}

/// A mutation that has been applied locally and awaits settlement
#[derive(Debug)]
pub struct PendingMutation {
    seq: u64,
    snapshot: Vec<Task>,
    mutation: Mutation,
}

impl PendingMutation {
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    /// The list as it was immediately before the optimistic apply
    pub fn snapshot(&self) -> &[Task] {
        &self.snapshot
    }
}

/// Handed out by `begin_load`, redeemed by `finish_load`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq)]
enum Settlement {
    Pending,
    /// `Some` carries the service reply to adopt, `None` keeps the
    /// optimistic effect
    Confirmed(Option<Confirmation>),
}

/// One mutation in the replay log
#[derive(Debug)]
struct LogEntry {
    seq: u64,
    mutation: Mutation,
    settlement: Settlement,
}

impl LogEntry {
    fn is_pending(&self) -> bool {
        self.settlement == Settlement::Pending
    }

    fn apply(&self, tasks: &mut Vec<Task>) {
        let reply = match &self.settlement {
            Settlement::Confirmed(Some(confirmation)) => Some(confirmation),
            _ => None,
        };
        match (&self.mutation, reply) {
            (Mutation::Add { .. }, Some(Confirmation::Created(created))) => {
                tasks.push(created.clone());
            }
            (Mutation::Add { provisional }, _) => tasks.push(provisional.clone()),
            (Mutation::Toggle { after, .. }, reply) => {
                if let Some(task) = tasks.iter_mut().find(|t| t.id == after.id) {
                    match reply {
                        Some(Confirmation::Updated(updated)) => {
                            *task = Task {
                                id: after.id,
                                ..updated.clone()
                            };
                        }
                        _ => task.completed = after.completed,
                    }
                }
            }
            (Mutation::Remove { removed }, _) => tasks.retain(|t| t.id != removed.id),
        }
    }
}

/// In-memory task list with optimistic mutation tracking
#[derive(Debug, Default)]
pub struct TaskListState {
    /// Confirmed list: last load with every folded settlement applied
    base: Vec<Task>,
    /// `base` with the log replayed; what the user sees
    tasks: Vec<Task>,
    /// Unsettled mutations and confirmed ones waiting on an older one,
    /// in the order they began
    log: Vec<LogEntry>,
    next_seq: u64,
    /// Bumped on every change to `tasks`
    revision: u64,
    loads_in_flight: usize,
    last_outcome: Option<Outcome>,
    last_error: Option<TaskError>,
    last_provisional: TaskId,
    loaded: bool,
}

impl TaskListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known list, as if it had just been loaded
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            base: tasks.clone(),
            tasks,
            loaded: true,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn last_error(&self) -> Option<&TaskError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn status(&self) -> ListStatus {
        if self.log.iter().any(LogEntry::is_pending) {
            ListStatus::Pending
        } else if self.loads_in_flight > 0 {
            ListStatus::Loading
        } else {
            self.last_outcome
                .map(ListStatus::Settled)
                .unwrap_or(ListStatus::Idle)
        }
    }

    pub fn view(&self) -> ListView {
        ListView {
            tasks: self.tasks.clone(),
            status: self.status(),
            last_error: self.last_error.clone(),
            loaded: self.loaded,
        }
    }

    // ========================
    // Loading
    // ========================

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads_in_flight += 1;
        LoadTicket(self.revision)
    }

    /// Accept a fetched list unless something changed the list since the
    /// load began or a mutation is still unconfirmed. Returns the list as
    /// it stands afterwards.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: TaskResult<Vec<Task>>,
    ) -> TaskResult<Vec<Task>> {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        match result {
            Ok(tasks) => {
                if ticket.0 == self.revision && self.log.is_empty() {
                    debug!("Loaded {} tasks", tasks.len());
                    self.base = tasks;
                    self.rebuild();
                    self.loaded = true;
                    self.last_error = None;
                } else {
                    debug!("Discarding superseded load (revision {} -> {})", ticket.0, self.revision);
                }
                Ok(self.tasks.clone())
            }
            Err(err) => {
                warn!("Failed to load tasks: {}", err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ========================
    // Optimistic apply
    // ========================

    pub fn begin_add(&mut self, title: &str, now_ms: i64) -> TaskResult<PendingMutation> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::invalid_input("task title is blank"));
        }
        let provisional = Task::new(self.next_provisional_id(now_ms), title);
        Ok(self.begin(Mutation::Add { provisional }))
    }

    pub fn begin_toggle(&mut self, id: TaskId) -> TaskResult<PendingMutation> {
        let before = self.find(id)?.clone();
        let after = before.toggled();
        Ok(self.begin(Mutation::Toggle { before, after }))
    }

    pub fn begin_remove(&mut self, id: TaskId) -> TaskResult<PendingMutation> {
        let removed = self.find(id)?.clone();
        Ok(self.begin(Mutation::Remove { removed }))
    }

    fn find(&self, id: TaskId) -> TaskResult<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound { id })
    }

    fn begin(&mut self, mutation: Mutation) -> PendingMutation {
        let seq = self.next_seq;
        self.next_seq += 1;
        let snapshot = self.tasks.clone();
        self.log.push(LogEntry {
            seq,
            mutation: mutation.clone(),
            settlement: Settlement::Pending,
        });
        self.rebuild();
        debug!("Optimistic {:?} at revision {}", mutation, self.revision);
        PendingMutation {
            seq,
            snapshot,
            mutation,
        }
    }

    // ========================
    // Settlement
    // ========================

    /// Reconcile a pending mutation with its result.
    ///
    /// Returns true when the caller should re-fetch the list to finish
    /// settling (successful mutation under `ReconcileStrategy::Refetch`).
    pub fn settle(
        &mut self,
        pending: PendingMutation,
        result: TaskResult<Confirmation>,
        reconcile: ReconcileStrategy,
    ) -> bool {
        let Some(pos) = self.log.iter().position(|e| e.seq == pending.seq) else {
            warn!("Settling unknown mutation {:?}", pending.mutation);
            return false;
        };
        match result {
            Err(err) => {
                warn!("Rolling back {:?}: {}", pending.mutation, err);
                self.log.remove(pos);
                self.last_outcome = Some(Outcome::Failure);
                self.last_error = Some(err);
                self.rebuild();
                false
            }
            Ok(confirmation) => {
                self.last_outcome = Some(Outcome::Success);
                let refetch = reconcile == ReconcileStrategy::Refetch;
                let adopted = if refetch {
                    None
                } else {
                    self.adopt(pos, confirmation)
                };
                self.log[pos].settlement = Settlement::Confirmed(adopted);
                self.rebuild();
                refetch
            }
        }
    }

    /// Shape a service reply for replay. A created record takes its server
    /// id unless another listed record already has it; later mutations on
    /// the provisional record follow the new id.
    fn adopt(&mut self, pos: usize, confirmation: Confirmation) -> Option<Confirmation> {
        let mutation = self.log[pos].mutation.clone();
        match (&mutation, confirmation) {
            (Mutation::Add { provisional }, Confirmation::Created(created)) => {
                let provisional_id = provisional.id;
                let collides = created.id != provisional_id
                    && self
                        .base
                        .iter()
                        .chain(self.tasks.iter())
                        .any(|t| t.id == created.id);
                let id = if collides {
                    warn!(
                        "Server id {} already listed, keeping provisional id {}",
                        created.id, provisional_id
                    );
                    provisional_id
                } else {
                    created.id
                };
                if id != provisional_id {
                    for entry in &mut self.log[pos + 1..] {
                        entry.mutation.rename(provisional_id, id);
                    }
                }
                Some(Confirmation::Created(Task { id, ..created }))
            }
            (Mutation::Toggle { .. }, confirmation @ Confirmation::Updated(_))
            | (Mutation::Remove { .. }, confirmation @ Confirmation::Deleted) => {
                Some(confirmation)
            }
            (mutation, confirmation) => {
                warn!("Mismatched confirmation {:?} for {:?}", confirmation, mutation);
                None
            }
        }
    }

    /// Fold the settled head of the log into the base, then replay the
    /// rest. The revision moves only when the shown list changes.
    fn rebuild(&mut self) {
        while self.log.first().is_some_and(|e| !e.is_pending()) {
            let entry = self.log.remove(0);
            entry.apply(&mut self.base);
        }
        let mut tasks = self.base.clone();
        for entry in &self.log {
            entry.apply(&mut tasks);
        }
        if tasks != self.tasks {
            self.tasks = tasks;
            self.revision += 1;
        }
    }

    /// Wall-clock millis, bumped past earlier provisional ids and every
    /// known id so the list never holds two records with the same id
    fn next_provisional_id(&mut self, now_ms: i64) -> TaskId {
        let mut id = TaskId::try_from(now_ms)
            .unwrap_or(0)
            .max(self.last_provisional + 1);
        while self.base.iter().chain(self.tasks.iter()).any(|t| t.id == id) {
            id += 1;
        }
        self.last_provisional = id;
        id
    }
}
