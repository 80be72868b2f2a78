//! View-Model Integration Tests
//!
//! Drives `TaskViewModel` against the in-memory service.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::*;
use crate::config::ReconcileStrategy;
use crate::service::{InMemoryTaskService, ServiceCall};

fn task(id: TaskId, title: &str, completed: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed,
        user_id: None,
    }
}

async fn loaded(seed: Vec<Task>) -> (Rc<InMemoryTaskService>, TaskViewModel<Rc<InMemoryTaskService>>) {
    let service = Rc::new(InMemoryTaskService::with_tasks(seed));
    let vm = TaskViewModel::new(Rc::clone(&service));
    vm.load().await.expect("initial load");
    (service, vm)
}

/// Holds each mutating call on its own gate, handed out in call order.
/// Sending `false` fails the call.
struct GatedService {
    inner: InMemoryTaskService,
    gates: RefCell<VecDeque<oneshot::Receiver<bool>>>,
    waiting: Cell<usize>,
}

impl GatedService {
    fn new(inner: InMemoryTaskService, calls: usize) -> (Rc<Self>, Vec<oneshot::Sender<bool>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..calls).map(|_| oneshot::channel()).unzip();
        let service = Self {
            inner,
            gates: RefCell::new(receivers),
            waiting: Cell::new(0),
        };
        (Rc::new(service), senders)
    }

    /// Number of calls that have reached their gate
    fn waiting(&self) -> usize {
        self.waiting.get()
    }

    async fn wait(&self) -> TaskResult<()> {
        let gate = self.gates.borrow_mut().pop_front();
        self.waiting.set(self.waiting.get() + 1);
        match gate {
            Some(rx) => match rx.await {
                Ok(true) => Ok(()),
                _ => Err(TaskError::network("connection reset")),
            },
            None => Ok(()),
        }
    }
}

/// Yield to the other joined futures until `cond` holds
async fn until(cond: impl Fn() -> bool) {
    while !cond() {
        tokio::task::yield_now().await;
    }
}

#[async_trait(?Send)]
impl TaskService for GatedService {
    async fn list(&self) -> TaskResult<Vec<Task>> {
        self.inner.list().await
    }

    async fn create(&self, new: &NewTask) -> TaskResult<Task> {
        self.wait().await?;
        self.inner.create(new).await
    }

    async fn update(&self, task: &Task) -> TaskResult<Task> {
        self.wait().await?;
        self.inner.update(task).await
    }

    async fn delete(&self, id: TaskId) -> TaskResult<()> {
        self.wait().await?;
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn test_load_populates_list() {
    let (_, vm) = loaded(vec![task(1, "A", false), task(2, "B", true)]).await;
    assert_eq!(vm.tasks(), vec![task(1, "A", false), task(2, "B", true)]);
    assert_eq!(vm.status(), ListStatus::Idle);
    assert!(vm.view().loaded);
}

#[tokio::test]
async fn test_load_failure_keeps_empty_list_and_reports() {
    let service = InMemoryTaskService::new();
    service.fail_next(TaskError::Status { status: 503 });
    let vm = TaskViewModel::new(service);

    let err = vm.load().await.unwrap_err();
    assert_eq!(err, TaskError::Status { status: 503 });
    assert!(vm.tasks().is_empty());
    assert_eq!(vm.last_error(), Some(TaskError::Status { status: 503 }));
}

#[tokio::test]
async fn test_toggle_optimistic_before_network_then_rollback() {
    let (service, mut gates) =
        GatedService::new(InMemoryTaskService::with_tasks(vec![task(1, "A", false)]), 1);
    let vm = TaskViewModel::new(Rc::clone(&service));
    vm.load().await.unwrap();

    let observer = vm.clone();
    let (result, ()) = tokio::join!(vm.toggle(1), async move {
        until(|| service.waiting() == 1).await;
        // The toggle is parked on the gate; the flip is already visible
        assert_eq!(observer.tasks(), vec![task(1, "A", true)]);
        assert_eq!(observer.status(), ListStatus::Pending);
        gates.remove(0).send(false).unwrap();
    });

    assert!(result.unwrap_err().is_network());
    assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
    assert_eq!(vm.status(), ListStatus::Settled(Outcome::Failure));
}

#[tokio::test]
async fn test_add_buy_milk() {
    let (service, vm) = loaded(Vec::new()).await;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    vm.subscribe(move |view| sink.borrow_mut().push(view.tasks.clone()));

    vm.add("Buy milk").await.unwrap();

    let seen = seen.borrow();
    let optimistic = &seen[0];
    assert_eq!(optimistic.len(), 1);
    assert_eq!(optimistic[0].title, "Buy milk");
    assert!(!optimistic[0].completed);

    assert_eq!(vm.tasks(), vec![task(1, "Buy milk", false)]);
    assert_eq!(vm.tasks(), service.stored());
}

#[tokio::test]
async fn test_add_blank_makes_no_call() {
    let (service, vm) = loaded(vec![task(1, "A", false)]).await;
    let calls_before = service.calls();

    let err = vm.add("   ").await.unwrap_err();
    assert!(matches!(err, TaskError::InvalidInput { .. }));
    assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
    assert_eq!(service.calls(), calls_before);
}

#[tokio::test]
async fn test_remove_optimistic_then_rollback() {
    let original = vec![task(1, "A", false), task(2, "B", false)];
    let (service, mut gates) =
        GatedService::new(InMemoryTaskService::with_tasks(original.clone()), 1);
    let vm = TaskViewModel::new(Rc::clone(&service));
    vm.load().await.unwrap();

    let observer = vm.clone();
    let (result, ()) = tokio::join!(vm.remove(1), async move {
        until(|| service.waiting() == 1).await;
        assert_eq!(observer.tasks(), vec![task(2, "B", false)]);
        gates.remove(0).send(false).unwrap();
    });

    assert!(result.is_err());
    assert_eq!(vm.tasks(), original);
}

#[tokio::test]
async fn test_failed_create_discards_provisional() {
    let (service, vm) = loaded(vec![task(1, "A", false)]).await;
    service.fail_next(TaskError::network("offline"));

    assert!(vm.add("Lost").await.is_err());
    assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
    assert_eq!(service.stored(), vec![task(1, "A", false)]);
}

#[tokio::test]
async fn test_toggle_twice_restores_value() {
    let (_, vm) = loaded(vec![task(1, "A", false)]).await;
    vm.toggle(1).await.unwrap();
    assert_eq!(vm.tasks(), vec![task(1, "A", true)]);
    vm.toggle(1).await.unwrap();
    assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
}

#[tokio::test]
async fn test_toggle_sends_full_record() {
    let mut seeded = task(3, "C", false);
    seeded.user_id = Some(1);
    let (service, vm) = loaded(vec![seeded.clone()]).await;

    vm.toggle(3).await.unwrap();
    assert_eq!(
        service.calls().last(),
        Some(&ServiceCall::Update(seeded.toggled()))
    );
}

#[tokio::test]
async fn test_successful_sequence_matches_service() {
    let (service, vm) = loaded(vec![
        task(1, "A", false),
        task(2, "B", true),
        task(3, "C", false),
    ])
    .await;

    vm.add("D").await.unwrap();
    vm.toggle(1).await.unwrap();
    vm.remove(2).await.unwrap();
    vm.add("E").await.unwrap();
    vm.toggle(4).await.unwrap();
    vm.remove(3).await.unwrap();

    let refetched = service.list().await.unwrap();
    assert_eq!(vm.tasks(), refetched);
}

#[tokio::test]
async fn test_unknown_id_leaves_everything_alone() {
    let (service, vm) = loaded(vec![task(1, "A", false)]).await;
    let calls_before = service.calls();

    assert_eq!(vm.toggle(5).await.unwrap_err(), TaskError::NotFound { id: 5 });
    assert_eq!(vm.remove(5).await.unwrap_err(), TaskError::NotFound { id: 5 });
    assert_eq!(service.calls(), calls_before);
}

#[tokio::test]
async fn test_refetch_strategy_reloads_after_success() {
    let service = Rc::new(InMemoryTaskService::with_tasks(vec![task(1, "A", false)]));
    let config = ViewModelConfig::default().with_reconcile(ReconcileStrategy::Refetch);
    let vm = TaskViewModel::with_config(Rc::clone(&service), config);
    vm.load().await.unwrap();

    vm.add("B").await.unwrap();

    assert_eq!(vm.tasks(), vec![task(1, "A", false), task(2, "B", false)]);
    let calls = service.calls();
    assert_eq!(calls.last(), Some(&ServiceCall::List));
    assert_eq!(calls.len(), 3);
}

#[tokio::test]
async fn test_refetch_failure_keeps_optimistic_list() {
    let service = Rc::new(InMemoryTaskService::with_tasks(vec![task(1, "A", false)]));
    let config = ViewModelConfig::default().with_reconcile(ReconcileStrategy::Refetch);
    let vm = TaskViewModel::with_config(Rc::clone(&service), config);
    vm.load().await.unwrap();

    // Update succeeds, the follow-up list fails
    service.fail_next_after(1, TaskError::network("offline"));
    vm.toggle(1).await.unwrap();

    assert_eq!(vm.tasks(), vec![task(1, "A", true)]);
    assert!(vm.last_error().is_some());
}

#[tokio::test]
async fn test_listeners_see_each_transition() {
    let (_, vm) = loaded(vec![task(1, "A", false)]).await;
    let statuses = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&statuses);
    vm.subscribe(move |view| sink.borrow_mut().push(view.status));

    vm.toggle(1).await.unwrap();
    vm.clear_error();

    assert_eq!(
        *statuses.borrow(),
        vec![
            ListStatus::Pending,
            ListStatus::Settled(Outcome::Success),
            ListStatus::Settled(Outcome::Success),
        ]
    );
}

#[tokio::test]
async fn test_clear_error() {
    let (service, vm) = loaded(vec![task(1, "A", false)]).await;
    service.fail_next(TaskError::Status { status: 500 });
    let _ = vm.toggle(1).await;
    assert!(vm.last_error().is_some());

    vm.clear_error();
    assert!(vm.last_error().is_none());
}

#[tokio::test]
async fn test_overlapping_toggles_settled_out_of_order() {
    let (service, gates) =
        GatedService::new(InMemoryTaskService::with_tasks(vec![task(1, "A", false)]), 2);
    let vm = TaskViewModel::new(Rc::clone(&service));
    vm.load().await.unwrap();

    let second_done = Cell::new(false);
    let [first_gate, second_gate]: [oneshot::Sender<bool>; 2] = gates.try_into().unwrap();
    let (first, second, ()) = tokio::join!(
        vm.toggle(1),
        async {
            until(|| service.waiting() == 1).await;
            let result = vm.toggle(1).await;
            second_done.set(true);
            result
        },
        async {
            until(|| service.waiting() == 2).await;
            assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
            second_gate.send(true).unwrap();
            until(|| second_done.get()).await;
            // The older toggle is still unconfirmed; the newer value shows
            assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
            first_gate.send(true).unwrap();
        }
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
    assert_eq!(vm.status(), ListStatus::Settled(Outcome::Success));
}

#[tokio::test]
async fn test_failed_toggle_then_failed_remove_restores_original() {
    let (service, gates) =
        GatedService::new(InMemoryTaskService::with_tasks(vec![task(1, "A", false)]), 2);
    let vm = TaskViewModel::new(Rc::clone(&service));
    vm.load().await.unwrap();

    let toggle_done = Cell::new(false);
    let [toggle_gate, remove_gate]: [oneshot::Sender<bool>; 2] = gates.try_into().unwrap();
    let (toggled, removed, ()) = tokio::join!(
        async {
            let result = vm.toggle(1).await;
            toggle_done.set(true);
            result
        },
        async {
            until(|| service.waiting() == 1).await;
            vm.remove(1).await
        },
        async {
            until(|| service.waiting() == 2).await;
            assert!(vm.tasks().is_empty());
            toggle_gate.send(false).unwrap();
            until(|| toggle_done.get()).await;
            assert!(vm.tasks().is_empty());
            remove_gate.send(false).unwrap();
        }
    );

    assert!(toggled.is_err());
    assert!(removed.is_err());
    assert_eq!(vm.tasks(), vec![task(1, "A", false)]);
}

#[tokio::test]
async fn test_toggle_of_provisional_task_while_create_in_flight() {
    let (service, gates) = GatedService::new(InMemoryTaskService::new(), 2);
    let vm = TaskViewModel::new(Rc::clone(&service));
    vm.load().await.unwrap();

    let add_done = Cell::new(false);
    let [add_gate, toggle_gate]: [oneshot::Sender<bool>; 2] = gates.try_into().unwrap();
    let (added, toggled, ()) = tokio::join!(
        async {
            let result = vm.add("Buy milk").await;
            add_done.set(true);
            result
        },
        async {
            until(|| service.waiting() == 1).await;
            let provisional = vm.tasks()[0].id;
            vm.toggle(provisional).await
        },
        async {
            until(|| service.waiting() == 2).await;
            add_gate.send(true).unwrap();
            until(|| add_done.get()).await;
            // Server id adopted, the pending flip still shows
            assert_eq!(vm.tasks(), vec![task(1, "Buy milk", true)]);
            toggle_gate.send(false).unwrap();
        }
    );

    added.unwrap();
    assert!(toggled.is_err());
    assert_eq!(vm.tasks(), vec![task(1, "Buy milk", false)]);
    assert_eq!(service.inner.stored(), vec![task(1, "Buy milk", false)]);
}
