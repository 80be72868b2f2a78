//! Todo Manager App
//!
//! Main application component: add form, task table, status line.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_core::{HttpTaskService, TaskViewModel};

use crate::components::{ErrorBanner, NewTaskForm, TaskTable};
use crate::context::AppContext;
use crate::store::{store_apply_view, store_is_initial_loading, store_task_counts, AppState};

#[component]
pub fn App() -> impl IntoView {
    // State
    let store = Store::new(AppState::default());
    let vm = TaskViewModel::new(HttpTaskService::new());
    vm.subscribe(move |view| store_apply_view(&store, view));
    let ctx = AppContext::new(vm);

    // Provide context to all children
    provide_context(store);
    provide_context(ctx);

    // Load tasks on mount
    Effect::new(move |_| {
        ctx.load();
    });

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Todo Manager"</h1>

                <ErrorBanner />

                <NewTaskForm />

                <Show
                    when=move || !store_is_initial_loading(&store)
                    fallback=|| view! { <div class="loading">"Loading tasks..."</div> }
                >
                    <TaskTable />
                </Show>

                <p class="task-count">
                    {move || {
                        let (total, completed) = store_task_counts(&store);
                        format!("{} tasks, {} completed", total, completed)
                    }}
                </p>
            </main>
        </div>
    }
}
