//! Task Table Component
//!
//! Lists every task with its status and actions.

use leptos::prelude::*;

use crate::components::TaskRow;
use crate::store::{use_app_store, AppStateStoreFields};

/// Table of all tasks
#[component]
pub fn TaskTable() -> impl IntoView {
    let store = use_app_store();

    let rows = move || {
        store.tasks().get().into_iter().enumerate().collect::<Vec<_>>()
    };

    view! {
        <div class="task-table-wrapper">
            <table class="task-table">
                <thead>
                    <tr>
                        <th>"Task"</th>
                        <th class="center">"Status"</th>
                        <th class="center">"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        key=|(index, task)| {
                            // Row number and every displayed field, so edits re-render
                            (*index, task.id, task.title.clone(), task.completed)
                        }
                        children=move |(index, task)| view! { <TaskRow index=index task=task /> }
                    />
                </tbody>
            </table>
        </div>
    }
}
