//! Task Row Component
//!
//! One table row: numbered title (click to toggle), status, actions.

use leptos::prelude::*;
use todo_core::Task;

use crate::components::StatusBadge;
use crate::context::AppContext;

/// A single task row
#[component]
pub fn TaskRow(
    /// Zero-based position in the list
    index: usize,
    task: Task,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let id = task.id;
    let completed = task.completed;
    let label = format!("{}. {}", index + 1, task.title);

    view! {
        <tr class=if completed { "task-row completed" } else { "task-row pending" }>
            <td>
                <span
                    class=if completed { "task-title done" } else { "task-title" }
                    on:click=move |_| ctx.toggle(id)
                >
                    {label}
                </span>
            </td>
            <td class="center">
                <StatusBadge completed=completed />
            </td>
            <td class="center">
                <button class="toggle-btn" on:click=move |_| ctx.toggle(id)>"Toggle"</button>
                <button class="delete-btn" on:click=move |_| ctx.remove(id)>"Delete"</button>
            </td>
        </tr>
    }
}
