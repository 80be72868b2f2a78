//! New Task Form Component
//!
//! Text input plus "Add Task" button. Enter submits through the form.

use leptos::prelude::*;

use crate::context::AppContext;

/// Form for creating new tasks
#[component]
pub fn NewTaskForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (new_title, set_new_title) = signal(String::new());

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = new_title.get();
        if title.trim().is_empty() { return; }
        ctx.add(title);
        set_new_title.set(String::new());
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <input
                type="text"
                class="new-task-input"
                placeholder="Enter a new task..."
                prop:value=move || new_title.get()
                on:input=move |ev| set_new_title.set(event_target_value(&ev))
            />
            <button type="submit" class="add-task-btn">"Add Task"</button>
        </form>
    }
}
