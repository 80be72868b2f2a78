use leptos::prelude::*;

/// "Completed" / "Pending" pill
#[component]
pub fn StatusBadge(completed: bool) -> impl IntoView {
    if completed {
        view! { <span class="badge badge-completed">"Completed"</span> }.into_any()
    } else {
        view! { <span class="badge badge-pending">"Pending"</span> }.into_any()
    }
}
