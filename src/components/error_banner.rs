//! Error Banner Component
//!
//! Shows the last failure reported by the view-model. Dismissed by click
//! or automatically after a few seconds.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;
use crate::store::{use_app_store, AppStateStoreFields};

const AUTO_DISMISS_MS: u32 = 5_000;

/// Dismissable error banner
#[component]
pub fn ErrorBanner() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    // Auto-dismiss, unless a newer error replaced this one meanwhile
    Effect::new(move |_| {
        if let Some(message) = store.error().get() {
            spawn_local(async move {
                TimeoutFuture::new(AUTO_DISMISS_MS).await;
                if store.error().get_untracked().as_deref() == Some(message.as_str()) {
                    ctx.clear_error();
                }
            });
        }
    });

    view! {
        {move || store.error().get().map(|message| view! {
            <div class="error-banner" role="alert">
                <span class="error-text">{message}</span>
                <button class="dismiss-btn" on:click=move |_| ctx.clear_error()>"×"</button>
            </div>
        })}
    }
}
