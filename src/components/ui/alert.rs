use crate::state::Notice;
use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;

/// Renders the current notice, if any, as a success or error banner.
#[component]
pub fn NoticeBanner(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            let (border, text) = if n.is_error() {
                ("border-destructive/30", "text-destructive")
            } else {
                ("border-emerald-500/30", "text-emerald-600 dark:text-emerald-400")
            };
            view! {
                <Alert class=border attr:role="status">
                    <AlertDescription class=text>{n.text().to_string()}</AlertDescription>
                </Alert>
            }
        })
    }
}
