use crate::notify::ToastKind;
use crate::state::AppContext;
use leptos::prelude::*;

/// Bottom-right stack of the current notifications; click one to dismiss it.
#[component]
pub fn Toaster() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let toasts = app_state.0.toasts;

    view! {
        <div class="pointer-events-none fixed bottom-4 right-4 z-[60] flex w-80 flex-col gap-2">
            {move || {
                toasts
                    .get()
                    .items()
                    .iter()
                    .cloned()
                    .map(|t| {
                        let tone = match t.kind {
                            ToastKind::Success => "border-success/40 text-foreground",
                            ToastKind::Error => "border-destructive/40 text-destructive",
                        };
                        let id = t.id;
                        view! {
                            <div
                                role="status"
                                class=format!("pointer-events-auto cursor-pointer rounded-md border bg-background px-3 py-2 text-sm shadow-md {tone}")
                                on:click=move |_| toasts.update(|list| list.dismiss(id))
                            >
                                {t.message}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
