use crate::components::ui::{Button, ButtonSize, ButtonVariant, Spinner};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Centered overlay with a title, a body and Cancel / submit buttons.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into, optional)] description: Option<String>,
    #[prop(into, optional)] class: String,
    #[prop(into, default = "Save".to_string())] submit_label: String,
    #[prop(optional, into)] busy: Signal<bool>,
    /// Disables submit without showing the spinner, e.g. while an upload is in flight.
    #[prop(optional, into)] blocked: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_submit: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let panel_class = tw_merge!(
        "w-full max-w-md max-h-[85vh] overflow-y-auto rounded-md border border-border bg-background p-4 shadow-lg",
        class
    );
    let children = StoredValue::new(children);
    let description = StoredValue::new(description);
    let submit_label = StoredValue::new(submit_label);
    let panel_class = StoredValue::new(panel_class);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                <div class=panel_class.get_value() role="dialog" aria-modal="true">
                    <div class="mb-3 space-y-1">
                        <div class="text-sm font-medium">{move || title.get()}</div>
                        {description.get_value().map(|d| view! {
                            <div class="text-xs text-muted-foreground">{d}</div>
                        })}
                    </div>

                    <form
                        class="space-y-3"
                        on:submit=move |ev: web_sys::SubmitEvent| {
                            ev.prevent_default();
                            if !busy.get_untracked() && !blocked.get_untracked() {
                                on_submit.run(());
                            }
                        }
                    >
                        {move || children.with_value(|c| c())}

                        <div class="flex items-center justify-end gap-2 pt-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:r#type="button"
                                attr:disabled=move || busy.get()
                                on:click=move |_| on_close.run(())
                            >
                                "Cancel"
                            </Button>
                            <Button
                                size=ButtonSize::Sm
                                attr:r#type="submit"
                                attr:disabled=move || busy.get() || blocked.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || busy.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if busy.get() { "Saving...".to_string() } else { submit_label.get_value() }}
                                </span>
                            </Button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
