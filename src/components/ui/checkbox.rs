use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Checkbox(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into)] checked: Signal<bool>,
    #[prop(optional, into)] disabled: Signal<bool>,
    #[prop(into)] on_toggle: Callback<bool>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "peer size-4 shrink-0 rounded-[4px] border border-input accent-primary shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50 disabled:cursor-not-allowed disabled:opacity-50",
        class
    );

    view! {
        <input
            data-name="Checkbox"
            type="checkbox"
            class=merged_class
            id=id
            disabled=move || disabled.get()
            prop:checked=move || checked.get()
            on:change=move |ev| {
                let next = event_target_checked(&ev);
                // Controlled: the box only moves when `checked` does.
                event_target::<web_sys::HtmlInputElement>(&ev).set_checked(checked.get_untracked());
                on_toggle.run(next);
            }
        />
    }
}
