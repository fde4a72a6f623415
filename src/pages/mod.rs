mod auth;
mod collections;
mod dynamic;
mod forms;
mod layout;
mod overview;
mod users;

pub use auth::{LoginPage, RegisterPage};
pub use collections::{CollectionItemsPage, CollectionsPage};
pub use dynamic::DynamicDashboard;
pub use forms::FormsPage;
pub use layout::RequireRole;
pub use overview::{AdminDashboard, UserOverview};
pub use users::UsersManager;

use crate::components::ui::{Button, ButtonSize, ButtonVariant, CardHeader, CardTitle};
use crate::modal::{ModalState, Rejected, Saved};
use crate::models::{HasId, Role};
use crate::state::AppState;
use leptos::prelude::*;

/// Blocking browser confirmation before a delete.
pub(crate) fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

/// Route prefix for a role's screens.
pub(crate) fn role_base(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::User => "/user",
    }
}

/// Landing screen after login.
pub(crate) fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::User => "/user/overview",
    }
}

/// Muted placeholder for empty lists and unselected panels.
#[component]
pub(crate) fn EmptyHint(#[prop(into)] text: String) -> impl IntoView {
    view! { <div class="py-4 text-center text-xs text-muted-foreground">{text}</div> }
}

/// Apply a dialog's save result: close it and hand the entity to `apply`, or re-enable it and
/// show why the save failed.
pub(crate) fn finish_save<D, T>(
    app_state: &AppState,
    modal: RwSignal<ModalState<D>>,
    noun: &str,
    outcome: Result<Saved<T>, Rejected>,
    apply: impl FnOnce(Saved<T>),
) where
    D: Default + Send + Sync + 'static,
    T: HasId + Clone,
{
    match outcome {
        Ok(saved) => {
            app_state.notify_success(saved.message(noun));
            apply(saved);
            modal.update(|m| m.close());
        }
        Err(rejected) => {
            modal.update(|m| m.submitting = false);
            app_state.reject(&rejected);
        }
    }
}

/// Panel title with an optional "Add" button, shown while `can_add` holds.
#[component]
pub(crate) fn PanelHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] can_add: Signal<bool>,
    #[prop(into, default = "Add".to_string())] add_label: String,
    #[prop(optional, into)] on_add: Option<Callback<()>>,
) -> impl IntoView {
    let add_label = StoredValue::new(add_label);
    view! {
        <CardHeader class="flex-row items-center justify-between">
            <CardTitle class="text-base">{title}</CardTitle>
            <Show when=move || can_add.get() && on_add.is_some() fallback=|| ().into_view()>
                <Button
                    size=ButtonSize::Sm
                    on:click=move |_| {
                        if let Some(cb) = on_add {
                            cb.run(());
                        }
                    }
                >
                    {add_label.get_value()}
                </Button>
            </Show>
        </CardHeader>
    }
}

/// Edit / Delete buttons for an admin-managed row.
#[component]
pub(crate) fn RowActions(
    #[prop(into)] on_edit: Callback<()>,
    #[prop(into)] on_delete: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex shrink-0 items-center gap-1">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                on:click=move |ev| {
                    ev.stop_propagation();
                    on_edit.run(());
                }
            >
                "Edit"
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                class="text-destructive"
                on:click=move |ev| {
                    ev.stop_propagation();
                    on_delete.run(());
                }
            >
                "Delete"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_paths() {
        assert_eq!(home_path(Role::Admin), "/admin/dashboard");
        assert_eq!(home_path(Role::User), "/user/overview");
        assert_eq!(role_base(Role::User), "/user");
    }
}
