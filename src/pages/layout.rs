use super::{home_path, role_base};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::Role;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

/// Renders `children` only for a signed-in user with `role`. Anyone else is sent to their own
/// landing screen, or to sign-in.
#[component]
pub fn RequireRole(role: Role, children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let children = StoredValue::new(children);

    move || {
        let session = app_state.0.session.get();
        match session.user().filter(|_| session.is_authenticated()) {
            None => view! { <Redirect path="/" /> }.into_any(),
            Some(user) if user.role != role => {
                view! { <Redirect path=home_path(user.role) /> }.into_any()
            }
            Some(_) => view! {
                <DashboardLayout role=role>
                    {children.with_value(|c| c())}
                </DashboardLayout>
            }
            .into_any(),
        }
    }
}

fn nav_links(role: Role) -> Vec<(String, &'static str)> {
    let base = role_base(role);
    let mut links = match role {
        Role::Admin => vec![("dashboard", "Dashboard")],
        Role::User => vec![("overview", "Overview")],
    };
    links.extend([
        ("dynamic", "Dynamic Dashboard"),
        ("collections", "Collections"),
        ("forms", "Forms"),
    ]);
    if role == Role::Admin {
        links.push(("users", "Users"));
    }
    links
        .into_iter()
        .map(|(path, label)| (format!("{base}/{path}"), label))
        .collect()
}

#[component]
pub fn DashboardLayout(role: Role, children: Children) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let location = use_location();
    let pathname = move || location.pathname.get();

    let user_label = move || {
        app_state
            .0
            .current_user()
            .map(|u| format!("{} ({})", u.display_name(), u.role))
            .unwrap_or_default()
    };

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-7xl gap-4 px-4 py-6">
                <aside class="w-56 shrink-0">
                    <div class="sticky top-6 space-y-4">
                        <a href=home_path(role) class="block text-sm font-medium text-foreground">
                            "Content Dashboard"
                        </a>
                        <nav class="space-y-1">
                            {nav_links(role)
                                .into_iter()
                                .map(|(href, label)| {
                                    let target = href.clone();
                                    let active = Signal::derive(move || pathname().starts_with(&target));
                                    view! {
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Sm
                                            class="w-full justify-start"
                                            attr:aria-current=move || if active.get() { Some("page") } else { None }
                                            href=href
                                        >
                                            <span class=move || if active.get() { "font-semibold" } else { "" }>{label}</span>
                                        </Button>
                                    }
                                })
                                .collect_view()}
                        </nav>
                    </div>
                </aside>

                <main class="min-w-0 flex-1">
                    <div class="mb-4 flex items-center justify-between border-b border-border pb-3">
                        <div class="truncate text-xs text-muted-foreground">{user_label}</div>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| app_state.0.sign_out()
                        >
                            "Log out"
                        </Button>
                    </div>
                    {children()}
                </main>
            </div>
        </div>
    }
}
