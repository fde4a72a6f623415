use super::EmptyHint;
use crate::api::{AuthApi, CollectionApi, FormApi, PageApi};
use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle, LoadingRow};
use crate::models::Page;
use crate::navigator::{load_overview, settle};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Stats {
    pages: usize,
    collections: usize,
    forms: usize,
    users: usize,
}

#[component]
fn StatCard(#[prop(into)] label: String, #[prop(into)] value: Signal<usize>, href: &'static str) -> impl IntoView {
    view! {
        <a href=href class="block">
            <Card class="py-4 transition-colors hover:bg-accent/40">
                <CardContent class="px-4">
                    <div class="text-xs text-muted-foreground">{label}</div>
                    <div class="mt-1 text-2xl font-semibold">{move || value.get()}</div>
                </CardContent>
            </Card>
        </a>
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let stats: RwSignal<Stats> = RwSignal::new(Stats::default());
    let loading: RwSignal<bool> = RwSignal::new(true);

    Effect::new(move |_| {
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            // Admin counts are unfiltered; a 404 just means "none yet".
            let (pages, pages_err) = settle(api.list_pages().await);
            let (collections, collections_err) = settle(api.list_collections().await);
            let (forms, forms_err) = settle(api.list_forms().await);
            let (users, users_err) = settle(api.list_users().await);

            if let Some(e) = pages_err.or(collections_err).or(forms_err).or(users_err) {
                app_state.0.fail(&e, "Failed to load statistics");
            }
            stats.set(Stats {
                pages: pages.len(),
                collections: collections.len(),
                forms: forms.len(),
                users: users.len(),
            });
            loading.set(false);
        });
    });

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"Admin Dashboard"</h1>
            <Show when=move || !loading.get() fallback=|| view! { <LoadingRow /> }>
                <div class="grid grid-cols-2 gap-3 md:grid-cols-4">
                    <StatCard label="Total Pages" value=Signal::derive(move || stats.get().pages) href="/admin/dynamic" />
                    <StatCard label="Collections" value=Signal::derive(move || stats.get().collections) href="/admin/collections" />
                    <StatCard label="Forms" value=Signal::derive(move || stats.get().forms) href="/admin/forms" />
                    <StatCard label="Users" value=Signal::derive(move || stats.get().users) href="/admin/users" />
                </div>
            </Show>

            <Card>
                <CardHeader>
                    <CardTitle class="text-base">"Quick Actions"</CardTitle>
                    <CardDescription>"Manage content and who can see it."</CardDescription>
                </CardHeader>
                <CardContent class="grid grid-cols-1 gap-2 md:grid-cols-3">
                    <a href="/admin/dynamic" class="rounded-md border border-border p-3 hover:bg-accent/40">
                        <div class="text-sm font-medium">"Dynamic Dashboard"</div>
                        <div class="text-xs text-muted-foreground">"Pages, sections and fields"</div>
                    </a>
                    <a href="/admin/collections" class="rounded-md border border-border p-3 hover:bg-accent/40">
                        <div class="text-sm font-medium">"Collections"</div>
                        <div class="text-xs text-muted-foreground">"Schemas and items"</div>
                    </a>
                    <a href="/admin/users" class="rounded-md border border-border p-3 hover:bg-accent/40">
                        <div class="text-sm font-medium">"Users Management"</div>
                        <div class="text-xs text-muted-foreground">"Grant pages, collections and forms"</div>
                    </a>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn UserOverview() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let pages: RwSignal<Vec<Page>> = RwSignal::new(vec![]);
    let collections: RwSignal<usize> = RwSignal::new(0);
    let forms: RwSignal<usize> = RwSignal::new(0);
    let loading: RwSignal<bool> = RwSignal::new(true);

    Effect::new(move |_| {
        let Some(user) = app_state.0.current_user() else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let overview = match load_overview(&api, &user).await {
                Ok(overview) => overview,
                Err(e) => {
                    app_state.0.fail(&e, "Failed to load data");
                    return;
                }
            };
            for error in overview.errors {
                app_state.0.notify_error(error);
            }
            pages.set(overview.pages);
            collections.set(overview.collections);
            forms.set(overview.forms);
            loading.set(false);
        });
    });

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"Content Overview"</h1>
            <Show when=move || !loading.get() fallback=|| view! { <LoadingRow /> }>
                <div class="grid grid-cols-1 gap-3 md:grid-cols-3">
                    <StatCard label="Pages" value=Signal::derive(move || pages.with(Vec::len)) href="/user/dynamic" />
                    <StatCard label="Collections" value=collections href="/user/collections" />
                    <StatCard label="Forms" value=forms href="/user/forms" />
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-base">"Pages"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <Show
                            when=move || !pages.with(Vec::is_empty)
                            fallback=|| view! { <EmptyHint text="No pages available" /> }
                        >
                            <div class="space-y-2">
                                {move || {
                                    pages
                                        .get()
                                        .into_iter()
                                        .map(|p| view! {
                                            <a href="/user/dynamic" class="block rounded-md border border-border px-3 py-2 hover:bg-accent/40">
                                                <div class="text-sm font-medium">{p.name}</div>
                                            </a>
                                        })
                                        .collect_view()
                                }}
                            </div>
                        </Show>
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}
