use super::EmptyHint;
use crate::api::{AuthApi, CollectionApi, FormApi, PageApi};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardItem,
    CardList, CardTitle, Checkbox, LoadingRow, Spinner,
};
use crate::models::{HasId, Id, ResourceFamily, Role, User};
use crate::navigator::settle;
use crate::permissions::{AllowList, PermissionResolver};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::IntoEnumIterator;

fn family_label(family: ResourceFamily) -> &'static str {
    match family {
        ResourceFamily::Pages => "Pages",
        ResourceFamily::Collections => "Collections",
        ResourceFamily::Forms => "Forms",
    }
}

/// One user's allow-lists, as being edited.
#[derive(Clone, Debug, Default, PartialEq)]
struct Grants {
    pages: AllowList,
    collections: AllowList,
    forms: AllowList,
}

impl Grants {
    fn get(&self, family: ResourceFamily) -> &AllowList {
        match family {
            ResourceFamily::Pages => &self.pages,
            ResourceFamily::Collections => &self.collections,
            ResourceFamily::Forms => &self.forms,
        }
    }

    fn get_mut(&mut self, family: ResourceFamily) -> &mut AllowList {
        match family {
            ResourceFamily::Pages => &mut self.pages,
            ResourceFamily::Collections => &mut self.collections,
            ResourceFamily::Forms => &mut self.forms,
        }
    }
}

/// Everything that can be granted, as `(id, name)` per family.
#[derive(Clone, Debug, Default, PartialEq)]
struct Catalog {
    pages: Vec<(Id, String)>,
    collections: Vec<(Id, String)>,
    forms: Vec<(Id, String)>,
}

impl Catalog {
    fn entries(&self, family: ResourceFamily) -> &[(Id, String)] {
        match family {
            ResourceFamily::Pages => &self.pages,
            ResourceFamily::Collections => &self.collections,
            ResourceFamily::Forms => &self.forms,
        }
    }
}

fn named<T: HasId>(items: Vec<T>, name: impl Fn(&T) -> String) -> Vec<(Id, String)> {
    items.iter().map(|x| (x.id().clone(), name(x))).collect()
}

/// Admin screen for granting users access to pages, collections and forms.
#[component]
pub fn UsersManager() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let users: RwSignal<Vec<User>> = RwSignal::new(vec![]);
    let catalog = RwSignal::new(Catalog::default());
    let loading = RwSignal::new(true);

    let selected: RwSignal<Option<User>> = RwSignal::new(None);
    let grants = RwSignal::new(Grants::default());
    let loading_grants = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let family = RwSignal::new(ResourceFamily::Pages);

    Effect::new(move |_| {
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let (fetched_users, users_err) = settle(api.list_users().await);
            let (pages, pages_err) = settle(api.list_pages().await);
            let (collections, collections_err) = settle(api.list_collections().await);
            let (forms, forms_err) = settle(api.list_forms().await);

            if let Some(e) = users_err {
                app_state.0.fail(&e, "Failed to load users");
            } else if let Some(e) = pages_err.or(collections_err).or(forms_err) {
                app_state.0.fail(&e, "Failed to load content");
            }
            users.set(fetched_users);
            catalog.set(Catalog {
                pages: named(pages, |p| p.name.clone()),
                collections: named(collections, |c| c.name.clone()),
                forms: named(forms, |f| f.name.clone()),
            });
            loading.set(false);
        });
    });

    let select_user = move |user: User| {
        let Some(user_id) = user.id.clone() else {
            app_state.0.notify_error("This user has no id");
            return;
        };
        selected.set(Some(user));
        grants.set(Grants::default());
        loading_grants.set(true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let mut loaded = Grants::default();
            let mut failure = None;
            for f in ResourceFamily::iter() {
                match PermissionResolver::allowed_ids(&api, Some(&user_id), f).await {
                    Ok(list) => *loaded.get_mut(f) = list,
                    Err(e) => {
                        failure.get_or_insert(e);
                    }
                }
            }
            // A newer selection owns the panel now.
            if selected.with_untracked(|s| s.as_ref().and_then(|u| u.id.as_ref()) != Some(&user_id)) {
                return;
            }
            if let Some(e) = failure {
                app_state.0.fail(&e, "Failed to load user permissions");
            }
            grants.set(loaded);
            loading_grants.set(false);
        });
    };

    let save = move |_| {
        let Some(user_id) = selected.with_untracked(|s| s.as_ref().and_then(|u| u.id.clone())) else {
            return;
        };
        let current = grants.get_untracked();
        saving.set(true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let mut result = Ok(());
            for f in ResourceFamily::iter() {
                result = PermissionResolver::set_allowed_ids(&api, &user_id, f, current.get(f)).await;
                if result.is_err() {
                    break;
                }
            }
            match result {
                Ok(()) => app_state.0.notify_success("User permissions updated successfully"),
                Err(e) => app_state.0.fail(&e, "Failed to update user permissions"),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"Users Management"</h1>

            <div class="grid grid-cols-1 gap-4 lg:grid-cols-3">
                <Card class="gap-3 py-4">
                    <CardHeader>
                        <CardTitle class="text-base">"Users"</CardTitle>
                    </CardHeader>
                    <CardContent class="px-4">
                        {move || {
                            if loading.get() {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let list = users.get();
                            if list.is_empty() {
                                return view! { <EmptyHint text="No users found" /> }.into_any();
                            }
                            let current = selected.with(|s| s.as_ref().and_then(|u| u.id.clone()));
                            let me = app_state.0.session.with_untracked(|s| s.user_id().cloned());
                            view! {
                                <CardList>
                                    {list
                                        .into_iter()
                                        .map(|user| {
                                            let active = current.is_some() && current == user.id;
                                            let name = if me.is_some() && me == user.id {
                                                format!("{} (you)", user.display_name())
                                            } else {
                                                user.display_name().to_string()
                                            };
                                            let meta = format!("{} · {}", user.email, user.role);
                                            let user = StoredValue::new(user);
                                            view! {
                                                <CardItem
                                                    class=if active { "cursor-pointer bg-accent" } else { "cursor-pointer hover:bg-accent/40" }
                                                    on:click=move |_| select_user(user.get_value())
                                                >
                                                    <div class="min-w-0">
                                                        <div class="truncate font-medium">{name}</div>
                                                        <div class="truncate text-xs text-muted-foreground">{meta}</div>
                                                    </div>
                                                </CardItem>
                                            }
                                        })
                                        .collect_view()}
                                </CardList>
                            }
                            .into_any()
                        }}
                    </CardContent>
                </Card>

                <Card class="gap-3 py-4 lg:col-span-2">
                    {move || {
                        let Some(user) = selected.get() else {
                            return view! { <EmptyHint text="Select a user to manage permissions" /> }.into_any();
                        };
                        let admin_note = (user.role == Role::Admin).then(|| view! {
                            <CardDescription class="text-xs">
                                "Admins see all content regardless of these grants."
                            </CardDescription>
                        });
                        view! {
                            <CardHeader>
                                <CardTitle class="text-base">
                                    {format!("Permissions for {}", user.display_name())}
                                </CardTitle>
                                {admin_note}
                            </CardHeader>
                            <CardContent class="space-y-3 px-4">
                                <div class="flex items-center gap-1">
                                    {move || {
                                        let current = family.get();
                                        ResourceFamily::iter()
                                            .map(|f| view! {
                                                <Button
                                                    variant=ButtonVariant::Ghost
                                                    size=ButtonSize::Sm
                                                    class=if current == f { "bg-accent font-semibold" } else { "" }
                                                    on:click=move |_| family.set(f)
                                                >
                                                    {move || format!("{} ({})", family_label(f), grants.with(|g| g.get(f).len()))}
                                                </Button>
                                            })
                                            .collect_view()
                                    }}
                                </div>

                                {move || {
                                    if loading_grants.get() {
                                        return view! { <LoadingRow /> }.into_any();
                                    }
                                    let f = family.get();
                                    let entries = catalog.with(|c| c.entries(f).to_vec());
                                    if entries.is_empty() {
                                        return view! {
                                            <EmptyHint text=format!("No {} to grant", f) />
                                        }
                                        .into_any();
                                    }
                                    view! {
                                        <CardList>
                                            {entries
                                                .into_iter()
                                                .map(|(id, name)| {
                                                    let checked = {
                                                        let id = id.clone();
                                                        Signal::derive(move || grants.with(|g| g.get(f).contains(&id)))
                                                    };
                                                    let input_id = format!("grant-{f}-{id}");
                                                    view! {
                                                        <CardItem>
                                                            <label class="flex min-w-0 items-center gap-2" r#for=input_id.clone()>
                                                                <Checkbox
                                                                    id=input_id.clone()
                                                                    checked=checked
                                                                    on_toggle=move |_| grants.update(|g| g.get_mut(f).toggle(&id))
                                                                />
                                                                <span class="truncate">{name}</span>
                                                            </label>
                                                        </CardItem>
                                                    }
                                                })
                                                .collect_view()}
                                        </CardList>
                                    }
                                    .into_any()
                                }}

                                <div class="flex justify-end">
                                    <Button
                                        size=ButtonSize::Sm
                                        attr:disabled=move || saving.get() || loading_grants.get()
                                        on:click=save
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || saving.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            "Save Permissions"
                                        </span>
                                    </Button>
                                </div>
                            </CardContent>
                        }
                        .into_any()
                    }}
                </Card>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_toggle_per_family() {
        let mut grants = Grants::default();
        grants.get_mut(ResourceFamily::Pages).toggle(&Id::from("p1"));
        grants.get_mut(ResourceFamily::Forms).toggle(&Id::from("fm1"));
        grants.get_mut(ResourceFamily::Forms).toggle(&Id::from("fm1"));

        assert!(grants.get(ResourceFamily::Pages).contains(&Id::from("p1")));
        assert!(grants.get(ResourceFamily::Collections).is_empty());
        assert!(grants.get(ResourceFamily::Forms).is_empty());
    }

    #[test]
    fn test_family_labels() {
        let labels: Vec<&str> = ResourceFamily::iter().map(family_label).collect();
        assert_eq!(labels, vec!["Pages", "Collections", "Forms"]);
    }
}
