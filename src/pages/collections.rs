use super::dynamic::{upload_file, FieldModal};
use super::{confirm, finish_save, role_base, EmptyHint, PanelHeader, RowActions};
use crate::api::{CollectionApi, PageApi};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardItem, CardList,
    FileInput, Input, Label, LoadingRow, Modal, Spinner, Textarea,
};
use crate::modal::{
    deleted, freshest, save_collection, save_item, CollectionDraft, FieldDraft, ItemDraft,
    ModalState, Saved, UploadTracker,
};
use crate::models::{Collection, CollectionItem, Field, FieldType, Id, ResourceFamily, Role};
use crate::navigator::{load_visible, schema_count, settle, CollectionTree};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use std::collections::BTreeMap;

const ITEM_INPUT_CLASS: &str = "border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50";

/// Route to a collection's items, carrying its id and name in the query string.
fn items_href(role: Role, collection: &Collection) -> String {
    format!(
        "{}/collection-items?collectionId={}&collectionName={}",
        role_base(role),
        urlencoding::encode(collection.id.as_str()),
        urlencoding::encode(&collection.name)
    )
}

fn field_count_label(n: usize) -> String {
    match n {
        1 => "1 field".to_string(),
        n => format!("{n} fields"),
    }
}

/// Collections with their field schemas. Admins manage both; users browse what they are granted.
#[component]
pub fn CollectionsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let tree = app_state.0.collections;
    let is_admin = Signal::derive(move || app_state.0.session.with(|s| s.is_admin()));
    let role = Signal::derive(move || {
        app_state
            .0
            .current_user()
            .map(|u| u.role)
            .unwrap_or_default()
    });
    let counts: RwSignal<BTreeMap<Id, usize>> = RwSignal::new(BTreeMap::new());

    let collection_modal: RwSignal<ModalState<CollectionDraft>> =
        RwSignal::new(ModalState::default());
    let collection_name = RwSignal::new(String::new());
    let collection_description = RwSignal::new(String::new());
    let field_modal: RwSignal<ModalState<FieldDraft>> = RwSignal::new(ModalState::default());

    Effect::new(move |_| {
        let Some(user) = app_state.0.session.with_untracked(|s| s.user().cloned()) else {
            return;
        };
        let Some(ticket) = tree.try_update(|t| {
            *t = CollectionTree::default();
            t.begin_load_collections()
        }) else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let fetched = api.list_collections().await;
            if let Err(e) = &fetched {
                if e.is_session_expired() {
                    app_state.0.fail(e, "Failed to load collections");
                    return;
                }
            }
            let visible = load_visible(&api, &user, ResourceFamily::Collections, fetched).await;
            if let Some(error) = visible.error {
                app_state.0.notify_error(error);
            }
            let ids: Vec<Id> = visible.items.iter().map(|c| c.id.clone()).collect();
            if tree.try_update(|t| t.apply_collections(ticket, visible.items)) != Some(true) {
                return;
            }

            // Counts fill in after the list; a failed fetch just counts as zero.
            for id in ids {
                let (fields, _) = settle(api.list_fields(&id).await);
                let n = schema_count(&id, &fields);
                counts.update(|c| {
                    c.insert(id, n);
                });
            }
        });
    });

    let select_collection = move |id: Option<Id>| {
        let Some((schema_ticket, items_ticket)) =
            tree.try_update(|t| t.select_collection(id.clone())).flatten()
        else {
            return;
        };
        let Some(collection_id) = id else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let (fields, error) = settle(api.list_fields(&collection_id).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load collection fields");
            }
            tree.try_update(|t| t.apply_schema(schema_ticket, fields));

            let (items, error) = settle(api.list_items(&collection_id).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load items");
            }
            tree.try_update(|t| t.apply_items(items_ticket, items));
        });
    };

    let open_collection = move |collection: Option<Collection>| {
        collection_modal.update(|m| match &collection {
            Some(c) => m.open_edit(c.id.clone(), CollectionDraft::from_collection(c)),
            None => m.open_create(),
        });
        let draft = collection_modal.with_untracked(|m| m.draft.clone());
        collection_name.set(draft.name);
        collection_description.set(draft.description);
    };

    let submit_collection = move |_: ()| {
        let draft = CollectionDraft {
            name: collection_name.get_untracked(),
            description: collection_description.get_untracked(),
        };
        let existing = collection_modal
            .with_untracked(|m| m.editing.clone())
            .and_then(|id| tree.with_untracked(|t| t.collections.get(&id).cloned()));
        collection_modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = save_collection(&api, existing.as_ref(), &draft).await;
            finish_save(&app_state.0, collection_modal, "Collection", outcome, |saved| {
                tree.update(|t| saved.apply_to(&mut t.collections));
            });
        });
    };

    let delete_collection = move |collection: Collection| {
        if !confirm(&format!(
            "Delete collection \"{}\"? Its fields and items go with it.",
            collection.name
        )) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_collection(&collection.id).await, "Collection");
            if outcome.is_ok() {
                tree.update(|t| t.remove_collection(&collection.id));
                counts.update(|c| {
                    c.remove(&collection.id);
                });
            }
            app_state.0.report(outcome);
        });
    };

    let open_field = move |field: Option<Field>| {
        field_modal.update(|m| match &field {
            Some(f) => m.open_edit(f.id.clone(), FieldDraft::from_field(f)),
            None => m.open_create(),
        });
    };

    let on_field_saved = move |saved: Saved<Field>| {
        if let (Saved::Created(_), Some(id)) =
            (&saved, tree.with_untracked(|t| t.collections.selected().cloned()))
        {
            counts.update(|c| *c.entry(id).or_default() += 1);
        }
        tree.update(|t| saved.apply_to(&mut t.schema));
    };

    let delete_field = move |field: Field| {
        if !confirm(&format!("Delete field \"{}\"?", field.name)) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_field(&field.id).await, "Field");
            if outcome.is_ok() {
                tree.update(|t| {
                    t.schema.remove(&field.id);
                });
                if let Some(owner) = field.owner_id() {
                    counts.update(|c| {
                        if let Some(n) = c.get_mut(owner) {
                            *n = n.saturating_sub(1);
                        }
                    });
                }
            }
            app_state.0.report(outcome);
        });
    };

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"Collections"</h1>

            <div class="grid grid-cols-1 gap-4 lg:grid-cols-2">
                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="All Collections"
                        can_add=is_admin
                        add_label="Add Collection"
                        on_add=Callback::new(move |_| open_collection(None))
                    />
                    <CardContent class="px-4">
                        {move || {
                            if tree.with(|t| t.collections.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let (collections, selected) = tree.with(|t| {
                                (t.collections.items().to_vec(), t.collections.selected().cloned())
                            });
                            if collections.is_empty() {
                                return view! { <EmptyHint text="No collections available" /> }.into_any();
                            }
                            view! {
                                <CardList>
                                    {collections
                                        .into_iter()
                                        .map(|collection| {
                                            let active = selected.as_ref() == Some(&collection.id);
                                            let id = collection.id.clone();
                                            let count_id = collection.id.clone();
                                            let name = collection.name.clone();
                                            let description = collection.description.clone();
                                            let collection = StoredValue::new(collection);
                                            view! {
                                                <CardItem
                                                    class=if active { "cursor-pointer bg-accent" } else { "cursor-pointer hover:bg-accent/40" }
                                                    on:click=move |_| select_collection(Some(id.clone()))
                                                >
                                                    <div class="min-w-0">
                                                        <div class="truncate font-medium">{name}</div>
                                                        <div class="truncate text-xs text-muted-foreground">
                                                            {description}
                                                        </div>
                                                    </div>
                                                    <div class="flex shrink-0 items-center gap-2">
                                                        <span class="text-xs text-muted-foreground">
                                                            {move || {
                                                                counts
                                                                    .with(|c| c.get(&count_id).copied())
                                                                    .map(field_count_label)
                                                            }}
                                                        </span>
                                                        <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                            <RowActions
                                                                on_edit=move |_| open_collection(Some(collection.get_value()))
                                                                on_delete=move |_| delete_collection(collection.get_value())
                                                            />
                                                        </Show>
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

                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="Schema"
                        can_add=Signal::derive(move || {
                            is_admin.get() && tree.with(|t| t.collections.selected().is_some())
                        })
                        add_label="Add Field"
                        on_add=Callback::new(move |_| open_field(None))
                    />
                    <CardContent class="space-y-3 px-4">
                        {move || {
                            let Some(collection) = tree.with(|t| t.collections.selected_item().cloned()) else {
                                return view! { <EmptyHint text="Select a collection to view its fields" /> }
                                    .into_any();
                            };
                            if tree.with(|t| t.schema.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let schema = tree.with(|t| t.schema.items().to_vec());
                            let item_count = tree.with(|t| t.items.items().len());
                            view! {
                                <div class="flex items-center justify-between gap-2">
                                    <CardDescription class="text-xs">
                                        {format!("{} · {} items", field_count_label(schema.len()), item_count)}
                                    </CardDescription>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        href=items_href(role.get_untracked(), &collection)
                                    >
                                        "View Items"
                                    </Button>
                                </div>
                                {if schema.is_empty() {
                                    view! { <EmptyHint text="No fields defined yet" /> }.into_any()
                                } else {
                                    view! {
                                        <CardList>
                                            {schema
                                                .into_iter()
                                                .map(|field| {
                                                    let label = format!("{} ({})", field.name, field.field_type.label());
                                                    let field = StoredValue::new(field);
                                                    view! {
                                                        <CardItem>
                                                            <span class="truncate">{label}</span>
                                                            <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                                <RowActions
                                                                    on_edit=move |_| open_field(Some(field.get_value()))
                                                                    on_delete=move |_| delete_field(field.get_value())
                                                                />
                                                            </Show>
                                                        </CardItem>
                                                    }
                                                })
                                                .collect_view()}
                                        </CardList>
                                    }
                                    .into_any()
                                }}
                            }
                            .into_any()
                        }}
                    </CardContent>
                </Card>
            </div>

            <Modal
                open=Signal::derive(move || collection_modal.with(|m| m.open))
                title=Signal::derive(move || collection_modal.with(|m| m.title("Collection")))
                busy=Signal::derive(move || collection_modal.with(|m| m.submitting))
                on_close=move |_| collection_modal.update(|m| m.close())
                on_submit=submit_collection
            >
                <div class="space-y-1.5">
                    <Label html_for="collection-name" required=true>"Name"</Label>
                    <Input id="collection-name" placeholder="e.g. Blog Posts" bind_value=collection_name autofocus=true />
                </div>
                <div class="space-y-1.5">
                    <Label html_for="collection-description">"Description"</Label>
                    <Textarea id="collection-description" bind_value=collection_description />
                </div>
            </Modal>

            <FieldModal
                modal=field_modal
                owner=Signal::derive(move || tree.with(|t| t.collections.selected().cloned()))
                existing=Signal::derive(move || {
                    field_modal
                        .with(|m| m.editing.clone())
                        .and_then(|id| tree.with(|t| t.schema.get(&id).cloned()))
                })
                on_saved=on_field_saved
            />
        </div>
    }
}

/// Editor for one schema field's value inside the item dialog.
#[component]
fn ItemValueInput(
    field: Field,
    modal: RwSignal<ModalState<ItemDraft>>,
    uploads: RwSignal<UploadTracker>,
    #[prop(into)] collection_id: Signal<Option<Id>>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let id = field.id.clone();
    let input_id = format!("item-{}", field.id);
    let value = {
        let id = id.clone();
        Signal::derive(move || modal.with(|m| m.draft.get(&id).to_string()))
    };
    let set_value = {
        let id = id.clone();
        move |v: String| modal.update(|m| m.draft.set(&id, v))
    };

    let editor = match field.field_type {
        FieldType::Boolean => view! {
            <input
                type="checkbox"
                id=input_id.clone()
                class="size-4 accent-primary"
                prop:checked=move || value.with(|v| v == "true")
                on:change=move |ev| set_value(event_target_checked(&ev).to_string())
            />
        }
        .into_any(),
        FieldType::Image => {
            let key = id.to_string();
            let pending_key = key.clone();
            let on_file = move |file: web_sys::File| {
                let Some(owner) = collection_id.get_untracked() else {
                    return;
                };
                let key = key.clone();
                let set_value = set_value.clone();
                uploads.update(|u| u.start(&key));
                let api = app_state.0.api_client.get_untracked();
                spawn_local(async move {
                    match upload_file(&api, &file, &owner).await {
                        Ok(url) => set_value(url),
                        Err(rejected) => app_state.0.reject(&rejected),
                    }
                    uploads.update(|u| u.finish(&key));
                });
            };
            view! {
                <div class="flex items-center gap-3">
                    <FileInput on_file=on_file />
                    <Show
                        when=move || uploads.with(|u| u.is_pending(&pending_key))
                        fallback=|| ().into_view()
                    >
                        <Spinner />
                    </Show>
                    <Show when=move || !value.with(String::is_empty) fallback=|| ().into_view()>
                        <img src=move || value.get() alt="" class="h-12 w-12 rounded-md object-cover" />
                    </Show>
                </div>
            }
            .into_any()
        }
        FieldType::Textarea => view! {
            <textarea
                id=input_id.clone()
                rows=3
                class="border-input w-full rounded-md border bg-transparent px-3 py-2 text-sm outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50"
                prop:value=move || value.get()
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }
        .into_any(),
        other => view! {
            <input
                type=other.input_type()
                id=input_id.clone()
                class=ITEM_INPUT_CLASS
                prop:value=move || value.get()
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }
        .into_any(),
    };

    view! {
        <div class="space-y-1.5">
            <Label html_for=input_id>{field.name.clone()}</Label>
            {editor}
        </div>
    }
}

/// Items of one collection, picked by the `collectionId` query parameter.
#[component]
pub fn CollectionItemsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let tree = app_state.0.collections;
    let is_admin = Signal::derive(move || app_state.0.session.with(|s| s.is_admin()));
    let query = use_query_map();
    let collection_id = Memo::new(move |_| {
        query
            .with(|q| q.get("collectionId"))
            .filter(|s| !s.is_empty())
            .map(Id::from)
    });
    let back_href = move || {
        let role = app_state
            .0
            .current_user()
            .map(|u| u.role)
            .unwrap_or_default();
        format!("{}/collections", role_base(role))
    };

    let item_modal: RwSignal<ModalState<ItemDraft>> = RwSignal::new(ModalState::default());
    let uploads = RwSignal::new(UploadTracker::default());

    Effect::new(move |_| {
        let Some(id) = collection_id.get() else {
            tree.set(CollectionTree::default());
            return;
        };
        let name = query.with_untracked(|q| q.get("collectionName")).unwrap_or_default();
        let known_name = !name.is_empty();
        let Some((schema_ticket, items_ticket)) = tree
            .try_update(|t| {
                *t = CollectionTree::default();
                t.collections.push(Collection {
                    id: id.clone(),
                    name,
                    description: String::new(),
                });
                t.select_collection(Some(id.clone()))
            })
            .flatten()
        else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            if !known_name {
                match api.get_collection(&id).await {
                    Ok(collection) => {
                        tree.try_update(|t| t.collections.replace(collection));
                    }
                    Err(e) => log::warn!("could not load collection {id}: {e}"),
                }
            }

            let (fields, error) = settle(api.list_fields(&id).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load collection fields");
            }
            tree.try_update(|t| t.apply_schema(schema_ticket, fields));

            let (items, error) = settle(api.list_items(&id).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load items");
            }
            tree.try_update(|t| t.apply_items(items_ticket, items));
        });
    });

    let open_item = move |item: Option<CollectionItem>| {
        let schema = tree.with_untracked(|t| t.schema.items().to_vec());
        uploads.set(UploadTracker::default());
        let Some(item) = item else {
            item_modal.update(|m| m.open_create());
            return;
        };
        let seen = ItemDraft::from_item(&item, &schema);
        item_modal.update(|m| m.open_edit(item.id.clone(), seen.clone()));

        // Values may have moved on since the list was fetched.
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let fresh = freshest(api.get_item(&item.id).await, item.clone());
            if fresh == item {
                return;
            }
            let draft = ItemDraft::from_item(&fresh, &schema);
            if item_modal.try_update(|m| m.refresh(&item.id, &seen, draft)) == Some(true) {
                tree.update(|t| {
                    t.items.replace(fresh);
                });
            }
        });
    };

    let submit_item = move |_: ()| {
        let (draft, editing) = item_modal.with_untracked(|m| (m.draft.clone(), m.editing.clone()));
        let (existing, schema) = tree.with_untracked(|t| {
            (
                editing.and_then(|id| t.items.get(&id).cloned()),
                t.schema.items().to_vec(),
            )
        });
        let collection_id = collection_id.get_untracked();
        item_modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome =
                save_item(&api, existing.as_ref(), collection_id.as_ref(), &schema, &draft).await;
            finish_save(&app_state.0, item_modal, "Item", outcome, |saved| {
                tree.update(|t| saved.apply_to(&mut t.items));
            });
        });
    };

    let delete_item = move |item: CollectionItem| {
        if !confirm("Delete this item?") {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_item(&item.id).await, "Item");
            if outcome.is_ok() {
                tree.update(|t| {
                    t.items.remove(&item.id);
                });
            }
            app_state.0.report(outcome);
        });
    };

    let title = move || {
        tree.with(|t| t.collections.selected_item().map(|c| c.name.clone()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Collection Items".to_string())
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between gap-2">
                <h1 class="text-xl font-semibold">{title}</h1>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm href=back_href()>
                    "Back to Collections"
                </Button>
            </div>

            <Show
                when=move || collection_id.get().is_some()
                fallback=|| view! { <EmptyHint text="No collection selected" /> }
            >
                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="Items"
                        can_add=Signal::derive(move || {
                            is_admin.get() && !tree.with(|t| t.schema.items().is_empty())
                        })
                        add_label="Add Item"
                        on_add=Callback::new(move |_| open_item(None))
                    />
                    <CardContent class="px-4">
                        {move || {
                            if tree.with(|t| t.schema.is_loading() || t.items.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let (schema, items, title_field) = tree.with(|t| {
                                (t.schema.items().to_vec(), t.items.items().to_vec(), t.title_field().cloned())
                            });
                            if schema.is_empty() {
                                return view! { <EmptyHint text="This collection has no fields yet" /> }
                                    .into_any();
                            }
                            if items.is_empty() {
                                return view! { <EmptyHint text="No items yet" /> }.into_any();
                            }
                            view! {
                                <CardList>
                                    {items
                                        .into_iter()
                                        .map(|item| {
                                            let heading = title_field
                                                .as_ref()
                                                .map(|f| item.value_for(f))
                                                .filter(|v| !v.is_empty())
                                                .unwrap_or_else(|| format!("Item {}", item.id));
                                            let details = schema
                                                .iter()
                                                .filter(|f| Some(*f) != title_field.as_ref())
                                                .map(|f| (f.name.clone(), item.value_for(f)))
                                                .filter(|(_, v)| !v.is_empty())
                                                .map(|(k, v)| view! {
                                                    <div class="truncate text-xs text-muted-foreground">
                                                        <span class="font-medium">{k}": "</span>{v}
                                                    </div>
                                                })
                                                .collect_view();
                                            let item = StoredValue::new(item);
                                            view! {
                                                <CardItem class="items-start">
                                                    <div class="min-w-0 space-y-0.5">
                                                        <div class="truncate font-medium">{heading}</div>
                                                        {details}
                                                    </div>
                                                    <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                        <RowActions
                                                            on_edit=move |_| open_item(Some(item.get_value()))
                                                            on_delete=move |_| delete_item(item.get_value())
                                                        />
                                                    </Show>
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
            </Show>

            <Modal
                open=Signal::derive(move || item_modal.with(|m| m.open))
                title=Signal::derive(move || item_modal.with(|m| m.title("Item")))
                busy=Signal::derive(move || item_modal.with(|m| m.submitting))
                blocked=Signal::derive(move || uploads.with(UploadTracker::blocks_submit))
                on_close=move |_| item_modal.update(|m| m.close())
                on_submit=submit_item
            >
                {move || {
                    tree.with(|t| t.schema.items().to_vec())
                        .into_iter()
                        .map(|field| view! {
                            <ItemValueInput
                                field=field
                                modal=item_modal
                                uploads=uploads
                                collection_id=collection_id
                            />
                        })
                        .collect_view()
                }}
            </Modal>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_href_encodes_query() {
        let c = Collection {
            id: Id::from("c1"),
            name: "Blog Posts & News".to_string(),
            description: String::new(),
        };
        assert_eq!(
            items_href(Role::Admin, &c),
            "/admin/collection-items?collectionId=c1&collectionName=Blog%20Posts%20%26%20News"
        );
        assert!(items_href(Role::User, &c).starts_with("/user/collection-items?"));
    }

    #[test]
    fn test_field_count_label() {
        assert_eq!(field_count_label(0), "0 fields");
        assert_eq!(field_count_label(1), "1 field");
        assert_eq!(field_count_label(3), "3 fields");
    }
}
