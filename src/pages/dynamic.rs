use super::{confirm, finish_save, EmptyHint, PanelHeader, RowActions};
use crate::api::{read_file, ApiClient, PageApi};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardItem, CardList, Checkbox, FileInput,
    Input, Label, LoadingRow, Modal, Select, Spinner, Textarea,
};
use crate::modal::{
    deleted, save_field, save_field_content, save_page, save_section, toggle_boolean,
    upload_image, FieldDraft, InlineEdits, ModalState, PageDraft, Rejected, Saved, SectionDraft,
    UploadTracker,
};
use crate::models::{Field, FieldType, Id, Page, ResourceFamily, Section};
use crate::navigator::{load_visible, settle, ContentTree};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

const INLINE_CLASS: &str = "border-input w-full min-w-0 rounded-md border bg-transparent px-2 py-1 text-sm outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50";

/// Upload tracker key for the image picker inside the field dialog.
const DIALOG_UPLOAD: &str = "dialog";

/// Read a picked file, upload it under `owner` and return its public URL.
pub(super) async fn upload_file(
    api: &ApiClient,
    file: &web_sys::File,
    owner: &Id,
) -> Result<String, Rejected> {
    let upload = read_file(file, owner)
        .await
        .map_err(|e| Rejected::from(e.user_message("Failed to read image")))?;
    upload_image(api, upload).await
}

/// Create / edit dialog for a field. `owner` is the selected section, or the collection when
/// editing a collection schema.
#[component]
pub(super) fn FieldModal(
    modal: RwSignal<ModalState<FieldDraft>>,
    #[prop(into)] owner: Signal<Option<Id>>,
    #[prop(into)] existing: Signal<Option<Field>>,
    #[prop(into)] on_saved: Callback<Saved<Field>>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let name = RwSignal::new(String::new());
    let kind = RwSignal::new(FieldType::default().to_string());
    let content = RwSignal::new(String::new());
    let uploads = RwSignal::new(UploadTracker::default());

    // Copy the draft into the inputs each time the dialog opens.
    let opened = Memo::new(move |_| modal.with(|m| (m.open, m.editing.clone())));
    Effect::new(move |_| {
        if !opened.get().0 {
            return;
        }
        let draft = modal.with_untracked(|m| m.draft.clone());
        name.set(draft.name);
        kind.set(draft.field_type.to_string());
        content.set(draft.content);
        uploads.set(UploadTracker::default());
    });

    let field_type = move || kind.with(|k| k.parse::<FieldType>().unwrap_or_default());
    let type_options = Signal::derive(|| {
        FieldType::iter()
            .map(|t| (t.to_string(), t.label().to_string()))
            .collect::<Vec<_>>()
    });
    let uploading = Signal::derive(move || uploads.with(UploadTracker::blocks_submit));

    let on_file = move |file: web_sys::File| {
        let Some(owner) = owner.get_untracked() else {
            app_state.0.notify_error("Please select a section first");
            return;
        };
        uploads.update(|u| u.start(DIALOG_UPLOAD));
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match upload_file(&api, &file, &owner).await {
                Ok(url) => {
                    content.set(url);
                    app_state.0.notify_success("Image uploaded successfully");
                }
                Err(rejected) => app_state.0.reject(&rejected),
            }
            uploads.update(|u| u.finish(DIALOG_UPLOAD));
        });
    };

    let submit = move |_: ()| {
        let draft = FieldDraft {
            name: name.get_untracked(),
            field_type: kind.with_untracked(|k| k.parse().unwrap_or_default()),
            content: content.get_untracked(),
        };
        let existing = existing.get_untracked();
        let owner = owner.get_untracked();
        modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = save_field(&api, existing.as_ref(), owner.as_ref(), &draft).await;
            finish_save(&app_state.0, modal, "Field", outcome, |saved| on_saved.run(saved));
        });
    };

    view! {
        <Modal
            open=Signal::derive(move || modal.with(|m| m.open))
            title=Signal::derive(move || modal.with(|m| m.title("Field")))
            busy=Signal::derive(move || modal.with(|m| m.submitting))
            blocked=uploading
            on_close=move |_| modal.update(|m| m.close())
            on_submit=submit
        >
            <div class="space-y-1.5">
                <Label html_for="field-name" required=true>"Name"</Label>
                <Input id="field-name" placeholder="e.g. headline" bind_value=name autofocus=true />
            </div>
            <div class="space-y-1.5">
                <Label html_for="field-type">"Type"</Label>
                <Select id="field-type" options=type_options bind_value=kind />
            </div>
            <div class="space-y-1.5">
                <Label html_for="field-content">"Content"</Label>
                {move || match field_type() {
                    FieldType::Image => view! {
                        <div class="space-y-2">
                            <FileInput disabled=uploading on_file=on_file />
                            <Show when=move || uploading.get() fallback=|| ().into_view()>
                                <LoadingRow label="Uploading..." />
                            </Show>
                            <Show when=move || !content.with(String::is_empty) fallback=|| ().into_view()>
                                <img src=move || content.get() alt="Uploaded image" class="h-24 w-24 rounded-md object-cover" />
                            </Show>
                        </div>
                    }
                    .into_any(),
                    FieldType::Boolean => view! {
                        <label class="flex items-center gap-2 text-sm">
                            <Checkbox
                                checked=Signal::derive(move || content.with(|c| c == "true"))
                                on_toggle=move |on: bool| content.set(on.to_string())
                            />
                            "Enabled"
                        </label>
                    }
                    .into_any(),
                    FieldType::Textarea => view! {
                        <Textarea id="field-content" rows=4 bind_value=content />
                    }
                    .into_any(),
                    other => view! {
                        <Input id="field-content" r#type=other.input_type() bind_value=content />
                    }
                    .into_any(),
                }}
            </div>
        </Modal>
    }
}

#[component]
fn FieldRow(
    field: Field,
    #[prop(into)] is_admin: Signal<bool>,
    edits: RwSignal<InlineEdits>,
    uploads: RwSignal<UploadTracker>,
    toggling: RwSignal<BTreeSet<Id>>,
    #[prop(into)] on_save: Callback<Id>,
    #[prop(into)] on_toggle: Callback<Field>,
    #[prop(into)] on_image: Callback<(Field, web_sys::File)>,
    #[prop(into)] on_edit: Callback<Field>,
    #[prop(into)] on_delete: Callback<Field>,
) -> impl IntoView {
    let id = field.id.clone();
    let key = id.to_string();
    let field_type = field.field_type;
    let field = StoredValue::new(field);
    let value = Signal::derive(move || edits.with(|e| field.with_value(|f| e.value_for(f))));
    let modified = {
        let id = id.clone();
        Signal::derive(move || edits.with(|e| e.is_modified(&id)))
    };
    let uploading = Signal::derive(move || uploads.with(|u| u.is_pending(&key)));
    let patching = {
        let id = id.clone();
        Signal::derive(move || toggling.with(|t| t.contains(&id)))
    };

    let on_input = {
        let id = id.clone();
        move |ev: web_sys::Event| {
            let v = event_target_value(&ev);
            edits.update(|e| e.edit(&id, v));
        }
    };

    let editor = match field_type {
        FieldType::Boolean => view! {
            <Checkbox
                checked=Signal::derive(move || field.with_value(Field::is_checked))
                disabled=patching
                on_toggle=move |_| on_toggle.run(field.get_value())
            />
        }
        .into_any(),
        FieldType::Image => view! {
            <div class="flex items-center gap-3">
                {move || {
                    let src = field.with_value(|f| f.content.clone());
                    if src.is_empty() {
                        view! { <span class="text-xs text-muted-foreground">"No image"</span> }.into_any()
                    } else {
                        view! { <img src=src alt="" class="h-12 w-12 rounded-md object-cover" /> }.into_any()
                    }
                }}
                <Show when=move || is_admin.get() fallback=|| ().into_view()>
                    <FileInput
                        disabled=uploading
                        on_file=move |file| on_image.run((field.get_value(), file))
                    />
                </Show>
                <Show when=move || uploading.get() fallback=|| ().into_view()>
                    <Spinner />
                </Show>
            </div>
        }
        .into_any(),
        FieldType::Textarea => view! {
            <textarea class=INLINE_CLASS rows=2 prop:value=move || value.get() on:input=on_input />
        }
        .into_any(),
        other => view! {
            <input type=other.input_type() class=INLINE_CLASS prop:value=move || value.get() on:input=on_input />
        }
        .into_any(),
    };

    let save_id = id.clone();
    let discard_id = id;

    view! {
        <li class="space-y-2 rounded-md border border-border px-3 py-2">
            <div class="flex items-center justify-between gap-2">
                <div class="min-w-0 text-sm">
                    <span class="font-medium">{field.with_value(|f| f.name.clone())}</span>
                    <span class="ml-2 rounded bg-muted px-1.5 py-0.5 text-[10px] uppercase text-muted-foreground">
                        {field_type.label()}
                    </span>
                </div>
                <Show when=move || is_admin.get() fallback=|| ().into_view()>
                    <RowActions
                        on_edit=move |_| on_edit.run(field.get_value())
                        on_delete=move |_| on_delete.run(field.get_value())
                    />
                </Show>
            </div>
            {editor}
            <Show when=move || modified.get() fallback=|| ().into_view()>
                <div class="flex justify-end gap-2">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click={
                            let id = discard_id.clone();
                            move |_| edits.update(|e| e.discard(&id))
                        }
                    >
                        "Discard"
                    </Button>
                    <Button
                        size=ButtonSize::Sm
                        on:click={
                            let id = save_id.clone();
                            move |_| on_save.run(id.clone())
                        }
                    >
                        "Save"
                    </Button>
                </div>
            </Show>
        </li>
    }
}

/// Page → Section → Field browser. Admins manage all three levels; users edit field values.
#[component]
pub fn DynamicDashboard() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let content = app_state.0.content;
    let is_admin = Signal::derive(move || app_state.0.session.with(|s| s.is_admin()));
    let edits = RwSignal::new(InlineEdits::default());
    let uploads = RwSignal::new(UploadTracker::default());
    let toggling: RwSignal<BTreeSet<Id>> = RwSignal::new(BTreeSet::new());

    let page_modal: RwSignal<ModalState<PageDraft>> = RwSignal::new(ModalState::default());
    let page_name = RwSignal::new(String::new());
    let section_modal: RwSignal<ModalState<SectionDraft>> = RwSignal::new(ModalState::default());
    let section_name = RwSignal::new(String::new());
    let field_modal: RwSignal<ModalState<FieldDraft>> = RwSignal::new(ModalState::default());

    Effect::new(move |_| {
        let Some(user) = app_state.0.session.with_untracked(|s| s.user().cloned()) else {
            return;
        };
        let Some(ticket) = content.try_update(|t| {
            *t = ContentTree::default();
            t.begin_load_pages()
        }) else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let fetched = api.list_pages().await;
            if let Err(e) = &fetched {
                if e.is_session_expired() {
                    app_state.0.fail(e, "Failed to load pages");
                    return;
                }
            }
            let visible = load_visible(&api, &user, ResourceFamily::Pages, fetched).await;
            if let Some(error) = visible.error {
                app_state.0.notify_error(error);
            }
            content.try_update(|t| t.apply_pages(ticket, visible.items));
        });
    });

    let select_page = move |id: Option<Id>| {
        edits.update(InlineEdits::clear);
        let Some(ticket) = content.try_update(|t| t.select_page(id.clone())).flatten() else {
            return;
        };
        let Some(page_id) = id else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let (sections, error) = settle(api.list_sections(&page_id).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load sections");
            }
            content.try_update(|t| t.apply_sections(ticket, sections));
        });
    };

    let select_section = move |id: Option<Id>| {
        edits.update(InlineEdits::clear);
        let Some(ticket) = content.try_update(|t| t.select_section(id.clone())).flatten() else {
            return;
        };
        let Some(section_id) = id else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let (fields, error) = settle(api.list_fields(&section_id).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load fields");
            }
            content.try_update(|t| t.apply_fields(ticket, fields));
        });
    };

    // Pages

    let open_page = move |page: Option<Page>| {
        page_modal.update(|m| match &page {
            Some(p) => m.open_edit(p.id.clone(), PageDraft::from_page(p)),
            None => m.open_create(),
        });
        page_name.set(page_modal.with_untracked(|m| m.draft.name.clone()));
    };

    let submit_page = move |_: ()| {
        let draft = PageDraft {
            name: page_name.get_untracked(),
        };
        let existing = page_modal
            .with_untracked(|m| m.editing.clone())
            .and_then(|id| content.with_untracked(|t| t.pages.get(&id).cloned()));
        page_modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = save_page(&api, existing.as_ref(), &draft).await;
            finish_save(&app_state.0, page_modal, "Page", outcome, |saved| {
                content.update(|t| saved.apply_to(&mut t.pages));
            });
        });
    };

    let delete_page = move |page: Page| {
        if !confirm(&format!(
            "Delete page \"{}\"? Its sections and fields go with it.",
            page.name
        )) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_page(&page.id).await, "Page");
            if outcome.is_ok() {
                content.update(|t| t.remove_page(&page.id));
            }
            app_state.0.report(outcome);
        });
    };

    // Sections

    let open_section = move |section: Option<Section>| {
        section_modal.update(|m| match &section {
            Some(s) => m.open_edit(s.id.clone(), SectionDraft::from_section(s)),
            None => m.open_create(),
        });
        section_name.set(section_modal.with_untracked(|m| m.draft.name.clone()));
    };

    let submit_section = move |_: ()| {
        let draft = SectionDraft {
            name: section_name.get_untracked(),
        };
        let (existing, page_id) = content.with_untracked(|t| {
            let existing = section_modal
                .with_untracked(|m| m.editing.clone())
                .and_then(|id| t.sections.get(&id).cloned());
            (existing, t.pages.selected().cloned())
        });
        section_modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = save_section(&api, existing.as_ref(), page_id.as_ref(), &draft).await;
            finish_save(&app_state.0, section_modal, "Section", outcome, |saved| {
                content.update(|t| saved.apply_to(&mut t.sections));
            });
        });
    };

    let delete_section = move |section: Section| {
        if !confirm(&format!(
            "Delete section \"{}\"? Its fields go with it.",
            section.name
        )) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_section(&section.id).await, "Section");
            if outcome.is_ok() {
                content.update(|t| t.remove_section(&section.id));
            }
            app_state.0.report(outcome);
        });
    };

    // Fields

    let open_field = move |field: Option<Field>| {
        field_modal.update(|m| match &field {
            Some(f) => m.open_edit(f.id.clone(), FieldDraft::from_field(f)),
            None => m.open_create(),
        });
    };

    let delete_field = move |field: Field| {
        if !confirm(&format!("Delete field \"{}\"?", field.name)) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_field(&field.id).await, "Field");
            if outcome.is_ok() {
                content.update(|t| {
                    t.fields.remove(&field.id);
                });
                edits.update(|e| e.discard(&field.id));
            }
            app_state.0.report(outcome);
        });
    };

    let save_inline = move |id: Id| {
        let Some(value) = edits.with_untracked(|e| e.pending(&id).map(str::to_string)) else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match save_field_content(&api, &id, &value).await {
                Ok(()) => {
                    content.update(|t| t.set_field_content(&id, &value));
                    edits.update(|e| e.discard(&id));
                    app_state.0.notify_success("Field content updated successfully");
                }
                Err(rejected) => app_state.0.reject(&rejected),
            }
        });
    };

    let toggle_field = move |field: Field| {
        if !toggling.try_update(|t| t.insert(field.id.clone())).unwrap_or(false) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match toggle_boolean(&api, &field).await {
                Ok(next) => content.update(|t| t.set_field_content(&field.id, next)),
                Err(rejected) => app_state.0.reject(&rejected),
            }
            toggling.update(|t| {
                t.remove(&field.id);
            });
        });
    };

    let upload_to_field = move |(field, file): (Field, web_sys::File)| {
        let Some(owner) = field.owner_id().cloned() else {
            app_state.0.notify_error("Please select a section first");
            return;
        };
        let key = field.id.to_string();
        uploads.update(|u| u.start(&key));
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = async {
                let url = upload_file(&api, &file, &owner).await?;
                save_field_content(&api, &field.id, &url).await?;
                Ok::<_, Rejected>(url)
            }
            .await;
            match result {
                Ok(url) => {
                    content.update(|t| t.set_field_content(&field.id, &url));
                    app_state.0.notify_success("Image uploaded successfully");
                }
                Err(rejected) => app_state.0.reject(&rejected),
            }
            uploads.update(|u| u.finish(&key));
        });
    };

    let row_class = |active: bool| {
        if active {
            "cursor-pointer bg-accent"
        } else {
            "cursor-pointer hover:bg-accent/40"
        }
    };

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"Dynamic Dashboard"</h1>
                <Show
                    when=move || app_state.0.session.with(|s| s.is_user())
                    fallback=|| ().into_view()
                >
                    <p class="text-xs text-muted-foreground">
                        "You can edit field values. Pages, sections and fields are managed by admins."
                    </p>
                </Show>
            </div>

            <div class="grid grid-cols-1 gap-4 lg:grid-cols-3">
                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="Pages"
                        can_add=is_admin
                        add_label="Add Page"
                        on_add=Callback::new(move |_| open_page(None))
                    />
                    <CardContent class="px-4">
                        {move || {
                            if content.with(|t| t.pages.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let (pages, selected) = content
                                .with(|t| (t.pages.items().to_vec(), t.pages.selected().cloned()));
                            if pages.is_empty() {
                                return view! { <EmptyHint text="No pages available" /> }.into_any();
                            }
                            view! {
                                <CardList>
                                    {pages
                                        .into_iter()
                                        .map(|page| {
                                            let active = selected.as_ref() == Some(&page.id);
                                            let id = page.id.clone();
                                            let name = page.name.clone();
                                            let page = StoredValue::new(page);
                                            view! {
                                                <CardItem
                                                    class=row_class(active)
                                                    on:click=move |_| select_page(Some(id.clone()))
                                                >
                                                    <span class="truncate">{name}</span>
                                                    <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                        <RowActions
                                                            on_edit=move |_| open_page(Some(page.get_value()))
                                                            on_delete=move |_| delete_page(page.get_value())
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

                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="Sections"
                        can_add=Signal::derive(move || {
                            is_admin.get() && content.with(|t| t.pages.selected().is_some())
                        })
                        add_label="Add Section"
                        on_add=Callback::new(move |_| open_section(None))
                    />
                    <CardContent class="px-4">
                        {move || {
                            if content.with(|t| t.pages.selected().is_none()) {
                                return view! { <EmptyHint text="Select a page to view its sections" /> }
                                    .into_any();
                            }
                            if content.with(|t| t.sections.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let (sections, selected) = content.with(|t| {
                                (t.sections.items().to_vec(), t.sections.selected().cloned())
                            });
                            if sections.is_empty() {
                                return view! { <EmptyHint text="No sections in this page" /> }.into_any();
                            }
                            view! {
                                <CardList>
                                    {sections
                                        .into_iter()
                                        .map(|section| {
                                            let active = selected.as_ref() == Some(&section.id);
                                            let id = section.id.clone();
                                            let name = section.name.clone();
                                            let section = StoredValue::new(section);
                                            view! {
                                                <CardItem
                                                    class=row_class(active)
                                                    on:click=move |_| select_section(Some(id.clone()))
                                                >
                                                    <span class="truncate">{name}</span>
                                                    <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                        <RowActions
                                                            on_edit=move |_| open_section(Some(section.get_value()))
                                                            on_delete=move |_| delete_section(section.get_value())
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

                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="Fields"
                        can_add=Signal::derive(move || {
                            is_admin.get() && content.with(|t| t.sections.selected().is_some())
                        })
                        add_label="Add Field"
                        on_add=Callback::new(move |_| open_field(None))
                    />
                    <CardContent class="px-4">
                        {move || {
                            if content.with(|t| t.sections.selected().is_none()) {
                                return view! { <EmptyHint text="Select a section to view its fields" /> }
                                    .into_any();
                            }
                            if content.with(|t| t.fields.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let fields = content.with(|t| t.fields.items().to_vec());
                            if fields.is_empty() {
                                return view! { <EmptyHint text="No fields in this section" /> }.into_any();
                            }
                            view! {
                                <ul class="flex flex-col gap-2">
                                    {fields
                                        .into_iter()
                                        .map(|field| view! {
                                            <FieldRow
                                                field=field
                                                is_admin=is_admin
                                                edits=edits
                                                uploads=uploads
                                                toggling=toggling
                                                on_save=save_inline
                                                on_toggle=toggle_field
                                                on_image=upload_to_field
                                                on_edit=move |f: Field| open_field(Some(f))
                                                on_delete=delete_field
                                            />
                                        })
                                        .collect_view()}
                                </ul>
                            }
                            .into_any()
                        }}
                    </CardContent>
                </Card>
            </div>

            <Modal
                open=Signal::derive(move || page_modal.with(|m| m.open))
                title=Signal::derive(move || page_modal.with(|m| m.title("Page")))
                busy=Signal::derive(move || page_modal.with(|m| m.submitting))
                on_close=move |_| page_modal.update(|m| m.close())
                on_submit=submit_page
            >
                <div class="space-y-1.5">
                    <Label html_for="page-name" required=true>"Name"</Label>
                    <Input id="page-name" placeholder="e.g. Home" bind_value=page_name autofocus=true />
                </div>
            </Modal>

            <Modal
                open=Signal::derive(move || section_modal.with(|m| m.open))
                title=Signal::derive(move || section_modal.with(|m| m.title("Section")))
                busy=Signal::derive(move || section_modal.with(|m| m.submitting))
                on_close=move |_| section_modal.update(|m| m.close())
                on_submit=submit_section
            >
                <div class="space-y-1.5">
                    <Label html_for="section-name" required=true>"Name"</Label>
                    <Input id="section-name" placeholder="e.g. Hero" bind_value=section_name autofocus=true />
                </div>
            </Modal>

            <FieldModal
                modal=field_modal
                owner=Signal::derive(move || content.with(|t| t.sections.selected().cloned()))
                existing=Signal::derive(move || {
                    field_modal
                        .with(|m| m.editing.clone())
                        .and_then(|id| content.with(|t| t.fields.get(&id).cloned()))
                })
                on_saved={move |saved: Saved<Field>| content.update(|t| saved.apply_to(&mut t.fields))}
            />
        </div>
    }
}
