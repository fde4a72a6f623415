use super::dynamic::upload_file;
use super::{confirm, finish_save, EmptyHint, PanelHeader, RowActions};
use crate::api::FormApi;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardItem, CardList,
    Checkbox, FileInput, Input, Label, LoadingRow, Modal, Select, Spinner, Textarea,
};
use crate::modal::{
    deleted, freshest, save_form, save_form_field, submit_form, FormDraft, FormFieldDraft,
    ModalState, SubmissionDraft, UploadTracker,
};
use crate::models::{value_to_string, Form, FormField, FormFieldType, FormResponse, Id, ResourceFamily};
use crate::navigator::{load_visible, settle, FormTree, Ticket};
use crate::state::{AppContext, AppState};
use crate::util::format_timestamp;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::{Display, EnumIter, IntoEnumIterator};

const ANSWER_CLASS: &str = "border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter)]
enum FormTab {
    #[default]
    Fields,
    Responses,
    #[strum(to_string = "Fill Out")]
    Fill,
}

async fn copy_text(text: &str) -> Result<(), wasm_bindgen::JsValue> {
    let promise = window().navigator().clipboard().write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise).await.map(|_| ())
}

/// A response's answers in form-field order, labelled; keys no longer in the form come last.
fn response_rows(response: &FormResponse, fields: &[FormField]) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = fields
        .iter()
        .filter_map(|f| {
            let v = response.data.get(&f.name)?;
            Some((f.display_label().to_string(), value_to_string(v)))
        })
        .collect();
    rows.extend(
        response
            .data
            .iter()
            .filter(|(k, _)| !fields.iter().any(|f| &f.name == *k))
            .map(|(k, v)| (k.clone(), value_to_string(v))),
    );
    rows
}

fn load_responses(app_state: AppState, form_id: Id, ticket: Ticket) {
    let tree = app_state.forms;
    let api = app_state.api_client.get_untracked();
    spawn_local(async move {
        let (responses, error) = settle(api.list_responses(&form_id).await);
        if let Some(e) = error {
            app_state.fail(&e, "Failed to load responses");
        }
        tree.try_update(|t| t.apply_responses(ticket, responses));
    });
}

/// Input for one answer in the fill-out tab.
#[component]
fn AnswerInput(
    field: FormField,
    answers: RwSignal<SubmissionDraft>,
    uploads: RwSignal<UploadTracker>,
    #[prop(into)] form_id: Signal<Option<Id>>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let name = field.name.clone();
    let input_id = format!("answer-{}", field.name);
    let value = {
        let name = name.clone();
        Signal::derive(move || answers.with(|a| a.get(&name).to_string()))
    };
    let set_value = {
        let name = name.clone();
        move |v: String| answers.update(|a| a.set(&name, v))
    };

    let editor = match field.field_type {
        FormFieldType::Textarea => view! {
            <textarea
                id=input_id.clone()
                rows=3
                class="border-input w-full rounded-md border bg-transparent px-3 py-2 text-sm outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50"
                prop:value=move || value.get()
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }
        .into_any(),
        FormFieldType::Checkbox => view! {
            <Checkbox
                id=input_id.clone()
                checked=Signal::derive(move || value.with(|v| v == "true"))
                on_toggle=move |on: bool| set_value(on.to_string())
            />
        }
        .into_any(),
        FormFieldType::Select => {
            let options = field.options.clone();
            view! {
                <select
                    id=input_id.clone()
                    class=ANSWER_CLASS
                    prop:value=move || value.get()
                    on:change=move |ev| set_value(event_target_value(&ev))
                >
                    <option value="">"Select..."</option>
                    {options
                        .into_iter()
                        .map(|o| {
                            let label = o.clone();
                            view! { <option value=o>{label}</option> }
                        })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
        FormFieldType::Radio => {
            let group = input_id.clone();
            view! {
                <div class="flex flex-wrap gap-3">
                    {field
                        .options
                        .clone()
                        .into_iter()
                        .map(|o| {
                            let checked = o.clone();
                            let chosen = o.clone();
                            let set_value = set_value.clone();
                            view! {
                                <label class="flex items-center gap-1.5 text-sm">
                                    <input
                                        type="radio"
                                        name=group.clone()
                                        value=o.clone()
                                        class="accent-primary"
                                        prop:checked=move || value.with(|v| *v == checked)
                                        on:change=move |_| set_value(chosen.clone())
                                    />
                                    {o}
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
            }
            .into_any()
        }
        FormFieldType::File => {
            let key = name.clone();
            let pending_key = name.clone();
            let on_file = move |file: web_sys::File| {
                let Some(owner) = form_id.get_untracked() else {
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
                    <FileInput accept="*/*" on_file=on_file />
                    <Show
                        when=move || uploads.with(|u| u.is_pending(&pending_key))
                        fallback=|| ().into_view()
                    >
                        <Spinner />
                    </Show>
                    <span class="truncate text-xs text-muted-foreground">{move || value.get()}</span>
                </div>
            }
            .into_any()
        }
        other => {
            let input_type = match other {
                FormFieldType::Number => "number",
                FormFieldType::Email => "email",
                FormFieldType::Date => "date",
                _ => "text",
            };
            view! {
                <input
                    type=input_type
                    id=input_id.clone()
                    class=ANSWER_CLASS
                    prop:value=move || value.get()
                    on:input=move |ev| set_value(event_target_value(&ev))
                />
            }
            .into_any()
        }
    };

    view! {
        <div class="space-y-1.5">
            <Label html_for=input_id required=field.required>{field.display_label().to_string()}</Label>
            {editor}
        </div>
    }
}

/// Forms with their fields and responses, plus a fill-out view that submits a response.
#[component]
pub fn FormsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let tree = app_state.0.forms;
    let is_admin = Signal::derive(move || app_state.0.session.with(|s| s.is_admin()));
    let tab = RwSignal::new(FormTab::default());
    let selected_form = Signal::derive(move || tree.with(|t| t.forms.selected().cloned()));

    let form_modal: RwSignal<ModalState<FormDraft>> = RwSignal::new(ModalState::default());
    let form_name = RwSignal::new(String::new());
    let form_description = RwSignal::new(String::new());

    let field_modal: RwSignal<ModalState<FormFieldDraft>> = RwSignal::new(ModalState::default());
    let field_name = RwSignal::new(String::new());
    let field_label = RwSignal::new(String::new());
    let field_kind = RwSignal::new(FormFieldType::default().to_string());
    let field_required = RwSignal::new(false);
    let field_options = RwSignal::new(String::new());

    let answers = RwSignal::new(SubmissionDraft::default());
    let answer_uploads = RwSignal::new(UploadTracker::default());
    let submitting = RwSignal::new(false);

    Effect::new(move |_| {
        let Some(user) = app_state.0.session.with_untracked(|s| s.user().cloned()) else {
            return;
        };
        let Some(ticket) = tree.try_update(|t| {
            *t = FormTree::default();
            t.begin_load_forms()
        }) else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let fetched = api.list_forms().await;
            if let Err(e) = &fetched {
                if e.is_session_expired() {
                    app_state.0.fail(e, "Failed to load forms");
                    return;
                }
            }
            let visible = load_visible(&api, &user, ResourceFamily::Forms, fetched).await;
            if let Some(error) = visible.error {
                app_state.0.notify_error(error);
            }
            tree.try_update(|t| t.apply_forms(ticket, visible.items));
        });
    });

    let select_form = move |id: Option<Id>| {
        answers.set(SubmissionDraft::default());
        answer_uploads.set(UploadTracker::default());
        let Some((fields_ticket, responses_ticket)) =
            tree.try_update(|t| t.select_form(id.clone())).flatten()
        else {
            return;
        };
        let Some(form_id) = id else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        let fields_form = form_id.clone();
        spawn_local(async move {
            let (fields, error) = settle(api.list_form_fields(&fields_form).await);
            if let Some(e) = error {
                app_state.0.fail(&e, "Failed to load form fields");
            }
            tree.try_update(|t| t.apply_fields(fields_ticket, fields));
        });
        load_responses(app_state.0, form_id, responses_ticket);
    };

    // Forms

    let open_form = move |form: Option<Form>| {
        form_modal.update(|m| match &form {
            Some(f) => m.open_edit(f.id.clone(), FormDraft::from_form(f)),
            None => m.open_create(),
        });
        let seen = form_modal.with_untracked(|m| m.draft.clone());
        form_name.set(seen.name.clone());
        form_description.set(seen.description.clone());

        let Some(form) = form else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let fresh = freshest(api.get_form(&form.id).await, form.clone());
            if fresh == form {
                return;
            }
            let typed = FormDraft {
                name: form_name.get_untracked(),
                description: form_description.get_untracked(),
            };
            if typed != seen {
                return;
            }
            let draft = FormDraft::from_form(&fresh);
            if form_modal.try_update(|m| m.refresh(&form.id, &seen, draft.clone())) == Some(true) {
                form_name.set(draft.name);
                form_description.set(draft.description);
                tree.update(|t| {
                    t.forms.replace(fresh);
                });
            }
        });
    };

    let submit_form_modal = move |_: ()| {
        let draft = FormDraft {
            name: form_name.get_untracked(),
            description: form_description.get_untracked(),
        };
        let existing = form_modal
            .with_untracked(|m| m.editing.clone())
            .and_then(|id| tree.with_untracked(|t| t.forms.get(&id).cloned()));
        form_modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = save_form(&api, existing.as_ref(), &draft).await;
            finish_save(&app_state.0, form_modal, "Form", outcome, |saved| {
                tree.update(|t| saved.apply_to(&mut t.forms));
            });
        });
    };

    let delete_form = move |form: Form| {
        if !confirm(&format!(
            "Delete form \"{}\"? Its fields and responses go with it.",
            form.name
        )) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_form(&form.id).await, "Form");
            if outcome.is_ok() {
                tree.update(|t| t.remove_form(&form.id));
            }
            app_state.0.report(outcome);
        });
    };

    let copy_link = move |url: String| {
        spawn_local(async move {
            match copy_text(&url).await {
                Ok(()) => app_state.0.notify_success("Link copied"),
                Err(e) => {
                    log::error!("clipboard write failed: {e:?}");
                    app_state.0.notify_error("Failed to copy link");
                }
            }
        });
    };

    // Form fields

    let open_field = move |field: Option<FormField>| {
        field_modal.update(|m| match &field {
            Some(f) => m.open_edit(f.id.clone(), FormFieldDraft::from_field(f)),
            None => m.open_create(),
        });
        let draft = field_modal.with_untracked(|m| m.draft.clone());
        field_name.set(draft.name);
        field_label.set(draft.label);
        field_kind.set(draft.field_type.to_string());
        field_required.set(draft.required);
        field_options.set(draft.options);
    };

    let field_type = move || field_kind.with(|k| k.parse::<FormFieldType>().unwrap_or_default());

    let submit_field = move |_: ()| {
        let draft = FormFieldDraft {
            name: field_name.get_untracked(),
            label: field_label.get_untracked(),
            field_type: field_kind.with_untracked(|k| k.parse().unwrap_or_default()),
            required: field_required.get_untracked(),
            options: field_options.get_untracked(),
        };
        let (form_id, existing) = tree.with_untracked(|t| {
            let existing = field_modal
                .with_untracked(|m| m.editing.clone())
                .and_then(|id| t.fields.get(&id).cloned());
            (t.forms.selected().cloned(), existing)
        });
        field_modal.update(|m| m.submitting = true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome =
                save_form_field(&api, form_id.as_ref(), existing.as_ref(), &draft).await;
            finish_save(&app_state.0, field_modal, "Field", outcome, |saved| {
                tree.update(|t| saved.apply_to(&mut t.fields));
            });
        });
    };

    let delete_field = move |field: FormField| {
        let Some(form_id) = tree.with_untracked(|t| t.forms.selected().cloned()) else {
            return;
        };
        if !confirm(&format!("Delete field \"{}\"?", field.display_label())) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let outcome = deleted(api.delete_form_field(&form_id, &field.id).await, "Field");
            if outcome.is_ok() {
                tree.update(|t| {
                    t.fields.remove(&field.id);
                });
            }
            app_state.0.report(outcome);
        });
    };

    // Fill out

    let send_answers = move |_| {
        let Some(form_id) = tree.with_untracked(|t| t.forms.selected().cloned()) else {
            return;
        };
        let fields = tree.with_untracked(|t| t.fields.items().to_vec());
        let draft = answers.get_untracked();
        submitting.set(true);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match submit_form(&api, &form_id, &fields, &draft).await {
                Ok(()) => {
                    app_state.0.notify_success("Form submitted successfully");
                    answers.set(SubmissionDraft::default());
                    if let Some(ticket) = tree.try_update(|t| t.reload_responses()).flatten() {
                        load_responses(app_state.0, form_id, ticket);
                    }
                }
                Err(rejected) => app_state.0.reject(&rejected),
            }
            submitting.set(false);
        });
    };

    let type_options = Signal::derive(|| {
        FormFieldType::iter()
            .map(|t| (t.to_string(), t.to_string()))
            .collect::<Vec<_>>()
    });

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"Forms"</h1>

            <div class="grid grid-cols-1 gap-4 lg:grid-cols-3">
                <Card class="gap-3 py-4">
                    <PanelHeader
                        title="All Forms"
                        can_add=is_admin
                        add_label="Add Form"
                        on_add=Callback::new(move |_| open_form(None))
                    />
                    <CardContent class="px-4">
                        {move || {
                            if tree.with(|t| t.forms.is_loading()) {
                                return view! { <LoadingRow /> }.into_any();
                            }
                            let (forms, selected) =
                                tree.with(|t| (t.forms.items().to_vec(), t.forms.selected().cloned()));
                            if forms.is_empty() {
                                return view! { <EmptyHint text="No forms available" /> }.into_any();
                            }
                            view! {
                                <CardList>
                                    {forms
                                        .into_iter()
                                        .map(|form| {
                                            let active = selected.as_ref() == Some(&form.id);
                                            let id = form.id.clone();
                                            let name = form.name.clone();
                                            let description = form.description.clone();
                                            let submit_url = StoredValue::new(
                                                app_state.0.api_client.with_untracked(|c| c.form_submit_url(&form.id)),
                                            );
                                            let form = StoredValue::new(form);
                                            view! {
                                                <CardItem
                                                    class=if active { "cursor-pointer bg-accent" } else { "cursor-pointer hover:bg-accent/40" }
                                                    on:click=move |_| select_form(Some(id.clone()))
                                                >
                                                    <div class="min-w-0">
                                                        <div class="truncate font-medium">{name}</div>
                                                        <div class="truncate text-xs text-muted-foreground">{description}</div>
                                                        <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                            <div
                                                                class="mt-1.5 flex items-center gap-2 border-t border-border pt-1.5"
                                                                on:click=|ev| ev.stop_propagation()
                                                            >
                                                                <span class="shrink-0 text-xs text-muted-foreground">"API Link"</span>
                                                                <input
                                                                    type="text"
                                                                    readonly=true
                                                                    value=submit_url.get_value()
                                                                    class="min-w-0 flex-1 rounded-md border border-input bg-muted px-2 py-1 font-mono text-xs text-muted-foreground"
                                                                />
                                                                <Button
                                                                    variant=ButtonVariant::Outline
                                                                    size=ButtonSize::Sm
                                                                    attr:title="Copy API link"
                                                                    on:click=move |_| copy_link(submit_url.get_value())
                                                                >
                                                                    "Copy"
                                                                </Button>
                                                            </div>
                                                        </Show>
                                                    </div>
                                                    <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                                        <RowActions
                                                            on_edit=move |_| open_form(Some(form.get_value()))
                                                            on_delete=move |_| delete_form(form.get_value())
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

                <Card class="gap-3 py-4 lg:col-span-2">
                    <Show
                        when=move || selected_form.get().is_some()
                        fallback=|| view! { <EmptyHint text="Select a form to view its fields and responses" /> }
                    >
                        <div class="flex items-center gap-1 px-4">
                            {move || {
                                let current = tab.get();
                                FormTab::iter()
                                    .map(|t| view! {
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Sm
                                            class=if current == t { "bg-accent font-semibold" } else { "" }
                                            on:click=move |_| tab.set(t)
                                        >
                                            {t.to_string()}
                                        </Button>
                                    })
                                    .collect_view()
                            }}
                        </div>

                        <CardContent class="space-y-3 px-4">
                            {move || match tab.get() {
                                FormTab::Fields => view! {
                                    <div class="flex items-center justify-between">
                                        <CardDescription class="text-xs">
                                            {move || format!("{} fields", tree.with(|t| t.fields.items().len()))}
                                        </CardDescription>
                                        <Show when=move || is_admin.get() fallback=|| ().into_view()>
                                            <Button size=ButtonSize::Sm on:click=move |_| open_field(None)>
                                                "Add Field"
                                            </Button>
                                        </Show>
                                    </div>
                                    {move || {
                                        if tree.with(|t| t.fields.is_loading()) {
                                            return view! { <LoadingRow /> }.into_any();
                                        }
                                        let fields = tree.with(|t| t.fields.items().to_vec());
                                        if fields.is_empty() {
                                            return view! { <EmptyHint text="No fields in this form" /> }.into_any();
                                        }
                                        view! {
                                            <CardList>
                                                {fields
                                                    .into_iter()
                                                    .map(|field| {
                                                        let label = field.display_label().to_string();
                                                        let meta = format!(
                                                            "{}{}{}",
                                                            field.field_type,
                                                            if field.required { " · required" } else { "" },
                                                            if field.options.is_empty() {
                                                                String::new()
                                                            } else {
                                                                format!(" · {}", field.options.join(", "))
                                                            }
                                                        );
                                                        let field = StoredValue::new(field);
                                                        view! {
                                                            <CardItem>
                                                                <div class="min-w-0">
                                                                    <div class="truncate font-medium">{label}</div>
                                                                    <div class="truncate text-xs text-muted-foreground">{meta}</div>
                                                                </div>
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
                                .into_any(),

                                FormTab::Responses => view! {
                                    {move || {
                                        if tree.with(|t| t.responses.is_loading()) {
                                            return view! { <LoadingRow /> }.into_any();
                                        }
                                        let (responses, fields) = tree.with(|t| {
                                            (t.responses.items().to_vec(), t.fields.items().to_vec())
                                        });
                                        if responses.is_empty() {
                                            return view! { <EmptyHint text="No responses yet" /> }.into_any();
                                        }
                                        responses
                                            .into_iter()
                                            .enumerate()
                                            .map(|(i, response)| {
                                                let when = response
                                                    .created_at
                                                    .as_deref()
                                                    .map(format_timestamp)
                                                    .unwrap_or_default();
                                                let rows = response_rows(&response, &fields);
                                                view! {
                                                    <div class="space-y-2 rounded-md border border-border p-3">
                                                        <div class="flex items-center justify-between text-sm">
                                                            <span class="font-medium">{format!("Response #{}", i + 1)}</span>
                                                            <span class="text-xs text-muted-foreground">{when}</span>
                                                        </div>
                                                        <table class="w-full text-xs">
                                                            <tbody>
                                                                {rows
                                                                    .into_iter()
                                                                    .map(|(k, v)| view! {
                                                                        <tr class="border-t border-border">
                                                                            <td class="w-1/3 py-1 pr-2 font-medium">{k}</td>
                                                                            <td class="py-1 break-all">{v}</td>
                                                                        </tr>
                                                                    })
                                                                    .collect_view()}
                                                            </tbody>
                                                        </table>
                                                    </div>
                                                }
                                            })
                                            .collect_view()
                                            .into_any()
                                    }}
                                }
                                .into_any(),

                                FormTab::Fill => view! {
                                    {move || {
                                        let fields = tree.with(|t| t.fields.items().to_vec());
                                        if fields.is_empty() {
                                            return view! { <EmptyHint text="This form has no fields to fill" /> }
                                                .into_any();
                                        }
                                        view! {
                                            <form
                                                class="space-y-3"
                                                on:submit=move |ev: web_sys::SubmitEvent| {
                                                    ev.prevent_default();
                                                    if !submitting.get_untracked()
                                                        && !answer_uploads.with_untracked(UploadTracker::blocks_submit)
                                                    {
                                                        send_answers(());
                                                    }
                                                }
                                            >
                                                {fields
                                                    .into_iter()
                                                    .map(|field| view! {
                                                        <AnswerInput
                                                            field=field
                                                            answers=answers
                                                            uploads=answer_uploads
                                                            form_id=selected_form
                                                        />
                                                    })
                                                    .collect_view()}
                                                <div class="flex justify-end">
                                                    <Button
                                                        size=ButtonSize::Sm
                                                        attr:r#type="submit"
                                                        attr:disabled=move || {
                                                            submitting.get() || answer_uploads.with(UploadTracker::blocks_submit)
                                                        }
                                                    >
                                                        {move || if submitting.get() { "Submitting..." } else { "Submit" }}
                                                    </Button>
                                                </div>
                                            </form>
                                        }
                                        .into_any()
                                    }}
                                }
                                .into_any(),
                            }}
                        </CardContent>
                    </Show>
                </Card>
            </div>

            <Modal
                open=Signal::derive(move || form_modal.with(|m| m.open))
                title=Signal::derive(move || form_modal.with(|m| m.title("Form")))
                busy=Signal::derive(move || form_modal.with(|m| m.submitting))
                on_close=move |_| form_modal.update(|m| m.close())
                on_submit=submit_form_modal
            >
                <div class="space-y-1.5">
                    <Label html_for="form-name" required=true>"Name"</Label>
                    <Input id="form-name" placeholder="e.g. Contact Us" bind_value=form_name autofocus=true />
                </div>
                <div class="space-y-1.5">
                    <Label html_for="form-description">"Description"</Label>
                    <Textarea id="form-description" bind_value=form_description />
                </div>
            </Modal>

            <Modal
                open=Signal::derive(move || field_modal.with(|m| m.open))
                title=Signal::derive(move || field_modal.with(|m| m.title("Field")))
                busy=Signal::derive(move || field_modal.with(|m| m.submitting))
                on_close=move |_| field_modal.update(|m| m.close())
                on_submit=submit_field
            >
                <div class="space-y-1.5">
                    <Label html_for="form-field-name" required=true>"Name"</Label>
                    <Input id="form-field-name" placeholder="e.g. email" bind_value=field_name autofocus=true />
                </div>
                <div class="space-y-1.5">
                    <Label html_for="form-field-label">"Label"</Label>
                    <Input id="form-field-label" placeholder="Shown to whoever fills the form" bind_value=field_label />
                </div>
                <div class="space-y-1.5">
                    <Label html_for="form-field-type">"Type"</Label>
                    <Select id="form-field-type" options=type_options bind_value=field_kind />
                </div>
                <Show when=move || field_type().takes_options() fallback=|| ().into_view()>
                    <div class="space-y-1.5">
                        <Label html_for="form-field-options" required=true>"Options"</Label>
                        <Input id="form-field-options" placeholder="Comma separated, e.g. Red, Green, Blue" bind_value=field_options />
                    </div>
                </Show>
                <label class="flex items-center gap-2 text-sm">
                    <Checkbox checked=field_required on_toggle=move |on: bool| field_required.set(on) />
                    "Required"
                </label>
            </Modal>
        </div>
    }
}
