//! Selection state for the three content trees.
//!
//! Each level owns its list, its selected id and a generation counter. Starting a fetch hands out
//! a [`Ticket`]; a result is only applied while its ticket is still the level's latest, so the
//! last selection wins no matter in which order responses arrive.

use crate::api::{ApiError, ApiResult, AuthApi, ContentApi};
use crate::models::{
    Collection, CollectionItem, Field, Form, FormField, FormResponse, HasId, Id, Page,
    ResourceFamily, Section, User,
};
use crate::permissions::{PermissionResolver, Visibility};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Level<T> {
    items: Vec<T>,
    selected: Option<Id>,
    generation: u64,
    loading: bool,
}

impl<T> Default for Level<T> {
    fn default() -> Self {
        Self {
            items: vec![],
            selected: None,
            generation: 0,
            loading: false,
        }
    }
}

impl<T: HasId + Clone> Level<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&Id> {
        self.selected.as_ref()
    }

    pub fn selected_item(&self) -> Option<&T> {
        let id = self.selected.as_ref()?;
        self.items.iter().find(|x| x.id() == id)
    }

    pub fn get(&self, id: &Id) -> Option<&T> {
        self.items.iter().find(|x| x.id() == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        Ticket(self.generation)
    }

    /// Drop items and selection; any in-flight fetch becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.selected = None;
        self.loading = false;
    }

    pub fn accept(&mut self, ticket: Ticket, items: Vec<T>) -> bool {
        if ticket.0 != self.generation {
            log::debug!("dropping stale response (ticket {}, current {})", ticket.0, self.generation);
            return false;
        }
        self.items = items;
        self.loading = false;
        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.items.iter().any(|x| x.id() == id))
        {
            self.selected = None;
        }
        true
    }

    fn select(&mut self, id: Option<Id>) {
        self.selected = id;
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the entry with the same id. Returns false when it is not in the list.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|x| x.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove by id. Returns true when the removed entry was the selection.
    pub fn remove(&mut self, id: &Id) -> bool {
        self.items.retain(|x| x.id() != id);
        let was_selected = self.selected.as_ref() == Some(id);
        if was_selected {
            self.selected = None;
        }
        was_selected
    }

    pub fn update_where(&mut self, id: &Id, f: impl FnOnce(&mut T)) {
        if let Some(x) = self.items.iter_mut().find(|x| x.id() == id) {
            f(x);
        }
    }
}

/// Resolve a level fetch: 404 reads as "nothing here yet" and 403 as "nothing for you";
/// both show empty without a notification. Anything else is reported.
pub(crate) fn settle<T>(result: ApiResult<Vec<T>>) -> (Vec<T>, Option<ApiError>) {
    match result {
        Ok(items) => (items, None),
        Err(e) if e.is_not_found() || e.is_forbidden() => {
            log::warn!("list fetch came back {:?}; showing empty", e.status);
            (vec![], None)
        }
        Err(e) => (vec![], Some(e)),
    }
}

/// A fetched top-level list after permission filtering, plus the message to show if any step failed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Visible<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

/// Fetch a top-level family and scope it to what `user` may see.
pub(crate) async fn load_visible<T: HasId>(
    api: &impl AuthApi,
    user: &User,
    family: ResourceFamily,
    fetched: ApiResult<Vec<T>>,
) -> Visible<T> {
    let fallback = format!("Failed to load {family}");
    let (items, fetch_error) = settle(fetched);
    if let Some(e) = fetch_error {
        return Visible {
            items: vec![],
            error: Some(e.user_message(&fallback)),
        };
    }

    match PermissionResolver::visibility(api, user, family).await {
        Ok(vis) => Visible {
            items: vis.filter(items),
            error: None,
        },
        Err(e) => Visible {
            items: Visibility::fail_closed().filter(items),
            error: Some(e.user_message(&format!("Failed to load permissions for {family}"))),
        },
    }
}

/// What a user can reach across all three families.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overview {
    pub pages: Vec<Page>,
    pub collections: usize,
    pub forms: usize,
    /// Messages for the families that failed to load.
    pub errors: Vec<String>,
}

/// Load every family scoped to `user`. Only an expired session is returned as an error.
pub(crate) async fn load_overview(api: &impl ContentApi, user: &User) -> ApiResult<Overview> {
    let fetched = api.list_pages().await;
    if let Err(e) = &fetched {
        if e.is_session_expired() {
            return Err(e.clone());
        }
    }
    let pages = load_visible(api, user, ResourceFamily::Pages, fetched).await;
    let collections = load_visible(
        api,
        user,
        ResourceFamily::Collections,
        api.list_collections().await,
    )
    .await;
    let forms = load_visible(api, user, ResourceFamily::Forms, api.list_forms().await).await;

    Ok(Overview {
        errors: [pages.error, collections.error, forms.error]
            .into_iter()
            .flatten()
            .collect(),
        pages: pages.items,
        collections: collections.items.len(),
        forms: forms.items.len(),
    })
}

fn owned_by(fields: Vec<Field>, owner: &Id) -> Vec<Field> {
    fields
        .into_iter()
        .filter(|f| f.owner_id().map_or(true, |o| o == owner))
        .collect()
}

/// Page → Section → Field.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ContentTree {
    pub pages: Level<Page>,
    pub sections: Level<Section>,
    pub fields: Level<Field>,
}

impl ContentTree {
    pub fn begin_load_pages(&mut self) -> Ticket {
        self.pages.begin()
    }

    pub fn apply_pages(&mut self, ticket: Ticket, pages: Vec<Page>) -> bool {
        let had_selection = self.pages.selected().is_some();
        let applied = self.pages.accept(ticket, pages);
        if applied && had_selection && self.pages.selected().is_none() {
            self.sections.reset();
            self.fields.reset();
        }
        applied
    }

    /// Select a page (or clear with `None`). Returns the ticket for the section fetch.
    pub fn select_page(&mut self, id: Option<Id>) -> Option<Ticket> {
        self.pages.select(id.clone());
        self.sections.reset();
        self.fields.reset();
        id.map(|_| self.sections.begin())
    }

    pub fn apply_sections(&mut self, ticket: Ticket, sections: Vec<Section>) -> bool {
        self.sections.accept(ticket, sections)
    }

    pub fn select_section(&mut self, id: Option<Id>) -> Option<Ticket> {
        self.sections.select(id.clone());
        self.fields.reset();
        id.map(|_| self.fields.begin())
    }

    pub fn apply_fields(&mut self, ticket: Ticket, fields: Vec<Field>) -> bool {
        let fields = match self.sections.selected() {
            Some(section) => owned_by(fields, section),
            None => fields,
        };
        self.fields.accept(ticket, fields)
    }

    pub fn remove_page(&mut self, id: &Id) {
        if self.pages.remove(id) {
            self.sections.reset();
            self.fields.reset();
        }
    }

    pub fn remove_section(&mut self, id: &Id) {
        if self.sections.remove(id) {
            self.fields.reset();
        }
    }

    pub fn set_field_content(&mut self, id: &Id, content: &str) {
        self.fields
            .update_where(id, |f| f.content = content.to_string());
    }
}

/// Collection → schema fields + items.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CollectionTree {
    pub collections: Level<Collection>,
    pub schema: Level<Field>,
    pub items: Level<CollectionItem>,
}

impl CollectionTree {
    pub fn begin_load_collections(&mut self) -> Ticket {
        self.collections.begin()
    }

    pub fn apply_collections(&mut self, ticket: Ticket, collections: Vec<Collection>) -> bool {
        let had_selection = self.collections.selected().is_some();
        let applied = self.collections.accept(ticket, collections);
        if applied && had_selection && self.collections.selected().is_none() {
            self.schema.reset();
            self.items.reset();
        }
        applied
    }

    /// Returns tickets for the schema and item fetches.
    pub fn select_collection(&mut self, id: Option<Id>) -> Option<(Ticket, Ticket)> {
        self.collections.select(id.clone());
        self.schema.reset();
        self.items.reset();
        id.map(|_| (self.schema.begin(), self.items.begin()))
    }

    /// Schema fields are the ones whose owner is the collection itself.
    pub fn apply_schema(&mut self, ticket: Ticket, fields: Vec<Field>) -> bool {
        let Some(collection) = self.collections.selected().cloned() else {
            return false;
        };
        let schema = fields
            .into_iter()
            .filter(|f| f.owner_id() == Some(&collection))
            .collect();
        self.schema.accept(ticket, schema)
    }

    pub fn apply_items(&mut self, ticket: Ticket, items: Vec<CollectionItem>) -> bool {
        self.items.accept(ticket, items)
    }

    pub fn remove_collection(&mut self, id: &Id) {
        if self.collections.remove(id) {
            self.schema.reset();
            self.items.reset();
        }
    }

    /// Field whose value titles an item: the one named "title", else the first.
    pub fn title_field(&self) -> Option<&Field> {
        let schema = self.schema.items();
        schema
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case("title"))
            .or_else(|| schema.first())
    }
}

/// Schema fields belonging to `collection` among a fetched field list.
pub(crate) fn schema_count(collection: &Id, fields: &[Field]) -> usize {
    fields
        .iter()
        .filter(|f| f.owner_id() == Some(collection))
        .count()
}

/// Form → form fields + responses.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FormTree {
    pub forms: Level<Form>,
    pub fields: Level<FormField>,
    pub responses: Level<FormResponse>,
}

impl FormTree {
    pub fn begin_load_forms(&mut self) -> Ticket {
        self.forms.begin()
    }

    pub fn apply_forms(&mut self, ticket: Ticket, forms: Vec<Form>) -> bool {
        let had_selection = self.forms.selected().is_some();
        let applied = self.forms.accept(ticket, forms);
        if applied && had_selection && self.forms.selected().is_none() {
            self.fields.reset();
            self.responses.reset();
        }
        applied
    }

    pub fn select_form(&mut self, id: Option<Id>) -> Option<(Ticket, Ticket)> {
        self.forms.select(id.clone());
        self.fields.reset();
        self.responses.reset();
        id.map(|_| (self.fields.begin(), self.responses.begin()))
    }

    pub fn apply_fields(&mut self, ticket: Ticket, fields: Vec<FormField>) -> bool {
        self.fields.accept(ticket, fields)
    }

    pub fn apply_responses(&mut self, ticket: Ticket, responses: Vec<FormResponse>) -> bool {
        self.responses.accept(ticket, responses)
    }

    /// Re-fetch responses for the current form, e.g. after a submission.
    pub fn reload_responses(&mut self) -> Option<Ticket> {
        self.forms.selected()?;
        Some(self.responses.begin())
    }

    pub fn remove_form(&mut self, id: &Id) {
        if self.forms.remove(id) {
            self.fields.reset();
            self.responses.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::api::{CollectionApi, PageApi};
    use crate::models::{FieldType, Role};
    use serde_json::json;

    fn page(id: &str) -> Page {
        Page {
            id: Id::from(id),
            name: id.to_string(),
        }
    }

    fn section(id: &str, page_id: &str) -> Section {
        Section {
            id: Id::from(id),
            name: id.to_string(),
            page_id: Id::from(page_id),
        }
    }

    fn field(id: &str, owner: &str) -> Field {
        Field {
            id: Id::from(id),
            name: id.to_string(),
            field_type: FieldType::Text,
            content: String::new(),
            section_id: Id::from(owner),
            collection_id: None,
        }
    }

    fn loaded_tree() -> ContentTree {
        let mut tree = ContentTree::default();
        let t = tree.begin_load_pages();
        tree.apply_pages(t, vec![page("p1"), page("p2")]);
        let t = tree.select_page(Some(Id::from("p1"))).expect("ticket");
        tree.apply_sections(t, vec![section("s1", "p1"), section("s2", "p1")]);
        let t = tree.select_section(Some(Id::from("s1"))).expect("ticket");
        tree.apply_fields(t, vec![field("f1", "s1"), field("f2", "s1")]);
        tree
    }

    #[test]
    fn test_selecting_page_clears_descendants() {
        let mut tree = loaded_tree();
        assert_eq!(tree.fields.items().len(), 2);

        let ticket = tree.select_page(Some(Id::from("p2")));
        assert!(ticket.is_some());
        assert!(tree.sections.selected().is_none());
        assert!(tree.sections.items().is_empty());
        assert!(tree.fields.items().is_empty());
    }

    #[test]
    fn test_deleting_selected_page_clears_section_and_fields() {
        let mut tree = loaded_tree();
        tree.remove_page(&Id::from("p1"));
        assert!(tree.pages.selected().is_none());
        assert!(tree.sections.selected().is_none());
        assert!(tree.fields.items().is_empty());
        assert_eq!(tree.pages.items().len(), 1);
    }

    #[test]
    fn test_deleting_other_page_keeps_selection() {
        let mut tree = loaded_tree();
        tree.remove_page(&Id::from("p2"));
        assert_eq!(tree.pages.selected(), Some(&Id::from("p1")));
        assert_eq!(tree.fields.items().len(), 2);
    }

    #[test]
    fn test_deleting_selected_section_clears_fields() {
        let mut tree = loaded_tree();
        tree.remove_section(&Id::from("s1"));
        assert!(tree.sections.selected().is_none());
        assert!(tree.fields.items().is_empty());
        assert_eq!(tree.pages.selected(), Some(&Id::from("p1")));
    }

    #[test]
    fn test_superseded_section_fetch_never_overwrites_newer() {
        let mut tree = ContentTree::default();
        let first = tree.select_page(Some(Id::from("p1"))).expect("ticket");
        let second = tree.select_page(Some(Id::from("p2"))).expect("ticket");

        assert!(tree.apply_sections(second, vec![section("s9", "p2")]));
        assert!(!tree.apply_sections(first, vec![section("s1", "p1")]));
        assert_eq!(tree.sections.items(), &[section("s9", "p2")]);
    }

    #[test]
    fn test_fields_response_after_page_change_is_dropped() {
        let mut tree = loaded_tree();
        let t = tree.select_section(Some(Id::from("s2"))).expect("ticket");
        tree.select_page(Some(Id::from("p2")));
        assert!(!tree.apply_fields(t, vec![field("f3", "s2")]));
        assert!(tree.fields.items().is_empty());
    }

    #[test]
    fn test_fields_are_scoped_to_selected_section() {
        let mut tree = loaded_tree();
        let t = tree.select_section(Some(Id::from("s2"))).expect("ticket");
        tree.apply_fields(t, vec![field("f1", "s1"), field("f5", "s2")]);
        let ids: Vec<&str> = tree.fields.items().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f5"]);
    }

    #[test]
    fn test_reload_drops_vanished_selection() {
        let mut tree = loaded_tree();
        let t = tree.begin_load_pages();
        tree.apply_pages(t, vec![page("p2")]);
        assert!(tree.pages.selected().is_none());
        assert!(tree.sections.items().is_empty());
    }

    #[test]
    fn test_collection_schema_filters_by_owner() {
        let mut tree = CollectionTree::default();
        let (schema_t, items_t) = tree.select_collection(Some(Id::from("c1"))).expect("tickets");
        tree.apply_schema(schema_t, vec![field("f1", "c1"), field("f2", "s1"), field("title", "c1")]);
        tree.apply_items(items_t, vec![]);

        let names: Vec<&str> = tree.schema.items().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["f1", "title"]);
        assert_eq!(tree.title_field().map(|f| f.name.as_str()), Some("title"));

        tree.remove_collection(&Id::from("c1"));
        assert!(tree.schema.items().is_empty());
        assert!(tree.title_field().is_none());
    }

    #[test]
    fn test_schema_count() {
        let fields = vec![field("a", "c1"), field("b", "c1"), field("c", "s1")];
        assert_eq!(schema_count(&Id::from("c1"), &fields), 2);
        assert_eq!(schema_count(&Id::from("c2"), &fields), 0);
    }

    #[test]
    fn test_form_tree_selection_and_delete() {
        let mut tree = FormTree::default();
        assert!(tree.reload_responses().is_none());
        let (ft, rt) = tree.select_form(Some(Id::from("fm1"))).expect("tickets");
        tree.apply_fields(ft, vec![]);
        tree.apply_responses(rt, vec![]);
        assert!(tree.reload_responses().is_some());

        tree.remove_form(&Id::from("fm1"));
        assert!(tree.forms.selected().is_none());
        assert!(tree.reload_responses().is_none());
    }

    #[test]
    fn test_settle_treats_404_and_403_as_empty() {
        let not_found = ApiError::from_response(404, "/sections/p1", &json!({}));
        let (items, err) = settle::<Section>(Err(not_found));
        assert!(items.is_empty());
        assert!(err.is_none());

        let forbidden = ApiError::from_response(403, "/sections/p1", &json!({}));
        let (items, err) = settle::<Section>(Err(forbidden));
        assert!(items.is_empty());
        assert!(err.is_none());

        let boom = ApiError::from_response(500, "/sections/p1", &json!({}));
        let (items, err) = settle::<Section>(Err(boom));
        assert!(items.is_empty());
        assert_eq!(err.map(|e| e.status), Some(Some(500)));
    }

    #[tokio::test]
    async fn test_user_page_list_is_intersection() {
        let api = FakeApi::new();
        api.seed_page("p1", "Home");
        api.seed_page("p2", "About");
        api.seed_page("p3", "Blog");
        api.set_allow_list("u1", ResourceFamily::Pages, json!({"data": ["p1", {"_id": "p3"}]}));
        let user = User {
            id: Some(Id::from("u1")),
            username: "u".to_string(),
            email: String::new(),
            role: Role::User,
        };

        let visible = load_visible(&api, &user, ResourceFamily::Pages, api.list_pages().await).await;
        let names: Vec<&str> = visible.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Blog"]);
        assert!(visible.error.is_none());
    }

    #[tokio::test]
    async fn test_forbidden_allow_list_yields_zero_pages_silently() {
        let api = FakeApi::new();
        api.seed_page("p1", "Home");
        api.fail("allowed_ids", 403);
        let user = User {
            id: Some(Id::from("u1")),
            username: "u".to_string(),
            email: String::new(),
            role: Role::User,
        };

        let visible = load_visible(&api, &user, ResourceFamily::Pages, api.list_pages().await).await;
        assert!(visible.items.is_empty());
        assert!(visible.error.is_none());
    }

    #[tokio::test]
    async fn test_forbidden_list_fetch_shows_empty_without_error() {
        let api = FakeApi::new();
        api.seed_collection("c1", "Posts");
        api.fail("list_collections", 403);
        let admin = User {
            id: Some(Id::from("a1")),
            username: "root".to_string(),
            email: String::new(),
            role: Role::Admin,
        };

        let visible = load_visible(
            &api,
            &admin,
            ResourceFamily::Collections,
            api.list_collections().await,
        )
        .await;
        assert!(visible.items.is_empty());
        assert!(visible.error.is_none());
    }

    #[tokio::test]
    async fn test_overview_counts_only_granted_content() {
        let api = FakeApi::new();
        api.seed_page("p1", "Home");
        api.seed_page("p2", "About");
        api.seed_collection("c1", "Posts");
        api.seed_form("fm1", "Contact");
        api.seed_form("fm2", "Survey");
        api.set_allow_list("u1", ResourceFamily::Pages, json!({"pageIds": ["p2"]}));
        api.set_allow_list("u1", ResourceFamily::Forms, json!(["fm1", "fm2"]));
        api.fail_with("list_collections", 500, json!({}));
        let user = User {
            id: Some(Id::from("u1")),
            username: "u".to_string(),
            email: String::new(),
            role: Role::User,
        };

        let overview = load_overview(&api, &user).await.expect("overview");
        let names: Vec<&str> = overview.pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["About"]);
        assert_eq!(overview.collections, 0);
        assert_eq!(overview.forms, 2);
        assert_eq!(overview.errors, vec!["Failed to load collections".to_string()]);
    }

    #[tokio::test]
    async fn test_permission_server_error_reports_and_hides() {
        let api = FakeApi::new();
        api.seed_collection("c1", "Posts");
        api.fail("allowed_ids", 500);
        let user = User {
            id: Some(Id::from("u1")),
            username: "u".to_string(),
            email: String::new(),
            role: Role::User,
        };

        let visible = load_visible(
            &api,
            &user,
            ResourceFamily::Collections,
            api.list_collections().await,
        )
        .await;
        assert!(visible.items.is_empty());
        assert_eq!(
            visible.error.as_deref(),
            Some("Failed to load permissions for collections")
        );
    }

    #[tokio::test]
    async fn test_admin_list_is_unfiltered_and_list_errors_surface() {
        let api = FakeApi::new();
        api.seed_page("p1", "Home");
        let admin = User {
            id: Some(Id::from("a1")),
            username: "root".to_string(),
            email: String::new(),
            role: Role::Admin,
        };
        let visible = load_visible(&api, &admin, ResourceFamily::Pages, api.list_pages().await).await;
        assert_eq!(visible.items.len(), 1);

        api.fail("list_pages", 503);
        let visible = load_visible(&api, &admin, ResourceFamily::Pages, api.list_pages().await).await;
        assert!(visible.items.is_empty());
        assert_eq!(visible.error.as_deref(), Some("Failed to load pages"));
    }
}
