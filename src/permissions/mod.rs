use crate::api::{ApiResult, AuthApi};
use crate::models::{HasId, Id, ResourceFamily, Role, User};
use std::collections::BTreeSet;

/// Ids a non-admin user may see for one resource family.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AllowList(BTreeSet<Id>);

impl AllowList {
    pub fn contains(&self, id: &Id) -> bool {
        self.0.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn toggle(&mut self, id: &Id) {
        if !self.0.remove(id) {
            self.0.insert(id.clone());
        }
    }

    pub fn to_vec(&self) -> Vec<Id> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<Id> for AllowList {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|id| !id.is_empty()).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Visibility {
    All,
    Only(AllowList),
}

impl Default for Visibility {
    fn default() -> Self {
        Self::fail_closed()
    }
}

impl Visibility {
    pub fn fail_closed() -> Self {
        Self::Only(AllowList::default())
    }

    pub fn allows(&self, id: &Id) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Only(list) => list.contains(id),
        }
    }

    pub fn filter<T: HasId>(&self, items: Vec<T>) -> Vec<T> {
        match self {
            Visibility::All => items,
            Visibility::Only(_) => items.into_iter().filter(|x| self.allows(x.id())).collect(),
        }
    }
}

/// Fetches and updates per-user allow-lists. Admins never reach the network.
pub(crate) struct PermissionResolver;

impl PermissionResolver {
    /// 403/404 mean "nothing granted yet" and resolve to an empty list.
    pub async fn allowed_ids(
        api: &impl AuthApi,
        user_id: Option<&Id>,
        family: ResourceFamily,
    ) -> ApiResult<AllowList> {
        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            log::warn!("no user id; {family} allow-list is empty");
            return Ok(AllowList::default());
        };

        match api.allowed_ids(user_id, family).await {
            Ok(ids) => Ok(ids.into_iter().collect()),
            Err(e) if e.is_forbidden() || e.is_not_found() => {
                log::warn!("{family} allow-list for {user_id} unavailable ({e}); showing nothing");
                Ok(AllowList::default())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn visibility(
        api: &impl AuthApi,
        user: &User,
        family: ResourceFamily,
    ) -> ApiResult<Visibility> {
        if user.role == Role::Admin {
            return Ok(Visibility::All);
        }
        Self::allowed_ids(api, user.id.as_ref(), family)
            .await
            .map(Visibility::Only)
    }

    /// Full replace of a user's allow-list.
    pub async fn set_allowed_ids(
        api: &impl AuthApi,
        user_id: &Id,
        family: ResourceFamily,
        list: &AllowList,
    ) -> ApiResult<()> {
        api.set_allowed_ids(user_id, family, &list.to_vec()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::models::Page;
    use serde_json::json;

    fn user(id: &str, role: Role) -> User {
        User {
            id: Some(Id::from(id)),
            username: id.to_string(),
            email: String::new(),
            role,
        }
    }

    fn pages(ids: &[&str]) -> Vec<Page> {
        ids.iter()
            .map(|id| Page {
                id: Id::from(*id),
                name: id.to_uppercase(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_admin_sees_everything_without_request() {
        let api = FakeApi::new();
        let vis = PermissionResolver::visibility(&api, &user("a", Role::Admin), ResourceFamily::Pages)
            .await
            .expect("admin visibility");
        assert_eq!(vis, Visibility::All);
        assert_eq!(api.calls_to("allowed_ids"), 0);
        assert_eq!(vis.filter(pages(&["p1", "p2"])).len(), 2);
    }

    #[tokio::test]
    async fn test_user_sees_intersection_with_mixed_id_shapes() {
        let api = FakeApi::new();
        api.set_allow_list("u1", ResourceFamily::Pages, json!(["p1", {"_id": "p3"}, 42]));
        let vis = PermissionResolver::visibility(&api, &user("u1", Role::User), ResourceFamily::Pages)
            .await
            .expect("user visibility");

        let visible = vis.filter(pages(&["p1", "p2", "p3", "42"]));
        let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3", "42"]);
    }

    #[tokio::test]
    async fn test_wrapped_allow_list_bodies() {
        let api = FakeApi::new();
        api.set_allow_list("u1", ResourceFamily::Collections, json!({"allowedCollections": ["c1"]}));
        api.set_allow_list("u1", ResourceFamily::Forms, json!({"formIds": [{"$oid": "f1"}]}));

        let c = PermissionResolver::allowed_ids(&api, Some(&Id::from("u1")), ResourceFamily::Collections)
            .await
            .expect("collections");
        assert!(c.contains(&Id::from("c1")));
        let f = PermissionResolver::allowed_ids(&api, Some(&Id::from("u1")), ResourceFamily::Forms)
            .await
            .expect("forms");
        assert!(f.contains(&Id::from("f1")));
    }

    #[tokio::test]
    async fn test_forbidden_and_not_found_fail_closed_without_error() {
        let api = FakeApi::new();
        api.fail("allowed_ids", 403);
        let vis = PermissionResolver::visibility(&api, &user("u1", Role::User), ResourceFamily::Pages)
            .await
            .expect("403 is not an error");
        assert!(vis.filter(pages(&["p1", "p2"])).is_empty());

        api.fail("allowed_ids", 404);
        let list = PermissionResolver::allowed_ids(&api, Some(&Id::from("u1")), ResourceFamily::Forms)
            .await
            .expect("404 is not an error");
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_other_failures_are_returned() {
        let api = FakeApi::new();
        api.fail("allowed_ids", 500);
        let err = PermissionResolver::visibility(&api, &user("u1", Role::User), ResourceFamily::Pages)
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(500));
    }

    #[tokio::test]
    async fn test_missing_user_id_skips_request() {
        let api = FakeApi::new();
        let mut anonymous = user("x", Role::User);
        anonymous.id = None;
        let vis = PermissionResolver::visibility(&api, &anonymous, ResourceFamily::Pages)
            .await
            .expect("empty visibility");
        assert_eq!(vis, Visibility::fail_closed());
        assert_eq!(api.calls_to("allowed_ids"), 0);
    }

    #[tokio::test]
    async fn test_set_allowed_ids_replaces_list() {
        let api = FakeApi::new();
        let uid = Id::from("u1");
        let mut list: AllowList = vec![Id::from("p1")].into_iter().collect();
        list.toggle(&Id::from("p2"));
        list.toggle(&Id::from("p1"));

        PermissionResolver::set_allowed_ids(&api, &uid, ResourceFamily::Pages, &list)
            .await
            .expect("saved");
        let reloaded = PermissionResolver::allowed_ids(&api, Some(&uid), ResourceFamily::Pages)
            .await
            .expect("reloaded");
        assert_eq!(reloaded.to_vec(), vec![Id::from("p2")]);
    }
}
