mod actions;
mod drafts;

pub(crate) use actions::*;
pub(crate) use drafts::*;

use crate::models::{Field, Id};
use std::collections::{BTreeMap, BTreeSet};

/// Open/close state shared by every create/edit dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ModalState<D> {
    pub open: bool,
    /// Id of the entity being edited; `None` while creating.
    pub editing: Option<Id>,
    pub draft: D,
    pub submitting: bool,
}

impl<D: Default> ModalState<D> {
    pub fn open_create(&mut self) {
        *self = Self {
            open: true,
            ..Default::default()
        };
    }

    pub fn open_edit(&mut self, id: Id, draft: D) {
        *self = Self {
            open: true,
            editing: Some(id),
            draft,
            submitting: false,
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Swap in a newer server copy while editing `id`, unless the draft moved away from `seen`
    /// or a submit is under way.
    pub fn refresh(&mut self, id: &Id, seen: &D, fresh: D) -> bool
    where
        D: PartialEq,
    {
        let untouched = self.open
            && !self.submitting
            && self.editing.as_ref() == Some(id)
            && self.draft == *seen;
        if untouched {
            self.draft = fresh;
        }
        untouched
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn title(&self, noun: &str) -> String {
        if self.is_edit() {
            format!("Edit {noun}")
        } else {
            format!("Create {noun}")
        }
    }
}

/// Uploads in flight, per input. Submit stays disabled while any is pending.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct UploadTracker {
    pending: BTreeSet<String>,
}

impl UploadTracker {
    pub fn start(&mut self, key: &str) {
        self.pending.insert(key.to_string());
    }

    pub fn finish(&mut self, key: &str) {
        self.pending.remove(key);
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains(key)
    }

    pub fn blocks_submit(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Unsaved inline edits in the field list.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct InlineEdits {
    values: BTreeMap<Id, String>,
}

impl InlineEdits {
    pub fn edit(&mut self, id: &Id, value: String) {
        self.values.insert(id.clone(), value);
    }

    pub fn is_modified(&self, id: &Id) -> bool {
        self.values.contains_key(id)
    }

    pub fn value_for(&self, field: &Field) -> String {
        self.values
            .get(&field.id)
            .cloned()
            .unwrap_or_else(|| field.content.clone())
    }

    pub fn pending(&self, id: &Id) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    pub fn discard(&mut self, id: &Id) {
        self.values.remove(id);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Content to send when a boolean field's checkbox is toggled.
pub(crate) fn toggled(field: &Field) -> &'static str {
    if field.is_checked() {
        "false"
    } else {
        "true"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn boolean_field(content: &str) -> Field {
        Field {
            id: Id::from("f1"),
            name: "published".to_string(),
            field_type: FieldType::Boolean,
            content: content.to_string(),
            section_id: Id::from("s1"),
            collection_id: None,
        }
    }

    #[test]
    fn test_modal_open_close() {
        let mut m: ModalState<PageDraft> = ModalState::default();
        m.open_edit(Id::from("p1"), PageDraft { name: "Home".into() });
        assert!(m.open && m.is_edit());
        assert_eq!(m.title("Page"), "Edit Page");

        m.open_create();
        assert!(m.open && !m.is_edit());
        assert_eq!(m.draft, PageDraft::default());
        assert_eq!(m.title("Page"), "Create Page");

        m.close();
        assert_eq!(m, ModalState::default());
    }

    #[test]
    fn test_refresh_keeps_user_edits() {
        let seen = PageDraft { name: "Home".into() };
        let fresh = PageDraft { name: "Homepage".into() };

        let mut m: ModalState<PageDraft> = ModalState::default();
        m.open_edit(Id::from("p1"), seen.clone());
        assert!(!m.refresh(&Id::from("p2"), &seen, fresh.clone()));
        assert!(m.refresh(&Id::from("p1"), &seen, fresh.clone()));
        assert_eq!(m.draft, fresh);

        m.open_edit(Id::from("p1"), PageDraft { name: "Typed".into() });
        assert!(!m.refresh(&Id::from("p1"), &seen, fresh.clone()));
        assert_eq!(m.draft.name, "Typed");

        m.close();
        assert!(!m.refresh(&Id::from("p1"), &PageDraft::default(), fresh));
    }

    #[test]
    fn test_upload_tracker_blocks_submit_while_pending() {
        let mut uploads = UploadTracker::default();
        assert!(!uploads.blocks_submit());
        uploads.start("f1");
        uploads.start("f2");
        uploads.finish("f1");
        assert!(uploads.blocks_submit());
        assert!(uploads.is_pending("f2"));
        uploads.finish("f2");
        assert!(!uploads.blocks_submit());
    }

    #[test]
    fn test_inline_edits_track_modified_values() {
        let field = boolean_field("x");
        let mut edits = InlineEdits::default();
        assert_eq!(edits.value_for(&field), "x");
        assert!(!edits.is_modified(&field.id));

        edits.edit(&field.id, "y".to_string());
        assert!(edits.is_modified(&field.id));
        assert_eq!(edits.value_for(&field), "y");

        edits.discard(&field.id);
        assert_eq!(edits.pending(&field.id), None);
    }

    #[test]
    fn test_boolean_toggle_value() {
        assert_eq!(toggled(&boolean_field("true")), "false");
        assert_eq!(toggled(&boolean_field("false")), "true");
        assert_eq!(toggled(&boolean_field("")), "true");
    }
}
