//! Transient success / error notifications.

/// How long a notification stays on screen.
pub(crate) const TOAST_TTL_MS: i32 = 4000;

/// Cap on simultaneously visible notifications; the oldest is dropped first.
const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    /// Returns the new toast's id so the caller can schedule its dismissal.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> Option<u64> {
        let message = message.into();
        if message.trim().is_empty() {
            return None;
        }
        // Same text already on screen: don't stack duplicates.
        if self
            .items
            .iter()
            .any(|t| t.kind == kind && t.message == message)
        {
            return None;
        }

        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast { id, kind, message });
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
        Some(id)
    }

    pub fn success(&mut self, message: impl Into<String>) -> Option<u64> {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Option<u64> {
        self.push(ToastKind::Error, message)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut toasts = Toasts::default();
        let a = toasts.success("Page created successfully").expect("pushed");
        let b = toasts.error("Failed to load pages").expect("pushed");
        assert_ne!(a, b);
        assert_eq!(toasts.items().len(), 2);

        toasts.dismiss(a);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].kind, ToastKind::Error);
    }

    #[test]
    fn test_blank_and_duplicate_messages_are_skipped() {
        let mut toasts = Toasts::default();
        assert!(toasts.error("  ").is_none());
        assert!(toasts.error("Failed to load data").is_some());
        assert!(toasts.error("Failed to load data").is_none());
        assert!(toasts.success("Failed to load data").is_some());
        assert_eq!(toasts.items().len(), 2);
    }

    #[test]
    fn test_oldest_is_dropped_past_cap() {
        let mut toasts = Toasts::default();
        for i in 0..(MAX_VISIBLE + 2) {
            toasts.success(format!("saved {i}"));
        }
        assert_eq!(toasts.items().len(), MAX_VISIBLE);
        assert_eq!(toasts.items()[0].message, "saved 2");
    }
}
