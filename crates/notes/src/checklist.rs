use chrono::{DateTime, Utc};
use modelkit_core::model_object;

/// One entry of a note's checklist.
#[derive(Debug, Clone, Default)]
pub struct ChecklistItem {
    pub title: String,
    pub done: bool,
    pub due: Option<DateTime<Utc>>,
}

model_object!(ChecklistItem, "ChecklistItem", {
    title: String,
    done: bool,
    due: Option<DateTime<Utc>>,
});

impl ChecklistItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn due_at(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Open and past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.done && self.due.is_some_and(|due| due < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use modelkit_core::{ModelObject, Value};

    #[test]
    fn overdue_only_while_open() {
        let now = Utc::now();
        let mut item = ChecklistItem::new("file taxes").due_at(now - Duration::days(1));
        assert!(item.is_overdue(now));
        item.done = true;
        assert!(!item.is_overdue(now));
        assert!(!ChecklistItem::new("someday").is_overdue(now));
    }

    #[test]
    fn missing_due_dates_archive_as_null() {
        let archive = ChecklistItem::new("x").encode();
        assert_eq!(archive.get("due"), Some(&Value::Null));
        let decoded = ChecklistItem::decode(&archive).unwrap();
        assert_eq!(decoded.due, None);
    }
}
