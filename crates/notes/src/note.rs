use chrono::{DateTime, Utc};
use uuid::Uuid;

use modelkit_core::{
    ChangeOutcome, ModelObject, ModelResult, Property, PropertyChangeObserver, PropertyValue, Rect,
    Value, ValueKind, write_property,
};

use crate::checklist::ChecklistItem;
use crate::tag::Tag;

/// A note pinned somewhere on a board.
///
/// Every write made through the mutator (the helpers below, an `Observed`
/// note, or `set_property` with any observer) runs the note's own hooks: an
/// empty title is refused, and every committed change bumps
/// [`Note::revision`]. The revision counter is session
/// state only; it is neither compared nor archived.
#[derive(Debug, Clone, Default)]
pub struct Note {
    id: Uuid,
    title: String,
    body: String,
    pinned: bool,
    frame: Rect,
    created_at: DateTime<Utc>,
    tag: Option<Tag>,
    items: Vec<ChecklistItem>,
    revision: u64,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            created_at: Utc::now(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Number of committed observed changes since this instance was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn rename(&mut self, title: impl Into<String>) -> ModelResult<ChangeOutcome> {
        let title: String = title.into();
        write_property(self, "title", title)
    }

    pub fn write(&mut self, body: impl Into<String>) -> ModelResult<ChangeOutcome> {
        let body: String = body.into();
        write_property(self, "body", body)
    }

    pub fn pin(&mut self, pinned: bool) -> ModelResult<ChangeOutcome> {
        write_property(self, "pinned", pinned)
    }

    pub fn move_to(&mut self, frame: Rect) -> ModelResult<ChangeOutcome> {
        write_property(self, "frame", frame)
    }

    pub fn retag(&mut self, tag: Option<&Tag>) -> ModelResult<ChangeOutcome> {
        write_property(self, "tag", tag_value(tag))
    }

    /// Append a checklist entry (the whole list is replaced, so observers see
    /// the before and after lists).
    pub fn add_item(&mut self, item: ChecklistItem) -> ModelResult<ChangeOutcome> {
        let mut items = self.items.clone();
        items.push(item);
        write_property(self, "items", items_value(&items))
    }

    /// Open checklist entries past their due date.
    pub fn overdue_items(&self, now: DateTime<Utc>) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(move |i| i.is_overdue(now))
    }
}

fn tag_value(tag: Option<&Tag>) -> Value {
    match tag {
        Some(tag) => Value::from_model(tag),
        None => Value::Null,
    }
}

fn items_value(items: &[ChecklistItem]) -> Value {
    Value::List(items.iter().map(Value::from_model).collect())
}

static NOTE_PROPERTIES: [Property<Note>; 8] = [
    Property::new(
        "id",
        ValueKind::Uuid,
        false,
        |m: &Note| m.id.into_value(),
        |m: &mut Note, v| {
            m.id = Uuid::from_value("id", v)?;
            Ok(())
        },
    ),
    Property::new(
        "title",
        ValueKind::Text,
        false,
        |m: &Note| m.title.clone().into_value(),
        |m: &mut Note, v| {
            m.title = String::from_value("title", v)?;
            Ok(())
        },
    ),
    Property::new(
        "body",
        ValueKind::Text,
        false,
        |m: &Note| m.body.clone().into_value(),
        |m: &mut Note, v| {
            m.body = String::from_value("body", v)?;
            Ok(())
        },
    ),
    Property::new(
        "pinned",
        ValueKind::Bool,
        false,
        |m: &Note| m.pinned.into_value(),
        |m: &mut Note, v| {
            m.pinned = bool::from_value("pinned", v)?;
            Ok(())
        },
    ),
    Property::new(
        "frame",
        ValueKind::Rect,
        false,
        |m: &Note| m.frame.into_value(),
        |m: &mut Note, v| {
            m.frame = Rect::from_value("frame", v)?;
            Ok(())
        },
    ),
    Property::new(
        "created_at",
        ValueKind::Date,
        false,
        |m: &Note| m.created_at.into_value(),
        |m: &mut Note, v| {
            m.created_at = DateTime::<Utc>::from_value("created_at", v)?;
            Ok(())
        },
    ),
    Property::new(
        "tag",
        ValueKind::Model,
        true,
        |m: &Note| tag_value(m.tag.as_ref()),
        |m: &mut Note, v| {
            m.tag = match v {
                Value::Null => None,
                other => Some(other.into_model("tag")?),
            };
            Ok(())
        },
    ),
    Property::new(
        "items",
        ValueKind::List,
        false,
        |m: &Note| items_value(&m.items),
        |m: &mut Note, v| {
            // Decode every entry before replacing the list.
            let items = Vec::<Value>::from_value("items", v)?
                .into_iter()
                .map(|item| item.into_model("items"))
                .collect::<ModelResult<Vec<ChecklistItem>>>()?;
            m.items = items;
            Ok(())
        },
    ),
];

impl ModelObject for Note {
    const CLASS_NAME: &'static str = "Note";

    fn properties() -> &'static [Property<Self>] {
        &NOTE_PROPERTIES
    }
}

impl PropertyChangeObserver for Note {
    fn property_will_change(&mut self, name: &str, _old: &Value, new: &Value) -> bool {
        match name {
            "title" => new.as_str().is_some_and(|t| !t.trim().is_empty()),
            _ => true,
        }
    }

    fn property_did_change(&mut self, name: &str, _old: &Value, _new: &Value) {
        self.revision += 1;
        tracing::debug!(note = %self.id, property = name, revision = self.revision, "note changed");
    }
}
