//! Feed entries: one human-readable line per change on an entity.

use crate::event::{ChangeDescription, ChangeEvent, EventType, FieldChange};
use crate::profile::RenderingProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One activity-feed line associated with an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub message: String,
}

impl FeedEntry {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Field values as shown to readers: strings verbatim, the rest as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Copy)]
enum FieldAction {
    Added,
    Updated,
    Deleted,
}

fn describe_field(
    profile: &dyn RenderingProfile,
    action: FieldAction,
    field: &FieldChange,
) -> String {
    let name = profile.bold(&field.name);
    match action {
        FieldAction::Added => {
            let value = field.new_value.as_ref().map(display_value).unwrap_or_default();
            format!("Added {name}: {value}")
        }
        FieldAction::Updated => {
            let old = field.old_value.as_ref().map(display_value);
            let new = field.new_value.as_ref().map(display_value).unwrap_or_default();
            format!("Updated {name}: {}", profile.render_diff(old.as_deref(), &new))
        }
        FieldAction::Deleted => format!("Deleted {name}"),
    }
}

/// Lines for every field in a change description: added, updated, then deleted.
#[must_use]
pub fn describe_changes(
    profile: &dyn RenderingProfile,
    change: &ChangeDescription,
) -> Vec<FeedEntry> {
    let added = change.fields_added.iter().map(|f| (FieldAction::Added, f));
    let updated = change.fields_updated.iter().map(|f| (FieldAction::Updated, f));
    let deleted = change.fields_deleted.iter().map(|f| (FieldAction::Deleted, f));

    added
        .chain(updated)
        .chain(deleted)
        .map(|(action, field)| FeedEntry::new(describe_field(profile, action, field)))
        .collect()
}

/// Feed lines for an entity event.
///
/// Lifecycle events get a single summary line, naming the subject when the
/// event knows its fqn; updates describe each changed field. Events with
/// nothing to say yield no entries.
#[must_use]
pub fn describe_event(profile: &dyn RenderingProfile, event: &ChangeEvent) -> Vec<FeedEntry> {
    let summary = match event.event_type {
        EventType::EntityCreated => Some("Created"),
        EventType::EntitySoftDeleted => Some("Soft deleted"),
        EventType::EntityDeleted => Some("Deleted"),
        EventType::EntityRestored => Some("Restored"),
        _ => None,
    };

    if let Some(verb) = summary {
        let line = match event.fqn() {
            Some(fqn) => format!("{verb} {}{fqn}", profile.bold_with_space(&event.entity_type)),
            None => format!("{verb} {}", profile.bold(&event.entity_type)),
        };
        return vec![FeedEntry::new(line)];
    }

    event
        .change_description
        .as_ref()
        .filter(|change| !change.is_empty())
        .map(|change| describe_changes(profile, change))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::profile::SlackProfile;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;

    fn slack() -> SlackProfile {
        SlackProfile::new("http://localhost:8585")
    }

    fn messages(entries: Vec<FeedEntry>) -> Vec<String> {
        entries.into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_describe_changes_order_and_format() {
        let change = ChangeDescription {
            fields_added: vec![FieldChange::new("tags", None, Some(json!(["PII.Sensitive"])))],
            fields_updated: vec![FieldChange::new(
                "description",
                Some(json!("Orders placed today")),
                Some(json!("Orders placed this week")),
            )],
            fields_deleted: vec![FieldChange::new("owner", Some(json!("alice")), None)],
        };

        assert_eq!(
            messages(describe_changes(&slack(), &change)),
            vec![
                r#"Added *tags*: ["PII.Sensitive"]"#.to_string(),
                "Updated *description*: Orders placed ~today~ *this week*".to_string(),
                "Deleted *owner*".to_string(),
            ]
        );
    }

    #[test]
    fn test_describe_lifecycle_event() {
        let entity = Entity::new("table", "orders").with_fqn("shop.public.orders");
        let event = ChangeEvent::for_entity(EventType::EntitySoftDeleted, entity, "alice");

        assert_eq!(
            messages(describe_event(&slack(), &event)),
            vec!["Soft deleted *table* shop.public.orders".to_string()]
        );
    }

    #[test]
    fn test_lifecycle_event_without_fqn_omits_subject() {
        let event = ChangeEvent::new(EventType::EntityDeleted, "table", Uuid::new_v4(), "alice");

        assert_eq!(
            messages(describe_event(&slack(), &event)),
            vec!["Deleted *table*".to_string()]
        );
    }

    #[test]
    fn test_event_fqn_prefers_event_over_payload() {
        let entity = Entity::new("table", "orders").with_fqn("shop.public.orders");
        let event = ChangeEvent::for_entity(EventType::EntityCreated, entity, "alice");
        assert_eq!(event.fqn(), Some("shop.public.orders"));

        let event = event.with_fqn("shop.public.orders_v2");
        assert_eq!(event.fqn(), Some("shop.public.orders_v2"));
    }

    #[test]
    fn test_describe_update_without_changes_is_empty() {
        let entity = Entity::new("table", "orders").with_fqn("shop.public.orders");
        let event = ChangeEvent::for_entity(EventType::EntityUpdated, entity, "alice");

        assert!(describe_event(&slack(), &event).is_empty());
    }
}
