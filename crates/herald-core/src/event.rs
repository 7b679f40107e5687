//! Change event model consumed by the message builders.

use crate::entity::{Entity, THREAD};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of change an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// Entity was created.
    EntityCreated,
    /// Entity was updated.
    EntityUpdated,
    /// Entity fields changed without a version bump.
    EntityFieldsChanged,
    /// Entity was soft deleted.
    EntitySoftDeleted,
    /// Entity was hard deleted (also used for deleted announcements).
    EntityDeleted,
    /// Soft deleted entity was restored.
    EntityRestored,
    /// Update request that changed nothing.
    EntityNoChange,
    /// Thread was opened.
    ThreadCreated,
    /// Thread was edited.
    ThreadUpdated,
    /// Reply posted on a thread.
    PostCreated,
    /// Reply edited.
    PostUpdated,
    /// Task thread resolved.
    TaskResolved,
    /// Task thread closed.
    TaskClosed,
    /// Logical test case added to a test suite.
    LogicalTestCaseAdded,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::EntityCreated => "entityCreated",
            Self::EntityUpdated => "entityUpdated",
            Self::EntityFieldsChanged => "entityFieldsChanged",
            Self::EntitySoftDeleted => "entitySoftDeleted",
            Self::EntityDeleted => "entityDeleted",
            Self::EntityRestored => "entityRestored",
            Self::EntityNoChange => "entityNoChange",
            Self::ThreadCreated => "threadCreated",
            Self::ThreadUpdated => "threadUpdated",
            Self::PostCreated => "postCreated",
            Self::PostUpdated => "postUpdated",
            Self::TaskResolved => "taskResolved",
            Self::TaskClosed => "taskClosed",
            Self::LogicalTestCaseAdded => "logicalTestCaseAdded",
        };
        f.write_str(name)
    }
}

/// A single field change inside a [`ChangeDescription`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Field name, dot separated for nested fields (e.g. `columns.id.description`).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl FieldChange {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            old_value,
            new_value,
        }
    }
}

/// Fields added, updated and deleted by an entity change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDescription {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_added: Vec<FieldChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_updated: Vec<FieldChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_deleted: Vec<FieldChange>,
}

impl ChangeDescription {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields_added.is_empty()
            && self.fields_updated.is_empty()
            && self.fields_deleted.is_empty()
    }
}

/// A change event emitted by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Unique event identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// What happened.
    pub event_type: EventType,

    /// Subject entity type, or `"thread"` for discussion activity.
    pub entity_type: String,

    /// Subject identifier (the thread id for thread events).
    pub entity_id: Uuid,

    /// Subject fully-qualified name when the producer knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_fully_qualified_name: Option<String>,

    /// Who caused the event.
    pub user_name: String,

    /// When the event occurred (epoch millis).
    pub timestamp: i64,

    /// Snapshot of the changed entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,

    /// What changed on the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_description: Option<ChangeDescription>,
}

impl ChangeEvent {
    /// Create a new event with auto-generated ID and current timestamp.
    #[must_use]
    pub fn new(
        event_type: EventType,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            entity_type: entity_type.into(),
            entity_id,
            entity_fully_qualified_name: None,
            user_name: user_name.into(),
            timestamp: Utc::now().timestamp_millis(),
            entity: None,
            change_description: None,
        }
    }

    /// Create an event whose subject is the given thread.
    #[must_use]
    pub fn for_thread(
        event_type: EventType,
        thread_id: Uuid,
        user_name: impl Into<String>,
    ) -> Self {
        Self::new(event_type, THREAD, thread_id, user_name)
    }

    /// Create an event whose subject is the given entity, carrying it as payload.
    #[must_use]
    pub fn for_entity(event_type: EventType, entity: Entity, user_name: impl Into<String>) -> Self {
        let mut event = Self::new(event_type, entity.entity_type.clone(), entity.id, user_name);
        event.entity_fully_qualified_name.clone_from(&entity.fully_qualified_name);
        event.entity = Some(entity);
        event
    }

    /// Set the subject's fully-qualified name.
    #[must_use]
    pub fn with_fqn(mut self, fqn: impl Into<String>) -> Self {
        self.entity_fully_qualified_name = Some(fqn.into());
        self
    }

    /// Subject fqn: the event's own, else the payload's.
    #[must_use]
    pub fn fqn(&self) -> Option<&str> {
        self.entity_fully_qualified_name
            .as_deref()
            .filter(|fqn| !fqn.trim().is_empty())
            .or_else(|| self.entity.as_ref().and_then(Entity::fqn))
    }

    /// Attach a change description.
    #[must_use]
    pub fn with_change_description(mut self, change: ChangeDescription) -> Self {
        self.change_description = Some(change);
        self
    }

    /// Drop the entity payload, keeping only the reference.
    #[must_use]
    pub fn without_entity(mut self) -> Self {
        self.entity = None;
        self
    }

    /// Whether the subject is a discussion thread.
    #[must_use]
    pub fn is_thread(&self) -> bool {
        self.entity_type == THREAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_wire_names() {
        let json = serde_json::to_string(&EventType::TaskClosed).unwrap();
        assert_eq!(json, r#""taskClosed""#);
        assert_eq!(EventType::PostCreated.to_string(), "postCreated");

        let parsed: EventType = serde_json::from_str(r#""entitySoftDeleted""#).unwrap();
        assert_eq!(parsed, EventType::EntitySoftDeleted);
    }

    #[test]
    fn test_event_deserialization_defaults() {
        let event: ChangeEvent = serde_json::from_value(json!({
            "eventType": "threadCreated",
            "entityType": "thread",
            "entityId": "8a3bc1e2-5f7d-4c8e-9b1a-2d3e4f5a6b7c",
            "userName": "alice",
            "timestamp": 1_700_000_000_000_i64
        }))
        .unwrap();

        assert!(event.is_thread());
        assert!(event.entity.is_none());
        assert!(event.change_description.is_none());
    }

    #[test]
    fn test_for_entity_copies_reference() {
        let entity = Entity::new("table", "orders").with_fqn("shop.public.orders");
        let event = ChangeEvent::for_entity(EventType::EntityUpdated, entity.clone(), "bob");

        assert_eq!(event.entity_type, "table");
        assert_eq!(event.entity_id, entity.id);
        assert_eq!(
            event.entity_fully_qualified_name.as_deref(),
            Some("shop.public.orders")
        );
        assert!(!event.is_thread());
    }
}
