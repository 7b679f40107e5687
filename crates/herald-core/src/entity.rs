//! Catalog entity model and the registry of entity types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject type used by events about discussion threads.
pub const THREAD: &str = "thread";

pub const TABLE: &str = "table";
pub const QUERY: &str = "query";
pub const USER: &str = "user";
pub const TEAM: &str = "team";
pub const TAG: &str = "tag";
pub const GLOSSARY: &str = "glossary";
pub const GLOSSARY_TERM: &str = "glossaryTerm";
pub const TEST_CASE: &str = "testCase";
pub const TEST_SUITE: &str = "testSuite";
pub const INGESTION_PIPELINE: &str = "ingestionPipeline";

/// Entity types the catalog knows how to describe.
pub const ENTITY_TYPES: &[&str] = &[
    TABLE,
    QUERY,
    USER,
    TEAM,
    TAG,
    GLOSSARY,
    GLOSSARY_TERM,
    TEST_CASE,
    TEST_SUITE,
    INGESTION_PIPELINE,
    "classification",
    "database",
    "databaseSchema",
    "databaseService",
    "storedProcedure",
    "topic",
    "dashboard",
    "dashboardDataModel",
    "chart",
    "pipeline",
    "mlmodel",
    "container",
    "searchIndex",
    "apiCollection",
    "apiEndpoint",
    "metric",
    "domain",
    "dataProduct",
    "dataContract",
    "messagingService",
    "dashboardService",
    "pipelineService",
    "mlmodelService",
    "storageService",
    "searchService",
    "apiService",
];

/// Whether `entity_type` is a registered catalog entity type.
#[must_use]
pub fn is_registered_entity_type(entity_type: &str) -> bool {
    ENTITY_TYPES.contains(&entity_type)
}

/// Which entities a lookup may return with respect to soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Include {
    #[default]
    NonDeleted,
    Deleted,
    All,
}

impl Include {
    /// Whether an entity with the given deletion flag passes this policy.
    #[must_use]
    pub const fn admits(self, deleted: bool) -> bool {
        match self {
            Self::NonDeleted => !deleted,
            Self::Deleted => deleted,
            Self::All => true,
        }
    }
}

/// How a lookup identifies an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Id(Uuid),
    Fqn(String),
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Fqn(fqn) => f.write_str(fqn),
        }
    }
}

/// Lightweight pointer to another entity, e.g. a task assignee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntityReference {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EntityReference {
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            entity_type: USER.to_string(),
            name: name.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn team(name: impl Into<String>) -> Self {
        Self {
            entity_type: TEAM.to_string(),
            name: name.into(),
            display_name: None,
        }
    }
}

/// A catalog entity as returned by lookups and carried in event payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Entity type (e.g. `table`, `testCase`).
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Short name.
    pub name: String,

    /// Fully-qualified name, when resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning service, for entities that live under one (e.g. ingestion pipelines).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<EntityReference>,

    /// Soft deletion flag.
    #[serde(default)]
    pub deleted: bool,
}

impl Entity {
    /// Create a new entity with a fresh id.
    #[must_use]
    pub fn new(entity_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_type: entity_type.into(),
            name: name.into(),
            fully_qualified_name: None,
            display_name: None,
            description: None,
            service: None,
            deleted: false,
        }
    }

    #[must_use]
    pub fn with_fqn(mut self, fqn: impl Into<String>) -> Self {
        self.fully_qualified_name = Some(fqn.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_service(mut self, service: EntityReference) -> Self {
        self.service = Some(service);
        self
    }

    #[must_use]
    pub const fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    /// The fully-qualified name, if present and non-empty.
    #[must_use]
    pub fn fqn(&self) -> Option<&str> {
        self.fully_qualified_name
            .as_deref()
            .filter(|fqn| !fqn.trim().is_empty())
    }

    #[must_use]
    pub fn is_test_case(&self) -> bool {
        self.entity_type == TEST_CASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_entity_types() {
        assert!(is_registered_entity_type("table"));
        assert!(is_registered_entity_type("glossaryTerm"));
        assert!(!is_registered_entity_type(THREAD));
        assert!(!is_registered_entity_type("spreadsheet"));
    }

    #[test]
    fn test_include_policy() {
        assert!(Include::NonDeleted.admits(false));
        assert!(!Include::NonDeleted.admits(true));
        assert!(Include::Deleted.admits(true));
        assert!(!Include::Deleted.admits(false));
        assert!(Include::All.admits(true));
        assert!(Include::All.admits(false));
    }

    #[test]
    fn test_blank_fqn_is_missing() {
        let entity = Entity::new("table", "orders").with_fqn("  ");
        assert!(entity.fqn().is_none());

        let entity = entity.with_fqn("shop.orders");
        assert_eq!(entity.fqn(), Some("shop.orders"));
    }

    #[test]
    fn test_entity_yaml_shape() {
        let entity: Entity = serde_json::from_str(
            r#"{"type":"testCase","name":"null_check","fullyQualifiedName":"shop.orders.null_check"}"#,
        )
        .unwrap();

        assert!(entity.is_test_case());
        assert!(!entity.deleted);
    }
}
