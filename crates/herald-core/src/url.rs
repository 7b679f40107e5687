//! Default URL policy: which catalog page each entity type links to.

use crate::entity::{
    Entity, EntityRef, GLOSSARY, GLOSSARY_TERM, INGESTION_PIPELINE, Include, TAG, TEST_CASE,
};
use crate::error::Result;
use crate::lookup::{CatalogLookup, UrlResolver};
use crate::profile::RenderingProfile;
use crate::thread::ThreadType;
use tracing::debug;

const INCIDENT_MANAGER: &str = "incident-manager";
const TAGS: &str = "tags";

/// Resolves entity and thread links against the catalog's page layout.
///
/// Entities without a fully-qualified name are re-fetched by id.
pub struct CatalogUrlResolver<'a> {
    catalog: &'a dyn CatalogLookup,
}

impl<'a> CatalogUrlResolver<'a> {
    #[must_use]
    pub fn new(catalog: &'a dyn CatalogLookup) -> Self {
        Self { catalog }
    }

    fn resolve_fqn(&self, entity_type: &str, entity: &Entity) -> Result<String> {
        if let Some(fqn) = entity.fqn() {
            return Ok(fqn.to_string());
        }

        debug!(entity_type, id = %entity.id, "Entity has no fqn, fetching by id");
        let fetched = self
            .catalog
            .entity(entity_type, &EntityRef::Id(entity.id), Include::NonDeleted)?;
        Ok(fetched.fqn().unwrap_or(&fetched.name).to_string())
    }
}

/// Ingestions page of the service owning a pipeline, if the pipeline names one.
fn ingestions_url(profile: &dyn RenderingProfile, entity: &Entity) -> Option<String> {
    entity.service.as_ref().map(|service| {
        let prefix = format!("service/{}s", service.entity_type);
        profile.entity_url(&prefix, &service.name, "ingestions")
    })
}

/// Classification part of a tag fqn (`PII.Sensitive` -> `PII`).
fn classification_of(fqn: &str) -> &str {
    fqn.split('.').next().unwrap_or(fqn)
}

impl UrlResolver for CatalogUrlResolver<'_> {
    fn entity_url(
        &self,
        profile: &dyn RenderingProfile,
        entity_type: &str,
        entity: &Entity,
    ) -> Result<String> {
        let fqn = self.resolve_fqn(entity_type, entity)?;

        Ok(match entity_type {
            TEST_CASE => profile.entity_url(INCIDENT_MANAGER, &fqn, "test-case-results"),
            GLOSSARY_TERM => profile.entity_url(GLOSSARY, &fqn, ""),
            TAG => profile.entity_url(TAGS, classification_of(&fqn), ""),
            INGESTION_PIPELINE => ingestions_url(profile, entity)
                .unwrap_or_else(|| profile.entity_url(entity_type, &fqn, "")),
            _ => profile.entity_url(entity_type, &fqn, ""),
        })
    }

    fn thread_url(
        &self,
        profile: &dyn RenderingProfile,
        thread_type: ThreadType,
        entity_type: &str,
        entity: &Entity,
    ) -> Result<String> {
        let active_tab = match thread_type {
            ThreadType::Task => "activity_feed/tasks",
            ThreadType::Conversation | ThreadType::Announcement => "activity_feed/all",
        };
        let fqn = self.resolve_fqn(entity_type, entity)?;

        Ok(match entity_type {
            TEST_CASE => profile.entity_url(INCIDENT_MANAGER, &fqn, "issues"),
            GLOSSARY_TERM => profile.entity_url(GLOSSARY, &fqn, active_tab),
            TAG => profile.entity_url(TAGS, classification_of(&fqn), ""),
            INGESTION_PIPELINE => ingestions_url(profile, entity)
                .unwrap_or_else(|| profile.entity_url(entity_type, &fqn, active_tab)),
            _ => profile.entity_url(entity_type, &fqn, active_tab),
        })
    }
}
