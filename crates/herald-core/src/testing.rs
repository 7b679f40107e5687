//! In-memory collaborators for unit tests.

use crate::entity::{Entity, EntityRef, Include};
use crate::error::{CoreError, Result};
use crate::event::ChangeEvent;
use crate::feed::{FeedEntry, describe_event};
use crate::lookup::CatalogLookup;
use crate::profile::RenderingProfile;
use crate::thread::Thread;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entities: Vec<Entity>,
    threads: HashMap<Uuid, Thread>,
    feed: Option<Vec<FeedEntry>>,
    feed_unavailable: bool,
}

impl InMemoryCatalog {
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_thread(mut self, thread: Thread) -> Self {
        self.threads.insert(thread.id, thread);
        self
    }

    pub fn with_feed<'a>(mut self, lines: impl IntoIterator<Item = &'a str>) -> Self {
        self.feed = Some(lines.into_iter().map(FeedEntry::new).collect());
        self
    }

    pub const fn with_feed_unavailable(mut self) -> Self {
        self.feed_unavailable = true;
        self
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn entity(&self, entity_type: &str, reference: &EntityRef, include: Include) -> Result<Entity> {
        self.entities
            .iter()
            .find(|e| {
                e.entity_type == entity_type
                    && include.admits(e.deleted)
                    && match reference {
                        EntityRef::Id(id) => e.id == *id,
                        EntityRef::Fqn(fqn) => e.fqn() == Some(fqn.as_str()),
                    }
            })
            .cloned()
            .ok_or_else(|| CoreError::EntityNotFound {
                entity_type: entity_type.to_string(),
                reference: reference.to_string(),
            })
    }

    fn thread(&self, event: &ChangeEvent) -> Result<Thread> {
        self.threads
            .get(&event.entity_id)
            .cloned()
            .ok_or_else(|| CoreError::ThreadNotFound(event.entity_id.to_string()))
    }

    fn feed_for_event(
        &self,
        profile: &dyn RenderingProfile,
        event: &ChangeEvent,
    ) -> Result<Vec<FeedEntry>> {
        if self.feed_unavailable {
            return Err(CoreError::Lookup("feed service unavailable".to_string()));
        }
        Ok(self
            .feed
            .clone()
            .unwrap_or_else(|| describe_event(profile, event)))
    }
}
