//! Collaborator contracts the message builders depend on.
//!
//! Implementations own retrieval, URL policy and link markup; the builders
//! only call through these traits and propagate whatever they return.

use crate::entity::{Entity, EntityRef, Include};
use crate::error::Result;
use crate::event::ChangeEvent;
use crate::feed::FeedEntry;
use crate::profile::RenderingProfile;
use crate::thread::{Thread, ThreadType};

/// Retrieves entities, threads and feed entries.
pub trait CatalogLookup: Send + Sync {
    /// Fetch an entity by id or fully-qualified name.
    ///
    /// # Errors
    /// `CoreError::EntityNotFound` when nothing matches, or any backend failure.
    fn entity(&self, entity_type: &str, reference: &EntityRef, include: Include) -> Result<Entity>;

    /// Fetch the thread an event refers to.
    ///
    /// # Errors
    /// `CoreError::ThreadNotFound` when the thread is missing, or any backend failure.
    fn thread(&self, event: &ChangeEvent) -> Result<Thread>;

    /// Feed entries describing an entity event, rendered for `profile`.
    ///
    /// # Errors
    /// Any backend failure.
    fn feed_for_event(
        &self,
        profile: &dyn RenderingProfile,
        event: &ChangeEvent,
    ) -> Result<Vec<FeedEntry>>;
}

/// Builds channel links to entities and their discussion tabs.
pub trait UrlResolver: Send + Sync {
    /// # Errors
    /// Propagates lookup failures while resolving the entity's fqn.
    fn entity_url(
        &self,
        profile: &dyn RenderingProfile,
        entity_type: &str,
        entity: &Entity,
    ) -> Result<String>;

    /// # Errors
    /// Propagates lookup failures while resolving the entity's fqn.
    fn thread_url(
        &self,
        profile: &dyn RenderingProfile,
        thread_type: ThreadType,
        entity_type: &str,
        entity: &Entity,
    ) -> Result<String>;
}

/// Replaces entity link markup in free text with display text.
pub trait LinkExpander: Send + Sync {
    fn expand(&self, raw: &str) -> String;
}
