//! Message builders: turn change events into outgoing messages.
//!
//! [`MessageBuilder`] borrows one rendering profile plus the lookup, URL
//! and link collaborators, and holds no state of its own.

mod entity;
mod thread;

use crate::entity::is_registered_entity_type;
use crate::error::{CoreError, Result};
use crate::event::ChangeEvent;
use crate::lookup::{CatalogLookup, LinkExpander, UrlResolver};
use crate::message::{CONNECTION_TEST_DESCRIPTION, OutgoingMessage};
use crate::profile::RenderingProfile;
use tracing::debug;

/// Builds outgoing messages for one channel.
pub struct MessageBuilder<'a> {
    profile: &'a dyn RenderingProfile,
    catalog: &'a dyn CatalogLookup,
    urls: &'a dyn UrlResolver,
    links: &'a dyn LinkExpander,
}

impl<'a> MessageBuilder<'a> {
    #[must_use]
    pub fn new(
        profile: &'a dyn RenderingProfile,
        catalog: &'a dyn CatalogLookup,
        urls: &'a dyn UrlResolver,
        links: &'a dyn LinkExpander,
    ) -> Self {
        Self {
            profile,
            catalog,
            urls,
            links,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &'a dyn RenderingProfile {
        self.profile
    }

    /// Route an event to the thread or entity builder by its subject type.
    ///
    /// # Errors
    /// `CoreError::UnsupportedSubject` for unknown subject types, otherwise
    /// whatever the selected builder returns.
    pub fn build_outgoing_message(
        &self,
        publisher: &str,
        event: &ChangeEvent,
    ) -> Result<OutgoingMessage> {
        debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            entity_type = %event.entity_type,
            channel = %self.profile.channel(),
            "Building outgoing message"
        );

        if event.is_thread() {
            self.build_thread_message(publisher, event)
        } else if is_registered_entity_type(&event.entity_type) {
            self.build_entity_message(publisher, event)
        } else {
            Err(CoreError::UnsupportedSubject(event.entity_type.clone()))
        }
    }

    /// Fixed message used to check that a channel is wired up.
    #[must_use]
    pub fn build_test_message(&self, publisher: &str) -> OutgoingMessage {
        OutgoingMessage {
            user_name: publisher.to_string(),
            header: format!("[{publisher}] Connection Test"),
            entity_url: None,
            messages: vec![CONNECTION_TEST_DESCRIPTION.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::event::EventType;
    use crate::link::MarkupLinkExpander;
    use crate::profile::SlackProfile;
    use crate::testing::InMemoryCatalog;
    use crate::thread::Thread;
    use crate::url::CatalogUrlResolver;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn with_builder<T>(catalog: &InMemoryCatalog, f: impl FnOnce(&MessageBuilder<'_>) -> T) -> T {
        let profile = SlackProfile::new("http://localhost:8585");
        let urls = CatalogUrlResolver::new(catalog);
        let builder = MessageBuilder::new(&profile, catalog, &urls, &MarkupLinkExpander);
        f(&builder)
    }

    #[test]
    fn test_thread_subject_routes_to_thread_builder() {
        let orders = Entity::new("table", "orders").with_fqn("shop.orders");
        let thread = Thread::conversation("<#E::table::shop.orders>", "alice", "Who owns this?");
        let event = ChangeEvent::for_thread(EventType::ThreadCreated, thread.id, "alice");
        let catalog = InMemoryCatalog::default()
            .with_entity(orders)
            .with_thread(thread);

        let message =
            with_builder(&catalog, |b| b.build_outgoing_message("Slack", &event)).unwrap();
        assert!(message.header.contains("started a conversation"));

        let missing = ChangeEvent::for_thread(EventType::ThreadCreated, Uuid::new_v4(), "alice");
        let err =
            with_builder(&catalog, |b| b.build_outgoing_message("Slack", &missing)).unwrap_err();
        assert!(matches!(err, CoreError::ThreadNotFound(_)));
    }

    #[test]
    fn test_entity_subject_routes_to_entity_builder() {
        let orders = Entity::new("table", "orders").with_fqn("shop.orders");
        let event = ChangeEvent::for_entity(EventType::EntityCreated, orders.clone(), "alice");
        let catalog = InMemoryCatalog::default().with_entity(orders);

        let message =
            with_builder(&catalog, |b| b.build_outgoing_message("Slack", &event)).unwrap();
        assert!(message.header.starts_with("[Slack] alice posted on table"));
    }

    #[test]
    fn test_unknown_subject_is_rejected() {
        let event =
            ChangeEvent::new(EventType::EntityCreated, "spreadsheet", Uuid::new_v4(), "alice");
        let catalog = InMemoryCatalog::default();

        let err =
            with_builder(&catalog, |b| b.build_outgoing_message("Slack", &event)).unwrap_err();
        match err {
            CoreError::UnsupportedSubject(entity_type) => assert_eq!(entity_type, "spreadsheet"),
            other => panic!("Expected UnsupportedSubject, got {other:?}"),
        }
    }

    #[test]
    fn test_test_message() {
        let catalog = InMemoryCatalog::default();
        let message = with_builder(&catalog, |b| b.build_test_message("Slack"));

        assert_eq!(message.header, "[Slack] Connection Test");
        assert_eq!(message.messages, vec![CONNECTION_TEST_DESCRIPTION.to_string()]);
        assert!(message.entity_url.is_none());
    }
}
