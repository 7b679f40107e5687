//! Messages for changes on catalog entities.

use super::MessageBuilder;
use crate::entity::{EntityRef, Include, QUERY, TEST_SUITE};
use crate::error::Result;
use crate::event::ChangeEvent;
use crate::message::OutgoingMessage;
use tracing::{debug, warn};

impl MessageBuilder<'_> {
    /// Build the message for an entity change event.
    ///
    /// Header: `[{publisher}] {user} posted on {type} {url}` (no URL for
    /// queries). Body: the event's feed entries, verbatim and in order.
    /// Events without an entity payload keep an empty header.
    ///
    /// # Errors
    /// Propagates entity, URL and feed lookup failures.
    pub fn build_entity_message(
        &self,
        publisher: &str,
        event: &ChangeEvent,
    ) -> Result<OutgoingMessage> {
        let mut message = OutgoingMessage::new(&event.user_name);
        let entity = self.catalog.entity(
            &event.entity_type,
            &EntityRef::Id(event.entity_id),
            Include::All,
        )?;

        if let Some(payload) = &event.entity {
            let label = if payload.is_test_case() {
                TEST_SUITE
            } else {
                event.entity_type.as_str()
            };

            if label == QUERY {
                message.header = format!("[{publisher}] {} posted on {label}", event.user_name);
            } else {
                let url = self
                    .urls
                    .entity_url(self.profile, &event.entity_type, &entity)?;
                message.header =
                    format!("[{publisher}] {} posted on {label} {url}", event.user_name);
                message.entity_url = Some(url);
            }
        } else {
            warn!(
                event_id = %event.id,
                entity_type = %event.entity_type,
                "Change event carries no entity payload, leaving header empty"
            );
        }

        message.messages = self
            .catalog
            .feed_for_event(self.profile, event)?
            .into_iter()
            .map(|entry| entry.message)
            .collect();

        debug!(
            event_id = %event.id,
            lines = message.messages.len(),
            "Built entity message"
        );
        Ok(message)
    }
}
