//! Outgoing message handed to channel senders.

use serde::{Deserialize, Serialize};

/// Body of the connectivity-check message.
pub const CONNECTION_TEST_DESCRIPTION: &str = "This is a test message, receiving this message confirms that you have successfully configured herald to receive alerts.";

/// A rendered notification, ready for a channel-specific sender.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// User who caused the event.
    pub user_name: String,

    /// Headline, e.g. `[Slack] @alice posted a message on asset ...`.
    pub header: String,

    /// Link to the subject entity, when one was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_url: Option<String>,

    /// Body lines, in display order.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl OutgoingMessage {
    #[must_use]
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// Whether both header and body carry content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.header.is_empty() && !self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_skips_missing_url() {
        let message = OutgoingMessage {
            user_name: "alice".to_string(),
            header: "[Slack] hello".to_string(),
            entity_url: None,
            messages: vec!["line".to_string()],
        };

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""userName":"alice""#));
        assert!(!json.contains("entityUrl"));
        assert!(message.is_complete());
    }

    #[test]
    fn test_incomplete_message() {
        let mut message = OutgoingMessage::new("bob");
        assert!(!message.is_complete());

        message.header = "header".to_string();
        assert!(!message.is_complete());
    }
}
