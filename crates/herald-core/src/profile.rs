//! Rendering profiles: the formatting primitives each target channel provides.

use crate::diff;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Formatting capabilities of one delivery channel.
///
/// Implementations are immutable after construction and shared freely
/// across threads.
pub trait RenderingProfile: Send + Sync {
    /// Channel this profile renders for.
    fn channel(&self) -> Channel;

    /// Wrap `text` in the channel's bold markup.
    fn bold(&self, text: &str) -> String;

    /// Bold text followed by a single space.
    fn bold_with_space(&self, text: &str) -> String {
        format!("{} ", self.bold(text))
    }

    fn line_break(&self) -> &'static str;

    fn add_marker(&self) -> &'static str;

    fn add_marker_close(&self) -> &'static str;

    fn remove_marker(&self) -> &'static str;

    fn remove_marker_close(&self) -> &'static str;

    /// Link to `{base}/{prefix}/{fqn}[/{additional}]`, labelled with the fqn.
    fn entity_url(&self, prefix: &str, fqn: &str, additional: &str) -> String;

    /// Diff two field values using this profile's markers.
    fn render_diff(&self, old: Option<&str>, new: &str) -> String {
        diff::render_diff(self, old, new)
    }
}

/// Build the raw target of an entity link.
fn link_target(base_url: &str, prefix: &str, fqn: &str, additional: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = fqn.trim().replace(' ', "%20");
    if additional.is_empty() {
        format!("{base}/{prefix}/{path}")
    } else {
        format!("{base}/{prefix}/{path}/{additional}")
    }
}

/// Supported delivery channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Slack,
    MsTeams,
    GChat,
    Email,
    Webhook,
}

impl Channel {
    pub const ALL: [Self; 5] = [
        Self::Slack,
        Self::MsTeams,
        Self::GChat,
        Self::Email,
        Self::Webhook,
    ];

    /// Construct this channel's profile linking into `base_url`.
    #[must_use]
    pub fn profile(self, base_url: &str) -> Box<dyn RenderingProfile> {
        match self {
            Self::Slack => Box::new(SlackProfile::new(base_url)),
            Self::MsTeams => Box::new(TeamsProfile::new(base_url)),
            Self::GChat => Box::new(GChatProfile::new(base_url)),
            Self::Email => Box::new(EmailProfile::new(base_url)),
            Self::Webhook => Box::new(WebhookProfile::new(base_url)),
        }
    }

    /// Name used in config files, URLs and message prefixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::MsTeams => "msteams",
            Self::GChat => "gchat",
            Self::Email => "email",
            Self::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownChannel(s.to_string()))
    }
}

/// Slack mrkdwn.
#[derive(Debug, Clone)]
pub struct SlackProfile {
    base_url: String,
}

impl SlackProfile {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RenderingProfile for SlackProfile {
    fn channel(&self) -> Channel {
        Channel::Slack
    }

    fn bold(&self, text: &str) -> String {
        format!("*{text}*")
    }

    fn line_break(&self) -> &'static str {
        "\n"
    }

    fn add_marker(&self) -> &'static str {
        "*"
    }

    fn add_marker_close(&self) -> &'static str {
        "*"
    }

    fn remove_marker(&self) -> &'static str {
        "~"
    }

    fn remove_marker_close(&self) -> &'static str {
        "~"
    }

    fn entity_url(&self, prefix: &str, fqn: &str, additional: &str) -> String {
        let target = link_target(&self.base_url, prefix, fqn, additional);
        format!("<{target}|{}>", fqn.trim())
    }
}

/// Microsoft Teams markdown.
#[derive(Debug, Clone)]
pub struct TeamsProfile {
    base_url: String,
}

impl TeamsProfile {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RenderingProfile for TeamsProfile {
    fn channel(&self) -> Channel {
        Channel::MsTeams
    }

    fn bold(&self, text: &str) -> String {
        format!("**{text}**")
    }

    fn line_break(&self) -> &'static str {
        "<br/>"
    }

    fn add_marker(&self) -> &'static str {
        "**"
    }

    fn add_marker_close(&self) -> &'static str {
        "**"
    }

    fn remove_marker(&self) -> &'static str {
        "~~"
    }

    fn remove_marker_close(&self) -> &'static str {
        "~~"
    }

    fn entity_url(&self, prefix: &str, fqn: &str, additional: &str) -> String {
        let target = link_target(&self.base_url, prefix, fqn, additional);
        format!("[{}]({target})", fqn.trim())
    }
}

/// Google Chat card text.
#[derive(Debug, Clone)]
pub struct GChatProfile {
    base_url: String,
}

impl GChatProfile {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RenderingProfile for GChatProfile {
    fn channel(&self) -> Channel {
        Channel::GChat
    }

    fn bold(&self, text: &str) -> String {
        format!("<b>{text}</b>")
    }

    fn line_break(&self) -> &'static str {
        "<br/>"
    }

    fn add_marker(&self) -> &'static str {
        "<b>"
    }

    fn add_marker_close(&self) -> &'static str {
        "</b>"
    }

    fn remove_marker(&self) -> &'static str {
        "<s>"
    }

    fn remove_marker_close(&self) -> &'static str {
        "</s>"
    }

    fn entity_url(&self, prefix: &str, fqn: &str, additional: &str) -> String {
        let target = link_target(&self.base_url, prefix, fqn, additional);
        format!("<{target}|{}>", fqn.trim())
    }
}

/// HTML email.
#[derive(Debug, Clone)]
pub struct EmailProfile {
    base_url: String,
}

impl EmailProfile {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RenderingProfile for EmailProfile {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn bold(&self, text: &str) -> String {
        format!("<b>{text}</b>")
    }

    fn line_break(&self) -> &'static str {
        "<br/>"
    }

    fn add_marker(&self) -> &'static str {
        "<b>"
    }

    fn add_marker_close(&self) -> &'static str {
        "</b>"
    }

    fn remove_marker(&self) -> &'static str {
        "<s>"
    }

    fn remove_marker_close(&self) -> &'static str {
        "</s>"
    }

    fn entity_url(&self, prefix: &str, fqn: &str, additional: &str) -> String {
        let target = link_target(&self.base_url, prefix, fqn, additional);
        format!("<a href = '{target}'>{}</a>", fqn.trim())
    }
}

/// Generic webhook receivers get the same HTML flavour as email.
#[derive(Debug, Clone)]
pub struct WebhookProfile {
    base_url: String,
}

impl WebhookProfile {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RenderingProfile for WebhookProfile {
    fn channel(&self) -> Channel {
        Channel::Webhook
    }

    fn bold(&self, text: &str) -> String {
        format!("<b>{text}</b>")
    }

    fn line_break(&self) -> &'static str {
        "<br/>"
    }

    fn add_marker(&self) -> &'static str {
        "<b>"
    }

    fn add_marker_close(&self) -> &'static str {
        "</b>"
    }

    fn remove_marker(&self) -> &'static str {
        "<s>"
    }

    fn remove_marker_close(&self) -> &'static str {
        "</s>"
    }

    fn entity_url(&self, prefix: &str, fqn: &str, additional: &str) -> String {
        let target = link_target(&self.base_url, prefix, fqn, additional);
        format!("<a href = '{target}'>{}</a>", fqn.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "http://localhost:8585";

    #[test]
    fn test_channel_parse() {
        assert_eq!("slack".parse::<Channel>().unwrap(), Channel::Slack);
        assert_eq!("MSTeams".parse::<Channel>().unwrap(), Channel::MsTeams);
        assert!(matches!(
            "carrier-pigeon".parse::<Channel>(),
            Err(CoreError::UnknownChannel(_))
        ));
    }

    #[test]
    fn test_profile_matches_channel() {
        for channel in Channel::ALL {
            assert_eq!(channel.profile(BASE).channel(), channel);
        }
    }

    #[test]
    fn test_slack_entity_url() {
        let slack = SlackProfile::new(BASE);
        assert_eq!(
            slack.entity_url("table", "shop.public.orders", ""),
            "<http://localhost:8585/table/shop.public.orders|shop.public.orders>"
        );
        assert_eq!(
            slack.entity_url("table", "shop.my orders", "activity_feed/all"),
            "<http://localhost:8585/table/shop.my%20orders/activity_feed/all|shop.my orders>"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let teams = TeamsProfile::new("https://catalog.example.com/");
        assert_eq!(
            teams.entity_url("glossary", "Sales.Revenue", ""),
            "[Sales.Revenue](https://catalog.example.com/glossary/Sales.Revenue)"
        );
    }

    #[test]
    fn test_emphasis_primitives() {
        let email = EmailProfile::new(BASE);
        assert_eq!(email.bold("Announcement"), "<b>Announcement</b>");
        assert_eq!(email.bold_with_space("table"), "<b>table</b> ");
        assert_eq!(email.line_break(), "<br/>");

        let slack = SlackProfile::new(BASE);
        assert_eq!(slack.bold("@alice"), "*@alice*");
        assert_eq!(slack.line_break(), "\n");
    }

    #[test]
    fn test_profile_render_diff() {
        let teams = TeamsProfile::new(BASE);
        assert_eq!(
            teams.render_diff(Some("tier one"), "tier two"),
            "tier ~~one~~ **two**"
        );
    }
}
