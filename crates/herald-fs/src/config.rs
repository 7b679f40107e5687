//! Catalog configuration.

use herald_core::Channel;
use serde::{Deserialize, Serialize};

/// Catalog configuration stored in `.herald/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeraldConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Catalog settings.
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Where rendered links point.
    #[serde(default)]
    pub server: ServerSettings,

    /// Defaults for rendered messages.
    #[serde(default)]
    pub publisher: PublisherSettings,
}

const fn default_version() -> u32 {
    1
}

/// Catalog-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Catalog name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Catalog UI location used to build entity links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8585".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Publisher name and channel used when a request does not name them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherSettings {
    #[serde(default = "default_publisher")]
    pub name: String,

    #[serde(default = "default_channel")]
    pub channel: Channel,
}

fn default_publisher() -> String {
    "Herald".to_string()
}

const fn default_channel() -> Channel {
    Channel::Slack
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            name: default_publisher(),
            channel: default_channel(),
        }
    }
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            version: 1,
            catalog: CatalogSettings::default(),
            server: ServerSettings::default(),
            publisher: PublisherSettings::default(),
        }
    }
}

impl HeraldConfig {
    /// Create a new config linking into the given catalog UI.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            server: ServerSettings {
                base_url: base_url.into(),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: HeraldConfig =
            serde_yaml::from_str("publisher:\n  channel: msteams\n").unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.server.base_url, "http://localhost:8585");
        assert_eq!(config.publisher.name, "Herald");
        assert_eq!(config.publisher.channel, Channel::MsTeams);
    }

    #[test]
    fn test_new_sets_base_url() {
        let config = HeraldConfig::new("https://catalog.example.com");
        assert_eq!(config.server.base_url, "https://catalog.example.com");
        assert_eq!(config.publisher.channel, Channel::Slack);
    }
}
