//! CLI command implementations.

use crate::output::{self, DiffView, OutputFormat};
use anyhow::{Context, Result, bail};
use herald_core::time::format_epoch_millis;
use herald_core::{CatalogUrlResolver, ChangeEvent, Channel, MarkupLinkExpander, MessageBuilder};
use herald_fs::{Catalog, FsError, HeraldConfig};
use std::path::Path;
use tracing::{debug, warn};

/// Initialize a new catalog.
pub fn init(
    path: &Path,
    base_url: Option<String>,
    name: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = base_url.map_or_else(HeraldConfig::default, HeraldConfig::new);
    config.catalog.name = name;
    let catalog = Catalog::init_with(path, config).context("Failed to initialize catalog")?;

    let message = match &catalog.config().catalog.name {
        Some(name) => format!("Initialized catalog '{name}' at {}", catalog.root().display()),
        None => format!("Initialized catalog at {}", catalog.root().display()),
    };
    output::print_success(&message, format)
}

/// Render an event file into an outgoing message.
pub fn render(
    path: &Path,
    event_file: &Path,
    channel: Option<Channel>,
    publisher: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let catalog = Catalog::open(path).context("Failed to open catalog")?;
    let event = read_event(event_file)?;

    let profile = catalog.profile(channel);
    let publisher = publisher.unwrap_or(&catalog.config().publisher.name);
    let urls = CatalogUrlResolver::new(&catalog);
    let builder = MessageBuilder::new(profile.as_ref(), &catalog, &urls, &MarkupLinkExpander);

    let message = builder
        .build_outgoing_message(publisher, &event)
        .with_context(|| format!("Failed to render event {}", event.id))?;
    if !message.is_complete() {
        warn!(event_id = %event.id, "Rendered message has an empty header or body");
    }

    output::print(&message, format)
}

/// Render the connection test message.
pub fn test_message(
    path: &Path,
    channel: Option<Channel>,
    publisher: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let catalog = Catalog::open(path).context("Failed to open catalog")?;

    let profile = catalog.profile(channel);
    let publisher = publisher.unwrap_or(&catalog.config().publisher.name);
    let urls = CatalogUrlResolver::new(&catalog);
    let builder = MessageBuilder::new(profile.as_ref(), &catalog, &urls, &MarkupLinkExpander);

    output::print(&builder.build_test_message(publisher), format)
}

/// Diff two values with a channel's markers.
///
/// Works outside a catalog; the configured channel is only consulted when
/// one can be opened.
pub fn diff(
    path: &Path,
    old: &str,
    new: &str,
    channel: Option<Channel>,
    format: OutputFormat,
) -> Result<()> {
    let config = diff_config(path)?;
    let channel = channel.unwrap_or(config.publisher.channel);
    let profile = channel.profile(&config.server.base_url);

    let old = (!old.is_empty()).then_some(old);
    let view = DiffView {
        channel: channel.to_string(),
        diff: profile.render_diff(old, new),
    };
    output::print(&view, format)
}

/// Configuration for `diff`: the catalog's when one exists, defaults otherwise.
fn diff_config(path: &Path) -> Result<HeraldConfig> {
    match Catalog::open(path) {
        Ok(catalog) => Ok(catalog.config().clone()),
        Err(FsError::CatalogNotFound(_)) => Ok(HeraldConfig::default()),
        Err(err) => Err(err).context("Failed to open catalog"),
    }
}

/// Start the preview server.
pub fn serve(path: &Path, host: &str, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { herald_server::serve(path, host, port).await })
}

/// Load a change event from a JSON or YAML file, chosen by extension.
fn read_event(path: &Path) -> Result<ChangeEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let event: ChangeEvent = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml" | "yaml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML event in {}", path.display()))?,
        Some("json") | None => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON event in {}", path.display()))?,
        Some(other) => bail!("Unsupported event file extension '{other}'"),
    };

    debug!(
        path = %path.display(),
        event_type = %event.event_type,
        at = %format_epoch_millis(event.timestamp),
        "Loaded change event"
    );
    Ok(event)
}
