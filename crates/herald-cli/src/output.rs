//! Output formatting for the CLI.

use anyhow::Result;
use console::style;
use herald_core::OutgoingMessage;
use serde::Serialize;
use std::fmt::Write;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Print output in the specified format.
pub fn print<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", value.human_display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", style(message).green()),
        OutputFormat::Json => {
            let body = serde_json::json!({ "status": "ok", "message": message });
            println!("{body}");
        }
        OutputFormat::Yaml => {
            let body = serde_json::json!({ "status": "ok", "message": message });
            print!("{}", serde_yaml::to_string(&body)?);
        }
    }
    Ok(())
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

impl HumanDisplay for OutgoingMessage {
    fn human_display(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", style(&self.header).bold());
        if let Some(url) = &self.entity_url {
            let _ = writeln!(out, "{}", style(url).dim());
        }
        let _ = writeln!(out, "{}", style("-".repeat(60)).dim());

        for line in &self.messages {
            let _ = writeln!(out, "  {line}");
        }

        out
    }
}

/// Result of a value diff.
#[derive(Debug, Serialize)]
pub struct DiffView {
    pub channel: String,
    pub diff: String,
}

impl HumanDisplay for DiffView {
    fn human_display(&self) -> String {
        self.diff.clone()
    }
}
