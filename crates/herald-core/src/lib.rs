//! herald-core: turns catalog change events into channel-ready messages.
//!
//! This crate provides:
//! - `ChangeEvent`, `Thread`, `Entity`: the event and subject models
//! - `diff`: word-level marker diff of old/new field values
//! - `RenderingProfile`: per-channel formatting primitives
//! - `MessageBuilder`: entity and thread message construction
//! - `CatalogLookup`, `UrlResolver`, `LinkExpander`: collaborator contracts

pub mod builder;
pub mod diff;
pub mod entity;
pub mod error;
pub mod event;
pub mod feed;
pub mod link;
pub mod lookup;
pub mod message;
pub mod profile;
pub mod thread;
pub mod time;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::MessageBuilder;
pub use diff::{mark_diff, render_diff};
pub use entity::{Entity, EntityRef, EntityReference, Include, THREAD, is_registered_entity_type};
pub use error::{CoreError, Result};
pub use event::{ChangeDescription, ChangeEvent, EventType, FieldChange};
pub use feed::{FeedEntry, describe_changes, describe_event};
pub use link::{EntityLink, MarkupLinkExpander};
pub use lookup::{CatalogLookup, LinkExpander, UrlResolver};
pub use message::{CONNECTION_TEST_DESCRIPTION, OutgoingMessage};
pub use profile::{Channel, RenderingProfile};
pub use thread::{
    AnnouncementDetails, Post, TaskDetails, TaskStatus, TaskType, Thread, ThreadKind, ThreadType,
};
pub use url::CatalogUrlResolver;
