//! Messages for discussion threads.
//!
//! Each supported (thread kind, event type) pair maps to one pure function
//! producing the header and body lines; every other pair produces nothing
//! and the build fails.

use super::MessageBuilder;
use crate::entity::{Entity, EntityRef, Include};
use crate::error::{CoreError, Result};
use crate::event::{ChangeEvent, EventType};
use crate::link::EntityLink;
use crate::lookup::LinkExpander;
use crate::message::OutgoingMessage;
use crate::profile::RenderingProfile;
use crate::thread::{AnnouncementDetails, TaskDetails, Thread, ThreadKind, ThreadType};
use crate::time::format_epoch_seconds;
use tracing::{debug, warn};

/// Header and body produced by one dispatch entry.
#[derive(Debug, Default, PartialEq, Eq)]
struct ThreadRendering {
    header: String,
    body: Vec<String>,
}

impl ThreadRendering {
    fn new(header: String, body: Vec<String>) -> Self {
        Self { header, body }
    }

    fn is_empty(&self) -> bool {
        self.header.is_empty() || self.body.is_empty()
    }
}

/// Everything a dispatch entry may read.
struct ThreadContext<'a> {
    publisher: &'a str,
    thread: &'a Thread,
    about: &'a EntityLink,
    asset_url: &'a str,
    profile: &'a dyn RenderingProfile,
    links: &'a dyn LinkExpander,
}

impl ThreadContext<'_> {
    fn message(&self) -> String {
        self.links.expand(&self.thread.message)
    }

    fn post_lines(&self) -> Vec<String> {
        self.thread
            .posts
            .iter()
            .map(|post| format!("@{}: {}", post.from, self.links.expand(&post.message)))
            .collect()
    }

    fn emphasized_user(&self, user: &str) -> String {
        self.profile.bold(&format!("@{user}"))
    }
}

fn render(ctx: &ThreadContext<'_>, event_type: EventType) -> ThreadRendering {
    match (&ctx.thread.kind, event_type) {
        (ThreadKind::Conversation, EventType::ThreadCreated) => conversation_started(ctx),
        (ThreadKind::Conversation, EventType::PostCreated) => conversation_post(ctx),
        (ThreadKind::Conversation, EventType::ThreadUpdated) => conversation_updated(ctx),
        (ThreadKind::Task { task }, EventType::ThreadCreated) => task_created(ctx, task),
        (ThreadKind::Task { task }, EventType::PostCreated) => task_post(ctx, task),
        (ThreadKind::Task { task }, EventType::ThreadUpdated) => task_updated(ctx, task),
        (ThreadKind::Task { task }, EventType::TaskClosed) => task_closed(ctx, task),
        (ThreadKind::Task { task }, EventType::TaskResolved) => task_resolved(ctx, task),
        (ThreadKind::Announcement { announcement }, EventType::ThreadCreated) => {
            announcement_created(ctx, announcement)
        }
        (ThreadKind::Announcement { .. }, EventType::PostCreated) => announcement_post(ctx),
        (ThreadKind::Announcement { announcement }, EventType::ThreadUpdated) => {
            announcement_updated(ctx, announcement)
        }
        (ThreadKind::Announcement { announcement }, EventType::EntityDeleted) => {
            announcement_deleted(ctx, announcement)
        }
        _ => ThreadRendering::default(),
    }
}

fn conversation_started(ctx: &ThreadContext<'_>) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} started a conversation for asset {}",
            ctx.publisher, ctx.thread.created_by, ctx.asset_url
        ),
        vec![ctx.message()],
    )
}

fn conversation_post(ctx: &ThreadContext<'_>) -> ThreadRendering {
    let mut body = vec![format!("@{}: {}", ctx.thread.created_by, ctx.message())];
    body.extend(ctx.post_lines());
    ThreadRendering::new(
        format!(
            "[{}] @{} posted a message on asset {}",
            ctx.publisher, ctx.thread.created_by, ctx.asset_url
        ),
        body,
    )
}

fn conversation_updated(ctx: &ThreadContext<'_>) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} posted update on Conversation for asset {}",
            ctx.publisher,
            ctx.thread.last_updater(),
            ctx.asset_url
        ),
        vec![ctx.message()],
    )
}

fn task_status(task: &TaskDetails) -> String {
    format!("Current Status: {}", task.status)
}

fn task_summary(task: &TaskDetails) -> Vec<String> {
    let assignees = task
        .assignees
        .iter()
        .map(|assignee| format!("@{}", assignee.name))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!("Task Type: {}", task.task_type),
        format!("Assignees: {assignees}"),
        task_status(task),
    ]
}

fn task_created(ctx: &ThreadContext<'_>, task: &TaskDetails) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} created a Task for {} {}",
            ctx.publisher, ctx.thread.created_by, ctx.about.entity_type, ctx.asset_url
        ),
        task_summary(task),
    )
}

fn task_post(ctx: &ThreadContext<'_>, task: &TaskDetails) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} posted a message on the Task with Id: {} for Asset {}",
            ctx.publisher, ctx.thread.created_by, task.id, ctx.asset_url
        ),
        ctx.post_lines(),
    )
}

fn task_updated(ctx: &ThreadContext<'_>, task: &TaskDetails) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} posted update on the Task with Id: {} for Asset {}",
            ctx.publisher,
            ctx.thread.last_updater(),
            task.id,
            ctx.asset_url
        ),
        task_summary(task),
    )
}

fn task_closed(ctx: &ThreadContext<'_>, task: &TaskDetails) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} closed Task with Id: {} for Asset {}",
            ctx.publisher, ctx.thread.created_by, task.id, ctx.asset_url
        ),
        vec![task_status(task)],
    )
}

fn task_resolved(ctx: &ThreadContext<'_>, task: &TaskDetails) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] @{} resolved Task with Id: {} for Asset {}",
            ctx.publisher, ctx.thread.created_by, task.id, ctx.asset_url
        ),
        vec![task_status(task)],
    )
}

fn announcement_summary(announcement: &AnnouncementDetails) -> Vec<String> {
    vec![
        format!("Description: {}", announcement.description),
        format!("Started At: {}", format_epoch_seconds(announcement.start_time)),
        format!("Ends At: {}", format_epoch_seconds(announcement.end_time)),
    ]
}

fn announcement_created(
    ctx: &ThreadContext<'_>,
    announcement: &AnnouncementDetails,
) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "[{}] {} posted an {}",
            ctx.publisher,
            ctx.emphasized_user(&ctx.thread.created_by),
            ctx.profile.bold("Announcement")
        ),
        announcement_summary(announcement),
    )
}

// Posts on announcements carry no publisher prefix.
fn announcement_post(ctx: &ThreadContext<'_>) -> ThreadRendering {
    ThreadRendering::new(
        format!(
            "{} posted a message on {}",
            ctx.emphasized_user(&ctx.thread.created_by),
            ctx.profile.bold("Announcement")
        ),
        ctx.post_lines(),
    )
}

fn announcement_update_header(ctx: &ThreadContext<'_>) -> String {
    format!(
        "[{}] {} posted an update on {}",
        ctx.publisher,
        ctx.emphasized_user(ctx.thread.last_updater()),
        ctx.profile.bold("Announcement")
    )
}

fn announcement_updated(
    ctx: &ThreadContext<'_>,
    announcement: &AnnouncementDetails,
) -> ThreadRendering {
    ThreadRendering::new(
        announcement_update_header(ctx),
        announcement_summary(announcement),
    )
}

fn announcement_deleted(
    ctx: &ThreadContext<'_>,
    announcement: &AnnouncementDetails,
) -> ThreadRendering {
    ThreadRendering::new(
        announcement_update_header(ctx),
        vec![format!("Announcement Deleted: {}", announcement.description)],
    )
}

impl MessageBuilder<'_> {
    /// Build the message for an event whose subject is a discussion thread.
    ///
    /// # Errors
    /// `CoreError::MessageConstructionFailed` when the (thread kind, event
    /// type) pair has no template or the thread lacks content for it;
    /// thread, link and entity lookup failures propagate.
    pub fn build_thread_message(
        &self,
        publisher: &str,
        event: &ChangeEvent,
    ) -> Result<OutgoingMessage> {
        let thread = self.catalog.thread(event)?;
        let about = EntityLink::parse(&thread.about)?;
        let entity = self.catalog.entity(
            &about.entity_type,
            &EntityRef::Fqn(about.entity_fqn.clone()),
            Include::All,
        )?;
        let entity_url = self
            .urls
            .entity_url(self.profile, &about.entity_type, &entity)?;
        let asset_url = self.thread_asset_url(thread.thread_type(), &about, &entity);

        let ctx = ThreadContext {
            publisher,
            thread: &thread,
            about: &about,
            asset_url: &asset_url,
            profile: self.profile,
            links: self.links,
        };
        let rendering = render(&ctx, event.event_type);

        if rendering.is_empty() {
            warn!(
                thread_id = %thread.id,
                thread_type = %thread.thread_type(),
                event_type = %event.event_type,
                "No message for thread event"
            );
            return Err(CoreError::MessageConstructionFailed {
                thread_type: thread.thread_type().to_string(),
                event_type: event.event_type.to_string(),
            });
        }

        Ok(OutgoingMessage {
            user_name: event.user_name.clone(),
            header: rendering.header,
            entity_url: Some(entity_url),
            messages: rendering.body,
        })
    }

    /// Link to the subject's discussion tab, or `""` when it cannot be built.
    ///
    /// This is the only lookup whose failure does not fail the build.
    fn thread_asset_url(
        &self,
        thread_type: ThreadType,
        about: &EntityLink,
        entity: &Entity,
    ) -> String {
        match self
            .urls
            .thread_url(self.profile, thread_type, &about.entity_type, entity)
        {
            Ok(url) => url,
            Err(err) => {
                debug!(about = %about, error = %err, "Thread asset url unavailable");
                String::new()
            }
        }
    }
}
