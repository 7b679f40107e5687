//! Discussion thread model: conversations, tasks and announcements.

use crate::entity::EntityReference;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thread kind without its kind-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreadType {
    Conversation,
    Task,
    Announcement,
}

impl std::fmt::Display for ThreadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conversation => write!(f, "Conversation"),
            Self::Task => write!(f, "Task"),
            Self::Announcement => write!(f, "Announcement"),
        }
    }
}

/// What a task asks its assignees to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    RequestDescription,
    UpdateDescription,
    RequestTag,
    UpdateTag,
    RequestApproval,
    RequestTestCaseFailureResolution,
    Generic,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RequestDescription => "RequestDescription",
            Self::UpdateDescription => "UpdateDescription",
            Self::RequestTag => "RequestTag",
            Self::UpdateTag => "UpdateTag",
            Self::RequestApproval => "RequestApproval",
            Self::RequestTestCaseFailureResolution => "RequestTestCaseFailureResolution",
            Self::Generic => "Generic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Open,
    Closed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Task-specific thread data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    /// Sequential task number shown to users.
    pub id: u64,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignees: Vec<EntityReference>,
}

impl TaskDetails {
    #[must_use]
    pub const fn new(id: u64, task_type: TaskType) -> Self {
        Self {
            id,
            task_type,
            status: TaskStatus::Open,
            assignees: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = EntityReference>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }
}

/// Announcement-specific thread data. Times are epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDetails {
    pub description: String,
    pub start_time: i64,
    pub end_time: i64,
}

/// Kind of thread together with the data only that kind carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ThreadKind {
    Conversation,
    Task { task: TaskDetails },
    Announcement { announcement: AnnouncementDetails },
}

impl ThreadKind {
    #[must_use]
    pub const fn thread_type(&self) -> ThreadType {
        match self {
            Self::Conversation => ThreadType::Conversation,
            Self::Task { .. } => ThreadType::Task,
            Self::Announcement { .. } => ThreadType::Announcement,
        }
    }
}

/// A reply within a thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Author user name.
    pub from: String,
    pub message: String,
}

impl Post {
    #[must_use]
    pub fn new(from: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            message: message.into(),
        }
    }
}

/// A discussion thread attached to a catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: Uuid,

    #[serde(flatten)]
    pub kind: ThreadKind,

    /// Entity link of the subject, e.g. `<#E::table::shop.public.orders>`.
    pub about: String,

    pub created_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,

    /// Primary message.
    pub message: String,

    /// Replies, oldest first.
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Thread {
    #[must_use]
    pub fn new(
        kind: ThreadKind,
        about: impl Into<String>,
        created_by: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            about: about.into(),
            created_by: created_by.into(),
            updated_by: None,
            message: message.into(),
            posts: Vec::new(),
        }
    }

    #[must_use]
    pub fn conversation(
        about: impl Into<String>,
        created_by: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ThreadKind::Conversation, about, created_by, message)
    }

    #[must_use]
    pub fn task(
        about: impl Into<String>,
        created_by: impl Into<String>,
        message: impl Into<String>,
        task: TaskDetails,
    ) -> Self {
        Self::new(ThreadKind::Task { task }, about, created_by, message)
    }

    #[must_use]
    pub fn announcement(
        about: impl Into<String>,
        created_by: impl Into<String>,
        announcement: AnnouncementDetails,
    ) -> Self {
        let message = announcement.description.clone();
        Self::new(
            ThreadKind::Announcement { announcement },
            about,
            created_by,
            message,
        )
    }

    #[must_use]
    pub fn with_updated_by(mut self, updated_by: impl Into<String>) -> Self {
        self.updated_by = Some(updated_by.into());
        self
    }

    #[must_use]
    pub fn with_post(mut self, from: impl Into<String>, message: impl Into<String>) -> Self {
        self.posts.push(Post::new(from, message));
        self
    }

    #[must_use]
    pub const fn thread_type(&self) -> ThreadType {
        self.kind.thread_type()
    }

    /// Who touched the thread last, falling back to its creator.
    #[must_use]
    pub fn last_updater(&self) -> &str {
        self.updated_by.as_deref().unwrap_or(&self.created_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_task_thread_wire_shape() {
        let thread = Thread::task(
            "<#E::table::shop.orders>",
            "carol",
            "Please add a description",
            TaskDetails::new(42, TaskType::RequestDescription)
                .with_assignees([EntityReference::user("dave")]),
        );

        let value = serde_json::to_value(&thread).unwrap();
        assert_eq!(value["type"], json!("Task"));
        assert_eq!(value["task"]["id"], json!(42));
        assert_eq!(value["task"]["type"], json!("RequestDescription"));
        assert_eq!(value["task"]["status"], json!("Open"));
        assert_eq!(value["createdBy"], json!("carol"));

        let back: Thread = serde_json::from_value(value).unwrap();
        assert_eq!(back, thread);
    }

    #[test]
    fn test_conversation_from_json() {
        let thread: Thread = serde_json::from_value(json!({
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "type": "Conversation",
            "about": "<#E::table::shop.orders>",
            "createdBy": "alice",
            "message": "Is this table still used?",
            "posts": [{"from": "bob", "message": "yes"}]
        }))
        .unwrap();

        assert_eq!(thread.thread_type(), ThreadType::Conversation);
        assert_eq!(thread.posts.len(), 1);
        assert_eq!(thread.last_updater(), "alice");
    }

    #[test]
    fn test_last_updater() {
        let thread = Thread::conversation("<#E::table::t>", "alice", "hi").with_updated_by("bob");
        assert_eq!(thread.last_updater(), "bob");
    }
}
