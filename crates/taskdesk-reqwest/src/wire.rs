//! JSON shapes exchanged with the task service and their normalization.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use taskdesk_core::types::{Credential, Identity, IdentityId, Task, TaskId, TaskPriority, TaskStatus};
use taskdesk_core::LoginResponse;

use crate::error::{Error, Result};

/// Body of `POST auth/login`.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Answer of `POST auth/login`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginRecord {
    #[serde(alias = "accessToken")]
    access_token: String,
    #[serde(default, alias = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(alias = "loggedInUser", alias = "user")]
    identity: Identity,
}

impl From<LoginRecord> for LoginResponse {
    fn from(record: LoginRecord) -> Self {
        let credential = Credential {
            access_token: record.access_token,
            refresh_token: record.refresh_token,
        };
        LoginResponse::new(credential, record.identity)
    }
}

/// A task as returned by the server, before normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: String,
    priority: String,
    #[serde(alias = "startDate")]
    start_date: String,
    #[serde(default, alias = "dueDate")]
    due_date: Option<String>,
    #[serde(default, alias = "assigneeId")]
    assignee_id: Option<IdentityId>,
}

impl TaskRecord {
    /// Normalizes the record into a domain task.
    pub fn into_task(self) -> Result<Task> {
        let status = self
            .status
            .trim()
            .parse::<TaskStatus>()
            .map_err(|_| Error::Wire(format!("unknown task status '{}'", self.status)))?;
        let priority = self
            .priority
            .trim()
            .parse::<TaskPriority>()
            .map_err(|_| Error::Wire(format!("unknown task priority '{}'", self.priority)))?;
        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description.filter(|description| !description.is_empty()),
            status,
            priority,
            start_date: parse_date(self.start_date.trim())?,
            due_date,
            assignee_id: self.assignee_id,
        })
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (taken in UTC) and civil
/// date-times.
pub(crate) fn parse_date(raw: &str) -> Result<Date> {
    if let Ok(date) = raw.parse::<Date>() {
        return Ok(date);
    }
    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Ok(timestamp.to_zoned(TimeZone::UTC).date());
    }
    if let Ok(datetime) = raw.parse::<DateTime>() {
        return Ok(datetime.date());
    }
    Err(Error::Wire(format!("invalid date '{raw}'")))
}

/// A response body, either bare or wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(inner) => inner,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<MessageField>,
    #[serde(default)]
    error: Option<String>,
}

/// Extracts the human readable message from an error response body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match body.message {
        Some(MessageField::One(message)) => message,
        Some(MessageField::Many(messages)) => messages.join("; "),
        None => body.error?,
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_owned())
}
