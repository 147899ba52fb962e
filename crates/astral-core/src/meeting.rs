use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scheduled live class.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub meeting_number: String,
    pub passcode: String,
    pub published: bool,
    /// `UserRecord::id` of the staff member who created it.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    /// Project into the listing shape, hiding join details unless `reveal_join`.
    #[must_use]
    pub fn into_view(self, reveal_join: bool) -> MeetingView {
        MeetingView {
            id: self.id,
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            published: self.published,
            meeting_number: reveal_join.then_some(self.meeting_number),
            passcode: reveal_join.then_some(self.passcode),
        }
    }
}

/// Input for creating a meeting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewMeeting {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub meeting_number: String,
    pub passcode: String,
    pub published: bool,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub meeting_number: Option<String>,
    pub passcode: Option<String>,
    pub published: Option<bool>,
}

impl MeetingPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.meeting_number.is_none()
            && self.passcode.is_none()
            && self.published.is_none()
    }
}

/// Meeting as returned by the upcoming-meetings listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeetingView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub published: bool,
    pub meeting_number: Option<String>,
    pub passcode: Option<String>,
}
