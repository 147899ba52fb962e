//! Meeting repository: CRUD and the upcoming window scan.

use astral_core::ids::PREFIX_MEETING;
use astral_core::meeting::{Meeting, MeetingPatch, NewMeeting};
use chrono::{DateTime, Utc};

use crate::AstralDb;
use crate::error::DatabaseError;
use crate::helpers::{from_unix, get_opt_string, parse_datetime};

const MEETING_COLUMNS: &str = "id, title, description, start_time, meeting_number, passcode, \
     published, created_by, created_at";

fn row_to_meeting(row: &libsql::Row) -> Result<Meeting, DatabaseError> {
    Ok(Meeting {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        start_time: from_unix(row.get::<i64>(3)?)?,
        meeting_number: row.get::<String>(4)?,
        passcode: row.get::<String>(5)?,
        published: row.get::<i64>(6)? != 0,
        created_by: row.get::<String>(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl AstralDb {
    pub async fn insert_meeting(
        &self,
        created_by: &str,
        input: &NewMeeting,
    ) -> Result<Meeting, DatabaseError> {
        let id = self.generate_id(PREFIX_MEETING).await?;
        self.conn()
            .execute(
                "INSERT INTO meetings (id, title, description, start_time, meeting_number, passcode, published, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    id.as_str(),
                    input.title.as_str(),
                    input.description.as_deref(),
                    input.start_time.timestamp(),
                    input.meeting_number.as_str(),
                    input.passcode.as_str(),
                    input.published,
                    created_by
                ],
            )
            .await?;
        self.get_meeting(&id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_meeting(&row)?)),
            None => Ok(None),
        }
    }

    /// Meetings starting at or after `since`, earliest first.
    pub async fn list_meetings_since(
        &self,
        since: DateTime<Utc>,
        include_unpublished: bool,
    ) -> Result<Vec<Meeting>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {MEETING_COLUMNS} FROM meetings
                     WHERE start_time >= ?1 AND (?2 OR published = 1)
                     ORDER BY start_time ASC, id ASC"
                ),
                libsql::params![since.timestamp(), include_unpublished],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_meeting(&row)?);
        }
        Ok(results)
    }

    /// Apply the present fields of `patch`. Returns `None` if the meeting
    /// does not exist.
    pub async fn update_meeting(
        &self,
        id: &str,
        patch: &MeetingPatch,
    ) -> Result<Option<Meeting>, DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE meetings SET
                   title = COALESCE(?2, title),
                   description = COALESCE(?3, description),
                   start_time = COALESCE(?4, start_time),
                   meeting_number = COALESCE(?5, meeting_number),
                   passcode = COALESCE(?6, passcode),
                   published = COALESCE(?7, published)
                 WHERE id = ?1",
                libsql::params![
                    id,
                    patch.title.as_deref(),
                    patch.description.as_deref(),
                    patch.start_time.map(|dt| dt.timestamp()),
                    patch.meeting_number.as_deref(),
                    patch.passcode.as_deref(),
                    patch.published
                ],
            )
            .await?;
        if affected == 0 {
            return Ok(None);
        }
        self.get_meeting(id).await
    }

    /// Returns whether a row was removed.
    pub async fn delete_meeting(&self, id: &str) -> Result<bool, DatabaseError> {
        let affected = self
            .conn()
            .execute("DELETE FROM meetings WHERE id = ?1", [id])
            .await?;
        Ok(affected > 0)
    }
}
