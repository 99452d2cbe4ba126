use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use swimbook_core::{
    errors::SwimResult,
    models::{
        coverage::CoverageRequest,
        instructor::Instructor,
        lesson::{LessonSchedule, ScheduleFields},
        swimmer::Swimmer,
        waitlist::{ExitReason, WaitlistEntry, WaitlistEntryResponse},
    },
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSwimmer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub level: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbSwimmer> for Swimmer {
    fn from(row: DbSwimmer) -> Self {
        Swimmer {
            id: row.id,
            name: row.name,
            email: row.email,
            level: row.level,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbInstructor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbInstructor> for Instructor {
    fn from(row: DbInstructor) -> Self {
        Instructor {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLesson {
    pub id: Uuid,
    pub name: String,
    pub level: i32,
    pub capacity: i32,
    pub instructor_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub meeting_days: Option<Vec<String>>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl DbLesson {
    pub fn schedule_fields(&self) -> ScheduleFields {
        ScheduleFields {
            start_date: self.start_date,
            end_date: self.end_date,
            meeting_days: self.meeting_days.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// `Ok(None)` for a lesson that has not been scheduled yet; an error when
    /// only some of the schedule columns are filled in.
    pub fn schedule(&self) -> SwimResult<Option<LessonSchedule>> {
        let fields = self.schedule_fields();
        if fields.is_empty() {
            return Ok(None);
        }
        LessonSchedule::try_from(fields).map(Some)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEnrollment {
    pub lesson_id: Uuid,
    pub swimmer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWaitlistEntry {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub swimmer_id: Uuid,
    pub position: i32,
    pub status: String,
    pub exit_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbWaitlistEntry {
    pub fn to_entry(&self) -> SwimResult<WaitlistEntry> {
        Ok(WaitlistEntry {
            id: self.id,
            swimmer_id: self.swimmer_id,
            position: self.position,
            status: self.status.parse()?,
            created_at: self.created_at,
        })
    }

    pub fn to_response(&self) -> SwimResult<WaitlistEntryResponse> {
        Ok(WaitlistEntryResponse {
            id: self.id,
            lesson_id: self.lesson_id,
            swimmer_id: self.swimmer_id,
            position: self.position,
            status: self.status.parse()?,
            exit_reason: self.exit_reason.as_deref().map(str::parse::<ExitReason>).transpose()?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCoverageRequest {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub requesting_instructor_id: Uuid,
    pub covering_instructor_id: Option<Uuid>,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl DbCoverageRequest {
    pub fn to_request(&self) -> SwimResult<CoverageRequest> {
        Ok(CoverageRequest {
            id: self.id,
            lesson_id: self.lesson_id,
            requesting_instructor_id: self.requesting_instructor_id,
            covering_instructor_id: self.covering_instructor_id,
            status: self.status.parse()?,
            note: self.note.clone(),
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        })
    }
}
