use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    conflict::normalize_day,
    errors::{SwimError, SwimResult},
};

/// When a lesson meets: an inclusive date range, a set of weekday labels and
/// a daily time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSchedule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meeting_days: BTreeSet<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl LessonSchedule {
    pub fn new<I, S>(
        start_date: NaiveDate,
        end_date: NaiveDate,
        meeting_days: I,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_date,
            end_date,
            meeting_days: meeting_days.into_iter().map(Into::into).collect(),
            start_time,
            end_time,
        }
    }

    /// Stricter than what the conflict detector needs: used when a lesson is
    /// created so that stored schedules are always meaningful.
    pub fn validate(&self) -> SwimResult<()> {
        if self.start_date > self.end_date {
            return Err(SwimError::InvalidInput(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }

        if self.start_time >= self.end_time {
            return Err(SwimError::InvalidInput(format!(
                "start_time {} must be before end_time {}",
                self.start_time, self.end_time
            )));
        }

        if let Some(bad) = self
            .meeting_days
            .iter()
            .find(|day| normalize_day(day).is_none())
        {
            return Err(SwimError::InvalidInput(format!(
                "unrecognized meeting day: {:?}",
                bad
            )));
        }

        if self.meeting_days.is_empty() {
            return Err(SwimError::InvalidInput(
                "at least one meeting day is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Schedule fields as they arrive from storage or a request body, where any
/// of them may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFields {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub meeting_days: Option<Vec<String>>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl ScheduleFields {
    /// True when no schedule field is set at all (an unscheduled lesson).
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.meeting_days.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

fn required<T>(value: Option<T>, field: &str) -> SwimResult<T> {
    value.ok_or_else(|| SwimError::InvalidInput(format!("missing schedule field: {}", field)))
}

impl TryFrom<ScheduleFields> for LessonSchedule {
    type Error = SwimError;

    fn try_from(fields: ScheduleFields) -> SwimResult<Self> {
        Ok(LessonSchedule::new(
            required(fields.start_date, "start_date")?,
            required(fields.end_date, "end_date")?,
            required(fields.meeting_days, "meeting_days")?,
            required(fields.start_time, "start_time")?,
            required(fields.end_time, "end_time")?,
        ))
    }
}

impl From<LessonSchedule> for ScheduleFields {
    fn from(schedule: LessonSchedule) -> Self {
        Self {
            start_date: Some(schedule.start_date),
            end_date: Some(schedule.end_date),
            meeting_days: Some(schedule.meeting_days.into_iter().collect()),
            start_time: Some(schedule.start_time),
            end_time: Some(schedule.end_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub name: String,
    pub level: i32,
    pub capacity: i32,
    pub instructor_id: Option<Uuid>,
    #[serde(flatten)]
    pub schedule: ScheduleFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub name: String,
    pub level: i32,
    pub capacity: i32,
    pub instructor_id: Option<Uuid>,
    pub schedule: Option<LessonSchedule>,
    pub enrolled: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConflictRequest {
    pub first: ScheduleFields,
    pub second: ScheduleFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConflictResponse {
    pub conflict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonConflict {
    pub first: Uuid,
    pub second: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorConflictsResponse {
    pub instructor_id: Uuid,
    pub conflicts: Vec<LessonConflict>,
}
