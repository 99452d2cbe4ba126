use mockall::mock;
use swimbook_core::models::{
    coverage::CoverageStatus,
    waitlist::{ExitReason, PositionAssignment},
};
use uuid::Uuid;

use crate::models::{
    DbCoverageRequest, DbEnrollment, DbLesson, DbSwimmer, DbWaitlistEntry,
};

// Mock repositories for testing
mock! {
    pub SwimmerRepo {
        pub async fn create_swimmer(
            &self,
            name: &'static str,
            email: &'static str,
            level: i32,
        ) -> eyre::Result<DbSwimmer>;

        pub async fn get_swimmer_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbSwimmer>>;

        pub async fn get_swimmers_by_ids(
            &self,
            ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<DbSwimmer>>;
    }
}

mock! {
    pub LessonRepo {
        pub async fn get_lesson_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbLesson>>;

        pub async fn lock_lesson(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbLesson>>;

        pub async fn get_lessons_by_instructor(
            &self,
            instructor_id: Uuid,
        ) -> eyre::Result<Vec<DbLesson>>;

        pub async fn update_lesson_instructor(
            &self,
            id: Uuid,
            instructor_id: Uuid,
        ) -> eyre::Result<DbLesson>;

        pub async fn count_enrollments(
            &self,
            lesson_id: Uuid,
        ) -> eyre::Result<i64>;

        pub async fn is_enrolled(
            &self,
            lesson_id: Uuid,
            swimmer_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn enroll_swimmer(
            &self,
            lesson_id: Uuid,
            swimmer_id: Uuid,
        ) -> eyre::Result<DbEnrollment>;
    }
}

mock! {
    pub WaitlistRepo {
        pub async fn get_entries_by_lesson(
            &self,
            lesson_id: Uuid,
        ) -> eyre::Result<Vec<DbWaitlistEntry>>;

        pub async fn create_entry(
            &self,
            lesson_id: Uuid,
            swimmer_id: Uuid,
            position: i32,
        ) -> eyre::Result<DbWaitlistEntry>;

        pub async fn deactivate_entry(
            &self,
            id: Uuid,
            reason: ExitReason,
        ) -> eyre::Result<DbWaitlistEntry>;

        pub async fn apply_positions(
            &self,
            assignments: Vec<PositionAssignment>,
        ) -> eyre::Result<u64>;
    }
}

mock! {
    pub CoverageRepo {
        pub async fn has_open_coverage_request(
            &self,
            lesson_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn create_coverage_request(
            &self,
            lesson_id: Uuid,
            requesting_instructor_id: Uuid,
            note: Option<String>,
        ) -> eyre::Result<DbCoverageRequest>;

        pub async fn lock_coverage_request(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbCoverageRequest>>;

        pub async fn get_open_coverage_requests(
            &self,
        ) -> eyre::Result<Vec<DbCoverageRequest>>;

        pub async fn resolve_coverage_request(
            &self,
            id: Uuid,
            status: CoverageStatus,
            covering_instructor_id: Option<Uuid>,
        ) -> eyre::Result<DbCoverageRequest>;
    }
}
