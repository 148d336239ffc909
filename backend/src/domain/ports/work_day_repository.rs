//! Port abstraction for work day and attendance persistence adapters.

use async_trait::async_trait;

use crate::domain::{AttendanceStatus, NewWorkDay, WorkDay, WorkDayAttendance};

use super::StoreError;

/// Typed access to work days and their attendance records.
#[async_trait]
pub trait WorkDayRepository: Send + Sync {
    /// Create a work day, assigning the next id.
    async fn create(&self, work_day: NewWorkDay) -> Result<WorkDay, StoreError>;

    /// Fetch a work day by id.
    async fn find(&self, id: i32) -> Result<Option<WorkDay>, StoreError>;

    /// All work days.
    async fn list(&self) -> Result<Vec<WorkDay>, StoreError>;

    /// Record a sign-up; uniqueness per (work day, user) is enforced by the
    /// workflow through [`WorkDayRepository::attendances_for_user`].
    async fn create_attendance(
        &self,
        work_day_id: i32,
        user_id: i32,
    ) -> Result<WorkDayAttendance, StoreError>;

    /// Attendance records for one work day.
    async fn attendances_for(&self, work_day_id: i32)
        -> Result<Vec<WorkDayAttendance>, StoreError>;

    /// Attendance records for one user across all work days.
    async fn attendances_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<WorkDayAttendance>, StoreError>;

    /// Update the status of an attendance record.
    async fn update_attendance_status(
        &self,
        id: i32,
        status: AttendanceStatus,
    ) -> Result<Option<WorkDayAttendance>, StoreError>;
}
