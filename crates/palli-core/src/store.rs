//! The `SchoolStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `palli-store-memory`).
//! Higher layers (`palli-api`, `palli-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  academic::{Exam, Mark, TimeTable},
  attendance::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, BatchOutcome,
    SectionStatus,
  },
  bulletin::{DocumentItem, Notice},
  ids::{ExamId, LeaveId, NoticeId, StudentId},
  leave::{Approver, LeaveApplication, LeaveDecision, LeaveStatus, NewLeave},
  notify::CommunicationLog,
  people::{Student, Teacher},
  state::Snapshot,
  stats::{DashboardSummary, RosterFilters},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`SchoolStore::list_students`].
#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
  pub class:   Option<String>,
  pub section: Option<String>,
  /// Case-insensitive match over name, or substring of the EMIS number.
  pub text:    Option<String>,
}

impl StudentQuery {
  pub fn matches(&self, student: &Student) -> bool {
    if self.class.as_ref().is_some_and(|c| &student.class != c) {
      return false;
    }
    if self.section.as_ref().is_some_and(|s| &student.section != s) {
      return false;
    }
    match self.text.as_deref().map(str::trim) {
      Some(text) if !text.is_empty() => {
        student.name.to_lowercase().contains(&text.to_lowercase())
          || student.emis_number.contains(text)
      }
      _ => true,
    }
  }
}

/// Parameters for [`SchoolStore::list_attendance`].
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
  pub date:       Option<NaiveDate>,
  pub student_id: Option<StudentId>,
  /// Restrict to students of one class section. Both halves must be given
  /// for the filter to apply.
  pub class:      Option<String>,
  pub section:    Option<String>,
}

impl AttendanceQuery {
  /// `student` is the directory entry for `record.student_id`, if any.
  pub fn matches(
    &self,
    record: &AttendanceRecord,
    student: Option<&Student>,
  ) -> bool {
    if self.date.is_some_and(|d| record.date != d) {
      return false;
    }
    if self.student_id.as_ref().is_some_and(|id| &record.student_id != id) {
      return false;
    }
    match (&self.class, &self.section) {
      (Some(class), Some(section)) => {
        student.is_some_and(|s| s.in_section(class, section))
      }
      _ => true,
    }
  }
}

/// Parameters for [`SchoolStore::list_marks`].
#[derive(Debug, Clone, Default)]
pub struct MarkQuery {
  pub exam_id:    Option<ExamId>,
  pub student_id: Option<StudentId>,
}

impl MarkQuery {
  pub fn matches(&self, mark: &Mark) -> bool {
    self.exam_id.as_ref().is_none_or(|id| &mark.exam_id == id)
      && self.student_id.as_ref().is_none_or(|id| &mark.student_id == id)
  }
}

/// Parameters for [`SchoolStore::list_leaves`].
#[derive(Debug, Clone, Default)]
pub struct LeaveQuery {
  /// Only applications filed under this name.
  pub user_name: Option<String>,
  pub status:    Option<LeaveStatus>,
}

impl LeaveQuery {
  pub fn matches(&self, leave: &LeaveApplication) -> bool {
    self.user_name.as_ref().is_none_or(|n| &leave.user_name == n)
      && self.status.is_none_or(|s| leave.status == s)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a school records backend.
///
/// Every mutation is a single atomic transition: concurrent callers observe
/// either none or all of its effects. The backend owns the clock, so "today"
/// is always the backend's current date.
///
/// Updates and deletes of records that do not exist are silent no-ops,
/// reported through `Option`/`bool` results rather than errors.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SchoolStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The whole state in list form.
  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;

  /// The backend's current date.
  fn today(&self) -> NaiveDate;

  // ── Students & staff ──────────────────────────────────────────────────

  fn list_students<'a>(
    &'a self,
    query: &'a StudentQuery,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + 'a;

  fn get_student<'a>(
    &'a self,
    id: &'a StudentId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + 'a;

  fn add_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Replace the student with the same id. Returns `None` if no such
  /// student exists.
  fn update_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn list_teachers(
    &self,
  ) -> impl Future<Output = Result<Vec<Teacher>, Self::Error>> + Send + '_;

  fn add_teacher(
    &self,
    teacher: Teacher,
  ) -> impl Future<Output = Result<Teacher, Self::Error>> + Send + '_;

  // ── Documents & notices ───────────────────────────────────────────────

  /// Newest first, optionally filtered by free text over title and category.
  fn list_documents<'a>(
    &'a self,
    text: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<DocumentItem>, Self::Error>> + Send + 'a;

  fn add_document(
    &self,
    document: DocumentItem,
  ) -> impl Future<Output = Result<DocumentItem, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_notices(
    &self,
  ) -> impl Future<Output = Result<Vec<Notice>, Self::Error>> + Send + '_;

  fn add_notice(
    &self,
    notice: Notice,
  ) -> impl Future<Output = Result<Notice, Self::Error>> + Send + '_;

  /// Returns whether a notice was removed.
  fn delete_notice<'a>(
    &'a self,
    id: &'a NoticeId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Exams, marks & timetables ─────────────────────────────────────────

  fn list_exams<'a>(
    &'a self,
    class: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Exam>, Self::Error>> + Send + 'a;

  fn get_exam<'a>(
    &'a self,
    id: &'a ExamId,
  ) -> impl Future<Output = Result<Option<Exam>, Self::Error>> + Send + 'a;

  fn add_exam(
    &self,
    exam: Exam,
  ) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  fn list_marks<'a>(
    &'a self,
    query: &'a MarkQuery,
  ) -> impl Future<Output = Result<Vec<Mark>, Self::Error>> + Send + 'a;

  /// Apply a marks sheet as one transition, last write wins per exam and
  /// student. Returns the marks as stored.
  fn save_batch_marks(
    &self,
    marks: Vec<Mark>,
  ) -> impl Future<Output = Result<Vec<Mark>, Self::Error>> + Send + '_;

  fn list_timetables(
    &self,
  ) -> impl Future<Output = Result<Vec<TimeTable>, Self::Error>> + Send + '_;

  /// The saved timetable for a section, or a blank week if none was saved.
  fn get_timetable<'a>(
    &'a self,
    class: &'a str,
    section: &'a str,
  ) -> impl Future<Output = Result<TimeTable, Self::Error>> + Send + 'a;

  /// Upsert on `(class, section)`.
  fn save_timetable(
    &self,
    time_table: TimeTable,
  ) -> impl Future<Output = Result<TimeTable, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  fn list_attendance<'a>(
    &'a self,
    query: &'a AttendanceQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + 'a;

  /// Record one student for today. Sends no notifications.
  fn mark_attendance(
    &self,
    student_id: StudentId,
    status: AttendanceStatus,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  /// Record a roster submission for today and alert parents of absentees.
  fn mark_batch_attendance(
    &self,
    batch: Vec<AttendanceMark>,
  ) -> impl Future<Output = Result<BatchOutcome, Self::Error>> + Send + '_;

  fn section_status<'a>(
    &'a self,
    class: &'a str,
    section: &'a str,
  ) -> impl Future<Output = Result<SectionStatus, Self::Error>> + Send + 'a;

  /// Newest first.
  fn list_communication_logs(
    &self,
  ) -> impl Future<Output = Result<Vec<CommunicationLog>, Self::Error>> + Send + '_;

  // ── Leave ─────────────────────────────────────────────────────────────

  /// Newest first.
  fn list_leaves<'a>(
    &'a self,
    query: &'a LeaveQuery,
  ) -> impl Future<Output = Result<Vec<LeaveApplication>, Self::Error>> + Send + 'a;

  fn get_leave<'a>(
    &'a self,
    id: &'a LeaveId,
  ) -> impl Future<Output = Result<Option<LeaveApplication>, Self::Error>> + Send + 'a;

  /// File an application. The stored record is always `Pending` and dated
  /// today.
  fn apply_leave(
    &self,
    leave: NewLeave,
  ) -> impl Future<Output = Result<LeaveApplication, Self::Error>> + Send + '_;

  /// Returns `None` if no such application exists.
  fn update_leave_status<'a>(
    &'a self,
    id: &'a LeaveId,
    decision: LeaveDecision,
  ) -> impl Future<Output = Result<Option<LeaveApplication>, Self::Error>> + Send + 'a;

  /// Applications routed to `approver`, newest first.
  fn leave_inbox<'a>(
    &'a self,
    approver: &'a Approver,
    status: Option<LeaveStatus>,
  ) -> impl Future<Output = Result<Vec<LeaveApplication>, Self::Error>> + Send + 'a;

  // ── Read models ───────────────────────────────────────────────────────

  fn dashboard(
    &self,
  ) -> impl Future<Output = Result<DashboardSummary, Self::Error>> + Send + '_;

  fn rosters(
    &self,
  ) -> impl Future<Output = Result<RosterFilters, Self::Error>> + Send + '_;
}
