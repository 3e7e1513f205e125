//! [`MemoryStore`] — the in-memory implementation of [`SchoolStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use palli_core::{
  academic::{Exam, Mark, TimeTable},
  attendance::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, BatchOutcome,
    SectionStatus,
  },
  bulletin::{DocumentItem, Notice},
  ids::{ExamId, LeaveId, NoticeId, StudentId},
  leave::{self, Approver, LeaveApplication, LeaveDecision, LeaveStatus, NewLeave},
  notify::CommunicationLog,
  people::{Student, Teacher},
  state::{SchoolState, Snapshot},
  stats::{DashboardSummary, RosterFilters},
  store::{AttendanceQuery, LeaveQuery, MarkQuery, SchoolStore, StudentQuery},
};

use crate::{Error, Result};

/// The demonstration school the server starts with when no seed file is
/// configured.
const DEMO_SEED: &str = include_str!("../seed/demo.json");

// ─── Store ───────────────────────────────────────────────────────────────────

/// A school store held entirely in memory.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct MemoryStore {
  state: Arc<RwLock<SchoolState>>,
  now:   fn() -> DateTime<Utc>,
}

impl MemoryStore {
  /// A store seeded with `snapshot`, using the system clock.
  pub fn new(snapshot: Snapshot) -> Self { Self::with_clock(snapshot, Utc::now) }

  /// A store seeded with `snapshot` whose notion of "now" is `now`.
  pub fn with_clock(snapshot: Snapshot, now: fn() -> DateTime<Utc>) -> Self {
    Self {
      state: Arc::new(RwLock::new(SchoolState::from_snapshot(snapshot))),
      now,
    }
  }

  /// Load a snapshot from a JSON file.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
      .await
      .map_err(|source| Error::Io { path: path.to_owned(), source })?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    tracing::info!(path = %path.display(), students = snapshot.students.len(), "loaded seed");
    Ok(Self::new(snapshot))
  }

  /// The bundled demonstration school. Today's roster for 10-A is pre-marked
  /// with one absentee, without parent alerts.
  pub fn demo() -> Result<Self> { Self::demo_with_clock(Utc::now) }

  pub fn demo_with_clock(now: fn() -> DateTime<Utc>) -> Result<Self> {
    let snapshot: Snapshot = serde_json::from_str(DEMO_SEED)?;
    let mut state = SchoolState::from_snapshot(snapshot);
    let today = now().date_naive();
    state.mark_attendance(StudentId::from("s1"), AttendanceStatus::Present, today);
    state.mark_attendance(StudentId::from("s2"), AttendanceStatus::Absent, today);
    Ok(Self { state: Arc::new(RwLock::new(state)), now })
  }
}

// ─── SchoolStore impl ────────────────────────────────────────────────────────

impl SchoolStore for MemoryStore {
  type Error = Error;

  async fn snapshot(&self) -> Result<Snapshot> {
    Ok(self.state.read().await.to_snapshot())
  }

  fn today(&self) -> NaiveDate { (self.now)().date_naive() }

  // ── Students & staff ──────────────────────────────────────────────────────

  async fn list_students(&self, query: &StudentQuery) -> Result<Vec<Student>> {
    tracing::debug!(?query, "listing students");
    let state = self.state.read().await;
    Ok(
      state
        .students()
        .iter()
        .filter(|s| query.matches(s))
        .cloned()
        .collect(),
    )
  }

  async fn get_student(&self, id: &StudentId) -> Result<Option<Student>> {
    Ok(self.state.read().await.student(id).cloned())
  }

  async fn add_student(&self, student: Student) -> Result<Student> {
    tracing::info!(id = %student.id, class = %student.class, "adding student");
    self.state.write().await.add_student(student.clone());
    Ok(student)
  }

  async fn update_student(&self, student: Student) -> Result<Option<Student>> {
    let id = student.id.clone();
    let updated = self.state.write().await.update_student(student).cloned();
    if updated.is_none() {
      tracing::debug!(%id, "update of unknown student ignored");
    }
    Ok(updated)
  }

  async fn list_teachers(&self) -> Result<Vec<Teacher>> {
    Ok(self.state.read().await.teachers().to_vec())
  }

  async fn add_teacher(&self, teacher: Teacher) -> Result<Teacher> {
    tracing::info!(id = %teacher.id, "adding teacher");
    self.state.write().await.add_teacher(teacher.clone());
    Ok(teacher)
  }

  // ── Documents & notices ───────────────────────────────────────────────────

  async fn list_documents(&self, text: Option<&str>) -> Result<Vec<DocumentItem>> {
    let state = self.state.read().await;
    Ok(
      state
        .documents()
        .iter()
        .filter(|d| text.is_none_or(|t| d.matches(t)))
        .cloned()
        .collect(),
    )
  }

  async fn add_document(&self, document: DocumentItem) -> Result<DocumentItem> {
    tracing::info!(id = %document.id, title = %document.title, "adding document");
    self.state.write().await.add_document(document.clone());
    Ok(document)
  }

  async fn list_notices(&self) -> Result<Vec<Notice>> {
    Ok(self.state.read().await.notices().to_vec())
  }

  async fn add_notice(&self, notice: Notice) -> Result<Notice> {
    tracing::info!(id = %notice.id, "posting notice");
    self.state.write().await.add_notice(notice.clone());
    Ok(notice)
  }

  async fn delete_notice(&self, id: &NoticeId) -> Result<bool> {
    let removed = self.state.write().await.delete_notice(id);
    tracing::info!(%id, removed, "deleting notice");
    Ok(removed)
  }

  // ── Exams, marks & timetables ─────────────────────────────────────────────

  async fn list_exams(&self, class: Option<&str>) -> Result<Vec<Exam>> {
    let state = self.state.read().await;
    Ok(
      state
        .exams()
        .iter()
        .filter(|e| class.is_none_or(|c| e.class == c))
        .cloned()
        .collect(),
    )
  }

  async fn get_exam(&self, id: &ExamId) -> Result<Option<Exam>> {
    Ok(self.state.read().await.exam(id).cloned())
  }

  async fn add_exam(&self, exam: Exam) -> Result<Exam> {
    let exam = exam.normalized();
    tracing::info!(id = %exam.id, class = %exam.class, subject = %exam.subject, "adding exam");
    self.state.write().await.add_exam(exam.clone());
    Ok(exam)
  }

  async fn list_marks(&self, query: &MarkQuery) -> Result<Vec<Mark>> {
    let state = self.state.read().await;
    Ok(state.marks().filter(|m| query.matches(m)).cloned().collect())
  }

  async fn save_batch_marks(&self, marks: Vec<Mark>) -> Result<Vec<Mark>> {
    let count = marks.len();
    let replaced = self.state.write().await.save_batch_marks(marks.clone());
    tracing::info!(count, replaced, "saved marks");
    Ok(marks)
  }

  async fn list_timetables(&self) -> Result<Vec<TimeTable>> {
    Ok(self.state.read().await.time_tables().cloned().collect())
  }

  async fn get_timetable(&self, class: &str, section: &str) -> Result<TimeTable> {
    let state = self.state.read().await;
    Ok(
      state
        .time_table(class, section)
        .cloned()
        .unwrap_or_else(|| TimeTable::blank(class, section)),
    )
  }

  async fn save_timetable(&self, time_table: TimeTable) -> Result<TimeTable> {
    let replaced = self
      .state
      .write()
      .await
      .save_time_table(time_table.clone())
      .is_some();
    tracing::info!(
      class = %time_table.class,
      section = %time_table.section,
      replaced,
      "saved timetable"
    );
    Ok(time_table)
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn list_attendance(
    &self,
    query: &AttendanceQuery,
  ) -> Result<Vec<AttendanceRecord>> {
    tracing::debug!(?query, "listing attendance");
    let state = self.state.read().await;
    Ok(
      state
        .attendance()
        .filter(|r| query.matches(r, state.student(&r.student_id)))
        .cloned()
        .collect(),
    )
  }

  async fn mark_attendance(
    &self,
    student_id: StudentId,
    status: AttendanceStatus,
  ) -> Result<AttendanceRecord> {
    let today = self.today();
    tracing::info!(%student_id, %status, %today, "marking attendance");
    Ok(self.state.write().await.mark_attendance(student_id, status, today))
  }

  async fn mark_batch_attendance(
    &self,
    batch: Vec<AttendanceMark>,
  ) -> Result<BatchOutcome> {
    let now = (self.now)();
    let today = now.date_naive();
    let outcome = self
      .state
      .write()
      .await
      .mark_batch_attendance(&batch, today, now);
    tracing::info!(
      %today,
      records = outcome.records.len(),
      alerts = outcome.alerts_sent(),
      "marked batch attendance"
    );
    Ok(outcome)
  }

  async fn section_status(&self, class: &str, section: &str) -> Result<SectionStatus> {
    let today = self.today();
    let state = self.state.read().await;
    Ok(SectionStatus::compute(
      state.students(),
      |id| state.attendance_on(id, today).map(|r| r.status),
      class,
      section,
      today,
    ))
  }

  async fn list_communication_logs(&self) -> Result<Vec<CommunicationLog>> {
    Ok(self.state.read().await.communication_logs().to_vec())
  }

  // ── Leave ─────────────────────────────────────────────────────────────────

  async fn list_leaves(&self, query: &LeaveQuery) -> Result<Vec<LeaveApplication>> {
    let state = self.state.read().await;
    Ok(
      state
        .leaves()
        .iter()
        .filter(|l| query.matches(l))
        .cloned()
        .collect(),
    )
  }

  async fn get_leave(&self, id: &LeaveId) -> Result<Option<LeaveApplication>> {
    Ok(self.state.read().await.leave(id).cloned())
  }

  async fn apply_leave(&self, leave: NewLeave) -> Result<LeaveApplication> {
    let today = self.today();
    let application = self.state.write().await.apply_leave(leave, today);
    tracing::info!(
      id = %application.id,
      applicant = %application.user_name,
      role = %application.user_role,
      "leave applied"
    );
    Ok(application)
  }

  async fn update_leave_status(
    &self,
    id: &LeaveId,
    decision: LeaveDecision,
  ) -> Result<Option<LeaveApplication>> {
    let updated = self
      .state
      .write()
      .await
      .update_leave_status(id, decision)
      .cloned();
    tracing::info!(%id, %decision, found = updated.is_some(), "leave decided");
    Ok(updated)
  }

  async fn leave_inbox(
    &self,
    approver: &Approver,
    status: Option<LeaveStatus>,
  ) -> Result<Vec<LeaveApplication>> {
    tracing::debug!(?approver, ?status, "reading leave inbox");
    let state = self.state.read().await;
    Ok(
      leave::inbox(state.leaves(), approver, status)
        .into_iter()
        .cloned()
        .collect(),
    )
  }

  // ── Read models ───────────────────────────────────────────────────────────

  async fn dashboard(&self) -> Result<DashboardSummary> {
    let today = self.today();
    Ok(DashboardSummary::compute(&*self.state.read().await, today))
  }

  async fn rosters(&self) -> Result<RosterFilters> {
    Ok(RosterFilters::compute(&*self.state.read().await))
  }
}
