//! [`SchoolState`] — the canonical collections and the reducer that mutates
//! them.
//!
//! Every method here is a synchronous, self-contained state transition. The
//! current date and time are passed in rather than read from the clock, so
//! backends decide what "today" is and tests can pin it.
//!
//! Records with a natural key live in maps keyed by that key, which makes the
//! "one active record per key" rules structural:
//!
//! | Collection | Key |
//! |------------|-----|
//! | attendance | `(date, student_id)` |
//! | marks      | `(exam_id, student_id)` |
//! | timetables | `(class, section)` |

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  academic::{Exam, Mark, TimeTable},
  attendance::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, BatchOutcome,
  },
  bulletin::{DocumentItem, Notice},
  ids::{AttendanceId, ExamId, LeaveId, NoticeId, StudentId},
  leave::{LeaveApplication, LeaveDecision, NewLeave},
  notify::{CommunicationLog, absence_notifications},
  people::{Student, Teacher},
};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The list-shaped, serialisable form of the whole state. Used to seed a store
/// and to export it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
  pub students:           Vec<Student>,
  pub teachers:           Vec<Teacher>,
  pub documents:          Vec<DocumentItem>,
  pub exams:              Vec<Exam>,
  pub attendance:         Vec<AttendanceRecord>,
  pub notices:            Vec<Notice>,
  pub communication_logs: Vec<CommunicationLog>,
  pub time_tables:        Vec<TimeTable>,
  pub marks:              Vec<Mark>,
  pub leaves:             Vec<LeaveApplication>,
}

// ─── State ───────────────────────────────────────────────────────────────────

type AttendanceKey = (NaiveDate, StudentId);
type MarkKey = (ExamId, StudentId);
type SectionKey = (String, String);

#[derive(Debug, Clone, Default)]
pub struct SchoolState {
  students:           Vec<Student>,
  teachers:           Vec<Teacher>,
  /// Newest first.
  documents:          Vec<DocumentItem>,
  exams:              Vec<Exam>,
  attendance:         BTreeMap<AttendanceKey, AttendanceRecord>,
  /// Newest first.
  notices:            Vec<Notice>,
  /// Newest first.
  communication_logs: Vec<CommunicationLog>,
  time_tables:        BTreeMap<SectionKey, TimeTable>,
  marks:              BTreeMap<MarkKey, Mark>,
  /// Newest first.
  leaves:             Vec<LeaveApplication>,
}

impl SchoolState {
  /// Build state from a snapshot. Where the snapshot holds several records
  /// for one natural key, the later one wins.
  pub fn from_snapshot(snapshot: Snapshot) -> Self {
    Self {
      students:           snapshot.students,
      teachers:           snapshot.teachers,
      documents:          snapshot.documents,
      exams:              snapshot.exams.into_iter().map(Exam::normalized).collect(),
      attendance:         snapshot
        .attendance
        .into_iter()
        .map(|r| ((r.date, r.student_id.clone()), r))
        .collect(),
      notices:            snapshot.notices,
      communication_logs: snapshot.communication_logs,
      time_tables:        snapshot
        .time_tables
        .into_iter()
        .map(|t| (t.key(), t))
        .collect(),
      marks:              snapshot.marks.into_iter().map(|m| (m.key(), m)).collect(),
      leaves:             snapshot.leaves,
    }
  }

  pub fn to_snapshot(&self) -> Snapshot {
    Snapshot {
      students:           self.students.clone(),
      teachers:           self.teachers.clone(),
      documents:          self.documents.clone(),
      exams:              self.exams.clone(),
      attendance:         self.attendance.values().cloned().collect(),
      notices:            self.notices.clone(),
      communication_logs: self.communication_logs.clone(),
      time_tables:        self.time_tables.values().cloned().collect(),
      marks:              self.marks.values().cloned().collect(),
      leaves:             self.leaves.clone(),
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn students(&self) -> &[Student] { &self.students }

  pub fn student(&self, id: &StudentId) -> Option<&Student> {
    self.students.iter().find(|s| &s.id == id)
  }

  pub fn teachers(&self) -> &[Teacher] { &self.teachers }

  pub fn documents(&self) -> &[DocumentItem] { &self.documents }

  pub fn exams(&self) -> &[Exam] { &self.exams }

  pub fn exam(&self, id: &ExamId) -> Option<&Exam> {
    self.exams.iter().find(|e| &e.id == id)
  }

  /// Attendance ordered by date, then student.
  pub fn attendance(&self) -> impl Iterator<Item = &AttendanceRecord> {
    self.attendance.values()
  }

  pub fn attendance_on(
    &self,
    student_id: &StudentId,
    date: NaiveDate,
  ) -> Option<&AttendanceRecord> {
    self.attendance.get(&(date, student_id.clone()))
  }

  pub fn notices(&self) -> &[Notice] { &self.notices }

  pub fn communication_logs(&self) -> &[CommunicationLog] {
    &self.communication_logs
  }

  pub fn time_tables(&self) -> impl Iterator<Item = &TimeTable> {
    self.time_tables.values()
  }

  pub fn time_table(&self, class: &str, section: &str) -> Option<&TimeTable> {
    self
      .time_tables
      .get(&(class.to_owned(), section.to_owned()))
  }

  /// Marks ordered by exam, then student.
  pub fn marks(&self) -> impl Iterator<Item = &Mark> { self.marks.values() }

  pub fn leaves(&self) -> &[LeaveApplication] { &self.leaves }

  pub fn leave(&self, id: &LeaveId) -> Option<&LeaveApplication> {
    self.leaves.iter().find(|l| &l.id == id)
  }

  // ── People ────────────────────────────────────────────────────────────────

  pub fn add_student(&mut self, student: Student) { self.students.push(student); }

  /// Replace the student with the same id. Returns `None` and changes
  /// nothing when no such student exists.
  pub fn update_student(&mut self, student: Student) -> Option<&Student> {
    let slot = self.students.iter_mut().find(|s| s.id == student.id)?;
    *slot = student;
    Some(slot)
  }

  pub fn add_teacher(&mut self, teacher: Teacher) { self.teachers.push(teacher); }

  // ── Bulletin ──────────────────────────────────────────────────────────────

  pub fn add_document(&mut self, document: DocumentItem) {
    self.documents.insert(0, document);
  }

  pub fn add_notice(&mut self, notice: Notice) { self.notices.insert(0, notice); }

  /// Returns whether a notice was removed.
  pub fn delete_notice(&mut self, id: &NoticeId) -> bool {
    let before = self.notices.len();
    self.notices.retain(|n| &n.id != id);
    self.notices.len() != before
  }

  // ── Academic ──────────────────────────────────────────────────────────────

  pub fn add_exam(&mut self, exam: Exam) { self.exams.push(exam.normalized()); }

  /// Save a timetable under its `(class, section)`, replacing whatever was
  /// there. Returns the replaced timetable.
  pub fn save_time_table(&mut self, time_table: TimeTable) -> Option<TimeTable> {
    self.time_tables.insert(time_table.key(), time_table)
  }

  /// Apply a marks sheet. Each mark replaces any earlier mark for the same
  /// exam and student; within the batch the later entry wins. Returns how
  /// many existing marks were replaced.
  pub fn save_batch_marks(&mut self, marks: Vec<Mark>) -> usize {
    let mut seen = HashSet::new();
    let mut replaced = 0;
    for mark in marks {
      let key = mark.key();
      if self.marks.insert(key.clone(), mark).is_some() && seen.insert(key) {
        replaced += 1;
      }
    }
    replaced
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  /// Record one student's status for `today`, overwriting any earlier record
  /// for that day. No notifications are sent.
  pub fn mark_attendance(
    &mut self,
    student_id: StudentId,
    status: AttendanceStatus,
    today: NaiveDate,
  ) -> AttendanceRecord {
    let record = AttendanceRecord {
      id: AttendanceId::generate(),
      student_id,
      date: today,
      status,
    };
    self
      .attendance
      .insert((today, record.student_id.clone()), record.clone());
    record
  }

  /// Record a roster submission for `today` and notify parents of absentees.
  ///
  /// Every student in the batch gets exactly one record for `today`; when a
  /// student appears more than once the last entry wins, both for the stored
  /// record and for notifications. Logs for absentees are prepended to the
  /// communication log as one block.
  pub fn mark_batch_attendance(
    &mut self,
    batch: &[AttendanceMark],
    today: NaiveDate,
    now: DateTime<Utc>,
  ) -> BatchOutcome {
    let batch = last_entry_per_student(batch);

    let records: Vec<AttendanceRecord> = batch
      .iter()
      .map(|mark| AttendanceRecord {
        id:         AttendanceId::generate(),
        student_id: mark.student_id.clone(),
        date:       today,
        status:     mark.status,
      })
      .collect();
    for record in &records {
      self
        .attendance
        .insert((today, record.student_id.clone()), record.clone());
    }

    let notifications = absence_notifications(&batch, &self.students, today, now);
    if !notifications.is_empty() {
      self
        .communication_logs
        .splice(0..0, notifications.iter().cloned());
    }

    BatchOutcome { date: today, records, notifications }
  }

  // ── Leave ─────────────────────────────────────────────────────────────────

  /// File a leave application. It always starts out `Pending`.
  pub fn apply_leave(
    &mut self,
    leave: NewLeave,
    today: NaiveDate,
  ) -> LeaveApplication {
    let application = leave.into_application(today);
    self.leaves.insert(0, application.clone());
    application
  }

  /// Record an approver's decision. Re-deciding is allowed and repeating the
  /// same decision changes nothing.
  pub fn update_leave_status(
    &mut self,
    id: &LeaveId,
    decision: LeaveDecision,
  ) -> Option<&LeaveApplication> {
    let leave = self.leaves.iter_mut().find(|l| &l.id == id)?;
    leave.status = decision.into();
    Some(leave)
  }
}

/// Collapse repeated students to their last entry, keeping the order in
/// which those last entries appear.
fn last_entry_per_student(batch: &[AttendanceMark]) -> Vec<AttendanceMark> {
  let mut seen = HashSet::new();
  let mut out: Vec<AttendanceMark> = batch
    .iter()
    .rev()
    .filter(|m| seen.insert(m.student_id.clone()))
    .cloned()
    .collect();
  out.reverse();
  out
}
