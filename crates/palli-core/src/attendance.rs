//! Daily attendance records and the batch-marking result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  ids::{AttendanceId, StudentId},
  notify::{CommunicationLog, LogKind},
  people::Student,
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
  Present,
  Absent,
  Late,
  Leave,
}

/// One student's status on one day. At most one record exists per
/// `(student_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
  pub id:         AttendanceId,
  pub student_id: StudentId,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
}

/// One row of a roster submission. The date is never supplied: marks always
/// apply to the day they are submitted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
  pub student_id: StudentId,
  pub status:     AttendanceStatus,
}

impl AttendanceMark {
  pub fn new(student_id: impl Into<StudentId>, status: AttendanceStatus) -> Self {
    Self { student_id: student_id.into(), status }
  }
}

/// What a batch submission wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
  pub date:          NaiveDate,
  pub records:       Vec<AttendanceRecord>,
  /// Parent notifications emitted for absentees, newest batch order.
  pub notifications: Vec<CommunicationLog>,
}

impl BatchOutcome {
  /// Number of absentees whose parents were alerted.
  pub fn alerts_sent(&self) -> usize {
    self
      .notifications
      .iter()
      .filter(|log| log.kind == LogKind::Sms)
      .count()
  }
}

/// Today's marking progress for one class section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStatus {
  pub class:   String,
  pub section: String,
  pub date:    NaiveDate,
  pub roster:  usize,
  pub present: usize,
  pub absent:  usize,
  /// Every student on a non-empty roster has a record for `date`. Clients use
  /// this to lock the roster against re-submission.
  pub marked:  bool,
}

impl SectionStatus {
  pub fn compute<'a>(
    students: impl IntoIterator<Item = &'a Student>,
    status_of: impl Fn(&StudentId) -> Option<AttendanceStatus>,
    class: &str,
    section: &str,
    date: NaiveDate,
  ) -> Self {
    let mut out = Self {
      class: class.to_owned(),
      section: section.to_owned(),
      date,
      roster: 0,
      present: 0,
      absent: 0,
      marked: true,
    };
    for student in students.into_iter().filter(|s| s.in_section(class, section)) {
      out.roster += 1;
      match status_of(&student.id) {
        Some(AttendanceStatus::Present) => out.present += 1,
        Some(AttendanceStatus::Absent) => out.absent += 1,
        Some(_) => {}
        None => out.marked = false,
      }
    }
    out.marked &= out.roster > 0;
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::people::fixtures::student;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 15).unwrap() }

  #[test]
  fn status_parses_from_lowercase() {
    assert_eq!(
      "absent".parse::<AttendanceStatus>().unwrap(),
      AttendanceStatus::Absent
    );
  }

  #[test]
  fn section_is_marked_only_when_everyone_has_a_record() {
    let roster = vec![
      student("s1", "Karthik Raja", "10", "A"),
      student("s2", "Priya Dharshini", "10", "A"),
      student("s3", "Abdul Basith", "9", "B"),
    ];

    let partial = SectionStatus::compute(
      &roster,
      |id| (id.as_str() == "s1").then_some(AttendanceStatus::Present),
      "10",
      "A",
      day(),
    );
    assert_eq!(partial.roster, 2);
    assert_eq!(partial.present, 1);
    assert!(!partial.marked);

    let full = SectionStatus::compute(
      &roster,
      |id| match id.as_str() {
        "s1" => Some(AttendanceStatus::Present),
        "s2" => Some(AttendanceStatus::Absent),
        _ => None,
      },
      "10",
      "A",
      day(),
    );
    assert_eq!((full.present, full.absent), (1, 1));
    assert!(full.marked);
  }

  #[test]
  fn empty_section_is_never_marked() {
    let status = SectionStatus::compute(
      &Vec::<Student>::new(),
      |_| Some(AttendanceStatus::Present),
      "12",
      "C",
      day(),
    );
    assert_eq!(status.roster, 0);
    assert!(!status.marked);
  }
}
