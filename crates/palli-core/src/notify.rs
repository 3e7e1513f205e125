//! Automated parent notifications.
//!
//! Marking a student absent produces two log entries for the parent: a text
//! message and the same text rendered as a voice note. The rule lives here as
//! a pure function so the store only has to splice its output into the log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  attendance::{AttendanceMark, AttendanceStatus},
  ids::LogId,
  people::Student,
};

/// Synthetic length appended to every voice note.
pub const VOICE_NOTE_DURATION: &str = "0:15s";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
  #[serde(rename = "SMS")]
  Sms,
  #[serde(rename = "Voice Note")]
  VoiceNote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
  Sent,
  Failed,
}

/// A message dispatched to a parent. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationLog {
  pub id:           LogId,
  pub student_name: String,
  pub parent_phone: String,
  pub message:      String,
  #[serde(rename = "type")]
  pub kind:         LogKind,
  pub timestamp:    DateTime<Utc>,
  pub status:       DeliveryStatus,
}

/// The text sent to a parent when their child is marked absent.
pub fn absence_message(student_name: &str, today: NaiveDate) -> String {
  format!(
    "Dear Parent, your child {student_name} is absent today ({today}). Please check."
  )
}

/// Derive the parent notifications for a roster submission.
///
/// For every `Absent` entry whose student resolves in `students`, emits an SMS
/// carrying [`absence_message`] verbatim followed by a voice note carrying the
/// same text plus [`VOICE_NOTE_DURATION`]. Unknown students are skipped.
/// Delivery is simulated and always succeeds.
pub fn absence_notifications(
  batch: &[AttendanceMark],
  students: &[Student],
  today: NaiveDate,
  now: DateTime<Utc>,
) -> Vec<CommunicationLog> {
  let mut logs = Vec::new();
  for mark in batch
    .iter()
    .filter(|m| m.status == AttendanceStatus::Absent)
  {
    let Some(student) = students.iter().find(|s| s.id == mark.student_id) else {
      tracing::debug!(student_id = %mark.student_id, "absentee not in directory");
      continue;
    };

    let message = absence_message(&student.name, today);
    let log = |kind, message| CommunicationLog {
      id: LogId::generate(),
      student_name: student.name.clone(),
      parent_phone: student.phone.clone(),
      message,
      kind,
      timestamp: now,
      status: DeliveryStatus::Sent,
    };

    let voice = format!("{message} ({VOICE_NOTE_DURATION})");
    logs.push(log(LogKind::Sms, message));
    logs.push(log(LogKind::VoiceNote, voice));
  }
  logs
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::people::fixtures::student;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 15).unwrap() }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
  }

  fn directory() -> Vec<Student> {
    vec![
      student("s1", "Karthik Raja", "10", "A"),
      student("s2", "Priya Dharshini", "10", "A"),
    ]
  }

  #[test]
  fn absentee_gets_sms_then_voice_note() {
    let batch = vec![
      AttendanceMark::new("s1", AttendanceStatus::Present),
      AttendanceMark::new("s2", AttendanceStatus::Absent),
    ];
    let students = directory();
    let logs = absence_notifications(&batch, &students, today(), now());

    assert_eq!(logs.len(), 2);
    let expected =
      "Dear Parent, your child Priya Dharshini is absent today (2024-01-15). Please check.";

    assert_eq!(logs[0].kind, LogKind::Sms);
    assert_eq!(logs[0].message, expected);
    assert_eq!(logs[1].kind, LogKind::VoiceNote);
    assert_eq!(logs[1].message, format!("{expected} (0:15s)"));

    for log in &logs {
      assert_eq!(log.student_name, "Priya Dharshini");
      assert_eq!(log.parent_phone, students[1].phone);
      assert_eq!(log.status, DeliveryStatus::Sent);
      assert_eq!(log.timestamp, now());
    }
    assert_ne!(logs[0].id, logs[1].id);
  }

  #[test]
  fn only_absent_triggers_notifications() {
    let batch = vec![
      AttendanceMark::new("s1", AttendanceStatus::Late),
      AttendanceMark::new("s2", AttendanceStatus::Leave),
    ];
    assert!(absence_notifications(&batch, &directory(), today(), now()).is_empty());
  }

  #[test]
  fn unknown_absentee_is_skipped() {
    let batch = vec![
      AttendanceMark::new("ghost", AttendanceStatus::Absent),
      AttendanceMark::new("s1", AttendanceStatus::Absent),
    ];
    let logs = absence_notifications(&batch, &directory(), today(), now());
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.student_name == "Karthik Raja"));
  }

  #[test]
  fn log_kind_serialises_with_display_names() {
    assert_eq!(serde_json::to_string(&LogKind::Sms).unwrap(), "\"SMS\"");
    assert_eq!(
      serde_json::to_string(&LogKind::VoiceNote).unwrap(),
      "\"Voice Note\""
    );
  }
}
