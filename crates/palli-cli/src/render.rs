//! Plain-text rendering of API results for the terminal.

use std::fmt::Write as _;

use palli_core::{
  academic::{Exam, Mark, ScoreBand},
  attendance::SectionStatus,
  leave::LeaveApplication,
  notify::{CommunicationLog, LogKind},
  people::Student,
  stats::DashboardSummary,
};

pub fn dashboard(d: &DashboardSummary) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "School summary for {}", d.date);
  let _ = writeln!(out, "  students   {:>5}", d.total_students);
  let _ = writeln!(out, "  teachers   {:>5}", d.total_teachers);
  let _ = writeln!(out, "  present    {:>5}", d.present_today);
  let _ = writeln!(out, "  absent     {:>5}", d.absent_today);
  let _ = writeln!(
    out,
    "  results    {} passed ({}%), {} failed ({}%)",
    d.pass_count, d.pass_percentage, d.fail_count, d.fail_percentage
  );
  let _ = writeln!(
    out,
    "  gender     {} male, {} female, {} other",
    d.gender.male, d.gender.female, d.gender.other
  );
  out
}

pub fn students(students: &[Student]) -> String {
  let mut out = String::new();
  for s in students {
    let _ = writeln!(
      out,
      "{:<10} {:<24} {:>3}-{:<2} {}",
      s.id.as_str(), s.name, s.class, s.section, s.phone
    );
  }
  if students.is_empty() {
    out.push_str("no students\n");
  }
  out
}

/// A marks sheet, one row per student with the score's band.
pub fn marks(exam: &Exam, marks: &[Mark], students: &[Student]) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{} ({}, class {}) out of {}",
    exam.name, exam.subject, exam.class, exam.total_marks
  );
  for mark in marks {
    let name = students
      .iter()
      .find(|s| s.id == mark.student_id)
      .map_or(mark.student_id.as_str(), |s| s.name.as_str());
    let band = match ScoreBand::of(mark.obtained_marks, exam.total_marks) {
      ScoreBand::High => "high",
      ScoreBand::Medium => "medium",
      ScoreBand::Low => "low",
    };
    let _ = writeln!(out, "  {name:<24} {:>6} {band}", mark.obtained_marks);
  }
  out
}

pub fn section_status(s: &SectionStatus) -> String {
  let state = if s.marked { "marked" } else { "open" };
  format!(
    "{}-{} on {}: {state}, {} on roll, {} present, {} absent\n",
    s.class, s.section, s.date, s.roster, s.present, s.absent
  )
}

pub fn logs(logs: &[CommunicationLog]) -> String {
  let mut out = String::new();
  for log in logs {
    let kind = match log.kind {
      LogKind::Sms => "SMS",
      LogKind::VoiceNote => "VOICE",
    };
    let _ = writeln!(
      out,
      "{} {kind:<5} {:<20} {:<12} {}",
      log.timestamp.format("%Y-%m-%d %H:%M"),
      log.student_name,
      log.parent_phone,
      log.message
    );
  }
  out
}

pub fn leaves(leaves: &[LeaveApplication]) -> String {
  let mut out = String::new();
  for l in leaves {
    let who = match (&l.class, &l.section, &l.designation) {
      (Some(class), Some(section), _) => format!("{class}-{section}"),
      (_, _, Some(designation)) => designation.clone(),
      _ => String::new(),
    };
    let range = if l.from_date == l.to_date {
      l.from_date.to_string()
    } else {
      format!("{}..{}", l.from_date, l.to_date)
    };
    let _ = writeln!(
      out,
      "{:<34} {:<9} {:<20} {:<14} {range:<22} {}",
      l.id.as_str(), l.status.to_string(), l.user_name, who, l.reason
    );
  }
  if leaves.is_empty() {
    out.push_str("no leave applications\n");
  }
  out
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn leave_rows_show_class_or_designation() {
    let leaves: Vec<LeaveApplication> = serde_json::from_value(json!([
      {
        "id": "l1", "userId": "s1", "userName": "Karthik Raja",
        "userRole": "STUDENT", "class": "10", "section": "A",
        "fromDate": "2024-01-20", "toDate": "2024-01-22",
        "reason": "Fever", "status": "Pending", "appliedOn": "2024-01-15",
      },
      {
        "id": "l2", "userId": "t2", "userName": "Mr. David Raj",
        "userRole": "TEACHER", "designation": "BT Assistant",
        "fromDate": "2024-01-20", "toDate": "2024-01-20",
        "reason": "Personal", "status": "Approved", "appliedOn": "2024-01-15",
      },
    ]))
    .unwrap();
    let text = super::leaves(&leaves);
    let lines: Vec<_> = text.lines().collect();
    assert!(lines[0].contains("10-A"));
    assert!(lines[0].contains("2024-01-20..2024-01-22"));
    assert!(lines[1].contains("BT Assistant"));
    assert!(!lines[1].contains(".."));
  }

  #[test]
  fn marks_sheet_shows_bands() {
    let exam: Exam = serde_json::from_value(json!({
      "id": "e1", "name": "Quarterly", "date": "2024-01-10",
      "class": "10", "subject": "Maths", "totalMarks": 50,
    }))
    .unwrap();
    let marks: Vec<Mark> = serde_json::from_value(json!([
      { "id": "m1", "examId": "e1", "studentId": "s1", "obtainedMarks": 46 },
      { "id": "m2", "examId": "e1", "studentId": "s9", "obtainedMarks": 20 },
    ]))
    .unwrap();
    let text = super::marks(&exam, &marks, &[]);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Quarterly (Maths, class 10) out of 50");
    assert!(lines[1].contains("s1") && lines[1].ends_with("high"));
    assert!(lines[2].ends_with("low"));
  }

  #[test]
  fn empty_lists_say_so() {
    assert_eq!(students(&[]), "no students\n");
    assert_eq!(leaves(&[]), "no leave applications\n");
  }
}
