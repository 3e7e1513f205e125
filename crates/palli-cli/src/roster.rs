//! Turning a section roster plus the teacher's exceptions into a batch
//! submission.

use anyhow::{Result, bail};
use palli_core::{
  attendance::{AttendanceMark, AttendanceStatus, SectionStatus},
  people::Student,
};

/// Exceptions to the default `Present` mark, by student id.
#[derive(Debug, Default)]
pub struct Exceptions<'a> {
  pub absent: &'a [String],
  pub late:   &'a [String],
  pub leave:  &'a [String],
}

impl Exceptions<'_> {
  fn status_of(&self, id: &str) -> AttendanceStatus {
    let listed = |ids: &[String]| ids.iter().any(|i| i == id);
    if listed(self.absent) {
      AttendanceStatus::Absent
    } else if listed(self.late) {
      AttendanceStatus::Late
    } else if listed(self.leave) {
      AttendanceStatus::Leave
    } else {
      AttendanceStatus::Present
    }
  }

  fn ids(&self) -> impl Iterator<Item = &String> {
    self.absent.iter().chain(self.late).chain(self.leave)
  }
}

/// One mark per roster student, `Present` unless listed in `exceptions`.
///
/// Fails when an exception names a student who is not on the roster, so a
/// typo cannot silently mark the wrong child present.
pub fn compose(roster: &[Student], exceptions: &Exceptions<'_>) -> Result<Vec<AttendanceMark>> {
  if let Some(stray) = exceptions
    .ids()
    .find(|id| !roster.iter().any(|s| s.id.as_str() == id.as_str()))
  {
    bail!("{stray} is not on this roster");
  }
  Ok(
    roster
      .iter()
      .map(|s| AttendanceMark::new(s.id.clone(), exceptions.status_of(s.id.as_str())))
      .collect(),
  )
}

/// Refuse to re-submit a section that is already fully marked today.
pub fn ensure_unlocked(status: &SectionStatus, force: bool) -> Result<()> {
  if status.marked && !force {
    bail!(
      "attendance for {}-{} is already marked for {} (pass --force to resubmit)",
      status.class,
      status.section,
      status.date
    );
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use serde_json::json;

  use super::*;

  fn student(id: &str, name: &str, class: &str, section: &str) -> Student {
    serde_json::from_value(json!({
      "id": id,
      "name": name,
      "gender": "Male",
      "dob": "2009-05-12",
      "class": class,
      "section": section,
      "admissionDate": "2019-06-01",
    }))
    .unwrap()
  }

  fn roster() -> Vec<Student> {
    vec![
      student("s1", "Karthik", "10", "A"),
      student("s2", "Priya", "10", "A"),
      student("s4", "Arun", "10", "A"),
    ]
  }

  #[test]
  fn unlisted_students_are_present() {
    let absent = vec!["s2".to_owned()];
    let late = vec!["s4".to_owned()];
    let marks = compose(
      &roster(),
      &Exceptions { absent: &absent, late: &late, ..Default::default() },
    )
    .unwrap();
    let statuses: Vec<_> = marks.iter().map(|m| m.status).collect();
    assert_eq!(
      statuses,
      [AttendanceStatus::Present, AttendanceStatus::Absent, AttendanceStatus::Late]
    );
  }

  #[test]
  fn unknown_exception_is_rejected() {
    let absent = vec!["s9".to_owned()];
    let err = compose(&roster(), &Exceptions { absent: &absent, ..Default::default() })
      .unwrap_err();
    assert!(err.to_string().contains("s9"));
  }

  #[test]
  fn marked_section_needs_force() {
    let status = SectionStatus {
      class:   "10".into(),
      section: "A".into(),
      date:    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
      roster:  3,
      present: 3,
      absent:  0,
      marked:  true,
    };
    assert!(ensure_unlocked(&status, false).is_err());
    assert!(ensure_unlocked(&status, true).is_ok());
    assert!(ensure_unlocked(&SectionStatus { marked: false, ..status }, false).is_ok());
  }
}
