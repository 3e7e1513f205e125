//! Exams, marks and timetables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  ids::{ExamId, MarkId, StudentId, TimeTableId},
};

/// Used when an exam is created without a total, and when a mark refers to
/// an exam that no longer resolves.
pub const DEFAULT_TOTAL_MARKS: u32 = 100;

/// Periods in one school day.
pub const PERIODS_PER_DAY: usize = 8;

/// Days a blank timetable is laid out for.
pub const SCHOOL_DAYS: [&str; 5] =
  ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

// ─── Exam ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
  #[serde(default = "ExamId::generate")]
  pub id:          ExamId,
  pub name:        String,
  pub date:        NaiveDate,
  pub class:       String,
  pub subject:     String,
  #[serde(default = "default_total_marks")]
  pub total_marks: u32,
}

fn default_total_marks() -> u32 { DEFAULT_TOTAL_MARKS }

impl Exam {
  /// A zero total means the form left it blank.
  pub fn normalized(mut self) -> Self {
    if self.total_marks == 0 {
      self.total_marks = DEFAULT_TOTAL_MARKS;
    }
    self
  }

  pub fn validate(&self) -> Result<()> {
    for (value, field) in [
      (&self.name, "name"),
      (&self.class, "class"),
      (&self.subject, "subject"),
    ] {
      if value.trim().is_empty() {
        return Err(Error::MissingField(field));
      }
    }
    Ok(())
  }

  /// Check a raw score against this exam's range and stage it as a [`Mark`].
  pub fn mark(&self, student_id: StudentId, obtained: f64) -> Result<Mark> {
    if !(0.0..=f64::from(self.total_marks)).contains(&obtained) {
      return Err(Error::MarkOutOfRange {
        student_id,
        obtained,
        total: self.total_marks,
      });
    }
    Ok(Mark {
      id: MarkId::generate(),
      exam_id: self.id.clone(),
      student_id,
      obtained_marks: obtained,
    })
  }

  /// Stage a whole marks sheet. The first out-of-range entry rejects the
  /// sheet; nothing is staged partially.
  pub fn stage_marks(&self, entries: &[MarkEntry]) -> Result<Vec<Mark>> {
    entries
      .iter()
      .map(|e| self.mark(e.student_id.clone(), e.obtained_marks))
      .collect()
  }
}

// ─── Mark ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
  pub id:             MarkId,
  pub exam_id:        ExamId,
  pub student_id:     StudentId,
  pub obtained_marks: f64,
}

impl Mark {
  /// The natural key: one mark per student per exam.
  pub fn key(&self) -> (ExamId, StudentId) {
    (self.exam_id.clone(), self.student_id.clone())
  }
}

/// One row of a marks sheet as typed in by staff, before range checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
  pub student_id:     StudentId,
  pub obtained_marks: f64,
}

/// Colour band a score falls into on the marks sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
  High,
  Medium,
  Low,
}

impl ScoreBand {
  pub fn of(obtained: f64, total: u32) -> Self {
    let percent = percentage(obtained, total);
    if percent >= 90.0 {
      Self::High
    } else if percent >= 50.0 {
      Self::Medium
    } else {
      Self::Low
    }
  }
}

pub fn percentage(obtained: f64, total: u32) -> f64 {
  if total == 0 {
    return 0.0;
  }
  obtained / f64::from(total) * 100.0
}

// ─── Timetable ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTableDay {
  pub day:     String,
  /// Subject names in period order.
  pub periods: Vec<String>,
}

/// A weekly schedule for one class section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTable {
  #[serde(default = "TimeTableId::generate")]
  pub id:       TimeTableId,
  pub class:    String,
  pub section:  String,
  pub schedule: Vec<TimeTableDay>,
}

impl TimeTable {
  /// An empty week for a section that has no saved timetable yet.
  pub fn blank(class: &str, section: &str) -> Self {
    Self {
      id:       TimeTableId::generate(),
      class:    class.to_owned(),
      section:  section.to_owned(),
      schedule: SCHOOL_DAYS
        .iter()
        .map(|day| TimeTableDay {
          day:     (*day).to_owned(),
          periods: vec![String::new(); PERIODS_PER_DAY],
        })
        .collect(),
    }
  }

  /// The natural key timetables are saved under.
  pub fn key(&self) -> (String, String) {
    (self.class.clone(), self.section.clone())
  }

  pub fn validate(&self) -> Result<()> {
    if self.class.trim().is_empty() {
      return Err(Error::MissingField("class"));
    }
    if self.section.trim().is_empty() {
      return Err(Error::MissingField("section"));
    }
    match self
      .schedule
      .iter()
      .find(|d| d.periods.len() != PERIODS_PER_DAY)
    {
      Some(d) => Err(Error::PeriodCount {
        day:      d.day.clone(),
        found:    d.periods.len(),
        expected: PERIODS_PER_DAY,
      }),
      None => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn exam(total: u32) -> Exam {
    Exam {
      id:          ExamId::from("e1"),
      name:        "Quarterly Exam".into(),
      date:        NaiveDate::from_ymd_opt(2023, 9, 20).unwrap(),
      class:       "10".into(),
      subject:     "Mathematics".into(),
      total_marks: total,
    }
  }

  fn entry(student: &str, obtained: f64) -> MarkEntry {
    MarkEntry {
      student_id:     StudentId::from(student),
      obtained_marks: obtained,
    }
  }

  #[test]
  fn marks_at_the_bounds_are_accepted() {
    let marks = exam(50)
      .stage_marks(&[entry("s1", 0.0), entry("s2", 50.0)])
      .unwrap();
    assert_eq!(marks.len(), 2);
    assert!(marks.iter().all(|m| m.exam_id.as_str() == "e1"));
  }

  #[test]
  fn marks_above_total_reject_the_sheet() {
    let err = exam(50)
      .stage_marks(&[entry("s1", 40.0), entry("s2", 50.5)])
      .unwrap_err();
    match err {
      Error::MarkOutOfRange { student_id, total, .. } => {
        assert_eq!(student_id.as_str(), "s2");
        assert_eq!(total, 50);
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn negative_marks_are_rejected() {
    assert!(exam(100).mark(StudentId::from("s1"), -1.0).is_err());
  }

  #[test]
  fn score_bands() {
    assert_eq!(ScoreBand::of(92.0, 100), ScoreBand::High);
    assert_eq!(ScoreBand::of(45.0, 50), ScoreBand::High);
    assert_eq!(ScoreBand::of(50.0, 100), ScoreBand::Medium);
    assert_eq!(ScoreBand::of(49.0, 100), ScoreBand::Low);
  }

  #[test]
  fn blank_timetable_is_five_days_of_eight_periods() {
    let tt = TimeTable::blank("10", "A");
    assert_eq!(tt.schedule.len(), 5);
    assert_eq!(tt.schedule[0].day, "Monday");
    assert!(tt.schedule.iter().all(|d| d.periods.len() == PERIODS_PER_DAY));
    assert!(tt.validate().is_ok());
  }

  #[test]
  fn short_day_fails_validation() {
    let mut tt = TimeTable::blank("10", "A");
    tt.schedule[2].periods.pop();
    assert!(matches!(
      tt.validate(),
      Err(Error::PeriodCount { found: 7, .. })
    ));
  }

  #[test]
  fn exam_form_defaults_total_and_id() {
    let exam: Exam = serde_json::from_str(
      r#"{"name":"Unit Test 1","date":"2023-07-10","class":"9","subject":"Tamil"}"#,
    )
    .unwrap();
    assert_eq!(exam.total_marks, DEFAULT_TOTAL_MARKS);
    assert!(!exam.id.as_str().is_empty());

    let zero: Exam = serde_json::from_str(
      r#"{"name":"Unit Test 2","date":"2023-08-10","class":"9","subject":"Tamil","totalMarks":0}"#,
    )
    .unwrap();
    assert_eq!(zero.normalized().total_marks, DEFAULT_TOTAL_MARKS);
  }
}
