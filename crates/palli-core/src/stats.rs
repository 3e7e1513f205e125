//! Read models derived from the state: the headmaster's dashboard and the
//! class/section pickers.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  academic::DEFAULT_TOTAL_MARKS,
  attendance::AttendanceStatus,
  people::Gender,
  state::SchoolState,
};

/// Percentage of an exam's total needed to pass.
pub const PASS_PERCENT: f64 = 35.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCounts {
  pub male:   usize,
  pub female: usize,
  pub other:  usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
  pub date:            NaiveDate,
  pub total_students:  usize,
  pub total_teachers:  usize,
  pub present_today:   usize,
  pub absent_today:    usize,
  pub pass_count:      usize,
  pub fail_count:      usize,
  /// One decimal place, or `"0"` when there are no marks.
  pub pass_percentage: String,
  pub fail_percentage: String,
  pub gender:          GenderCounts,
}

impl DashboardSummary {
  pub fn compute(state: &SchoolState, today: NaiveDate) -> Self {
    let (mut present_today, mut absent_today) = (0, 0);
    for record in state.attendance().filter(|r| r.date == today) {
      match record.status {
        AttendanceStatus::Present => present_today += 1,
        AttendanceStatus::Absent => absent_today += 1,
        _ => {}
      }
    }

    let (mut pass_count, mut fail_count) = (0, 0);
    for mark in state.marks() {
      let total = state
        .exam(&mark.exam_id)
        .map_or(DEFAULT_TOTAL_MARKS, |e| e.total_marks);
      if mark.obtained_marks * 100.0 >= f64::from(total) * PASS_PERCENT {
        pass_count += 1;
      } else {
        fail_count += 1;
      }
    }
    let graded = pass_count + fail_count;

    let mut gender = GenderCounts::default();
    for student in state.students() {
      match student.gender {
        Gender::Male => gender.male += 1,
        Gender::Female => gender.female += 1,
        Gender::Other => gender.other += 1,
      }
    }

    Self {
      date: today,
      total_students: state.students().len(),
      total_teachers: state.teachers().len(),
      present_today,
      absent_today,
      pass_count,
      fail_count,
      pass_percentage: share(pass_count, graded),
      fail_percentage: share(fail_count, graded),
      gender,
    }
  }
}

fn share(part: usize, whole: usize) -> String {
  if whole == 0 {
    return "0".to_owned();
  }
  format!("{:.1}", part as f64 / whole as f64 * 100.0)
}

// ─── Roster filters ──────────────────────────────────────────────────────────

/// Distinct classes and sections present in the student directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFilters {
  /// Numeric classes in numeric order, then anything else lexically.
  pub classes:  Vec<String>,
  pub sections: Vec<String>,
}

impl RosterFilters {
  pub fn compute(state: &SchoolState) -> Self {
    let mut classes: Vec<String> = state
      .students()
      .iter()
      .map(|s| s.class.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();
    classes.sort_by(|a, b| class_order(a, b));

    let sections = state
      .students()
      .iter()
      .map(|s| s.section.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    Self { classes, sections }
  }
}

fn class_order(a: &str, b: &str) -> Ordering {
  match (a.parse::<u32>(), b.parse::<u32>()) {
    (Ok(x), Ok(y)) => x.cmp(&y),
    (Ok(_), Err(_)) => Ordering::Less,
    (Err(_), Ok(_)) => Ordering::Greater,
    (Err(_), Err(_)) => a.cmp(b),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::{
    academic::{Exam, Mark},
    attendance::AttendanceMark,
    ids::{ExamId, MarkId, StudentId},
    people::fixtures::student,
    state::Snapshot,
  };

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 15).unwrap() }

  fn mark(exam: &str, student: &str, obtained: f64) -> Mark {
    Mark {
      id:             MarkId::generate(),
      exam_id:        ExamId::from(exam),
      student_id:     StudentId::from(student),
      obtained_marks: obtained,
    }
  }

  #[test]
  fn empty_school_reports_zero_percentages() {
    let summary = DashboardSummary::compute(&SchoolState::default(), today());
    assert_eq!(summary.pass_percentage, "0");
    assert_eq!(summary.fail_percentage, "0");
    assert_eq!(summary.total_students, 0);
  }

  #[test]
  fn pass_threshold_scales_with_exam_total() {
    let mut state = SchoolState::from_snapshot(Snapshot {
      exams: vec![Exam {
        id:          ExamId::from("e1"),
        name:        "Unit Test".into(),
        date:        today(),
        class:       "10".into(),
        subject:     "Science".into(),
        total_marks: 50,
      }],
      ..Snapshot::default()
    });
    state.save_batch_marks(vec![
      // 17.5 needed out of 50
      mark("e1", "s1", 17.5),
      mark("e1", "s2", 17.0),
      // unknown exam: 35 needed out of an assumed 100
      mark("gone", "s1", 34.0),
    ]);

    let summary = DashboardSummary::compute(&state, today());
    assert_eq!(summary.pass_count, 1);
    assert_eq!(summary.fail_count, 2);
    assert_eq!(summary.pass_percentage, "33.3");
    assert_eq!(summary.fail_percentage, "66.7");
  }

  #[test]
  fn counts_todays_attendance_and_genders() {
    let mut boy = student("s2", "Abdul Basith", "9", "B");
    boy.gender = Gender::Male;
    let mut state = SchoolState::from_snapshot(Snapshot {
      students: vec![student("s1", "Priya Dharshini", "10", "A"), boy],
      ..Snapshot::default()
    });
    let yesterday = today().pred_opt().unwrap();
    state.mark_attendance(StudentId::from("s1"), AttendanceStatus::Absent, yesterday);
    state.mark_batch_attendance(
      &[
        AttendanceMark::new("s1", AttendanceStatus::Present),
        AttendanceMark::new("s2", AttendanceStatus::Absent),
      ],
      today(),
      Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
    );

    let summary = DashboardSummary::compute(&state, today());
    assert_eq!(summary.present_today, 1);
    assert_eq!(summary.absent_today, 1);
    assert_eq!(summary.gender, GenderCounts { male: 1, female: 1, other: 0 });
  }

  #[test]
  fn classes_sort_numerically_with_names_last() {
    let state = SchoolState::from_snapshot(Snapshot {
      students: vec![
        student("s1", "A", "10", "B"),
        student("s2", "B", "9", "A"),
        student("s3", "C", "LKG", "A"),
        student("s4", "D", "12", "C"),
        student("s5", "E", "9", "B"),
      ],
      ..Snapshot::default()
    });
    let filters = RosterFilters::compute(&state);
    assert_eq!(filters.classes, ["9", "10", "12", "LKG"]);
    assert_eq!(filters.sections, ["A", "B", "C"]);
  }
}
