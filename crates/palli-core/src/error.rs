//! Error types for `palli-core`.

use thiserror::Error;

use crate::ids::{ExamId, StudentId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("required field is empty: {0}")]
  MissingField(&'static str),

  #[error("exam not found: {0}")]
  ExamNotFound(ExamId),

  #[error(
    "marks for student {student_id} out of range: {obtained} not in 0..={total}"
  )]
  MarkOutOfRange {
    student_id: StudentId,
    obtained:   f64,
    total:      u32,
  },

  #[error("timetable day {day:?} has {found} periods, expected {expected}")]
  PeriodCount {
    day:      String,
    found:    usize,
    expected: usize,
  },

  #[error("upload of {size} bytes exceeds the {limit} byte limit")]
  UploadTooLarge { size: usize, limit: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
