//! Opaque string identifiers.
//!
//! Every record carries an id that is either supplied by the caller (seed
//! fixtures use short ids such as `s1`) or generated at creation time. Each
//! entity gets its own newtype so a student id cannot be passed where an exam
//! id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! opaque_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

      /// A fresh random id.
      pub fn generate() -> Self { Self(Uuid::new_v4().simple().to_string()) }

      pub fn as_str(&self) -> &str { &self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self { Self(s.to_owned()) }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self { Self(s) }
    }
  };
}

opaque_id!(StudentId);
opaque_id!(TeacherId);
opaque_id!(DocumentId);
opaque_id!(ExamId);
opaque_id!(MarkId);
opaque_id!(AttendanceId);
opaque_id!(NoticeId);
opaque_id!(LogId);
opaque_id!(TimeTableId);
opaque_id!(LeaveId);
opaque_id!(
  /// The applicant on a leave application or the session user. May hold a
  /// student id, a teacher id, or a session-only id.
  UserId
);

impl From<StudentId> for UserId {
  fn from(id: StudentId) -> Self { Self(id.0) }
}

impl From<TeacherId> for UserId {
  fn from(id: TeacherId) -> Self { Self(id.0) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_ids_are_unique() {
    assert_ne!(StudentId::generate(), StudentId::generate());
  }

  #[test]
  fn serialises_as_bare_string() {
    let json = serde_json::to_string(&ExamId::from("e1")).unwrap();
    assert_eq!(json, "\"e1\"");
  }
}
