//! Leave applications and approval routing.
//!
//! Approvals are scoped by role: a teacher handles student requests for the
//! class section they are looking at, the admin handles teacher requests.
//! The admin has no view of student requests at all.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  ids::{LeaveId, UserId},
  people::{Student, Teacher},
  session::{Role, User},
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
  Pending,
  Approved,
  Rejected,
}

/// An approver's verdict. Deliberately excludes `Pending`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveDecision {
  #[strum(to_string = "Approved", serialize = "approve")]
  Approved,
  #[strum(to_string = "Rejected", serialize = "reject")]
  Rejected,
}

impl From<LeaveDecision> for LeaveStatus {
  fn from(d: LeaveDecision) -> Self {
    match d {
      LeaveDecision::Approved => Self::Approved,
      LeaveDecision::Rejected => Self::Rejected,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplication {
  pub id:          LeaveId,
  pub user_id:     UserId,
  pub user_name:   String,
  pub user_role:   Role,
  /// Student applicants only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub class:       Option<String>,
  /// Student applicants only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub section:     Option<String>,
  /// Teacher applicants only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub designation: Option<String>,
  pub from_date:   NaiveDate,
  pub to_date:     NaiveDate,
  pub reason:      String,
  pub status:      LeaveStatus,
  pub applied_on:  NaiveDate,
}

// ─── NewLeave ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::SchoolStore::apply_leave`].
/// `id`, `status` and `applied_on` are always set by the store; they are not
/// accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeave {
  pub user_id:     UserId,
  pub user_name:   String,
  pub user_role:   Role,
  #[serde(default)]
  pub class:       Option<String>,
  #[serde(default)]
  pub section:     Option<String>,
  #[serde(default)]
  pub designation: Option<String>,
  pub from_date:   NaiveDate,
  /// Defaults to `from_date` for a single-day leave.
  #[serde(default)]
  pub to_date:     Option<NaiveDate>,
  pub reason:      String,
}

impl NewLeave {
  /// Compose an application on behalf of the signed-in `user`.
  ///
  /// The applicant's profile is looked up by name: a student's class, section
  /// and id come from the student directory, a teacher's designation and id
  /// from the staff directory. When the lookup fails the application is
  /// still produced, just without those fields.
  pub fn for_user(
    user: &User,
    students: &[Student],
    teachers: &[Teacher],
    from_date: NaiveDate,
    to_date: Option<NaiveDate>,
    reason: impl Into<String>,
  ) -> Self {
    let mut leave = Self {
      user_id: user.id.clone(),
      user_name: user.name.clone(),
      user_role: user.role,
      class: None,
      section: None,
      designation: None,
      from_date,
      to_date,
      reason: reason.into(),
    };
    match user.role {
      Role::Student => {
        if let Some(profile) = students.iter().find(|s| s.name == user.name) {
          leave.user_id = profile.id.clone().into();
          leave.class = Some(profile.class.clone());
          leave.section = Some(profile.section.clone());
        }
      }
      Role::Teacher => {
        if let Some(profile) = teachers.iter().find(|t| t.name == user.name) {
          leave.user_id = profile.id.clone().into();
          leave.designation = Some(profile.designation.clone());
        }
      }
      Role::Admin => {}
    }
    leave
  }

  pub fn validate(&self) -> Result<()> {
    if self.reason.trim().is_empty() {
      return Err(Error::MissingField("reason"));
    }
    if self.user_name.trim().is_empty() {
      return Err(Error::MissingField("userName"));
    }
    Ok(())
  }

  /// Turn the request into a pending application filed on `today`.
  pub fn into_application(self, today: NaiveDate) -> LeaveApplication {
    LeaveApplication {
      id:          LeaveId::generate(),
      user_id:     self.user_id,
      user_name:   self.user_name,
      user_role:   self.user_role,
      class:       self.class,
      section:     self.section,
      designation: self.designation,
      from_date:   self.from_date,
      to_date:     self.to_date.unwrap_or(self.from_date),
      reason:      self.reason,
      status:      LeaveStatus::Pending,
      applied_on:  today,
    }
  }
}

// ─── Routing ─────────────────────────────────────────────────────────────────

/// Whose approval inbox is being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approver {
  Admin,
  /// A teacher looking at one class section.
  Teacher { class: String, section: String },
  /// Students approve nothing.
  Student,
}

impl Approver {
  /// Whether this approver handles `leave`.
  pub fn routes(&self, leave: &LeaveApplication) -> bool {
    match self {
      Self::Admin => leave.user_role == Role::Teacher,
      Self::Teacher { class, section } => {
        leave.user_role == Role::Student
          && leave.class.as_deref() == Some(class.as_str())
          && leave.section.as_deref() == Some(section.as_str())
      }
      Self::Student => false,
    }
  }
}

/// Applications waiting on `approver`, optionally narrowed to one status.
/// `None` means all statuses.
pub fn inbox<'a>(
  leaves: impl IntoIterator<Item = &'a LeaveApplication>,
  approver: &Approver,
  status: Option<LeaveStatus>,
) -> Vec<&'a LeaveApplication> {
  leaves
    .into_iter()
    .filter(|l| approver.routes(l))
    .filter(|l| status.is_none_or(|s| l.status == s))
    .collect()
}

/// Applications filed under `user_name`.
pub fn filed_by<'a>(
  leaves: impl IntoIterator<Item = &'a LeaveApplication>,
  user_name: &str,
) -> Vec<&'a LeaveApplication> {
  leaves.into_iter().filter(|l| l.user_name == user_name).collect()
}
