//! Students and staff.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  ids::{StudentId, TeacherId},
};

// ─── Shared ──────────────────────────────────────────────────────────────────

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
pub enum Gender {
  Male,
  Female,
  Other,
}

fn require(value: &str, field: &'static str) -> Result<()> {
  if value.trim().is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(())
  }
}

// ─── Student ─────────────────────────────────────────────────────────────────

/// A student's admission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
  #[serde(default = "StudentId::generate")]
  pub id:             StudentId,
  /// Education-management-information-system number; an opaque key.
  #[serde(default)]
  pub emis_number:    String,
  pub name:           String,
  pub gender:         Gender,
  pub dob:            NaiveDate,
  pub class:          String,
  pub section:        String,
  #[serde(default)]
  pub blood_group:    String,
  #[serde(default)]
  pub community:      String,
  #[serde(default)]
  pub religion:       String,
  #[serde(default)]
  pub mother_tongue:  String,
  #[serde(default)]
  pub father_name:    String,
  #[serde(default)]
  pub mother_name:    String,
  /// Parent contact number; absence alerts go here.
  #[serde(default)]
  pub phone:          String,
  #[serde(default)]
  pub address:        String,
  #[serde(default)]
  pub aadhar:         String,
  pub admission_date: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url:      Option<String>,
}

impl Student {
  /// The admission form cannot be submitted without a name and a class.
  pub fn validate(&self) -> Result<()> {
    require(&self.name, "name")?;
    require(&self.class, "class")
  }

  pub fn in_section(&self, class: &str, section: &str) -> bool {
    self.class == class && self.section == section
  }
}

// ─── Teacher ─────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum EmploymentStatus {
  #[default]
  Permanent,
  Temporary,
  Contract,
}

/// A staff member's registration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
  #[serde(default = "TeacherId::generate")]
  pub id:               TeacherId,
  pub employee_id:      String,
  pub name:             String,
  pub gender:           Gender,
  pub dob:              NaiveDate,
  #[serde(default)]
  pub email:            String,
  #[serde(default)]
  pub phone:            String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub secondary_phone:  Option<String>,
  #[serde(default)]
  pub address:          String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url:        Option<String>,

  // ── Professional ────────────────────────────────────────────────────────
  pub designation:      String,
  #[serde(default)]
  pub subject:          String,
  #[serde(default)]
  pub qualification:    String,
  #[serde(default)]
  pub experience_years: u32,
  pub joining_date:     NaiveDate,
  #[serde(default)]
  pub status:           EmploymentStatus,

  // ── Personal ────────────────────────────────────────────────────────────
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blood_group:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub religion:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub community:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub marital_status:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub nationality:      Option<String>,

  // ── ID & banking ────────────────────────────────────────────────────────
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub aadhar_number:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bank_account:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ifsc_code:        Option<String>,

  // ── Family & emergency ──────────────────────────────────────────────────
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub spouse_name:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub emergency_contact_name:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub emergency_contact_phone: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub medical_conditions: Option<String>,
}

impl Teacher {
  pub fn validate(&self) -> Result<()> {
    require(&self.name, "name")?;
    require(&self.employee_id, "employeeId")?;
    require(&self.designation, "designation")
  }
}

#[cfg(test)]
pub(crate) mod fixtures {
  use super::*;

  pub fn student(id: &str, name: &str, class: &str, section: &str) -> Student {
    Student {
      id:             StudentId::from(id),
      emis_number:    format!("3302010{id}"),
      name:           name.to_owned(),
      gender:         Gender::Female,
      dob:            NaiveDate::from_ymd_opt(2010, 5, 12).unwrap(),
      class:          class.to_owned(),
      section:        section.to_owned(),
      blood_group:    "O+".into(),
      community:      String::new(),
      religion:       String::new(),
      mother_tongue:  "Tamil".into(),
      father_name:    String::new(),
      mother_name:    String::new(),
      phone:          format!("98765432{}", id.len()),
      address:        String::new(),
      aadhar:         String::new(),
      admission_date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
      image_url:      None,
    }
  }

  pub fn teacher(id: &str, name: &str, designation: &str) -> Teacher {
    Teacher {
      id:                      TeacherId::from(id),
      employee_id:             format!("EMP-{id}"),
      name:                    name.to_owned(),
      gender:                  Gender::Female,
      dob:                     NaiveDate::from_ymd_opt(1985, 5, 15).unwrap(),
      email:                   String::new(),
      phone:                   String::new(),
      secondary_phone:         None,
      address:                 String::new(),
      image_url:               None,
      designation:             designation.to_owned(),
      subject:                 "Mathematics".into(),
      qualification:           String::new(),
      experience_years:        10,
      joining_date:            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
      status:                  EmploymentStatus::Permanent,
      blood_group:             None,
      religion:                None,
      community:               None,
      marital_status:          None,
      nationality:             None,
      aadhar_number:           None,
      bank_account:            None,
      ifsc_code:               None,
      spouse_name:             None,
      emergency_contact_name:  None,
      emergency_contact_phone: None,
      medical_conditions:      None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::fixtures::student;
  use super::*;

  #[test]
  fn student_without_class_is_rejected() {
    let mut s = student("s1", "Karthik Raja", "10", "A");
    s.class = "  ".into();
    assert!(matches!(s.validate(), Err(Error::MissingField("class"))));
  }

  #[test]
  fn student_json_uses_camel_case() {
    let s = student("s1", "Karthik Raja", "10", "A");
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["emisNumber"], "3302010s1");
    assert_eq!(json["admissionDate"], "2020-06-01");
    assert!(json.get("imageUrl").is_none());
  }

  #[test]
  fn gender_parses_case_insensitively() {
    assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
  }
}
