//! English/Tamil status text.

use serde::Serialize;

use crate::session::Language;

/// The same message in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bilingual {
  pub en: String,
  pub ta: String,
}

impl Bilingual {
  fn new(en: impl Into<String>, ta: impl Into<String>) -> Self {
    Self { en: en.into(), ta: ta.into() }
  }

  pub fn get(&self, language: Language) -> &str {
    match language {
      Language::En => &self.en,
      Language::Ta => &self.ta,
    }
  }
}

pub fn attendance_saved(alerts_sent: usize) -> Bilingual {
  let mut msg = Bilingual::new("Attendance saved", "வருகை பதிவு சேமிக்கப்பட்டது");
  if alerts_sent > 0 {
    msg.en.push_str(&format!(" & {alerts_sent} Auto-Alerts sent!"));
    msg
      .ta
      .push_str(&format!(" & {alerts_sent} தானியங்கி எச்சரிக்கைகள் அனுப்பப்பட்டன!"));
  }
  msg
}

pub fn marks_saved() -> Bilingual {
  Bilingual::new("Marks Saved Successfully", "மதிப்பெண்கள் சேமிக்கப்பட்டன")
}

pub fn timetable_saved() -> Bilingual {
  Bilingual::new("Time Table Saved Successfully", "கால அட்டவணை சேமிக்கப்பட்டது")
}

pub fn leave_submitted() -> Bilingual {
  Bilingual::new("Application Submitted", "விண்ணப்பம் அனுப்பப்பட்டது")
}

pub fn student_added(name: &str) -> Bilingual {
  Bilingual::new(
    format!("Student {name} added successfully."),
    format!("மாணவர் {name} சேர்க்கப்பட்டார்."),
  )
}

pub fn student_updated(name: &str) -> Bilingual {
  Bilingual::new(
    format!("Student {name} updated successfully."),
    format!("மாணவர் {name} விவரங்கள் புதுப்பிக்கப்பட்டது."),
  )
}

pub fn staff_added(name: &str) -> Bilingual {
  Bilingual::new(
    format!("Staff member {name} added successfully."),
    format!("ஆசிரியர் {name} சேர்க்கப்பட்டார்."),
  )
}
