//! Session identity and UI language.
//!
//! There is no credential check: whoever logs in with a role gets that role.
//! A real deployment would put an identity provider in front of this.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
  Admin,
  Teacher,
  Student,
}

impl Role {
  /// Display name used when a login does not supply one.
  pub fn default_name(self) -> &'static str {
    match self {
      Self::Admin => "Headmaster",
      Self::Teacher => "Mrs. Kavitha S",
      Self::Student => "Karthik Raja",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:     UserId,
  pub name:   String,
  pub email:  String,
  pub role:   Role,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Ta,
}

impl Language {
  pub fn toggled(self) -> Self {
    match self {
      Self::En => Self::Ta,
      Self::Ta => Self::En,
    }
  }

  /// Pick a language from an `Accept-Language` header value. Tamil wins only
  /// when it is the first listed tag.
  pub fn from_accept_language(header: &str) -> Self {
    let first = header
      .split(',')
      .next()
      .and_then(|tag| tag.split(';').next())
      .map(str::trim)
      .unwrap_or_default();
    if first.eq_ignore_ascii_case("ta") || first.to_ascii_lowercase().starts_with("ta-")
    {
      Self::Ta
    } else {
      Self::En
    }
  }

  pub fn tag(self) -> &'static str {
    match self {
      Self::En => "en",
      Self::Ta => "ta",
    }
  }
}

/// Email recorded on a session restored from a persisted role.
pub const RESTORED_EMAIL: &str = "restored@session.com";

/// The signed-in user and their language preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user:     Option<User>,
  pub language: Language,
}

impl Session {
  /// Accept any credentials and sign in with `role`.
  pub fn login(&mut self, email: &str, role: Role, name: Option<&str>) -> &User {
    let name = name
      .filter(|n| !n.trim().is_empty())
      .unwrap_or_else(|| role.default_name());
    self.user.insert(User {
      id: UserId::from("u1"),
      name: name.to_owned(),
      email: email.to_owned(),
      role,
      avatar: None,
    })
  }

  /// Re-establish a session from a persisted role.
  pub fn restore(&mut self, role: Role) -> &User {
    self.login(RESTORED_EMAIL, role, None)
  }

  pub fn logout(&mut self) -> Option<User> { self.user.take() }

  pub fn toggle_language(&mut self) -> Language {
    self.language = self.language.toggled();
    self.language
  }

  pub fn role(&self) -> Option<Role> { self.user.as_ref().map(|u| u.role) }
}
