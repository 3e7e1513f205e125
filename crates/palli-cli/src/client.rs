//! Async HTTP client wrapping the palli JSON API.

use anyhow::{Context, Result, anyhow};
use palli_core::{
  academic::{Exam, Mark},
  attendance::{AttendanceMark, BatchOutcome, SectionStatus},
  leave::{LeaveApplication, LeaveDecision},
  notify::CommunicationLog,
  people::Student,
  session::{Language, Role, Session, User},
  stats::DashboardSummary,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Connection settings for the palli server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Sent as `Accept-Language`; the server's session language when unset.
  pub language: Option<Language>,
}

/// A write result with the server's status message.
#[derive(Debug, Deserialize)]
pub struct Saved<T> {
  pub message: String,
  pub data:    T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Debug, Deserialize)]
struct LanguageBody {
  language: Language,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
  email: &'a str,
  role:  Role,
  #[serde(skip_serializing_if = "Option::is_none")]
  name:  Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DecisionBody {
  status: String,
}

/// Inbox filter for [`ApiClient::leave_inbox`].
#[derive(Debug, Clone, Default)]
pub struct InboxFilter {
  pub role:    Option<Role>,
  pub class:   Option<String>,
  pub section: Option<String>,
  pub status:  Option<String>,
}

/// Async HTTP client for the palli REST API.
///
/// Clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn root(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn api(&self, path: &str) -> String { self.root(&format!("/api{path}")) }

  fn lang(&self, req: RequestBuilder) -> RequestBuilder {
    match self.config.language {
      Some(language) => req.header(reqwest::header::ACCEPT_LANGUAGE, language.tag()),
      None => req,
    }
  }

  /// Send `req` and decode a JSON body, surfacing the server's `error`
  /// message on failure.
  async fn call<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> Result<T> {
    let resp = self.check(what, req).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))
  }

  async fn check(&self, what: &str, req: RequestBuilder) -> Result<Response> {
    let resp = self
      .lang(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let detail = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {detail}"))
  }

  // ── Overview ──────────────────────────────────────────────────────────────

  /// `GET /api/dashboard`
  pub async fn dashboard(&self) -> Result<DashboardSummary> {
    self
      .call("GET /dashboard", self.client.get(self.api("/dashboard")))
      .await
  }

  // ── Students ──────────────────────────────────────────────────────────────

  /// `GET /api/students?class=..&section=..&q=..`
  pub async fn list_students(
    &self,
    class: Option<&str>,
    section: Option<&str>,
    text: Option<&str>,
  ) -> Result<Vec<Student>> {
    let query: Vec<(&str, &str)> = [("class", class), ("section", section), ("q", text)]
      .into_iter()
      .filter_map(|(k, v)| v.map(|v| (k, v)))
      .collect();
    self
      .call(
        "GET /students",
        self.client.get(self.api("/students")).query(&query),
      )
      .await
  }

  // ── Exams ─────────────────────────────────────────────────────────────────

  /// `GET /api/exams/{id}`
  pub async fn get_exam(&self, id: &str) -> Result<Exam> {
    self
      .call("GET /exams/{id}", self.client.get(self.api(&format!("/exams/{id}"))))
      .await
  }

  /// `GET /api/marks?exam_id=..`
  pub async fn list_marks(&self, exam_id: &str) -> Result<Vec<Mark>> {
    self
      .call(
        "GET /marks",
        self.client.get(self.api("/marks")).query(&[("exam_id", exam_id)]),
      )
      .await
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  /// `GET /api/attendance/sections/{class}/{section}`
  pub async fn section_status(&self, class: &str, section: &str) -> Result<SectionStatus> {
    let path = format!("/attendance/sections/{class}/{section}");
    self
      .call("GET /attendance/sections", self.client.get(self.api(&path)))
      .await
  }

  /// `POST /api/attendance/batch`
  pub async fn mark_batch(&self, marks: &[AttendanceMark]) -> Result<Saved<BatchOutcome>> {
    self
      .call(
        "POST /attendance/batch",
        self.client.post(self.api("/attendance/batch")).json(marks),
      )
      .await
  }

  /// `GET /api/communication-logs`
  pub async fn communication_logs(&self) -> Result<Vec<CommunicationLog>> {
    self
      .call(
        "GET /communication-logs",
        self.client.get(self.api("/communication-logs")),
      )
      .await
  }

  // ── Leave ─────────────────────────────────────────────────────────────────

  /// `GET /api/leaves/inbox?role=..`
  pub async fn leave_inbox(&self, filter: &InboxFilter) -> Result<Vec<LeaveApplication>> {
    let role = filter.role.map(|r| r.to_string());
    let query: Vec<(&str, &str)> = [
      ("role", role.as_deref()),
      ("class", filter.class.as_deref()),
      ("section", filter.section.as_deref()),
      ("status", filter.status.as_deref()),
    ]
    .into_iter()
    .filter_map(|(k, v)| v.map(|v| (k, v)))
    .collect();
    self
      .call(
        "GET /leaves/inbox",
        self.client.get(self.api("/leaves/inbox")).query(&query),
      )
      .await
  }

  /// `PUT /api/leaves/{id}/status`
  pub async fn decide_leave(&self, id: &str, decision: LeaveDecision) -> Result<LeaveApplication> {
    let body = DecisionBody { status: decision.to_string() };
    self
      .call(
        "PUT /leaves/{id}/status",
        self
          .client
          .put(self.api(&format!("/leaves/{id}/status")))
          .json(&body),
      )
      .await
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `GET /session`
  pub async fn session(&self) -> Result<Session> {
    self
      .call("GET /session", self.client.get(self.root("/session")))
      .await
  }

  /// `POST /session/login`
  pub async fn login(&self, email: &str, role: Role, name: Option<&str>) -> Result<User> {
    let body = LoginBody { email, role, name };
    self
      .call(
        "POST /session/login",
        self.client.post(self.root("/session/login")).json(&body),
      )
      .await
  }

  /// `POST /session/logout`
  pub async fn logout(&self) -> Result<()> {
    self
      .check(
        "POST /session/logout",
        self.client.post(self.root("/session/logout")),
      )
      .await?;
    Ok(())
  }

  /// `POST /session/language`, returning the language now in effect.
  pub async fn toggle_language(&self) -> Result<Language> {
    let body: LanguageBody = self
      .call(
        "POST /session/language",
        self.client.post(self.root("/session/language")),
      )
      .await?;
    Ok(body.language)
  }
}
