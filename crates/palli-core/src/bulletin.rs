//! Notices and the document repository.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  ids::{DocumentId, NoticeId},
};

/// Default largest file accepted into the document repository.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─── Notices ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
  #[default]
  Info,
  Warning,
  Success,
  Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
  pub id:        NoticeId,
  pub title:     String,
  pub message:   String,
  pub date:      NaiveDate,
  #[serde(rename = "type")]
  pub kind:      NoticeKind,
  pub posted_by: String,
}

impl Notice {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::MissingField("title"));
    }
    if self.message.trim().is_empty() {
      return Err(Error::MissingField("message"));
    }
    Ok(())
  }
}

/// A notice as posted from the notice board form. The date is always the
/// posting day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotice {
  pub title:     String,
  pub message:   String,
  #[serde(default, rename = "type")]
  pub kind:      NoticeKind,
  #[serde(default)]
  pub posted_by: Option<String>,
}

impl NewNotice {
  /// `poster` is used when the form does not name one.
  pub fn into_notice(self, today: NaiveDate, poster: &str) -> Notice {
    Notice {
      id:        NoticeId::generate(),
      title:     self.title,
      message:   self.message,
      date:      today,
      kind:      self.kind,
      posted_by: self
        .posted_by
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| poster.to_owned()),
    }
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCategory {
  Circular,
  Material,
  Form,
  Certificate,
}

impl DocumentCategory {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Circular => "Circular",
      Self::Material => "Material",
      Self::Form => "Form",
      Self::Certificate => "Certificate",
    }
  }
}

/// A catalogue entry in the document repository. The file body itself is
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
  #[serde(default = "DocumentId::generate")]
  pub id:           DocumentId,
  pub title:        String,
  pub category:     DocumentCategory,
  pub uploaded_by:  String,
  pub date:         NaiveDate,
  /// Human-readable size, e.g. `"1.20 MB"`.
  pub size:         String,
  /// File extension, e.g. `"pdf"`.
  #[serde(rename = "type")]
  pub file_type:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url:          Option<String>,
  /// SHA-256 hex digest of the uploaded bytes, when the entry came from an
  /// upload.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content_hash: Option<String>,
}

impl DocumentItem {
  /// Catalogue a freshly uploaded file of `byte_len` bytes, rejecting it
  /// when it exceeds `limit`. Uploads land in the `Material` category under
  /// their file name.
  pub fn from_upload(
    file_name: &str,
    byte_len: usize,
    limit: usize,
    uploaded_by: &str,
    date: NaiveDate,
    content_hash: Option<String>,
  ) -> Result<Self> {
    if file_name.trim().is_empty() {
      return Err(Error::MissingField("fileName"));
    }
    if byte_len > limit {
      return Err(Error::UploadTooLarge { size: byte_len, limit });
    }
    Ok(Self {
      id: DocumentId::generate(),
      title: file_name.to_owned(),
      category: DocumentCategory::Material,
      uploaded_by: uploaded_by.to_owned(),
      date,
      size: format_size(byte_len),
      file_type: file_extension(file_name).to_owned(),
      url: None,
      content_hash,
    })
  }

  /// Case-insensitive match over title and category.
  pub fn matches(&self, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    self.title.to_lowercase().contains(&needle)
      || self.category.as_str().to_lowercase().contains(&needle)
  }
}

/// Render a byte count in mebibytes with two decimals.
pub fn format_size(bytes: usize) -> String {
  format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Text after the last dot, or `"file"` when the name has none.
fn file_extension(name: &str) -> &str {
  match name.rsplit_once('.') {
    Some((_, ext)) if !ext.is_empty() => ext,
    _ => "file",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2023, 10, 25).unwrap() }

  #[test]
  fn upload_is_catalogued_as_material() {
    let doc = DocumentItem::from_upload(
      "question-bank.pdf",
      1_258_291,
      MAX_UPLOAD_BYTES,
      "Mrs. Kavitha S",
      day(),
      None,
    )
    .unwrap();
    assert_eq!(doc.category, DocumentCategory::Material);
    assert_eq!(doc.size, "1.20 MB");
    assert_eq!(doc.file_type, "pdf");
    assert_eq!(doc.title, "question-bank.pdf");
  }

  #[test]
  fn name_without_extension_gets_generic_type() {
    let doc = DocumentItem::from_upload("README", 10, MAX_UPLOAD_BYTES, "Admin", day(), None)
      .unwrap();
    assert_eq!(doc.file_type, "file");
    assert_eq!(doc.size, "0.00 MB");
  }

  #[test]
  fn oversized_upload_is_rejected() {
    let err = DocumentItem::from_upload(
      "video.mp4",
      MAX_UPLOAD_BYTES + 1,
      MAX_UPLOAD_BYTES,
      "Admin",
      day(),
      None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UploadTooLarge { .. }));
  }

  #[test]
  fn raised_limit_admits_larger_files() {
    let limit = 20 * 1024 * 1024;
    let doc = DocumentItem::from_upload(
      "assembly.mp4",
      MAX_UPLOAD_BYTES + 1,
      limit,
      "Admin",
      day(),
      None,
    )
    .unwrap();
    assert_eq!(doc.size, "10.00 MB");
    assert!(matches!(
      DocumentItem::from_upload("big.mp4", limit + 1, limit, "Admin", day(), None),
      Err(Error::UploadTooLarge { limit: l, .. }) if l == limit
    ));
  }

  #[test]
  fn posted_notice_defaults() {
    let form: NewNotice =
      serde_json::from_str(r#"{"title":"Sports Day","message":"Friday"}"#).unwrap();
    let notice = form.into_notice(day(), "Headmaster");
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.posted_by, "Headmaster");
    assert_eq!(notice.date, day());
    assert!(notice.validate().is_ok());
  }

  #[test]
  fn catalogue_entry_without_id_gets_one() {
    let doc: DocumentItem = serde_json::from_str(
      r#"{"title":"Fee Circular","category":"Circular","uploadedBy":"Admin",
          "date":"2023-10-25","size":"250 KB","type":"pdf"}"#,
    )
    .unwrap();
    assert!(!doc.id.as_str().is_empty());
    assert!(doc.content_hash.is_none());
  }

  #[test]
  fn search_covers_title_and_category() {
    let doc = DocumentItem::from_upload(
      "Scholarship.docx",
      1,
      MAX_UPLOAD_BYTES,
      "Admin",
      day(),
      None,
    )
    .unwrap();
    assert!(doc.matches("scholar"));
    assert!(doc.matches("MATERIAL"));
    assert!(!doc.matches("circular"));
  }
}
