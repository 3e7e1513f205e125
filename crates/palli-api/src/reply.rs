//! Response language negotiation and the acknowledgement envelope.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use palli_core::{i18n::Bilingual, session::Language};
use serde::Serialize;

/// The language status messages are rendered in, taken from the first tag
/// of `Accept-Language`. English when the header is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lang(pub Language);

impl<S: Send + Sync> FromRequestParts<S> for Lang {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let language = parts
      .headers
      .get(header::ACCEPT_LANGUAGE)
      .and_then(|v| v.to_str().ok())
      .map(Language::from_accept_language)
      .unwrap_or_default();
    Ok(Self(language))
  }
}

/// A write result paired with a status message for the user.
#[derive(Debug, Serialize)]
pub struct Saved<T> {
  pub message: String,
  pub data:    T,
}

impl<T> Saved<T> {
  pub fn new(Lang(language): Lang, message: Bilingual, data: T) -> Self {
    Self { message: message.get(language).to_owned(), data }
  }
}
