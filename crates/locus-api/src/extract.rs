//! Request body extraction.

use axum::extract::{FromRequest, Request};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Header marking a base64-encoded request body, as forwarded by gateways
/// that re-encode binary payloads.
pub const BODY_ENCODING_HEADER: &str = "content-transfer-encoding";

/// JSON body extractor that decodes base64 bodies first when
/// [`BODY_ENCODING_HEADER`] is `base64`.
///
/// Unlike [`axum::Json`] this does not require a `Content-Type` header, and
/// every rejection becomes an [`ApiError::BadRequest`].
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let is_base64 = req
      .headers()
      .get(BODY_ENCODING_HEADER)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|v| v.trim().eq_ignore_ascii_case("base64"));

    let raw = Bytes::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let body = if is_base64 {
      let trimmed = raw.trim_ascii();
      Bytes::from(
        B64
          .decode(trimmed)
          .map_err(|_| ApiError::BadRequest("body is not valid base64".into()))?,
      )
    } else {
      raw
    };

    serde_json::from_slice(&body)
      .map(JsonBody)
      .map_err(|e| ApiError::BadRequest(format!("could not parse body: {e}")))
  }
}
