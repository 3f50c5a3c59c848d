//! JSON API for Locus.
//!
//! Exposes an axum [`Router`] backed by a [`Tracker`] over any
//! [`TrackerStore`]. TLS and request tracing are the caller's
//! responsibility.
//!
//! | Method | Path | Body | Success |
//! |--------|------|------|---------|
//! | `POST` | `/devices` | `{"passkey"}` | `201 {"deviceID"}` |
//! | `POST` | `/locations` | `{"deviceID","passkey","longitude","latitude","timestamp"}` | `200 success` |
//! | `POST` | `/locations/query` | `{"deviceID","passkey"}` | `200 {"locations":[…]}` |
//!
//! Request bodies may be base64-encoded; see [`extract::JsonBody`].

pub mod devices;
pub mod error;
pub mod extract;
pub mod locations;

use axum::{Router, routing::post};
use locus_core::{service::Tracker, store::TrackerStore};

pub use error::ApiError;

/// Build the API router for `tracker`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(tracker: Tracker<S>) -> Router<()>
where
  S: TrackerStore + 'static,
{
  Router::new()
    .route("/devices", post(devices::register::<S>))
    .route("/locations", post(locations::submit::<S>))
    .route("/locations/query", post(locations::list::<S>))
    .with_state(tracker)
}

#[cfg(test)]
mod tests;
