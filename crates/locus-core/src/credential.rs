//! Passkey sealing and verification.
//!
//! The registry never sees how a passkey is stored; it only keeps the string
//! returned by [`PasskeyScheme::seal`] and hands it back to
//! [`PasskeyScheme::verify`].

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Credential checked when the device is unknown, so that an unknown device
/// costs the same hash as a wrong passkey.
static DECOY: LazyLock<Option<String>> =
  LazyLock::new(|| PasskeyScheme::Argon2.seal("locus-decoy-credential").ok());

/// How passkeys are represented in the device registry.
///
/// The scheme must stay the same for the lifetime of a registry: a credential
/// sealed under one scheme never verifies under the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasskeyScheme {
  /// argon2id PHC string, e.g. `$argon2id$v=19$…`
  #[default]
  Argon2,
  /// The passkey verbatim; verified by byte-for-byte equality.
  Plaintext,
}

impl PasskeyScheme {
  /// Produce the stored form of `passkey`.
  pub fn seal(self, passkey: &str) -> Result<String> {
    match self {
      PasskeyScheme::Plaintext => Ok(passkey.to_owned()),
      PasskeyScheme::Argon2 => {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
          .hash_password(passkey.as_bytes(), &salt)
          .map(|hash| hash.to_string())
          .map_err(|e| Error::Credential(e.to_string()))
      }
    }
  }

  /// Check `claimed` against a stored credential.
  ///
  /// An unparseable stored credential is a mismatch, not an error.
  pub fn verify(self, stored: &str, claimed: &str) -> bool {
    match self {
      PasskeyScheme::Plaintext => stored.as_bytes() == claimed.as_bytes(),
      PasskeyScheme::Argon2 => PasswordHash::new(stored).is_ok_and(|hash| {
        Argon2::default()
          .verify_password(claimed.as_bytes(), &hash)
          .is_ok()
      }),
    }
  }

  /// Do the work of [`verify`](Self::verify) for a device that does not
  /// exist. Always rejects.
  pub fn verify_unknown(self, claimed: &str) -> bool {
    let decoy = match self {
      PasskeyScheme::Plaintext => Some(""),
      PasskeyScheme::Argon2 => DECOY.as_deref(),
    };
    if let Some(stored) = decoy {
      let _ = self.verify(stored, claimed);
    }
    false
  }
}
