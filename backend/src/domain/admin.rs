//! Admin password used to gate the results report.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminPasswordError {
    #[error("admin password must not be empty")]
    Empty,
}

/// Configured admin password, held only as a SHA-256 digest.
///
/// # Examples
/// ```
/// use cogbattery::domain::AdminPassword;
///
/// let password = AdminPassword::new("letmein").expect("non-empty");
/// assert!(password.verify(Some("letmein")));
/// assert!(!password.verify(Some("guess")));
/// assert!(!password.verify(None));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AdminPassword {
    digest: [u8; 32],
}

impl AdminPassword {
    pub fn new(secret: impl Into<String>) -> Result<Self, AdminPasswordError> {
        let mut secret = secret.into();
        if secret.is_empty() {
            return Err(AdminPasswordError::Empty);
        }
        let digest = Sha256::digest(secret.as_bytes()).into();
        secret.zeroize();
        Ok(Self { digest })
    }

    /// Whether `candidate` matches. A missing candidate never matches.
    pub fn verify(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        candidate
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPassword(<redacted>)")
    }
}
