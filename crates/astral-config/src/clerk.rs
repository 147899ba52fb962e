//! Clerk authentication configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Clerk secret key, used to fetch the JWKS for session token validation.
    #[serde(default)]
    pub secret_key: String,

    /// Expected token issuer (the Clerk frontend API URL). Empty skips the check.
    #[serde(default)]
    pub issuer: String,
}

impl ClerkConfig {
    /// Check if the Clerk config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// Expected issuer, if one is configured.
    pub fn expected_issuer(&self) -> Option<&str> {
        if self.issuer.is_empty() {
            None
        } else {
            Some(&self.issuer)
        }
    }
}
