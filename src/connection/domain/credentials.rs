//! Credentials negotiated during a single resolution attempt.

use secrecy::SecretString;
use std::fmt;

/// How a server accepted the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// The server requires no authentication.
    Anonymous,
    /// A token embedded in the address was accepted.
    Token,
    /// An interactively supplied password was accepted.
    Password,
}

impl AuthMethod {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Token => "token",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Token and password accepted by the server for one attempt.
///
/// Secrets are redacted from `Debug` output and are never persisted by this
/// crate.
#[derive(Debug, Default)]
pub struct Credentials {
    token: Option<SecretString>,
    password: Option<SecretString>,
}

impl Credentials {
    /// Returns empty credentials for servers without authentication.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns credentials carrying an accepted token.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: Some(token),
            password: None,
        }
    }

    /// Returns credentials carrying an accepted password.
    #[must_use]
    pub fn with_password(password: SecretString) -> Self {
        Self {
            token: None,
            password: Some(password),
        }
    }

    /// Returns the accepted token.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Returns the accepted password.
    #[must_use]
    pub const fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    /// Returns whether neither token nor password is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_none() && self.password.is_none()
    }

    /// Returns how the server accepted the attempt.
    #[must_use]
    pub const fn method(&self) -> AuthMethod {
        if self.password.is_some() {
            AuthMethod::Password
        } else if self.token.is_some() {
            AuthMethod::Token
        } else {
            AuthMethod::Anonymous
        }
    }
}
