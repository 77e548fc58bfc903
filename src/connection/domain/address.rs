//! Raw address intake and URI normalization.

use super::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Query parameter carrying a server-issued access token.
const TOKEN_QUERY_PARAMETER: &str = "token";

/// Scheme assumed when the user omits one.
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Notebook server address exactly as typed or pasted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAddress(String);

impl RawAddress {
    /// Wraps a user-supplied address without validating it.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the address as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the address into a [`NormalizedUri`].
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] when the address is empty, unparseable, uses
    /// a scheme other than `http`/`https`, or has no host.
    pub fn normalize(&self) -> Result<NormalizedUri, AddressError> {
        NormalizedUri::parse(self)
    }
}

impl From<&str> for RawAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RawAddress {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Transport scheme of a notebook server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// Returns the canonical scheme name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Returns whether the scheme runs over TLS.
    #[must_use]
    pub const fn is_secure(self) -> bool {
        matches!(self, Self::Https)
    }

    /// Returns the port used when the address names none.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Scheme {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(AddressError::UnsupportedScheme(value.to_owned())),
        }
    }
}

/// Parsed form of a [`RawAddress`].
///
/// Userinfo and fragments are discarded during parsing; empty path segments
/// are dropped so `/lab/` and `/lab` normalize identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUri {
    url: Url,
    scheme: Scheme,
    port: u16,
    path_segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl NormalizedUri {
    /// Parses a raw address, defaulting the scheme to `http`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] when the address cannot be normalized.
    pub fn parse(raw: &RawAddress) -> Result<Self, AddressError> {
        let trimmed = raw.as_str().trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let candidate = if has_explicit_scheme(trimmed) {
            trimmed.to_owned()
        } else {
            format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
        };

        let mut url =
            Url::parse(&candidate).map_err(|err| AddressError::Unparseable(err.to_string()))?;
        let scheme = Scheme::try_from(url.scheme())?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(AddressError::MissingHost);
        }

        url.set_username("").map_err(|()| AddressError::MissingHost)?;
        url.set_password(None).map_err(|()| AddressError::MissingHost)?;
        url.set_fragment(None);

        let port = url.port().unwrap_or_else(|| scheme.default_port());
        let path_segments = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            url,
            scheme,
            port,
            path_segments,
            query,
        })
    }

    /// Returns the transport scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the host, lowercased by URL parsing.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Returns the explicit port or the scheme default.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the non-empty path segments in their encoded form.
    #[must_use]
    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    /// Returns decoded query parameters in address order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the embedded `token` query parameter, if any.
    ///
    /// An address ending in `?token=` yields `Some("")`.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == TOKEN_QUERY_PARAMETER)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the underlying parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

/// Returns whether `value` starts with `<scheme>://`.
fn has_explicit_scheme(value: &str) -> bool {
    value.split_once("://").is_some_and(|(prefix, _)| {
        let mut characters = prefix.chars();
        characters
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
            && characters.all(|character| {
                character.is_ascii_alphanumeric() || matches!(character, '+' | '-' | '.')
            })
    })
}
