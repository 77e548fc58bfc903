//! Canonical base endpoint derivation.

use super::{NormalizedUri, Scheme};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Number of path segments a browsing suffix consumes after its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrailingSegments {
    /// The marker must end the path.
    None,
    /// The marker may be followed by any number of segments.
    AnyNumber,
    /// The marker must be followed by at least one segment.
    AtLeastOne,
}

impl TrailingSegments {
    const fn accepts(self, count: usize) -> bool {
        match self {
            Self::None => count == 0,
            Self::AnyNumber => true,
            Self::AtLeastOne => count >= 1,
        }
    }
}

/// A document-browsing path suffix that never belongs to the base endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrowsingSuffix {
    marker: &'static [&'static str],
    trailing: TrailingSegments,
}

impl BrowsingSuffix {
    /// Creates a suffix rule from its leading marker segments.
    #[must_use]
    pub const fn new(marker: &'static [&'static str], trailing: TrailingSegments) -> Self {
        Self { marker, trailing }
    }

    /// Returns the marker segments that start the suffix.
    #[must_use]
    pub const fn marker(&self) -> &'static [&'static str] {
        self.marker
    }

    /// Returns how many segments may follow the marker.
    #[must_use]
    pub const fn trailing(&self) -> TrailingSegments {
        self.trailing
    }

    /// Returns whether `tail` is exactly this suffix.
    #[must_use]
    pub fn matches(&self, tail: &[String]) -> bool {
        let Some(rest) = tail.get(self.marker.len()..) else {
            return false;
        };
        tail.iter()
            .zip(self.marker)
            .all(|(segment, marker)| segment == marker)
            && self.trailing.accepts(rest.len())
    }
}

/// Ordered table of known browsing suffixes; more specific markers first.
pub const KNOWN_BROWSING_SUFFIXES: &[BrowsingSuffix] = &[
    BrowsingSuffix::new(&["lab", "workspaces"], TrailingSegments::AnyNumber),
    BrowsingSuffix::new(&["lab", "tree"], TrailingSegments::AnyNumber),
    BrowsingSuffix::new(&["lab"], TrailingSegments::None),
    BrowsingSuffix::new(&["tree"], TrailingSegments::AnyNumber),
    BrowsingSuffix::new(&["notebooks"], TrailingSegments::AtLeastOne),
    BrowsingSuffix::new(&["edit"], TrailingSegments::AtLeastOne),
    BrowsingSuffix::new(&["doc", "tree"], TrailingSegments::AnyNumber),
];

/// Canonical root URL of a notebook server.
///
/// Always terminated by a single `/`, never carries a query, fragment or
/// userinfo, and never ends in a known browsing suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseEndpoint {
    url: Url,
    scheme: Scheme,
}

impl BaseEndpoint {
    /// Derives the base endpoint of a normalized address using
    /// [`KNOWN_BROWSING_SUFFIXES`].
    #[must_use]
    pub fn resolve(uri: &NormalizedUri) -> Self {
        Self::resolve_with(uri, KNOWN_BROWSING_SUFFIXES)
    }

    /// Derives the base endpoint using a caller-supplied suffix table.
    ///
    /// Suffixes are stripped repeatedly until none matches, which makes the
    /// derivation idempotent. A path that matches no suffix is kept as the
    /// base.
    #[must_use]
    pub fn resolve_with(uri: &NormalizedUri, suffixes: &[BrowsingSuffix]) -> Self {
        let base_segments = strip_browsing_suffixes(uri.path_segments(), suffixes);
        let mut url = uri.url().clone();
        url.set_query(None);
        url.set_fragment(None);
        url.set_path(&base_path(base_segments));
        Self {
            url,
            scheme: uri.scheme(),
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the transport scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns `host` or `host:port` when the port is not the scheme default.
    #[must_use]
    pub fn host_label(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        }
    }

    /// Resolves `relative` against the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when `relative` is not a valid reference.
    pub fn join(&self, relative: &str) -> Result<Url, url::ParseError> {
        self.url.join(relative)
    }
}

impl fmt::Display for BaseEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

fn strip_browsing_suffixes<'a>(
    segments: &'a [String],
    suffixes: &[BrowsingSuffix],
) -> &'a [String] {
    let mut remaining = segments;
    while let Some(stripped) = strip_once(remaining, suffixes) {
        remaining = stripped;
    }
    remaining
}

/// Strips the longest suffix (earliest start) matching the table.
fn strip_once<'a>(segments: &'a [String], suffixes: &[BrowsingSuffix]) -> Option<&'a [String]> {
    (0..segments.len()).find_map(|start| {
        let tail = segments.get(start..)?;
        let prefix = segments.get(..start)?;
        suffixes
            .iter()
            .any(|suffix| suffix.matches(tail))
            .then_some(prefix)
    })
}

fn base_path(segments: &[String]) -> String {
    if segments.is_empty() {
        return "/".to_owned();
    }
    format!("/{}/", segments.join("/"))
}
