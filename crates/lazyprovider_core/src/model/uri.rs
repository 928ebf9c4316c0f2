//! Resource identifiers (`content://<authority>/<table>[/<id>]`).
//!
//! # Responsibility
//! - Parse absolute resource identifiers through `url::Url` and format them.
//! - Expose percent-decoded path segments and the trailing numeric id.
//!
//! # Invariants
//! - Empty path segments are dropped; query and fragment parts are ignored.
//! - Stored segments are decoded; `Display` re-encodes them, so formatting a
//!   parsed identifier yields its normalized form.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use url::Url;

/// Scheme used for every identifier served by a provider.
pub const CONTENT_SCHEME: &str = "content";

/// Identifier parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParseError {
    pub input: String,
    pub reason: String,
}

impl UriParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl Display for UriParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid resource uri `{}`: {}", self.input, self.reason)
    }
}

impl Error for UriParseError {}

/// Parsed absolute resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

impl ResourceUri {
    /// Builds a `content://` identifier from an authority and path segments.
    pub fn content<I, S>(authority: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: CONTENT_SCHEME.to_string(),
            authority: authority.into(),
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        }
    }

    /// Parses `scheme://authority/path`.
    ///
    /// # Errors
    /// - Returns an error for anything `url::Url` rejects (bad host
    ///   characters, out-of-range ports, missing scheme).
    /// - Returns an error when the authority is missing, carries user info, or
    ///   a path segment is not valid UTF-8 once decoded.
    pub fn parse(input: &str) -> Result<Self, UriParseError> {
        let url = Url::parse(input.trim())
            .map_err(|err| UriParseError::new(input, err.to_string()))?;
        Self::from_url(&url).map_err(|reason| UriParseError::new(input, reason))
    }

    fn from_url(url: &Url) -> Result<Self, &'static str> {
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or("missing authority")?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err("user info is not allowed");
        }
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let segments = url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|decoded| decoded.into_owned())
                    .map_err(|_| "path segment is not valid UTF-8")
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority,
            segments,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Decoded path segments.
    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Parses the last path segment as a numeric id.
    ///
    /// Returns `None` when there is no segment or it is not a non-negative
    /// integer.
    pub fn parse_id(&self) -> Option<i64> {
        let last = self.last_segment()?;
        if !last.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        last.parse().ok()
    }

    /// Returns a copy with `id` appended as a new path segment.
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut next = self.clone();
        next.segments.push(id.to_string());
        next
    }

    /// Whether `other` lies strictly below this identifier.
    ///
    /// Comparison is segment-wise; scheme and authority must match exactly.
    pub fn is_ancestor_of(&self, other: &ResourceUri) -> bool {
        self.scheme == other.scheme
            && self.authority == other.authority
            && self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl Display for ResourceUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{}", urlencoding::encode(segment))?;
        }
        Ok(())
    }
}

impl FromStr for ResourceUri {
    type Err = UriParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
