//! Routing and router-construction errors.

use crate::model::uri::UriParseError;
use crate::routing::{Cardinality, RouteCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier could not be resolved to a registered route.
///
/// Always caller input; never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    InvalidUri(UriParseError),
    NoMatch(String),
    CardinalityMismatch {
        uri: String,
        expected: Cardinality,
    },
    UnknownRouteCode(RouteCode),
}

impl Display for RoutingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUri(err) => write!(f, "{err}"),
            Self::NoMatch(uri) => write!(f, "no route matches `{uri}`"),
            Self::CardinalityMismatch { uri, expected } => {
                write!(f, "`{uri}` does not address a {expected} resource")
            }
            Self::UnknownRouteCode(code) => write!(f, "route code {code} is not registered"),
        }
    }
}

impl Error for RoutingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUri(err) => Some(err),
            Self::NoMatch(_) | Self::CardinalityMismatch { .. } | Self::UnknownRouteCode(_) => {
                None
            }
        }
    }
}

impl From<UriParseError> for RoutingError {
    fn from(value: UriParseError) -> Self {
        Self::InvalidUri(value)
    }
}

/// Startup catalog could not be turned into a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterBuildError {
    InvalidAuthority(String),
    InvalidTableName(String),
    DuplicateTable(String),
    DuplicateEntity(String),
    /// Catalog entry index whose route codes do not fit in a `u32`.
    RouteCodeOverflow(usize),
}

impl Display for RouterBuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAuthority(value) => write!(f, "authority is invalid: `{value}`"),
            Self::InvalidTableName(value) => write!(f, "table name is invalid: `{value}`"),
            Self::DuplicateTable(value) => write!(f, "table already registered: `{value}`"),
            Self::DuplicateEntity(value) => write!(f, "entity already registered: `{value}`"),
            Self::RouteCodeOverflow(index) => {
                write!(f, "catalog entry {index} exceeds the route code range")
            }
        }
    }
}

impl Error for RouterBuildError {}
