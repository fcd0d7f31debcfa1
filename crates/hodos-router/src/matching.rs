//! Matching results and the URL matcher boundary.
//!
//! Hodos does not compile or match patterns itself. A [`UrlMatcher`]
//! implementation looks at a request and reports a [`MatchingResult`]: the
//! matched route with its extracted [`Arguments`], or the methods the path
//! would accept.

use crate::route::Route;
use hodos_core::Request;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;

/// Number of arguments stored inline before spilling to the heap.
const INLINE_ARGUMENTS: usize = 4;

/// Arguments extracted from a matched path, in match order.
///
/// # Example
///
/// ```rust
/// use hodos_router::Arguments;
///
/// let mut arguments = Arguments::new();
/// arguments.push("id", "42");
///
/// assert_eq!(arguments.get("id"), Some("42"));
/// assert_eq!(arguments.get_or("page", "1"), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arguments {
    pairs: SmallVec<[(String, String); INLINE_ARGUMENTS]>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Value of the first argument called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `name`, or `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Outcome of matching a request against the route collection.
#[derive(Debug, Clone)]
pub enum MatchingResult {
    /// A route matched.
    Success {
        /// The matched route.
        route: Arc<Route>,
        /// Arguments extracted from the path.
        arguments: Arguments,
    },
    /// No route matched.
    ///
    /// A non-empty `allowed_methods` means the path matched but the method did not.
    Failure {
        /// Methods the path would accept.
        allowed_methods: Vec<Method>,
    },
}

impl MatchingResult {
    /// A successful match.
    pub fn from_success(route: Arc<Route>, arguments: Arguments) -> Self {
        Self::Success { route, arguments }
    }

    /// A failed match. Pass an empty list when the path itself did not match.
    pub fn from_failure(allowed_methods: Vec<Method>) -> Self {
        Self::Failure { allowed_methods }
    }

    /// Whether a route matched.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the path matched but the method did not.
    pub fn is_method_failure(&self) -> bool {
        matches!(self, Self::Failure { allowed_methods } if !allowed_methods.is_empty())
    }

    /// The matched route.
    pub fn route(&self) -> Option<&Arc<Route>> {
        match self {
            Self::Success { route, .. } => Some(route),
            Self::Failure { .. } => None,
        }
    }

    /// Extracted arguments, if a route matched.
    pub fn arguments(&self) -> Option<&Arguments> {
        match self {
            Self::Success { arguments, .. } => Some(arguments),
            Self::Failure { .. } => None,
        }
    }

    /// Methods the path would accept. Empty on success.
    pub fn allowed_methods(&self) -> &[Method] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { allowed_methods } => allowed_methods,
        }
    }
}

/// Maps a request to a [`MatchingResult`].
pub trait UrlMatcher: Send + Sync + 'static {
    /// Matches `request` against the known routes.
    fn match_request(&self, request: &Request) -> MatchingResult;
}

impl<F> UrlMatcher for F
where
    F: Fn(&Request) -> MatchingResult + Send + Sync + 'static,
{
    fn match_request(&self, request: &Request) -> MatchingResult {
        self(request)
    }
}
