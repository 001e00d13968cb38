//! Request parameters
//!
//! The HTTP layer hands every action a [`Request`]: the method plus the
//! decoded query/form parameters as strings.

use std::fmt::{self, Display, Formatter};

use url::form_urlencoded;

use crate::error::{ConsoleError, ConsoleResult};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Ordered, possibly repeated request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Create empty parameters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` string
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Append a parameter
    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((name.into(), value.into()));
        self
    }

    /// First value of a parameter
    ///
    /// Empty values count as absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// First value of a parameter as submitted, empty included
    #[must_use]
    pub fn get_submitted(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value of a parameter that must be present
    ///
    /// # Errors
    /// Returns `ConsoleError::MissingParameter` if absent or empty
    pub fn get_required(&self, name: &str) -> ConsoleResult<&str> {
        self.get(name).ok_or_else(|| ConsoleError::missing(name))
    }

    /// Every value of a multi-valued parameter
    ///
    /// Accepts both `name=a&name=b` and `name[]=a&name[]=b`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        let array_name = format!("{name}[]");
        self.pairs
            .iter()
            .filter(|(k, v)| (k == name || *k == array_name) && !v.is_empty())
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate all parameters in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a numeric parameter, falling back on absence or garbage
    #[must_use]
    pub fn get_usize(&self, name: &str, default: usize) -> usize {
        self.get(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// A request as seen by a controller action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub params: RequestParams,
}

impl Request {
    /// GET request from a query string
    #[inline]
    #[must_use]
    pub fn get(query: &str) -> Self {
        Self {
            method: Method::Get,
            params: RequestParams::from_query(query),
        }
    }

    /// POST request from an encoded form body
    #[inline]
    #[must_use]
    pub fn post(body: &str) -> Self {
        Self {
            method: Method::Post,
            params: RequestParams::from_query(body),
        }
    }

    /// Whether the request submits a form
    #[inline]
    #[must_use]
    pub fn is_post(&self) -> bool {
        self.method == Method::Post
    }

    /// Fail unless the request uses `expected`
    ///
    /// # Errors
    /// Returns `ConsoleError::MethodNotAllowed` on mismatch
    pub fn assert_method(&self, expected: Method) -> ConsoleResult<()> {
        if self.method == expected {
            Ok(())
        } else {
            Err(ConsoleError::MethodNotAllowed {
                expected,
                actual: self.method,
            })
        }
    }
}
