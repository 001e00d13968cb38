//! Console-relative URLs
//!
//! Redirect targets and form actions are paths like `group/show` with a
//! query string. They stay relative, the web layer prefixes its base URL.

use std::fmt::{self, Display, Formatter};

use url::form_urlencoded;

/// A console path with query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    path: String,
    params: Vec<(String, String)>,
}

impl Url {
    /// URL without parameters
    #[inline]
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Parse `path?query`
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                params: form_urlencoded::parse(query.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            },
            None => Self::from_path(raw),
        }
    }

    /// With a query parameter
    #[inline]
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Path component
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value of a query parameter
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.params)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Undo the HTML escaping a hidden `redirect` field picks up
#[must_use]
pub fn decode_html_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_encoded_query() {
        let url = Url::from_path("group/show")
            .with_param("backend", "db main")
            .with_param("group", "a&b");
        assert_eq!(url.to_string(), "group/show?backend=db+main&group=a%26b");
    }

    #[test]
    fn parse_roundtrips_params() {
        let url = Url::parse("group/show?backend=db&group=admins");
        assert_eq!(url.path(), "group/show");
        assert_eq!(url.param("group"), Some("admins"));
        assert_eq!(Url::parse("group/list").to_string(), "group/list");
    }

    #[test]
    fn html_entities_decode_amp_last() {
        assert_eq!(
            decode_html_entities("group/show?backend=db&amp;group=admins"),
            "group/show?backend=db&group=admins"
        );
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }
}
