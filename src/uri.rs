//! Parsing and formatting for the registry's opaque `protocol:path[?query]`
//! URIs.

use std::fmt;

/// A parsed `protocol:path[?query]` URI.
///
/// `Uri::to_string` round-trips the original string exactly (spec §8,
/// invariant 5).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    protocol: String,
    path_elements: Vec<String>,
    query: Option<String>,
}

impl Uri {
    /// Parses `protocol:path[?query]`. Splits on the first `:`, then the
    /// first `?` in the remainder.
    pub fn parse(s: &str) -> Option<Uri> {
        let (protocol, rest) = s.split_once(':')?;
        let (path, query) = match rest.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (rest, None),
        };
        Some(Uri {
            protocol: protocol.to_string(),
            path_elements: path.split('/').map(str::to_string).collect(),
            query,
        })
    }

    /// The scheme, e.g. `"asset"` or `"assetver"`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The slash-separated path elements.
    pub fn path_elements(&self) -> &[String] {
        &self.path_elements
    }

    /// The path elements rejoined with `/`.
    pub fn path(&self) -> String {
        self.path_elements.join("/")
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol, self.path_elements.join("/"))?;
        if let Some(q) = &self.query {
            write!(f, "?{q}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_protocol_path_and_query() {
        let uri = Uri::parse("assetver:Foo/2?cache_path").unwrap();
        assert_eq!(uri.protocol(), "assetver");
        assert_eq!(uri.path(), "Foo/2");
        assert_eq!(uri.path_elements(), &["Foo".to_string(), "2".to_string()]);
        assert_eq!(uri.query(), Some("cache_path"));
    }

    #[test]
    fn parses_without_query() {
        let uri = Uri::parse("asset:Foo").unwrap();
        assert_eq!(uri.protocol(), "asset");
        assert_eq!(uri.path(), "Foo");
        assert_eq!(uri.query(), None);
    }

    #[test]
    fn round_trips_bytewise() {
        for s in ["asset:Foo", "assetver:Foo/2?name", "x:a/b/c?q=1&y=2"] {
            let uri = Uri::parse(s).unwrap();
            assert_eq!(uri.to_string(), s);
        }
    }

    #[test]
    fn rejects_strings_without_a_protocol_separator() {
        assert!(Uri::parse("no-colon-here").is_none());
    }
}
