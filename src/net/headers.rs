//! Case-insensitive header list

use serde::{Deserialize, Serialize};

/// Ordered header list with case-insensitive lookup
///
/// Names are stored lowercase, which is how they are compared when a
/// cached entry's `Vary` snapshot is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first value for a header
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.0
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replace all values of a header with a single value
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        self.0.retain(|(k, _)| *k != name);
        self.0.push((name, value.into()));
    }

    /// Add a value, keeping existing ones
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((name.to_ascii_lowercase(), value.into()));
    }

    /// Remove every value of a header
    pub fn remove(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        self.0.retain(|(k, _)| *k != name);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.append(k.as_ref(), v);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/css");
        assert_eq!(headers.get("content-type"), Some("text/css"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/css"));
    }

    #[test]
    fn insert_replaces_append_keeps() {
        let mut headers = Headers::new();
        headers.append("set-cookie", "a=1");
        headers.append("Set-Cookie", "b=2");
        assert_eq!(headers.len(), 2);

        headers.insert("set-cookie", "c=3");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("set-cookie"), Some("c=3"));
    }

    #[test]
    fn collects_from_pairs() {
        let headers: Headers = [("Vary", "Accept"), ("ETag", "\"x\"")].into_iter().collect();
        assert_eq!(headers.get("vary"), Some("Accept"));
        headers.iter().for_each(|(k, _)| assert_eq!(k, k.to_ascii_lowercase()));
    }
}
