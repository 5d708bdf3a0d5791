use std::{collections::HashMap, time::Duration};

/// Additional HTTP headers applied to a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(inner: HashMap<String, String>) -> Self {
        Self { inner }
    }
}

/// Network configuration.
#[derive(Clone, Debug)]
pub struct NetOptions {
    /// Timeout for whole-body requests. Streams are not bounded by this.
    pub request_timeout: Duration,
    /// Connection pool size per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_insert_get_roundtrip() {
        let mut headers = Headers::new();
        assert!(headers.is_empty());
        headers.insert("User-Agent", "tanbur/0.1");
        assert_eq!(headers.get("User-Agent"), Some("tanbur/0.1"));
        assert_eq!(headers.get("Authorization"), None);
    }

    #[test]
    fn headers_from_map() {
        let mut map = HashMap::new();
        map.insert("X-Test".to_string(), "1".to_string());
        let headers = Headers::from(map);
        assert_eq!(headers.iter().count(), 1);
    }
}
