//! Raw input multimaps
//!
//! A [`Values`] holds the raw strings of one input source, such as a query
//! string or a form body. Keys may carry several values and a key may be
//! present with no value at all. A [`SourceMap`] groups them by source name.

use std::borrow::Cow;
use std::collections::{btree_map, BTreeMap, HashMap};

/// Source name → raw values of that source
pub type SourceMap = HashMap<String, Values>;

/// String multimap with sorted keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    inner: BTreeMap<String, Vec<String>>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value of `key`, or an empty string
    pub fn get(&self, key: &str) -> &str {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// All values of `key`; `None` when the key is not present
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Whether `key` is present, even with no value
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Replace the values of `key` with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Append a value to `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replace the values of `key`; an empty list keeps the key present
    pub fn set_all<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Remove `key`, returning its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over keys and their values, sorted by key
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    /// Parse an `application/x-www-form-urlencoded` string.
    ///
    /// `+` decodes to a space. Components that are not valid percent-encoding
    /// are kept as written.
    ///
    /// # Example
    ///
    /// ```
    /// use ouroboros_params::Values;
    ///
    /// let values = Values::parse_urlencoded("tag=a&tag=b&q=hello+world&empty=");
    /// assert_eq!(values.get_all("tag").unwrap(), ["a", "b"]);
    /// assert_eq!(values.get("q"), "hello world");
    /// assert!(values.contains("empty"));
    /// ```
    pub fn parse_urlencoded(input: &str) -> Self {
        let mut values = Values::new();
        for pair in input.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            values.add(decode_component(key), decode_component(value));
        }
        values
    }

    /// Encode as `application/x-www-form-urlencoded`, keys sorted.
    ///
    /// A key present with no value has no urlencoded form and is left out:
    /// `key=` would read back as one empty value.
    pub fn encode(&self) -> String {
        let mut pairs = Vec::new();
        for (key, values) in &self.inner {
            let key = urlencoding::encode(key);
            for value in values {
                pairs.push(format!("{}={}", key, urlencoding::encode(value)));
            }
        }
        pairs.join("&")
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Values::new();
        for (key, value) in iter {
            values.add(key, value);
        }
        values
    }
}

/// Decode one urlencoded component, falling back to the raw text
fn decode_component(s: &str) -> String {
    if !s.contains('+') && !s.contains('%') {
        return s.to_string();
    }

    let with_spaces: Cow<'_, str> = if s.contains('+') {
        Cow::Owned(s.replace('+', " "))
    } else {
        Cow::Borrowed(s)
    };

    match urlencoding::decode(&with_spaces) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => with_spaces.into_owned(),
    }
}
