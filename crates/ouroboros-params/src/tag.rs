//! Field metadata
//!
//! Every bindable field carries a metadata string written in struct-tag
//! form: space separated `key:"value"` pairs, where the value is a quoted
//! string supporting backslash escapes.
//!
//! ```
//! use ouroboros_params::Tag;
//!
//! let tag = Tag::new(r#"from:"query" json:"per_page,omitempty" default:"20""#);
//! assert_eq!(tag.get("from"), Some("query".to_string()));
//! assert_eq!(tag.get("default"), Some("20".to_string()));
//! assert_eq!(tag.get("maxlen"), None);
//! ```

use std::fmt;

/// Metadata attached to one record field
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tag(&'static str);

impl Tag {
    /// Wrap a metadata string
    pub const fn new(raw: &'static str) -> Self {
        Self(raw)
    }

    /// Metadata with no keys
    pub const fn empty() -> Self {
        Self("")
    }

    /// The raw metadata text
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Look up the value of `key`.
    ///
    /// Returns `None` when the key is not declared. A declared key with an
    /// empty value returns `Some("")`. Scanning stops at the first
    /// malformed pair, so keys after it are treated as not declared.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut rest = self.0;

        while !rest.is_empty() {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            // Key runs until ':' and may not contain spaces, quotes or controls
            let key_end = rest
                .bytes()
                .position(|b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
                .unwrap_or(rest.len());
            if key_end == 0 || !rest[key_end..].starts_with(":\"") {
                break;
            }
            let name = &rest[..key_end];
            rest = &rest[key_end + 1..];

            // Quoted value, honoring escapes
            let bytes = rest.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let quoted = &rest[1..i];
            rest = &rest[i + 1..];

            if name == key {
                return unquote(quoted);
            }
        }

        None
    }

    /// Whether `key` is declared
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&'static str> for Tag {
    fn from(raw: &'static str) -> Self {
        Self::new(raw)
    }
}

/// Resolve escapes inside a quoted value. Unknown escapes make the value invalid.
fn unquote(quoted: &str) -> Option<String> {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }

    Some(out)
}
