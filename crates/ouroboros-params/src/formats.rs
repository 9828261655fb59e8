//! Format checks for string parameters
//!
//! Pre-compiled validators for the formats a field can opt into through its
//! `params` flags: UUID, slug, email and URL.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// Email regex pattern (RFC 5322 simplified)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// UUID regex pattern (any version, hyphenated)
static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Slug regex pattern: lowercase alphanumeric words joined by single hyphens
static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap()
});

// ============================================================================
// Format Validators
// ============================================================================

/// Validate UUID format
///
/// # Example
/// ```
/// use ouroboros_params::formats::is_uuid;
///
/// assert!(is_uuid("b3ca2cb7-422c-4467-a3ed-bce00a6a8216"));
/// assert!(!is_uuid("not-a-uuid"));
/// ```
pub fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

/// Validate slug format
///
/// # Example
/// ```
/// use ouroboros_params::formats::is_slug;
///
/// assert!(is_slug("this-is-a-val1d-slug"));
/// assert!(!is_slug("not a SLUG"));
/// ```
pub fn is_slug(value: &str) -> bool {
    SLUG_REGEX.is_match(value)
}

/// Validate that a value is either a slug or a UUID
pub fn is_slug_or_uuid(value: &str) -> bool {
    is_slug(value) || is_uuid(value)
}

/// Validate email format
///
/// # Example
/// ```
/// use ouroboros_params::formats::is_email;
///
/// assert!(is_email("hi@melvin.la"));
/// assert!(!is_email("hi.melvin.la"));
/// ```
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Validate URL format
///
/// Accepts absolute URLs with a host, whatever the scheme.
///
/// # Example
/// ```
/// use ouroboros_params::formats::is_url;
///
/// assert!(is_url("https://google.com"));
/// assert!(!is_url("not-a-url"));
/// ```
pub fn is_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}
