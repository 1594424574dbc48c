//! Input validation utilities
//!
//! Validation rules for user-supplied identifiers and content. Username
//! rules are strict because usernames become public page URLs.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;
pub const MAX_BIO_LENGTH: usize = 280;
pub const MAX_LINK_TITLE_LENGTH: usize = 80;
pub const MAX_URL_LENGTH: usize = 2048;

/// Usernames that would shadow routes or invite impersonation
pub const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "api",
    "app",
    "help",
    "linkfolio",
    "root",
    "support",
    "www",
];

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]{3,30}$").expect("username regex is valid"));

/// Lowercase and trim a username before validation or lookup
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate an already-normalized username
pub fn validate_username(username: &str) -> Result<(), anyhow::Error> {
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(anyhow::anyhow!(
            "Username must be at least {} characters",
            MIN_USERNAME_LENGTH
        ));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(anyhow::anyhow!(
            "Username cannot exceed {} characters",
            MAX_USERNAME_LENGTH
        ));
    }

    if !USERNAME_RE.is_match(username) {
        return Err(anyhow::anyhow!(
            "Username can only contain lowercase letters, digits, and underscores"
        ));
    }

    if is_reserved_username(username) {
        return Err(anyhow::anyhow!("Username '{}' is reserved", username));
    }

    Ok(())
}

pub fn is_reserved_username(username: &str) -> bool {
    RESERVED_USERNAMES.contains(&username)
}

/// Custom validator for link URLs, used through the `Validate` derive
pub fn validate_link_url(url: &str) -> Result<(), ValidationError> {
    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::new("url_too_long"));
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::new("url_scheme"))?;
    if rest.is_empty() {
        return Err(ValidationError::new("url_missing_host"));
    }

    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::new("url_invalid_chars"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Alice_99 "), "alice_99");
        assert_eq!(normalize_username("BOB"), "bob");
    }

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("user_123").is_ok());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(30)).is_ok());
    }

    #[test]
    fn test_username_length_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_username_rejects_invalid_characters() {
        assert!(validate_username("Alice").is_err());
        assert!(validate_username("alice-99").is_err());
        assert!(validate_username("alice 99").is_err());
        assert!(validate_username("o\u{e1}lice").is_err());
    }

    #[test]
    fn test_username_rejects_reserved_names() {
        assert!(validate_username("admin").is_err());
        assert!(validate_username("api").is_err());
        assert!(is_reserved_username("www"));
        assert!(!is_reserved_username("alice"));
    }

    #[test]
    fn test_valid_link_urls() {
        assert!(validate_link_url("https://example.com").is_ok());
        assert!(validate_link_url("http://example.com/path?q=1").is_ok());
    }

    #[test]
    fn test_link_url_requires_http_scheme() {
        assert!(validate_link_url("ftp://example.com").is_err());
        assert!(validate_link_url("javascript:alert(1)").is_err());
        assert!(validate_link_url("example.com").is_err());
        assert!(validate_link_url("https://").is_err());
    }

    #[test]
    fn test_link_url_rejects_whitespace_and_length() {
        assert!(validate_link_url("https://exa mple.com").is_err());
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(validate_link_url(&long).is_err());
    }
}
