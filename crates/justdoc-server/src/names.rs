//! Channel and document name validation.
//!
//! Valid names:
//! - Are 1 to 128 bytes long
//! - Contain only ASCII letters, digits, `-` and `_`
//!
//! The store itself accepts any string; these rules belong to the HTTP API so
//! that every name is safe to embed in a URL path segment unescaped.

use crate::error::{ServerError, ServerResult};

/// Maximum length of a channel or document name.
pub const MAX_NAME_LEN: usize = 128;

/// Returns `true` if `name` is a valid channel or document name.
///
/// # Examples
///
/// ```
/// use justdoc_server::names::is_valid_name;
///
/// assert!(is_valid_name("app-config"));
/// assert!(is_valid_name("user_data_2"));
/// assert!(!is_valid_name(""));
/// assert!(!is_valid_name("has space"));
/// assert!(!is_valid_name("dot.json"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Validate a channel name.
pub fn validate_channel(channel: &str) -> ServerResult<()> {
    if is_valid_name(channel) {
        Ok(())
    } else {
        Err(ServerError::InvalidName)
    }
}

/// Validate both halves of a document address.
pub fn validate_pair(channel: &str, document: &str) -> ServerResult<()> {
    validate_channel(channel)?;
    if is_valid_name(document) {
        Ok(())
    } else {
        Err(ServerError::InvalidName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_alphabet() {
        assert!(is_valid_name("abc"));
        assert!(is_valid_name("ABC-123_xyz"));
        assert!(is_valid_name("-"));
        assert!(is_valid_name("_"));
    }

    #[test]
    fn length_limits() {
        assert!(!is_valid_name(""));
        assert!(is_valid_name(&"a".repeat(MAX_NAME_LEN)));
        assert!(!is_valid_name(&"a".repeat(MAX_NAME_LEN + 1)));
    }

    #[test]
    fn rejects_other_characters() {
        for name in ["a b", "a/b", "a.b", "a@b", "ümlaut", "tab\t", "../etc"] {
            assert!(!is_valid_name(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn pair_validation() {
        assert!(validate_pair("ch", "doc").is_ok());
        assert!(matches!(validate_pair("bad name", "doc"), Err(ServerError::InvalidName)));
        assert!(matches!(validate_pair("ch", "bad.name"), Err(ServerError::InvalidName)));
    }
}
