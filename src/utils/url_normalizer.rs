//! URL validation and normalization.
//!
//! Produces the canonical target stored for a link: scheme-qualified,
//! http/https only, non-empty host, and no trailing slash on a non-root path.

use url::{Position, Url};

/// Errors that can occur during URL normalization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,
}

/// Normalizes a URL to its canonical stored form.
///
/// # Normalization Rules
///
/// 1. **Scheme**: defaults to `http://` when none is given
/// 2. **Protocol**: only HTTP and HTTPS are accepted
/// 3. **Host**: required; lowercased by the parser
/// 4. **Path**: a single trailing slash is removed from non-root paths; an
///    explicit root `/` is kept, a parser-inserted one is not
/// 5. **Query and fragment**: preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError`] when the input is empty, unparsable,
/// uses a scheme other than http/https, or has no host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
/// assert_eq!(
///     normalize_url("https://example.com/docs/").unwrap(),
///     "https://example.com/docs"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let qualified = if has_scheme(input) {
        input.to_string()
    } else {
        format!("http://{}", input)
    };

    let mut url =
        Url::parse(&qualified).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    if url.path() == "/" && !has_explicit_path(&qualified) {
        return Ok(format!(
            "{}{}",
            &url[..Position::AfterPort],
            &url[Position::AfterPath..]
        ));
    }

    if url.path().len() > 1
        && let Some(trimmed) = url.path().strip_suffix('/').map(str::to_owned)
    {
        url.set_path(&trimmed);
    }

    Ok(url.to_string())
}

/// Returns `true` if the authority is followed by a `/` in the raw input.
///
/// The parser always reports at least `/` as the path, so this tells an
/// explicit root apart from one it inserted.
fn has_explicit_path(qualified: &str) -> bool {
    let rest = qualified
        .split_once("://")
        .map_or(qualified, |(_, rest)| rest);

    rest.find(['/', '?', '#'])
        .is_some_and(|i| rest.as_bytes()[i] == b'/')
}

/// Returns `true` if the input starts with an explicit `scheme://` prefix.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults_to_http() {
        assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
    }

    #[test]
    fn test_normalize_keeps_https() {
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_keeps_explicit_root_slash() {
        assert_eq!(
            normalize_url("https://example.com/").unwrap(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_url("example.com/").unwrap(),
            "http://example.com/"
        );
    }

    #[test]
    fn test_normalize_strips_single_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/docs/").unwrap(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_normalize_strips_only_one_slash() {
        assert_eq!(
            normalize_url("https://example.com/docs//").unwrap(),
            "https://example.com/docs/"
        );
    }

    #[test]
    fn test_normalize_preserves_query_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/search/?q=rust#top").unwrap(),
            "https://example.com/search?q=rust#top"
        );
        assert_eq!(
            normalize_url("https://example.com/?q=1").unwrap(),
            "https://example.com/?q=1"
        );
        assert_eq!(
            normalize_url("https://example.com?q=1").unwrap(),
            "https://example.com?q=1"
        );
    }

    #[test]
    fn test_normalize_lowercases_host() {
        assert_eq!(
            normalize_url("https://EXAMPLE.COM/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_normalize_keeps_custom_port() {
        assert_eq!(
            normalize_url("example.com:8080/path").unwrap(),
            "http://example.com:8080/path"
        );
    }

    #[test]
    fn test_normalize_rejects_ftp() {
        assert_eq!(
            normalize_url("ftp://example.com"),
            Err(UrlNormalizationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(normalize_url(""), Err(UrlNormalizationError::Empty));
        assert_eq!(normalize_url("   "), Err(UrlNormalizationError::Empty));
    }

    #[test]
    fn test_normalize_rejects_missing_host() {
        assert!(normalize_url("http://").is_err());
    }

    #[test]
    fn test_normalize_rejects_javascript() {
        assert!(normalize_url("javascript://alert(1)").is_err());
    }

    #[test]
    fn test_has_explicit_path() {
        assert!(has_explicit_path("https://example.com/"));
        assert!(has_explicit_path("http://example.com:8080/a?b"));
        assert!(!has_explicit_path("https://example.com"));
        assert!(!has_explicit_path("https://example.com?next=/x"));
        assert!(!has_explicit_path("https://example.com#/route"));
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://a.b"));
        assert!(has_scheme("svn+ssh://a.b"));
        assert!(!has_scheme("example.com"));
        assert!(!has_scheme("example.com/?next=http://x"));
    }
}
