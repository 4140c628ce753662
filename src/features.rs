//! URL Features - ML input derived from a submitted URL
//!
//! The layout below is the contract with the trained model: the order of
//! `FEATURE_LAYOUT` is the column order of every row passed to a classifier.

use url::Url;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Feature names in the exact order they appear in a row
pub const FEATURE_LAYOUT: &[&str] = &[
    "url_length", // 0: character count of the raw URL
    "is_https",   // 1: 1 when the parsed scheme is https, else 0
];

/// Number of features per row
pub const FEATURE_COUNT: usize = 2;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Features extracted from a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    pub url_length: usize,
    pub is_https: u8,
}

impl FeatureVector {
    /// Extract features from a raw URL string.
    ///
    /// Never fails. When the full parse rejects the input (bad host, bad
    /// port, stray characters) the scheme is still read from the prefix, so
    /// only genuinely schemeless input is treated as not https.
    pub fn extract(raw: &str) -> Self {
        let is_https = match Url::parse(raw) {
            Ok(parsed) => parsed.scheme() == "https",
            Err(e) => {
                tracing::trace!("URL parse failed for {:?}: {}", raw, e);
                scheme_prefix(raw).is_some_and(|scheme| scheme.eq_ignore_ascii_case("https"))
            }
        };

        Self {
            url_length: raw.chars().count(),
            is_https: u8::from(is_https),
        }
    }

    /// Values in `FEATURE_LAYOUT` order
    pub fn as_row(&self) -> [f32; FEATURE_COUNT] {
        [self.url_length as f32, f32::from(self.is_https)]
    }
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) before the first ':'
fn scheme_prefix(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_start_matches(|c: char| c <= ' ');
    let (scheme, _) = trimmed.split_once(':')?;

    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_url() {
        let f = FeatureVector::extract("https://example.com");
        assert_eq!(f.url_length, 19);
        assert_eq!(f.is_https, 1);
        assert_eq!(f.as_row(), [19.0, 1.0]);
    }

    #[test]
    fn test_http_url_with_path() {
        let f = FeatureVector::extract("http://bad-site.test/login");
        assert_eq!(f.as_row(), [26.0, 0.0]);
    }

    #[test]
    fn test_length_counts_query_and_fragment() {
        let url = "https://a.io/p?q=1&r=2#frag";
        let f = FeatureVector::extract(url);
        assert_eq!(f.url_length, url.len());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let url = "https://bücher.de/straße";
        let f = FeatureVector::extract(url);
        assert_eq!(f.url_length, 24);
        assert!(url.len() > f.url_length);
        assert_eq!(f.is_https, 1);
    }

    #[test]
    fn test_schemeless_and_malformed_are_not_https() {
        for raw in ["example.com", "www.example.com/https", "://https", "https//missing-colon", "not a url"] {
            let f = FeatureVector::extract(raw);
            assert_eq!(f.is_https, 0, "{raw} should not count as https");
            assert_eq!(f.url_length, raw.chars().count());
        }
    }

    #[test]
    fn test_scheme_is_lowercased_by_parser() {
        assert_eq!(FeatureVector::extract("HTTPS://EXAMPLE.COM").is_https, 1);
        assert_eq!(FeatureVector::extract("HtTp://example.com").is_https, 0);
    }

    #[test]
    fn test_other_schemes() {
        assert_eq!(FeatureVector::extract("ftp://files.example.com").is_https, 0);
        assert_eq!(FeatureVector::extract("https-proxy://x").is_https, 0);
    }

    #[test]
    fn test_https_with_unparseable_authority() {
        for raw in [
            "https://",
            "https://example.com:99999",
            "https://exa mple.com",
            "https://ex<ample.com",
            "HTTPS://[::1",
        ] {
            let f = FeatureVector::extract(raw);
            assert_eq!(f.is_https, 1, "{raw} has an https scheme");
            assert_eq!(f.url_length, raw.chars().count());
        }

        assert_eq!(FeatureVector::extract("http://example.com:99999").is_https, 0);
    }

    #[test]
    fn test_scheme_prefix() {
        assert_eq!(scheme_prefix("https://x"), Some("https"));
        assert_eq!(scheme_prefix("  svn+ssh://x"), Some("svn+ssh"));
        assert_eq!(scheme_prefix("://https"), None);
        assert_eq!(scheme_prefix("1https://x"), None);
        assert_eq!(scheme_prefix("ht tps://x"), None);
        assert_eq!(scheme_prefix("https//missing-colon"), None);
    }

    #[test]
    fn test_reference_lengths() {
        let http_20 = "http://abcdefghi.com";
        assert_eq!(http_20.len(), 20);
        assert_eq!(FeatureVector::extract(http_20).as_row(), [20.0, 0.0]);

        let https_25 = "https://abcdefghijklm.com";
        assert_eq!(https_25.len(), 25);
        assert_eq!(FeatureVector::extract(https_25).as_row(), [25.0, 1.0]);
    }
}
