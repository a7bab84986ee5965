//! Endpoint resolution.

use quarry_core::{CacheKey, Error, Result};
use url::Url;

/// Transport scheme for the cache service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Parsed form of the configured endpoint URL.
///
/// Resolved once at store construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

impl ResolvedEndpoint {
    /// Parse a configured endpoint URL.
    ///
    /// Scheme validation is strict: only `http` and `https` select a
    /// transport, anything else fails construction.
    pub fn parse(endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(Error::InvalidEndpoint(format!(
                    "unsupported scheme '{}' in {}",
                    other, endpoint
                )));
            }
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::InvalidEndpoint(format!("missing host in {}", endpoint)))?
            .to_string();

        let port = url.port().unwrap_or_else(|| scheme.default_port());
        let base_path = url.path().trim_end_matches('/').to_string();

        Ok(ResolvedEndpoint {
            scheme,
            host,
            port,
            base_path,
        })
    }

    /// Request URL for a key: `{base}/{hex(key)}`.
    pub fn url_for(&self, key: &CacheKey) -> String {
        format!(
            "{}://{}:{}{}/{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.base_path,
            key.to_hex()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_endpoint() {
        let ep = ResolvedEndpoint::parse("http://cache.internal:9280/v1/artifacts").unwrap();
        assert_eq!(ep.scheme, Scheme::Http);
        assert_eq!(ep.host, "cache.internal");
        assert_eq!(ep.port, 9280);
        assert_eq!(ep.base_path, "/v1/artifacts");
    }

    #[test]
    fn test_default_ports() {
        let http = ResolvedEndpoint::parse("http://cache.internal/c").unwrap();
        assert_eq!(http.port, 80);
        let https = ResolvedEndpoint::parse("https://cache.internal/c").unwrap();
        assert_eq!(https.port, 443);
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let ep = ResolvedEndpoint::parse("http://cache.internal/v1/").unwrap();
        assert_eq!(ep.base_path, "/v1");
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let err = ResolvedEndpoint::parse("ftp://cache.internal/c").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_missing_host_rejected() {
        let err = ResolvedEndpoint::parse("http:///c").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = ResolvedEndpoint::parse("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_url_for_key() {
        let ep = ResolvedEndpoint::parse("http://cache.internal:9280/v1").unwrap();
        let key = CacheKey::from([0xab, 0xcd]);
        assert_eq!(ep.url_for(&key), "http://cache.internal:9280/v1/abcd");
    }

    #[test]
    fn test_url_for_key_with_root_path() {
        let ep = ResolvedEndpoint::parse("http://cache.internal/").unwrap();
        let key = CacheKey::from([0x01]);
        assert_eq!(ep.url_for(&key), "http://cache.internal:80/01");
    }
}
