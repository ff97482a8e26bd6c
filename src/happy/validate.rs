use log::debug;
use url::Url;

use crate::happy::ServerUrlError;

/// Checks that `candidate` is an absolute `http` or `https` URL.
///
/// Purely syntactic: nothing is resolved or contacted.
pub fn validate_syntax(candidate: &str) -> Result<Url, ServerUrlError> {
    if candidate.trim().is_empty() {
        debug!("Rejecting empty server URL");
        return Err(ServerUrlError::EmptyUrl);
    }

    let parsed = Url::parse(candidate).map_err(|e| {
        debug!("Server URL {:?} failed to parse: {}", candidate, e);
        ServerUrlError::MalformedUrl(e)
    })?;

    match parsed.scheme() {
        "http" | "https" => {
            debug!(
                "Server URL accepted: scheme={} host={:?} port={:?} path={}",
                parsed.scheme(),
                parsed.host_str(),
                parsed.port(),
                parsed.path()
            );
            Ok(parsed)
        }
        other => {
            debug!("Server URL uses unsupported scheme {:?}", other);
            Err(ServerUrlError::UnsupportedScheme(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::happy::ErrorKind;

    fn kind_of(candidate: &str) -> Option<ErrorKind> {
        validate_syntax(candidate).err().map(|e| e.kind())
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(kind_of(""), Some(ErrorKind::EmptyUrl));
        assert_eq!(kind_of("   "), Some(ErrorKind::EmptyUrl));
        assert_eq!(kind_of("\t\n"), Some(ErrorKind::EmptyUrl));
    }

    #[test]
    fn malformed_input() {
        assert_eq!(kind_of("not a url"), Some(ErrorKind::MalformedUrl));
        assert_eq!(kind_of("example.com"), Some(ErrorKind::MalformedUrl));
        assert_eq!(kind_of("http://"), Some(ErrorKind::MalformedUrl));
        assert_eq!(kind_of("https://exa mple.com"), Some(ErrorKind::MalformedUrl));
    }

    #[test]
    fn unsupported_schemes() {
        assert_eq!(kind_of("ftp://host"), Some(ErrorKind::UnsupportedScheme));
        assert_eq!(kind_of("ws://host:8080"), Some(ErrorKind::UnsupportedScheme));
        assert_eq!(kind_of("mailto:someone@example.com"), Some(ErrorKind::UnsupportedScheme));
    }

    #[test]
    fn accepts_http_and_https() {
        let parsed = validate_syntax("https://example.com:8443/path").unwrap();
        assert_eq!(parsed.host_str(), Some("example.com"));
        assert_eq!(parsed.port(), Some(8443));
        assert_eq!(parsed.path(), "/path");

        assert!(validate_syntax("http://localhost:3005").is_ok());
        assert!(validate_syntax("https://api.example.com/v1?region=eu").is_ok());
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert!(validate_syntax("HTTPS://Example.com").is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert!(validate_syntax("  https://example.com  ").is_ok());
    }
}
