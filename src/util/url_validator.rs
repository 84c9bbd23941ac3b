use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Reasons an opportunity link is refused before handing it to the browser.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The link string could not be parsed (includes the "#" placeholder).
    #[error("Invalid link: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Only web links are opened; `file:`, `javascript:` and friends are not.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Scraped links pointing into the local network are not followed.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    #[error("Localhost not allowed")]
    Localhost,
}

/// Validate a scraped opportunity link for opening in the system browser.
///
/// ```
/// use wealthsage::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/apply").is_ok());
/// assert!(validate_url_for_open("#").is_err());
/// assert!(validate_url_for_open("javascript:alert(1)").is_err());
/// assert!(validate_url_for_open("http://192.168.1.1/").is_err());
/// ```
pub fn validate_url_for_open(link: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(link.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if let Some(host) = url.host_str() {
        if host.eq_ignore_ascii_case("localhost") {
            return Err(UrlValidationError::Localhost);
        }

        // IPv6 hosts come bracketed
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = bare.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00 // unique local fc00::/7
                || (first & 0xffc0) == 0xfe80 // link local fe80::/10
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_links_accepted() {
        assert!(validate_url_for_open("https://devpost.com/hackathons").is_ok());
        assert!(validate_url_for_open("http://example.org:8080/gig").is_ok());
    }

    #[test]
    fn test_placeholder_and_relative_rejected() {
        assert!(matches!(
            validate_url_for_open("#"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_url_for_open("/apply").is_err());
    }

    #[test]
    fn test_schemes_rejected() {
        assert!(matches!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_local_targets_rejected() {
        assert!(matches!(
            validate_url_for_open("http://localhost/"),
            Err(UrlValidationError::Localhost)
        ));
        assert!(validate_url_for_open("http://127.0.0.1/").is_err());
        assert!(validate_url_for_open("http://[::1]/").is_err());
        assert!(validate_url_for_open("http://10.0.0.1/").is_err());
        assert!(validate_url_for_open("http://169.254.1.1/").is_err());
        assert!(validate_url_for_open("http://[fe80::1]/").is_err());
        assert!(validate_url_for_open("http://0.0.0.0/").is_err());
    }
}
