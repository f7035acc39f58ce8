//! Address checks for "add selection as host".
//!
//! Only dotted-quad IPv4 selections are accepted from page text; the host
//! form itself accepts any non-blank address or hostname.

use lazy_static::lazy_static;
use regex::Regex;

use super::host::ValidationError;

lazy_static! {
    /// Dotted-quad IPv4, each octet 0-255.
    static ref IPV4_PATTERN: Regex = Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$"
    ).unwrap();
}

pub fn is_ipv4(text: &str) -> bool {
    IPV4_PATTERN.is_match(text)
}

/// Trim a page selection and accept it only if it is an IPv4 address.
pub fn validate_selection(selection: &str) -> Result<String, ValidationError> {
    let trimmed = selection.trim();
    if is_ipv4(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::NotAnIpAddress(trimmed.to_string()))
    }
}

/// Host part of a URL for an address, bracketing IPv6 literals.
pub fn url_host(address: &str) -> String {
    if address.contains(':') && address.parse::<std::net::Ipv6Addr>().is_ok() {
        format!("[{}]", address)
    } else {
        address.to_string()
    }
}
