//! Host form validation.
//!
//! Name and address are required after trimming; everything else is
//! normalised (trimmed, blanks dropped, tags de-duplicated).

use thiserror::Error;

use crate::model::HostFields;

/// A user-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,
    #[error("IP address is required")]
    EmptyAddress,
    #[error("environment name is required")]
    EmptyEnvironmentName,
    #[error("port must be between 1 and 65535, got {0}")]
    PortOutOfRange(String),
    #[error("selected text is not a valid IP address: {0}")]
    NotAnIpAddress(String),
}

/// Validate and normalise host fields.
pub fn validate_host_fields(fields: HostFields) -> Result<HostFields, ValidationError> {
    let name = fields.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let ip = fields.ip.trim().to_string();
    if ip.is_empty() {
        return Err(ValidationError::EmptyAddress);
    }

    if fields.port == Some(0) {
        return Err(ValidationError::PortOutOfRange("0".to_string()));
    }

    let rdp_user = fields
        .rdp_user
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let environment_id = fields
        .environment_id
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    Ok(HostFields {
        name,
        ip,
        port: fields.port,
        rdp_user,
        environment_id,
        tags: normalize_tags(fields.tags),
        notes: fields.notes.trim().to_string(),
        pinned: fields.pinned,
    })
}

/// Trim tags, drop blanks and duplicates, keep first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Split a comma separated tag field ("prod, web,").
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}

/// Parse an optional port field. Blank input means no port.
pub fn parse_port(input: &str) -> Result<Option<u16>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => Ok(Some(port)),
        _ => Err(ValidationError::PortOutOfRange(trimmed.to_string())),
    }
}

/// Environment names are trimmed and must not be blank.
pub fn validate_environment_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyEnvironmentName)
    } else {
        Ok(trimmed.to_string())
    }
}
