//! Structural checks for documents arriving from outside (imports).

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::model::{Document, SCHEMA_VERSION};

/// Why an imported document was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("file is not valid JSON: {0}")]
    Parse(String),
    #[error("missing schema version")]
    MissingVersion,
    #[error("missing environments list")]
    MissingEnvironments,
    #[error("document does not match the host schema: {0}")]
    Shape(String),
    #[error("duplicate host id: {0}")]
    DuplicateHostId(String),
    #[error("duplicate environment id: {0}")]
    DuplicateEnvironmentId(String),
}

/// Both `version` (a non-zero integer) and `envs` must be present before the
/// payload is even considered a host document. A string version such as `"1"`
/// is refused.
pub fn check_required_fields(raw: &Value) -> Result<(), DocumentError> {
    let version_ok = raw
        .get("version")
        .and_then(|v| v.as_u64())
        .map(|v| v > 0)
        .unwrap_or(false);
    if !version_ok {
        return Err(DocumentError::MissingVersion);
    }

    if !raw.get("envs").map(|e| e.is_array()).unwrap_or(false) {
        return Err(DocumentError::MissingEnvironments);
    }
    Ok(())
}

/// Host ids must be unique across the whole document, environment ids within
/// the environment list.
pub fn check_unique_ids(doc: &Document) -> Result<(), DocumentError> {
    let mut env_ids = HashSet::new();
    for env in &doc.envs {
        if !env_ids.insert(env.id.as_str()) {
            return Err(DocumentError::DuplicateEnvironmentId(env.id.clone()));
        }
    }

    let mut host_ids = HashSet::new();
    for host in doc.hosts() {
        if !host_ids.insert(host.id.as_str()) {
            return Err(DocumentError::DuplicateHostId(host.id.clone()));
        }
    }

    if doc.version > SCHEMA_VERSION {
        log::warn!(
            "DOCUMENT_VERSION_NEWER version={} supported={}",
            doc.version,
            SCHEMA_VERSION
        );
    }
    Ok(())
}
