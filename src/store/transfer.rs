//! Import/export of the host document as a JSON file, and content
//! fingerprints used to detect concurrent writers.

use std::fmt;

use chrono::NaiveDate;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::model::Document;
use crate::validation::{check_required_fields, check_unique_ids, DocumentError};

/// SHA-256 of a persisted blob, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(raw: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        Fingerprint(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for log lines.
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}

/// Pretty-printed JSON, the same shape the store persists.
pub fn export_document(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Parse an import file. `version` and `envs` are required; host ids must be
/// unique; host environment fields are realigned with their containers.
pub fn import_document(text: &str) -> Result<Document, DocumentError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))?;
    check_required_fields(&raw)?;

    let mut doc: Document =
        serde_json::from_value(raw).map_err(|e| DocumentError::Shape(e.to_string()))?;
    check_unique_ids(&doc)?;

    let fixed = doc.normalize();
    if fixed > 0 {
        log::info!("IMPORT_NORMALIZED hosts_realigned={}", fixed);
    }
    Ok(doc)
}

/// `lab-ip-manager-2026-10-18.json`, or the `-backup-` variant.
pub fn export_filename(date: NaiveDate, backup: bool) -> String {
    let stem = if backup {
        "lab-ip-manager-backup"
    } else {
        "lab-ip-manager"
    };
    format!("{}-{}.json", stem, date.format("%Y-%m-%d"))
}
