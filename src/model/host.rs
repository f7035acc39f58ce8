//! Host records.
//!
//! JSON keys follow the persisted extension format (`environment`,
//! `lastHealthCheck`, `responseTime`) so existing exports load unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse health classification attached to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Checking,
    Online,
    Offline,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Checking => "checking",
            HealthStatus::Online => "online",
            HealthStatus::Offline => "offline",
        }
    }

    /// Terminal states are the only ones a probe ever commits.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HealthStatus::Online | HealthStatus::Offline)
    }
}

/// One reachability attempt kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Http,
    Https,
    Port(u16),
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Http => write!(f, "http"),
            ProbeMethod::Https => write!(f, "https"),
            ProbeMethod::Port(port) => write!(f, "port-{}", port),
        }
    }
}

/// How the last health check concluded: `http`, `https`, `port-<N>`,
/// `all-failed` or `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HealthMethod {
    Probe(ProbeMethod),
    AllFailed,
    Error,
}

impl fmt::Display for HealthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthMethod::Probe(method) => method.fmt(f),
            HealthMethod::AllFailed => write!(f, "all-failed"),
            HealthMethod::Error => write!(f, "error"),
        }
    }
}

impl FromStr for HealthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(HealthMethod::Probe(ProbeMethod::Http)),
            "https" => Ok(HealthMethod::Probe(ProbeMethod::Https)),
            "all-failed" => Ok(HealthMethod::AllFailed),
            "error" => Ok(HealthMethod::Error),
            other => other
                .strip_prefix("port-")
                .and_then(|port| port.parse::<u16>().ok())
                .map(|port| HealthMethod::Probe(ProbeMethod::Port(port)))
                .ok_or_else(|| format!("unknown health method: {}", other)),
        }
    }
}

impl TryFrom<String> for HealthMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<HealthMethod> for String {
    fn from(method: HealthMethod) -> Self {
        method.to_string()
    }
}

/// One addressable target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub id: String,
    pub name: String,
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdp_user: Option<String>,
    #[serde(rename = "environment", alias = "environmentId", default)]
    pub environment_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub health_status: HealthStatus,
    #[serde(
        rename = "lastHealthCheck",
        alias = "lastHealthCheckAt",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_health_check_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "responseTime",
        alias = "responseTimeMs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_method: Option<HealthMethod>,
}

impl HostRecord {
    /// Build a record from already validated fields.
    pub fn from_fields(id: String, environment_id: String, fields: HostFields) -> Self {
        Self {
            id,
            name: fields.name,
            ip: fields.ip,
            port: fields.port,
            rdp_user: fields.rdp_user,
            environment_id,
            tags: fields.tags,
            notes: fields.notes,
            pinned: fields.pinned,
            health_status: HealthStatus::Unknown,
            last_health_check_at: None,
            response_time_ms: None,
            health_method: None,
        }
    }

    /// Replace the user-editable fields, keeping id and health data.
    pub fn apply_fields(&mut self, environment_id: String, fields: HostFields) {
        self.name = fields.name;
        self.ip = fields.ip;
        self.port = fields.port;
        self.rdp_user = fields.rdp_user;
        self.environment_id = environment_id;
        self.tags = fields.tags;
        self.notes = fields.notes;
        self.pinned = fields.pinned;
    }

    /// Copy the health fields from another record of the same host.
    pub fn copy_health_from(&mut self, other: &HostRecord) {
        self.health_status = other.health_status;
        self.last_health_check_at = other.last_health_check_at;
        self.response_time_ms = other.response_time_ms;
        self.health_method = other.health_method;
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Tags in display order.
    pub fn sorted_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tags.iter().map(|t| t.as_str()).collect();
        tags.sort_unstable();
        tags
    }

    /// Hover text shown next to the health dot.
    pub fn health_summary(&self, now: DateTime<Utc>) -> String {
        if self.health_status == HealthStatus::Unknown && self.last_health_check_at.is_none() {
            return "Health status: Not checked yet".to_string();
        }

        let status = self.health_status.as_str();
        let mut summary = format!(
            "Health status: {}{}",
            status[..1].to_uppercase(),
            &status[1..]
        );
        if let Some(checked) = self.last_health_check_at {
            let secs = (now - checked).num_seconds().max(0);
            summary.push_str(&format!("\nLast checked: {}s ago", secs));
        }
        if let Some(ms) = self.response_time_ms {
            summary.push_str(&format!("\nResponse time: {}ms", ms));
        }
        if let Some(method) = self.health_method {
            summary.push_str(&format!(
                "\nMethod: {}",
                method.to_string().replacen('-', " ", 1).to_uppercase()
            ));
        }
        summary
    }
}

/// User-editable host fields as submitted by a form.
///
/// `environment_id` of `None` (or an id that does not resolve) lands the host
/// in the document's first environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostFields {
    pub name: String,
    pub ip: String,
    pub port: Option<u16>,
    pub rdp_user: Option<String>,
    pub environment_id: Option<String>,
    pub tags: Vec<String>,
    pub notes: String,
    pub pinned: bool,
}

impl HostFields {
    pub fn new(name: &str, ip: &str) -> Self {
        Self {
            name: name.to_string(),
            ip: ip.to_string(),
            ..Self::default()
        }
    }

    pub fn in_environment(mut self, environment_id: &str) -> Self {
        self.environment_id = Some(environment_id.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Editable fields of an existing record, for partial edits.
    pub fn from_record(record: &HostRecord) -> Self {
        Self {
            name: record.name.clone(),
            ip: record.ip.clone(),
            port: record.port,
            rdp_user: record.rdp_user.clone(),
            environment_id: Some(record.environment_id.clone()),
            tags: record.tags.clone(),
            notes: record.notes.clone(),
            pinned: record.pinned,
        }
    }
}
