//! User preferences, persisted separately from the host document.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SSH_USER: &str = "admin";
pub const DEFAULT_RDP_USER: &str = "Administrator";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_RDP_PORT: u16 = 3389;

/// Stored settings. Missing fields fall back to the defaults field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "enableHealthProbe")]
    pub enable_health_probe: bool,
    #[serde(rename = "enableDarkMode")]
    pub enable_dark_mode: bool,
    #[serde(rename = "defaultSSHUser")]
    pub default_ssh_user: String,
    #[serde(rename = "defaultRDPUser")]
    pub default_rdp_user: String,
    #[serde(rename = "defaultSSHPort")]
    pub default_ssh_port: u16,
    #[serde(rename = "defaultRDPPort")]
    pub default_rdp_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_health_probe: false,
            enable_dark_mode: false,
            default_ssh_user: DEFAULT_SSH_USER.to_string(),
            default_rdp_user: DEFAULT_RDP_USER.to_string(),
            default_ssh_port: DEFAULT_SSH_PORT,
            default_rdp_port: DEFAULT_RDP_PORT,
        }
    }
}

impl Settings {
    /// Trim users and replace blanks or zero ports with the defaults.
    pub fn normalized(mut self) -> Self {
        self.default_ssh_user = non_blank_or(&self.default_ssh_user, DEFAULT_SSH_USER);
        self.default_rdp_user = non_blank_or(&self.default_rdp_user, DEFAULT_RDP_USER);
        if self.default_ssh_port == 0 {
            self.default_ssh_port = DEFAULT_SSH_PORT;
        }
        if self.default_rdp_port == 0 {
            self.default_rdp_port = DEFAULT_RDP_PORT;
        }
        self
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
