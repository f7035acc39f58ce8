//! Launch targets for a host: browser URL, SSH and RDP command lines, and the
//! plain copy text.

use std::fmt;
use std::str::FromStr;

use crate::model::{HostRecord, Settings};
use crate::validation::url_host;

/// What the user asked to do with a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchKind {
    #[default]
    Web,
    Ssh,
    Rdp,
    Copy,
}

impl LaunchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchKind::Web => "web",
            LaunchKind::Ssh => "ssh",
            LaunchKind::Rdp => "rdp",
            LaunchKind::Copy => "copy",
        }
    }
}

impl fmt::Display for LaunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(LaunchKind::Web),
            "ssh" => Ok(LaunchKind::Ssh),
            "rdp" => Ok(LaunchKind::Rdp),
            "copy" => Ok(LaunchKind::Copy),
            other => Err(format!("unknown action: {} (expected web, ssh, rdp or copy)", other)),
        }
    }
}

/// Concrete outbound effect for a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAction {
    OpenUrl(String),
    CopyText { text: String, feedback: String },
}

/// `http://<ip>[:<port>]`
pub fn web_url(host: &HostRecord) -> String {
    match host.port {
        Some(port) => format!("http://{}:{}", url_host(&host.ip), port),
        None => format!("http://{}", url_host(&host.ip)),
    }
}

pub fn ssh_command(host: &HostRecord, settings: &Settings) -> String {
    let port = host.port.unwrap_or(settings.default_ssh_port);
    format!("ssh {}@{} -p {}", settings.default_ssh_user, host.ip, port)
}

pub fn rdp_command(host: &HostRecord, settings: &Settings) -> String {
    let port = host.port.unwrap_or(settings.default_rdp_port);
    format!("mstsc /v:{}:{}", host.ip, port)
}

/// Username the RDP session should use.
pub fn rdp_user<'a>(host: &'a HostRecord, settings: &'a Settings) -> &'a str {
    host.rdp_user.as_deref().unwrap_or(&settings.default_rdp_user)
}

/// `<ip>[:<port>][ (RDP: <user>)]`
pub fn copy_text(host: &HostRecord) -> String {
    let mut text = match host.port {
        Some(port) => format!("{}:{}", host.ip, port),
        None => host.ip.clone(),
    };
    if let Some(user) = &host.rdp_user {
        text.push_str(&format!(" (RDP: {})", user));
    }
    text
}

pub fn plan_launch(kind: LaunchKind, host: &HostRecord, settings: &Settings) -> LaunchAction {
    match kind {
        LaunchKind::Web => LaunchAction::OpenUrl(web_url(host)),
        LaunchKind::Ssh => {
            let command = ssh_command(host, settings);
            LaunchAction::CopyText {
                feedback: format!("SSH command copied! Paste in terminal: {}", command),
                text: command,
            }
        }
        LaunchKind::Rdp => {
            let command = rdp_command(host, settings);
            // Named only when set on the host.
            let user_info = host
                .rdp_user
                .as_ref()
                .map(|u| format!(" (username: {})", u))
                .unwrap_or_default();
            LaunchAction::CopyText {
                feedback: format!(
                    "RDP command copied! Paste in Command Prompt: {}{}",
                    command, user_info
                ),
                text: command,
            }
        }
        LaunchKind::Copy => LaunchAction::CopyText {
            text: copy_text(host),
            feedback: "Copied!".to_string(),
        },
    }
}
