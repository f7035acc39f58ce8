//! Side effects a launch triggers outside the core: opening a URL, writing to
//! the clipboard and showing a short status message.

use thiserror::Error;

use crate::model::{HostRecord, Settings};

use super::commands::{plan_launch, LaunchAction, LaunchKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("outbound action failed: {0}")]
pub struct OutboundError(pub String);

/// Implemented by whatever surface hosts the core.
pub trait Outbound {
    fn open_url(&self, url: &str) -> Result<(), OutboundError>;

    fn copy_text(&self, text: &str) -> Result<(), OutboundError>;

    fn notify(&self, message: &str);
}

/// Carry out `action`. Feedback is only shown once the copy succeeded.
pub fn perform<O: Outbound + ?Sized>(
    outbound: &O,
    action: &LaunchAction,
) -> Result<(), OutboundError> {
    match action {
        LaunchAction::OpenUrl(url) => {
            log::info!("LAUNCH_OPEN_URL url={}", url);
            outbound.open_url(url)
        }
        LaunchAction::CopyText { text, feedback } => {
            if let Err(e) = outbound.copy_text(text) {
                log::warn!("LAUNCH_COPY_FAILED error={}", e);
                return Err(e);
            }
            log::info!("LAUNCH_COPIED chars={}", text.len());
            outbound.notify(feedback);
            Ok(())
        }
    }
}

/// Plan and perform `kind` for `host`.
pub fn launch<O: Outbound + ?Sized>(
    outbound: &O,
    kind: LaunchKind,
    host: &HostRecord,
    settings: &Settings,
) -> Result<LaunchAction, OutboundError> {
    let action = plan_launch(kind, host, settings);
    log::debug!("LAUNCH host={} action={}", host.id, kind);
    perform(outbound, &action)?;
    Ok(action)
}
