//! Network side of a single probe attempt.
//!
//! Every attempt sends `HEAD` and accepts any HTTP response, whatever its
//! status or certificate. Port attempts target `http://<address>:<port>`, so a
//! listener that does not speak HTTP counts as unreachable.

use std::future::Future;
use std::time::Duration;

use reqwest::redirect::Policy;
use thiserror::Error;

use crate::model::ProbeMethod;
use crate::validation::url_host;

/// Failure of one attempt. Always absorbed by the prober.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
}

/// One attempt against one address. Time bounds are applied by the caller.
pub trait ProbeTransport: Send + Sync {
    fn attempt(
        &self,
        address: &str,
        method: ProbeMethod,
    ) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

/// Real network transport.
#[derive(Debug, Clone)]
pub struct NetTransport {
    client: reqwest::Client,
}

impl NetTransport {
    pub fn new() -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .user_agent(format!("labhost/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn head(&self, url: &str) -> Result<(), ProbeError> {
        let resp = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        log::trace!("PROBE_HTTP_RESPONSE url={} status={}", url, resp.status());
        Ok(())
    }
}

impl ProbeTransport for NetTransport {
    async fn attempt(&self, address: &str, method: ProbeMethod) -> Result<(), ProbeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ProbeError::Transport("empty address".to_string()));
        }

        match method {
            ProbeMethod::Http => self.head(&format!("http://{}", url_host(address))).await,
            ProbeMethod::Https => self.head(&format!("https://{}", url_host(address))).await,
            ProbeMethod::Port(port) => {
                self.head(&format!("http://{}:{}", url_host(address), port)).await
            }
        }
    }
}
