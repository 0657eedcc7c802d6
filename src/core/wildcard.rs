// src/core/wildcard.rs

use std::future::Future;
use std::time::Duration;

use reqwest::redirect::Policy;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::core::models::random_token;

const PATH_LEN: usize = 16;

/// What a domain answers for a path that cannot exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WildcardSignature {
    /// Body size in bytes, `None` when the probe failed.
    pub length: Option<u64>,
    /// HTTP status code, `None` when the probe failed.
    pub status: Option<u16>,
}

impl WildcardSignature {
    /// Extra arguments for the directory brute-forcer so that catch-all
    /// responses are filtered out.
    ///
    /// A stable non-zero length wins. Otherwise a non-404, non-200 status is
    /// blacklisted. Anything else falls back to blacklisting 404, which is
    /// emitted even when the probe itself saw 404.
    pub fn directory_scan_filter(&self) -> Vec<String> {
        match (self.length, self.status) {
            (Some(len), _) if len > 0 => vec!["--exclude-length".to_string(), len.to_string()],
            (_, Some(code)) if code != 404 && code != 200 => vec!["-b".to_string(), code.to_string()],
            _ => vec!["-b".to_string(), "404".to_string()],
        }
    }
}

/// Detects a domain's soft-404 behaviour before the brute-force step.
pub trait WildcardProbe: Send + Sync {
    fn probe(&self, domain: &str) -> impl Future<Output = WildcardSignature> + Send;
}

/// Probes over HTTPS with two throwaway requests.
#[derive(Debug, Clone)]
pub struct HttpWildcardProbe {
    client: Option<reqwest::Client>,
    timeout: Duration,
}

impl HttpWildcardProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = match reqwest::Client::builder()
            .user_agent("VanguardRecon/0.1")
            .redirect(Policy::none())
            .build()
        {
            Ok(c) => Some(c),
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client for wildcard probe.");
                None
            }
        };
        Self { client, timeout }
    }

    async fn probe_length(&self, client: &reqwest::Client, url: String) -> Option<u64> {
        let response = client.get(&url).timeout(self.timeout).send().await.ok()?;
        let body = response.bytes().await.ok()?;
        debug!(url = %url, bytes = body.len(), "Wildcard length probe answered.");
        Some(body.len() as u64)
    }

    async fn probe_status(&self, client: &reqwest::Client, url: String) -> Option<u16> {
        let response = client.get(&url).timeout(self.timeout).send().await.ok()?;
        debug!(url = %url, status = %response.status(), "Wildcard status probe answered.");
        Some(response.status().as_u16())
    }
}

impl WildcardProbe for HttpWildcardProbe {
    async fn probe(&self, domain: &str) -> WildcardSignature {
        let Some(client) = &self.client else {
            return WildcardSignature::default();
        };
        let length_url = probe_url(domain);
        let status_url = probe_url(domain);

        let (length, status) = tokio::join!(
            self.probe_length(client, length_url),
            self.probe_status(client, status_url)
        );
        let signature = WildcardSignature { length, status };
        info!(domain, ?signature, "Wildcard probe finished.");
        signature
    }
}

/// `https://<domain>/<16 random lowercase alphanumerics>`.
pub fn probe_url(domain: &str) -> String {
    format!("https://{}/{}", domain, random_token(PATH_LEN))
}
