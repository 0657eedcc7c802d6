// src/config.rs

//! Runtime settings, read once from `VANGUARD_RECON_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use lazy_static::lazy_static;
use tracing::{debug, warn};

use crate::core::pipeline::BatchSettings;
use crate::core::report::{self, HtmlReportRenderer};
use crate::core::wildcard::HttpWildcardProbe;
use crate::logging::{PROJECT_NAME, get_data_dir};

const DEFAULT_WORDLIST: &str = "./common.txt";
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 90;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 20;

lazy_static! {
    pub static ref DATA_DIR_ENV: String = format!("{}_DATA_DIR", PROJECT_NAME.clone());
    pub static ref WORDLIST_ENV: String = format!("{}_WORDLIST", PROJECT_NAME.clone());
    pub static ref TOOL_TIMEOUT_ENV: String = format!("{}_TOOL_TIMEOUT_SECS", PROJECT_NAME.clone());
    pub static ref PROBE_TIMEOUT_ENV: String = format!("{}_PROBE_TIMEOUT_SECS", PROJECT_NAME.clone());
    pub static ref LOGO_PATH_ENV: String = format!("{}_LOGO_PATH", PROJECT_NAME.clone());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconConfig {
    /// Where finished reports are written.
    pub data_dir: PathBuf,
    pub wordlist: String,
    pub tool_timeout: Duration,
    /// Always shorter than `tool_timeout`.
    pub probe_timeout: Duration,
    pub logo_path: Option<PathBuf>,
}

impl ReconConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = get(&DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| get_data_dir().join("reports"));
        let wordlist = get(&WORDLIST_ENV).unwrap_or_else(|| DEFAULT_WORDLIST.to_string());
        let tool_timeout = Duration::from_secs(seconds(&TOOL_TIMEOUT_ENV, get(&TOOL_TIMEOUT_ENV), DEFAULT_TOOL_TIMEOUT_SECS));
        let mut probe_timeout =
            Duration::from_secs(seconds(&PROBE_TIMEOUT_ENV, get(&PROBE_TIMEOUT_ENV), DEFAULT_PROBE_TIMEOUT_SECS));
        if probe_timeout >= tool_timeout {
            warn!(?probe_timeout, ?tool_timeout, "Probe timeout must be below the tool timeout; halving.");
            probe_timeout = tool_timeout / 2;
        }
        let logo_path = get(&LOGO_PATH_ENV).map(PathBuf::from);

        let config = Self { data_dir, wordlist, tool_timeout, probe_timeout, logo_path };
        debug!(?config, "Configuration resolved.");
        config
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings { tool_timeout: self.tool_timeout, wordlist: self.wordlist.clone() }
    }

    pub fn wildcard_probe(&self) -> HttpWildcardProbe {
        HttpWildcardProbe::new(self.probe_timeout)
    }

    pub fn renderer(&self) -> HtmlReportRenderer {
        let logo = self.logo_path.as_deref().and_then(report::logo_data_uri);
        HtmlReportRenderer::new().with_logo(logo)
    }
}

/// A positive whole number of seconds, or `default` with a warning.
fn seconds(key: &str, raw: Option<String>, default: u64) -> u64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            warn!(key, value = %raw, default, "Invalid number of seconds; using default.");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ReconConfig {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ReconConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let c = config(&[]);
        assert_eq!(c.wordlist, "./common.txt");
        assert_eq!(c.tool_timeout, Duration::from_secs(90));
        assert_eq!(c.probe_timeout, Duration::from_secs(20));
        assert_eq!(c.logo_path, None);
        assert!(c.data_dir.ends_with("reports"));
    }

    #[test]
    fn values_are_read_from_prefixed_keys() {
        let c = config(&[
            ("VANGUARD_RECON_DATA_DIR", "/tmp/out"),
            ("VANGUARD_RECON_WORDLIST", "/usr/share/wordlists/big.txt"),
            ("VANGUARD_RECON_TOOL_TIMEOUT_SECS", "120"),
            ("VANGUARD_RECON_PROBE_TIMEOUT_SECS", "5"),
            ("VANGUARD_RECON_LOGO_PATH", "static/logo.png"),
        ]);
        assert_eq!(c.data_dir, PathBuf::from("/tmp/out"));
        assert_eq!(c.wordlist, "/usr/share/wordlists/big.txt");
        assert_eq!(c.tool_timeout, Duration::from_secs(120));
        assert_eq!(c.probe_timeout, Duration::from_secs(5));
        assert_eq!(c.logo_path, Some(PathBuf::from("static/logo.png")));
        assert_eq!(c.batch_settings().tool_timeout, Duration::from_secs(120));
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let c = config(&[
            ("VANGUARD_RECON_TOOL_TIMEOUT_SECS", "soon"),
            ("VANGUARD_RECON_PROBE_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(c.tool_timeout, Duration::from_secs(90));
        assert_eq!(c.probe_timeout, Duration::from_secs(20));
    }

    #[test]
    fn probe_timeout_stays_below_tool_timeout() {
        let c = config(&[
            ("VANGUARD_RECON_TOOL_TIMEOUT_SECS", "10"),
            ("VANGUARD_RECON_PROBE_TIMEOUT_SECS", "30"),
        ]);
        assert_eq!(c.probe_timeout, Duration::from_secs(5));
    }
}
