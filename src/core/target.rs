// src/core/target.rs

//! Turns a user-typed target into the domain and URL forms the tools expect.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::core::error::{Error, Result};
use crate::core::options::ToolKind;

static FILENAME_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());

/// A validated target: the raw input, its lowercased host and a full URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTarget {
    pub raw: String,
    pub domain: String,
    pub url: String,
}

impl NormalizedTarget {
    /// Parses `input`, inferring `https://` when no scheme is given.
    ///
    /// The URL keeps the user's path and scheme; the domain is the bare host.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidTarget);
        }
        let url = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let parsed = Url::parse(&url).map_err(|_| Error::InvalidTarget)?;
        let domain = parsed
            .host_str()
            .map(|h| h.trim_matches('/').to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .ok_or(Error::InvalidTarget)?;

        Ok(Self { raw: trimmed.to_string(), domain, url })
    }

    /// The value a tool of the given kind takes as its final argument.
    pub fn for_kind(&self, kind: ToolKind) -> &str {
        match kind {
            ToolKind::Domain => &self.domain,
            ToolKind::Url => &self.url,
        }
    }

    /// `https://<domain>`, ignoring any path the user typed.
    pub fn root_url(&self) -> String {
        format!("https://{}", self.domain)
    }

    /// The registrable-looking domain with a leading `www.` removed.
    pub fn apex(&self) -> &str {
        self.domain.strip_prefix("www.").unwrap_or(&self.domain)
    }
}

/// Builds `<host>-<MM-DD-YYYY-HHMM>.html` for a report, from any raw target.
///
/// Unparsable targets still get a name: the host part falls back to `target`.
pub fn report_filename(target: &str, now: DateTime<Local>) -> String {
    let host = NormalizedTarget::parse(target)
        .map(|t| t.apex().replace('.', "-"))
        .unwrap_or_default();
    let host = FILENAME_UNSAFE.replace_all(&host, "");
    let host = if host.is_empty() { "target" } else { host.as_ref() };
    format!("{}-{}.html", host, now.format("%m-%d-%Y-%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn infers_scheme_and_lowercases_host() {
        let t = NormalizedTarget::parse("  Example.COM ").unwrap();
        assert_eq!(t.domain, "example.com");
        assert_eq!(t.url, "https://Example.COM");
        assert_eq!(t.root_url(), "https://example.com");
    }

    #[test]
    fn keeps_explicit_scheme_and_path() {
        let t = NormalizedTarget::parse("http://www.example.com:8080/login").unwrap();
        assert_eq!(t.domain, "www.example.com");
        assert_eq!(t.url, "http://www.example.com:8080/login");
        assert_eq!(t.apex(), "example.com");
        assert_eq!(t.for_kind(ToolKind::Domain), "www.example.com");
        assert_eq!(t.for_kind(ToolKind::Url), "http://www.example.com:8080/login");
    }

    #[test]
    fn rejects_empty_and_hostless_targets() {
        assert!(matches!(NormalizedTarget::parse(""), Err(Error::InvalidTarget)));
        assert!(matches!(NormalizedTarget::parse("   "), Err(Error::InvalidTarget)));
        assert!(matches!(NormalizedTarget::parse("https://"), Err(Error::InvalidTarget)));
    }

    #[test]
    fn report_filename_is_sanitized() {
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(
            report_filename("https://WWW.Example.co.uk/x", now),
            "example-co-uk-03-07-2026-0905.html"
        );
        assert_eq!(report_filename("", now), "target-03-07-2026-0905.html");
    }
}
