// src/core/report.rs

use std::fmt::Write as _;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use tracing::{debug, warn};
use v_htmlescape::escape;

use crate::core::error::{Error, Result};
use crate::core::models::ToolResult;

/// Turns collected tool sections into a finished document.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, target: &str, domain: &str, sections: &[ToolResult]) -> Result<String>;
}

/// Self-contained HTML: inline styles, optional inline logo, no external assets.
#[derive(Debug, Clone, Default)]
pub struct HtmlReportRenderer {
    logo_data_uri: Option<String>,
}

impl HtmlReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logo(mut self, logo_data_uri: Option<String>) -> Self {
        self.logo_data_uri = logo_data_uri;
        self
    }
}

const STYLE: &str = "body{font-family:sans-serif;background:#0f1115;color:#e6e6e6;margin:2rem}\
h1{margin-bottom:.2rem}.meta{color:#9aa0a6}section{margin-top:2rem}\
code{color:#f6c177}pre{background:#1a1d23;padding:1rem;overflow-x:auto;white-space:pre-wrap}\
img.logo{max-height:64px}";

impl ReportRenderer for HtmlReportRenderer {
    fn render(&self, target: &str, domain: &str, sections: &[ToolResult]) -> Result<String> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut html = String::with_capacity(4096);

        write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Recon Report: {domain}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
            domain = escape(domain),
        )
        .map_err(|e| Error::Render(e.to_string()))?;

        if let Some(logo) = &self.logo_data_uri {
            write!(html, "<img class=\"logo\" src=\"{}\" alt=\"logo\">\n", escape(logo))
                .map_err(|e| Error::Render(e.to_string()))?;
        }

        write!(
            html,
            "<h1>Recon Report</h1>\n<p class=\"meta\">Target: {} &middot; Domain: {} &middot; Generated: {}</p>\n",
            escape(target),
            escape(domain),
            timestamp,
        )
        .map_err(|e| Error::Render(e.to_string()))?;

        for section in sections {
            write!(
                html,
                "<section>\n<h2>{}</h2>\n<p><code>{}</code></p>\n<pre>{}</pre>\n</section>\n",
                escape(&section.title),
                escape(&section.command),
                escape(&section.output),
            )
            .map_err(|e| Error::Render(e.to_string()))?;
        }

        html.push_str("</body>\n</html>\n");
        debug!(bytes = html.len(), sections = sections.len(), "Report rendered.");
        Ok(html)
    }
}

/// Reads an image into a `data:` URI. A missing file is not an error.
pub fn logo_data_uri(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Logo not embedded.");
            return None;
        }
    };
    let mime = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sections_are_rendered_in_order_and_escaped() {
        let sections = vec![
            ToolResult { title: "First".into(), command: "whois example.com".into(), output: "a < b".into() },
            ToolResult { title: "Second".into(), command: "dig example.com".into(), output: "<script>".into() },
        ];
        let html = HtmlReportRenderer::new()
            .render("https://example.com", "example.com", &sections)
            .unwrap();

        let first = html.find("<h2>First</h2>").unwrap();
        let second = html.find("<h2>Second</h2>").unwrap();
        assert!(first < second);
        assert!(html.contains("a &lt; b"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn logo_is_inlined_as_data_uri() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let uri = logo_data_uri(file.path()).unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");

        let html = HtmlReportRenderer::new()
            .with_logo(Some(uri))
            .render("t", "d", &[])
            .unwrap();
        assert!(html.contains("<img class=\"logo\" src=\"data:image/png;base64,iVBORw==\""));
    }

    #[test]
    fn missing_logo_is_none() {
        assert!(logo_data_uri(Path::new("/nonexistent/logo.png")).is_none());
    }
}
