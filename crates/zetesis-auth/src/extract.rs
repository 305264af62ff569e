//! Cookie extraction boundary.
//!
//! Reading cookies straight out of a browser's cookie database needs a
//! platform integration this crate does not ship; that path is modeled as
//! the [`CookieSource`] trait so an embedding application can plug one in.
//! What ships here is the JSON-export source, which understands the dump
//! format produced by common cookie-export browser extensions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use zetesis_types::{Error, Result};

/// Browsers cookies can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

impl Browser {
    pub fn all() -> &'static [Browser] {
        &[Self::Chrome, Self::Firefox, Self::Edge]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Browser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" => Ok(Self::Edge),
            other => Err(Error::InvalidParameter(format!(
                "unsupported browser: {other}"
            ))),
        }
    }
}

/// A provider of session cookies for a given browser.
pub trait CookieSource {
    fn extract(&self, browser: Browser) -> Result<HashMap<String, String>>;
}

/// Extract cookies from the named browser's own storage.
///
/// Always fails with [`Error::ExtractionUnavailable`] until an embedding
/// application supplies a [`CookieSource`] backed by a real browser
/// integration; use [`JsonExport`] for the extension-dump path.
pub fn extract_from_browser(browser: Browser) -> Result<HashMap<String, String>> {
    Err(Error::ExtractionUnavailable(format!(
        "no native cookie extraction backend for {browser}; \
         implement CookieSource or import a JSON export"
    )))
}

#[derive(Debug, Deserialize)]
struct ExportedCookie {
    name: String,
    value: String,
    #[serde(default)]
    domain: String,
}

/// Cookie source reading a browser-extension JSON export: a list of
/// `{name, value, domain, ...}` records, filtered to the service domain.
#[derive(Debug, Clone)]
pub struct JsonExport {
    path: PathBuf,
    domain: String,
}

impl JsonExport {
    pub fn new(path: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            domain: domain.into(),
        }
    }
}

impl CookieSource for JsonExport {
    fn extract(&self, browser: Browser) -> Result<HashMap<String, String>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let exported: Vec<ExportedCookie> = serde_json::from_str(&contents)?;

        let cookies: HashMap<String, String> = exported
            .into_iter()
            .filter(|cookie| cookie.domain.contains(&self.domain))
            .map(|cookie| (cookie.name, cookie.value))
            .collect();

        tracing::debug!(
            browser = %browser,
            count = cookies.len(),
            "extracted cookies from JSON export"
        );
        Ok(cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn native_extraction_is_unavailable() {
        for browser in Browser::all() {
            assert!(matches!(
                extract_from_browser(*browser),
                Err(Error::ExtractionUnavailable(_))
            ));
        }
    }

    #[test]
    fn browser_names_round_trip() {
        for browser in Browser::all() {
            assert_eq!(browser.name().parse::<Browser>().unwrap(), *browser);
        }
        assert!(matches!(
            "netscape".parse::<Browser>(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn json_export_filters_by_domain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "session", "value": "abc", "domain": ".example.ai"},
                {"name": "tracker", "value": "zzz", "domain": ".ads.net"},
                {"name": "csrf", "value": "xyz", "domain": "www.example.ai"}
            ]"#,
        )
        .unwrap();

        let source = JsonExport::new(&path, "example.ai");
        let cookies = source.extract(Browser::Chrome).unwrap();

        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["session"], "abc");
        assert_eq!(cookies["csrf"], "xyz");
        assert!(!cookies.contains_key("tracker"));
    }

    #[test]
    fn missing_export_file_is_an_io_error() {
        let source = JsonExport::new("/nonexistent/export.json", "example.ai");
        assert!(matches!(
            source.extract(Browser::Firefox),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn malformed_export_is_a_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, "{}").unwrap();

        let source = JsonExport::new(&path, "example.ai");
        assert!(matches!(
            source.extract(Browser::Chrome),
            Err(Error::Json(_))
        ));
    }
}
