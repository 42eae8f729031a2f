//! HTTP GET triggers
//!
//! Trigger URLs are operator-written templates. Placeholders are replaced in
//! a single left-to-right pass (substituted text is never rescanned), then
//! the result is parsed as a URL, which percent-encodes anything unsafe.
//!
//! | Placeholder       | Value                          |
//! |-------------------|--------------------------------|
//! | `$timer`          | running timer, `HH:MM:SS`      |
//! | `$title`          | loaded cue title               |
//! | `$presenter`      | loaded cue presenter           |
//! | `$subtitle`       | loaded cue subtitle            |
//! | `$next-title`     | next cue title                 |
//! | `$next-presenter` | next cue presenter             |
//! | `$next-subtitle`  | next cue subtitle              |

use reqwest::Url;
use tracing::{debug, warn};

use super::SendOutcome;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("showrun/", env!("CARGO_PKG_VERSION"));

/// Values available to URL templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    pub timer: String,
    pub title: String,
    pub presenter: String,
    pub subtitle: String,
    pub next_title: String,
    pub next_presenter: String,
    pub next_subtitle: String,
}

impl TemplateValues {
    fn lookup(&self, rest: &str) -> Option<(usize, &str)> {
        // Longer names first so `$next-title` is not read as `$next` + text
        let table: [(&str, &str); 7] = [
            ("next-title", &self.next_title),
            ("next-presenter", &self.next_presenter),
            ("next-subtitle", &self.next_subtitle),
            ("timer", &self.timer),
            ("title", &self.title),
            ("presenter", &self.presenter),
            ("subtitle", &self.subtitle),
        ];
        table
            .into_iter()
            .find(|(name, _)| rest.starts_with(name))
            .map(|(name, value)| (name.len(), value))
    }
}

/// Replace placeholders in `template`
pub fn substitute(template: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match values.lookup(after) {
            Some((len, value)) => {
                out.push_str(value);
                rest = &after[len..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse and normalise a URL; only http and https are accepted
pub fn sanitize_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::InvalidInput(format!("Invalid trigger URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(Error::InvalidInput(format!(
            "Unsupported trigger URL scheme '{}'",
            other
        ))),
    }
}

/// Resolve a trigger template into a sendable URL
pub fn build_trigger_url(template: &str, values: &TemplateValues) -> Result<String> {
    sanitize_url(&substitute(template, values))
}

/// Fire-and-forget HTTP GET client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Integration(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Issue one GET and drain the response
    ///
    /// Connection and body errors are logged and reported in the outcome.
    pub async fn send(&self, url: &str) -> SendOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("HTTP trigger {} failed: {}", url, e);
                return SendOutcome::failed(e.to_string());
            }
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => debug!("HTTP trigger {} -> {} ({} bytes)", url, status, body.len()),
            Err(e) => debug!("HTTP trigger {} -> {} (body error: {})", url, status, e),
        }

        if status.is_success() {
            SendOutcome::ok(status.to_string())
        } else {
            SendOutcome::failed(format!("{} returned {}", url, status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> TemplateValues {
        TemplateValues {
            timer: "00:04:59".into(),
            title: "Opening".into(),
            presenter: "Ana".into(),
            subtitle: "Welcome".into(),
            next_title: "Panel".into(),
            next_presenter: "Bo".into(),
            next_subtitle: String::new(),
        }
    }

    #[test]
    fn test_substitute_all_placeholders() {
        let out = substitute(
            "t=$timer&a=$title&b=$presenter&c=$subtitle&d=$next-title&e=$next-presenter&f=$next-subtitle",
            &values(),
        );
        assert_eq!(out, "t=00:04:59&a=Opening&b=Ana&c=Welcome&d=Panel&e=Bo&f=");
    }

    #[test]
    fn test_substitution_is_single_pass() {
        let mut v = values();
        v.title = "$presenter".into();
        assert_eq!(substitute("x=$title", &v), "x=$presenter");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        assert_eq!(substitute("cost=$5&$", &values()), "cost=$5&$");
    }

    #[test]
    fn test_build_trigger_url_encodes_spaces() {
        let mut v = values();
        v.title = "Opening Remarks".into();
        let url = build_trigger_url("http://lights.local/go?cue=$title", &v).unwrap();
        assert_eq!(url, "http://lights.local/go?cue=Opening%20Remarks");
    }

    #[test]
    fn test_sanitize_rejects_bad_urls() {
        assert!(sanitize_url("not a url").is_err());
        assert!(sanitize_url("file:///etc/passwd").is_err());
        assert!(sanitize_url("  https://example.com/a  ").is_ok());
    }
}
