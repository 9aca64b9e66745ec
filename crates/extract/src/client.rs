// ABOUTME: Blocking HTTP session for downloading item pages, built via SessionBuilder.
// ABOUTME: One GET per page, optional Canvas session cookie, fixed UA, polite delay after success.

//! The download session.
//!
//! Everything here is sequential, blocking I/O: one GET per item page, no
//! retries, no backoff. The session carries its cookie and header state
//! once at build time and is then used read-only. A polite delay follows
//! each successful download to bound the request rate.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::ScrapeError;

/// Fixed browser user-agent sent with every request.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Name of the Canvas session cookie.
pub const SESSION_COOKIE: &str = "_legacy_normandy_session";

/// Builder for [`Session`] instances.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    timeout: Duration,
    user_agent: String,
    cookie: Option<String>,
    delay: Duration,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: BROWSER_USER_AGENT.to_string(),
            cookie: None,
            delay: Duration::from_secs(1),
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Attach the Canvas session cookie value. `None` leaves the session
    /// unauthenticated.
    pub fn cookie(mut self, value: Option<String>) -> Self {
        self.cookie = value.filter(|v| !v.is_empty());
        self
    }

    /// Set the pause after each successful download. Tests set this to zero.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn build(self) -> Result<Session, ScrapeError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(value) = &self.cookie {
            let cookie = format!("{}={}", SESSION_COOKIE, value);
            let header = reqwest::header::HeaderValue::from_str(&cookie).map_err(|e| {
                ScrapeError::fetch("", "build session", Some(anyhow::Error::new(e)))
            })?;
            headers.insert(reqwest::header::COOKIE, header);
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::fetch("", "build session", Some(anyhow::Error::new(e))))?;

        Ok(Session {
            http,
            delay: self.delay,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An authenticated (or anonymous) blocking HTTP session.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::blocking::Client,
    delay: Duration,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Fetch one page as text.
    pub fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::debug!(url, "fetching page");
        let response = self.http.get(url).send().map_err(|e| {
            if e.is_timeout() {
                ScrapeError::timeout(url, "fetch", Some(anyhow::Error::new(e)))
            } else {
                ScrapeError::fetch(url, "fetch", Some(anyhow::Error::new(e)))
            }
        })?;

        let response = response
            .error_for_status()
            .map_err(|e| ScrapeError::fetch(url, "fetch", Some(anyhow::Error::new(e))))?;

        response
            .text()
            .map_err(|e| ScrapeError::fetch(url, "read body", Some(anyhow::Error::new(e))))
    }

    /// Fetch one page and write the body verbatim to `path`, then sleep the
    /// polite delay. No retries; the caller skips failed items.
    pub fn download_to(&self, url: &str, path: &Path) -> Result<(), ScrapeError> {
        let body = self.fetch(url)?;
        fs::write(path, &body)
            .map_err(|e| ScrapeError::io(url, "write page", Some(anyhow::Error::new(e))))?;
        tracing::debug!(url, path = %path.display(), "saved page");
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(())
    }
}
