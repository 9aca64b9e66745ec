// ABOUTME: OAuth2 authorization-code helper: build the authorize URL, read the pasted
// ABOUTME: redirect, and exchange the code for a bearer token with one POST.

//! Manual OAuth2 code-for-token exchange.
//!
//! Canvas developer keys use the standard authorization-code flow. This
//! helper covers the non-browser half: the user opens the authorization
//! URL, approves, and pastes the redirect URL back; we pull the `code`
//! query parameter out and POST it to the token endpoint. One call, no
//! retries; any failure is fatal for the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::BROWSER_USER_AGENT;
use crate::error::ScrapeError;

/// Response body of the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Build the authorization URL the user opens in a browser.
pub fn authorize_url(
    base_url: &str,
    client_id: &str,
    redirect_uri: &str,
) -> Result<String, ScrapeError> {
    let base = Url::parse(base_url)
        .map_err(|e| ScrapeError::invalid_url(base_url, "authorize url", Some(e.into())))?;
    let url = Url::parse_with_params(
        base.join("/login/oauth2/auth")
            .map_err(|e| ScrapeError::invalid_url(base_url, "authorize url", Some(e.into())))?
            .as_str(),
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
        ],
    )
    .map_err(|e| ScrapeError::invalid_url(base_url, "authorize url", Some(e.into())))?;
    Ok(url.to_string())
}

/// Pull the `code` query parameter out of the pasted redirect URL.
pub fn code_from_redirect(pasted: &str) -> Result<String, ScrapeError> {
    let url = Url::parse(pasted.trim())
        .map_err(|e| ScrapeError::invalid_url(pasted, "read redirect", Some(e.into())))?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| {
            ScrapeError::token(pasted, "read redirect", Some(anyhow::anyhow!("no code parameter")))
        })
}

/// Exchange an authorization code for a bearer token.
pub fn exchange_code(
    base_url: &str,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<TokenResponse, ScrapeError> {
    let base = Url::parse(base_url)
        .map_err(|e| ScrapeError::invalid_url(base_url, "token exchange", Some(e.into())))?;
    let endpoint = base
        .join("/login/oauth2/token")
        .map_err(|e| ScrapeError::invalid_url(base_url, "token exchange", Some(e.into())))?;

    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(|e| ScrapeError::token(endpoint.as_str(), "token exchange", Some(e.into())))?;

    tracing::debug!(endpoint = %endpoint, "exchanging authorization code");
    let response = http
        .post(endpoint.clone())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("code", code),
        ])
        .send()
        .map_err(|e| ScrapeError::token(endpoint.as_str(), "token exchange", Some(e.into())))?
        .error_for_status()
        .map_err(|e| ScrapeError::token(endpoint.as_str(), "token exchange", Some(e.into())))?;

    response
        .json::<TokenResponse>()
        .map_err(|e| ScrapeError::token(endpoint.as_str(), "decode token", Some(e.into())))
}
