use crate::config::Credentials;
use crate::types::{SarError, SarResult};
use serde::Deserialize;
use std::time::Duration;

/// Bearer token obtained from the identity endpoint. Expiry is managed by
/// the provider; the token is used for exactly one request.
#[derive(Clone)]
pub struct AccessToken {
    bearer: String,
    expires_in: Option<u64>,
}

impl AccessToken {
    pub fn bearer(&self) -> &str {
        &self.bearer
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("bearer", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// OAuth2 client-credentials exchange against the CDSE identity endpoint
pub struct AuthClient {
    token_url: String,
    client: reqwest::blocking::Client,
}

impl AuthClient {
    pub fn new(token_url: &str) -> SarResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("sarview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SarError::Http)?;

        Ok(Self {
            token_url: token_url.to_string(),
            client,
        })
    }

    /// Perform the client-credentials grant. Any transport failure, non-2xx
    /// status, or token-less response body is fatal: without a bearer token
    /// the data request cannot succeed.
    pub fn fetch_token(&self, credentials: &Credentials) -> SarResult<AccessToken> {
        log::info!("Requesting access token from {}", self.token_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response = self.client.post(&self.token_url).form(&params).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SarError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                truncate(&body, 200)
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| SarError::Auth(format!("invalid token response: {}", e)))?;

        let bearer = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SarError::Auth("response carried no access_token".to_string()))?;

        log::info!(
            "Authentication successful, token expires in {} s",
            token
                .expires_in
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string())
        );

        Ok(AccessToken {
            bearer,
            expires_in: token.expires_in,
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
