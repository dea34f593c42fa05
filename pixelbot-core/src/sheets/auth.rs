// src/sheets/auth.rs
//
// OAuth2 service-account flow: sign a short-lived RS256 assertion with the
// account's private key and trade it for a bearer token.

use std::path::Path;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::Error;
use crate::utils::time::current_epoch;

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive.readonly";
const ASSERTION_TTL_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields we need from a downloaded service-account JSON key.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(|e| Error::Auth(format!("invalid service account key: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: i64,
}

pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            key,
            http,
            token: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A bearer token valid for at least another minute.
    pub async fn access_token(&self) -> Result<String, Error> {
        let mut guard = self.token.lock().await;
        let now = current_epoch();
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(cached.access_token.clone());
            }
        }

        debug!("(SheetsAuth) Requesting access token for {}", self.key.client_email);
        let fresh = self.request_token(now).await?;
        let token = fresh.access_token.clone();
        *guard = Some(CachedToken {
            access_token: fresh.access_token,
            expires_at: now + fresh.expires_in,
        });
        info!("(SheetsAuth) Access token refreshed; valid for {}s", fresh.expires_in);
        Ok(token)
    }

    fn assertion(&self, now: i64) -> Result<String, Error> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| Error::Auth(format!("unusable service account private key: {e}")))?;
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| Error::Auth(format!("failed to sign token assertion: {e}")))
    }

    async fn request_token(&self, now: i64) -> Result<TokenResponse, Error> {
        let assertion = self.assertion(now)?;
        let resp = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("token endpoint returned {status}: {body}")));
        }
        Ok(resp.json::<TokenResponse>().await?)
    }
}
