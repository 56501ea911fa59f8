// --- File: crates/atelier_common/src/oauth.rs ---
//! Google OAuth2 implementation of [`CredentialProvider`].
//!
//! Works with the client-secrets JSON downloaded from the Google console
//! ("installed" or "web" application) and a JSON token cache on disk. The
//! grants themselves go through the `oauth2` crate.

use chrono::Utc;
use oauth2::basic::{BasicClient, BasicErrorResponse, BasicTokenResponse, BasicTokenType};
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, HttpClientError, RedirectUrl, RefreshToken, RequestTokenError, Scope,
    TokenResponse, TokenUrl,
};
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::credentials::{AuthorizationPrompt, Credential, CredentialError, CredentialProvider};
use crate::http::client::{create_client, DEFAULT_TIMEOUT_SECS};
use crate::services::BoxFuture;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const OUT_OF_BAND_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// OAuth client with its authorization and token endpoints configured.
type GoogleClient = BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

type TokenError = RequestTokenError<HttpClientError<reqwest::Error>, BasicErrorResponse>;

/// OAuth client identity from the Google console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parse a Google client-secrets document.
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let file: SecretsFile = serde_json::from_str(json)
            .map_err(|e| CredentialError::InvalidSecrets(e.to_string()))?;
        file.installed.or(file.web).ok_or_else(|| {
            CredentialError::InvalidSecrets(
                "expected an \"installed\" or \"web\" client section".to_string(),
            )
        })
    }

    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(OUT_OF_BAND_REDIRECT)
    }

    fn oauth_client(&self) -> Result<GoogleClient, CredentialError> {
        let invalid = |what: &str, e: oauth2::url::ParseError| {
            CredentialError::InvalidSecrets(format!("{}: {}", what, e))
        };

        Ok(BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(self.auth_uri.clone()).map_err(|e| invalid("auth_uri", e))?)
            .set_token_uri(TokenUrl::new(self.token_uri.clone()).map_err(|e| invalid("token_uri", e))?)
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_uri().to_string())
                    .map_err(|e| invalid("redirect_uri", e))?,
            )
            // Installed-app clients send their secret in the form body.
            .set_auth_type(AuthType::RequestBody))
    }
}

fn into_credential(token: BasicTokenResponse, previous_refresh_token: Option<String>) -> Credential {
    let token_type = match token.token_type() {
        BasicTokenType::Bearer => "Bearer".to_string(),
        other => other.as_ref().to_string(),
    };
    Credential {
        access_token: token.access_token().secret().clone(),
        token_type,
        // Google omits the refresh token when refreshing; keep the old one.
        refresh_token: token
            .refresh_token()
            .map(|t| t.secret().clone())
            .or(previous_refresh_token),
        expiry: token
            .expires_in()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| Utc::now() + d),
    }
}

fn token_error(err: TokenError) -> CredentialError {
    match err {
        RequestTokenError::ServerResponse(response) => CredentialError::Exchange(response.to_string()),
        RequestTokenError::Request(e) => CredentialError::Http(e.to_string()),
        RequestTokenError::Parse(e, body) => CredentialError::Exchange(format!(
            "{}: {}",
            e,
            String::from_utf8_lossy(&body)
        )),
        RequestTokenError::Other(message) => CredentialError::Exchange(message),
    }
}

/// Credential provider for one Google API scope.
pub struct GoogleOAuthProvider {
    oauth: GoogleClient,
    scope: String,
    token_path: PathBuf,
    http: Client,
}

impl GoogleOAuthProvider {
    pub fn new(
        secrets: ClientSecrets,
        scope: impl Into<String>,
        token_path: impl Into<PathBuf>,
    ) -> Result<Self, CredentialError> {
        // Token endpoints must not be followed through redirects.
        let http = create_client(DEFAULT_TIMEOUT_SECS, false)
            .map_err(|e| CredentialError::Http(e.to_string()))?;
        Ok(Self {
            oauth: secrets.oauth_client()?,
            scope: scope.into(),
            token_path: token_path.into(),
            http,
        })
    }

    /// Build a provider from the client-secrets file on disk.
    pub fn from_files(
        credentials_path: impl AsRef<Path>,
        token_path: impl Into<PathBuf>,
        scope: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let path = credentials_path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CredentialError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::new(ClientSecrets::from_json(&json)?, scope, token_path)
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// URL the operator must visit to grant offline access.
    pub fn authorization_url(&self) -> String {
        let (url, _state) = self
            .oauth
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(self.scope.clone()))
            .add_extra_param("access_type", "offline")
            .url();
        url.to_string()
    }

    async fn read_cache(&self) -> Option<Credential> {
        let bytes = match tokio::fs::read(&self.token_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cannot read token cache {}: {}", self.token_path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice::<Credential>(&bytes) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!("Ignoring unparsable token cache {}: {}", self.token_path.display(), e);
                None
            }
        }
    }

    async fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        let io_error = |e: std::io::Error| CredentialError::Io {
            path: self.token_path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
            }
        }

        let json = serde_json::to_vec_pretty(credential).map_err(|e| CredentialError::Io {
            path: self.token_path.display().to_string(),
            message: e.to_string(),
        })?;
        tokio::fs::write(&self.token_path, json).await.map_err(io_error)?;

        info!("Saved credential to {}", self.token_path.display());
        Ok(())
    }

    /// Trade a refresh token for a new access token.
    pub async fn refresh_with(&self, refresh_token: &str) -> Result<Credential, CredentialError> {
        let token = RefreshToken::new(refresh_token.to_string());
        let response = self
            .oauth
            .exchange_refresh_token(&token)
            .request_async(&self.http)
            .await
            .map_err(token_error)?;
        Ok(into_credential(response, Some(refresh_token.to_string())))
    }

    /// Trade an authorization code for a credential.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, CredentialError> {
        let response = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(token_error)?;
        Ok(into_credential(response, None))
    }

    async fn obtain(&self, prompt: &dyn AuthorizationPrompt) -> Result<Credential, CredentialError> {
        if let Some(refresh_token) = self.read_cache().await.and_then(|c| c.refresh_token) {
            match self.refresh_with(&refresh_token).await {
                Ok(credential) => {
                    self.save(&credential).await?;
                    return Ok(credential);
                }
                Err(e) => warn!("Refresh token rejected, falling back to authorization: {}", e),
            }
        }

        let url = self.authorization_url();
        let code = prompt.authorize(&url).await?;
        let credential = self.exchange_code(code.trim()).await?;
        self.save(&credential).await?;
        Ok(credential)
    }
}

impl CredentialProvider for GoogleOAuthProvider {
    fn load(&self) -> BoxFuture<'_, Option<Credential>, CredentialError> {
        Box::pin(async move { Ok(self.read_cache().await) })
    }

    fn refresh<'a>(
        &'a self,
        prompt: &'a dyn AuthorizationPrompt,
    ) -> BoxFuture<'a, Credential, CredentialError> {
        Box::pin(self.obtain(prompt))
    }
}
