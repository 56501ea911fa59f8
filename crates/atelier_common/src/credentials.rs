// --- File: crates/atelier_common/src/credentials.rs ---
//! Credential provider abstraction.
//!
//! Providers know how to load a cached credential and how to obtain a fresh
//! one. Obtaining a fresh one may need a human: the provider is handed an
//! [`AuthorizationPrompt`] that shows the authorization URL and returns the
//! code the operator pasted back.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::services::BoxFuture;

/// Tokens expiring within this window are treated as already expired.
const EXPIRY_SKEW_SECS: i64 = 30;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid client secrets: {0}")]
    InvalidSecrets(String),

    #[error("token endpoint rejected the request: {0}")]
    Exchange(String),

    #[error("token request failed: {0}")]
    Http(String),

    #[error("authorization prompt failed: {0}")]
    Prompt(String),
}

/// An OAuth access credential as stored in the token cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Credential {
    /// A credential without expiry is considered valid until the provider
    /// says otherwise.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_SKEW_SECS) <= now,
            None => false,
        }
    }
}

/// Interactive step of an authorization flow.
pub trait AuthorizationPrompt: Send + Sync {
    /// Present `url` to the operator and return the authorization code.
    fn authorize<'a>(&'a self, url: &'a str) -> BoxFuture<'a, String, CredentialError>;
}

/// Source of credentials for one provider.
pub trait CredentialProvider: Send + Sync {
    /// Load the cached credential. A missing or unreadable cache is `None`.
    fn load(&self) -> BoxFuture<'_, Option<Credential>, CredentialError>;

    /// Obtain a fresh credential, prompting through `prompt` when needed.
    fn refresh<'a>(
        &'a self,
        prompt: &'a dyn AuthorizationPrompt,
    ) -> BoxFuture<'a, Credential, CredentialError>;
}

/// A prompt for unattended processes: every authorization attempt fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompt;

impl AuthorizationPrompt for NonInteractivePrompt {
    fn authorize<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, String, CredentialError> {
        Box::pin(async {
            Err(CredentialError::Prompt(
                "interactive authorization is not available".to_string(),
            ))
        })
    }
}

/// A provider holding one fixed credential. Refresh hands back the same value.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            credential: Credential {
                access_token: access_token.into(),
                token_type: default_token_type(),
                refresh_token: None,
                expiry: None,
            },
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn load(&self) -> BoxFuture<'_, Option<Credential>, CredentialError> {
        let credential = self.credential.clone();
        Box::pin(async move { Ok(Some(credential)) })
    }

    fn refresh<'a>(
        &'a self,
        _prompt: &'a dyn AuthorizationPrompt,
    ) -> BoxFuture<'a, Credential, CredentialError> {
        let credential = self.credential.clone();
        Box::pin(async move { Ok(credential) })
    }
}

/// Combines a provider with a prompt and caches the current credential.
///
/// Concurrent callers are serialized so at most one refresh (and one prompt)
/// runs at a time.
pub struct TokenSource {
    name: String,
    provider: Arc<dyn CredentialProvider>,
    prompt: Arc<dyn AuthorizationPrompt>,
    state: Mutex<TokenState>,
}

#[derive(Default)]
struct TokenState {
    current: Option<Credential>,
    /// Set after a rejection: the cached credential is the rejected one.
    skip_cache: bool,
}

impl TokenSource {
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn CredentialProvider>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            prompt,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Token source over a fixed access token, never prompting.
    pub fn fixed(name: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::new(
            name,
            Arc::new(StaticCredentialProvider::new(access_token)),
            Arc::new(NonInteractivePrompt),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a credential that is not expired, loading or refreshing as needed.
    ///
    /// After [`invalidate`](Self::invalidate) the provider cache is bypassed
    /// until a refresh succeeds.
    pub async fn credential(&self) -> Result<Credential, CredentialError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(credential) = state.current.as_ref() {
            if !credential.is_expired(now) {
                return Ok(credential.clone());
            }
        }

        if !state.skip_cache {
            if let Some(credential) = self.provider.load().await? {
                if !credential.is_expired(now) {
                    debug!("{}: using cached credential", self.name);
                    state.current = Some(credential.clone());
                    return Ok(credential);
                }
            }
        }

        info!("{}: refreshing credential", self.name);
        let credential = self.provider.refresh(self.prompt.as_ref()).await?;
        state.current = Some(credential.clone());
        state.skip_cache = false;
        Ok(credential)
    }

    pub async fn access_token(&self) -> Result<String, CredentialError> {
        Ok(self.credential().await?.access_token)
    }

    /// Drop the current credential after the provider rejected it (HTTP 401).
    /// The next call refreshes instead of reusing the cached token.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.current = None;
        state.skip_cache = true;
    }
}
