//! Adapter for the hosted backend: PostgREST row access plus GoTrue
//! auth routes, sharing one HTTP client and one access token.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::AuthProvider;
use crate::repository::{
    ChallengeRepository, ProfileRepository, ProgressRepository, QuestionRepository, Storage,
    StorageError,
};

mod auth;
mod challenge_repo;
mod mapping;
mod profile_repo;
mod progress_repo;
mod question_repo;

pub use auth::RestAuthProvider;

/// Connection settings for the hosted backend.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("QUIZ_BACKEND_URL").ok()?;
        let anon_key = std::env::var("QUIZ_ANON_KEY").ok()?;
        if base_url.trim().is_empty() || anon_key.trim().is_empty() {
            return None;
        }
        Some(Self { base_url, anon_key })
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Shared HTTP state: client, connection settings, and the access token
/// of the signed-in user (requests fall back to the anon key).
#[derive(Clone)]
pub(crate) struct RestClient {
    http: reqwest::Client,
    config: RestConfig,
    access_token: Arc<RwLock<Option<String>>>,
}

impl RestClient {
    pub(crate) fn new(config: RestConfig) -> Result<Self, RestInitError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            config,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!(
            "{}/auth/v1/{path}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.config.anon_key
    }

    pub(crate) fn bearer(&self) -> String {
        self.access_token
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    pub(crate) fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = token;
        }
    }

    pub(crate) fn has_access_token(&self) -> bool {
        self.access_token
            .read()
            .is_ok_and(|guard| guard.is_some())
    }

    /// Read rows from a table with PostgREST query parameters.
    pub(crate) async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StorageError> {
        let response = self
            .http
            .get(self.rest_url(table))
            .header("apikey", self.anon_key())
            .bearer_auth(self.bearer())
            .query(query)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let response = check_status(response)?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Insert rows; `prefer` carries PostgREST resolution hints for
    /// upserts.
    pub(crate) async fn post_rows<B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
        prefer: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .http
            .post(self.rest_url(table))
            .header("apikey", self.anon_key())
            .header("Prefer", prefer)
            .bearer_auth(self.bearer())
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        check_status(response)?;
        Ok(())
    }

    /// Patch rows matching the query filter.
    pub(crate) async fn patch_rows<B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<(), StorageError> {
        let response = self
            .http
            .patch(self.rest_url(table))
            .header("apikey", self.anon_key())
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer())
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        check_status(response)?;
        Ok(())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StorageError::Unauthorized);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound);
    }
    Err(StorageError::Connection(format!(
        "unexpected status {status}"
    )))
}

/// Table repositories backed by the hosted backend.
#[derive(Clone)]
pub struct RestRepository {
    pub(crate) client: RestClient,
}

/// The fully wired hosted backend: table storage plus the auth provider,
/// sharing one access token.
pub struct RestBackend {
    pub storage: Storage,
    pub auth: Arc<RestAuthProvider>,
}

impl RestBackend {
    /// Build storage and auth against the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the HTTP client cannot be constructed.
    pub fn connect(config: RestConfig) -> Result<Self, RestInitError> {
        let client = RestClient::new(config)?;
        let repo = RestRepository {
            client: client.clone(),
        };
        let auth = Arc::new(RestAuthProvider::new(client));

        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo.clone());
        let challenges: Arc<dyn ChallengeRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);

        Ok(Self {
            storage: Storage {
                profiles,
                challenges,
                questions,
                progress,
            },
            auth,
        })
    }

    #[must_use]
    pub fn auth_provider(&self) -> Arc<dyn AuthProvider> {
        Arc::clone(&self.auth) as Arc<dyn AuthProvider>
    }
}
