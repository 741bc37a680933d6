use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use quiz_core::model::UserId;

use super::RestClient;
use crate::auth::{AuthError, AuthProvider, Identity};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

impl AuthUser {
    fn into_identity(self) -> Identity {
        Identity::new(self.id, self.email.unwrap_or_default())
    }
}

/// Sign-in and sign-up share one response shape; sign-up may come back
/// without a session when the project requires email confirmation, in
/// which case the user object sits at the top level.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    email: Option<String>,
}

impl SessionResponse {
    fn into_parts(self) -> Option<(Option<String>, Identity)> {
        if let Some(user) = self.user {
            return Some((self.access_token, user.into_identity()));
        }
        let id = self.id?;
        Some((
            self.access_token,
            Identity::new(id, self.email.unwrap_or_default()),
        ))
    }
}

/// Identity provider backed by the hosted auth endpoint.
///
/// Successful sign-in/sign-up store the access token on the shared REST
/// client so row requests run as the signed-in user, and push the new
/// identity to subscribers.
pub struct RestAuthProvider {
    client: RestClient,
    session: Arc<watch::Sender<Option<Identity>>>,
}

impl RestAuthProvider {
    pub(crate) fn new(client: RestClient) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            client,
            session: Arc::new(tx),
        }
    }

    async fn token_request(
        &self,
        path: &str,
        query: &[(&str, &str)],
        credentials: Credentials<'_>,
        rejected: AuthError,
    ) -> Result<(Option<String>, Identity), AuthError> {
        let response = self
            .client
            .http
            .post(self.client.auth_url(path))
            .header("apikey", self.client.anon_key())
            .query(query)
            .json(&credentials)
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(rejected);
        }
        if !status.is_success() {
            return Err(AuthError::Connection(format!("unexpected status {status}")));
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        body.into_parts()
            .ok_or_else(|| AuthError::Serialization("response carried no user".into()))
    }
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (token, identity) = self
            .token_request(
                "token",
                &[("grant_type", "password")],
                Credentials { email, password },
                AuthError::InvalidCredentials,
            )
            .await?;

        self.client.set_access_token(token);
        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (token, identity) = self
            .token_request(
                "signup",
                &[],
                Credentials { email, password },
                AuthError::SignUpRejected,
            )
            .await?;

        // No token means the project wants email confirmation first; the
        // account exists but there is no session to establish.
        if token.is_some() {
            self.client.set_access_token(token);
            self.session.send_replace(Some(identity.clone()));
        }
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let bearer = self.client.bearer();
        let had_session = self.client.has_access_token();
        self.client.set_access_token(None);
        self.session.send_replace(None);

        if !had_session {
            return Ok(());
        }

        let result = self
            .client
            .http
            .post(self.client.auth_url("logout"))
            .header("apikey", self.client.anon_key())
            .bearer_auth(bearer)
            .send()
            .await;
        if let Err(err) = result {
            warn!("sign-out request failed after local session clear: {err}");
            return Err(AuthError::Connection(err.to_string()));
        }
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        if !self.client.has_access_token() {
            return Ok(None);
        }

        let response = self
            .client
            .http
            .get(self.client.auth_url("user"))
            .header("apikey", self.client.anon_key())
            .bearer_auth(self.client.bearer())
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Stale token; the session is simply gone.
            self.client.set_access_token(None);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::Connection(format!("unexpected status {status}")));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        Ok(Some(user.into_identity()))
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }
}
