use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::config::IdentityConfig;
use crate::domain::ports::{IdentityError, IdentityProvider, IdentitySession};

/// Client of a GoTrue-compatible auth server (`<url>/auth/v1`).
pub struct GoTrueIdentityProvider {
    client: reqwest::Client,
    base: Url,
    anon_key: SecretString,
    providers: Vec<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

impl GoTrueIdentityProvider {
    /// # Errors
    /// Returns an error if `config.url` is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &IdentityConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&format!("{}/auth/v1/", config.url.trim_end_matches('/')))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base,
            anon_key: config.anon_key.clone(),
            providers: config.oauth_providers.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base
            .join(path)
            .map_err(|e| IdentityError::Transport(e.to_string()))
    }

    fn with_key(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", self.anon_key.expose_secret())
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, IdentityError> {
        let response = self
            .with_key(builder)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        tracing::debug!(status = status.as_u16(), %message, "identity provider refused request");
        Err(IdentityError::Rejected(message))
    }

    async fn token(
        &self,
        grant_type: &str,
        body: &serde_json::Value,
    ) -> Result<IdentitySession, IdentityError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let tokens: TokenResponse = self
            .execute(self.client.post(url).json(body))
            .await?
            .json()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        Ok(IdentitySession {
            access_token: SecretString::from(tokens.access_token),
            expires_in: tokens.expires_in,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        self.token("password", &json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        let url = self.endpoint("signup")?;
        self.execute(
            self.client
                .post(url)
                .json(&json!({ "email": email, "password": password })),
        )
        .await?;
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<(), IdentityError> {
        let mut url = self.endpoint("recover")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        self.execute(self.client.post(url).json(&json!({
            "email": email,
            "code_challenge": code_challenge,
            "code_challenge_method": "s256",
        })))
        .await?;
        Ok(())
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, IdentityError> {
        if !self.providers.iter().any(|p| p == provider) {
            return Err(IdentityError::UnsupportedProvider(provider.to_owned()));
        }
        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "s256");
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<IdentitySession, IdentityError> {
        self.token(
            "pkce",
            &json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
        )
        .await
    }

    async fn update_password(
        &self,
        access_token: &SecretString,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let url = self.endpoint("user")?;
        self.execute(
            self.client
                .put(url)
                .bearer_auth(access_token.expose_secret())
                .json(&json!({ "password": new_password })),
        )
        .await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &SecretString) -> Result<(), IdentityError> {
        let url = self.endpoint("logout")?;
        self.execute(
            self.client
                .post(url)
                .bearer_auth(access_token.expose_secret()),
        )
        .await?;
        Ok(())
    }
}
