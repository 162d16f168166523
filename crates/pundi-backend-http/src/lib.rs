//! pundi-backend-http
//!
//! [`BackendClient`] over the hosted JSON endpoint: queries are
//! `GET <url>?action=<name>`, mutations are a JSON body POSTed to `<url>`.

use std::time::Duration;

use async_trait::async_trait;
use pundi_core::{BackendClient, BackendError, Mutation, SubmitAck};
use pundi_domain::{Category, Profile, Transaction};
use reqwest::{header::CONTENT_TYPE, Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const ACTION_PARAM: &str = "action";
const GET_CATEGORIES: &str = "getCategories";
const GET_TRANSACTIONS: &str = "getTransactions";
const GET_PROFILE: &str = "getProfile";
// The hosted script parses the raw body itself and only accepts plain text.
const BODY_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoint: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let endpoint = Url::parse(api_url.trim())
            .map_err(|err| BackendError::Transport(format!("invalid backend url: {err}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(BackendError::Transport(format!(
                "unsupported backend url scheme `{}`",
                endpoint.scheme()
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Transport(format!("http client setup failed: {err}")))?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn query_url(&self, action: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(ACTION_PARAM, action);
        url
    }

    #[instrument(name = "backend_http_query", skip(self))]
    async fn query<T: DeserializeOwned>(&self, action: &'static str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.query_url(action))
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn get_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.query(GET_CATEGORIES).await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>, BackendError> {
        self.query(GET_TRANSACTIONS).await
    }

    async fn get_profile(&self) -> Result<Profile, BackendError> {
        self.query(GET_PROFILE).await
    }

    #[instrument(name = "backend_http_submit", skip_all, fields(action = %mutation.action()))]
    async fn submit(&self, mutation: &Mutation) -> Result<SubmitAck, BackendError> {
        let body = serde_json::to_vec(mutation)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, BODY_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await.map_err(transport_error)?;
    debug!(status = status.as_u16(), len = bytes.len(), "backend response received");
    decode_body(&bytes)
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(bytes).map_err(BackendError::from)
}
