use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::store::{NewObject, ObjectStore, StoredObject};

pub const DEFAULT_ENDPOINT: &str = "https://api.m3o.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Objects created through a hosted "Space" storage API.
///
/// The object body travels base64-encoded in a JSON request.
#[derive(Clone)]
pub struct SpaceStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for SpaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceStore")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    object: String,
    visibility: &'a str,
}

#[derive(Deserialize)]
struct CreateResponse {
    url: Option<String>,
}

impl SpaceStore {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, StorageError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(StorageError::Config("space API key is empty".to_string()));
        }
        let client = Client::builder()
            .user_agent(concat!("quire/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ObjectStore for SpaceStore {
    async fn create(&self, object: NewObject) -> Result<StoredObject, StorageError> {
        let body = CreateRequest {
            name: &object.name,
            object: STANDARD.encode(&object.body),
            visibility: object.visibility.as_str(),
        };
        let resp = self
            .client
            .post(format!("{}/space/Create", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StorageError::Space {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreateResponse = resp.json().await?;
        let url = created
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StorageError::Response("missing url".to_string()))?;
        tracing::debug!(name = %object.name, url = %url, "object created");

        Ok(StoredObject {
            name: object.name,
            url,
        })
    }
}
