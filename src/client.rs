use std::fmt::{self, Display};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::models::{Credentials, NewUser};

/// Base URL of the public demo instance.
pub const DEMO_BASE_URL: &str = "https://reqres.in/api";

/// Verb used for update calls. The service treats both the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    Patch,
}

impl Display for UpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMethod::Put => write!(f, "PUT"),
            UpdateMethod::Patch => write!(f, "PATCH"),
        }
    }
}

/// Thin client for the user and resource endpoints of the demo service.
///
/// Methods map one to one onto endpoints and hand back the raw
/// [`Response`]; asserting on it is the caller's business.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Client against an arbitrary base URL. A trailing slash is dropped so
    /// joined paths stay clean; tests point this at a local mock server.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Client against the public demo instance.
    pub fn demo() -> Self {
        Self::new(DEMO_BASE_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: impl Display) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn get_users(&self, page: u32, per_page: u32) -> reqwest::Result<Response> {
        let url = self.endpoint("users");
        debug!(%url, page, per_page, "listing users");
        self.client
            .get(url)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await
    }

    pub async fn get_user(&self, id: impl Display) -> reqwest::Result<Response> {
        let url = self.endpoint(format_args!("users/{}", id));
        debug!(%url, "fetching user");
        self.client.get(url).send().await
    }

    pub async fn create_user(&self, body: &NewUser) -> reqwest::Result<Response> {
        let url = self.endpoint("users");
        debug!(%url, name = %body.name, "creating user");
        self.client.post(url).json(body).send().await
    }

    /// Updates a user with the given body, via PUT or PATCH.
    pub async fn update_user(
        &self,
        id: impl Display,
        body: &Value,
        method: UpdateMethod,
    ) -> reqwest::Result<Response> {
        let url = self.endpoint(format_args!("users/{}", id));
        debug!(%url, %method, "updating user");
        let request = match method {
            UpdateMethod::Put => self.client.put(url),
            UpdateMethod::Patch => self.client.patch(url),
        };
        request.json(body).send().await
    }

    pub async fn delete_user(&self, id: impl Display) -> reqwest::Result<Response> {
        let url = self.endpoint(format_args!("users/{}", id));
        debug!(%url, "deleting user");
        self.client.delete(url).send().await
    }

    pub async fn register(&self, body: &Credentials) -> reqwest::Result<Response> {
        let url = self.endpoint("register");
        debug!(%url, "registering");
        self.client.post(url).json(body).send().await
    }

    pub async fn login(&self, body: &Credentials) -> reqwest::Result<Response> {
        let url = self.endpoint("login");
        debug!(%url, "logging in");
        self.client.post(url).json(body).send().await
    }

    pub async fn get_resources(&self, page: u32, per_page: u32) -> reqwest::Result<Response> {
        let url = self.endpoint("resource");
        debug!(%url, page, per_page, "listing resources");
        self.client
            .get(url)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await
    }

    pub async fn get_resource(&self, id: impl Display) -> reqwest::Result<Response> {
        let url = self.endpoint(format_args!("resource/{}", id));
        debug!(%url, "fetching resource");
        self.client.get(url).send().await
    }

    /// Updates a resource via PUT or PATCH. The endpoint takes no body; the
    /// service answers with an update receipt regardless.
    pub async fn update_resource(
        &self,
        id: impl Display,
        method: UpdateMethod,
    ) -> reqwest::Result<Response> {
        let url = self.endpoint(format_args!("resource/{}", id));
        debug!(%url, %method, "updating resource");
        let request = match method {
            UpdateMethod::Put => self.client.put(url),
            UpdateMethod::Patch => self.client.patch(url),
        };
        request.send().await
    }

    pub async fn delete_resource(&self, id: impl Display) -> reqwest::Result<Response> {
        let url = self.endpoint(format_args!("resource/{}", id));
        debug!(%url, "deleting resource");
        self.client.delete(url).send().await
    }
}
