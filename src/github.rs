//! Credential handling and the composite GitHub client.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::deployments::DeploymentsApi;
use crate::error::{check_status, Result};

pub const GITHUB_API_BASE_URL: &str = "https://api.github.com/";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT_VALUE: &str = concat!("ghdeploy/", env!("CARGO_PKG_VERSION"));

/// Personal access token used to authenticate every request.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
}

/// Account that created a deployment, as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub login: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravatar_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gists_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repos_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_events_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_admin: Option<bool>,
}

/// Composite handle over one credential and the resource clients that share
/// it. Performs no I/O of its own beyond the request plumbing the resource
/// clients call into.
pub struct GithubClient {
    credential: Credential,
    base_url: Url,
    http: Client,
}

impl GithubClient {
    pub fn new(credential: Credential) -> Result<Self> {
        Ok(Self::with_base_url(credential, Url::parse(GITHUB_API_BASE_URL)?))
    }

    /// Points the client at a different API host. Used by the `--api-url`
    /// flag and by tests running against a local mock server.
    pub fn with_base_url(credential: Credential, base_url: Url) -> Self {
        Self {
            credential,
            base_url,
            http: Client::new(),
        }
    }

    pub fn token(&self) -> &str {
        &self.credential.token
    }

    pub fn deployments(&self) -> DeploymentsApi<'_> {
        DeploymentsApi::new(self)
    }

    /// Joins `part` onto the `/repos/{owner}/{repo}/` collection.
    pub(crate) fn repo_url(&self, owner: &str, repo: &str, part: &str) -> Result<Url> {
        let url = self
            .base_url
            .join("repos/")?
            .join(&format!("{owner}/"))?
            .join(&format!("{repo}/"))?
            .join(part)?;
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url, expected: StatusCode) -> Result<String> {
        self.send(self.request(Method::GET, url), expected)
    }

    pub(crate) fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
        expected: StatusCode,
    ) -> Result<String> {
        self.send(self.request(Method::GET, url).query(query), expected)
    }

    pub(crate) fn post<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        expected: StatusCode,
    ) -> Result<String> {
        self.send(self.request(Method::POST, url).json(body), expected)
    }

    // Every request carries the same auth header; a missing or bad token is
    // sent as-is and surfaces as a remote 401, never a local check.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .bearer_auth(&self.credential.token)
    }

    fn send(&self, request: RequestBuilder, expected: StatusCode) -> Result<String> {
        let response = request.send()?;
        debug!(status = %response.status(), url = %response.url(), "response received");
        check_status(response, expected)
    }
}
