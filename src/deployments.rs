//! Typed operations for the deployments resource family.
//!
//! <https://docs.github.com/en/rest/deployments/deployments>

use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::github::{Creator, GithubClient};

/// One deployment record, mirroring the service's wire shape. Fields the
/// service omitted stay `None` and are skipped again on re-serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient_environment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_environment: Option<bool>,
}

/// One state transition of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub state: DeploymentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
}

/// Closed set of states a deployment status can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Error,
    Failure,
    Inactive,
    InProgress,
    Queued,
    Pending,
}

impl DeploymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Failure => "failure",
            Self::Inactive => "inactive",
            Self::InProgress => "in_progress",
            Self::Queued => "queued",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "failure" => Ok(Self::Failure),
            "inactive" => Ok(Self::Inactive),
            "in_progress" => Ok(Self::InProgress),
            "queued" => Ok(Self::Queued),
            "pending" => Ok(Self::Pending),
            other => Err(format!(
                "unknown deployment state `{other}` (expected one of error, failure, \
                 inactive, in_progress, queued, pending)"
            )),
        }
    }
}

/// Body for the create-deployment operation. Absent fields are left out of
/// the serialized body so the service applies its own defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDeployment {
    /// The ref to deploy; a branch, tag, or SHA.
    pub r#ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_contexts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for the create-deployment-status operation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDeploymentStatus {
    pub state: DeploymentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Full URL of the deployment log; replaces `target_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_inactive: Option<bool>,
}

/// Optional filters for the list operation. Only fields that are set appear
/// in the query string; an empty filter sends none at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListDeploymentsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// Typed operations over `/repos/{owner}/{repo}/deployments`.
///
/// Borrows the [`GithubClient`] so every operation shares one credential;
/// nothing is kept across calls.
pub struct DeploymentsApi<'a> {
    client: &'a GithubClient,
}

impl<'a> DeploymentsApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Lists deployments, in the order the service returns them.
    pub fn list(
        &self,
        owner: &str,
        repo: &str,
        filter: &ListDeploymentsFilter,
    ) -> Result<Vec<Deployment>> {
        let url = self.client.repo_url(owner, repo, "deployments")?;
        let body = self.client.get_with_query(url, filter, StatusCode::OK)?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn get(&self, owner: &str, repo: &str, id: u64) -> Result<Deployment> {
        let url = self
            .client
            .repo_url(owner, repo, &format!("deployments/{id}"))?;
        let body = self.client.get(url, StatusCode::OK)?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn create(
        &self,
        owner: &str,
        repo: &str,
        deployment: &CreateDeployment,
    ) -> Result<Deployment> {
        let url = self.client.repo_url(owner, repo, "deployments")?;
        let body = self.client.post(url, deployment, StatusCode::CREATED)?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn create_status(
        &self,
        owner: &str,
        repo: &str,
        id: u64,
        status: &CreateDeploymentStatus,
    ) -> Result<DeploymentStatus> {
        let url = self
            .client
            .repo_url(owner, repo, &format!("deployments/{id}/statuses"))?;
        let body = self.client.post(url, status, StatusCode::CREATED)?;
        Ok(serde_json::from_str(&body)?)
    }
}
