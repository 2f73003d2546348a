//! Record store client for submitted service requests
//!
//! A thin PostgREST client reduced to the three calls the funnel makes:
//! insert a request, list them newest-first for the admin view, and update
//! a request's status.

use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Workflow status of a submitted service request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// A service request row as stored by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub service_type: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub project_title: String,
    pub project_description: String,
    pub budget_range: String,
    pub timeline: String,
    pub additional_notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Client for the `service_requests` table
pub struct RecordsClient {
    url: String,
    key: String,
    http_client: Client,
    access_token: Option<String>,
}

const TABLE: &str = "service_requests";

impl RecordsClient {
    pub fn new(url: &str, key: &str, http_client: Client) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            http_client,
            access_token: None,
        }
    }

    /// Attach the signed-in user's token so row-level security applies
    pub fn with_auth(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, TABLE)
    }

    fn bearer(&self) -> String {
        format!(
            "Bearer {}",
            self.access_token.as_deref().unwrap_or(&self.key)
        )
    }

    async fn error_from(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("record store call failed ({}): {}", status, body);
        ProviderError::classify(status, body)
    }

    /// Insert one service request
    pub async fn insert(&self, request: &ServiceRequest) -> Result<(), ProviderError> {
        let response = self
            .http_client
            .post(self.table_url())
            .header("apikey", &self.key)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(&vec![request])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(())
    }

    /// List all requests, newest first
    pub async fn list(&self) -> Result<Vec<ServiceRequest>, ProviderError> {
        let response = self
            .http_client
            .get(self.table_url())
            .header("apikey", &self.key)
            .header("Authorization", self.bearer())
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let rows: Vec<ServiceRequest> = response.json().await?;
        Ok(rows)
    }

    /// Update one request's workflow status
    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<(), ProviderError> {
        let response = self
            .http_client
            .patch(self.table_url())
            .header("apikey", &self.key)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{}", id))])
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(())
    }
}
