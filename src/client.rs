//! Backend API client seam.
//!
//! The flow talks to the jobsite backend for exactly two things: verifying a
//! scanned QR token and recording the check-in as a diary entry. Both sit
//! behind the `CheckInClient` trait so tests can substitute a stub.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkin::model::CheckInType;
use crate::error::ApiError;

/// Jobsite details returned by QR token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsiteInfo {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A check-in submission for the backend.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInRequest {
    pub jobsite_id: i64,
    pub token: String,
    pub name: String,
    pub contact: String,
    pub check_in_type: CheckInType,
    /// Company name — required for contractors, absent for visitors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Induction status — contractors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inducted: Option<bool>,
}

/// The backend's record of a completed check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub success: bool,
    pub message: String,
    pub jobsite_name: String,
    pub check_in_time: DateTime<Utc>,
    pub diary_entry_id: i64,
}

/// Client for the jobsite backend API.
#[async_trait]
pub trait CheckInClient: Send + Sync {
    /// Verify a scanned QR token and resolve the jobsite it belongs to.
    async fn verify_qr_token(&self, token: &str) -> Result<JobsiteInfo, ApiError>;

    /// Record a check-in; the backend creates the diary entry.
    async fn check_in(&self, request: &CheckInRequest) -> Result<CheckInRecord, ApiError>;
}

/// `reqwest`-backed client for the real backend.
pub struct HttpCheckInClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCheckInClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl CheckInClient for HttpCheckInClient {
    async fn verify_qr_token(&self, token: &str) -> Result<JobsiteInfo, ApiError> {
        let endpoint = self.url("/api/qrcodes/verify");
        let response = self
            .http
            .post(&endpoint)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(ApiError::TokenRejected(
                "invalid or expired QR code".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(ApiError::RequestFailed {
                endpoint,
                reason: format!("status {}", response.status()),
            });
        }

        response
            .json::<JobsiteInfo>()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                endpoint,
                reason: e.to_string(),
            })
    }

    async fn check_in(&self, request: &CheckInRequest) -> Result<CheckInRecord, ApiError> {
        let endpoint = self.url("/api/check-ins");
        let response = self.http.post(&endpoint).json(request).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::RequestFailed {
                endpoint,
                reason: format!("status {}", response.status()),
            });
        }

        response
            .json::<CheckInRecord>()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                endpoint,
                reason: e.to_string(),
            })
    }
}
