// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the remote backend API.
//!
//! The backend owns persistence, scoring and moderation state. This client
//! implements the repository traits on top of its JSON endpoints:
//! - `GET  /activities[?owner_id=|owner_ids=]`, `GET /activities/{id}`
//! - `POST /activities/{id}/validation`
//! - `GET  /groups/{id}`, `GET /groups/{id}/members`
//! - `GET  /users/{id}/memberships`
//! - `POST /groups/{id}/invitations/{user_id}`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};

use crate::db::{ActivityRepository, GroupRepository};
use crate::error::AppError;
use crate::models::{ActivityRecord, Group, GroupMembership, ValidationStatus};

/// Backend API client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct ValidationBody {
    status: ValidationStatus,
}

#[derive(Serialize)]
struct InvitationBody {
    accept: bool,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .authorize(self.http.get(self.url(path)).query(query))
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        check_response_json(response).await
    }

    /// Like `get_json`, but a 404 yields `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        match self.get_json(path, &[]).await {
            Ok(value) => Ok(Some(value)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Map a non-success backend status onto an application error.
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(body.to_string()),
        StatusCode::CONFLICT => AppError::Conflict(body.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!("Backend rate limit hit (429)");
            AppError::Backend("rate limited".to_string())
        }
        _ => AppError::Backend(format!("HTTP {}: {}", status, body)),
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_for_status(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Backend(format!("JSON parse error: {}", e)))
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl ActivityRepository for BackendClient {
    async fn list_for_owner(&self, owner_id: u64) -> Result<Vec<ActivityRecord>, AppError> {
        self.get_json("/activities", &[("owner_id", owner_id.to_string())])
            .await
    }

    async fn list_for_owners(&self, owner_ids: &[u64]) -> Result<Vec<ActivityRecord>, AppError> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get_json("/activities", &[("owner_ids", join_ids(owner_ids))])
            .await
    }

    async fn list_all(&self) -> Result<Vec<ActivityRecord>, AppError> {
        self.get_json("/activities", &[]).await
    }

    async fn get(&self, id: u64) -> Result<Option<ActivityRecord>, AppError> {
        self.get_optional(&format!("/activities/{}", id)).await
    }

    async fn set_validation(
        &self,
        id: u64,
        status: ValidationStatus,
    ) -> Result<ActivityRecord, AppError> {
        tracing::info!(activity_id = id, status = status.as_str(), "Sending validation decision");
        self.post_json(
            &format!("/activities/{}/validation", id),
            &ValidationBody { status },
        )
        .await
    }
}

#[async_trait]
impl GroupRepository for BackendClient {
    async fn get_group(&self, group_id: u64) -> Result<Option<Group>, AppError> {
        self.get_optional(&format!("/groups/{}", group_id)).await
    }

    async fn memberships_for_user(&self, user_id: u64) -> Result<Vec<GroupMembership>, AppError> {
        self.get_json(&format!("/users/{}/memberships", user_id), &[])
            .await
    }

    async fn members_of(&self, group_id: u64) -> Result<Vec<GroupMembership>, AppError> {
        self.get_json(&format!("/groups/{}/members", group_id), &[])
            .await
    }

    async fn respond_to_invitation(
        &self,
        group_id: u64,
        user_id: u64,
        accept: bool,
    ) -> Result<Option<GroupMembership>, AppError> {
        self.post_json(
            &format!("/groups/{}/invitations/{}", group_id, user_id),
            &InvitationBody { accept },
        )
        .await
    }
}
