//! API client for communicating with the event-management REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests to fetch events, users and reference data.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionData;
use crate::i18n::TranslationCatalog;
use crate::models::{Event, Paginated, QualificationCategory, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Page size requested from list endpoints.
const PAGE_SIZE: u32 = 500;

/// Upper bound on followed `next` links, guards against a looping paginator.
const MAX_PAGES: usize = 100;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: i64,
}

/// Everything the eligibility check needs, fetched in one go.
#[derive(Debug, Clone)]
pub struct OrganizerInputs {
    pub event: Event,
    pub user: User,
    pub categories: Vec<QualificationCategory>,
}

/// API client for the backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for `base_url` (e.g. `https://example.org/api`)
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Log in and return session data
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionData> {
        let url = self.url("auth/login/");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest { email, password })
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        let login: LoginResponse = response.json().await.context("Failed to parse login response")?;

        Ok(SessionData {
            token: login.token,
            user_id: login.user.id,
            email: email.to_string(),
            api_url: self.base_url.clone(),
            created_at: Utc::now(),
        })
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Token {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response.json().await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(
                        url = url,
                        retry = retries,
                        backoff_ms = backoff_ms,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    /// Follow `next` links of a paginated list endpoint
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut url = format!("{}?page_size={}", self.url(path), PAGE_SIZE);
        let mut items = Vec::new();

        for page in 1..=MAX_PAGES {
            let response: Paginated<T> = self.get(&url).await?;
            debug!(url = %url, page, count = response.results.len(), "Fetched page");
            items.extend(response.results);

            match response.next {
                Some(next) if !next.is_empty() => url = next,
                _ => return Ok(items),
            }
        }

        Err(ApiError::InvalidResponse(format!(
            "{} returned more than {} pages",
            path, MAX_PAGES
        ))
        .into())
    }

    // ===== Data Fetching Methods =====

    pub async fn fetch_event(&self, event_id: i64) -> Result<Event> {
        self.get(&self.url(&format!("frontend/events/{}/", event_id))).await
    }

    /// Event as raw JSON, for the generic renderer
    pub async fn fetch_event_raw(&self, event_id: i64) -> Result<Value> {
        self.get(&self.url(&format!("frontend/events/{}/", event_id))).await
    }

    pub async fn fetch_user(&self, user_id: i64) -> Result<User> {
        self.get(&self.url(&format!("frontend/users/{}/", user_id))).await
    }

    /// User as raw JSON, for the generic renderer
    pub async fn fetch_user_raw(&self, user_id: i64) -> Result<Value> {
        self.get(&self.url(&format!("frontend/users/{}/", user_id))).await
    }

    pub async fn fetch_qualification_categories(&self) -> Result<Vec<QualificationCategory>> {
        self.get_all("categories/qualification_categories/").await
    }

    pub async fn fetch_translations(&self) -> Result<TranslationCatalog> {
        self.get(&self.url("frontend/translations/")).await
    }

    /// Fetch event, user and qualification categories concurrently
    pub async fn fetch_organizer_inputs(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<OrganizerInputs> {
        let (event, user, categories) = futures::try_join!(
            self.fetch_event(event_id),
            self.fetch_user(user_id),
            self.fetch_qualification_categories(),
        )?;

        Ok(OrganizerInputs {
            event,
            user,
            categories,
        })
    }
}
