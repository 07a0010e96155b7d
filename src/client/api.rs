//! API facade: one method per Mealie endpoint.
//!
//! Each call builds the URL from the configured base, attaches the bearer
//! header from the injected [`TokenStore`], runs the transport, and maps the
//! envelope: transport failures become [`ApiError::Internal`], FAILURE
//! envelopes become [`ApiError::Api`], and parse failures propagate
//! unchanged. A missing token aborts before any network traffic.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;

use crate::client::error::{ApiError, ParseError};
use crate::client::http::{HttpClient, Response, Status};
use crate::client::token::TokenStore;
use crate::client::types::{
    ErrorResponse, LoginRequest, MealPlanResponse, RecipeResponse, StatisticsResponse,
    TokenResponse, UserResponse,
};

pub struct Api {
    http: HttpClient,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl Api {
    pub fn new(http: HttpClient, base_url: String, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    fn base_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Base headers plus `Authorization: Bearer <token>`. Fails with
    /// [`ApiError::NoToken`] when the store is empty.
    fn authorized_headers(&self) -> Result<HeaderMap, ApiError> {
        let token = self.tokens.get_token()?;
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ApiError::Parse(ParseError::InvalidField {
                field: "access_token",
                reason: "token is not a valid header value".to_string(),
            })
        })?;
        let mut headers = Self::base_headers();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Unwraps the envelope and runs `parser` over the body. A FAILURE
    /// envelope raises `Api` after logging any server-provided detail; a
    /// SUCCESS envelope with no body parses as an empty mapping, so the
    /// parser reports its first missing required field.
    fn parse<T>(
        response: &Response,
        parser: impl Fn(&Value) -> Result<T, ParseError>,
    ) -> Result<T, ApiError> {
        if response.status == Status::Failure {
            Self::log_failure_detail(response);
            return Err(ApiError::Api {
                status_code: response.status_code,
            });
        }
        let body = response.body().cloned().unwrap_or(Value::Null);
        Ok(parser(&body)?)
    }

    fn log_failure_detail(response: &Response) {
        let Some(body) = response.body() else {
            tracing::warn!(status_code = response.status_code, "request failed");
            return;
        };
        match ErrorResponse::from_json(body) {
            Ok(error) if !error.detail.is_empty() => {
                for detail in &error.detail {
                    tracing::warn!(
                        status_code = response.status_code,
                        loc = %detail.loc.join("."),
                        msg = detail.msg.as_deref().unwrap_or(""),
                        "request failed"
                    );
                }
            }
            _ => tracing::warn!(
                status_code = response.status_code,
                body = %body,
                "request failed"
            ),
        }
    }

    /// Exchanges credentials for a bearer token via `POST /api/auth/token`
    /// (or `/api/auth/token/long`) and stores the new access token before
    /// returning it.
    pub async fn get_token(
        &self,
        username: &str,
        password: &str,
        long_token: bool,
    ) -> Result<TokenResponse, ApiError> {
        let suffix = if long_token {
            "/api/auth/token/long"
        } else {
            "/api/auth/token"
        };
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(&self.url(suffix), Self::base_headers(), &body)
            .await?;

        let token = Self::parse(&response, TokenResponse::from_json)?;
        self.tokens.set_token(token.access_token.clone());
        tracing::debug!(username, "obtained access token");
        Ok(token)
    }

    /// Trades the current token for a fresh one via `GET /api/auth/refresh`
    /// and stores it.
    pub async fn get_refresh_token(&self) -> Result<TokenResponse, ApiError> {
        let headers = self.authorized_headers()?;
        let response = self
            .http
            .get(&self.url("/api/auth/refresh"), headers)
            .await?;

        let token = Self::parse(&response, TokenResponse::from_json)?;
        self.tokens.set_token(token.access_token.clone());
        Ok(token)
    }

    pub async fn get_user(&self) -> Result<UserResponse, ApiError> {
        let headers = self.authorized_headers()?;
        let response = self.http.get(&self.url("/api/users/self"), headers).await?;
        Self::parse(&response, UserResponse::from_json)
    }

    pub async fn get_statistics(&self) -> Result<StatisticsResponse, ApiError> {
        let headers = self.authorized_headers()?;
        let response = self
            .http
            .get(&self.url("/api/debug/statistics"), headers)
            .await?;
        Self::parse(&response, StatisticsResponse::from_json)
    }

    /// Today's planned recipe, or `None` when nothing is planned (the server
    /// answers with an empty body or `null`).
    pub async fn get_recipe_today(&self) -> Result<Option<RecipeResponse>, ApiError> {
        let headers = self.authorized_headers()?;
        let response = self
            .http
            .get(&self.url("/api/meal-plans/today"), headers)
            .await?;

        if response.body().is_none() {
            return Ok(None);
        }
        Self::parse(&response, RecipeResponse::from_json).map(Some)
    }

    /// The current week's meal plan, or `None` when no plan exists.
    pub async fn get_meal_plan_this_week(&self) -> Result<Option<MealPlanResponse>, ApiError> {
        let headers = self.authorized_headers()?;
        let response = self
            .http
            .get(&self.url("/api/meal-plans/this-week"), headers)
            .await?;

        if response.body().is_none() {
            return Ok(None);
        }
        Self::parse(&response, MealPlanResponse::from_json).map(Some)
    }

    /// Startup/configuration handshake: log in, then fetch the account the
    /// credentials belong to.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(TokenResponse, UserResponse), ApiError> {
        let token = self.get_token(username, password, false).await?;
        let user = self.get_user().await?;
        Ok((token, user))
    }
}
