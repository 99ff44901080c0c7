//! HTTP client for the campaign REST API.
//!
//! Wraps `reqwest` with typed endpoints, bearer-key management, and
//! defensive decoding. Reference-data endpoints (categories, print types)
//! are decoded by alias probing because their display-name field differs
//! between deployments; the availability payload is handed to
//! `pica_availability` wholesale. Every response is checked for the
//! `{"error": ...}` envelope before decoding.
//!
//! Requests are never retried here: a failed fetch surfaces once and the
//! caller decides whether to re-trigger it, and a superseded in-flight
//! response is simply ignored by the caller's state handling.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use pica_availability::{decimal_from_value, normalize_payload, probe_string};
use pica_core::{AppConfig, AvailabilityProgram, CampaignDetail, Category, InsertPrintType};

use crate::error::ApiError;
use crate::types::AvailabilityRequest;

/// Client for the campaign booking REST API.
///
/// Use [`ApiClient::from_config`] in binaries; [`ApiClient::new`] accepts
/// an explicit base URL for pointing at a mock server in tests.
pub struct ApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so Url::join treats the
        // last path segment as a directory.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApiError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.map(str::to_owned),
            base_url,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            config.api_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Lists the advertising categories a campaign can declare.
    ///
    /// Rows whose id cannot be resolved are dropped; the display name
    /// probes `category`/`name`/`label`/`title` and falls back to the id.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] on an error envelope, [`ApiError::Http`] on
    /// transport failure, [`ApiError::Deserialize`] on a non-array body.
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        let body = self.get_json("categories").await?;
        let rows = expect_array(&body, "categories")?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = probe_string(row, "id", &["id", "category_id", "code"])?;
                let name = probe_string(row, "name", &["category", "name", "label", "title"])
                    .unwrap_or_else(|| id.clone());
                Some(Category { id, name })
            })
            .collect())
    }

    /// Lists the insert print formats the print-price service quotes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get_categories`].
    pub async fn get_insert_print_types(&self) -> Result<Vec<InsertPrintType>, ApiError> {
        let body = self.get_json("insert-print-types").await?;
        let rows = expect_array(&body, "insert-print-types")?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = probe_string(row, "id", &["id", "code"])?;
                let name = probe_string(row, "name", &["name", "label", "title"])
                    .unwrap_or_else(|| id.clone());
                Some(InsertPrintType { id, name })
            })
            .collect())
    }

    /// Checks availability for a set of channels under a category.
    ///
    /// The raw payload goes through the availability normalizer; entries
    /// that resolve no channel id are silently dropped there.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] on an error envelope, [`ApiError::Http`] on
    /// transport failure.
    pub async fn fetch_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AvailabilityProgram>, ApiError> {
        let url = self.endpoint("programs/availability");
        let response = self
            .authorized(self.client.post(url.clone()))
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = decode_body(response, &url).await?;
        check_api_error(&body)?;
        Ok(normalize_payload(&body))
    }

    /// Fetches the print price matrix for an insert format: a map of
    /// quantity threshold to per-unit price.
    ///
    /// Threshold keys arrive as JSON object keys (strings); keys or
    /// values that do not parse as numbers are dropped.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] on an error envelope, [`ApiError::Http`] on
    /// transport failure, [`ApiError::Deserialize`] on a non-object body.
    pub async fn get_print_price_matrix(
        &self,
        format: &str,
    ) -> Result<BTreeMap<u64, Decimal>, ApiError> {
        let body = self.get_json(&format!("print-price-matrix/{format}")).await?;
        let Some(map) = body.as_object() else {
            return Err(ApiError::Deserialize {
                context: format!("print-price-matrix/{format}"),
                source: serde::de::Error::custom("expected a JSON object"),
            });
        };
        Ok(map
            .iter()
            .filter_map(|(key, price)| {
                let Ok(threshold) = key.trim().parse::<u64>() else {
                    tracing::debug!(key = %key, "dropping non-numeric print matrix threshold");
                    return None;
                };
                Some((threshold, decimal_from_value(price)?))
            })
            .collect())
    }

    /// Fetches the persisted campaign record.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] on an error envelope, [`ApiError::Http`] on
    /// transport failure, [`ApiError::Deserialize`] if the body does not
    /// match [`CampaignDetail`].
    pub async fn get_campaign(&self, campaign_id: &Uuid) -> Result<CampaignDetail, ApiError> {
        let body = self.get_json(&format!("campaigns/{campaign_id}")).await?;
        decode_campaign(body, &format!("campaigns/{campaign_id}"))
    }

    /// Sets the campaign's self-declared category. Returns the updated
    /// record so the caller can re-resolve the wizard step.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get_campaign`].
    pub async fn set_declared_category(
        &self,
        campaign_id: &Uuid,
        category_id: &str,
    ) -> Result<CampaignDetail, ApiError> {
        self.post_campaign_action(
            campaign_id,
            "category",
            Some(serde_json::json!({ "category_id": category_id })),
        )
        .await
    }

    /// Accepts the classifier's predicted category as confirmed.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get_campaign`].
    pub async fn accept_predicted_category(
        &self,
        campaign_id: &Uuid,
    ) -> Result<CampaignDetail, ApiError> {
        self.post_campaign_action(campaign_id, "category/accept-prediction", None)
            .await
    }

    /// Requests a manual review of the category mismatch.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get_campaign`].
    pub async fn request_manual_review(
        &self,
        campaign_id: &Uuid,
    ) -> Result<CampaignDetail, ApiError> {
        self.post_campaign_action(campaign_id, "category/manual-review", None)
            .await
    }

    /// Clears the campaign's program selection.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get_campaign`].
    pub async fn reset_programs(&self, campaign_id: &Uuid) -> Result<CampaignDetail, ApiError> {
        self.post_campaign_action(campaign_id, "programs/reset", None)
            .await
    }

    async fn post_campaign_action(
        &self,
        campaign_id: &Uuid,
        action: &str,
        body: Option<Value>,
    ) -> Result<CampaignDetail, ApiError> {
        let path = format!("campaigns/{campaign_id}/{action}");
        let url = self.endpoint(&path);
        let mut request = self.authorized(self.client.post(url.clone()));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?.error_for_status()?;
        let body: Value = decode_body(response, &url).await?;
        decode_campaign(body, &path)
    }

    /// Sends an authorized GET, checks the error envelope, and returns the
    /// raw JSON body.
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        let response = self
            .authorized(self.client.get(url.clone()))
            .send()
            .await?
            .error_for_status()?;
        let body: Value = decode_body(response, &url).await?;
        check_api_error(&body)?;
        Ok(body)
    }

    fn endpoint(&self, path: &str) -> Url {
        // The base URL is normalised with a trailing slash at construction,
        // so join cannot fail for a relative path.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Parses a response body as JSON, attaching the URL as error context.
async fn decode_body(response: reqwest::Response, url: &Url) -> Result<Value, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| ApiError::Deserialize {
        context: url.to_string(),
        source,
    })
}

/// Surfaces the API's error envelope: `{"error": "..."}`,
/// `{"error": {"message": "..."}}`, or a bare top-level `"message"`
/// alongside an `"error"` key.
fn check_api_error(body: &Value) -> Result<(), ApiError> {
    let Some(error) = body.get("error").filter(|e| !e.is_null()) else {
        return Ok(());
    };
    let message = error
        .as_str()
        .or_else(|| error.get("message").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or("unknown error")
        .to_owned();
    Err(ApiError::Api(message))
}

fn expect_array<'a>(body: &'a Value, context: &str) -> Result<&'a [Value], ApiError> {
    body.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::Deserialize {
            context: context.to_owned(),
            source: serde::de::Error::custom("expected a JSON array"),
        })
}

fn decode_campaign(body: Value, context: &str) -> Result<CampaignDetail, ApiError> {
    check_api_error(&body)?;
    serde_json::from_value(body).map_err(|source| ApiError::Deserialize {
        context: context.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Some("test-key"), 30, "pica-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_joins_relative_paths() {
        let client = test_client("https://api.example.test");
        assert_eq!(
            client.endpoint("categories").as_str(),
            "https://api.example.test/categories"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_in_base() {
        let client = test_client("https://api.example.test/v2/");
        assert_eq!(
            client.endpoint("campaigns/abc").as_str(),
            "https://api.example.test/v2/campaigns/abc"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::new("not a url", None, 30, "pica-test/0.1");
        assert!(
            matches!(result, Err(ApiError::Api(ref msg)) if msg.contains("invalid base URL")),
            "expected Api error for invalid base URL"
        );
    }

    #[test]
    fn error_envelope_string_form() {
        let body = json!({"error": "campaign not found"});
        let err = check_api_error(&body).unwrap_err();
        assert!(matches!(err, ApiError::Api(ref m) if m == "campaign not found"));
    }

    #[test]
    fn error_envelope_object_form() {
        let body = json!({"error": {"message": "bad category", "code": 422}});
        let err = check_api_error(&body).unwrap_err();
        assert!(matches!(err, ApiError::Api(ref m) if m == "bad category"));
    }

    #[test]
    fn error_envelope_absent_is_ok() {
        assert!(check_api_error(&json!({"data": []})).is_ok());
        assert!(check_api_error(&json!({"error": null})).is_ok());
    }
}
