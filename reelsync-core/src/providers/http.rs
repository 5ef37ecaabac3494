use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::ProviderError;

/// Shared JSON-over-HTTP plumbing for the provider adapters.
///
/// Timeouts live here; retries are the caller's business.
#[derive(Debug, Clone)]
pub struct ProviderHttp {
    http: reqwest::Client,
}

impl ProviderHttp {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("reelsync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn get_json<Q, T>(
        &self,
        url: &str,
        query: &Q,
        headers: &[(&'static str, &str)],
    ) -> Result<T, ProviderError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return decode_body(&body);
        }

        #[derive(Debug, Deserialize)]
        struct ErrorBody {
            #[serde(
                default,
                alias = "error",
                alias = "Error",
                alias = "message"
            )]
            status_message: Option<String>,
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| {
                format!("request failed with status {}", status)
            });

        debug!(url, status = status.as_u16(), "provider request failed");
        Err(classify_status(status.as_u16(), message))
    }
}

/// Decode a success body. A body that does not match the expected shape is
/// a `Parse` failure, not a network one.
pub fn decode_body<T>(body: &[u8]) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body)
        .map_err(|err| ProviderError::Parse(err.to_string()))
}

/// Map a non-success HTTP status onto the provider error taxonomy.
pub fn classify_status(status: u16, message: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::InvalidApiKey,
        404 => ProviderError::NotFound,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Api(message),
    }
}

/// Parse `YYYY-MM-DD` (optionally followed by a time) into epoch seconds at
/// midnight UTC.
pub(crate) fn parse_air_date(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp())
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
