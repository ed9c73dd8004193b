use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::chat::ChatConfig;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::ChatCompletionRequest;

/// Client for an OpenRouter-style chat-completion endpoint.
#[derive(Clone)]
pub struct OpenRouter {
    api_key: Option<String>,
    client: ReqwestClient,
    endpoint: String,
    connect_timeout: Duration,
    idle_timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl OpenRouter {
    /// Create a new client from the chat configuration.
    ///
    /// The credential is not checked here.  Without one, requests go out
    /// without an `Authorization` header and the server's rejection is
    /// reported as [`Error::Authentication`].
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            endpoint: config.endpoint.clone(),
            connect_timeout: config.connect_timeout,
            idle_timeout: config.idle_timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request and streamed line.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The attached logger, if any.
    pub fn logger(&self) -> Option<&dyn ClientLogger> {
        self.logger.as_deref()
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        if let Some(api_key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                Error::authentication("API key contains characters not allowed in a header")
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // Try to parse error response body
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if error_body.trim().is_empty() {
                    format!("HTTP status {status_code}")
                } else {
                    error_body.clone()
                }
            });

        // Map HTTP status code to appropriate error type
        match status_code {
            400 => Error::bad_request(error_message),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            404 => Error::not_found(error_message, None),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_message),
        }
    }

    /// Post a streaming chat-completion request.
    ///
    /// Returns the response body as a stream of text lines; see
    /// [`parse_line`](crate::sse::parse_line) for their interpretation.
    pub async fn stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<impl Stream<Item = Result<String>>> {
        let mut request = request.clone();
        request.stream = true;

        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.default_headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.connect_timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        Ok(process_sse(response.bytes_stream(), Some(self.idle_timeout)))
    }
}

impl fmt::Debug for OpenRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouter")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let config = ChatConfig::new()
            .with_api_key(Some("test-key".to_string()))
            .with_endpoint("https://custom-api.example.com/v1/chat/completions")
            .with_connect_timeout(Duration::from_secs(5));
        let client = OpenRouter::new(&config).unwrap();
        assert_eq!(client.api_key.as_deref(), Some("test-key"));
        assert_eq!(
            client.endpoint(),
            "https://custom-api.example.com/v1/chat/completions"
        );
        assert_eq!(client.connect_timeout, Duration::from_secs(5));
        assert!(client.logger().is_none());
    }

    #[test]
    fn bearer_header_when_key_present() {
        let config = ChatConfig::new().with_api_key(Some("sk-or-123".to_string()));
        let client = OpenRouter::new(&config).unwrap();
        let headers = client.default_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer sk-or-123"
        );
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "text/event-stream");
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn no_authorization_without_key() {
        let client = OpenRouter::new(&ChatConfig::new()).unwrap();
        let headers = client.default_headers().unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_key_is_authentication_error() {
        let config = ChatConfig::new().with_api_key(Some("bad\nkey".to_string()));
        let client = OpenRouter::new(&config).unwrap();
        assert!(client.default_headers().unwrap_err().is_authentication());
    }

    #[test]
    fn debug_redacts_key() {
        let config = ChatConfig::new().with_api_key(Some("sk-secret".to_string()));
        let client = OpenRouter::new(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
