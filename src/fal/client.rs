//! FalClient - fetches generated still images from the fal.ai queue API.

use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use super::retry::{is_transient_network_error, parse_retry_after, RetryPolicy};

/// The environment variable name for the fal.ai API key.
pub const FAL_API_KEY_ENV: &str = "FAL_API_KEY";

/// Default base URL for the fal.ai queue API.
pub const FAL_API_BASE_URL: &str = "https://queue.fal.run";

/// Default text-to-image model.
pub const DEFAULT_MODEL: &str = "fal-ai/flux/schnell";

/// Default timeout for the whole generation (submit, poll, download).
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Default polling interval for status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Largest image download accepted (32 MiB).
pub const MAX_IMAGE_BYTES: usize = 32 * 1024 * 1024;

/// Timeout for a single HTTP request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
const HTTP_STATUS_BAD_REQUEST: u16 = 400;
const HTTP_STATUS_FORBIDDEN: u16 = 403;

/// Keywords that indicate a content policy violation in error messages.
const CONTENT_POLICY_KEYWORDS: &[&str] = &[
    "content policy",
    "policy violation",
    "inappropriate",
    "not allowed",
    "prohibited",
    "blocked",
    "unsafe",
    "violates",
    "moderation",
    "nsfw",
];

fn is_content_policy_error(error_text: &str) -> bool {
    let lower = error_text.to_lowercase();
    CONTENT_POLICY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Reject empty or whitespace-only prompts before they reach the API.
pub fn validate_prompt(prompt: &str) -> Result<(), FalError> {
    if prompt.trim().is_empty() {
        return Err(FalError::EmptyPrompt);
    }
    Ok(())
}

/// Request body for image generation.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    /// Named size preset such as `square_hd` or `landscape_4_3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<&'a str>,
    num_images: u32,
}

/// Response from queue submission.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueueResponse {
    /// The unique request ID for polling.
    pub request_id: String,
    /// URL to check status, when the queue provides one.
    #[serde(default)]
    pub status_url: Option<String>,
    /// URL to fetch the result, when the queue provides one.
    #[serde(default)]
    pub response_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultResponse {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

/// One generated image in a completed request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneratedImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Status of a generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStatus {
    /// Request is queued for processing.
    Pending,
    /// Image is being generated.
    InProgress,
    /// Generation finished; fetch the result.
    Completed,
    /// Generation failed with an error.
    Failed { error: String },
}

/// Client for the fal.ai queue API.
pub struct FalClient {
    api_key: String,
    base_url: String,
    model: String,
    image_size: Option<String>,
    poll_interval: Duration,
    retry_policy: RetryPolicy,
    http_client: reqwest::Client,
}

impl FalClient {
    /// Create a new FalClient by reading the API key from `FAL_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `FalError::MissingApiKey` if the variable is unset or empty.
    pub fn new() -> Result<Self, FalError> {
        let api_key = std::env::var(FAL_API_KEY_ENV).map_err(|_| FalError::MissingApiKey)?;
        Self::with_api_key(api_key)
    }

    /// Create a new FalClient with an explicit API key.
    pub fn with_api_key(api_key: String) -> Result<Self, FalError> {
        Self::with_base_url(api_key, FAL_API_BASE_URL.to_string())
    }

    /// Create a new FalClient against a custom base URL (e.g. a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, FalError> {
        if api_key.is_empty() {
            return Err(FalError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            image_size: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_policy: RetryPolicy::default(),
            http_client,
        })
    }

    /// Use a different model endpoint.
    pub fn using_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request a named image size preset.
    pub fn using_image_size(mut self, image_size: impl Into<String>) -> Self {
        self.image_size = Some(image_size.into());
        self
    }

    pub fn using_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn using_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn image_size(&self) -> Option<&str> {
        self.image_size.as_deref()
    }

    fn auth_header(&self) -> String {
        format!("Key {}", self.api_key)
    }

    /// Status endpoint for a request, preferring the URL the queue returned.
    pub fn status_url(&self, queued: &QueueResponse) -> String {
        queued.status_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}/requests/{}/status",
                self.base_url, self.model, queued.request_id
            )
        })
    }

    /// Result endpoint for a request, preferring the URL the queue returned.
    pub fn response_url(&self, queued: &QueueResponse) -> String {
        queued.response_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}/requests/{}",
                self.base_url, self.model, queued.request_id
            )
        })
    }

    /// Submit an image generation request to the queue.
    ///
    /// # Errors
    ///
    /// Returns `FalError::EmptyPrompt` if the prompt is empty,
    /// `FalError::ContentPolicyViolation` if the API rejects the prompt,
    /// `FalError::RateLimit` on a 429 response,
    /// `FalError::ApiError` on any other error response,
    /// or `FalError::HttpError` if the request fails.
    pub async fn submit(&self, prompt: &str) -> Result<QueueResponse, FalError> {
        validate_prompt(prompt)?;

        let url = format!("{}/{}", self.base_url, self.model);
        let request_body = GenerateRequest {
            prompt,
            image_size: self.image_size.as_deref(),
            num_images: 1,
        };

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();

            if status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS {
                let retry_after_secs = parse_retry_after(&response);
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Rate limit exceeded".to_string());
                log::warn!(
                    "Rate limited by fal.ai API. Retry-After: {:?} seconds",
                    retry_after_secs
                );
                return Err(FalError::RateLimit {
                    message: error_text,
                    retry_after_secs,
                });
            }

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if (status.as_u16() == HTTP_STATUS_BAD_REQUEST
                || status.as_u16() == HTTP_STATUS_FORBIDDEN)
                && is_content_policy_error(&error_text)
            {
                log::warn!("Prompt rejected by content policy: {}", error_text);
                return Err(FalError::ContentPolicyViolation {
                    message: error_text,
                });
            }

            return Err(FalError::ApiError(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        Ok(response.json().await?)
    }

    /// Submit with retries on transient network errors and rate limits,
    /// following the client's [`RetryPolicy`].
    ///
    /// # Errors
    ///
    /// Returns `FalError::NetworkError` once network retries are exhausted,
    /// the last `FalError::RateLimit` once rate limit retries are exhausted,
    /// or any non-retryable error immediately.
    pub async fn submit_with_retry(&self, prompt: &str) -> Result<QueueResponse, FalError> {
        let policy = self.retry_policy;
        let mut network_attempt = 0u32;
        let mut rate_limit_attempt = 0u32;

        loop {
            let error = match self.submit(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let delay = match error {
                FalError::HttpError(ref http_err) if is_transient_network_error(http_err) => {
                    network_attempt += 1;
                    if network_attempt > policy.network_retries {
                        log::error!(
                            "Network error after {} attempts. Giving up. Error: {}",
                            network_attempt,
                            http_err
                        );
                        return Err(FalError::NetworkError {
                            message: http_err.to_string(),
                            attempts: network_attempt,
                        });
                    }
                    let delay = policy.backoff(network_attempt - 1);
                    log::warn!(
                        "Network error (attempt {}/{}): {}. Retrying in {:?}...",
                        network_attempt,
                        policy.network_retries + 1,
                        http_err,
                        delay
                    );
                    delay
                }
                FalError::RateLimit {
                    retry_after_secs, ..
                } => {
                    rate_limit_attempt += 1;
                    if rate_limit_attempt > policy.rate_limit_retries {
                        log::error!(
                            "Rate limit exceeded after {} attempts. Giving up.",
                            rate_limit_attempt
                        );
                        return Err(error);
                    }
                    let delay = policy.rate_limit_delay(rate_limit_attempt - 1, retry_after_secs);
                    log::info!(
                        "Rate limited (attempt {}/{}). Retrying in {:?}...",
                        rate_limit_attempt,
                        policy.rate_limit_retries + 1,
                        delay
                    );
                    delay
                }
                other => return Err(other),
            };

            tokio::time::sleep(delay).await;
        }
    }

    /// Check the status of a queued request.
    ///
    /// # Errors
    ///
    /// Returns `FalError::HttpError` if the request fails, or
    /// `FalError::ApiError` for error responses and unknown status strings.
    pub async fn poll_status(&self, queued: &QueueResponse) -> Result<GenerationStatus, FalError> {
        let response = self
            .http_client
            .get(self.status_url(queued))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FalError::ApiError(format!(
                "Status check failed with status {}: {}",
                status, error_text
            )));
        }

        let status_response: StatusResponse = response.json().await?;

        match status_response.status.to_uppercase().as_str() {
            "PENDING" | "IN_QUEUE" => Ok(GenerationStatus::Pending),
            "PROCESSING" | "IN_PROGRESS" => Ok(GenerationStatus::InProgress),
            "COMPLETED" | "OK" => match status_response.error {
                // The queue reports COMPLETED with an error when the model run failed.
                Some(error) => Ok(GenerationStatus::Failed { error }),
                None => Ok(GenerationStatus::Completed),
            },
            "FAILED" | "ERROR" => Ok(GenerationStatus::Failed {
                error: status_response
                    .error
                    .unwrap_or_else(|| "Unknown error occurred during generation".to_string()),
            }),
            unknown => Err(FalError::ApiError(format!(
                "Unknown generation status: {}",
                unknown
            ))),
        }
    }

    /// Fetch the first generated image of a completed request.
    ///
    /// # Errors
    ///
    /// Returns `FalError::NoImage` when the result lists no images.
    pub async fn fetch_result(&self, queued: &QueueResponse) -> Result<GeneratedImage, FalError> {
        let response = self
            .http_client
            .get(self.response_url(queued))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FalError::ApiError(format!(
                "Result fetch failed with status {}: {}",
                status, error_text
            )));
        }

        let result: ResultResponse = response.json().await?;
        result.images.into_iter().next().ok_or(FalError::NoImage)
    }

    /// Download an encoded image into memory.
    ///
    /// The body is streamed and rejected as soon as it exceeds
    /// `MAX_IMAGE_BYTES`.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>, FalError> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FalError::ApiError(format!(
                "Image download failed with status {}: {}",
                status, error_text
            )));
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_IMAGE_BYTES {
                return Err(FalError::ImageTooLarge {
                    limit: MAX_IMAGE_BYTES,
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(FalError::ImageTooLarge {
                    limit: MAX_IMAGE_BYTES,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }

    /// Generate an image from a prompt and return its encoded bytes.
    ///
    /// Submits (with retries), polls until the request completes, then
    /// downloads the first image. `timeout` bounds all of it, including
    /// retry backoff and the download.
    ///
    /// # Errors
    ///
    /// Returns `FalError::Timeout` if the image is not downloaded in time,
    /// `FalError::ApiError` if generation fails on the server, or any error
    /// from the individual steps.
    pub async fn generate_image(&self, prompt: &str, timeout: Duration) -> Result<Vec<u8>, FalError> {
        log::info!("Starting image generation for prompt: {}", prompt);

        match tokio::time::timeout(timeout, self.run_generation(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                log::error!("Generation timed out after {:?}", timeout);
                Err(FalError::Timeout)
            }
        }
    }

    async fn run_generation(&self, prompt: &str) -> Result<Vec<u8>, FalError> {
        let queued = self.submit_with_retry(prompt).await?;
        log::info!("Generation submitted, request_id: {}", queued.request_id);

        loop {
            match self.poll_status(&queued).await? {
                GenerationStatus::Pending => log::debug!("Status: queued, waiting..."),
                GenerationStatus::InProgress => log::debug!("Status: generating..."),
                GenerationStatus::Completed => {
                    log::info!("Generation complete");
                    break;
                }
                GenerationStatus::Failed { error } => {
                    log::error!("Generation failed: {}", error);
                    return Err(FalError::ApiError(format!("Generation failed: {}", error)));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        let image = self.fetch_result(&queued).await?;
        log::info!("Downloading image from: {}", image.url);
        let bytes = self.download_image(&image.url).await?;
        log::info!("Downloaded {} bytes", bytes.len());

        Ok(bytes)
    }
}

/// Errors that can occur during fal.ai operations.
#[derive(Debug, thiserror::Error)]
pub enum FalError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Generation timed out")]
    Timeout,

    #[error("Rate limited: {message}")]
    RateLimit {
        /// Human-readable rate limit message
        message: String,
        /// Retry-After header value in seconds, if provided
        retry_after_secs: Option<u64>,
    },

    #[error("Network error: {message} (after {attempts} attempts)")]
    NetworkError {
        message: String,
        /// Number of attempts made before giving up
        attempts: u32,
    },

    #[error("Content policy violation: {message}")]
    ContentPolicyViolation { message: String },

    #[error("Empty prompt")]
    EmptyPrompt,

    #[error("Generation completed but returned no image")]
    NoImage,

    #[error("Generated image exceeds {limit} bytes")]
    ImageTooLarge { limit: usize },
}
