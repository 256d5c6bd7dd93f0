//! fal.ai text-to-image source.
//!
//! Submits a prompt to the fal.ai queue, polls until the image is ready and
//! downloads it, so a generated picture can be converted like any file.

mod client;
mod retry;

pub use client::{
    validate_prompt, FalClient, FalError, GeneratedImage, GenerationStatus, QueueResponse,
    DEFAULT_GENERATION_TIMEOUT, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL, FAL_API_BASE_URL,
    FAL_API_KEY_ENV, MAX_IMAGE_BYTES,
};
pub use retry::{
    calculate_backoff, is_transient_network_error, parse_retry_after, RetryPolicy,
    DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX, DEFAULT_MAX_RETRIES, DEFAULT_NETWORK_RETRIES,
};
