//! The `RoadmapModel` trait -- the seam between plan generation and the
//! external generative service.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failures talking to the generative service.
///
/// All of these send plan generation down the fallback path.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("generative model is not configured")]
    NotConfigured,

    #[error("request to generative model failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generative model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generative model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("generative model returned no text")]
    EmptyResponse,
}

/// A single-turn text completion endpoint.
///
/// Implementations make at most one request per call and never retry.
#[async_trait]
pub trait RoadmapModel: Send + Sync {
    /// Model identifier, for logs.
    fn name(&self) -> &str;

    /// Send `prompt` and return the model's free-text answer.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn RoadmapModel) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl RoadmapModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn model_is_usable_as_trait_object() {
        let model: Box<dyn RoadmapModel> = Box::new(EchoModel);
        assert_eq!(model.name(), "echo");
        assert_eq!(model.generate("hi").await.unwrap(), "hi");
    }

    #[test]
    fn status_error_message() {
        let err = ServiceError::Status {
            status: 429,
            body: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "generative model returned HTTP 429: quota");
    }
}
