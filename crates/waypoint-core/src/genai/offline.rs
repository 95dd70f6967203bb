//! Stand-in model for deployments without an API key.

use async_trait::async_trait;

use super::trait_def::{RoadmapModel, ServiceError};

/// Fails every request, so every roadmap comes from the template fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineModel;

#[async_trait]
impl RoadmapModel for OfflineModel {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::NotConfigured)
    }
}
