//! Mock model: scripted reply for tests and offline demos.

use async_trait::async_trait;

use super::{MeditationModel, ModelError};

/// Returns a fixed completion or a fixed error, ignoring the reference.
pub struct MockModel {
    reply: Result<String, ModelError>,
}

impl MockModel {
    /// Mock that answers every call with the given raw completion JSON.
    pub fn completion(raw: impl Into<String>) -> Self {
        Self {
            reply: Ok(raw.into()),
        }
    }

    /// Mock that fails every call with the given error.
    pub fn failure(error: ModelError) -> Self {
        Self { reply: Err(error) }
    }
}

#[async_trait]
impl MeditationModel for MockModel {
    async fn complete(&self, _reference: &str) -> Result<String, ModelError> {
        self.reply.clone()
    }
}
