//! Seams between the orchestrator and the outside world.
//!
//! Production wiring lives in [`crate::adapters`]; tests substitute
//! in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dreamloop_core::{ContentRecord, Coordinates, NewContentRecord, Profile, WeatherSnapshot};
use dreamloop_generator::{GeneratedContent, GenerationInput};
use dreamloop_push::{is_expo_push_token, PushMessage, PushTicket, MAX_MESSAGES_PER_REQUEST};
use uuid::Uuid;

use crate::error::DailyError;

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Profiles that opted in to push and are not paused.
    async fn list_eligible(&self) -> Result<Vec<Profile>, DailyError>;

    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, DailyError>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find(&self, user_id: Uuid, day: NaiveDate)
        -> Result<Option<ContentRecord>, DailyError>;

    /// Insert the record for `(user_id, for_date)` unless one exists, and
    /// return whichever record is stored afterwards.
    async fn upsert(&self, record: &NewContentRecord) -> Result<ContentRecord, DailyError>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier stored on each generated record.
    fn model_id(&self) -> &str;

    async fn generate(&self, input: &GenerationInput) -> Result<GeneratedContent, DailyError>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Best effort; `None` on any failure.
    async fn current(
        &self,
        coordinates: Option<Coordinates>,
        timezone: &str,
    ) -> Option<WeatherSnapshot>;
}

#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn device_tokens(&self, user_id: Uuid) -> Result<Vec<String>, DailyError>;
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    fn is_valid_token(&self, token: &str) -> bool {
        is_expo_push_token(token)
    }

    fn max_batch_size(&self) -> usize {
        MAX_MESSAGES_PER_REQUEST
    }

    async fn send_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, DailyError>;
}

/// Everything the orchestrator talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub profiles: Arc<dyn ProfileSource>,
    pub content: Arc<dyn ContentStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub weather: Arc<dyn WeatherSource>,
    pub devices: Arc<dyn DeviceDirectory>,
    pub push: Arc<dyn PushTransport>,
}
