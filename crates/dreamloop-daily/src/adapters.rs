//! Production implementations of the ports: Postgres plus the HTTP clients.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dreamloop_core::{
    AppConfig, ContentRecord, Coordinates, NewContentRecord, Profile, WeatherSnapshot,
};
use dreamloop_generator::{GeneratedContent, GenerationInput, OpenRouterClient};
use dreamloop_push::{ExpoPushClient, PushMessage, PushTicket};
use dreamloop_weather::WeatherClient;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DailyError;
use crate::ports::{
    Collaborators, ContentStore, DeviceDirectory, ProfileSource, PushTransport, TextGenerator,
    WeatherSource,
};

/// Profiles, content and device tokens backed by one Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileSource for PgStore {
    async fn list_eligible(&self) -> Result<Vec<Profile>, DailyError> {
        Ok(dreamloop_db::list_eligible_profiles(&self.pool).await?)
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, DailyError> {
        Ok(dreamloop_db::get_profile(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<ContentRecord>, DailyError> {
        Ok(dreamloop_db::get_content_for_day(&self.pool, user_id, day).await?)
    }

    async fn upsert(&self, record: &NewContentRecord) -> Result<ContentRecord, DailyError> {
        Ok(dreamloop_db::upsert_content_record(&self.pool, record).await?)
    }
}

#[async_trait]
impl DeviceDirectory for PgStore {
    async fn device_tokens(&self, user_id: Uuid) -> Result<Vec<String>, DailyError> {
        Ok(dreamloop_db::list_device_tokens(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    fn model_id(&self) -> &str {
        self.model()
    }

    async fn generate(&self, input: &GenerationInput) -> Result<GeneratedContent, DailyError> {
        Ok(self.generate_two_lines(input).await?)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current(
        &self,
        coordinates: Option<Coordinates>,
        timezone: &str,
    ) -> Option<WeatherSnapshot> {
        self.fetch(coordinates, timezone).await
    }
}

#[async_trait]
impl PushTransport for ExpoPushClient {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, DailyError> {
        Ok(ExpoPushClient::send_batch(self, messages).await?)
    }
}

impl Collaborators {
    /// Wire the Postgres store and the outbound HTTP clients from config.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::MissingSetting`] when no OpenRouter key is
    /// configured, or a client error if an HTTP client cannot be built.
    pub fn from_app_config(pool: PgPool, config: &AppConfig) -> Result<Self, DailyError> {
        let api_key = config
            .openrouter_api_key
            .as_deref()
            .ok_or(DailyError::MissingSetting("OPENROUTER_API_KEY"))?;

        let generator = OpenRouterClient::with_base_url(
            api_key,
            &config.openrouter_model,
            config.http_timeout_secs,
            &config.openrouter_base_url,
        )?;
        let weather =
            WeatherClient::with_base_url(config.http_timeout_secs, &config.weather_base_url)?;
        let push = ExpoPushClient::new(
            &config.expo_push_url,
            config.expo_access_token.as_deref(),
            config.http_timeout_secs,
        )?;

        let store = Arc::new(PgStore::new(pool));
        Ok(Self {
            profiles: store.clone(),
            content: store.clone(),
            devices: store,
            generator: Arc::new(generator),
            weather: Arc::new(weather),
            push: Arc::new(push),
        })
    }
}
