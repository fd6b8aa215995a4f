//! One pass over every eligible profile.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dreamloop_core::{
    ContentRecord, LocalClock, NewContentRecord, Profile, TemperatureUnit, PROMPT_VERSION,
};
use dreamloop_generator::GenerationInput;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::dispatch::{DispatchReport, PushDispatcher};
use crate::error::DailyError;
use crate::outcome::{RunOutcome, RunResult, RunTotals};
use crate::ports::{Collaborators, ContentStore, ProfileSource, TextGenerator, WeatherSource};

pub struct DailyOrchestrator {
    profiles: Arc<dyn ProfileSource>,
    content: Arc<dyn ContentStore>,
    generator: Arc<dyn TextGenerator>,
    weather: Arc<dyn WeatherSource>,
    dispatcher: PushDispatcher,
    max_concurrent_users: usize,
    temperature_unit: TemperatureUnit,
}

impl DailyOrchestrator {
    /// Users are processed one at a time unless raised with
    /// [`DailyOrchestrator::with_max_concurrent_users`].
    #[must_use]
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            profiles,
            content,
            generator,
            weather,
            devices,
            push,
        } = collaborators;

        Self {
            profiles,
            content,
            generator,
            weather,
            dispatcher: PushDispatcher::new(devices, push),
            max_concurrent_users: 1,
            temperature_unit: TemperatureUnit::Celsius,
        }
    }

    #[must_use]
    pub fn with_max_concurrent_users(mut self, limit: usize) -> Self {
        self.max_concurrent_users = limit.max(1);
        self
    }

    /// Unit the prompt states temperatures in. Stored snapshots stay Celsius.
    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Run the daily pass as of `now`.
    ///
    /// Returns one [`RunResult`] per eligible profile, in profile order. A
    /// user's failure becomes that user's `failed` entry.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError`] only when the eligible profiles cannot be loaded.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<Vec<RunResult>, DailyError> {
        let profiles = self.profiles.list_eligible().await?;
        tracing::info!(count = profiles.len(), "daily: starting pass");

        let results: Vec<RunResult> = stream::iter(profiles)
            .map(|profile| async move { self.run_user(&profile, now).await })
            .buffered(self.max_concurrent_users)
            .collect()
            .await;

        let totals = RunTotals::from_results(&results);
        tracing::info!(
            users = totals.users,
            sent = totals.sent,
            skipped = totals.skipped,
            failed = totals.failed,
            endpoints = totals.endpoints,
            "daily: pass complete"
        );
        Ok(results)
    }

    /// Today's record for `user_id`, generating it if needed regardless of
    /// the user's send time. An existing record is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::ProfileNotFound`] for an unknown user, or the
    /// error of whichever step failed.
    pub async fn materialize_today(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ContentRecord, DailyError> {
        let profile = self.load_profile(user_id).await?;
        let clock = LocalClock::resolve(now, profile.timezone())?;

        match self.content.find(user_id, clock.day).await? {
            Some(existing) => Ok(existing),
            None => self.generate_and_store(&profile, &clock).await,
        }
    }

    /// Push today's stored record for `user_id` without generating anything.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::ProfileNotFound`] or
    /// [`DailyError::NoContentForDay`], or a device-token lookup error.
    pub async fn push_today(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, DailyError> {
        let profile = self.load_profile(user_id).await?;
        let clock = LocalClock::resolve(now, profile.timezone())?;

        let record = self
            .content
            .find(user_id, clock.day)
            .await?
            .ok_or(DailyError::NoContentForDay {
                user_id,
                day: clock.day,
            })?;

        self.push_record(&record).await
    }

    async fn run_user(&self, profile: &Profile, now: DateTime<Utc>) -> RunResult {
        let outcome = match self.process_user(profile, now).await {
            Ok(Some(report)) => RunOutcome::Sent { sent: report.sent },
            Ok(None) => RunOutcome::Skipped,
            Err(e) => {
                tracing::error!(user_id = %profile.user_id, error = %e, "daily: user failed");
                RunOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        RunResult::new(profile.user_id, outcome)
    }

    /// `Ok(None)` means not due and nothing stored yet.
    async fn process_user(
        &self,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> Result<Option<DispatchReport>, DailyError> {
        let clock = LocalClock::resolve(now, profile.timezone())?;

        let record = match self.content.find(profile.user_id, clock.day).await? {
            Some(existing) => {
                tracing::debug!(user_id = %profile.user_id, day = %clock.day, "daily: reusing stored card");
                existing
            }
            None if !clock.is_due(profile.daily_time_local.as_deref()) => {
                tracing::debug!(user_id = %profile.user_id, local = %clock.now_local, "daily: not due yet");
                return Ok(None);
            }
            None => self.generate_and_store(profile, &clock).await?,
        };

        self.push_record(&record).await.map(Some)
    }

    async fn generate_and_store(
        &self,
        profile: &Profile,
        clock: &LocalClock,
    ) -> Result<ContentRecord, DailyError> {
        let weather = self
            .weather
            .current(profile.coordinates, profile.timezone())
            .await;
        let temperature = weather.as_ref().and_then(|w| w.temp_c);

        let input = GenerationInput {
            goals: profile.goals.clone(),
            tone: profile.tone().to_string(),
            language: profile.language().to_string(),
            weekday: clock.weekday_name(),
            weather_summary: weather.as_ref().map(|w| w.summary.clone()),
            temperature: temperature.map(|t| self.temperature_unit.convert_celsius(t)),
            unit: temperature.map(|_| self.temperature_unit),
        };

        let generated = self.generator.generate(&input).await?;
        if !generated.has_lines() {
            return Err(DailyError::EmptyLines);
        }

        let stored = self
            .content
            .upsert(&NewContentRecord {
                user_id: profile.user_id,
                for_date: clock.day,
                lines: generated.lines,
                category: generated.category,
                visual_theme: generated.visual_theme,
                weather,
                model: self.generator.model_id().to_string(),
                prompt_version: PROMPT_VERSION,
            })
            .await?;

        tracing::info!(
            user_id = %profile.user_id,
            day = %stored.for_date,
            category = %stored.category,
            "daily: stored new card"
        );
        Ok(stored)
    }

    async fn push_record(&self, record: &ContentRecord) -> Result<DispatchReport, DailyError> {
        self.dispatcher
            .dispatch(
                record.user_id,
                &record.lines,
                record.card_image_url.as_deref(),
            )
            .await
    }

    async fn load_profile(&self, user_id: Uuid) -> Result<Profile, DailyError> {
        self.profiles
            .get(user_id)
            .await?
            .ok_or(DailyError::ProfileNotFound(user_id))
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
