//! Fan a day's card out to every registered device of one user.

use std::sync::Arc;

use dreamloop_push::daily_card_messages;
use serde::Serialize;
use uuid::Uuid;

use crate::error::DailyError;
use crate::ports::{DeviceDirectory, PushTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Tickets returned by batches that went through.
    pub sent: usize,
}

pub struct PushDispatcher {
    devices: Arc<dyn DeviceDirectory>,
    transport: Arc<dyn PushTransport>,
}

impl PushDispatcher {
    #[must_use]
    pub fn new(devices: Arc<dyn DeviceDirectory>, transport: Arc<dyn PushTransport>) -> Self {
        Self { devices, transport }
    }

    /// Push `lines` to every valid token `user_id` has registered.
    ///
    /// A user without valid tokens gets `sent: 0`. A failed batch is logged
    /// and skipped, so `sent` may be lower than the token count.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError`] only if the user's tokens cannot be loaded.
    pub async fn dispatch(
        &self,
        user_id: Uuid,
        lines: &[String],
        image_url: Option<&str>,
    ) -> Result<DispatchReport, DailyError> {
        let tokens = self.devices.device_tokens(user_id).await?;
        let registered = tokens.len();
        let valid: Vec<String> = tokens
            .into_iter()
            .filter(|token| self.transport.is_valid_token(token))
            .collect();

        if valid.len() < registered {
            tracing::debug!(
                user_id = %user_id,
                dropped = registered - valid.len(),
                "push: ignoring malformed device tokens"
            );
        }
        if valid.is_empty() {
            tracing::info!(user_id = %user_id, "push: no valid device tokens; nothing to send");
            return Ok(DispatchReport { sent: 0 });
        }

        let messages = daily_card_messages(&valid, lines, image_url);
        let mut sent = 0;
        for batch in messages.chunks(self.transport.max_batch_size().max(1)) {
            match self.transport.send_batch(batch).await {
                Ok(tickets) => sent += tickets.len(),
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        batch_size = batch.len(),
                        error = %e,
                        "push: batch failed; continuing with the rest"
                    );
                }
            }
        }

        Ok(DispatchReport { sent })
    }
}
