//! Expo push notification plumbing for the daily card.

pub mod client;
pub mod error;
pub mod message;
pub mod token;

pub use client::{ExpoPushClient, PushTicket, MAX_MESSAGES_PER_REQUEST};
pub use error::PushError;
pub use message::{card_body, daily_card_messages, PushMessage};
pub use token::is_expo_push_token;
