//! Composition of the daily-card push message.

use serde::Serialize;

pub const DAILY_CARD_TITLE: &str = "Your two lines for today ✨";
pub const FALLBACK_BODY: &str = "Your two lines are ready";
pub const DAILY_CARD_DEEPLINK: &str = "dreamloop://today?play=1";
pub const DAILY_CARD_CHANNEL: &str = "daily-card";

/// One Expo push message, serialized in Expo's wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: PushData,
    /// Always serialized; `null` keeps the notification silent.
    pub sound: Option<String>,
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_content: Option<RichContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushData {
    pub deeplink: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichContent {
    pub image: String,
}

/// Notification body: the first two lines separated by a newline, or a
/// generic nudge when fewer than two are available.
#[must_use]
pub fn card_body(lines: &[String]) -> String {
    match lines {
        [first, second, ..] => format!("{first}\n{second}"),
        _ => FALLBACK_BODY.to_string(),
    }
}

/// Build one daily-card message per recipient token.
#[must_use]
pub fn daily_card_messages(
    tokens: &[String],
    lines: &[String],
    image_url: Option<&str>,
) -> Vec<PushMessage> {
    let body = card_body(lines);
    let rich_content = image_url.map(|image| RichContent {
        image: image.to_string(),
    });

    tokens
        .iter()
        .map(|to| PushMessage {
            to: to.clone(),
            title: DAILY_CARD_TITLE.to_string(),
            body: body.clone(),
            data: PushData {
                deeplink: DAILY_CARD_DEEPLINK.to_string(),
            },
            sound: None,
            channel_id: DAILY_CARD_CHANNEL.to_string(),
            rich_content: rich_content.clone(),
        })
        .collect()
}
