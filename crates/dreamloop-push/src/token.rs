/// Whether `token` looks like something Expo will accept as a recipient.
///
/// Accepts `ExponentPushToken[...]` / `ExpoPushToken[...]` and the bare
/// UUID-shaped form Expo also issues.
#[must_use]
pub fn is_expo_push_token(token: &str) -> bool {
    let bracketed = ["ExponentPushToken[", "ExpoPushToken["]
        .into_iter()
        .any(|prefix| token.starts_with(prefix))
        && token.ends_with(']');

    bracketed || is_uuid_shaped(token)
}

fn is_uuid_shaped(token: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_alphanumeric()))
}
