//! Channel membership verification.
//!
//! The wallet frontend gates certain features behind "join our channels".
//! Channel references arrive in whatever shape the admin pasted them in
//! (numeric ids, `@usernames`, bare usernames, or `t.me` links) and are
//! normalized before calling `getChatMember`.

use super::{TelegramClient, TelegramError};

/// Outcome of a single membership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// The user is a member, administrator, or creator.
    Joined,
    /// The user has not joined the channel.
    NotJoined,
    /// The bot itself cannot see the channel (not added, or no rights).
    BotNotAdmin,
}

/// Normalize a channel reference to something `getChatMember` accepts.
///
/// Private invite links (`t.me/+hash`) cannot be resolved by the Bot API
/// and yield `None`.
pub fn resolve_channel_id(raw: &str) -> Option<String> {
    let ch = raw.trim();
    if ch.is_empty() {
        return None;
    }

    let digits = ch.trim_start_matches('-');
    if digits.is_empty() {
        return None;
    }
    if digits.chars().all(|c| c.is_ascii_digit()) {
        return Some(ch.to_string());
    }
    if ch.starts_with('@') {
        return Some(ch.to_string());
    }
    if !ch.starts_with("http") && !ch.starts_with("t.me") {
        return Some(format!("@{ch}"));
    }
    if let Some((_, rest)) = ch.split_once("t.me/") {
        if !rest.starts_with('+') {
            return Some(format!("@{}", rest.trim_matches('/')));
        }
    }
    None
}

/// Descriptions the Bot API uses when the bot has no view into the chat.
fn is_access_error(description: &str) -> bool {
    let lower = description.to_lowercase();
    [
        "chat not found",
        "not enough rights",
        "have no rights",
        "forbidden",
        "bot is not a member",
        "user not found",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
}

/// Classify a failed `getChatMember` call.
pub fn classify_check_error(err: &TelegramError) -> Membership {
    match err {
        TelegramError::Api(description) if is_access_error(description) => Membership::BotNotAdmin,
        _ => Membership::NotJoined,
    }
}

/// Check whether a user has joined a single channel.
pub async fn check_membership(
    client: &TelegramClient,
    user_id: i64,
    channel: &str,
) -> Membership {
    let Some(chat_id) = resolve_channel_id(channel) else {
        return Membership::BotNotAdmin;
    };
    match client.get_chat_member(&chat_id, user_id).await {
        Ok(member) => match member.status.as_str() {
            "member" | "administrator" | "creator" => Membership::Joined,
            _ => Membership::NotJoined,
        },
        Err(err) => classify_check_error(&err),
    }
}

/// Check a user against a list of channels.
///
/// Returns `(not_joined, bot_missing)`: channels the user has not joined,
/// and channels the bot itself cannot inspect.
pub async fn verify_channels(
    client: &TelegramClient,
    user_id: i64,
    channels: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut not_joined = Vec::new();
    let mut bot_missing = Vec::new();
    for channel in channels {
        match check_membership(client, user_id, channel).await {
            Membership::Joined => {}
            Membership::NotJoined => not_joined.push(channel.clone()),
            Membership::BotNotAdmin => bot_missing.push(channel.clone()),
        }
    }
    (not_joined, bot_missing)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_pass_through() {
        assert_eq!(resolve_channel_id("-1002437040999").unwrap(), "-1002437040999");
        assert_eq!(resolve_channel_id("12345").unwrap(), "12345");
    }

    #[test]
    fn usernames_are_normalized() {
        assert_eq!(resolve_channel_id("@mychannel").unwrap(), "@mychannel");
        assert_eq!(resolve_channel_id("mychannel").unwrap(), "@mychannel");
        assert_eq!(resolve_channel_id("  mychannel  ").unwrap(), "@mychannel");
    }

    #[test]
    fn tme_links_are_rewritten() {
        assert_eq!(
            resolve_channel_id("https://t.me/mychannel").unwrap(),
            "@mychannel"
        );
        assert_eq!(resolve_channel_id("t.me/mychannel/").unwrap(), "@mychannel");
    }

    #[test]
    fn private_invite_links_are_unresolvable() {
        assert!(resolve_channel_id("https://t.me/+AbCdEfGh").is_none());
        assert!(resolve_channel_id("").is_none());
        assert!(resolve_channel_id("-").is_none());
    }

    #[test]
    fn access_errors_map_to_bot_not_admin() {
        for description in [
            "Bad Request: chat not found",
            "Forbidden: bot is not a member of the channel chat",
            "Bad Request: not enough rights",
            "Bad Request: user not found",
        ] {
            let err = TelegramError::Api(description.to_string());
            assert_eq!(classify_check_error(&err), Membership::BotNotAdmin);
        }
    }

    #[test]
    fn other_errors_map_to_not_joined() {
        let err = TelegramError::Api("Too Many Requests: retry after 5".to_string());
        assert_eq!(classify_check_error(&err), Membership::NotJoined);
    }
}
